use serde::Serialize;
use std::str::FromStr;
use tracing::{debug, info};

use crate::config::TerminalConfig;
use crate::error::{CommandError, ShellError};
use crate::hack::{HackProgress, HackSequence};
use crate::interpreter::{Catalog, Interpreter, NavigationMode, Session, UrlOpener};
use crate::output::{CommandOutput, ShellDirective};
use crate::secret::SecretTree;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entry {
    /// A submitted line; `output` stays empty while the command is pending.
    Command {
        command: String,
        output: Option<CommandOutput>,
    },
    /// Shell-generated line, e.g. from the hacking sequence.
    System { line: String },
}

/// The two choices offered after `continue-game`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Infiltrate,
    WalkAway,
}

impl FromStr for Branch {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "option-1" | "infiltrate" => Ok(Branch::Infiltrate),
            "2" | "option-2" | "walk-away" => Ok(Branch::WalkAway),
            other => Err(ShellError::UnknownBranch(other.into())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HackPlan {
    pub generation: u64,
    /// Offsets in milliseconds from now at which to call `advance_hack`.
    pub schedule: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Output,
    Cleared,
    BranchPrompt,
    HackStarted(HackPlan),
    GameOver,
}

#[derive(Serialize)]
pub struct Snapshot<'a> {
    pub prompt: String,
    pub scrollback: &'a [Entry],
    pub busy: bool,
    pub branch_prompt: bool,
    pub hacking: bool,
}

pub struct Shell {
    config: TerminalConfig,
    session: Session,
    scrollback: Vec<Entry>,
    history: Vec<String>,
    recall: Option<usize>,
    pending: Option<String>,
    branch_prompt: bool,
    branch_chosen: bool,
    hack: Option<HackSequence>,
    generation: u64,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new(TerminalConfig::default())
    }
}

impl Shell {
    pub fn new(config: TerminalConfig) -> Self {
        Self::with_catalog(config, Catalog::portfolio())
    }

    pub fn with_catalog(config: TerminalConfig, catalog: Catalog) -> Self {
        let session = Session::new(Interpreter::new(catalog, &config));
        let welcome = session
            .interpreter()
            .step(&NavigationMode::Root, "help", &mut NoOpener)
            .1;
        Shell {
            config,
            session,
            scrollback: vec![Entry::Command {
                command: "help".into(),
                output: Some(welcome),
            }],
            history: Vec::new(),
            recall: None,
            pending: None,
            branch_prompt: false,
            branch_chosen: false,
            hack: None,
            generation: 0,
        }
    }

    pub fn config(&self) -> &TerminalConfig {
        &self.config
    }
    pub fn session(&self) -> &Session {
        &self.session
    }
    pub fn scrollback(&self) -> &[Entry] {
        &self.scrollback
    }
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }
    pub fn branch_prompt_visible(&self) -> bool {
        self.branch_prompt
    }
    pub fn decision_made(&self) -> bool {
        self.branch_chosen
    }
    pub fn is_hacking(&self) -> bool {
        self.hack.as_ref().is_some_and(HackSequence::is_active)
    }
    pub fn prompt(&self) -> String {
        prompt(&self.session, &self.config)
    }

    /// Record a line and disable input until `finish_pending`. Returns the loading delay.
    pub fn submit(&mut self, line: &str) -> Result<u32, ShellError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ShellError::EmptyLine);
        }
        if self.pending.is_some() {
            return Err(ShellError::Busy);
        }
        self.history.push(line.to_string());
        self.recall = None;
        self.scrollback.push(Entry::Command {
            command: line.to_string(),
            output: None,
        });
        self.pending = Some(line.to_string());
        Ok(self.config.loading_delay_ms)
    }

    /// Execute the pending line and apply any directive it produced.
    pub fn finish_pending(&mut self, opener: &mut dyn UrlOpener) -> Result<ShellEvent, ShellError> {
        let line = self.pending.take().ok_or(ShellError::NoPendingCommand)?;
        let output = self.session.execute(&line, opener);
        match output.directive_kind() {
            Some(ShellDirective::ClearTerminal) => {
                self.clear();
                Ok(ShellEvent::Cleared)
            }
            Some(ShellDirective::ContinueGame) if self.branch_chosen => {
                let refused = CommandError::DecisionAlreadyMade.into_output(&output.command);
                self.attach(refused);
                Ok(ShellEvent::Output)
            }
            Some(ShellDirective::ContinueGame) => {
                info!("offering narrative branch");
                self.branch_prompt = true;
                Ok(ShellEvent::BranchPrompt)
            }
            None => {
                self.attach(output);
                Ok(ShellEvent::Output)
            }
        }
    }

    /// `submit` and `finish_pending` without the cosmetic delay.
    pub fn run(&mut self, line: &str, opener: &mut dyn UrlOpener) -> Result<ShellEvent, ShellError> {
        self.submit(line)?;
        self.finish_pending(opener)
    }

    fn attach(&mut self, out: CommandOutput) {
        let last = self.scrollback.iter_mut().rev().find_map(|e| match e {
            Entry::Command { output, .. } => Some(output),
            Entry::System { .. } => None,
        });
        if let Some(slot) = last {
            *slot = Some(out);
        }
    }

    /// Wipe scrollback, reset navigation and stop any hacking run.
    pub fn clear(&mut self) {
        info!("terminal cleared");
        self.scrollback.clear();
        self.pending = None;
        self.session.reset();
        self.branch_prompt = false;
        self.cancel_hack();
    }

    /// Stop a hacking run without touching scrollback or navigation.
    pub fn abort_hack(&mut self) {
        self.cancel_hack();
    }

    fn cancel_hack(&mut self) {
        if let Some(mut seq) = self.hack.take() {
            seq.cancel();
            debug!(generation = seq.generation(), "hack sequence cancelled");
        }
        self.generation += 1;
    }

    pub fn choose_branch(&mut self, branch: Branch) -> Result<ShellEvent, ShellError> {
        if !self.branch_prompt {
            return Err(ShellError::NoBranchPrompt);
        }
        self.branch_prompt = false;
        self.branch_chosen = true;
        info!(?branch, "narrative branch chosen");
        match branch {
            Branch::Infiltrate => {
                self.cancel_hack();
                let seq = HackSequence::new(self.generation, self.config.hack_step_delay_ms);
                let plan = HackPlan {
                    generation: seq.generation(),
                    schedule: seq.schedule(),
                };
                self.hack = Some(seq);
                Ok(ShellEvent::HackStarted(plan))
            }
            Branch::WalkAway => Ok(ShellEvent::GameOver),
        }
    }

    /// Timer tick for hacking run `generation`. The last step unlocks the secret area.
    pub fn advance_hack(&mut self, generation: u64) -> HackProgress {
        let Some(seq) = self.hack.as_mut() else {
            return HackProgress::Stale;
        };
        let progress = seq.advance(generation);
        match &progress {
            HackProgress::Line(line) => self.scrollback.push(Entry::System { line: line.clone() }),
            HackProgress::Unlocked(line) => {
                self.scrollback.push(Entry::System { line: line.clone() });
                self.hack = None;
                self.session.enter_secret_area();
            }
            HackProgress::Stale => debug!(generation, "stale hack tick ignored"),
        }
        progress
    }

    pub fn recall_previous(&mut self) -> Option<&str> {
        if self.history.is_empty() {
            return None;
        }
        let index = match self.recall {
            Some(0) => 0,
            Some(i) => i - 1,
            None => self.history.len() - 1,
        };
        self.recall = Some(index);
        self.history.get(index).map(String::as_str)
    }

    /// Step forward through history; `None` once past the newest line.
    pub fn recall_next(&mut self) -> Option<&str> {
        let index = self.recall? + 1;
        if index >= self.history.len() {
            self.recall = None;
            return None;
        }
        self.recall = Some(index);
        self.history.get(index).map(String::as_str)
    }

    pub fn complete(&self, partial: &str) -> Vec<String> {
        self.session.complete(partial)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            prompt: self.prompt(),
            scrollback: &self.scrollback,
            busy: self.is_busy(),
            branch_prompt: self.branch_prompt,
            hacking: self.is_hacking(),
        }
    }
}

struct NoOpener;

impl UrlOpener for NoOpener {
    fn open_in_new_tab(&mut self, _url: &str) {}
}

pub fn prompt(session: &Session, config: &TerminalConfig) -> String {
    match session.mode() {
        NavigationMode::Root => format!("{}@{}:~$ ", config.user, config.host),
        NavigationMode::ProjectView { .. } => {
            let slug = session
                .current_project()
                .map(|p| p.slug())
                .unwrap_or_default();
            format!("{}@{}:~/projects/{}$ ", config.user, config.host, slug)
        }
        NavigationMode::SecretView { path } => {
            format!("root@{}:{}# ", config.host, SecretTree::display_path(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::test_support::RecordingOpener;
    use crate::output::Body;

    fn shell() -> (Shell, RecordingOpener) {
        (Shell::default(), RecordingOpener::default())
    }

    fn last_output(shell: &Shell) -> Option<&CommandOutput> {
        shell.scrollback().iter().rev().find_map(|e| match e {
            Entry::Command { output, .. } => output.as_ref(),
            Entry::System { .. } => None,
        })
    }

    fn run_hack(shell: &mut Shell, plan: &HackPlan) -> Vec<HackProgress> {
        plan.schedule
            .iter()
            .map(|_| shell.advance_hack(plan.generation))
            .collect()
    }

    fn start_hack(shell: &mut Shell, o: &mut RecordingOpener) -> HackPlan {
        assert_eq!(shell.run("continue-game", o), Ok(ShellEvent::BranchPrompt));
        match shell.choose_branch(Branch::Infiltrate) {
            Ok(ShellEvent::HackStarted(plan)) => plan,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_starts_with_help_banner() {
        let (s, _) = shell();
        assert_eq!(s.scrollback().len(), 1);
        let out = last_output(&s).unwrap();
        assert_eq!(out.command, "help");
        assert_eq!(out.lines()[0], "Available commands:");
    }

    #[test]
    fn test_submit_serializes_commands() {
        let (mut s, mut o) = shell();
        assert_eq!(s.submit("cd 1"), Ok(100));
        assert!(s.is_busy());
        assert_eq!(s.submit("back"), Err(ShellError::Busy));
        assert_eq!(s.finish_pending(&mut o), Ok(ShellEvent::Output));
        assert!(!s.is_busy());
        assert_eq!(s.finish_pending(&mut o), Err(ShellError::NoPendingCommand));
        assert_eq!(s.session().mode(), &NavigationMode::ProjectView { index: 0 });
    }

    #[test]
    fn test_blank_submission_rejected() {
        let (mut s, _) = shell();
        assert_eq!(s.submit("   "), Err(ShellError::EmptyLine));
        assert_eq!(s.scrollback().len(), 1);
    }

    #[test]
    fn test_pending_entry_has_no_output_yet() {
        let (mut s, mut o) = shell();
        s.submit("about").unwrap();
        assert_eq!(
            s.scrollback().last(),
            Some(&Entry::Command {
                command: "about".into(),
                output: None
            })
        );
        s.finish_pending(&mut o).unwrap();
        assert!(last_output(&s).is_some());
    }

    #[test]
    fn test_clear_wipes_scrollback_and_state() {
        let (mut s, mut o) = shell();
        s.run("cd 2", &mut o).unwrap();
        assert_eq!(s.run("clear", &mut o), Ok(ShellEvent::Cleared));
        assert!(s.scrollback().is_empty());
        assert_eq!(s.session().mode(), &NavigationMode::Root);
        s.run("help", &mut o).unwrap();
        assert_eq!(last_output(&s).unwrap().lines()[0], "Available commands:");
    }

    #[test]
    fn test_continue_game_only_once() {
        let (mut s, mut o) = shell();
        assert_eq!(s.run("continue-game", &mut o), Ok(ShellEvent::BranchPrompt));
        assert!(s.branch_prompt_visible());
        assert_eq!(s.choose_branch(Branch::WalkAway), Ok(ShellEvent::GameOver));
        assert!(s.decision_made());

        assert_eq!(s.run("continue-game", &mut o), Ok(ShellEvent::Output));
        let out = last_output(&s).unwrap();
        assert_eq!(out.body, Body::Error("You've already made your decision.".into()));
        assert!(!s.branch_prompt_visible());
    }

    #[test]
    fn test_decision_survives_clear() {
        let (mut s, mut o) = shell();
        s.run("continue-game", &mut o).unwrap();
        s.choose_branch(Branch::WalkAway).unwrap();
        s.run("clear", &mut o).unwrap();
        s.run("continue-game", &mut o).unwrap();
        assert!(last_output(&s).unwrap().is_error());
    }

    #[test]
    fn test_choose_branch_requires_prompt() {
        let (mut s, _) = shell();
        assert_eq!(s.choose_branch(Branch::Infiltrate), Err(ShellError::NoBranchPrompt));
    }

    #[test]
    fn test_clear_hides_branch_prompt() {
        let (mut s, mut o) = shell();
        s.run("continue-game", &mut o).unwrap();
        s.run("clear", &mut o).unwrap();
        assert!(!s.branch_prompt_visible());
        assert!(!s.decision_made());
    }

    #[test]
    fn test_hack_unlocks_secret_area() {
        let (mut s, mut o) = shell();
        let plan = start_hack(&mut s, &mut o);
        assert!(s.is_hacking());
        let mut progress = vec![s.advance_hack(plan.generation)];
        s.run("cd 1", &mut o).unwrap();
        assert!(s.session().current_project().is_some());
        progress.extend(plan.schedule[1..].iter().map(|_| s.advance_hack(plan.generation)));
        assert!(matches!(progress.last(), Some(HackProgress::Unlocked(_))));
        assert!(progress[..progress.len() - 1]
            .iter()
            .all(|p| matches!(p, HackProgress::Line(_))));
        assert!(s.session().in_secret_area());
        assert!(s.session().current_project().is_none());
        assert!(!s.is_hacking());
        assert_eq!(s.prompt(), "root@portfolio:/top-secret# ");
        let system_lines = s
            .scrollback()
            .iter()
            .filter(|e| matches!(e, Entry::System { .. }))
            .count();
        assert_eq!(system_lines, plan.schedule.len());
    }

    #[test]
    fn test_mode_unchanged_until_final_step() {
        let (mut s, mut o) = shell();
        let plan = start_hack(&mut s, &mut o);
        for _ in 0..plan.schedule.len() - 1 {
            s.advance_hack(plan.generation);
            assert!(!s.session().in_secret_area());
        }
    }

    #[test]
    fn test_clear_cancels_hack() {
        let (mut s, mut o) = shell();
        let plan = start_hack(&mut s, &mut o);
        s.advance_hack(plan.generation);
        s.run("clear", &mut o).unwrap();
        assert!(!s.is_hacking());
        let progress = run_hack(&mut s, &plan);
        assert!(progress.iter().all(|p| *p == HackProgress::Stale));
        assert!(s.scrollback().is_empty());
        assert!(!s.session().in_secret_area());
    }

    #[test]
    fn test_abort_hack_keeps_scrollback() {
        let (mut s, mut o) = shell();
        let plan = start_hack(&mut s, &mut o);
        s.advance_hack(plan.generation);
        let before = s.scrollback().len();
        s.abort_hack();
        assert!(!s.is_hacking());
        assert!(s.decision_made());
        assert!(run_hack(&mut s, &plan).iter().all(|p| *p == HackProgress::Stale));
        assert_eq!(s.scrollback().len(), before);
        assert!(!s.session().in_secret_area());
    }

    #[test]
    fn test_commands_during_hack() {
        let (mut s, mut o) = shell();
        let plan = start_hack(&mut s, &mut o);
        s.advance_hack(plan.generation);
        s.run("projects", &mut o).unwrap();
        assert!(s.is_hacking());
        run_hack(&mut s, &plan);
        assert!(s.session().in_secret_area());
        s.run("cat backup-passwords.txt", &mut o).unwrap();
        assert_eq!(
            last_output(&s).unwrap().lines().last().map(String::as_str),
            Some("Password: 123456789")
        );
    }

    #[test]
    fn test_prompt_follows_mode() {
        let (mut s, mut o) = shell();
        assert_eq!(s.prompt(), "guest@portfolio:~$ ");
        s.run("cd 2", &mut o).unwrap();
        assert_eq!(s.prompt(), "guest@portfolio:~/projects/custom-c++-http-web-server$ ");
    }

    #[test]
    fn test_recall() {
        let (mut s, mut o) = shell();
        assert_eq!(s.recall_previous(), None);
        s.run("help", &mut o).unwrap();
        s.run("about", &mut o).unwrap();
        assert_eq!(s.recall_previous(), Some("about"));
        assert_eq!(s.recall_previous(), Some("help"));
        assert_eq!(s.recall_previous(), Some("help"));
        assert_eq!(s.recall_next(), Some("about"));
        assert_eq!(s.recall_next(), None);
        assert_eq!(s.recall_next(), None);
    }

    #[test]
    fn test_branch_from_str() {
        assert_eq!("Option-1".parse::<Branch>(), Ok(Branch::Infiltrate));
        assert_eq!("2".parse::<Branch>(), Ok(Branch::WalkAway));
        assert_eq!(
            "fight".parse::<Branch>(),
            Err(ShellError::UnknownBranch("fight".into()))
        );
    }

    #[test]
    fn test_snapshot_json() {
        let (mut s, mut o) = shell();
        s.run("cd 1", &mut o).unwrap();
        let json = serde_json::to_value(s.snapshot()).unwrap();
        assert_eq!(json["busy"], false);
        assert_eq!(json["scrollback"][1]["type"], "command");
        assert_eq!(json["scrollback"][1]["output"]["kind"], "list");
        assert_eq!(json["prompt"], "guest@portfolio:~/projects/dreamnet$ ");
    }
}
