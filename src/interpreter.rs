use tracing::{debug, info};

use crate::config::TerminalConfig;
use crate::content::{self, PortfolioView, Profile, Project};
use crate::error::CommandError;
use crate::output::{CommandOutput, ShellDirective};
use crate::secret::{SecretNode, SecretTree, EASTER_EGG_FOLDER};

const HELP_MENU: &[&str] = &[
    "Available commands:",
    "  help        - See a list of available commands",
    "  clear       - Clear the terminal",
    "  about       - Display info about me",
    "  projects    - List available projects",
    "  photography - Navigate to photo portfolio",
    "  contact     - Show contact information",
];

const PROJECT_MENU: &[&str] = &[
    "Available commands:",
    "  goto    - Open project link in browser (if deployed)",
    "  github  - Navigate to GitHub repository",
    "  info    - Get project information and details",
    "  back    - Return to project list",
];

const NAV_HINT: &str = "Type cd [project-name-or-number] to navigate to a particular project";
const SECRET_HINT: &str = "Use 'cd <folder>' or 'cat <file>' to open an entry, 'back' to leave.";

const ROOT_COMMANDS: &[&str] = &[
    "about",
    "cd",
    "clear",
    "contact",
    "help",
    "motd",
    "photography",
    "projects",
    "whoami",
];
const PROJECT_COMMANDS: &[&str] = &["back", "cd", "clear", "github", "goto", "info"];
const SECRET_COMMANDS: &[&str] = &["back", "cat", "cd", "clear", "help", "ls"];

/// Opens a URL in a new top-level browsing context.
pub trait UrlOpener {
    fn open_in_new_tab(&mut self, url: &str);
}

/// Where the session currently is. Project focus and the secret area exclude each other.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NavigationMode {
    #[default]
    Root,
    ProjectView {
        index: usize,
    },
    SecretView {
        path: Vec<String>,
    },
}

/// Read-only tables the interpreter consults.
pub struct Catalog {
    pub profile: Profile,
    pub projects: Vec<Project>,
    pub secrets: SecretTree,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::portfolio()
    }
}

impl Catalog {
    pub fn portfolio() -> Self {
        Catalog {
            profile: content::profile(),
            projects: content::projects(),
            secrets: SecretTree::classified(),
        }
    }

    pub fn view(&self) -> PortfolioView<'_> {
        PortfolioView {
            profile: &self.profile,
            projects: &self.projects,
        }
    }
}

type Step = (NavigationMode, CommandOutput);

pub struct Interpreter {
    catalog: Catalog,
    photography_url: Option<String>,
    easter_egg_url: String,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Catalog::default(), &TerminalConfig::default())
    }
}

impl Interpreter {
    pub fn new(catalog: Catalog, config: &TerminalConfig) -> Self {
        Interpreter {
            catalog,
            photography_url: config.photography_url.clone(),
            easter_egg_url: config.easter_egg_url.clone(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Run one line against `mode`, returning the next mode and the output.
    pub fn step(
        &self,
        mode: &NavigationMode,
        line: &str,
        opener: &mut dyn UrlOpener,
    ) -> (NavigationMode, CommandOutput) {
        let cmd = line.trim().to_lowercase();
        if cmd.is_empty() {
            return (mode.clone(), CommandOutput::empty());
        }
        debug!(?mode, command = %cmd, "dispatch");
        let result = match mode {
            NavigationMode::SecretView { path } => self.secret_command(path, &cmd, opener),
            _ if cmd.starts_with("cd ") => self.change_project(&cmd),
            NavigationMode::ProjectView { index } => self.project_command(*index, &cmd, opener),
            NavigationMode::Root => self.general_command(&cmd, opener),
        };
        result.unwrap_or_else(|err| {
            debug!(error = %err, "command rejected");
            (mode.clone(), err.into_output(&cmd))
        })
    }

    fn change_project(&self, cmd: &str) -> Result<Step, CommandError> {
        let target = cmd["cd ".len()..].trim();
        let projects = &self.catalog.projects;
        let index = match target.parse::<i64>() {
            Ok(n) if n >= 1 && (n as usize) <= projects.len() => (n - 1) as usize,
            Ok(n) => {
                return Err(CommandError::ProjectOutOfRange {
                    index: n,
                    count: projects.len(),
                })
            }
            Err(_) => projects
                .iter()
                .position(|p| p.slug().eq_ignore_ascii_case(target))
                .ok_or_else(|| CommandError::ProjectNotFound(target.into()))?,
        };
        let project = &projects[index];
        info!(project = %project.title, "entered project view");
        let mut lines = vec![format!("Navigated to {} project", project.title), String::new()];
        lines.extend(PROJECT_MENU.iter().map(|l| l.to_string()));
        Ok((
            NavigationMode::ProjectView { index },
            CommandOutput::list(cmd, lines),
        ))
    }

    fn project_command(
        &self,
        index: usize,
        cmd: &str,
        opener: &mut dyn UrlOpener,
    ) -> Result<Step, CommandError> {
        let Some(project) = self.catalog.projects.get(index) else {
            return self.general_command(cmd, opener);
        };
        let here = NavigationMode::ProjectView { index };
        let out = match cmd {
            "goto" => {
                let url = project
                    .link
                    .as_deref()
                    .ok_or(CommandError::Unavailable("Not currently publicly deployed"))?;
                open(opener, url);
                CommandOutput::text(cmd, format!("Opened {} in new tab", project.title))
            }
            "github" => {
                let url = project
                    .github
                    .as_deref()
                    .ok_or(CommandError::Unavailable("GitHub repository not available"))?;
                open(opener, url);
                CommandOutput::text(cmd, format!("Opened {} GitHub in new tab", project.title))
            }
            "info" => CommandOutput::text(
                cmd,
                format!(
                    "{}\n\n{}\n\nTech: {}",
                    project.display_title(),
                    project.description,
                    project.technologies.join(", ")
                ),
            ),
            "back" => {
                info!("left project view");
                let mut lines = vec![
                    "Returned to project list".to_string(),
                    String::new(),
                    NAV_HINT.to_string(),
                    String::new(),
                ];
                lines.extend(self.project_index());
                return Ok((NavigationMode::Root, CommandOutput::list(cmd, lines)));
            }
            "clear" => return Ok(clear(cmd)),
            _ => return Err(CommandError::UnknownProjectCommand(cmd.into())),
        };
        Ok((here, out))
    }

    fn general_command(&self, cmd: &str, opener: &mut dyn UrlOpener) -> Result<Step, CommandError> {
        let profile = &self.catalog.profile;
        let out = match cmd {
            "help" => CommandOutput::list(cmd, HELP_MENU.iter().copied()),
            "clear" => return Ok(clear(cmd)),
            "about" | "whoami" => CommandOutput::text(
                cmd,
                format!("{} - {}\n\n{}", profile.name, profile.title, profile.bio),
            ),
            "projects" => {
                let mut lines = vec![NAV_HINT.to_string(), String::new()];
                lines.extend(self.project_index());
                CommandOutput::list(cmd, lines)
            }
            "photography" => match &self.photography_url {
                Some(url) => {
                    open(opener, url);
                    CommandOutput::text(cmd, "Opened photography portfolio in new tab")
                }
                None => CommandOutput::text(cmd, "Photography portfolio coming soon..."),
            },
            "contact" => {
                let c = &profile.contact;
                let mut lines = vec![
                    "Contact Information:".to_string(),
                    format!("  Email: {}", c.email),
                    format!("  GitHub: {}", c.github),
                    format!("  LinkedIn: {}", c.linkedin),
                ];
                if let Some(twitter) = &c.twitter {
                    lines.push(format!("  Twitter: {}", twitter));
                }
                if let Some(instagram) = &c.instagram {
                    lines.push(format!("  Instagram: {}", instagram));
                }
                CommandOutput::list(cmd, lines)
            }
            "continue-game" => CommandOutput::directive(cmd, ShellDirective::ContinueGame),
            "motd" => CommandOutput::text(
                cmd,
                format!(
                    "Welcome to {}'s Terminal Portfolio!\n\n\
                     Type 'help' to see available commands.\n\
                     Type 'about' to learn more about me.\n\
                     Type 'projects' to view my work.\n\
                     Type 'contact' to get in touch.\n\n\
                     Happy exploring!",
                    profile.name
                ),
            ),
            _ => return Err(CommandError::UnknownCommand(cmd.into())),
        };
        Ok((NavigationMode::Root, out))
    }

    fn secret_command(
        &self,
        path: &[String],
        cmd: &str,
        opener: &mut dyn UrlOpener,
    ) -> Result<Step, CommandError> {
        let here = NavigationMode::SecretView {
            path: path.to_vec(),
        };
        let folder = self
            .catalog
            .secrets
            .resolve_segments(path)
            .unwrap_or_else(|| self.catalog.secrets.root());
        match cmd {
            "ls" => {
                let mut lines: Vec<String> =
                    folder.children().iter().map(SecretNode::display_name).collect();
                lines.push(String::new());
                lines.push(SECRET_HINT.to_string());
                Ok((here, CommandOutput::list(cmd, lines)))
            }
            "ls -la" => {
                let mut lines = self.catalog.secrets.list_detailed(folder);
                lines.push(String::new());
                lines.push(SECRET_HINT.to_string());
                Ok((here, CommandOutput::list(cmd, lines)))
            }
            "help" => {
                let mut lines: Vec<String> = [
                    "Top-secret directory commands:",
                    "  ls          - List classified files",
                    "  ls -la      - List classified files with details",
                    "  cat <file>  - Read a file",
                    "  cd <folder> - Open a folder",
                    "  back        - Leave the top-secret directory",
                    "  clear       - Clear the terminal and leave",
                    "",
                ]
                .iter()
                .map(|l| l.to_string())
                .collect();
                lines.push(format!("Files in {}:", SecretTree::display_path(path)));
                lines.extend(
                    folder
                        .children()
                        .iter()
                        .map(|c| format!("  {}", c.display_name())),
                );
                Ok((here, CommandOutput::list(cmd, lines)))
            }
            "clear" => {
                info!("left secret area");
                Ok(clear(cmd))
            }
            _ if leaves_secret_area(cmd) => {
                info!("left secret area");
                Ok((
                    NavigationMode::Root,
                    CommandOutput::text(cmd, "Access revoked. Returning to main terminal."),
                ))
            }
            _ => {
                let target = cmd
                    .strip_prefix("cd ")
                    .or_else(|| cmd.strip_prefix("cat "))
                    .map(str::trim);
                match target {
                    Some(target) => self.open_secret(path, target, cmd, opener),
                    None => self
                        .open_secret(path, cmd, cmd, opener)
                        .map_err(|_| CommandError::UnknownCommand(cmd.into())),
                }
            }
        }
    }

    fn open_secret(
        &self,
        path: &[String],
        target: &str,
        cmd: &str,
        opener: &mut dyn UrlOpener,
    ) -> Result<Step, CommandError> {
        let secrets = &self.catalog.secrets;
        let segments = secrets.normalize(path, target);
        let node = secrets
            .resolve_segments(&segments)
            .ok_or_else(|| CommandError::SecretNotFound(target.trim_end_matches('/').into()))?;
        let here = NavigationMode::SecretView {
            path: path.to_vec(),
        };
        match node {
            SecretNode::Folder { name, .. } if name.eq_ignore_ascii_case(EASTER_EGG_FOLDER) => {
                open(opener, &self.easter_egg_url);
                Ok((
                    here,
                    CommandOutput::text(cmd, "Decrypting sensitive-images/... opened in new tab"),
                ))
            }
            SecretNode::Folder { children, .. } => {
                let mut lines: Vec<String> = children.iter().map(SecretNode::display_name).collect();
                lines.push(String::new());
                lines.push(SECRET_HINT.to_string());
                Ok((
                    NavigationMode::SecretView { path: segments },
                    CommandOutput::list(cmd, lines),
                ))
            }
            SecretNode::File { content, .. } => {
                Ok((here, CommandOutput::list(cmd, content.iter().cloned())))
            }
        }
    }

    fn project_index(&self) -> impl Iterator<Item = String> + '_ {
        self.catalog
            .projects
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{}\t{}", i + 1, p.title))
    }

    /// Command names and arguments valid in `mode` that start with `partial`.
    pub fn complete(&self, mode: &NavigationMode, partial: &str) -> Vec<String> {
        let partial = partial.trim_start().to_lowercase();
        if let Some(arg) = partial.strip_prefix("cd ").or_else(|| partial.strip_prefix("cat ")) {
            let verb = &partial[..partial.len() - arg.len()];
            let candidates: Vec<String> = match mode {
                NavigationMode::SecretView { path } => self
                    .catalog
                    .secrets
                    .resolve_segments(path)
                    .map(|f| f.children().iter().map(SecretNode::display_name).collect())
                    .unwrap_or_default(),
                _ if verb == "cd " => self.catalog.projects.iter().map(Project::slug).collect(),
                _ => Vec::new(),
            };
            return candidates
                .into_iter()
                .filter(|c| c.starts_with(arg))
                .map(|c| format!("{}{}", verb, c))
                .collect();
        }
        let commands = match mode {
            NavigationMode::Root => ROOT_COMMANDS,
            NavigationMode::ProjectView { .. } => PROJECT_COMMANDS,
            NavigationMode::SecretView { .. } => SECRET_COMMANDS,
        };
        let mut matches: Vec<String> = commands
            .iter()
            .filter(|c| c.starts_with(partial.as_str()))
            .map(|c| c.to_string())
            .collect();
        if let NavigationMode::SecretView { path } = mode {
            if let Some(folder) = self.catalog.secrets.resolve_segments(path) {
                matches.extend(
                    folder
                        .children()
                        .iter()
                        .map(SecretNode::display_name)
                        .filter(|n| n.starts_with(partial.as_str())),
                );
            }
        }
        matches
    }
}

fn clear(cmd: &str) -> Step {
    (
        NavigationMode::Root,
        CommandOutput::directive(cmd, ShellDirective::ClearTerminal),
    )
}

/// `back`, or a step up to or past the top-secret root (`cd ..`, `cd ../`, `cd /`, bare `..`).
fn leaves_secret_area(cmd: &str) -> bool {
    if cmd == "back" {
        return true;
    }
    let target = cmd.strip_prefix("cd ").map(str::trim).unwrap_or(cmd);
    matches!(target, ".." | "../" | "/")
}

fn open(opener: &mut dyn UrlOpener, url: &str) {
    info!(url, "opening external link");
    opener.open_in_new_tab(url);
}

/// Interpreter plus the mode it is currently in.
pub struct Session {
    interpreter: Interpreter,
    mode: NavigationMode,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Interpreter::default())
    }
}

impl Session {
    pub fn new(interpreter: Interpreter) -> Self {
        Session {
            interpreter,
            mode: NavigationMode::Root,
        }
    }

    pub fn execute(&mut self, line: &str, opener: &mut dyn UrlOpener) -> CommandOutput {
        let (mode, out) = self.interpreter.step(&self.mode, line, opener);
        if mode != self.mode {
            debug!(from = ?self.mode, to = ?mode, "mode change");
        }
        self.mode = mode;
        out
    }

    pub fn mode(&self) -> &NavigationMode {
        &self.mode
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn current_project(&self) -> Option<&Project> {
        match self.mode {
            NavigationMode::ProjectView { index } => self.interpreter.catalog.projects.get(index),
            _ => None,
        }
    }

    pub fn in_secret_area(&self) -> bool {
        matches!(self.mode, NavigationMode::SecretView { .. })
    }

    pub fn reset(&mut self) {
        self.mode = NavigationMode::Root;
    }

    /// Only the shell's hacking sequence may call this; no command text reaches it.
    pub(crate) fn enter_secret_area(&mut self) {
        info!("entered secret area");
        self.mode = NavigationMode::SecretView { path: Vec::new() };
    }

    pub fn complete(&self, partial: &str) -> Vec<String> {
        self.interpreter.complete(&self.mode, partial)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::UrlOpener;

    #[derive(Default)]
    pub struct RecordingOpener {
        pub opened: Vec<String>,
    }

    impl UrlOpener for RecordingOpener {
        fn open_in_new_tab(&mut self, url: &str) {
            self.opened.push(url.to_string());
        }
    }
}
