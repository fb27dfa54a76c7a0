const SCRIPT: &[&str] = &[
    "Initializing breach protocol...",
    "Scanning ports: 22 open, 80 open, 443 open",
    "Bypassing firewall [##########] 100%",
    "Cracking password hash... found: 123456789",
    "Escalating privileges... uid=0(root)",
    "Mounting /top-secret ...",
    "ACCESS GRANTED. Type 'ls' to view classified files.",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HackStep {
    pub delay_ms: u32,
    pub line: String,
}

/// What a timer tick produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HackProgress {
    Line(String),
    /// The last line; the caller must unlock the secret area now.
    Unlocked(String),
    /// Tick from a cancelled or finished run.
    Stale,
}

/// One run of the scripted "hacking" output. Steps are consumed in order;
/// each run has a generation so callbacks from an older run can be told apart.
#[derive(Debug, Clone)]
pub struct HackSequence {
    generation: u64,
    steps: Vec<HackStep>,
    index: usize,
    cancelled: bool,
}

impl HackSequence {
    pub fn new(generation: u64, step_delay_ms: u32) -> Self {
        HackSequence {
            generation,
            steps: SCRIPT
                .iter()
                .map(|line| HackStep {
                    delay_ms: step_delay_ms,
                    line: (*line).to_string(),
                })
                .collect(),
            index: 0,
            cancelled: false,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn steps(&self) -> &[HackStep] {
        &self.steps
    }

    /// Offsets from the start of the run at which each step fires.
    pub fn schedule(&self) -> Vec<u32> {
        self.steps
            .iter()
            .scan(0u32, |at, step| {
                *at = at.saturating_add(step.delay_ms);
                Some(*at)
            })
            .collect()
    }

    pub fn is_active(&self) -> bool {
        !self.cancelled && self.index < self.steps.len()
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Consume the next step if `generation` belongs to this run.
    pub fn advance(&mut self, generation: u64) -> HackProgress {
        if generation != self.generation || !self.is_active() {
            return HackProgress::Stale;
        }
        let line = self.steps[self.index].line.clone();
        self.index += 1;
        if self.index == self.steps.len() {
            HackProgress::Unlocked(line)
        } else {
            HackProgress::Line(line)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_to_unlock() {
        let mut seq = HackSequence::new(1, 10);
        let total = seq.steps().len();
        for _ in 0..total - 1 {
            assert!(matches!(seq.advance(1), HackProgress::Line(_)));
        }
        assert!(matches!(seq.advance(1), HackProgress::Unlocked(_)));
        assert!(!seq.is_active());
        assert_eq!(seq.advance(1), HackProgress::Stale);
    }

    #[test]
    fn test_cancel_stops_remaining_steps() {
        let mut seq = HackSequence::new(3, 10);
        seq.advance(3);
        seq.cancel();
        assert_eq!(seq.advance(3), HackProgress::Stale);
    }

    #[test]
    fn test_other_generation_is_stale() {
        let mut seq = HackSequence::new(2, 10);
        assert_eq!(seq.advance(1), HackProgress::Stale);
        assert!(matches!(seq.advance(2), HackProgress::Line(_)));
    }

    #[test]
    fn test_schedule_is_cumulative() {
        let seq = HackSequence::new(0, 250);
        let schedule = seq.schedule();
        assert_eq!(schedule.len(), seq.steps().len());
        assert_eq!(schedule[0], 250);
        assert_eq!(schedule[2], 750);
    }
}
