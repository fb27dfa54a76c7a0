use thiserror::Error;

use crate::output::CommandOutput;

/// Every way a command can fail. Rendered as output, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Command not found: {0}. Type 'help' for available commands.")]
    UnknownCommand(String),
    #[error("Command not found: {0}. Use goto, github, info, or back.")]
    UnknownProjectCommand(String),
    #[error("Project '{0}' not found. Use 'projects' to see available projects.")]
    ProjectNotFound(String),
    #[error("No project numbered {index}. Pick 1-{count}; use 'projects' to see available projects.")]
    ProjectOutOfRange { index: i64, count: usize },
    #[error("{0}")]
    Unavailable(&'static str),
    #[error("{0}: No such file or directory")]
    SecretNotFound(String),
    #[error("You've already made your decision.")]
    DecisionAlreadyMade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    NotFound,
    InvalidArgument,
    Unavailable,
}

impl CommandError {
    pub fn class(&self) -> ErrorClass {
        match self {
            CommandError::ProjectOutOfRange { .. } => ErrorClass::InvalidArgument,
            CommandError::Unavailable(_) | CommandError::DecisionAlreadyMade => {
                ErrorClass::Unavailable
            }
            _ => ErrorClass::NotFound,
        }
    }

    /// Missing links are informational, so they render as plain text.
    pub fn into_output(self, command: &str) -> CommandOutput {
        match self {
            CommandError::Unavailable(msg) => CommandOutput::text(command, msg),
            other => CommandOutput::error(command, other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("a command is still running")]
    Busy,
    #[error("empty input")]
    EmptyLine,
    #[error("no command is pending")]
    NoPendingCommand,
    #[error("no decision is being offered")]
    NoBranchPrompt,
    #[error("unknown branch '{0}'")]
    UnknownBranch(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid terminal config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid log filter '{0}'")]
    LogFilter(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputKind;

    #[test]
    fn test_unavailable_renders_as_text() {
        let out = CommandError::Unavailable("Not currently publicly deployed").into_output("goto");
        assert_eq!(out.kind(), OutputKind::Text);
        assert_eq!(out.lines(), vec!["Not currently publicly deployed"]);
    }

    #[test]
    fn test_not_found_renders_as_error() {
        let err = CommandError::ProjectNotFound("..".into());
        assert_eq!(err.class(), ErrorClass::NotFound);
        let out = err.into_output("cd ..");
        assert!(out.is_error());
        assert!(out.lines()[0].contains("not found"));
    }

    #[test]
    fn test_out_of_range_is_invalid_argument() {
        let err = CommandError::ProjectOutOfRange { index: 0, count: 3 };
        assert_eq!(err.class(), ErrorClass::InvalidArgument);
        assert!(err.to_string().contains("'projects'"));
    }
}
