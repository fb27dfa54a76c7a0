use serde::Serialize;

/// Control signals for the shell. These are never displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShellDirective {
    ClearTerminal,
    ContinueGame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Text,
    List,
    Error,
    Directive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "lowercase")]
pub enum Body {
    Text(String),
    List(Vec<String>),
    Error(String),
    Directive(ShellDirective),
}

/// Result of one command. `command` echoes the normalized input line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
    #[serde(flatten)]
    pub body: Body,
    pub command: String,
}

impl CommandOutput {
    pub fn text(command: &str, content: impl Into<String>) -> Self {
        Self::new(command, Body::Text(content.into()))
    }
    pub fn list<S: Into<String>>(command: &str, lines: impl IntoIterator<Item = S>) -> Self {
        Self::new(command, Body::List(lines.into_iter().map(Into::into).collect()))
    }
    pub fn error(command: &str, message: impl Into<String>) -> Self {
        Self::new(command, Body::Error(message.into()))
    }
    pub fn directive(command: &str, directive: ShellDirective) -> Self {
        Self::new(command, Body::Directive(directive))
    }
    /// Output for a blank line: empty text, no command echo.
    pub fn empty() -> Self {
        Self::text("", "")
    }
    fn new(command: &str, body: Body) -> Self {
        CommandOutput {
            body,
            command: command.to_string(),
        }
    }

    pub fn kind(&self) -> OutputKind {
        match self.body {
            Body::Text(_) => OutputKind::Text,
            Body::List(_) => OutputKind::List,
            Body::Error(_) => OutputKind::Error,
            Body::Directive(_) => OutputKind::Directive,
        }
    }

    pub fn directive_kind(&self) -> Option<ShellDirective> {
        match self.body {
            Body::Directive(d) => Some(d),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind() == OutputKind::Error
    }

    /// Displayable lines; a directive has none.
    pub fn lines(&self) -> Vec<String> {
        match &self.body {
            Body::Text(s) | Body::Error(s) => s.lines().map(str::to_string).collect(),
            Body::List(lines) => lines.clone(),
            Body::Directive(_) => Vec::new(),
        }
    }
}
