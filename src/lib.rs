pub mod config;
pub mod content;
pub mod error;
pub mod hack;
pub mod interpreter;
pub mod output;
pub mod secret;
pub mod shell;
pub mod system;
pub mod telemetry;
pub mod timers;

pub use interpreter::{Interpreter, NavigationMode, Session, UrlOpener};
pub use output::{CommandOutput, ShellDirective};
pub use shell::Shell;
pub use system::PortfolioTerminal;
