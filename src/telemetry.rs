use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::ConfigError;

#[cfg(target_arch = "wasm32")]
mod console {
    use std::io;
    use tracing_subscriber::fmt::MakeWriter;

    /// Collects one formatted event and hands it to the browser console on drop.
    pub struct ConsoleWriter {
        buf: Vec<u8>,
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            if self.buf.is_empty() {
                return;
            }
            let line = String::from_utf8_lossy(&self.buf);
            web_sys::console::log_1(&line.trim_end().into());
        }
    }

    #[derive(Clone, Copy, Default)]
    pub struct ConsoleMakeWriter;

    impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
        type Writer = ConsoleWriter;

        fn make_writer(&'a self) -> Self::Writer {
            ConsoleWriter { buf: Vec::new() }
        }
    }
}

/// Install the global subscriber. Later calls keep the first one.
pub fn init(filter: &str) -> Result<(), ConfigError> {
    let env_filter =
        EnvFilter::try_new(filter).map_err(|_| ConfigError::LogFilter(filter.to_string()))?;
    // wasm32-unknown-unknown has no clock for timestamps
    let layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_ansi(false)
        .with_target(true);
    #[cfg(target_arch = "wasm32")]
    let layer = layer.with_writer(console::ConsoleMakeWriter);
    #[cfg(not(target_arch = "wasm32"))]
    let layer = layer.with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_repeatable() {
        assert!(init("portfolio_terminal=debug").is_ok());
        assert!(init("portfolio_terminal=info").is_ok());
    }

    #[test]
    fn test_init_rejects_bad_filter() {
        assert!(matches!(
            init("portfolio_terminal=loud"),
            Err(ConfigError::LogFilter(_))
        ));
    }
}
