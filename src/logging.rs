use std::io::IsTerminal;
use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "retag=debug"
    } else {
        "retag=info"
    }
}

/// Initialize logging to stderr, keeping stdout for the confirmation line.
///
/// `RUST_LOG` takes precedence over `verbose`. ANSI colors are only used when
/// stderr is a terminal.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let result = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();

    if let Err(e) = result {
        // Already initialized, e.g. by a test harness
        eprintln!("Warning: Logger initialization failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false), "retag=info");
        assert_eq!(default_filter(true), "retag=debug");
    }
}
