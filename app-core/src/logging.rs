//! Logging setup.
//!
//! Library code logs through the `log` macros. The host installs one
//! subscriber at startup with [`init_logging`]; `log` records are forwarded
//! to it.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install a formatted subscriber. `RUST_LOG` overrides `default_level`.
///
/// Returns `false` when a subscriber was already installed, which makes it
/// safe to call from every test or entry point.
pub fn init_logging(default_level: Level) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str().to_lowercase()));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("Logging initialized at {}", default_level);
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging(Level::DEBUG);
        assert!(!init_logging(Level::INFO));
        log::info!("log records still go somewhere");
    }
}
