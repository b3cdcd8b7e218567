//! Log initialization for the binary. Logs go to stderr so `--json` output
//! on stdout stays machine-readable.

use crate::args::LogFormatArg;
use std::sync::Once;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Installs the global subscriber. `RUST_LOG` controls levels (default
/// `info`). Later calls are no-ops.
pub fn init_logging(format: LogFormatArg) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        match format {
            LogFormatArg::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().json().with_writer(std::io::stderr))
                    .init();
            }
            LogFormatArg::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        fmt::layer()
                            .with_target(false)
                            .with_writer(std::io::stderr),
                    )
                    .init();
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_logging(LogFormatArg::Pretty);
        init_logging(LogFormatArg::Json);
        tracing::info!("logging initialized");
    }
}
