//! Tracing subscriber bootstrap shared by the service and the CLI.

use bookstore_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::{
    fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Build the filter: `RUST_LOG` when set, the configured directive otherwise.
pub fn env_filter(settings: &TelemetrySettings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.filter))
}

/// Install the global subscriber, logging to stdout.
///
/// Returns `false` when a subscriber was already installed (tests, repeated
/// bootstrap); that is not an error.
pub fn init(settings: &TelemetrySettings) -> bool {
    init_with_writer(settings, std::io::stdout)
}

/// Install the global subscriber with a custom sink (the CLI logs to stderr).
pub fn init_with_writer<W>(settings: &TelemetrySettings, writer: W) -> bool
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry().with(env_filter(settings));

    let installed = match settings.log_format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(writer),
            )
            .try_init()
            .is_ok(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .json()
                    .flatten_event(true)
                    .with_current_span(true),
            )
            .try_init()
            .is_ok(),
    };

    if installed {
        tracing::info!(
            target: "bookstore-telemetry",
            format = ?settings.log_format,
            "telemetry initialized"
        );
    }

    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_tolerated() {
        let settings = TelemetrySettings::default();
        let _ = init(&settings);
        assert!(!init(&settings));
    }
}
