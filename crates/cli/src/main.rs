use anyhow::Result;
use bookstore_kernel::settings::{LogFormat, TelemetrySettings};
use clap::Parser;

use bookstore_cli::{commands, Cli};

fn main() -> Result<()> {
    // stdout is reserved for command output
    bookstore_telemetry::init_with_writer(
        &TelemetrySettings {
            log_format: LogFormat::Pretty,
            filter: "warn".to_string(),
        },
        std::io::stderr,
    );

    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(commands::execute(cli))
}
