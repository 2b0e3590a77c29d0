use std::process::ExitCode;

use anyhow::{Context, Result};

use pg_connection_probe::config::Settings;
use pg_connection_probe::postgres::PostgresBackend;
use pg_connection_probe::probe::{ConnectionProbe, RetryPolicy};
use pg_connection_probe::telemetry;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // Initialize tracing
    telemetry::init_tracing().context("failed to initialize tracing")?;

    // Load configuration
    let settings = Settings::new().context("failed to load probe configuration")?;
    tracing::debug!(database = ?settings.database, probe = ?settings.probe, "Configuration loaded");

    let probe = ConnectionProbe::new(
        PostgresBackend::from_config(&settings.probe),
        settings.database,
        RetryPolicy::from_config(&settings.probe),
    );

    if probe.run().await {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
