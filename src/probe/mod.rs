//! Connect-and-verify probe.
//!
//! The probe opens a connection with a bounded number of attempts and a
//! fixed delay between them. Once connected it runs a fixed verification
//! sequence:
//!
//! 1. `SELECT version()`
//! 2. create the probe table if it is missing
//! 3. insert one row and commit
//! 4. count the rows in the table
//!
//! Only failures to connect are retried. A failure after the connection is
//! up ends the probe immediately.

mod backend;
mod report;
mod retry;
mod types;

use std::io::Write;

pub use backend::{ProbeBackend, ProbeSession, PROBE_ROW_NAME, PROBE_TABLE};
pub use report::Console;
pub use retry::RetryPolicy;
pub use types::{AttemptResult, InsertedRow, ProbeReport, Verification};

use crate::config::ConnectionConfig;
use crate::error::ProbeError;

pub struct ConnectionProbe<B> {
    backend: B,
    config: ConnectionConfig,
    policy: RetryPolicy,
}

impl<B: ProbeBackend> ConnectionProbe<B> {
    pub fn new(backend: B, config: ConnectionConfig, policy: RetryPolicy) -> Self {
        Self {
            backend,
            config,
            policy,
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run the probe, printing progress to stdout.
    ///
    /// Returns `true` only if a connection was made and every
    /// verification step passed.
    pub async fn run(&self) -> bool {
        self.execute(std::io::stdout()).await.success
    }

    /// Run the probe, printing progress to `out`.
    pub async fn execute<W: Write>(&self, out: W) -> ProbeReport {
        let mut console = Console::new(out);
        let mut report = ProbeReport::default();
        let max_attempts = self.policy.max_attempts();

        console.header(&self.config);

        for attempt in self.policy.attempts() {
            console.attempt(attempt, max_attempts);
            tracing::info!(
                attempt,
                max_attempts,
                host = %self.config.host,
                port = self.config.port,
                "Connecting to PostgreSQL"
            );

            let mut session = match self.backend.connect(&self.config).await {
                Ok(session) => session,
                Err(e) if e.is_retryable() => {
                    tracing::warn!(attempt, error = %e, "Connection attempt failed");
                    console.connection_failed(attempt, &e);
                    report.attempts.push(AttemptResult::failed(&e));

                    if self.policy.has_remaining(attempt) {
                        console.retrying(self.policy.delay());
                        tokio::time::sleep(self.policy.delay()).await;
                        continue;
                    }

                    tracing::error!(attempts = attempt, "Connection retries exhausted");
                    console.exhausted();
                    return report;
                }
                Err(e) => {
                    tracing::error!(attempt, error = %e, "Probe failed while connecting");
                    console.unexpected(&e);
                    report.attempts.push(AttemptResult::failed(&e));
                    return report;
                }
            };

            match verify(session.as_mut(), &mut console).await {
                Ok(verification) => {
                    tracing::info!(
                        total_rows = verification.total_rows,
                        inserted_id = verification.inserted.id,
                        "Probe succeeded"
                    );
                    report.attempts.push(AttemptResult::Succeeded {
                        server_version: verification.server_version.clone(),
                    });
                    report.verification = Some(verification);
                    report.success = true;
                    console.success();
                }
                Err(e) => {
                    if let Err(close_err) = session.close().await {
                        tracing::warn!(error = %close_err, "Failed to close connection after error");
                    }
                    tracing::error!(
                        attempt,
                        classification = e.classification(),
                        error = %e,
                        "Probe verification failed"
                    );
                    console.unexpected(&e);
                    report.attempts.push(AttemptResult::failed(&e));
                }
            }
            return report;
        }

        report
    }
}

async fn verify<W: Write>(
    session: &mut dyn ProbeSession,
    console: &mut Console<W>,
) -> Result<Verification, ProbeError> {
    let server_version = session.server_version().await?;
    console.connected(&server_version);

    session.ensure_table().await?;
    console.table_created();

    let inserted = session.insert_row(PROBE_ROW_NAME).await?;
    console.inserted(&inserted);

    let total_rows = session.count_rows().await?;
    console.counted(total_rows);

    session.close().await?;

    Ok(Verification {
        server_version,
        inserted,
        total_rows,
    })
}
