//! Probe runs against a real PostgreSQL server.
//!
//! Skipped unless `PROBE_LIVE_TEST` is set. The target is read from the
//! usual `DB_*` variables.

use std::time::Duration;

use pg_connection_probe::config::{ConnectionConfig, ProbeConfig};
use pg_connection_probe::postgres::{connect_options, PostgresBackend};
use pg_connection_probe::probe::{ConnectionProbe, RetryPolicy, PROBE_TABLE};
use sqlx::{Connection, PgConnection};

fn live_config() -> Option<ConnectionConfig> {
    if std::env::var("PROBE_LIVE_TEST").is_err() {
        eprintln!("PROBE_LIVE_TEST not set. Skipping live PostgreSQL test.");
        return None;
    }
    Some(ConnectionConfig::from_env().expect("load DB_* configuration"))
}

#[tokio::test]
async fn live_probe_inserts_one_row_per_run() {
    let Some(config) = live_config() else {
        return;
    };
    let probe = ConnectionProbe::new(
        PostgresBackend::from_config(&ProbeConfig::default()),
        config.clone(),
        RetryPolicy::new(5, Duration::from_secs(2)),
    );

    let first = probe.execute(Vec::new()).await;
    assert!(first.success, "first run failed: {:?}", first.attempts);
    assert_eq!(first.attempt_count(), 1);

    let second = probe.execute(Vec::new()).await;
    assert!(second.success, "second run failed: {:?}", second.attempts);

    let first_total = first.verification.unwrap().total_rows;
    let second_total = second.verification.unwrap().total_rows;
    assert_eq!(second_total, first_total + 1);

    let mut conn = PgConnection::connect_with(&connect_options(&config))
        .await
        .expect("connect for table check");
    let exists: bool = sqlx::query_scalar("SELECT to_regclass($1) IS NOT NULL")
        .bind(PROBE_TABLE)
        .fetch_one(&mut conn)
        .await
        .expect("table lookup");
    assert!(exists);
    conn.close().await.expect("close");
}

#[tokio::test]
async fn live_probe_closed_port_is_retried() {
    let Some(config) = live_config() else {
        return;
    };
    let config = ConnectionConfig { port: 1, ..config };
    let probe = ConnectionProbe::new(
        PostgresBackend::new(Duration::from_secs(5)),
        config,
        RetryPolicy::new(2, Duration::from_millis(100)),
    );

    let report = probe.execute(Vec::new()).await;
    assert!(!report.success);
    assert_eq!(report.attempt_count(), 2);
}
