//! Single PostgreSQL connection used by the probe.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;

use crate::config::{ConnectionConfig, ProbeConfig};
use crate::error::{ProbeError, VerifyStep};
use crate::probe::{InsertedRow, ProbeBackend, ProbeSession};

const APPLICATION_NAME: &str = "pg-connection-probe";

/// Opens one unpooled `PgConnection` per attempt.
#[derive(Debug, Clone)]
pub struct PostgresBackend {
    connect_timeout: Duration,
}

impl PostgresBackend {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(config.connect_timeout())
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}

/// Build driver options from the probe configuration.
pub fn connect_options(config: &ConnectionConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.database)
        .username(&config.user)
        .password(&config.password)
        .application_name(APPLICATION_NAME)
}

/// `user@host:port/database`, for logs.
pub fn display_target(config: &ConnectionConfig) -> String {
    format!(
        "{}@{}:{}/{}",
        config.user, config.host, config.port, config.database
    )
}

#[async_trait]
impl ProbeBackend for PostgresBackend {
    async fn connect(
        &self,
        config: &ConnectionConfig,
    ) -> Result<Box<dyn ProbeSession>, ProbeError> {
        let options = connect_options(config);

        let conn = tokio::time::timeout(self.connect_timeout, PgConnection::connect_with(&options))
            .await
            .map_err(|_| ProbeError::ConnectTimeout(self.connect_timeout.as_secs()))?
            .map_err(ProbeError::Connection)?;

        tracing::debug!(target_db = %display_target(config), "PostgreSQL connection opened");

        Ok(Box::new(PostgresSession { conn: Some(conn) }))
    }
}

pub struct PostgresSession {
    conn: Option<PgConnection>,
}

impl PostgresSession {
    fn conn(&mut self, step: VerifyStep) -> Result<&mut PgConnection, ProbeError> {
        self.conn
            .as_mut()
            .ok_or_else(|| ProbeError::verification(step, sqlx::Error::PoolClosed))
    }
}

#[async_trait]
impl ProbeSession for PostgresSession {
    async fn server_version(&mut self) -> Result<String, ProbeError> {
        let step = VerifyStep::ServerVersion;
        let conn = self.conn(step)?;

        sqlx::query_scalar::<_, String>("SELECT version()")
            .fetch_one(conn)
            .await
            .map_err(|e| ProbeError::verification(step, e))
    }

    async fn ensure_table(&mut self) -> Result<(), ProbeError> {
        let step = VerifyStep::CreateTable;
        let conn = self.conn(step)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS test_table (
                id SERIAL PRIMARY KEY,
                name VARCHAR(100),
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(conn)
        .await
        .map_err(|e| ProbeError::verification(step, e))?;

        tracing::debug!("Probe table ensured");
        Ok(())
    }

    async fn insert_row(&mut self, name: &str) -> Result<InsertedRow, ProbeError> {
        let step = VerifyStep::InsertRow;
        let conn = self.conn(step)?;

        let mut tx = conn
            .begin()
            .await
            .map_err(|e| ProbeError::verification(step, e))?;

        let (id, name, created_at): (i32, String, NaiveDateTime) = sqlx::query_as(
            r#"
            INSERT INTO test_table (name) VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| ProbeError::verification(step, e))?;

        tx.commit()
            .await
            .map_err(|e| ProbeError::verification(step, e))?;

        Ok(InsertedRow {
            id,
            name,
            created_at,
        })
    }

    async fn count_rows(&mut self) -> Result<i64, ProbeError> {
        let step = VerifyStep::CountRows;
        let conn = self.conn(step)?;

        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM test_table")
            .fetch_one(conn)
            .await
            .map_err(|e| ProbeError::verification(step, e))
    }

    async fn close(&mut self) -> Result<(), ProbeError> {
        if let Some(conn) = self.conn.take() {
            conn.close()
                .await
                .map_err(|e| ProbeError::verification(VerifyStep::Close, e))?;
            tracing::debug!("PostgreSQL connection closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_options_from_config() {
        let config = ConnectionConfig {
            host: "db.example".to_string(),
            port: 6543,
            database: "ci".to_string(),
            user: "runner".to_string(),
            password: "secret".to_string(),
        };
        let options = connect_options(&config);

        assert_eq!(options.get_host(), "db.example");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_database(), Some("ci"));
        assert_eq!(options.get_username(), "runner");
    }

    #[test]
    fn test_display_target_has_no_password() {
        let config = ConnectionConfig {
            password: "secret123".to_string(),
            ..ConnectionConfig::default()
        };
        let target = display_target(&config);
        assert_eq!(target, "testuser@localhost:5432/testdb");
        assert!(!target.contains("secret123"));
    }

    #[test]
    fn test_backend_timeout_from_config() {
        let backend = PostgresBackend::from_config(&ProbeConfig {
            connect_timeout_seconds: 3,
            ..ProbeConfig::default()
        });
        assert_eq!(backend.connect_timeout(), Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_refused_connection_is_retryable() {
        let config = ConnectionConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            ..ConnectionConfig::default()
        };
        let backend = PostgresBackend::new(Duration::from_secs(5));

        let err = match backend.connect(&config).await {
            Ok(_) => panic!("nothing should be listening on port 1"),
            Err(e) => e,
        };
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_closed_session_reports_step() {
        let mut session = PostgresSession { conn: None };
        let err = session.count_rows().await.unwrap_err();
        assert!(!err.is_retryable());
        assert!(err.to_string().starts_with("count_rows failed"));

        // Closing an already closed session is a no-op.
        assert!(session.close().await.is_ok());
    }
}
