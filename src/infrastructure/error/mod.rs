//! Probe error types and their classification.
//!
//! Every failure the probe can hit falls in one of two buckets: a
//! connection-level failure, which is retried, or an unexpected failure,
//! which ends the probe immediately.

use std::fmt;

use thiserror::Error;

/// A verification step executed after the connection is established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyStep {
    ServerVersion,
    CreateTable,
    InsertRow,
    CountRows,
    Close,
}

impl VerifyStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerifyStep::ServerVersion => "server_version",
            VerifyStep::CreateTable => "create_table",
            VerifyStep::InsertRow => "insert_row",
            VerifyStep::CountRows => "count_rows",
            VerifyStep::Close => "close",
        }
    }
}

impl fmt::Display for VerifyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ProbeError {
    /// The connection could not be opened (network, auth, availability).
    #[error("{0}")]
    Connection(#[source] sqlx::Error),

    #[error("connection timed out after {0} seconds")]
    ConnectTimeout(u64),

    /// A query failed after the connection was established.
    #[error("{step} failed: {source}")]
    Verification {
        step: VerifyStep,
        #[source]
        source: sqlx::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ProbeError {
    pub fn verification(step: VerifyStep, source: sqlx::Error) -> Self {
        ProbeError::Verification { step, source }
    }

    /// Whether another connection attempt may fix this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProbeError::Connection(_) | ProbeError::ConnectTimeout(_)
        )
    }

    /// Short label naming the kind of failure, printed next to the message.
    pub fn classification(&self) -> &'static str {
        match self {
            ProbeError::Connection(_) => "connection_error",
            ProbeError::ConnectTimeout(_) => "connect_timeout",
            ProbeError::Verification { source, .. } => classify_sqlx(source),
            ProbeError::Config(_) => "config_error",
        }
    }
}

fn classify_sqlx(err: &sqlx::Error) -> &'static str {
    match err {
        sqlx::Error::Database(db) => match db.code().as_deref().map(sqlstate_class) {
            Some("42") => "syntax_or_access_error",
            Some("23") => "integrity_error",
            Some("22") => "data_error",
            Some("08") => "connection_exception",
            _ => "database_error",
        },
        sqlx::Error::RowNotFound => "row_not_found",
        sqlx::Error::ColumnNotFound(_) | sqlx::Error::ColumnIndexOutOfBounds { .. } => {
            "column_error"
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => "decode_error",
        sqlx::Error::Protocol(_) => "protocol_error",
        sqlx::Error::Io(_) => "io_error",
        sqlx::Error::Tls(_) => "tls_error",
        _ => "unexpected_error",
    }
}

fn sqlstate_class(code: &str) -> &str {
    code.get(..2).unwrap_or(code)
}

pub type Result<T> = std::result::Result<T, ProbeError>;
