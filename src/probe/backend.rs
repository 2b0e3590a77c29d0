//! Backend seam between the probe loop and the database driver.

use async_trait::async_trait;

use crate::config::ConnectionConfig;
use crate::error::ProbeError;

use super::types::InsertedRow;

/// Table the probe creates and writes to.
pub const PROBE_TABLE: &str = "test_table";

/// Name stored in every row the probe inserts.
pub const PROBE_ROW_NAME: &str = "Test from Windows Runner";

/// Opens sessions against a database.
#[async_trait]
pub trait ProbeBackend: Send + Sync {
    /// Open a new session. Any error returned here is treated as a
    /// connection-level failure when it is retryable.
    async fn connect(&self, config: &ConnectionConfig)
        -> Result<Box<dyn ProbeSession>, ProbeError>;
}

/// One open connection, driven through the fixed verification sequence.
#[async_trait]
pub trait ProbeSession: Send {
    async fn server_version(&mut self) -> Result<String, ProbeError>;

    /// Create the probe table if it does not exist yet.
    async fn ensure_table(&mut self) -> Result<(), ProbeError>;

    /// Insert one row and commit it.
    async fn insert_row(&mut self, name: &str) -> Result<InsertedRow, ProbeError>;

    async fn count_rows(&mut self) -> Result<i64, ProbeError>;

    /// Close the connection. Calling it twice is a no-op.
    async fn close(&mut self) -> Result<(), ProbeError>;
}
