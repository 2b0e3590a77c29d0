//! Human-readable progress output.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use crate::config::ConnectionConfig;
use crate::error::ProbeError;

use super::types::InsertedRow;

const BANNER_WIDTH: usize = 60;

/// Writes probe progress lines to a sink.
///
/// Write errors are dropped; the exit status carries the result.
pub struct Console<W: Write> {
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        let _ = self.out.write_fmt(args);
        let _ = self.out.write_all(b"\n");
    }

    fn banner(&mut self, message: fmt::Arguments<'_>) {
        let rule = "=".repeat(BANNER_WIDTH);
        self.line(format_args!("\n{}", rule));
        self.line(message);
        self.line(format_args!("{}", rule));
        let _ = self.out.flush();
    }

    /// Print the resolved target. The password is never written.
    pub fn header(&mut self, config: &ConnectionConfig) {
        self.line(format_args!("Testing connection to PostgreSQL database..."));
        self.line(format_args!("Host: {}", config.host));
        self.line(format_args!("Port: {}", config.port));
        self.line(format_args!("Database: {}", config.database));
        self.line(format_args!("User: {}", config.user));
    }

    pub fn attempt(&mut self, attempt: u32, max_attempts: u32) {
        self.line(format_args!(
            "\nConnection attempt {}/{}...",
            attempt, max_attempts
        ));
        let _ = self.out.flush();
    }

    pub fn connected(&mut self, server_version: &str) {
        self.line(format_args!("✓ Connected successfully!"));
        self.line(format_args!("PostgreSQL version: {}", server_version));
    }

    pub fn table_created(&mut self) {
        self.line(format_args!("✓ Created test table successfully!"));
    }

    pub fn inserted(&mut self, row: &InsertedRow) {
        self.line(format_args!(
            "✓ Inserted test record: ID={}, Name={}, Created={}",
            row.id, row.name, row.created_at
        ));
    }

    pub fn counted(&mut self, total: i64) {
        self.line(format_args!("✓ Query successful! Total records: {}", total));
    }

    pub fn connection_failed(&mut self, attempt: u32, err: &ProbeError) {
        self.line(format_args!(
            "✗ Connection attempt {} failed: {}",
            attempt, err
        ));
    }

    pub fn retrying(&mut self, delay: Duration) {
        self.line(format_args!("Retrying in {} seconds...", delay.as_secs()));
        let _ = self.out.flush();
    }

    pub fn unexpected(&mut self, err: &ProbeError) {
        self.line(format_args!("✗ Unexpected error: {}", err));
        self.banner(format_args!("FAILED: {}: {}", err.classification(), err));
    }

    pub fn success(&mut self) {
        self.banner(format_args!("SUCCESS: All database tests passed!"));
    }

    pub fn exhausted(&mut self) {
        self.banner(format_args!(
            "FAILED: Could not connect to database after all retries"
        ));
    }
}
