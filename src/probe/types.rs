use chrono::NaiveDateTime;

use crate::error::ProbeError;

/// Row returned by the probe insert.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertedRow {
    pub id: i32,
    pub name: String,
    pub created_at: NaiveDateTime,
}

/// Outcome of one connection attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptResult {
    /// Connected and every verification step passed.
    Succeeded { server_version: String },
    Failed {
        classification: &'static str,
        message: String,
        retryable: bool,
    },
}

impl AttemptResult {
    pub fn failed(err: &ProbeError) -> Self {
        AttemptResult::Failed {
            classification: err.classification(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AttemptResult::Succeeded { .. })
    }
}

/// Data gathered by a successful verification run.
#[derive(Debug, Clone, PartialEq)]
pub struct Verification {
    pub server_version: String,
    pub inserted: InsertedRow,
    pub total_rows: i64,
}

/// Everything a probe run produced.
#[derive(Debug, Clone, Default)]
pub struct ProbeReport {
    pub success: bool,
    pub attempts: Vec<AttemptResult>,
    pub verification: Option<Verification>,
}

impl ProbeReport {
    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }
}
