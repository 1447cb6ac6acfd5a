//! Invalidation operation types.
//!
//! `clear_one` carries a URL; `clear_all` and `clear_object` take no payload.
//! All three answer with an [`InvalidationResponse`].

use serde::{Deserialize, Serialize};

/// clear_one request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearOneRequest {
    /// Absolute URL whose cached page should be dropped.
    pub url: String,
}

/// Outcome of an invalidation, as reported on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationStatus {
    Success,
    NotFound,
    PartialFailure,
    Disabled,
    InvalidInput,
    IoFailure,
}

impl InvalidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::NotFound => "not_found",
            Self::PartialFailure => "partial_failure",
            Self::Disabled => "disabled",
            Self::InvalidInput => "invalid_input",
            Self::IoFailure => "io_failure",
        }
    }

    /// Whether the operation achieved what was asked.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Counters from a bulk purge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeSummary {
    pub files_removed: u64,
    pub dirs_removed: u64,
    /// Entries that disappeared before we got to them.
    pub vanished: u64,
    pub failures: u64,
}

/// Response payload for every invalidation operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvalidationResponse {
    pub status: InvalidationStatus,
    /// Human-readable message suitable for an admin notice.
    pub message: String,
    /// Cache file path targeted by clear_one, when the URL parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Bulk purge counters (clear_all only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<PurgeSummary>,
}

impl InvalidationResponse {
    pub fn new(status: InvalidationStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            path: None,
            summary: None,
        }
    }
}
