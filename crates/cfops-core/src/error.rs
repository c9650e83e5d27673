// ── Core error types ──
//
// Errors surfaced by the resolution and orchestration layer. Transport
// and HTTP failures from cfops-api pass through unchanged in `Api`;
// everything else is a domain condition with a user-facing message.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::model::ResourceKind;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Resolution ───────────────────────────────────────────────────
    /// A named lookup found zero matches.
    #[error("{kind} {name} does not exist")]
    NotFound { kind: ResourceKind, name: String },

    /// A named lookup found more than one match in a scope where the
    /// server is supposed to enforce uniqueness.
    #[error("{kind} {name} is ambiguous ({matches} matches)")]
    AmbiguousResource {
        kind: ResourceKind,
        name: String,
        matches: usize,
    },

    #[error("No space targeted")]
    NoSpaceTargeted,

    // ── Jobs ─────────────────────────────────────────────────────────
    /// The server reported the job as failed.
    #[error("{error_code}({code}): {description}")]
    JobFailed {
        code: i64,
        error_code: String,
        description: String,
    },

    /// The job was still queued or running when the deadline passed.
    #[error("Job {job_id} did not complete within {}s", .waited.as_secs())]
    PollTimeout { job_id: String, waited: Duration },

    #[error("Operation cancelled")]
    Cancelled,

    // ── Aggregates ───────────────────────────────────────────────────
    /// One or more orphaned routes could not be deleted. Every route was
    /// still attempted.
    #[error(
        "{} orphaned route deletion(s) failed: {}",
        .failures.len(),
        summarize(.failures)
    )]
    OrphanedRouteDeletion { failures: Vec<RouteDeletionFailure> },

    // ── Input / configuration ────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── API (passed through) ─────────────────────────────────────────
    #[error(transparent)]
    Api(#[from] cfops_api::Error),
}

impl CoreError {
    pub fn not_found(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// A single route that `delete_orphaned_routes` failed to remove.
#[derive(Debug)]
pub struct RouteDeletionFailure {
    pub route_id: String,
    pub error: CoreError,
}

impl fmt::Display for RouteDeletionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "route {}: {}", self.route_id, self.error)
    }
}

fn summarize(failures: &[RouteDeletionFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_reads_like_a_sentence() {
        let err = CoreError::not_found(ResourceKind::Domain, "test-domain");
        assert_eq!(err.to_string(), "Domain test-domain does not exist");
        assert!(err.is_not_found());
    }

    #[test]
    fn job_failed_formats_code_context() {
        let err = CoreError::JobFailed {
            code: 1,
            error_code: "test-error-details-errorCode".into(),
            description: "test-error-details-description".into(),
        };
        assert_eq!(
            err.to_string(),
            "test-error-details-errorCode(1): test-error-details-description"
        );
    }

    #[test]
    fn orphan_failures_are_listed() {
        let err = CoreError::OrphanedRouteDeletion {
            failures: vec![RouteDeletionFailure {
                route_id: "route-2".into(),
                error: CoreError::Cancelled,
            }],
        };
        assert_eq!(
            err.to_string(),
            "1 orphaned route deletion(s) failed: route route-2: Operation cancelled"
        );
    }
}
