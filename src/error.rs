//! Crate-wide error taxonomy.
//!
//! Each layer owns its own error enum; [`DispatchError`] aggregates them for
//! callers that run the full pipeline. Only [`MasterError`] variants abort a
//! run — everything else is folded into a row's `AssignabilityStatus` and the
//! run continues.

use thiserror::Error;

/// Errors reading or caching master inputs (product/inspector/skill/vacation).
///
/// These are the only errors that abort a run.
#[derive(Debug, Error)]
pub enum MasterError {
 #[error("master input `{0}` could not be read")]
 Unreadable(String),

 #[error("required column `{column}` missing from `{source}`")]
 MissingColumn { source: String, column: String },

 #[error("disk cache I/O failed: {0}")]
 CacheIo(String),

 #[error("master snapshot serialization failed: {0}")]
 Serialization(#[from] serde_json::Error),
}

pub type MasterResult<T> = Result<T, MasterError>;

/// Errors surfaced while resolving the candidate lot set.
///
/// None of these abort a run; the resolver continues best-effort and the
/// condition is reported in the diagnostic stream.
#[derive(Debug, Error)]
pub enum ResolverError {
 #[error("inventory-lot structure for product `{0}` is missing expected fields")]
 MalformedInventory(String),

 #[error("advance registration for product `{0}` has no usable process filter")]
 EmptyAdvanceFilter(String),
}

pub type ResolverResult<T> = Result<T, ResolverError>;

/// Errors from the assignment engine's internal phases.
///
/// These never abort a run; they are recorded on the offending row as an
/// `AssignabilityStatus` and as a diagnostic.
#[derive(Debug, Error)]
pub enum EngineError {
 #[error("lot `{0}` has no resolvable seconds_per_unit")]
 UnresolvableSizing(String),

 #[error("row {0} has no candidate inspectors")]
 NoCandidates(usize),

 #[error("row {0} could not be repaired within the iteration cap")]
 UnrepairableViolation(usize),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Errors from the seat-chart publish/re-ingest boundary.
#[derive(Debug, Error)]
pub enum SeatingError {
 #[error("seat-chart lot `{lot_key}` could not be mapped back to any row")]
 UnmappedLot { lot_key: String },

 #[error("seat-chart JSON malformed: {0}")]
 Malformed(#[from] serde_json::Error),
}

pub type SeatingResult<T> = Result<T, SeatingError>;

/// Crate-level error aggregating every layer, for callers running the whole
/// pipeline (e.g. the `run_extraction` binary).
#[derive(Debug, Error)]
pub enum DispatchError {
 #[error(transparent)]
 Master(#[from] MasterError),

 #[error(transparent)]
 Resolver(#[from] ResolverError),

 #[error(transparent)]
 Engine(#[from] EngineError),

 #[error(transparent)]
 Seating(#[from] SeatingError),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
