//! Three-stage duplicate-lot reconciliation under a strict provenance
//! priority rule.

pub mod deduper;

pub use deduper::{DedupOptions, LotDeduper};
