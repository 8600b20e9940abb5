//! Runtime-settable engine parameters.
//!
//! Unlike the teacher's `config::ConfigManager`, this is an in-memory,
//! DB-free struct: reading configuration from an external store is an
//! explicit non-goal collaborator here. Values are passed by reference into
//! every phase rather than read from a global.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Tunable parameters for the assignment pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
 /// Same-part cumulative daily cap, in hours (default 4.0).
 pub h_product: f64,
 /// Inspection-time pivot above which crew size grows past 1 (default 3.0).
 pub h_required: f64,
 /// Work-hour slack subtracted from every cap check (default 0.05).
 pub epsilon: f64,
 /// Fairness-rebalance trigger ratio relative to the mean (default 0.15).
 pub imbalance_threshold_ratio: f64,
 /// Max iterations of the Phase 2 repair loop (default 10).
 pub repair_iteration_cap: u32,
 /// Max reassignments performed during Phase 3 rebalance (default 50).
 pub rebalance_cap: u32,
 /// Midday break window subtracted from shift span when contained.
 pub break_start: NaiveTime,
 pub break_end: NaiveTime,
}

impl Default for EngineConfig {
 fn default() -> Self {
 Self {
 h_product: 4.0,
 h_required: 3.0,
 epsilon: 0.05,
 imbalance_threshold_ratio: 0.15,
 repair_iteration_cap: 10,
 rebalance_cap: 50,
 break_start: NaiveTime::from_hms_opt(12, 15, 0).expect("valid constant time"),
 break_end: NaiveTime::from_hms_opt(13, 0, 0).expect("valid constant time"),
 }
 }
}

impl EngineConfig {
 /// Length of the break window, in hours.
 pub fn break_duration_hours(&self) -> f64 {
 (self.break_end - self.break_start).num_minutes() as f64 / 60.0
 }
}
