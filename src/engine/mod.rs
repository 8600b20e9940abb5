//! The Lot-to-Inspector Assignment Engine: sizing, crew selection, repair,
//! and fairness rebalance.

pub mod orchestrator;
pub mod rebalance;
pub mod repair;
pub mod selection;
pub mod sizing;

pub use orchestrator::{AssignmentEngine, RunResult};
pub use rebalance::rebalance;
pub use repair::{detect_violations, repair_row, RepairOutcome, Violation, ViolationKind};
pub use selection::{derive_candidates, passes_filters, select_crew, Candidate, CrewSelection};
pub use sizing::{size_lot, unsized_row, SizedLot};
