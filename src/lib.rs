//! Lot-to-inspector assignment engine for the visual-inspection dispatch
//! workflow: shortage resolution, lot deduplication, and constraint-based
//! crew assignment.

pub mod config;
pub mod dedup;
pub mod domain;
pub mod engine;
pub mod error;
pub mod logging;
pub mod master;
pub mod seating;
pub mod shortage;

pub use config::EngineConfig;
pub use dedup::{DedupOptions, LotDeduper};
pub use domain::{
    AssignabilityStatus, AssignmentRow, CrewMember, DailyState, FixedPinRegistry, FixedPinRule,
    Inspector, Lot, LotIdentity, ProductMaster, Provenance, ShippingDate, SkillMatrix,
    VacationSchedule,
};
pub use engine::{AssignmentEngine, RunResult};
pub use error::{DispatchError, DispatchResult};
pub use master::{MasterLoader, MasterSnapshot, MasterStore};
pub use seating::{Seat, SeatChart, SeatLot, SeatingBridge};
pub use shortage::ShortageResolver;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
