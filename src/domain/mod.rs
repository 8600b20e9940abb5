//! Domain model: entities and tagged types shared by every subsystem
//!.

pub mod assignment;
pub mod daily_state;
pub mod fixed_pin;
pub mod inspector;
pub mod lot;
pub mod product;
pub mod skill;
pub mod types;
pub mod vacation;

pub use assignment::{AssignmentRow, CrewMember, MAX_CREW_SIZE};
pub use daily_state::{compare_least_loaded, is_same_day_scoped, DailyState};
pub use fixed_pin::{FixedPinRegistry, FixedPinRule};
pub use inspector::Inspector;
pub use lot::{Lot, LotIdentity};
pub use product::{ProductMaster, ProductProcessRate};
pub use skill::{SkillLevel, SkillMatrix, SkillRow};
pub use types::{next_business_day, AssignabilityStatus, Provenance, ShippingDate, ShippingDateClass};
pub use vacation::VacationSchedule;
