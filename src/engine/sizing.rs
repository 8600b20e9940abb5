//! Phase 0: Sizing — inspection time, crew size, per-slot time.

use crate::config::EngineConfig;
use crate::domain::{AssignabilityStatus, AssignmentRow, Lot, ProductMaster};

/// Compute `inspection_time_hours`, `required_crew_size`, and
/// `divided_time` for one lot. Returns `None` when `seconds_per_unit` is
/// unresolvable (the lot is reported, not silently dropped, by the caller).
pub fn size_lot(lot: &Lot, products: &ProductMaster, config: &EngineConfig) -> Option<SizedLot> {
 if lot.is_zero_quantity() {
 return None;
 }
 let process_number = lot.current_process_number.as_deref().unwrap_or("");
 let seconds_per_unit = products.seconds_per_unit(&lot.product_number, process_number)?;

 let inspection_time_hours = seconds_per_unit * lot.lot_quantity as f64 / 3600.0;
 let required_crew_size = if inspection_time_hours <= config.h_required {
 1
 } else {
 (2usize).max((inspection_time_hours / config.h_required).floor() as usize + 1)
 };
 let divided_time = inspection_time_hours / required_crew_size as f64;

 Some(SizedLot {
 inspection_time_hours,
 required_crew_size,
 divided_time,
 })
}

pub struct SizedLot {
 pub inspection_time_hours: f64,
 pub required_crew_size: usize,
 pub divided_time: f64,
}

/// Build the initial (unstaffed) row for a zero-quantity or unsizable lot
///.
pub fn unsized_row(lot: Lot) -> AssignmentRow {
 AssignmentRow {
 lot,
 inspection_time_hours: 0.0,
 required_crew_size: 0,
 divided_time: 0.0,
 slots: Vec::new(),
 assignability_status: AssignabilityStatus::UnassignedNoCandidate,
 }
}
