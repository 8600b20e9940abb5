//! `SeatingBridge`: publishes the assignment table as a seat-chart JSON and
//! re-ingests operator edits back into it.
//!
//! Deliberately decoupled from `AssignmentEngine` — it only ever reads and
//! writes `AssignmentRow`s, never the `DailyState`/`MasterSnapshot` the
//! engine needs, so the core pipeline stays testable without any seat-chart
//! I/O.

use crate::domain::{AssignabilityStatus, AssignmentRow, CrewMember};
use crate::error::{SeatingError, SeatingResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatLot {
 pub lot_id: Option<String>,
 pub lot_key: String,
 pub source_row_index: usize,
 pub source_row_key: String,
 /// Which numbered inspector column (`"inspector_1"`, …) this lot came
 /// from; `None` when a whole row — not one slot — is being referenced.
 pub source_inspector_col: Option<String>,
 pub product_number: String,
 pub product_name: String,
 pub shipping_date: String,
 pub inspection_time: f64,
 /// The seated inspector's skill level for this lot, carried through so a
 /// no-edit re-ingest reproduces the original `team_info` label exactly.
 /// `None` for unassigned-lot entries and for new-product-team picks.
 pub skill_level: Option<u8>,
 /// Whether this slot was filled from the new-product team rather than a
 /// skill-matrix pick; also carried through for `team_info` fidelity.
 pub is_new_team_pick: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
 pub id: String,
 pub name: String,
 pub row: u32,
 pub col: u32,
 pub lots: Vec<SeatLot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SeatChart {
 pub seats: Vec<Seat>,
 pub unassigned_lots: Vec<SeatLot>,
}

/// Stable identity for a row, independent of its position in the table:
/// `production_lot_id` when present, else the composite fallback used
/// throughout dedup.
fn row_key(row: &AssignmentRow) -> String {
 row.lot
.production_lot_id()
.map(str::to_string)
.unwrap_or_else(|| {
 let (machine, instruction_date, _) = row.lot.distinguishing_key();
 format!("{}|{}|{}", row.lot.product_number, machine, instruction_date)
 })
}

pub struct SeatingBridge;

impl SeatingBridge {
 /// Build the seat-chart JSON from the engine's output table.
 /// One seat per distinct inspector appearing in an assigned row, ordered
 /// by `inspector_id` for a deterministic layout.
 pub fn publish(rows: &[AssignmentRow]) -> SeatChart {
 let mut seats: Vec<Seat> = Vec::new();
 let mut unassigned_lots = Vec::new();

 for (row_index, row) in rows.iter().enumerate() {
 if row.assignability_status != AssignabilityStatus::Assigned || row.slots.is_empty() {
 if row.required_crew_size > 0 {
 unassigned_lots.push(seat_lot(row, row_index, None, None));
 }
 continue;
 }

 for (slot_index, member) in row.slots.iter().enumerate() {
 let seat_lot = seat_lot(row, row_index, Some(inspector_column(slot_index)), Some(member));
 let seat = seats
.iter()
.position(|s| s.id == member.inspector_id)
.unwrap_or_else(|| {
 seats.push(Seat {
 id: member.inspector_id.clone(),
 name: member.name.clone(),
 row: seats.len() as u32,
 col: 0,
 lots: Vec::new(),
 });
 seats.len() - 1
 });
 seats[seat].lots.push(seat_lot);
 }
 }

 seats.sort_by(|a, b| a.id.cmp(&b.id));
 SeatChart { seats, unassigned_lots }
 }

 /// Re-map a seat chart back onto `rows`: seats first by `(source_row_key,
 /// source_inspector_col)`, falling back to `lot_key`; any lot now in
 /// `unassigned_lots` clears the matching slot, or the whole row when
 /// `source_inspector_col` is empty. `crew_size`/`divided_time`
 /// are recomputed per row afterward.
 pub fn reingest(chart: &SeatChart, rows: &mut [AssignmentRow]) -> SeatingResult<()> {
 for seat in &chart.seats {
 for lot in &seat.lots {
 let row = find_row_mut(rows, lot)?;
 apply_seat(row, seat, lot);
 }
 }

 for lot in &chart.unassigned_lots {
 let row = find_row_mut(rows, lot)?;
 match &lot.source_inspector_col {
 Some(col) => clear_slot(row, col),
 None => row.release(AssignabilityStatus::UnassignedNoCandidate),
 }
 }

 for row in rows.iter_mut() {
 recompute_divided_time(row);
 }

 Ok(())
 }
}

fn seat_lot(
 row: &AssignmentRow,
 row_index: usize,
 source_inspector_col: Option<String>,
 member: Option<&CrewMember>,
) -> SeatLot {
 let key = row_key(row);
 SeatLot {
 lot_id: row.lot.production_lot_id().map(str::to_string),
 lot_key: key.clone(),
 source_row_index: row_index,
 source_row_key: key,
 source_inspector_col,
 product_number: row.lot.product_number.clone(),
 product_name: row.lot.product_name.clone(),
 shipping_date: row.lot.shipping_date.to_string(),
 inspection_time: row.inspection_time_hours,
 skill_level: member.and_then(|m| m.skill_level),
 is_new_team_pick: member.map(|m| m.is_new_team_pick).unwrap_or(false),
 }
}

fn inspector_column(slot_index: usize) -> String {
 format!("inspector_{}", slot_index + 1)
}

fn find_row_mut<'a>(rows: &'a mut [AssignmentRow], lot: &SeatLot) -> SeatingResult<&'a mut AssignmentRow> {
 if let Some(index) = rows.iter().position(|r| row_key(r) == lot.source_row_key) {
 return Ok(&mut rows[index]);
 }
 if let Some(index) = rows.iter().position(|r| row_key(r) == lot.lot_key) {
 return Ok(&mut rows[index]);
 }
 Err(SeatingError::UnmappedLot { lot_key: lot.lot_key.clone() })
}

fn apply_seat(row: &mut AssignmentRow, seat: &Seat, lot: &SeatLot) {
 let member = CrewMember {
 inspector_id: seat.id.clone(),
 name: seat.name.clone(),
 skill_level: lot.skill_level,
 is_new_team_pick: lot.is_new_team_pick,
 };
 match &lot.source_inspector_col {
 Some(col) => {
 if let Some(index) = slot_index_for_column(col) {
 while row.slots.len() <= index {
 row.slots.push(member.clone());
 }
 row.slots[index] = member;
 }
 }
 None => {
 row.slots = vec![member];
 }
 }
 if row.assignability_status != AssignabilityStatus::Assigned {
 row.assignability_status = AssignabilityStatus::Assigned;
 }
}

fn clear_slot(row: &mut AssignmentRow, col: &str) {
 if let Some(index) = slot_index_for_column(col) {
 if index < row.slots.len() {
 row.slots.remove(index);
 }
 }
 if row.slots.is_empty() {
 row.release(AssignabilityStatus::UnassignedNoCandidate);
 }
}

fn slot_index_for_column(col: &str) -> Option<usize> {
 col.strip_prefix("inspector_")?.parse::<usize>().ok()?.checked_sub(1)
}

/// Keep `crew_size`/`divided_time` consistent with the slots actually
/// present after an edit.
fn recompute_divided_time(row: &mut AssignmentRow) {
 let crew_size = row.slots.len();
 if crew_size == 0 {
 row.divided_time = 0.0;
 return;
 }
 row.divided_time = row.inspection_time_hours / crew_size as f64;
}

#[cfg(test)]
mod tests {
 use super::*;
 use crate::domain::{Lot, LotIdentity, Provenance, ShippingDate};
 use chrono::NaiveDate;

 fn sample_row() -> AssignmentRow {
 AssignmentRow {
 lot: Lot {
 identity: LotIdentity::ProductionLotId("L1".into()),
 product_number: "P1".into(),
 product_name: "Widget".into(),
 customer: "Acme".into(),
 shipping_date: ShippingDate::Date(NaiveDate::from_ymd_opt(2026, 7, 29).unwrap()),
 lot_quantity: 360,
 instruction_date: None,
 machine: None,
 current_process_number: Some("10".into()),
 current_process_name: "Final".into(),
 secondary_process: None,
 provenance: Provenance::Normal,
 },
 inspection_time_hours: 6.0,
 required_crew_size: 2,
 divided_time: 3.0,
 slots: vec![
 CrewMember { inspector_id: "A".into(), name: "Ann".into(), skill_level: Some(3), is_new_team_pick: false },
 CrewMember { inspector_id: "B".into(), name: "Bo".into(), skill_level: Some(1), is_new_team_pick: false },
 ],
 assignability_status: AssignabilityStatus::Assigned,
 }
 }

 #[test]
 fn publish_then_reingest_with_no_edits_is_a_no_op() {
 let rows = vec![sample_row()];
 let chart = SeatingBridge::publish(&rows);

 let mut roundtripped = rows.clone();
 SeatingBridge::reingest(&chart, &mut roundtripped).unwrap();

 assert_eq!(roundtripped[0].crew_size(), rows[0].crew_size());
 assert_eq!(roundtripped[0].divided_time, rows[0].divided_time);
 let mut before_ids: Vec<&str> = rows[0].slots.iter().map(|m| m.inspector_id.as_str()).collect();
 let mut after_ids: Vec<&str> = roundtripped[0].slots.iter().map(|m| m.inspector_id.as_str()).collect();
 before_ids.sort();
 after_ids.sort();
 assert_eq!(before_ids, after_ids);
 assert_eq!(roundtripped[0].team_info(), rows[0].team_info());
 }

 #[test]
 fn unassigned_with_empty_column_clears_whole_row() {
 let rows = vec![sample_row()];
 let row_key_value = row_key(&rows[0]);
 let chart = SeatChart {
 seats: Vec::new(),
 unassigned_lots: vec![SeatLot {
 lot_id: Some("L1".into()),
 lot_key: row_key_value.clone(),
 source_row_index: 0,
 source_row_key: row_key_value,
 source_inspector_col: None,
 product_number: "P1".into(),
 product_name: "Widget".into(),
 shipping_date: "2026-07-29".into(),
 inspection_time: 6.0,
 skill_level: None,
 is_new_team_pick: false,
 }],
 };

 let mut edited = rows.clone();
 SeatingBridge::reingest(&chart, &mut edited).unwrap();
 assert!(edited[0].slots.is_empty());
 assert_eq!(edited[0].assignability_status, AssignabilityStatus::UnassignedNoCandidate);
 }

 #[test]
 fn unmapped_lot_key_is_reported_not_silently_dropped() {
 let rows = vec![sample_row()];
 let chart = SeatChart {
 seats: Vec::new(),
 unassigned_lots: vec![SeatLot {
 lot_id: None,
 lot_key: "does-not-exist".into(),
 source_row_index: 0,
 source_row_key: "does-not-exist".into(),
 source_inspector_col: None,
 product_number: "P9".into(),
 product_name: "Ghost".into(),
 shipping_date: "2026-07-29".into(),
 inspection_time: 1.0,
 skill_level: None,
 is_new_team_pick: false,
 }],
 };
 let mut edited = rows;
 assert!(SeatingBridge::reingest(&chart, &mut edited).is_err());
 }
}
