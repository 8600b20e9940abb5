//! Phase 2: violation repair.

use super::selection::{derive_candidates, passes_filters};
use crate::config::EngineConfig;
use crate::domain::{
 AssignabilityStatus, AssignmentRow, CrewMember, DailyState, MAX_CREW_SIZE,
};
use crate::master::MasterSnapshot;
use chrono::NaiveDate;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum ViolationKind {
 OverCap,
 OverPart(String),
}

#[derive(Debug, Clone)]
pub struct Violation {
 pub row_index: usize,
 pub inspector_id: String,
 pub kind: ViolationKind,
 pub excess: f64,
}

/// Scan every assigned row for over-cap or over-part inspectors, attributing
/// each inspector's worst violation to a single offending row — the
/// inspector's own latest-ship-date assignment of the violated kind. Duplicate
/// violations landing on the same row collapse to the larger excess.
pub fn detect_violations(
 rows: &[AssignmentRow],
 snapshot: &MasterSnapshot,
 config: &EngineConfig,
 today: NaiveDate,
) -> Vec<Violation> {
 let state = DailyState::recompute_from_rows(rows, today);
 let mut by_row: std::collections::HashMap<usize, Violation> = std::collections::HashMap::new();

 for inspector in &snapshot.inspectors {
 let id = &inspector.inspector_id;
 let max_hours = inspector.max_daily_hours(config);
 let mut worst: Option<(f64, ViolationKind)> = None;

 let total = state.daily_hours_of(id);
 if total > max_hours - config.epsilon {
 worst = Some((total - (max_hours - config.epsilon), ViolationKind::OverCap));
 }

 if let Some(by_product) = state.product_hours.get(id) {
 for (product, hours) in by_product {
 if *hours > config.h_product {
 let excess = hours - config.h_product;
 let replace = worst.as_ref().map(|(e, _)| excess > *e).unwrap_or(true);
 if replace {
 worst = Some((excess, ViolationKind::OverPart(product.clone())));
 }
 }
 }
 }

 let Some((excess, kind)) = worst else { continue };
 let product_filter = match &kind {
 ViolationKind::OverPart(p) => Some(p.as_str()),
 ViolationKind::OverCap => None,
 };
 let Some(row_index) = offending_row_index(rows, id, product_filter, today) else {
 continue;
 };

 by_row
.entry(row_index)
.and_modify(|existing| {
 if excess > existing.excess {
 *existing = Violation {
 row_index,
 inspector_id: id.clone(),
 kind: kind.clone(),
 excess,
 };
 }
 })
.or_insert(Violation {
 row_index,
 inspector_id: id.clone(),
 kind,
 excess,
 });
 }

 by_row.into_values().collect()
}

fn offending_row_index(
 rows: &[AssignmentRow],
 inspector_id: &str,
 product_filter: Option<&str>,
 today: NaiveDate,
) -> Option<usize> {
 rows.iter()
.enumerate()
.filter(|(_, row)| row.is_assigned() && row.slots.iter().any(|m| m.inspector_id == inspector_id))
.filter(|(_, row)| product_filter.map(|p| row.lot.product_number == p).unwrap_or(true))
.max_by(|(ia, a), (ib, b)| {
 let key_a = (a.lot.shipping_date.dispatch_class(today), a.lot.shipping_date.tiebreak_date(today));
 let key_b = (b.lot.shipping_date.dispatch_class(today), b.lot.shipping_date.tiebreak_date(today));
 key_a.cmp(&key_b).reverse().then(ia.cmp(ib))
 })
.map(|(idx, _)| idx)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairOutcome {
 Swapped,
 Replaced,
 Augmented,
 GaveUp,
}

/// Repair one violation in place, mutating `row` and `state` together. Tries, in order: swap (crew ≥ 2), replace (crew = 1, short lot),
/// augment (crew = 1, long lot); gives up and releases the row otherwise.
#[allow(clippy::too_many_arguments)]
pub fn repair_row(
 violation: &Violation,
 row: &mut AssignmentRow,
 snapshot: &MasterSnapshot,
 state: &mut DailyState,
 config: &EngineConfig,
 today: NaiveDate,
) -> RepairOutcome {
 let x = violation.inspector_id.clone();

 if row.crew_size() >= 2 {
 let exclude: Vec<String> = row.slots.iter().map(|m| m.inspector_id.clone()).collect();
 if let Some(y) = least_loaded_candidate(row, row.divided_time, snapshot, &exclude, state, config, today) {
 let divided_time = row.divided_time;
 state.release_hours(&x, &row.lot.product_number, divided_time);
 state.record_assignment(&y.inspector_id, &row.lot.product_number, divided_time);
 if let Some(slot) = row.slots.iter_mut().find(|m| m.inspector_id == x) {
 *slot = y;
 }
 debug!(row = violation.row_index, from = %x, "swapped out over-cap inspector");
 return RepairOutcome::Swapped;
 }
 } else if row.crew_size() == 1 {
 if row.inspection_time_hours < config.h_required {
 let exclude = vec![x.clone()];
 if let Some(y) =
 least_loaded_candidate(row, row.inspection_time_hours, snapshot, &exclude, state, config, today)
 {
 let divided_time = row.divided_time;
 state.release_hours(&x, &row.lot.product_number, divided_time);
 state.record_assignment(&y.inspector_id, &row.lot.product_number, row.inspection_time_hours);
 row.slots = vec![y];
 return RepairOutcome::Replaced;
 }
 } else if row.crew_size() < MAX_CREW_SIZE {
 let half = row.inspection_time_hours / 2.0;
 let exclude = vec![x.clone()];
 if let Some(y) = least_loaded_candidate(row, half, snapshot, &exclude, state, config, today) {
 state.release_hours(&x, &row.lot.product_number, row.divided_time);
 state.record_assignment(&x, &row.lot.product_number, half);
 state.record_assignment(&y.inspector_id, &row.lot.product_number, half);
 row.divided_time = half;
 row.required_crew_size = 2;
 row.slots.push(y);
 return RepairOutcome::Augmented;
 }
 }
 }

 let divided_time = row.divided_time;
 for member in &row.slots {
 state.release_hours(&member.inspector_id, &row.lot.product_number, divided_time);
 }
 warn!(row = violation.row_index, inspector = %x, "no repair path found, releasing row");
 row.release(AssignabilityStatus::UnassignedRule);
 RepairOutcome::GaveUp
}

fn least_loaded_candidate(
 row: &AssignmentRow,
 divided_time: f64,
 snapshot: &MasterSnapshot,
 exclude: &[String],
 state: &DailyState,
 config: &EngineConfig,
 today: NaiveDate,
) -> Option<CrewMember> {
 derive_candidates(&row.lot, snapshot)
.into_iter()
.filter(|c| !exclude.contains(&c.inspector_id))
.filter(|c| passes_filters(&c.inspector_id, &row.lot, divided_time, snapshot, state, config, today))
.min_by(|a, b| {
 crate::domain::compare_least_loaded(
 &state.least_loaded_key(&a.inspector_id),
 &state.least_loaded_key(&b.inspector_id),
 )
 })
.map(|c| CrewMember {
 inspector_id: c.inspector_id,
 name: c.name,
 skill_level: c.skill_level.map(|l| l.0),
 is_new_team_pick: c.is_new_team_pick,
 })
}
