//! `AssignmentEngine`: the four-phase pipeline tying sizing, crew selection,
//! repair, and rebalance together.

use super::repair::{detect_violations, repair_row};
use super::rebalance::rebalance;
use super::selection::select_crew;
use super::sizing::{size_lot, unsized_row};
use crate::config::EngineConfig;
use crate::domain::{is_same_day_scoped, AssignabilityStatus, AssignmentRow, DailyState, FixedPinRegistry, Lot};
use crate::master::MasterSnapshot;
use chrono::NaiveDate;
use tracing::{info, instrument, warn};

pub struct AssignmentEngine<'a> {
 snapshot: &'a MasterSnapshot,
 pins: &'a FixedPinRegistry,
 config: &'a EngineConfig,
}

/// The assignment table plus the final `DailyState` it implies, handed back
/// so callers (e.g. the seating bridge) can reason about load without
/// recomputing it themselves.
pub struct RunResult {
 pub rows: Vec<AssignmentRow>,
 pub final_state: DailyState,
}

impl<'a> AssignmentEngine<'a> {
 pub fn new(snapshot: &'a MasterSnapshot, pins: &'a FixedPinRegistry, config: &'a EngineConfig) -> Self {
 Self { snapshot, pins, config }
 }

 /// Run every phase over `lots` for the given run date.
 #[instrument(skip_all, fields(lot_count = lots.len()))]
 pub fn run(&self, lots: Vec<Lot>, today: NaiveDate) -> RunResult {
 let mut rows = self.phase0_size(lots);
 self.phase1_first_pass(&mut rows, today);
 self.phase2_repair(&mut rows, today);
 let moved = rebalance(&mut rows, self.snapshot, self.config, today);
 if moved > 0 {
 info!(reassignments = moved, "fairness rebalance applied");
 }
 self.phase4_final_sweep(&mut rows, today);

 let final_state = DailyState::recompute_from_rows(&rows, today);
 RunResult { rows, final_state }
 }

 /// Phase 0: sizing. Lots that are zero-quantity or unresolvable become an
 /// unstaffed row instead of being dropped.
 fn phase0_size(&self, lots: Vec<Lot>) -> Vec<AssignmentRow> {
 lots.into_iter()
.map(|lot| match size_lot(&lot, &self.snapshot.products, self.config) {
 Some(sized) => AssignmentRow {
 inspection_time_hours: sized.inspection_time_hours,
 required_crew_size: sized.required_crew_size,
 divided_time: sized.divided_time,
 slots: Vec::new(),
 assignability_status: AssignabilityStatus::UnassignedNoCandidate,
 lot,
 },
 None => unsized_row(lot),
 })
.collect()
 }

 /// Phase 1: sort by `(shipping_date ascending, is_new_product
 /// descending)` then greedily staff each lot in order.
 fn phase1_first_pass(&self, rows: &mut [AssignmentRow], today: NaiveDate) {
 let mut order: Vec<usize> = (0..rows.len()).filter(|&i| rows[i].required_crew_size > 0).collect();
 order.sort_by(|&a, &b| self.dispatch_order_key(&rows[a].lot, today).cmp(&self.dispatch_order_key(&rows[b].lot, today)));

 let mut state = DailyState::new();
 for idx in order {
 let row = &mut rows[idx];
 let selection = select_crew(
 &row.lot,
 row.required_crew_size,
 row.divided_time,
 self.snapshot,
 self.pins,
 &state,
 self.config,
 today,
 );
 for dropped in &selection.dropped_pins {
 warn!(lot = ?row.lot.production_lot_id(), pin = %dropped, "fixed pin dropped, failed filters");
 }

 if selection.members.is_empty() {
 row.assignability_status = AssignabilityStatus::UnassignedNoCandidate;
 continue;
 }

 for member in &selection.members {
 state.record_assignment(&member.inspector_id, &row.lot.product_number, row.divided_time);
 }
 if is_same_day_scoped(&row.lot.shipping_date, today) {
 for member in &selection.members {
 state.track_same_day_cleaning(&row.lot.product_number, &member.inspector_id);
 }
 }

 row.slots = selection.members;
 row.assignability_status = AssignabilityStatus::Assigned;
 }
 }

 fn dispatch_order_key(&self, lot: &Lot, today: NaiveDate) -> (crate::domain::ShippingDateClass, NaiveDate, std::cmp::Reverse<bool>) {
 let is_new_product = !self.snapshot.skills.has_product(&lot.product_number);
 (
 lot.shipping_date.dispatch_class(today),
 lot.shipping_date.tiebreak_date(today),
 std::cmp::Reverse(is_new_product),
 )
 }

 /// Phase 2: bounded fixed-point repair loop.
 fn phase2_repair(&self, rows: &mut [AssignmentRow], today: NaiveDate) {
 for iteration in 0..self.config.repair_iteration_cap {
 let mut violations = detect_violations(&*rows, self.snapshot, self.config, today);
 if violations.is_empty() {
 return;
 }
 violations.sort_by(|a, b| {
 self.dispatch_order_key(&rows[a.row_index].lot, today)
.cmp(&self.dispatch_order_key(&rows[b.row_index].lot, today))
.then(a.row_index.cmp(&b.row_index))
 });

 let mut state = DailyState::recompute_from_rows(&*rows, today);
 let mut progressed = false;
 for violation in &violations {
 let before = rows[violation.row_index].clone();
 repair_row(violation, &mut rows[violation.row_index], self.snapshot, &mut state, self.config, today);
 if rows[violation.row_index] != before {
 progressed = true;
 }
 }
 if !progressed {
 warn!(iteration, "repair loop made no progress, stopping early");
 return;
 }
 }
 warn!(cap = self.config.repair_iteration_cap, "repair loop hit iteration cap");
 }

 /// Phase 4: re-verify invariants and recompute state. Any row whose crew
 /// never reached its required size is demoted to `UNASSIGNED_CAPACITY`;
 /// any row still violating a cap after the repair loop gave up or hit its
 /// iteration cap is demoted to `UNASSIGNED_RULE`, per spec §4.3 Phase 4
 /// ("any residual violation ⇒ mark the offending row UNASSIGNED").
 fn phase4_final_sweep(&self, rows: &mut [AssignmentRow], today: NaiveDate) {
 for row in rows.iter_mut() {
 if row.assignability_status == AssignabilityStatus::Assigned && row.crew_size() < row.required_crew_size {
 row.release(AssignabilityStatus::UnassignedCapacity);
 }
 }

 let residual = detect_violations(&*rows, self.snapshot, self.config, today);
 for violation in &residual {
 if rows[violation.row_index].assignability_status == AssignabilityStatus::Assigned {
 warn!(row = violation.row_index, "residual violation survived repair, marking unassigned");
 rows[violation.row_index].release(AssignabilityStatus::UnassignedRule);
 }
 }
 }
}
