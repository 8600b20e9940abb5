//! Run-scoped engine state: per-inspector load tallies.
//!
//! Never persisted — reconstructed from scratch at the start of each run and
//! recomputed idempotently during Phase 2 repair.

use super::assignment::AssignmentRow;
use super::types::ShippingDateClass;
use chrono::NaiveDate;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct DailyState {
 pub daily_hours: HashMap<String, f64>,
 pub product_hours: HashMap<String, HashMap<String, f64>>,
 pub same_day_cleaning_inspectors: HashMap<String, Vec<String>>,
 pub assignment_count: HashMap<String, u64>,
 /// Monotonic per-run tiebreaker standing in for "last assignment time"
 ///; see DESIGN.md Open Question resolution #4.
 pub last_assignment_seq: HashMap<String, u64>,
 sequence_cursor: u64,
}

impl DailyState {
 pub fn new() -> Self {
 Self::default()
 }

 pub fn daily_hours_of(&self, inspector_id: &str) -> f64 {
 self.daily_hours.get(inspector_id).copied().unwrap_or(0.0)
 }

 pub fn product_hours_of(&self, inspector_id: &str, product_number: &str) -> f64 {
 self.product_hours
.get(inspector_id)
.and_then(|by_product| by_product.get(product_number))
.copied()
.unwrap_or(0.0)
 }

 pub fn assignment_count_of(&self, inspector_id: &str) -> u64 {
 self.assignment_count
.get(inspector_id)
.copied()
.unwrap_or(0)
 }

 pub fn last_assignment_seq_of(&self, inspector_id: &str) -> u64 {
 self.last_assignment_seq
.get(inspector_id)
.copied()
.unwrap_or(0)
 }

 /// The least-loaded lexicographic key from spec §4.4: `(total_hours,
 /// assignment_count, last_assignment_time)`, ascending. Compare with
 /// [`compare_least_loaded`] since `f64` has no total order of its own.
 pub fn least_loaded_key(&self, inspector_id: &str) -> (f64, u64, u64) {
 (
 self.daily_hours_of(inspector_id),
 self.assignment_count_of(inspector_id),
 self.last_assignment_seq_of(inspector_id),
 )
 }

 /// Record `divided_time` worked by `inspector_id` on `product_number`,
 /// bumping the fairness and recency tallies.
 pub fn record_assignment(
 &mut self,
 inspector_id: &str,
 product_number: &str,
 divided_time: f64,
 ) {
 *self.daily_hours.entry(inspector_id.to_string()).or_insert(0.0) += divided_time;
 *self
.product_hours
.entry(inspector_id.to_string())
.or_default()
.entry(product_number.to_string())
.or_insert(0.0) += divided_time;
 *self
.assignment_count
.entry(inspector_id.to_string())
.or_insert(0) += 1;
 self.sequence_cursor += 1;
 self.last_assignment_seq
.insert(inspector_id.to_string(), self.sequence_cursor);
 }

 /// Reverse a previously recorded assignment (used by repair/rebalance
 /// swaps). Does not roll back `assignment_count`/recency — those reflect
 /// "has ever been picked", matching the original's running tallies.
 pub fn release_hours(&mut self, inspector_id: &str, product_number: &str, divided_time: f64) {
 if let Some(hours) = self.daily_hours.get_mut(inspector_id) {
 *hours = (*hours - divided_time).max(0.0);
 }
 if let Some(by_product) = self.product_hours.get_mut(inspector_id) {
 if let Some(hours) = by_product.get_mut(product_number) {
 *hours = (*hours - divided_time).max(0.0);
 }
 }
 }

 pub fn track_same_day_cleaning(&mut self, product_number: &str, inspector_id: &str) {
 let members = self
.same_day_cleaning_inspectors
.entry(product_number.to_string())
.or_default();
 if !members.iter().any(|m| m == inspector_id) {
 members.push(inspector_id.to_string());
 }
 }

 /// Rebuild a `DailyState` from scratch by replaying every `ASSIGNED` row,
 /// including re-deriving `same_day_cleaning_inspectors` for any row whose
 /// shipping date falls in today/same-day-cleaning/advance-inspection
 /// scope (spec §4.4 "same-day-cleaning bookkeeping").
 pub fn recompute_from_rows(rows: &[AssignmentRow], today: NaiveDate) -> Self {
 let mut state = Self::new();
 for row in rows {
 if !row.is_assigned() {
 continue;
 }
 for member in &row.slots {
 state.record_assignment(&member.inspector_id, &row.lot.product_number, row.divided_time);
 }
 if is_same_day_scoped(&row.lot.shipping_date, today) {
 for member in &row.slots {
 state.track_same_day_cleaning(&row.lot.product_number, &member.inspector_id);
 }
 }
 }
 state
 }
}

/// `true` when `shipping_date` is in same-day scope for today's run: the
/// run date itself, same-day cleaning, or advance inspection (spec §4.4).
pub fn is_same_day_scoped(shipping_date: &super::types::ShippingDate, today: NaiveDate) -> bool {
 matches!(
 shipping_date.dispatch_class(today),
 ShippingDateClass::Today | ShippingDateClass::SameDayCleaning | ShippingDateClass::AdvanceInspection
 )
}

/// Total-ordered comparison for the `(total_hours, assignment_count,
/// last_assignment_time)` key, since `f64` only has a partial
/// order. NaN never arises here (hours are always finite sums), but
/// `total_cmp` keeps the sort well-defined regardless.
pub fn compare_least_loaded(a: &(f64, u64, u64), b: &(f64, u64, u64)) -> std::cmp::Ordering {
 a.0.total_cmp(&b.0)
.then_with(|| a.1.cmp(&b.1))
.then_with(|| a.2.cmp(&b.2))
}
