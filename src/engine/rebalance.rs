//! Phase 3: fairness rebalance.

use super::selection::{derive_candidates, passes_filters};
use crate::config::EngineConfig;
use crate::domain::{compare_least_loaded, AssignmentRow, CrewMember, DailyState};
use crate::master::MasterSnapshot;
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Move lots from overloaded to under-loaded inspectors until the daily-hour
/// spread is within `imbalance_threshold_ratio` of the mean, or the
/// `rebalance_cap` is reached. Never reorders rows — only swaps the
/// inspector occupying a slot. Returns the number of reassignments made.
#[instrument(skip_all)]
pub fn rebalance(
 rows: &mut [AssignmentRow],
 snapshot: &MasterSnapshot,
 config: &EngineConfig,
 today: NaiveDate,
) -> u32 {
 let mut reassignments = 0;

 while reassignments < config.rebalance_cap {
 let state = DailyState::recompute_from_rows(&*rows, today);
 let totals: Vec<(String, f64)> = snapshot
.inspectors
.iter()
.map(|i| (i.inspector_id.clone(), state.daily_hours_of(&i.inspector_id)))
.filter(|(_, hours)| *hours > 0.0)
.collect();

 if totals.len() < 2 {
 break;
 }

 let total: f64 = totals.iter().map(|(_, h)| h).sum();
 let mean = total / totals.len() as f64;
 let max = totals.iter().map(|(_, h)| *h).fold(f64::MIN, f64::max);
 let min = totals.iter().map(|(_, h)| *h).fold(f64::MAX, f64::min);

 if max - min <= config.imbalance_threshold_ratio * mean {
 break;
 }

 let mut overloaded: Vec<&str> = totals
.iter()
.filter(|(_, h)| *h > 1.10 * mean)
.map(|(id, _)| id.as_str())
.collect();
 overloaded.sort_by(|a, b| {
 state
.daily_hours_of(b)
.total_cmp(&state.daily_hours_of(a))
 });
 let underloaded: HashSet<&str> = totals
.iter()
.filter(|(_, h)| *h < 0.90 * mean)
.map(|(id, _)| id.as_str())
.collect();

 if overloaded.is_empty() || underloaded.is_empty() {
 break;
 }

 let Some(applied) = try_one_move(rows, &overloaded, &underloaded, snapshot, &state, config, today) else {
 break;
 };
 debug!(from = %applied.0, to = %applied.1, row = applied.2, "fairness rebalance swap");
 reassignments += 1;
 }

 reassignments
}

/// Find and apply the first eligible overloaded → underloaded swap,
/// preserving row (ship-date) order by scanning rows in place.
fn try_one_move(
 rows: &mut [AssignmentRow],
 overloaded: &[&str],
 underloaded: &HashSet<&str>,
 snapshot: &MasterSnapshot,
 state: &DailyState,
 config: &EngineConfig,
 today: NaiveDate,
) -> Option<(String, String, usize)> {
 for over_id in overloaded {
 for row_index in 0..rows.len() {
 let row = &rows[row_index];
 if !row.is_assigned() || !row.slots.iter().any(|m| m.inspector_id == *over_id) {
 continue;
 }

 let divided_time = row.divided_time;
 let exclude: Vec<String> = row.slots.iter().map(|m| m.inspector_id.clone()).collect();

 let pick = derive_candidates(&row.lot, snapshot)
.into_iter()
.filter(|c| underloaded.contains(c.inspector_id.as_str()))
.filter(|c| !exclude.contains(&c.inspector_id))
.filter(|c| passes_filters(&c.inspector_id, &row.lot, divided_time, snapshot, state, config, today))
.min_by(|a, b| {
 compare_least_loaded(&state.least_loaded_key(&a.inspector_id), &state.least_loaded_key(&b.inspector_id))
 });

 if let Some(candidate) = pick {
 let to_id = candidate.inspector_id.clone();
 let row = &mut rows[row_index];
 if let Some(slot) = row.slots.iter_mut().find(|m| m.inspector_id == *over_id) {
 *slot = CrewMember {
 inspector_id: candidate.inspector_id,
 name: candidate.name,
 skill_level: candidate.skill_level.map(|l| l.0),
 is_new_team_pick: candidate.is_new_team_pick,
 };
 }
 return Some((over_id.to_string(), to_id, row_index));
 }
 }
 }
 None
}
