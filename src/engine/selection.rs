//! Crew selection for a single lot.

use crate::config::EngineConfig;
use crate::domain::{
 compare_least_loaded, CrewMember, DailyState, FixedPinRegistry, Inspector, Lot, SkillLevel,
};
use crate::master::MasterSnapshot;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct Candidate {
 pub inspector_id: String,
 pub name: String,
 pub skill_level: Option<SkillLevel>,
 pub is_new_team_pick: bool,
}

impl Candidate {
 fn into_crew_member(self) -> CrewMember {
 CrewMember {
 inspector_id: self.inspector_id,
 name: self.name,
 skill_level: self.skill_level.map(|l| l.0),
 is_new_team_pick: self.is_new_team_pick,
 }
 }
}

/// Candidate derivation: skill-qualified inspectors, or
/// the new-product team when the product is absent from the skill matrix or
/// no one qualifies.
pub fn derive_candidates(lot: &Lot, snapshot: &MasterSnapshot) -> Vec<Candidate> {
 let process_number = lot.current_process_number.as_deref().unwrap_or("");

 if snapshot.skills.has_product(&lot.product_number) {
 let qualified = snapshot.skills.qualified_inspectors(&lot.product_number, process_number);
 if !qualified.is_empty() {
 return qualified
.into_iter()
.filter_map(|(id, level)| {
 find_inspector(snapshot, &id).map(|inspector| Candidate {
 inspector_id: id,
 name: inspector.name.clone(),
 skill_level: Some(level),
 is_new_team_pick: false,
 })
 })
.collect();
 }
 }

 snapshot
.inspectors
.iter()
.filter(|i| i.is_new_product_team_member)
.map(|i| Candidate {
 inspector_id: i.inspector_id.clone(),
 name: i.name.clone(),
 skill_level: None,
 is_new_team_pick: true,
 })
.collect()
}

fn find_inspector<'a>(snapshot: &'a MasterSnapshot, inspector_id: &str) -> Option<&'a Inspector> {
 snapshot.inspectors.iter().find(|i| i.inspector_id == inspector_id)
}

/// All four per-inspector filters from spec §4.4 (vacation, positive cap,
/// daily cap with slack, same-part cap).
pub fn passes_filters(
 inspector_id: &str,
 lot: &Lot,
 divided_time: f64,
 snapshot: &MasterSnapshot,
 state: &DailyState,
 config: &EngineConfig,
 today: NaiveDate,
) -> bool {
 let Some(inspector) = find_inspector(snapshot, inspector_id) else {
 return false;
 };
 if snapshot.vacations.is_on_vacation(inspector_id, today) {
 return false;
 }
 let max_hours = inspector.max_daily_hours(config);
 if max_hours <= 0.0 {
 return false;
 }
 if state.daily_hours_of(inspector_id) + divided_time > max_hours - config.epsilon {
 return false;
 }
 if state.product_hours_of(inspector_id, &lot.product_number) + divided_time > config.h_product {
 return false;
 }
 true
}

pub struct CrewSelection {
 pub members: Vec<CrewMember>,
 /// Pinned inspectors that failed a filter and were dropped.
 pub dropped_pins: Vec<String>,
}

/// Select a crew for one lot: mandatory fixed-pins first, then
/// least-loaded fill, with a skill-3 pin for crew sizes 2 and 3.
#[allow(clippy::too_many_arguments)]
pub fn select_crew(
 lot: &Lot,
 required_crew_size: usize,
 divided_time: f64,
 snapshot: &MasterSnapshot,
 pins: &FixedPinRegistry,
 state: &DailyState,
 config: &EngineConfig,
 today: NaiveDate,
) -> CrewSelection {
 let candidates = derive_candidates(lot, snapshot);
 let mut eligible: Vec<Candidate> = candidates
.into_iter()
.filter(|c| passes_filters(&c.inspector_id, lot, divided_time, snapshot, state, config, today))
.collect();

 let pinned_ids = pins.pinned_inspectors(&lot.product_number, &lot.current_process_name);
 let mut selected: Vec<Candidate> = Vec::new();
 let mut dropped_pins = Vec::new();

 for pin_id in &pinned_ids {
 if !passes_filters(pin_id, lot, divided_time, snapshot, state, config, today) {
 dropped_pins.push(pin_id.clone());
 continue;
 }
 let candidate = eligible
.iter()
.position(|c| &c.inspector_id == pin_id)
.map(|idx| eligible.remove(idx))
.or_else(|| {
 find_inspector(snapshot, pin_id).map(|inspector| Candidate {
 inspector_id: inspector.inspector_id.clone(),
 name: inspector.name.clone(),
 skill_level: None,
 is_new_team_pick: false,
 })
 });
 if let Some(candidate) = candidate {
 selected.push(candidate);
 }
 }

 // Remove any eligible candidate already selected via a pin, to avoid
 // double-picking them during the fill step below.
 eligible.retain(|c| !selected.iter().any(|s| s.inspector_id == c.inspector_id));

 if matches!(required_crew_size, 2 | 3)
 && !selected.iter().any(|m| m.skill_level.map(SkillLevel::is_top_tier).unwrap_or(false))
 {
 if let Some(idx) = top_tier_least_loaded_index(&eligible, state) {
 selected.push(eligible.remove(idx));
 }
 }

 while selected.len() < required_crew_size {
 match least_loaded_index(&eligible, state) {
 Some(idx) => selected.push(eligible.remove(idx)),
 None => break,
 }
 }

 CrewSelection {
 members: selected.into_iter().map(Candidate::into_crew_member).collect(),
 dropped_pins,
 }
}

fn least_loaded_index(pool: &[Candidate], state: &DailyState) -> Option<usize> {
 pool.iter()
.enumerate()
.min_by(|(_, a), (_, b)| {
 compare_least_loaded(&state.least_loaded_key(&a.inspector_id), &state.least_loaded_key(&b.inspector_id))
 })
.map(|(idx, _)| idx)
}

fn top_tier_least_loaded_index(pool: &[Candidate], state: &DailyState) -> Option<usize> {
 pool.iter()
.enumerate()
.filter(|(_, c)| c.skill_level.map(SkillLevel::is_top_tier).unwrap_or(false))
.min_by(|(_, a), (_, b)| {
 compare_least_loaded(&state.least_loaded_key(&a.inspector_id), &state.least_loaded_key(&b.inspector_id))
 })
.map(|(idx, _)| idx)
}
