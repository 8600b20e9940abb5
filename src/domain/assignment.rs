//! Per-lot assignment output row.

use super::types::AssignabilityStatus;
use crate::domain::lot::Lot;
use serde::{Deserialize, Serialize};

pub const MAX_CREW_SIZE: usize = 10;

/// One crew member placed into a numbered slot, with the label used to
/// render `team_info` (e.g. `"Ann(3)"` for a skill pick, `"Ann(new)"` for a
/// new-product-team pick).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
 pub inspector_id: String,
 pub name: String,
 pub skill_level: Option<u8>,
 pub is_new_team_pick: bool,
}

impl CrewMember {
 pub fn team_info_label(&self) -> String {
 if self.is_new_team_pick {
 format!("{}(new)", self.name)
 } else if let Some(level) = self.skill_level {
 format!("{}({level})", self.name)
 } else {
 self.name.clone()
 }
 }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRow {
 pub lot: Lot,
 pub inspection_time_hours: f64,
 pub required_crew_size: usize,
 pub divided_time: f64,
 /// Up to [`MAX_CREW_SIZE`] slots; empty slots are simply absent.
 pub slots: Vec<CrewMember>,
 pub assignability_status: AssignabilityStatus,
}

impl AssignmentRow {
 pub fn crew_size(&self) -> usize {
 self.slots.len()
 }

 pub fn team_info(&self) -> String {
 self.slots
.iter()
.map(CrewMember::team_info_label)
.collect::<Vec<_>>()
.join(", ")
 }

 pub fn is_assigned(&self) -> bool {
 self.assignability_status == AssignabilityStatus::Assigned
 }

 /// Release every slot and zero out the divided time, marking the row with
 /// `status`.
 pub fn release(&mut self, status: AssignabilityStatus) {
 self.slots.clear();
 self.divided_time = 0.0;
 self.assignability_status = status;
 }
}
