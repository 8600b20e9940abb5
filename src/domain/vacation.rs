//! Vacation schedule: per-date absences that remove an inspector from the
//! candidate pool entirely.

use chrono::NaiveDate;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct VacationSchedule {
 /// `(inspector_id, date)` pairs with a non-empty absence code.
 absences: HashSet<(String, NaiveDate)>,
}

impl VacationSchedule {
 pub fn from_absences(absences: impl IntoIterator<Item = (String, NaiveDate)>) -> Self {
 Self {
 absences: absences.into_iter().collect(),
 }
 }

 pub fn is_on_vacation(&self, inspector_id: &str, date: NaiveDate) -> bool {
 self.absences.contains(&(inspector_id.to_string(), date))
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 #[test]
 fn absent_inspector_is_excluded() {
 let date = NaiveDate::from_ymd_opt(2026, 7, 29).unwrap();
 let schedule = VacationSchedule::from_absences(vec![("A".to_string(), date)]);
 assert!(schedule.is_on_vacation("A", date));
 assert!(!schedule.is_on_vacation("B", date));
 }
}
