//! Inspector master and the derived daily-hours cap.

use crate::config::EngineConfig;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inspector {
 pub inspector_id: String,
 pub name: String,
 pub shift_start: NaiveTime,
 pub shift_end: NaiveTime,
 pub is_new_product_team_member: bool,
}

impl Inspector {
 /// `(shift_end - shift_start)`, minus the break window if the shift spans
 /// it. Inspectors with a non-positive result are never
 /// candidates.
 pub fn max_daily_hours(&self, config: &EngineConfig) -> f64 {
 let span_hours =
 (self.shift_end - self.shift_start).num_minutes() as f64 / 60.0;
 if self.spans_break(config) {
 span_hours - config.break_duration_hours()
 } else {
 span_hours
 }
 }

 fn spans_break(&self, config: &EngineConfig) -> bool {
 self.shift_start <= config.break_start && self.shift_end >= config.break_end
 }

 pub fn is_eligible(&self, config: &EngineConfig) -> bool {
 self.max_daily_hours(config) > 0.0
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 fn inspector(start: (u32, u32), end: (u32, u32)) -> Inspector {
 Inspector {
 inspector_id: "I1".into(),
 name: "Ann".into(),
 shift_start: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
 shift_end: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
 is_new_product_team_member: false,
 }
 }

 #[test]
 fn break_is_subtracted_when_shift_spans_it() {
 let cfg = EngineConfig::default();
 let i = inspector((8, 0), (17, 0));
 assert_eq!(i.max_daily_hours(&cfg), 9.0 - 0.75);
 }

 #[test]
 fn break_not_subtracted_when_shift_does_not_span_it() {
 let cfg = EngineConfig::default();
 let i = inspector((13, 0), (17, 0));
 assert_eq!(i.max_daily_hours(&cfg), 4.0);
 }

 #[test]
 fn non_positive_cap_is_ineligible() {
 let cfg = EngineConfig::default();
 let i = inspector((12, 0), (12, 30));
 assert!(i.max_daily_hours(&cfg) <= 0.0);
 assert!(!i.is_eligible(&cfg));
 }
}
