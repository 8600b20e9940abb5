//! Skill matrix: ternary (product, process, inspector) → level.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Skill level, 1 (lowest).. 3 (highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SkillLevel(pub u8);

impl SkillLevel {
 pub const MAX: SkillLevel = SkillLevel(3);

 pub fn new(level: u8) -> Option<Self> {
 (1..=3).contains(&level).then_some(SkillLevel(level))
 }

 pub fn is_top_tier(self) -> bool {
 self == Self::MAX
 }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SkillKey {
 product_number: String,
 /// `None` means the matrix row's process column was blank, matching any
 /// process of the product.
 process_number: Option<String>,
 inspector_id: String,
}

/// Immutable snapshot of the skill matrix.
#[derive(Debug, Clone, Default)]
pub struct SkillMatrix {
 cells: HashMap<SkillKey, SkillLevel>,
 products_present: std::collections::HashSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillRow {
 pub product_number: String,
 pub process_number: Option<String>,
 pub inspector_id: String,
 pub level: SkillLevel,
}

impl SkillMatrix {
 pub fn from_rows(rows: impl IntoIterator<Item = SkillRow>) -> Self {
 let mut cells = HashMap::new();
 let mut products_present = std::collections::HashSet::new();
 for row in rows {
 products_present.insert(row.product_number.clone());
 cells.insert(
 SkillKey {
 product_number: row.product_number,
 process_number: row.process_number,
 inspector_id: row.inspector_id,
 },
 row.level,
 );
 }
 Self {
 cells,
 products_present,
 }
 }

 /// `true` if the product appears anywhere in the matrix; absent products
 /// fall back to the new-product team.
 pub fn has_product(&self, product_number: &str) -> bool {
 self.products_present.contains(product_number)
 }

 /// Skill level of `inspector_id` for `(product_number, process_number)`,
 /// with blank-process rows matching any process.
 pub fn level_of(
 &self,
 product_number: &str,
 process_number: &str,
 inspector_id: &str,
 ) -> Option<SkillLevel> {
 if let Some(level) = self.cells.get(&SkillKey {
 product_number: product_number.to_string(),
 process_number: Some(process_number.to_string()),
 inspector_id: inspector_id.to_string(),
 }) {
 return Some(*level);
 }
 self.cells
.get(&SkillKey {
 product_number: product_number.to_string(),
 process_number: None,
 inspector_id: inspector_id.to_string(),
 })
.copied()
 }

 /// All `(inspector_id, level)` pairs qualifying for `(product_number,
 /// process_number)` — i.e. any non-absent skill cell. An inspector with
 /// both a blank-process row and an exact-process row for the product is
 /// listed once, using the exact-process level (matches `level_of`'s
 /// precedence).
 pub fn qualified_inspectors(
 &self,
 product_number: &str,
 process_number: &str,
 ) -> Vec<(String, SkillLevel)> {
 let mut by_inspector: HashMap<String, (SkillLevel, bool)> = HashMap::new();
 for (key, level) in self.cells.iter().filter(|(key, _)| {
 key.product_number == product_number
 && (key.process_number.is_none()
 || key.process_number.as_deref() == Some(process_number))
 }) {
 let is_exact = key.process_number.is_some();
 by_inspector
.entry(key.inspector_id.clone())
.and_modify(|(existing_level, existing_exact)| {
 if is_exact && !*existing_exact {
 *existing_level = *level;
 *existing_exact = true;
 }
 })
.or_insert((*level, is_exact));
 }
 by_inspector
.into_iter()
.map(|(id, (level, _))| (id, level))
.collect()
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 fn matrix() -> SkillMatrix {
 SkillMatrix::from_rows(vec![
 SkillRow {
 product_number: "P1".into(),
 process_number: Some("10".into()),
 inspector_id: "A".into(),
 level: SkillLevel::new(3).unwrap(),
 },
 SkillRow {
 product_number: "P1".into(),
 process_number: None,
 inspector_id: "B".into(),
 level: SkillLevel::new(1).unwrap(),
 },
 ])
 }

 #[test]
 fn blank_process_row_matches_any_process() {
 let m = matrix();
 assert_eq!(
 m.level_of("P1", "99", "B"),
 Some(SkillLevel::new(1).unwrap())
 );
 }

 #[test]
 fn exact_process_row_takes_precedence() {
 let m = matrix();
 assert_eq!(
 m.level_of("P1", "10", "A"),
 Some(SkillLevel::new(3).unwrap())
 );
 }

 #[test]
 fn absent_product_is_new() {
 let m = matrix();
 assert!(!m.has_product("P9"));
 assert!(m.has_product("P1"));
 }

 #[test]
 fn qualified_inspectors_includes_blank_process_rows() {
 let m = matrix();
 let mut qualified = m.qualified_inspectors("P1", "10");
 qualified.sort_by(|a, b| a.0.cmp(&b.0));
 assert_eq!(
 qualified,
 vec![
 ("A".to_string(), SkillLevel::new(3).unwrap()),
 ("B".to_string(), SkillLevel::new(1).unwrap()),
 ]
 );
 }

 #[test]
 fn qualified_inspectors_dedupes_blank_and_exact_rows_for_same_inspector() {
 let m = SkillMatrix::from_rows(vec![
 SkillRow {
 product_number: "P1".into(),
 process_number: None,
 inspector_id: "A".into(),
 level: SkillLevel::new(1).unwrap(),
 },
 SkillRow {
 product_number: "P1".into(),
 process_number: Some("10".into()),
 inspector_id: "A".into(),
 level: SkillLevel::new(3).unwrap(),
 },
 ]);
 let qualified = m.qualified_inspectors("P1", "10");
 assert_eq!(qualified, vec![("A".to_string(), SkillLevel::new(3).unwrap())]);
 }
}
