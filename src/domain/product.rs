//! Product master: per-process inspection rate.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductProcessRate {
 pub product_number: String,
 pub process_number: String,
 pub seconds_per_unit: f64,
}

/// Immutable snapshot of the product master, indexed for `(product_number,
/// process_number)` lookup with "first row for the product" fallback when
/// the exact process is absent.
#[derive(Debug, Clone, Default)]
pub struct ProductMaster {
 by_product_process: HashMap<(String, String), f64>,
 first_row_per_product: HashMap<String, f64>,
}

impl ProductMaster {
 pub fn from_rows(rows: impl IntoIterator<Item = ProductProcessRate>) -> Self {
 let mut by_product_process = HashMap::new();
 let mut first_row_per_product = HashMap::new();
 for row in rows {
 first_row_per_product
.entry(row.product_number.clone())
.or_insert(row.seconds_per_unit);
 by_product_process.insert(
 (row.product_number, row.process_number),
 row.seconds_per_unit,
 );
 }
 Self {
 by_product_process,
 first_row_per_product,
 }
 }

 /// Resolve `seconds_per_unit`, falling back to the product's first row
 /// when the exact `(product_number, process_number)` is missing.
 pub fn seconds_per_unit(&self, product_number: &str, process_number: &str) -> Option<f64> {
 self.by_product_process
.get(&(product_number.to_string(), process_number.to_string()))
.copied()
.or_else(|| self.first_row_per_product.get(product_number).copied())
 }

 pub fn contains_product(&self, product_number: &str) -> bool {
 self.first_row_per_product.contains_key(product_number)
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 fn master() -> ProductMaster {
 ProductMaster::from_rows(vec![
 ProductProcessRate {
 product_number: "P1".into(),
 process_number: "10".into(),
 seconds_per_unit: 60.0,
 },
 ProductProcessRate {
 product_number: "P1".into(),
 process_number: "20".into(),
 seconds_per_unit: 90.0,
 },
 ])
 }

 #[test]
 fn exact_process_match() {
 assert_eq!(master().seconds_per_unit("P1", "10"), Some(60.0));
 }

 #[test]
 fn falls_back_to_first_row_when_process_missing() {
 assert_eq!(master().seconds_per_unit("P1", "99"), Some(60.0));
 }

 #[test]
 fn unknown_product_resolves_to_none() {
 assert_eq!(master().seconds_per_unit("P9", "10"), None);
 }
}
