//! Fixed-inspector pins: a `(product, process-or-blank)` rule forcing named
//! inspectors into a lot's crew when available.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedPinRule {
 pub product_number: String,
 /// `None` matches every process of the product.
 pub process_name: Option<String>,
 pub inspector_ids: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FixedPinRegistry {
 /// Keyed by product number; a product may have both a blank-process rule
 /// and process-specific rules, so we keep them as a small vec.
 rules: HashMap<String, Vec<FixedPinRule>>,
}

impl FixedPinRegistry {
 pub fn from_rules(rules: impl IntoIterator<Item = FixedPinRule>) -> Self {
 let mut by_product: HashMap<String, Vec<FixedPinRule>> = HashMap::new();
 for rule in rules {
 by_product
.entry(rule.product_number.clone())
.or_default()
.push(rule);
 }
 Self { rules: by_product }
 }

 /// Every inspector pinned to `(product_number, process_name)`, across any
 /// matching rule (exact process match or blank-process wildcard rule).
 pub fn pinned_inspectors(&self, product_number: &str, process_name: &str) -> Vec<String> {
 let Some(rules) = self.rules.get(product_number) else {
 return Vec::new();
 };
 let mut pinned = Vec::new();
 for rule in rules {
 let matches = match &rule.process_name {
 None => true,
 Some(name) => name == process_name,
 };
 if matches {
 for id in &rule.inspector_ids {
 if !pinned.contains(id) {
 pinned.push(id.clone());
 }
 }
 }
 }
 pinned
 }
}
