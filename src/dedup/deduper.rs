//! `LotDeduper` — three-stage duplicate reconciliation.
//!
//! Grounded in the teacher's `engine/priority/core.rs` stateless-sorter
//! pattern: a pure function over an already-loaded collection, no I/O, fully
//! unit-testable without mocks.

use crate::domain::{Lot, Provenance, ShippingDateClass};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashMap;

/// Resolves the Stage-3 "blank column = wildcard" ambiguity flagged in
/// spec §9. Default `true` matches the original implementation's observed
/// behavior; both modes are unit tested.
#[derive(Debug, Clone, Copy)]
pub struct DedupOptions {
 pub blank_is_wildcard: bool,
}

impl Default for DedupOptions {
 fn default() -> Self {
 Self {
 blank_is_wildcard: true,
 }
 }
}

/// Broad provenance bucket used by the mixed-pair collision rule: any two of these three classes colliding in the same bucket
/// triggers a priority-only keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum BroadClass {
 Cleaning,
 Advance,
 NormalDate,
}

fn broad_class(lot: &Lot) -> BroadClass {
 match lot.provenance {
 Provenance::Cleaning => BroadClass::Cleaning,
 Provenance::Advance => BroadClass::Advance,
 Provenance::Normal => BroadClass::NormalDate,
 }
}

/// Friday ⇒ next Monday, else the next calendar day.
pub fn next_business_day(today: NaiveDate) -> NaiveDate {
 if today.weekday() == Weekday::Fri {
 today + chrono::Duration::days(3)
 } else {
 today + chrono::Duration::days(1)
 }
}

/// Dedup priority class of a lot's `shipping_date`; `0` is kept
/// over everything else.
pub fn classify(lot: &Lot, today: NaiveDate) -> ShippingDateClass {
 use crate::domain::ShippingDate;
 match &lot.shipping_date {
 ShippingDate::SameDayCleaning => ShippingDateClass::SameDayCleaning,
 ShippingDate::AdvanceInspection => ShippingDateClass::AdvanceInspection,
 ShippingDate::Date(d) if *d == today => ShippingDateClass::Today,
 ShippingDate::Date(d) if *d == next_business_day(today) => ShippingDateClass::NextBusinessDay,
 ShippingDate::Date(_) => ShippingDateClass::OtherFutureDate,
 }
}

pub struct LotDeduper {
 options: DedupOptions,
}

impl LotDeduper {
 pub fn new(options: DedupOptions) -> Self {
 Self { options }
 }

 /// Run all three stages in order.
 pub fn dedupe(&self, lots: Vec<Lot>, today: NaiveDate) -> Vec<Lot> {
 let stage1 = self.stage1(lots, today);
 let stage2 = self.stage2(stage1, today);
 self.stage3(stage2, today)
 }

 /// Stage 1: bucket rows carrying a `production_lot_id` by that id; keep
 /// the highest-priority row per bucket.
 fn stage1(&self, lots: Vec<Lot>, today: NaiveDate) -> Vec<Lot> {
 let (with_id, without_id): (Vec<Lot>, Vec<Lot>) = lots
.into_iter()
.partition(|lot| lot.production_lot_id().is_some());

 let mut buckets: HashMap<String, Vec<Lot>> = HashMap::new();
 for lot in with_id {
 buckets
.entry(lot.production_lot_id().unwrap().to_string())
.or_default()
.push(lot);
 }

 let mut kept: Vec<Lot> = buckets
.into_values()
.map(|mut bucket| {
 bucket.sort_by_key(|lot| classify(lot, today));
 bucket.into_iter().next().expect("bucket is non-empty")
 })
.collect();

 kept.extend(without_id);
 kept
 }

 /// Stage 2: rows without a `production_lot_id`, bucketed by
 /// `(product_number, machine, instruction_date, cleaning_instruction_row)`
 /// with blanks as the literal `__EMPTY__` sentinel; apply the mixed-pair
 /// rule per bucket.
 fn stage2(&self, lots: Vec<Lot>, today: NaiveDate) -> Vec<Lot> {
 let (without_id, with_id): (Vec<Lot>, Vec<Lot>) = lots
.into_iter()
.partition(|lot| lot.production_lot_id().is_none());

 const EMPTY: &str = "__EMPTY__";
 let mut buckets: HashMap<(String, String, String, String), Vec<Lot>> = HashMap::new();
 for lot in without_id {
 let machine = lot.machine.clone().unwrap_or_else(|| EMPTY.to_string());
 let instruction_date = lot
.instruction_date
.map(|d| d.to_string())
.unwrap_or_else(|| EMPTY.to_string());
 let cleaning_row = match &lot.identity {
 crate::domain::LotIdentity::Composite {
 cleaning_instruction_row: Some(row),
..
 } => row.to_string(),
 _ => EMPTY.to_string(),
 };
 buckets
.entry((lot.product_number.clone(), machine, instruction_date, cleaning_row))
.or_default()
.push(lot);
 }

 let mut kept = Vec::new();
 for (_, bucket) in buckets {
 kept.extend(apply_mixed_pair_rule(bucket, today));
 }
 kept.extend(with_id);
 kept
 }

 /// Stage 3: over all surviving rows, bucket by `product_number` then by
 /// the distinguishing key (machine, instruction_date, production_lot_id);
 /// apply the mixed-pair rule within each partition. Blank handling is
 /// governed by [`DedupOptions::blank_is_wildcard`].
 fn stage3(&self, lots: Vec<Lot>, today: NaiveDate) -> Vec<Lot> {
 let mut by_product: HashMap<String, Vec<Lot>> = HashMap::new();
 for lot in lots {
 by_product.entry(lot.product_number.clone()).or_default().push(lot);
 }

 let mut kept = Vec::new();
 for (_, product_lots) in by_product {
 let partitions = partition_by_distinguishing_key(product_lots, self.options.blank_is_wildcard);
 for partition in partitions {
 kept.extend(apply_mixed_pair_rule(partition, today));
 }
 }
 kept
 }
}

/// If the group mixes ≥2 of {CLEANING, ADVANCE, NORMAL-date}, keep only the
/// single highest-priority row; otherwise keep every row.
fn apply_mixed_pair_rule(mut bucket: Vec<Lot>, today: NaiveDate) -> Vec<Lot> {
 if bucket.len() <= 1 {
 return bucket;
 }
 let distinct_classes: std::collections::HashSet<BroadClass> =
 bucket.iter().map(broad_class).collect();
 if distinct_classes.len() >= 2 {
 bucket.sort_by_key(|lot| classify(lot, today));
 vec![bucket.into_iter().next().expect("bucket is non-empty")]
 } else {
 bucket
 }
}

/// Group `lots` (already filtered to one product) by their distinguishing
/// key. With `blank_is_wildcard`, a blank component matches any value at
/// that position rather than only other blanks — implemented as
/// transitive-closure grouping since wildcard matching is not a strict
/// equivalence relation bucketable by a single hash key.
fn partition_by_distinguishing_key(lots: Vec<Lot>, blank_is_wildcard: bool) -> Vec<Vec<Lot>> {
 if !blank_is_wildcard {
 let mut buckets: HashMap<(String, String, String), Vec<Lot>> = HashMap::new();
 for lot in lots {
 buckets.entry(lot.distinguishing_key()).or_default().push(lot);
 }
 return buckets.into_values().collect();
 }

 let n = lots.len();
 let keys: Vec<(String, String, String)> = lots.iter().map(Lot::distinguishing_key).collect();
 let mut parent: Vec<usize> = (0..n).collect();

 fn find(parent: &mut [usize], x: usize) -> usize {
 if parent[x] != x {
 parent[x] = find(parent, parent[x]);
 }
 parent[x]
 }

 fn union(parent: &mut [usize], a: usize, b: usize) {
 let ra = find(parent, a);
 let rb = find(parent, b);
 if ra != rb {
 parent[ra] = rb;
 }
 }

 for i in 0..n {
 for j in (i + 1)..n {
 if keys_match_with_wildcard(&keys[i], &keys[j]) {
 union(&mut parent, i, j);
 }
 }
 }

 let mut groups: HashMap<usize, Vec<Lot>> = HashMap::new();
 for (i, lot) in lots.into_iter().enumerate() {
 let root = find(&mut parent, i);
 groups.entry(root).or_default().push(lot);
 }
 groups.into_values().collect()
}

const EMPTY_SENTINEL: &str = "__EMPTY__";

fn keys_match_with_wildcard(a: &(String, String, String), b: &(String, String, String)) -> bool {
 let pairs = [(&a.0, &b.0), (&a.1, &b.1), (&a.2, &b.2)];
 pairs.iter().all(|(x, y)| {
 x.as_str() == EMPTY_SENTINEL || y.as_str() == EMPTY_SENTINEL || x == y
 })
}
