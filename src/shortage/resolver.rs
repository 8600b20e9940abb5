//! `ShortageResolver` — derives the working lot set from shipment
//! shortages, the cleaning feed, and registered advance inspections
//!.
//!
//! Grounded in the teacher's `engine/priority/core.rs`: a stateless, purely
//! synchronous engine over already-loaded data (no I/O, hence no
//! `async_trait` config injection the way `engine/eligibility.rs` needs one
//! for DB-backed reads).

use crate::domain::{Lot, LotIdentity, Provenance, ShippingDate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::instrument;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentRow {
 pub product_number: String,
 pub product_name: String,
 pub customer: String,
 pub shipping_date: NaiveDate,
 pub shipping_quantity: f64,
 pub stock_quantity: f64,
 /// Negative ⇒ unmet demand. Authoritative; never recomputed.
 pub shortage_quantity: f64,
 pub packaged_completed_total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryLotRow {
 pub product_number: String,
 pub product_name: String,
 pub customer: String,
 pub quantity: f64,
 pub lot_quantity: i64,
 pub instruction_date: NaiveDate,
 pub machine: Option<String>,
 pub current_process_number: Option<String>,
 pub current_process_name: String,
 pub secondary_process: Option<String>,
 pub production_lot_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningRequestRow {
 pub product_number: String,
 pub product_name: String,
 pub customer: String,
 pub quantity: i64,
 pub instruction_date: NaiveDate,
 pub cleaning_instruction_row: u64,
 pub machine: Option<String>,
 pub current_process_number: Option<String>,
 pub current_process_name: String,
 pub secondary_process: Option<String>,
 pub production_lot_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceRegistration {
 pub product_number: String,
 pub max_lots_per_day: usize,
 /// Raw registered process filter, split on `/` or `／`.
 pub process_keywords: Option<String>,
}

impl AdvanceRegistration {
 /// Individual keywords, accepting both the half-width and full-width
 /// slash as separators (carried from the original implementation).
 pub fn process_keywords(&self) -> Vec<String> {
 match &self.process_keywords {
 None => Vec::new(),
 Some(raw) => raw
.split(['/', '／'])
.map(|s| s.trim().to_string())
.filter(|s| !s.is_empty())
.collect(),
 }
 }
}

/// A lot dropped from the assignable set for not matching any
/// inspection-target keyword, retained for external chat notifications
///.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonInspectionLot {
 pub shipping_date: ShippingDate,
 pub product_number: String,
 pub production_lot_id: Option<String>,
 pub instruction_date: NaiveDate,
 pub current_process_name: String,
}

/// Process-name substrings that mark an inventory lot as already finished
/// (excluded from advance-lot candidates, spec §4.1 step 2).
const DEFAULT_COMPLETION_KEYWORDS: &[&str] = &["completed", "packaging"];

pub struct ShortageResolver {
 excluded_products: HashSet<String>,
 inspection_target_keywords: Vec<String>,
 completion_keywords: Vec<String>,
}

impl ShortageResolver {
 pub fn new(excluded_products: HashSet<String>, inspection_target_keywords: Vec<String>) -> Self {
 Self {
 excluded_products,
 inspection_target_keywords,
 completion_keywords: DEFAULT_COMPLETION_KEYWORDS
.iter()
.map(|s| s.to_string())
.collect(),
 }
 }

 fn matches_inspection_target(&self, process_name: &str) -> bool {
 if self.inspection_target_keywords.is_empty() {
 return true;
 }
 self.inspection_target_keywords
.iter()
.any(|kw| process_name.contains(kw.as_str()))
 }

 fn is_completed_process(&self, process_name: &str) -> bool {
 self.completion_keywords
.iter()
.any(|kw| process_name.to_lowercase().contains(&kw.to_lowercase()))
 }

 /// Run the full resolution pipeline.
 #[instrument(skip_all, fields(shipments = shipments.len(), inventory = inventory.len()))]
 pub fn resolve(
 &self,
 today: NaiveDate,
 shipments: &[ShipmentRow],
 inventory: &[InventoryLotRow],
 cleaning_requests: &[CleaningRequestRow],
 advance_registrations: &[AdvanceRegistration],
 ) -> (Vec<Lot>, Vec<NonInspectionLot>) {
 let (normal_lots, non_inspection) = self.extract_shortage_lots(shipments, inventory);
 let advance_lots = self.extract_advance_lots(inventory, advance_registrations);
 let cleaning_lots = self.extract_cleaning_lots(cleaning_requests);

 let merged = self.merge(normal_lots, advance_lots, cleaning_lots, today);
 (merged, non_inspection)
 }

 fn extract_shortage_lots(
 &self,
 shipments: &[ShipmentRow],
 inventory: &[InventoryLotRow],
 ) -> (Vec<Lot>, Vec<NonInspectionLot>) {
 let mut normal_lots = Vec::new();
 let mut non_inspection = Vec::new();

 for shipment in shipments {
 if self.excluded_products.contains(&shipment.product_number) {
 continue;
 }
 if shipment.shortage_quantity >= 0.0 {
 continue;
 }
 let required_quantity = shipment.shortage_quantity.abs();

 let mut candidates: Vec<&InventoryLotRow> = inventory
.iter()
.filter(|lot| lot.product_number == shipment.product_number)
.collect();
 candidates.sort_by_key(|lot| lot.instruction_date);

 let mut prior_cum = 0.0_f64;
 for lot in candidates {
 if prior_cum >= required_quantity {
 break;
 }
 let shipping_date = ShippingDate::Date(shipment.shipping_date);
 if self.matches_inspection_target(&lot.current_process_name) {
 normal_lots.push(self.build_lot(lot, shipping_date, Provenance::Normal));
 } else {
 non_inspection.push(NonInspectionLot {
 shipping_date,
 product_number: lot.product_number.clone(),
 production_lot_id: lot.production_lot_id.clone(),
 instruction_date: lot.instruction_date,
 current_process_name: lot.current_process_name.clone(),
 });
 }
 prior_cum += lot.lot_quantity as f64;
 }
 }

 non_inspection.sort_by(|a, b| {
 (a.shipping_date.to_string(), &a.product_number, a.instruction_date).cmp(&(
 b.shipping_date.to_string(),
 &b.product_number,
 b.instruction_date,
 ))
 });

 (normal_lots, non_inspection)
 }

 fn extract_advance_lots(
 &self,
 inventory: &[InventoryLotRow],
 advance_registrations: &[AdvanceRegistration],
 ) -> Vec<Lot> {
 let mut lots = Vec::new();

 for registration in advance_registrations {
 if self.excluded_products.contains(&registration.product_number) {
 continue;
 }
 let keywords = registration.process_keywords();

 let mut candidates: Vec<&InventoryLotRow> = inventory
.iter()
.filter(|lot| lot.product_number == registration.product_number)
.filter(|lot| !self.is_completed_process(&lot.current_process_name))
.collect();

 if !keywords.is_empty() {
 candidates.retain(|lot| {
 let columns = [
 Some(lot.current_process_name.as_str()),
 lot.secondary_process.as_deref(),
 ];
 let all_blank = columns.iter().all(|c| c.map(str::is_empty).unwrap_or(true));
 if all_blank {
 return false;
 }
 columns.iter().flatten().any(|col| {
 keywords.iter().any(|kw| col.contains(kw.as_str()))
 })
 });
 }

 candidates.sort_by_key(|lot| lot.instruction_date);
 candidates.truncate(registration.max_lots_per_day);

 for lot in candidates {
 lots.push(self.build_lot(lot, ShippingDate::AdvanceInspection, Provenance::Advance));
 }
 }

 lots
 }

 fn extract_cleaning_lots(&self, cleaning_requests: &[CleaningRequestRow]) -> Vec<Lot> {
 cleaning_requests
.iter()
.filter(|row| !self.excluded_products.contains(&row.product_number))
.map(|row| Lot {
 identity: match &row.production_lot_id {
 Some(id) => LotIdentity::ProductionLotId(id.clone()),
 None => LotIdentity::Composite {
 product_number: row.product_number.clone(),
 machine: row.machine.clone(),
 instruction_date: Some(row.instruction_date),
 cleaning_instruction_row: Some(row.cleaning_instruction_row),
 },
 },
 product_number: row.product_number.clone(),
 product_name: row.product_name.clone(),
 customer: row.customer.clone(),
 shipping_date: ShippingDate::SameDayCleaning,
 lot_quantity: row.quantity,
 instruction_date: Some(row.instruction_date),
 machine: row.machine.clone(),
 current_process_number: row.current_process_number.clone(),
 current_process_name: row.current_process_name.clone(),
 secondary_process: row.secondary_process.clone(),
 provenance: Provenance::Cleaning,
 })
.collect()
 }

 fn build_lot(&self, row: &InventoryLotRow, shipping_date: ShippingDate, provenance: Provenance) -> Lot {
 Lot {
 identity: match &row.production_lot_id {
 Some(id) => LotIdentity::ProductionLotId(id.clone()),
 None => LotIdentity::Composite {
 product_number: row.product_number.clone(),
 machine: row.machine.clone(),
 instruction_date: Some(row.instruction_date),
 cleaning_instruction_row: None,
 },
 },
 product_number: row.product_number.clone(),
 product_name: row.product_name.clone(),
 customer: row.customer.clone(),
 shipping_date,
 lot_quantity: row.lot_quantity,
 instruction_date: Some(row.instruction_date),
 machine: row.machine.clone(),
 current_process_number: row.current_process_number.clone(),
 current_process_name: row.current_process_name.clone(),
 secondary_process: row.secondary_process.clone(),
 provenance,
 }
 }

 /// Union NORMAL ∪ ADVANCE ∪ CLEANING with the merge-time dedup rules
 /// from spec §4.1 step 4 (the full priority-based dedup runs later in
 /// `LotDeduper`; this only eliminates exact merge-time duplicates).
 fn merge(
 &self,
 normal_lots: Vec<Lot>,
 advance_lots: Vec<Lot>,
 cleaning_lots: Vec<Lot>,
 _today: NaiveDate,
 ) -> Vec<Lot> {
 let normal_and_advance: Vec<Lot> = normal_lots.into_iter().chain(advance_lots).collect();

 let mut merged = normal_and_advance.clone();
 for cleaning_lot in cleaning_lots {
 let duplicate = match &cleaning_lot.identity {
 LotIdentity::ProductionLotId(id) => normal_and_advance
.iter()
.any(|lot| lot.production_lot_id() == Some(id.as_str())),
 LotIdentity::Composite {
 cleaning_instruction_row: Some(row),
..
 } => normal_and_advance.iter().any(|lot| {
 matches!(
 &lot.identity,
 LotIdentity::Composite {
 cleaning_instruction_row: Some(other_row),
..
 } if other_row == row
 )
 }),
 LotIdentity::Composite {.. } => false,
 };
 if !duplicate {
 merged.push(cleaning_lot);
 }
 }
 merged
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 fn today() -> NaiveDate {
 NaiveDate::from_ymd_opt(2026, 7, 29).unwrap()
 }

 #[test]
 fn shortage_extraction_stops_once_required_quantity_covered() {
 let resolver = ShortageResolver::new(HashSet::new(), vec![]);
 let shipments = vec![ShipmentRow {
 product_number: "P1".into(),
 product_name: "Widget".into(),
 customer: "Acme".into(),
 shipping_date: today(),
 shipping_quantity: 0.0,
 stock_quantity: 0.0,
 shortage_quantity: -150.0,
 packaged_completed_total: 0.0,
 }];
 let inventory = vec![
 InventoryLotRow {
 product_number: "P1".into(),
 product_name: "Widget".into(),
 customer: "Acme".into(),
 quantity: 100.0,
 lot_quantity: 100,
 instruction_date: today(),
 machine: Some("M1".into()),
 current_process_number: Some("10".into()),
 current_process_name: "Final inspection".into(),
 secondary_process: None,
 production_lot_id: Some("L1".into()),
 },
 InventoryLotRow {
 product_number: "P1".into(),
 product_name: "Widget".into(),
 customer: "Acme".into(),
 quantity: 100.0,
 lot_quantity: 100,
 instruction_date: today().succ_opt().unwrap(),
 machine: Some("M1".into()),
 current_process_number: Some("10".into()),
 current_process_name: "Final inspection".into(),
 secondary_process: None,
 production_lot_id: Some("L2".into()),
 },
 InventoryLotRow {
 product_number: "P1".into(),
 product_name: "Widget".into(),
 customer: "Acme".into(),
 quantity: 100.0,
 lot_quantity: 100,
 instruction_date: today().succ_opt().unwrap().succ_opt().unwrap(),
 machine: Some("M1".into()),
 current_process_number: Some("10".into()),
 current_process_name: "Final inspection".into(),
 secondary_process: None,
 production_lot_id: Some("L3".into()),
 },
 ];

 let (lots, _) = resolver.resolve(today(), &shipments, &inventory, &[], &[]);
 // prior_cum(L1)=0<150 keep; prior_cum(L2)=100<150 keep; prior_cum(L3)=200 not < 150, stop.
 assert_eq!(lots.len(), 2);
 assert_eq!(lots[0].production_lot_id(), Some("L1"));
 assert_eq!(lots[1].production_lot_id(), Some("L2"));
 }

 #[test]
 fn non_keyword_lots_go_to_side_channel_not_main_output() {
 let resolver = ShortageResolver::new(HashSet::new(), vec!["inspection".to_string()]);
 let shipments = vec![ShipmentRow {
 product_number: "P1".into(),
 product_name: "Widget".into(),
 customer: "Acme".into(),
 shipping_date: today(),
 shipping_quantity: 0.0,
 stock_quantity: 0.0,
 shortage_quantity: -50.0,
 packaged_completed_total: 0.0,
 }];
 let inventory = vec![InventoryLotRow {
 product_number: "P1".into(),
 product_name: "Widget".into(),
 customer: "Acme".into(),
 quantity: 100.0,
 lot_quantity: 100,
 instruction_date: today(),
 machine: Some("M1".into()),
 current_process_number: Some("10".into()),
 current_process_name: "cutting".into(),
 secondary_process: None,
 production_lot_id: Some("L1".into()),
 }];

 let (lots, non_inspection) = resolver.resolve(today(), &shipments, &inventory, &[], &[]);
 assert!(lots.is_empty());
 assert_eq!(non_inspection.len(), 1);
 assert_eq!(non_inspection[0].production_lot_id, Some("L1".to_string()));
 }

 #[test]
 fn advance_registration_splits_on_both_slash_variants() {
 let registration = AdvanceRegistration {
 product_number: "P1".into(),
 max_lots_per_day: 1,
 process_keywords: Some("cut／drill/polish".into()),
 };
 assert_eq!(
 registration.process_keywords(),
 vec!["cut".to_string(), "drill".to_string(), "polish".to_string()]
 );
 }

 #[test]
 fn cleaning_lot_with_same_production_lot_id_is_dropped_at_merge() {
 let resolver = ShortageResolver::new(HashSet::new(), vec![]);
 let shipments = vec![ShipmentRow {
 product_number: "P1".into(),
 product_name: "Widget".into(),
 customer: "Acme".into(),
 shipping_date: today(),
 shipping_quantity: 0.0,
 stock_quantity: 0.0,
 shortage_quantity: -10.0,
 packaged_completed_total: 0.0,
 }];
 let inventory = vec![InventoryLotRow {
 product_number: "P1".into(),
 product_name: "Widget".into(),
 customer: "Acme".into(),
 quantity: 10.0,
 lot_quantity: 10,
 instruction_date: today(),
 machine: Some("M1".into()),
 current_process_number: Some("10".into()),
 current_process_name: "Final inspection".into(),
 secondary_process: None,
 production_lot_id: Some("L1".into()),
 }];
 let cleaning = vec![CleaningRequestRow {
 product_number: "P1".into(),
 product_name: "Widget".into(),
 customer: "Acme".into(),
 quantity: 10,
 instruction_date: today(),
 cleaning_instruction_row: 1,
 machine: Some("M1".into()),
 current_process_number: Some("10".into()),
 current_process_name: "Final inspection".into(),
 secondary_process: None,
 production_lot_id: Some("L1".into()),
 }];

 let (lots, _) = resolver.resolve(today(), &shipments, &inventory, &cleaning, &[]);
 assert_eq!(lots.len(), 1);
 assert_eq!(lots[0].provenance, Provenance::Normal);
 }
}
