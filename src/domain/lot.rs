//! The unit of work: a production lot awaiting inspection.

use super::types::{Provenance, ShippingDate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A lot's identity: a unique `production_lot_id` when present, else the
/// 4-tuple fallback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LotIdentity {
 ProductionLotId(String),
 Composite {
 product_number: String,
 machine: Option<String>,
 instruction_date: Option<NaiveDate>,
 cleaning_instruction_row: Option<u64>,
 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
 pub identity: LotIdentity,
 pub product_number: String,
 pub product_name: String,
 pub customer: String,
 pub shipping_date: ShippingDate,
 /// Must be `>= 0`. A value of `0` keeps the lot but it is never assigned
 /// a crew.
 pub lot_quantity: i64,
 pub instruction_date: Option<NaiveDate>,
 pub machine: Option<String>,
 pub current_process_number: Option<String>,
 pub current_process_name: String,
 pub secondary_process: Option<String>,
 pub provenance: Provenance,
}

impl Lot {
 /// `production_lot_id` if this lot carries one, else `None`.
 pub fn production_lot_id(&self) -> Option<&str> {
 match &self.identity {
 LotIdentity::ProductionLotId(id) => Some(id.as_str()),
 LotIdentity::Composite {.. } => None,
 }
 }

 /// The Stage-2/Stage-3 distinguishing key, with blanks normalized to the
 /// `__EMPTY__` sentinel.
 pub fn distinguishing_key(&self) -> (String, String, String) {
 const EMPTY: &str = "__EMPTY__";
 let machine = self.machine.clone().unwrap_or_else(|| EMPTY.to_string());
 let instruction_date = self
.instruction_date
.map(|d| d.to_string())
.unwrap_or_else(|| EMPTY.to_string());
 let production_lot_id = self
.production_lot_id()
.map(str::to_string)
.unwrap_or_else(|| EMPTY.to_string());
 (machine, instruction_date, production_lot_id)
 }

 /// `true` if `lot_quantity == 0`; such lots are kept but never staffed.
 pub fn is_zero_quantity(&self) -> bool {
 self.lot_quantity == 0
 }
}
