//! Derives the working set of lots from shipment shortages, the cleaning
//! feed, and registered advance inspections.

pub mod resolver;

pub use resolver::{
 AdvanceRegistration, CleaningRequestRow, InventoryLotRow, NonInspectionLot, ShipmentRow,
 ShortageResolver,
};
