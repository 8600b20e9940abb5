//! Seat-chart publish/re-ingest contract. A narrow, optional
//! boundary: the engine is fully usable, and fully unit-testable, without it
//!.

pub mod bridge;

pub use bridge::{Seat, SeatChart, SeatLot, SeatingBridge};
