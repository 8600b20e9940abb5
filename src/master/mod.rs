//! Read-only, fingerprint-invalidated caches over the four master inputs
//!.

pub mod store;

pub use store::{Fingerprint, MasterLoader, MasterSnapshot, MasterStore};
