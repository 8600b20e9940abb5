//! Tagged enums shared across the domain model.
//!
//! `Provenance` replaces the source's "shipping_date equals a magic string"
//! check while still carrying the shipping-date class needed for
//! dedup priority.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the three intake paths produced a lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Provenance {
 /// Derived from a shipment shortage.
 Normal,
 /// Manually registered advance inspection.
 Advance,
 /// Surfaced from the same-day cleaning-request feed.
 Cleaning,
}

impl fmt::Display for Provenance {
 fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
 let s = match self {
 Provenance::Normal => "NORMAL",
 Provenance::Advance => "ADVANCE",
 Provenance::Cleaning => "CLEANING",
 };
 write!(f, "{s}")
 }
}

/// Outcome of crew selection / repair for one assignment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignabilityStatus {
 Assigned,
 /// No repair path could satisfy every constraint.
 UnassignedRule,
 /// Candidate pool smaller than required crew size even before repair
 ///.
 UnassignedCapacity,
 /// Candidate pool was empty.
 UnassignedNoCandidate,
}

/// The dedup priority class of a lot's `shipping_date`.
///
/// Ordered ascending by priority: `0` (today) is kept over everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShippingDateClass {
 Today = 0,
 SameDayCleaning = 1,
 AdvanceInspection = 2,
 NextBusinessDay = 3,
 OtherFutureDate = 4,
 Unparseable = 5,
}

/// A lot's `shipping_date`: either a real calendar date or one of the two
/// sentinel strings the source used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingDate {
 Date(chrono::NaiveDate),
 AdvanceInspection,
 SameDayCleaning,
}

impl fmt::Display for ShippingDate {
 fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
 match self {
 ShippingDate::Date(d) => write!(f, "{d}"),
 ShippingDate::AdvanceInspection => write!(f, "advance-inspection"),
 ShippingDate::SameDayCleaning => write!(f, "same-day-cleaning"),
 }
 }
}

/// `today`'s next business day: Friday rolls to Monday, every other day
/// rolls to the following calendar day.
pub fn next_business_day(today: chrono::NaiveDate) -> chrono::NaiveDate {
 use chrono::{Datelike, Weekday};
 let offset = if today.weekday() == Weekday::Fri { 3 } else { 1 };
 today + chrono::Duration::days(offset)
}

impl ShippingDate {
 /// Priority class used for both dedup and the engine's
 /// `(shipping_date ascending, …)` dispatch order.
 pub fn dispatch_class(&self, today: chrono::NaiveDate) -> ShippingDateClass {
 match self {
 ShippingDate::SameDayCleaning => ShippingDateClass::SameDayCleaning,
 ShippingDate::AdvanceInspection => ShippingDateClass::AdvanceInspection,
 ShippingDate::Date(d) if *d == today => ShippingDateClass::Today,
 ShippingDate::Date(d) if *d == next_business_day(today) => ShippingDateClass::NextBusinessDay,
 ShippingDate::Date(_) => ShippingDateClass::OtherFutureDate,
 }
 }

 /// A real calendar date for tie-breaking within a priority class; the two
 /// sentinel variants are scoped to the run date itself.
 pub fn tiebreak_date(&self, today: chrono::NaiveDate) -> chrono::NaiveDate {
 match self {
 ShippingDate::Date(d) => *d,
 ShippingDate::AdvanceInspection | ShippingDate::SameDayCleaning => today,
 }
 }
}
