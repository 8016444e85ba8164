//! Passenger/segment selection for fare calculation.
//!
//! A fare request targets either passengers or segments, never both. The
//! gate models that as an explicit state machine instead of boolean flags so
//! the invariant is testable on its own.

mod gate;

pub use gate::{SelectionGate, SelectionMode};
