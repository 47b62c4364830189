//! Result aggregation
//!
//! Turns the engine's event stream into an immutable results snapshot.

mod collector;

pub use collector::{aggregate, EventCollector};
