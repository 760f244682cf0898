//! Destination data loading.

mod loader;

pub use loader::{load_destinations_from_json, parse_destinations, LoadError};
