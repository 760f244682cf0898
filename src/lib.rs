//! # globetrotter
//!
//! A destination-guessing quiz: the server deals clues with a shuffled set
//! of candidate answers over WebSocket, verifies guesses, and hands out
//! challenge invite links; the client is a terminal frontend with timed and
//! points game modes.
//!
//! The library exposes the reusable pieces: the destination data model and
//! loader, the catalog, the option set builder, and the wire protocol.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use globetrotter::{DestinationCatalog, OptionSetBuilder, load_destinations_from_json};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let destinations = load_destinations_from_json("destinations.json")?;
//!     let catalog = DestinationCatalog::new(destinations);
//!     let builder = OptionSetBuilder::new(4)?;
//!
//!     let mut rng = rand::rng();
//!     let correct = catalog.pick_random(&mut rng).unwrap().name.clone();
//!     let options = builder.build(&correct, &catalog, &mut rng)?;
//!     println!("{:?}", options.as_slice());
//!     Ok(())
//! }
//! ```

pub mod client;
mod data;
mod game;
mod models;
pub mod protocol;
pub mod server;
pub mod terminal;

pub use data::{load_destinations_from_json, parse_destinations, LoadError};
pub use game::{
    DestinationCatalog, DistractorSource, OptionSet, OptionSetBuilder, OptionSetError,
    OPTION_SET_SIZE,
};
pub use models::Destination;
