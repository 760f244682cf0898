//! Globetrotter client module.
//!
//! Terminal frontend for playing against a server.

mod client;
mod state;
mod ui;

pub use client::run;
