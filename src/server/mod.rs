//! Globetrotter server module.
//!
//! Serves destination questions over WebSocket and runs the host console.

mod commands;
mod server;
mod state;
mod ui;

pub use server::run;
