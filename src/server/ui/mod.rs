//! Host console views.

mod activity;
mod challenges;
mod help;
mod lobby;
mod player_view;
mod render;

pub use render::render;
