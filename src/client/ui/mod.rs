//! Player-facing screens.

mod mode_select;
mod name_entry;
mod quiz;
mod render;
mod summary;

pub use render::render;
