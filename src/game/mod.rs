//! Game logic: destination catalog and option set construction.

mod catalog;
mod options;

pub use catalog::DestinationCatalog;
pub use options::{DistractorSource, OptionSet, OptionSetBuilder, OptionSetError};

/// Number of options presented per question.
pub const OPTION_SET_SIZE: usize = 4;
