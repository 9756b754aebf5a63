//! Various configuration options to control acidtag

mod parse_options;
mod write_options;

pub use parse_options::ParseOptions;
pub use write_options::{WriteOptions, WritePolicy};
