//! Panel configuration
//!
//! Layout, glide spans and link settings, parsed from `panel.toml`.

mod parse;
mod types;

pub use parse::{parse_config, ParseError};
pub use types::*;
