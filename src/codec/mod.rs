//! Value encodings used by sections.
//!
//! This module handles:
//! - Packing a list of strings into a single value (separator, escape, quotes)
//! - Locale-independent number and boolean conversion with base selection
//! - Turning arbitrary values into their stored string form

pub mod list;
pub mod number;
pub mod value;

pub use number::{Number, format_number, parse_number, parse_number_or};
pub use value::{Displayed, ToValue};
