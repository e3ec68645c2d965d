//! The layered configuration store.
//!
//! This module handles:
//! - Sections and their typed token accessors
//! - Local-over-global resolution of sections and tokens
//! - Parsing and writing the INI-like text format
//! - Loading from and saving to files

pub mod file;
pub mod layered;
mod parser;
pub mod section;
mod writer;

pub use file::{CONFIG_FILE_NAME, Loaded, default_global_path};
pub use layered::{Destination, LayeredConfig};
pub use section::Section;
