//! inilayer - two-layer INI-style configuration store.
//!
//! This library provides:
//! - A local layer of sections that wins over a global (shared) layer
//! - A permissive line-based `[section]` / `key = value` parser and writer
//! - Typed accessors for strings, numbers, booleans and encoded lists
//!
//! # Example
//!
//! ```no_run
//! use inilayer::{Destination, LayeredConfig};
//!
//! # fn main() -> inilayer::Result<()> {
//! let mut config = LayeredConfig::from_files("config.ini", "/etc/app/config.ini").into_inner();
//!
//! let port = config.get_number("server", "port", 8080u16, 10);
//! let hosts: Vec<String> = config.get_vector("server", "hosts");
//! println!("port {port}, hosts {hosts:?}");
//!
//! config.set("server", "port", 9090u16, Destination::Local);
//! config.to_files("config.ini", "/etc/app/config.ini")?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod error;
pub mod logging;
pub mod store;

pub use codec::{Displayed, Number, ToValue};
pub use error::{ConversionError, Result, StoreError};
pub use store::{Destination, LayeredConfig, Loaded, Section};
