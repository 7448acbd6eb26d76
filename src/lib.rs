//! Packfinder: search Modrinth and CurseForge at once.
//!
//! The search engine lives in the [`pack_search`] crate. This crate is the
//! front end around it:
//! - **Config**: a TOML file with engine settings and query defaults
//! - **Request**: command-line options turned into an engine query
//! - **Render**: plain-text result pages

pub mod config;
pub mod error;
pub mod render;
pub mod request;

pub use config::{PackfinderConfig, SearchDefaults};
pub use error::{PackfinderError, Result};
pub use request::SearchRequest;
