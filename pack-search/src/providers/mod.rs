//! Catalog provider implementations.
//!
//! Each module provides a struct implementing [`crate::provider::CatalogProvider`]
//! against a public catalog API.

pub mod curseforge;
pub mod modrinth;

pub use curseforge::CurseForgeProvider;
pub use modrinth::ModrinthProvider;
