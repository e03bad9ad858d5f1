//! # ASV Common Library
//!
//! Shared code for the arthropod survey services including:
//! - Common error types
//! - Configuration loading (TOML + environment overrides)
//! - The reference catalog (common name -> taxonomic fields)

pub mod catalog;
pub mod config;
pub mod error;

pub use catalog::{CatalogEntry, ReferenceCatalog};
pub use error::{Error, Result};
