//! AIBOM generator library
//!
//! Produces AI Bills of Materials for software projects: discovers hub
//! model references in source trees, enriches them from the hub's API and
//! README endpoints, and builds CycloneDX-style documents through a
//! declarative field-spec registry. Completeness scoring and validation
//! close the loop.

pub mod builder;
pub mod completeness;
pub mod config;
pub mod enrich;
pub mod generator;
pub mod hub;
pub mod metadata;
pub mod scanner;
pub mod validator;

pub use aibom_common::bom;
pub use aibom_common::bomio;
pub use aibom_common::{Error, Result};
