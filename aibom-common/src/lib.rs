//! Shared types for the AIBOM workspace
//!
//! Holds the pieces every crate needs: the common error type, the AIBOM
//! document tree, and BOM file I/O.

pub mod bom;
pub mod bomio;
pub mod error;

pub use error::{Error, Result};
