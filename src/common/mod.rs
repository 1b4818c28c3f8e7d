//! Common types and utilities shared by the ODF model and the HTML writer.

// Submodule declarations
pub mod error;
pub mod fonts;
pub mod unit;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result};
pub use unit::{Length, LengthUnit};
