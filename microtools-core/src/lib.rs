//! Microtools Core - Fundamental types
//!
//! This crate provides the core types shared by every tool:
//! - `Value`: Runtime values (numbers, text, objects, errors)
//! - `ToolError`: Structured errors with machine-readable codes

mod value;
mod error;

pub use value::Value;
pub use error::{ToolError, Severity, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Value, ToolError, Severity};
    pub use crate::error::codes;
}
