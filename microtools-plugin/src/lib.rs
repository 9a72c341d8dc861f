//! Microtools Plugin System
//!
//! Provides the `FunctionPlugin` trait for exposing a tool as a pure
//! function, and the registry that collects, documents and dispatches them.

mod traits;
mod registry;
mod context;

pub use traits::{FunctionPlugin, FunctionMeta, ArgMeta};
pub use registry::PluginRegistry;
pub use context::{EvalContext, DEFAULT_PRECISION, MAX_PRECISION};

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{
        FunctionPlugin, FunctionMeta, ArgMeta,
        PluginRegistry, EvalContext,
    };
    pub use microtools_core::prelude::*;
}
