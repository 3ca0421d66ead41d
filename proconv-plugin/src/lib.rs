//! ProConverter Plugin System
//!
//! Provides the `FunctionPlugin` trait and the registry that front ends
//! (such as the MCP server) call into.

mod traits;
mod registry;
mod context;

pub use traits::{FunctionPlugin, FunctionMeta, ArgMeta};
pub use registry::PluginRegistry;
pub use context::{EvalContext, DEFAULT_DECIMALS, MAX_DECIMALS};

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{
        FunctionPlugin, FunctionMeta, ArgMeta,
        PluginRegistry, EvalContext,
    };
    pub use proconv_core::prelude::*;
}
