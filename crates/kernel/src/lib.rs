//! Stacks kernel: layered settings, the module lifecycle contract, and the
//! registry that drives it.

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Migration, MigrationStep, Module};
pub use registry::ModuleRegistry;
