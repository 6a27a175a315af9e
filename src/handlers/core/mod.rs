//! Core handler infrastructure.
//!
//! Command descriptors and the frozen registry they are collected into, the
//! typed argument values handlers receive, and the per-command context.

pub mod args;
pub mod context;
pub mod registry;

pub use args::{Args, Value};
pub use context::Context;
pub use registry::{CommandBuilder, Registry};
