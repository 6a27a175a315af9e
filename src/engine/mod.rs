//! The playback engine boundary.
//!
//! The server never plays anything itself. Domain commands convert their
//! arguments and forward them to an [`Engine`]; the engine reports state
//! changes as subsystem names through its [`EventHub`].

mod events;
mod memory;

pub use events::{EventHub, SUBSYSTEMS};
pub use memory::MemoryEngine;

use crate::error::HandlerError;
use crate::handlers::core::Value;
use mpd_proto::Reply;

/// Identifies one client connection for the lifetime of the process.
pub type ConnectionId = u64;

/// A playback/library engine driven by commands.
pub trait Engine: Send + Sync {
    /// Perform `operation` with already converted arguments.
    fn execute(&self, operation: &str, args: &[Value]) -> Result<Reply, HandlerError>;

    /// The hub subsystem change events are published on.
    fn events(&self) -> &EventHub;
}
