//! Command handler context.
//!
//! Defines the `Context<'a>` struct passed to all handlers. It borrows the
//! connection's protocol state mutably and the shared collaborators
//! (engine, registry, settings) immutably for the duration of one command.

use super::registry::Registry;
use crate::config::MpdConfig;
use crate::engine::{ConnectionId, Engine};
use crate::state::ConnectionState;

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// Identifier of the connection issuing the command.
    pub id: ConnectionId,
    /// Per-connection protocol state.
    pub state: &'a mut ConnectionState,
    /// The playback engine.
    pub engine: &'a dyn Engine,
    /// Command registry (for reflection commands).
    pub registry: &'a Registry,
    /// Protocol settings (password, blacklist).
    pub settings: &'a MpdConfig,
}
