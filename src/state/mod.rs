//! Per-connection protocol state.
//!
//! Everything a dispatcher remembers between two requests of one connection:
//! authentication, tag types, idle subscription, pending subsystem events and
//! the command-list buffer.

mod session;
mod tagtypes;

pub use session::{ConnectionState, ListMode};
