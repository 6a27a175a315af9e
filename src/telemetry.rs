//! Telemetry utilities for command timing and connection spans.

use std::time::Instant;
use tracing::debug;

/// Guard for timing command execution.
///
/// Logs command latency at debug level when dropped.
pub struct CommandTimer {
    command: &'static str,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command.
    pub fn new(command: &'static str) -> Self {
        Self {
            command,
            start: Instant::now(),
        }
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let micros = self.start.elapsed().as_micros() as u64;
        debug!(command = self.command, micros, "Command finished");
    }
}

/// Standardized span constructors.
pub mod spans {
    use crate::engine::ConnectionId;
    use std::net::SocketAddr;
    use tracing::{Span, info_span};

    /// Create a span for a client connection.
    pub fn connection(id: ConnectionId, addr: &SocketAddr) -> Span {
        info_span!("connection", id, addr = %addr)
    }
}
