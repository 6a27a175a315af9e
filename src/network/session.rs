//! Session - binds one client connection to one dispatcher.
//!
//! Each Session runs in its own Tokio task:
//!
//! ```text
//!   FramedRead<LineCodec> ──┐
//!                           ├──▶ tokio::select! ──▶ Dispatcher ──▶ FramedWrite<LineCodec>
//!   EventHub receiver ──────┤
//!   connection timeout ─────┘   (disabled while idling)
//! ```
//!
//! Requests are handled strictly one at a time, so responses leave in the
//! order requests arrived.

use crate::config::MpdConfig;
use crate::dispatcher::{Dispatcher, Outcome};
use crate::engine::{ConnectionId, Engine};
use crate::handlers::Registry;
use futures_util::{SinkExt, StreamExt};
use mpd_proto::{LineCodec, ProtocolError, greeting};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWrite;
use tokio::net::TcpStream;
use tokio::time::{Instant, sleep};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info, instrument};

/// Result of one turn of the select loop.
enum SelectResult {
    Request(String),
    Event(String),
    TimedOut,
    Closed,
}

/// A client connection.
pub struct Session {
    id: ConnectionId,
    addr: SocketAddr,
    stream: TcpStream,
    registry: Arc<Registry>,
    engine: Arc<dyn Engine>,
    settings: Arc<MpdConfig>,
}

impl Session {
    pub fn new(
        id: ConnectionId,
        stream: TcpStream,
        addr: SocketAddr,
        registry: Arc<Registry>,
        engine: Arc<dyn Engine>,
        settings: Arc<MpdConfig>,
    ) -> Self {
        Self {
            id,
            addr,
            stream,
            registry,
            engine,
            settings,
        }
    }

    /// Serve the connection until either side closes it.
    #[instrument(skip(self), fields(id = self.id, addr = %self.addr), name = "session")]
    pub async fn run(self) -> anyhow::Result<()> {
        let Self {
            id,
            stream,
            registry,
            engine,
            settings,
            ..
        } = self;

        // Subscribe before the greeting so no event after it is missed.
        let mut events = engine.events().subscribe(id);
        let (read_half, write_half) = stream.into_split();
        let mut reader = FramedRead::new(read_half, LineCodec::with_max_len(settings.max_line_length));
        let mut writer = FramedWrite::new(write_half, LineCodec::new());
        let mut dispatcher = Dispatcher::new(id, registry, Arc::clone(&engine), Arc::clone(&settings));

        let timeout = settings.connection_timeout();
        let timeout_enabled = !timeout.is_zero();
        let deadline = sleep(timeout);
        tokio::pin!(deadline);

        info!(clients = engine.events().subscriber_count(), "Client connected");
        let result = async {
            send_lines(&mut writer, vec![greeting()]).await?;

            loop {
                let select_result = tokio::select! {
                    line = reader.next() => match line {
                        Some(Ok(line)) => SelectResult::Request(line),
                        Some(Err(e)) => {
                            debug!(error = %e, "Unreadable request, closing");
                            SelectResult::Closed
                        }
                        None => SelectResult::Closed,
                    },

                    Some(subsystem) = events.recv() => SelectResult::Event(subsystem),

                    () = &mut deadline, if timeout_enabled && !dispatcher.is_idle() => {
                        SelectResult::TimedOut
                    }
                };

                match select_result {
                    SelectResult::Request(line) => {
                        if !starts_with_lowercase(&line) {
                            debug!(line = %line, "Request does not start with a command, closing");
                            break;
                        }
                        debug!(request = %line, "Request");
                        match dispatcher.handle_request(&line) {
                            Outcome::Close => break,
                            Outcome::Reply(lines) => send_lines(&mut writer, lines).await?,
                        }
                        deadline.as_mut().reset(Instant::now() + timeout);
                    }
                    SelectResult::Event(subsystem) => {
                        if let Some(lines) = dispatcher.handle_idle(&subsystem) {
                            send_lines(&mut writer, lines).await?;
                            deadline.as_mut().reset(Instant::now() + timeout);
                        }
                    }
                    SelectResult::TimedOut => {
                        info!(seconds = timeout.as_secs(), "Connection timed out");
                        break;
                    }
                    SelectResult::Closed => break,
                }
            }
            Ok::<(), ProtocolError>(())
        }
        .await;

        engine.events().unsubscribe(id);
        info!("Client disconnected");
        Ok(result?)
    }
}

/// A request must begin with a lowercase letter; anything else, including an
/// empty line, ends the connection.
fn starts_with_lowercase(line: &str) -> bool {
    line.chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() && c.is_lowercase())
}

/// Write all lines, then flush once. Nothing is written for an empty reply.
async fn send_lines<W>(
    writer: &mut FramedWrite<W, LineCodec>,
    lines: Vec<String>,
) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    if lines.is_empty() {
        return Ok(());
    }
    for line in lines {
        writer.feed(line).await?;
    }
    writer.flush().await
}
