//! Test protocol client.
//!
//! Sends raw request lines and collects response lines up to the closing
//! `OK` or `ACK`.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
}

impl TestClient {
    /// Connect to a test server. The greeting is left unread.
    pub async fn connect(address: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
        })
    }

    /// Send raw bytes as-is.
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Send one request line.
    pub async fn send(&mut self, line: &str) -> anyhow::Result<()> {
        self.send_bytes(format!("{line}\n").as_bytes()).await
    }

    /// Receive a single line, without its terminator.
    pub async fn recv_line(&mut self) -> anyhow::Result<String> {
        self.recv_line_timeout(Duration::from_secs(5)).await
    }

    /// Receive a single line with a timeout.
    pub async fn recv_line_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        let mut line = String::new();
        let read = timeout(dur, self.reader.read_line(&mut line)).await??;
        anyhow::ensure!(read > 0, "connection closed");
        Ok(line.trim_end_matches('\n').to_string())
    }

    /// Receive lines up to and including the closing `OK` or `ACK` line.
    pub async fn recv_response(&mut self) -> anyhow::Result<Vec<String>> {
        let mut lines = Vec::new();
        loop {
            let line = self.recv_line().await?;
            let done = line == "OK" || line.starts_with("ACK ");
            lines.push(line);
            if done {
                return Ok(lines);
            }
        }
    }

    /// Send a request and collect its response.
    pub async fn request(&mut self, line: &str) -> anyhow::Result<Vec<String>> {
        self.send(line).await?;
        self.recv_response().await
    }

    /// Whether nothing arrives within `dur`.
    pub async fn is_silent_for(&mut self, dur: Duration) -> bool {
        let mut line = String::new();
        timeout(dur, self.reader.read_line(&mut line)).await.is_err()
    }

    /// Whether the server closes the connection within a few seconds.
    pub async fn is_closed(&mut self) -> bool {
        let mut line = String::new();
        matches!(
            timeout(Duration::from_secs(5), self.reader.read_line(&mut line)).await,
            Ok(Ok(0)) | Ok(Err(_))
        )
    }
}
