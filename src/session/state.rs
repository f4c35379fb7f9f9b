use crate::error::{ClawsError, Result};
use crate::session::{pump, HistoryRing};
use crate::transcript::Transcript;
use crate::transport::{Link, Transport};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A live connection and the reader draining it
struct Connection {
    address: String,
    outbound: mpsc::Sender<String>,
    reader: JoinHandle<usize>,
}

/// State of one client run: sent-message history and the current
/// connection. Owned by the UI loop; every mutation goes through `&mut self`.
pub struct Session<T: Transport> {
    transport: T,
    history: HistoryRing,
    connection: Option<Connection>,
    transcript: Transcript,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T, transcript: Transcript) -> Self {
        Self {
            transport,
            history: HistoryRing::new(),
            connection: None,
            transcript,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn history(&self) -> &HistoryRing {
        &self.history
    }

    pub fn record(&mut self, message: impl Into<String>) {
        self.history.record(message);
    }

    pub fn browse(&mut self, step: isize) -> String {
        self.history.browse(step)
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn address(&self) -> Option<&str> {
        self.connection.as_ref().map(|c| c.address.as_str())
    }

    /// Open a connection and start forwarding its messages to the transcript.
    ///
    /// Fails with `AlreadyConnected` while a connection is owned, leaving it
    /// untouched. Transport failures are returned as is and leave the
    /// session disconnected.
    pub async fn connect(&mut self, address: &str) -> Result<()> {
        if self.connection.is_some() {
            return Err(ClawsError::AlreadyConnected);
        }

        let Link { outbound, inbound } = self.transport.open(address).await?;
        let reader = pump::spawn_reader(inbound, self.transcript.clone());

        tracing::debug!("Connected to {}", address);
        self.connection = Some(Connection {
            address: address.to_string(),
            outbound,
            reader,
        });

        Ok(())
    }

    /// Record `text` in history, then echo it and hand it to the connection.
    ///
    /// A connection whose reader has already finished is released here and
    /// the message is refused with `TransportClosed`.
    pub async fn send(&mut self, text: &str) -> Result<()> {
        self.record(text);
        self.history.reset_cursor();

        if self.reap_closed().is_some() {
            return Err(ClawsError::TransportClosed);
        }
        let connection = self.connection.as_ref().ok_or(ClawsError::NotConnected)?;
        self.transcript.user(text)?;
        connection
            .outbound
            .send(text.to_string())
            .await
            .map_err(|_| ClawsError::TransportClosed)
    }

    /// Drop the owned connection. The transport closes the socket and then
    /// the reader ends on its own. Returns whether anything was connected.
    pub fn disconnect(&mut self) -> bool {
        match self.connection.take() {
            Some(connection) => {
                tracing::debug!("Disconnecting from {}", connection.address);
                true
            }
            None => false,
        }
    }

    /// Clear the connection slot once its reader has finished, returning
    /// the address that went away.
    pub fn reap_closed(&mut self) -> Option<String> {
        if !self.connection.as_ref()?.reader.is_finished() {
            return None;
        }
        let connection = self.connection.take()?;
        tracing::debug!("Connection to {} closed", connection.address);
        Some(connection.address)
    }
}
