use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Error, Debug)]
pub enum ClawsError {
    #[error("Already connected")]
    AlreadyConnected,

    #[error("Not connected")]
    NotConnected,

    #[error("WebSocket error: {0}")]
    Transport(#[from] tungstenite::Error),

    #[error("Connection closed by transport")]
    TransportClosed,

    #[error("Failed to write transcript: {0}")]
    SinkWrite(std::io::Error),

    #[error("UI dispatch queue is closed")]
    DispatchClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{message}: {source}")]
    Context {
        message: String,
        source: Box<ClawsError>,
    },
}

impl ClawsError {
    /// Short suggestion shown below the error line, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::AlreadyConnected => Some("Use /disconnect before connecting elsewhere"),
            Self::NotConnected => Some("Use /connect <url> first"),
            Self::TransportClosed => Some("The server went away; use /connect <url> to reconnect"),
            Self::Transport(_) => Some("Check the URL scheme (ws:// or wss://) and that the server is up"),
            Self::Context { source, .. } => source.hint(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClawsError>;
