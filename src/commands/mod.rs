use crate::app::App;
use crate::error::Result;
use crate::transport::Transport;

pub mod builtin;

/// Result of command execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Keep reading input
    Continue,
    /// Leave the UI loop
    Exit,
}

/// Slash commands understood by the input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Connect to the given URL, or the configured one
    Connect(Option<String>),
    Disconnect,
    Status,
    History,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parse a submitted line. `None` means it is a message, not a command.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if !line.starts_with('/') {
            return None;
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_lowercase().as_str() {
            "/connect" | "/c" => {
                Command::Connect((!rest.is_empty()).then(|| rest.to_string()))
            }
            "/disconnect" | "/d" => Command::Disconnect,
            "/status" => Command::Status,
            "/history" => Command::History,
            "/help" | "/?" => Command::Help,
            "/quit" | "/exit" | "/q" => Command::Quit,
            _ => Command::Unknown(name.to_string()),
        };
        Some(command)
    }

    pub async fn execute<T: Transport>(self, app: &mut App<T>) -> Result<CommandResult> {
        match self {
            Command::Connect(url) => builtin::connect_command(app, url).await,
            Command::Disconnect => builtin::disconnect_command(app),
            Command::Status => builtin::status_command(app),
            Command::History => builtin::history_command(app),
            Command::Help => builtin::help_command(app),
            Command::Quit => builtin::quit_command(app),
            Command::Unknown(name) => builtin::unknown_command(app, &name),
        }
    }
}

/// All available commands with a short description (for /help)
pub static COMMANDS: &[(&str, &str)] = &[
    ("/connect <url>", "connect to a WebSocket endpoint"),
    ("/disconnect", "close the current connection"),
    ("/status", "show the connection state"),
    ("/history", "list previously sent messages"),
    ("/help", "show this help"),
    ("/quit", "leave claws"),
];
