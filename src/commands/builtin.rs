use super::{CommandResult, COMMANDS};
use crate::app::App;
use crate::error::Result;
use crate::error_ext::ResultExt;
use crate::transport::Transport;

pub async fn connect_command<T: Transport>(
    app: &mut App<T>,
    url: Option<String>,
) -> Result<CommandResult> {
    let Some(url) = url.or_else(|| app.config().url.clone()) else {
        app.transcript().error("Usage: /connect <url>")?;
        return Ok(CommandResult::Continue);
    };

    app.transcript().debug(format!("Connecting to {}", url))?;
    let outcome = app
        .session_mut()
        .connect(&url)
        .await
        .with_context(|| format!("Failed to connect to {}", url));
    match outcome {
        Ok(()) => app.transcript().debug(format!("Connected to {}", url))?,
        Err(e) => app.report(&e)?,
    }
    Ok(CommandResult::Continue)
}

pub fn disconnect_command<T: Transport>(app: &mut App<T>) -> Result<CommandResult> {
    if !app.session().is_connected() {
        app.transcript().error("Not connected")?;
        return Ok(CommandResult::Continue);
    }

    let address = app.session().address().unwrap_or_default().to_string();
    app.session_mut().disconnect();
    app.transcript().debug(format!("Disconnected from {}", address))?;
    Ok(CommandResult::Continue)
}

pub fn status_command<T: Transport>(app: &mut App<T>) -> Result<CommandResult> {
    let status = match app.session().address() {
        Some(address) => format!("Connected to {}", address),
        None => "Not connected".to_string(),
    };
    let sent = app.session().history().len();
    app.transcript()
        .debug(format!("{} ({} messages in history)", status, sent))?;
    Ok(CommandResult::Continue)
}

pub fn history_command<T: Transport>(app: &mut App<T>) -> Result<CommandResult> {
    let history = app.session().history();
    if history.is_empty() {
        app.transcript().debug("No messages sent yet")?;
        return Ok(CommandResult::Continue);
    }

    // oldest first, like a shell's `history`
    let listing = history
        .entries()
        .collect::<Vec<_>>()
        .iter()
        .rev()
        .enumerate()
        .map(|(i, entry)| format!("{:>4}  {}", i + 1, entry))
        .collect::<Vec<_>>()
        .join("\n");
    app.transcript().debug(listing)?;
    Ok(CommandResult::Continue)
}

pub fn help_command<T: Transport>(app: &mut App<T>) -> Result<CommandResult> {
    let mut help = String::from("Commands:");
    for (name, description) in COMMANDS {
        help.push_str(&format!("\n  {:<16} {}", name, description));
    }
    help.push_str("\nUp/Down browse sent messages, Esc or Ctrl-C quits.");
    app.transcript().debug(help)?;
    Ok(CommandResult::Continue)
}

pub fn quit_command<T: Transport>(app: &mut App<T>) -> Result<CommandResult> {
    app.session_mut().disconnect();
    Ok(CommandResult::Exit)
}

pub fn unknown_command<T: Transport>(app: &mut App<T>, name: &str) -> Result<CommandResult> {
    app.transcript()
        .error(format!("Unknown command: {} (try /help)", name))?;
    Ok(CommandResult::Continue)
}
