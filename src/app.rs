use crate::commands::{Command, CommandResult};
use crate::config::ClawsConfig;
use crate::dispatch::{self, DispatchQueue};
use crate::error::{ClawsError, Result};
use crate::session::Session;
use crate::transcript::{OutputSink, Transcript};
use crate::transport::Transport;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc;

/// The UI loop: owns the session, the dispatch queue and the input line.
/// Everything that touches the screen runs here, one job at a time.
pub struct App<T: Transport> {
    session: Session<T>,
    queue: DispatchQueue,
    config: ClawsConfig,
    input: String,
}

impl<T: Transport> App<T> {
    pub fn new(transport: T, config: ClawsConfig) -> Self {
        let (dispatcher, queue) = dispatch::channel(config.pump_backlog);
        Self {
            session: Session::new(transport, Transcript::new(dispatcher)),
            queue,
            config,
            input: String::new(),
        }
    }

    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<T> {
        &mut self.session
    }

    pub fn transcript(&self) -> &Transcript {
        self.session.transcript()
    }

    pub fn config(&self) -> &ClawsConfig {
        &self.config
    }

    /// Show an error line, plus its hint when there is one
    pub fn report(&self, error: &ClawsError) -> Result<()> {
        self.transcript().error(format!("Error: {}", error))?;
        if let Some(hint) = error.hint() {
            self.transcript().debug(format!("Hint: {}", hint))?;
        }
        Ok(())
    }

    pub async fn run(
        &mut self,
        sink: &mut dyn OutputSink,
        mut keys: mpsc::Receiver<KeyEvent>,
    ) -> Result<()> {
        self.transcript()
            .debug("claws: type a message and press Enter to send, /help for commands")?;
        self.show_input()?;

        if self.config.url.is_some() {
            Command::Connect(None).execute(self).await?;
        }

        let mut reap = tokio::time::interval(Duration::from_millis(self.config.reap_interval_ms));

        loop {
            tokio::select! {
                Some(job) = self.queue.recv() => {
                    if let Err(e) = job.run(sink) {
                        tracing::warn!("Transcript write failed: {}", e);
                    }
                }
                key = keys.recv() => {
                    let Some(key) = key else { break };
                    if self.handle_key(key).await? == CommandResult::Exit {
                        break;
                    }
                }
                _ = reap.tick() => {
                    if let Some(address) = self.session.reap_closed() {
                        self.transcript()
                            .error(format!("Connection to {} closed", address))?;
                    }
                }
            }
        }

        for e in self.queue.run_pending(sink) {
            tracing::warn!("Transcript write failed during shutdown: {}", e);
        }
        Ok(())
    }

    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<CommandResult> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(CommandResult::Exit);
            }
            KeyCode::Esc => return Ok(CommandResult::Exit),
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.input);
                self.show_input()?;
                return self.submit(&line).await;
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Up => self.input = self.session.browse(1),
            KeyCode::Down => self.input = self.session.browse(-1),
            KeyCode::Char(c) => self.input.push(c),
            _ => return Ok(CommandResult::Continue),
        }
        self.show_input()?;
        Ok(CommandResult::Continue)
    }

    /// Handle a completed input line: a slash command or a message to send
    pub async fn submit(&mut self, line: &str) -> Result<CommandResult> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(CommandResult::Continue);
        }

        if let Some(command) = Command::parse(line) {
            return command.execute(self).await;
        }

        if let Err(e) = self.session.send(line).await {
            self.report(&e)?;
        }
        Ok(CommandResult::Continue)
    }

    fn show_input(&self) -> Result<()> {
        let line = self.input.clone();
        self.transcript()
            .dispatcher()
            .submit(move |sink| sink.show_input(&line).map_err(ClawsError::SinkWrite))
    }
}
