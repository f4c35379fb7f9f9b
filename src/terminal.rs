use crate::transcript::{Category, OutputSink};
use colored::Colorize;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;

const PROMPT: &str = "λ> ";

/// RAII guard that ensures raw mode is disabled when dropped.
/// Prevents terminal corruption if a panic occurs while in raw mode.
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn new() -> Option<Self> {
        if crossterm::terminal::enable_raw_mode().is_ok() {
            Some(Self)
        } else {
            None
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

/// Renders the transcript above a single editable prompt line
pub struct TerminalSink<W: Write> {
    out: W,
    input: String,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            input: String::new(),
        }
    }

    fn clear_line(&mut self) -> io::Result<()> {
        write!(self.out, "\r\x1B[2K")
    }

    fn draw_prompt(&mut self) -> io::Result<()> {
        write!(self.out, "{}{}", PROMPT.bright_green().bold(), self.input)?;
        self.out.flush()
    }
}

impl<W: Write> OutputSink for TerminalSink<W> {
    fn write_entry(&mut self, category: Category, text: &str) -> io::Result<()> {
        self.clear_line()?;
        // raw mode needs an explicit carriage return per line
        for line in text.lines() {
            write!(self.out, "{}\r\n", line.color(category.color()))?;
        }
        self.draw_prompt()
    }

    fn show_input(&mut self, line: &str) -> io::Result<()> {
        self.input = line.to_string();
        self.clear_line()?;
        self.draw_prompt()
    }
}

/// Read key presses on a dedicated thread and forward them to the UI loop.
/// Stops when `running` is cleared or the receiver is gone.
pub fn spawn_key_reader(
    keys: mpsc::Sender<KeyEvent>,
    running: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while running.load(Ordering::SeqCst) {
            if !event::poll(Duration::from_millis(50)).unwrap_or(false) {
                continue;
            }
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if keys.blocking_send(key).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Failed to read terminal event: {}", e);
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(sink: &TerminalSink<Vec<u8>>) -> String {
        String::from_utf8(sink.out.clone()).unwrap()
    }

    #[test]
    fn test_entry_lines_end_with_carriage_return() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.write_entry(Category::Server, "one\ntwo\n").unwrap();

        let out = rendered(&sink);
        assert!(out.starts_with("\r\x1B[2K"));
        assert!(out.contains("one"));
        assert!(out.contains("two"));
        assert_eq!(out.matches("\r\n").count(), 2);
    }

    #[test]
    fn test_blank_entry_still_takes_a_line() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.write_entry(Category::Debug, "\n").unwrap();
        assert_eq!(rendered(&sink).matches("\r\n").count(), 1);
    }

    #[test]
    fn test_prompt_redrawn_after_entry() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.show_input("half typed").unwrap();
        sink.write_entry(Category::Server, "incoming\n").unwrap();

        let out = rendered(&sink);
        let entry_at = out.find("incoming").unwrap();
        let last_input_at = out.rfind("half typed").unwrap();
        assert!(last_input_at > entry_at);
    }
}
