use crate::dispatch::Dispatcher;
use crate::error::{ClawsError, Result};
use colored::Color;
use std::io;

/// Kind of transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Client-side diagnostics
    Debug,
    Error,
    /// Messages the user sent
    User,
    /// Messages the server sent
    Server,
}

impl Category {
    pub fn color(self) -> Color {
        match self {
            Self::Debug => Color::Cyan,
            Self::Error => Color::Red,
            Self::User => Color::Green,
            Self::Server => Color::White,
        }
    }
}

/// Destination for rendered transcript text. Only ever touched by jobs
/// running on the UI loop.
pub trait OutputSink {
    /// Write one complete, newline-terminated entry
    fn write_entry(&mut self, category: Category, text: &str) -> io::Result<()>;

    /// Redraw the line the user is editing
    fn show_input(&mut self, _line: &str) -> io::Result<()> {
        Ok(())
    }
}

/// Give `text` a trailing newline unless it already ends with one
pub fn terminate_line(text: impl Into<String>) -> String {
    let mut text = text.into();
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// Appends category-tagged lines to the transcript by scheduling writes on
/// the UI dispatch queue. Never writes to the sink directly.
#[derive(Clone)]
pub struct Transcript {
    dispatcher: Dispatcher,
}

impl Transcript {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Schedule an entry from the UI loop
    pub fn append(&self, category: Category, text: impl Into<String>) -> Result<()> {
        let text = terminate_line(text);
        self.dispatcher
            .submit(move |sink| write(sink, category, &text))
    }

    /// Schedule an entry from a background task, waiting for room in the
    /// dispatch backlog
    pub async fn append_throttled(&self, category: Category, text: impl Into<String>) -> Result<()> {
        let text = terminate_line(text);
        self.dispatcher
            .submit_throttled(move |sink| write(sink, category, &text))
            .await
    }

    pub fn debug(&self, text: impl Into<String>) -> Result<()> {
        self.append(Category::Debug, text)
    }

    pub fn error(&self, text: impl Into<String>) -> Result<()> {
        self.append(Category::Error, text)
    }

    pub fn user(&self, text: impl Into<String>) -> Result<()> {
        self.append(Category::User, text)
    }

    #[allow(dead_code)]
    pub fn server(&self, text: impl Into<String>) -> Result<()> {
        self.append(Category::Server, text)
    }
}

fn write(sink: &mut dyn OutputSink, category: Category, text: &str) -> Result<()> {
    sink.write_entry(category, text)
        .map_err(ClawsError::SinkWrite)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Sink that keeps every entry in memory
    #[derive(Debug, Default)]
    pub struct Recorder {
        pub entries: Vec<(Category, String)>,
        pub input: Option<String>,
        pub fail_writes: bool,
    }

    impl Recorder {
        pub fn failing() -> Self {
            Self {
                fail_writes: true,
                ..Self::default()
            }
        }

        pub fn texts(&self) -> Vec<&str> {
            self.entries.iter().map(|(_, t)| t.as_str()).collect()
        }
    }

    impl OutputSink for Recorder {
        fn write_entry(&mut self, category: Category, text: &str) -> io::Result<()> {
            if self.fail_writes {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
            }
            self.entries.push((category, text.to_string()));
            Ok(())
        }

        fn show_input(&mut self, line: &str) -> io::Result<()> {
            self.input = Some(line.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::Recorder;
    use super::*;
    use crate::dispatch;

    #[test]
    fn test_terminate_line() {
        assert_eq!(terminate_line("hi"), "hi\n");
        assert_eq!(terminate_line("hi\n"), "hi\n");
        assert_eq!(terminate_line("hi  "), "hi  \n");
        assert_eq!(terminate_line(""), "\n");
    }

    #[test]
    fn test_entries_are_scheduled_not_written() {
        let (dispatcher, mut queue) = dispatch::channel(8);
        let transcript = Transcript::new(dispatcher);
        let mut recorder = Recorder::default();

        transcript.debug("connecting").unwrap();
        transcript.error("boom\n").unwrap();
        transcript.user("hello").unwrap();
        transcript.server("world").unwrap();
        assert!(recorder.entries.is_empty());

        assert!(queue.run_pending(&mut recorder).is_empty());
        assert_eq!(
            recorder.entries,
            vec![
                (Category::Debug, "connecting\n".to_string()),
                (Category::Error, "boom\n".to_string()),
                (Category::User, "hello\n".to_string()),
                (Category::Server, "world\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_sink_failure_goes_to_runner_not_emitter() {
        let (dispatcher, mut queue) = dispatch::channel(8);
        let transcript = Transcript::new(dispatcher);

        assert!(transcript.server("lost").is_ok());

        let failures = queue.run_pending(&mut Recorder::failing());
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0], ClawsError::SinkWrite(_)));
    }

    #[test]
    fn test_append_after_ui_gone() {
        let (dispatcher, queue) = dispatch::channel(8);
        drop(queue);
        let transcript = Transcript::new(dispatcher);
        assert!(matches!(
            transcript.debug("nobody listening"),
            Err(ClawsError::DispatchClosed)
        ));
    }

    #[test]
    fn test_category_colors() {
        assert_eq!(Category::Debug.color(), Color::Cyan);
        assert_eq!(Category::Error.color(), Color::Red);
        assert_eq!(Category::User.color(), Color::Green);
        assert_eq!(Category::Server.color(), Color::White);
    }
}
