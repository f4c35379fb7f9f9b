use crate::config::HISTORY_LIMIT;
use std::collections::VecDeque;

/// Sent messages, most recent first, with a shell-style browse cursor.
///
/// The cursor is `None` while the user is on a fresh input line and
/// `Some(i)` while `entries[i]` is shown.
#[derive(Debug, Clone, Default)]
pub struct HistoryRing {
    entries: VecDeque<String>,
    cursor: Option<usize>,
}

impl HistoryRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a sent message to the front, dropping the oldest past the limit.
    /// The cursor is left where it is.
    pub fn record(&mut self, message: impl Into<String>) {
        self.entries.push_front(message.into());
        self.entries.truncate(HISTORY_LIMIT);
    }

    /// Move the cursor by `step` and return the entry under it.
    ///
    /// Positive steps go toward older entries and stick at the oldest one.
    /// Negative steps go toward newer entries and end on the empty line.
    /// A step of 0 re-reads the current position.
    pub fn browse(&mut self, step: isize) -> String {
        let current = self.cursor.map_or(-1, |i| i as isize);
        let last = self.entries.len() as isize - 1;
        let target = current.saturating_add(step).min(last).max(-1);

        self.cursor = usize::try_from(target).ok();
        match self.cursor {
            Some(i) => self.entries[i].clone(),
            None => String::new(),
        }
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    /// Cursor position with `-1` meaning the fresh input line
    #[allow(dead_code)]
    pub fn cursor(&self) -> isize {
        self.cursor.map_or(-1, |i| i as isize)
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
