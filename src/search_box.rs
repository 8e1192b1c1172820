//! Search box state and the debounced recent-search recorder
//!
//! The search box searches on every keystroke, but only a query the user
//! settled on is worth remembering. [`RecentSearchRecorder`] keeps one
//! pending write that is pushed back on every change; when the query has
//! been stable for the whole delay it is handed out for storage.

use std::time::{Duration, Instant};

/// Reference debounce window before a query is remembered
pub const DEFAULT_RECORD_DELAY: Duration = Duration::from_millis(3000);

/// Search input state
pub struct SearchBoxState {
    pub query: String,
    /// Byte offset of the cursor, always on a char boundary
    pub cursor_pos: usize,
    pub focused: bool,
    pub needs_search: bool,
}

impl Default for SearchBoxState {
    fn default() -> Self {
        Self {
            query: String::new(),
            cursor_pos: 0,
            focused: true,
            needs_search: false,
        }
    }
}

impl SearchBoxState {
    pub fn insert_char(&mut self, c: char) {
        self.query.insert(self.cursor_pos, c);
        self.cursor_pos += c.len_utf8();
        self.needs_search = true;
    }

    pub fn backspace(&mut self) {
        if self.cursor_pos == 0 {
            return;
        }
        let prev = self.prev_boundary();
        self.query.remove(prev);
        self.cursor_pos = prev;
        self.needs_search = true;
    }

    pub fn delete(&mut self) {
        if self.cursor_pos < self.query.len() {
            self.query.remove(self.cursor_pos);
            self.needs_search = true;
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos = self.prev_boundary();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor_pos < self.query.len() {
            self.cursor_pos = self.query[self.cursor_pos..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_pos + i)
                .unwrap_or(self.query.len());
        }
    }

    pub fn home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn end(&mut self) {
        self.cursor_pos = self.query.len();
    }

    /// Replace the whole query, cursor at the end
    pub fn set_query(&mut self, query: &str) {
        if self.query != query {
            self.needs_search = true;
        }
        self.query = query.to_string();
        self.cursor_pos = self.query.len();
    }

    pub fn clear(&mut self) {
        self.set_query("");
    }

    fn prev_boundary(&self) -> usize {
        self.query[..self.cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

/// Debounced writer of committed queries
#[derive(Debug, Clone)]
pub struct RecentSearchRecorder {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Default for RecentSearchRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_RECORD_DELAY)
    }
}

impl RecentSearchRecorder {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel any pending write and schedule `query` for `now + delay`
    pub fn schedule(&mut self, query: &str, now: Instant) {
        self.pending = Some((query.to_string(), now + self.delay));
    }

    /// The pending query once its deadline has passed
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = matches!(&self.pending, Some((_, deadline)) if now >= *deadline);
        if due {
            self.flush()
        } else {
            None
        }
    }

    /// The pending query regardless of its deadline
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|(query, _)| query)
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_ref().map(|(query, _)| query.as_str())
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
