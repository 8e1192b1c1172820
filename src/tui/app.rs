use crate::host::SearchHost;
use crate::page::{Container, ListRow, Page};
use crate::recent::RecentSearches;
use crate::search_box::{RecentSearchRecorder, SearchBoxState};
use crate::tui::list::ListSelection;
use crate::tui::ui;
use crate::widgets::{recent_searches_list, Panel, RecentSearchesListParams, SearchHelper};
use crate::{logging, AppConfig, Catalog};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

pub const SEARCHBOX_SELECTOR: &str = "#searchbox";
pub const RECENT_SEARCHES_SELECTOR: &str = "#recent-searches";
pub const HITS_SELECTOR: &str = "#hits";

/// Which pane receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Recent,
    Hits,
}

pub struct App {
    pub config: AppConfig,
    pub page: Page,
    pub host: SearchHost<Catalog>,
    pub store: RecentSearches,
    pub recent_container: Container,

    // Sub-states
    pub search: SearchBoxState,
    pub recorder: RecentSearchRecorder,
    pub recent: ListSelection,
    pub hits: ListSelection,
    pub focus: Focus,

    pub status_message: String,
    pub last_error: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> crate::Result<Self> {
        let page = Page::new();
        page.mount(SEARCHBOX_SELECTOR);
        let recent_container = page.mount(RECENT_SEARCHES_SELECTOR);
        page.mount(HITS_SELECTOR);

        let store = RecentSearches::new(config.open_storage());
        let widget = recent_searches_list(
            RecentSearchesListParams::new(
                RECENT_SEARCHES_SELECTOR,
                config.storage_key.clone(),
                store.clone(),
            )
            .with_panel(Panel::recent_searches()),
            &page,
        )?;

        let mut host = SearchHost::new(config.open_catalog()?);
        host.add_widget(Box::new(widget))?;
        host.start()?;

        let recorder = RecentSearchRecorder::new(config.record_delay());

        Ok(Self {
            config,
            page,
            host,
            store,
            recent_container,
            search: SearchBoxState::default(),
            recorder,
            recent: ListSelection::default(),
            hits: ListSelection::default(),
            focus: Focus::Search,
            status_message: "Ready".to_string(),
            last_error: None,
            should_quit: false,
        })
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> crate::Result<()> {
        let tick_rate = Duration::from_millis(50);
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout).unwrap_or(false) {
                if let Ok(Event::Key(key)) = event::read() {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            if last_tick.elapsed() >= tick_rate {
                self.tick(Instant::now());
                last_tick = Instant::now();
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    /// Periodic work: start searches, commit debounced queries, answer the host
    pub fn tick(&mut self, now: Instant) {
        if self.search.needs_search {
            let session = self.host.session();
            session.set_query(&self.search.query);
            session.search();
            self.recorder.schedule(&self.search.query, now);
            self.search.needs_search = false;
        }

        if let Some(query) = self.recorder.poll(now) {
            self.record(&query);
        }

        self.pump();
    }

    /// Persist a committed query and refresh the panel
    fn record(&mut self, query: &str) {
        match self.store.upsert(&self.config.storage_key, query) {
            Ok(()) => self.host.session().search(),
            Err(e) => self.report("recording recent search", e),
        }
    }

    fn pump(&mut self) {
        match self.host.process_events() {
            Ok(0) => {}
            Ok(_) => {
                let total = self.recent_rows().len();
                self.recent.clamp(total);
                let hits = self.hit_count();
                self.hits.select_first(hits);
                self.status_message = match self.host.results() {
                    Some(results) => format!("{} results for '{}'", results.nb_hits, results.query),
                    None => "Ready".to_string(),
                };
            }
            Err(e) => self.report("search", e),
        }
    }

    fn report(&mut self, context: &str, e: crate::ResiftError) {
        let msg = format!("{} failed: {}", context, e);
        if e.is_recoverable() {
            logging::warn("APP", &msg);
        } else {
            logging::error("APP", &msg);
        }
        self.last_error = Some(msg);
    }

    /// Rows currently presented in the recent searches container
    pub fn recent_rows(&self) -> Vec<ListRow> {
        self.recent_container
            .snapshot()
            .body
            .map(|body| body.rows)
            .unwrap_or_default()
    }

    pub fn recent_hidden(&self) -> bool {
        self.recent_container.snapshot().hidden
    }

    pub fn hit_count(&self) -> usize {
        self.host.results().map(|r| r.hits.len()).unwrap_or(0)
    }

    /// Replay the selected recent search
    pub fn select_recent(&mut self) {
        let rows = self.recent_rows();
        let Some(row) = self.recent.selected.and_then(|i| rows.get(i)) else {
            return;
        };

        match row.select() {
            Ok(()) => {
                self.search.set_query(&row.item);
                // the session already searches this query
                self.search.needs_search = false;
                self.recorder.cancel();
                self.focus = Focus::Hits;
            }
            Err(e) => self.report("selecting recent search", e),
        }
        self.pump();
    }

    /// Forget the selected recent search
    pub fn remove_recent(&mut self) {
        let rows = self.recent_rows();
        let Some(row) = self.recent.selected.and_then(|i| rows.get(i)) else {
            return;
        };

        if let Err(e) = row.remove() {
            self.report("removing recent search", e);
        }
        self.pump();

        if self.recent_hidden() && self.focus == Focus::Recent {
            self.focus = Focus::Search;
        }
    }

    /// Commit any pending query and tear the page down
    pub fn shutdown(&mut self) -> crate::Result<()> {
        if let Some(query) = self.recorder.flush() {
            self.store.upsert(&self.config.storage_key, &query)?;
        }
        self.host.dispose()?;
        logging::flush();
        Ok(())
    }

    fn cycle_focus(&mut self) {
        let recent_available = !self.recent_hidden();
        self.focus = match self.focus {
            Focus::Search if recent_available => Focus::Recent,
            Focus::Search => Focus::Hits,
            Focus::Recent => Focus::Hits,
            Focus::Hits => Focus::Search,
        };
        if self.focus == Focus::Recent {
            let total = self.recent_rows().len();
            self.recent.clamp(total);
        }
        self.search.focused = self.focus == Focus::Search;
    }

    // --- Key handling ---

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.should_quit = true;
                return;
            }
            KeyCode::Esc => {
                if self.focus == Focus::Search && !self.search.query.is_empty() {
                    self.search.clear();
                } else if self.focus != Focus::Search {
                    self.focus = Focus::Search;
                    self.search.focused = true;
                } else {
                    self.should_quit = true;
                }
                return;
            }
            KeyCode::Tab => {
                self.cycle_focus();
                return;
            }
            _ => {}
        }

        self.last_error = None;
        match self.focus {
            Focus::Search => self.handle_search_key(key),
            Focus::Recent => self.handle_recent_key(key),
            Focus::Hits => self.handle_hits_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => self.search.insert_char(c),
            KeyCode::Backspace => self.search.backspace(),
            KeyCode::Delete => self.search.delete(),
            KeyCode::Left => self.search.move_left(),
            KeyCode::Right => self.search.move_right(),
            KeyCode::Home => self.search.home(),
            KeyCode::End => self.search.end(),
            KeyCode::Down | KeyCode::Enter => {
                self.focus = Focus::Hits;
                self.search.focused = false;
            }
            _ => {}
        }
    }

    fn handle_recent_key(&mut self, key: KeyEvent) {
        let total = self.recent_rows().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.recent.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.recent.select_next(total),
            KeyCode::Home => self.recent.select_first(total),
            KeyCode::End => self.recent.select_last(total),
            KeyCode::Enter => self.select_recent(),
            KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('x') => self.remove_recent(),
            _ => {}
        }
    }

    fn handle_hits_key(&mut self, key: KeyEvent) {
        let total = self.hit_count();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.hits.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.hits.select_next(total),
            KeyCode::Home => self.hits.select_first(total),
            KeyCode::End => self.hits.select_last(total),
            KeyCode::Char('/') => {
                self.focus = Focus::Search;
                self.search.focused = true;
            }
            // Any other printable char focuses search and types it
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.focus = Focus::Search;
                self.search.focused = true;
                self.search.end();
                self.search.insert_char(c);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_query(app: &mut App, query: &str) {
        for c in query.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn test_app(dir: &std::path::Path) -> App {
        let config = AppConfig {
            storage_path: dir.join("storage.json"),
            storage_key: "R".into(),
            record_delay_ms: 3000,
            ..AppConfig::default()
        };
        App::new(config).expect("app")
    }

    fn labels(app: &App) -> Vec<String> {
        app.recent_rows().into_iter().map(|r| r.item).collect()
    }

    #[test]
    fn panel_starts_hidden_on_empty_store() {
        let dir = tempdir().expect("tempdir");
        let app = test_app(dir.path());
        assert!(app.recent_hidden());
        assert!(labels(&app).is_empty());
        assert_eq!(app.hit_count(), 8);
    }

    #[test]
    fn settled_query_is_recorded_after_delay() {
        let dir = tempdir().expect("tempdir");
        let mut app = test_app(dir.path());
        let start = Instant::now();

        type_query(&mut app, "shoes");
        app.tick(start);
        assert_eq!(app.host.query(), "shoes");
        assert!(labels(&app).is_empty());

        app.tick(start + Duration::from_millis(3000));
        assert_eq!(labels(&app), vec!["shoes"]);
        assert!(!app.recent_hidden());
    }

    #[test]
    fn recent_rows_replay_and_remove() {
        let dir = tempdir().expect("tempdir");
        let mut app = test_app(dir.path());
        app.store.upsert("R", "hat").unwrap();
        app.store.upsert("R", "camera").unwrap();
        app.host.session().search();
        app.tick(Instant::now());
        assert_eq!(labels(&app), vec!["camera", "hat"]);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Recent);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.search.query, "hat");
        assert_eq!(app.host.results().unwrap().query, "hat");
        assert_eq!(app.focus, Focus::Hits);

        app.focus = Focus::Recent;
        app.recent.select_first(2);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(labels(&app), vec!["hat"]);
        assert_eq!(app.store.get("R").unwrap(), vec!["hat"]);
    }

    #[test]
    fn shutdown_flushes_pending_query() {
        let dir = tempdir().expect("tempdir");
        let mut app = test_app(dir.path());
        type_query(&mut app, "camera");
        app.tick(Instant::now());
        app.shutdown().unwrap();

        assert_eq!(app.store.get("R").unwrap(), vec!["camera"]);
        assert!(app.host.is_disposed());
        assert!(app.recent_container.is_empty());
    }
}
