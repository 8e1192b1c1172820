//! Search session and widget composition host
//!
//! [`SearchHost`] plays the orchestrator role for a results page: it owns the
//! registered widgets, drives their lifecycle, executes searches through a
//! [`SearchBackend`], and keeps the page-wide [`GlobalRenderState`].
//!
//! Widgets request work through [`SearchSession`]: `search()` only enqueues a
//! [`SessionEvent`]. The host picks events up in [`SearchHost::process_events`]
//! and answers each one with a search followed by a `render` of every widget,
//! so a widget action never re-enters the host while it is rendering.

use crate::catalog::{SearchBackend, SearchResults};
use crate::error::Result;
use crate::logging;
use crate::widgets::{GlobalRenderState, InstanceId, LifecycleContext, SearchHelper, Widget};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::Arc;

/// Signals from the session to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Session state changed; search `query` and re-render
    SearchRequested { query: String },
}

/// The live search session shared with widgets
#[derive(Debug)]
pub struct SearchSession {
    instance_id: InstanceId,
    query: Mutex<String>,
    events: Sender<SessionEvent>,
}

impl SearchSession {
    pub fn new() -> (Self, Receiver<SessionEvent>) {
        let (tx, rx) = unbounded();
        let session = Self {
            instance_id: InstanceId::next(),
            query: Mutex::new(String::new()),
            events: tx,
        };
        (session, rx)
    }

    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }
}

impl SearchHelper for SearchSession {
    fn set_query(&self, query: &str) {
        *self.query.lock() = query.to_string();
    }

    fn search(&self) {
        let query = self.query.lock().clone();
        if self
            .events
            .send(SessionEvent::SearchRequested { query })
            .is_err()
        {
            logging::debug("HOST", "search requested after host shut down");
        }
    }

    fn query(&self) -> String {
        self.query.lock().clone()
    }
}

/// Orchestrates widgets around one search session
pub struct SearchHost<B: SearchBackend> {
    session: Arc<SearchSession>,
    events: Receiver<SessionEvent>,
    backend: B,
    widgets: Vec<Box<dyn Widget>>,
    results: Option<Arc<SearchResults>>,
    render_state: GlobalRenderState,
    started: bool,
    disposed: bool,
}

impl<B: SearchBackend> SearchHost<B> {
    pub fn new(backend: B) -> Self {
        let (session, events) = SearchSession::new();
        Self {
            session: Arc::new(session),
            events,
            backend,
            widgets: Vec::new(),
            results: None,
            render_state: GlobalRenderState::new(),
            started: false,
            disposed: false,
        }
    }

    /// Register a widget. Widgets added after `start` are initialized at once.
    pub fn add_widget(&mut self, mut widget: Box<dyn Widget>) -> Result<()> {
        if self.started && !self.disposed {
            widget.init(&self.context())?;
        }
        self.widgets.push(widget);
        Ok(())
    }

    pub fn add_widgets<I>(&mut self, widgets: I) -> Result<()>
    where
        I: IntoIterator<Item = Box<dyn Widget>>,
    {
        for widget in widgets {
            self.add_widget(widget)?;
        }
        Ok(())
    }

    pub fn session(&self) -> Arc<SearchSession> {
        self.session.clone()
    }

    /// Context handed to lifecycle hooks right now
    pub fn context(&self) -> LifecycleContext {
        let helper: Arc<dyn SearchHelper> = self.session.clone();
        let ctx = LifecycleContext::new(helper, self.session.instance_id());
        match &self.results {
            Some(results) => ctx.with_results(results.clone()),
            None => ctx,
        }
    }

    /// Initialize every widget, then run the first search
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }
        logging::info(
            "HOST",
            &format!(
                "starting {} with {} widget(s)",
                self.session.instance_id(),
                self.widgets.len()
            ),
        );

        let ctx = self.context();
        for widget in &mut self.widgets {
            widget.init(&ctx)?;
        }
        self.started = true;

        self.session.search();
        self.process_events()?;
        Ok(())
    }

    /// Answer queued session events. Returns how many searches ran.
    pub fn process_events(&mut self) -> Result<usize> {
        if !self.started {
            return Ok(0);
        }

        let mut searches = 0;
        while let Ok(event) = self.events.try_recv() {
            if self.disposed {
                continue;
            }
            match event {
                SessionEvent::SearchRequested { query } => {
                    self.run_search(&query)?;
                    searches += 1;
                }
            }
        }
        Ok(searches)
    }

    fn run_search(&mut self, query: &str) -> Result<()> {
        let results = self.backend.search(query)?;
        logging::debug(
            "HOST",
            &format!("search '{}' -> {} hit(s)", query, results.nb_hits),
        );
        self.results = Some(Arc::new(results));

        let ctx = self.context();
        for widget in &mut self.widgets {
            widget.render(&ctx)?;
        }

        let mut render_state = GlobalRenderState::new();
        for widget in &self.widgets {
            render_state = widget.get_render_state(render_state, &ctx)?;
        }
        self.render_state = render_state;
        Ok(())
    }

    /// Tear down every widget. Later calls and events are ignored.
    pub fn dispose(&mut self) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        self.disposed = true;

        if !self.started {
            return Ok(());
        }

        let ctx = self.context();
        for widget in &mut self.widgets {
            widget.dispose(&ctx)?;
        }
        logging::info("HOST", &format!("disposed {}", self.session.instance_id()));
        Ok(())
    }

    pub fn results(&self) -> Option<&SearchResults> {
        self.results.as_deref()
    }

    pub fn render_state(&self) -> &GlobalRenderState {
        &self.render_state
    }

    pub fn query(&self) -> String {
        self.session.query()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }
}
