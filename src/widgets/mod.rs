//! Widget lifecycle
//!
//! Every widget mounted on a results page implements [`Widget`]. The
//! composition host (see [`crate::host::SearchHost`]) drives each one through
//! a strict sequence:
//!
//! ```text
//! Uninitialized --init--> Active --render*--> Active --dispose--> Disposed
//! ```
//!
//! Hooks receive a [`LifecycleContext`] carrying the live search session.
//! Widgets never call each other; they talk to the session through
//! [`SearchHelper`], and the host answers a `search()` request with the next
//! round of `render` calls.

pub mod panel;
pub mod recent_searches;

use crate::catalog::SearchResults;
use crate::error::Result;
use recent_searches::RecentSearchesRenderState;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub use panel::Panel;
pub use recent_searches::{
    connect_recent_searches, recent_searches_list, RecentSearchesConnector,
    RecentSearchesListParams, RecentSearchesParams, RecentSearchesRenderer, RecentSearchesWidget,
    RendererOptions,
};

/// Session operations a widget may invoke
///
/// `search` does not run anything synchronously: it signals the host that
/// session state changed, and the host responds by searching and calling
/// `render` on every widget.
pub trait SearchHelper: Send + Sync {
    /// Set the active query without searching
    fn set_query(&self, query: &str);

    /// Request execution of the currently set query
    fn search(&self);

    /// The currently set query
    fn query(&self) -> String;
}

/// Identifies one search session (one host instance)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Live session data handed to every lifecycle hook
#[derive(Clone)]
pub struct LifecycleContext {
    pub helper: Arc<dyn SearchHelper>,
    pub instance_id: InstanceId,
    /// Results of the most recent search, if one has completed
    pub results: Option<Arc<SearchResults>>,
}

impl LifecycleContext {
    pub fn new(helper: Arc<dyn SearchHelper>, instance_id: InstanceId) -> Self {
        Self {
            helper,
            instance_id,
            results: None,
        }
    }

    pub fn with_results(mut self, results: Arc<SearchResults>) -> Self {
        self.results = Some(results);
        self
    }
}

impl std::fmt::Debug for LifecycleContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleContext")
            .field("instance_id", &self.instance_id)
            .field("query", &self.helper.query())
            .field("results", &self.results)
            .finish()
    }
}

/// The lifecycle contract between a widget and the composition host
pub trait Widget {
    /// Stable type tag, also the namespace in [`GlobalRenderState`]
    fn widget_type(&self) -> &'static str;

    /// Called exactly once, before any `render`
    fn init(&mut self, ctx: &LifecycleContext) -> Result<()>;

    /// Called after every change of the search session
    fn render(&mut self, ctx: &LifecycleContext) -> Result<()>;

    /// Called exactly once, after the last `render`
    fn dispose(&mut self, ctx: &LifecycleContext) -> Result<()>;

    /// Derive this widget's render state. Reads only; safe to call repeatedly.
    fn get_widget_render_state(&self, ctx: &LifecycleContext) -> Result<WidgetRenderState>;

    /// Merge this widget's render state into the page-wide aggregate
    fn get_render_state(
        &self,
        global: GlobalRenderState,
        ctx: &LifecycleContext,
    ) -> Result<GlobalRenderState>;
}

/// Render state of one widget, by widget kind
#[derive(Debug, Clone)]
pub enum WidgetRenderState {
    RecentSearches(RecentSearchesRenderState),
}

impl WidgetRenderState {
    pub fn as_recent_searches(&self) -> Option<&RecentSearchesRenderState> {
        match self {
            WidgetRenderState::RecentSearches(state) => Some(state),
        }
    }
}

/// Render states of every registered widget: widget type -> key -> state
#[derive(Debug, Clone, Default)]
pub struct GlobalRenderState {
    widgets: BTreeMap<String, BTreeMap<String, WidgetRenderState>>,
}

impl GlobalRenderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, widget_type: &str, key: &str) -> Option<&WidgetRenderState> {
        self.widgets.get(widget_type)?.get(key)
    }

    /// Keys registered under one widget type
    pub fn keys(&self, widget_type: &str) -> Vec<&str> {
        self.widgets
            .get(widget_type)
            .map(|by_key| by_key.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.widgets.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Return `global` with the `(widget_type, key)` entry replaced by `state`.
/// Every other entry is carried over untouched.
pub fn merge_render_state(
    global: GlobalRenderState,
    widget_type: &str,
    key: &str,
    state: WidgetRenderState,
) -> GlobalRenderState {
    let mut next = global;
    next.widgets
        .entry(widget_type.to_string())
        .or_default()
        .insert(key.to_string(), state);
    next
}

/// Where a widget is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecyclePhase {
    #[default]
    Uninitialized,
    Active,
    Disposed,
}

impl LifecyclePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecyclePhase::Uninitialized => "uninitialized",
            LifecyclePhase::Active => "active",
            LifecyclePhase::Disposed => "disposed",
        }
    }
}
