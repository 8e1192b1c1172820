//! Recent searches connector
//!
//! The connector owns the data side of the widget: it reads the persisted
//! list for its key, binds the two row actions to the live session, and
//! forwards the resulting [`RecentSearchesRenderState`] to whatever render
//! callback it was connected with. It never touches the UI itself.

use crate::error::Result;
use crate::logging;
use crate::recent::RecentSearches;
use crate::widgets::{
    merge_render_state, GlobalRenderState, InstanceId, LifecycleContext, LifecyclePhase, Widget,
    WidgetRenderState,
};
use std::sync::Arc;

/// Type tag of the recent searches widget
pub const WIDGET_TYPE: &str = "resift.recentSearchesList";

/// A session action bound to one query string
pub type SearchAction = Arc<dyn Fn(&str) -> Result<()> + Send + Sync>;

/// Render callback: `(state, is_first_render)`
pub type RenderFn = Arc<dyn Fn(&RecentSearchesRenderState, bool) -> Result<()> + Send + Sync>;

/// Dispose callback, releases whatever the render callback set up
pub type DisposeFn = Arc<dyn Fn() -> Result<()> + Send + Sync>;

/// Snapshot handed to the render callback on every lifecycle call
#[derive(Clone)]
pub struct RecentSearchesRenderState {
    /// Stored entries at the time of the call, newest first
    pub items: Vec<String>,
    /// Session the actions are bound to
    pub instance_id: InstanceId,
    click_search: SearchAction,
    remove_search: SearchAction,
}

impl RecentSearchesRenderState {
    pub fn new(
        items: Vec<String>,
        instance_id: InstanceId,
        click_search: SearchAction,
        remove_search: SearchAction,
    ) -> Self {
        Self {
            items,
            instance_id,
            click_search,
            remove_search,
        }
    }

    /// Make `query` the active query and search it again
    pub fn click_search(&self, query: &str) -> Result<()> {
        (self.click_search)(query)
    }

    /// Forget `query`, then search so every widget re-renders
    pub fn remove_search(&self, query: &str) -> Result<()> {
        (self.remove_search)(query)
    }

    pub fn click_search_action(&self) -> SearchAction {
        self.click_search.clone()
    }

    pub fn remove_search_action(&self) -> SearchAction {
        self.remove_search.clone()
    }
}

impl std::fmt::Debug for RecentSearchesRenderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecentSearchesRenderState")
            .field("items", &self.items)
            .field("instance_id", &self.instance_id)
            .finish_non_exhaustive()
    }
}

/// Per-widget parameters
#[derive(Debug, Clone)]
pub struct RecentSearchesParams {
    /// Storage key of the list this widget shows
    pub key: String,
    pub store: RecentSearches,
}

/// Factory for recent searches widgets sharing one pair of callbacks
#[derive(Clone)]
pub struct RecentSearchesConnector {
    render_fn: RenderFn,
    dispose_fn: DisposeFn,
}

/// Connect a render callback (and optionally a dispose callback) to the
/// recent searches data source.
pub fn connect_recent_searches(
    render_fn: RenderFn,
    dispose_fn: Option<DisposeFn>,
) -> RecentSearchesConnector {
    let dispose_fn = match dispose_fn {
        Some(dispose_fn) => dispose_fn,
        None => {
            let noop: DisposeFn = Arc::new(|| Ok(()));
            noop
        }
    };
    RecentSearchesConnector {
        render_fn,
        dispose_fn,
    }
}

impl RecentSearchesConnector {
    /// Create a widget bound to `params.key`
    pub fn create(&self, params: RecentSearchesParams) -> RecentSearchesWidget {
        RecentSearchesWidget {
            key: params.key,
            store: params.store,
            render_fn: self.render_fn.clone(),
            dispose_fn: self.dispose_fn.clone(),
            phase: LifecyclePhase::Uninitialized,
        }
    }
}

/// The recent searches widget, as produced by [`RecentSearchesConnector`]
pub struct RecentSearchesWidget {
    key: String,
    store: RecentSearches,
    render_fn: RenderFn,
    dispose_fn: DisposeFn,
    phase: LifecyclePhase,
}

impl RecentSearchesWidget {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    /// Fresh render state: reads the store, binds actions to `ctx`'s session
    pub fn recent_searches_render_state(
        &self,
        ctx: &LifecycleContext,
    ) -> Result<RecentSearchesRenderState> {
        let items = self.store.get(&self.key)?;

        let click_search: SearchAction = {
            let helper = ctx.helper.clone();
            Arc::new(move |query: &str| {
                helper.set_query(query);
                helper.search();
                Ok(())
            })
        };

        let remove_search: SearchAction = {
            let helper = ctx.helper.clone();
            let store = self.store.clone();
            let key = self.key.clone();
            Arc::new(move |query: &str| {
                store.remove(&key, query)?;
                // no store change is visible until the host renders again
                helper.search();
                Ok(())
            })
        };

        Ok(RecentSearchesRenderState::new(
            items,
            ctx.instance_id,
            click_search,
            remove_search,
        ))
    }

    fn enter(&mut self, hook: &str, expected: LifecyclePhase, next: LifecyclePhase) {
        logging::log_lifecycle(WIDGET_TYPE, &self.key, hook);
        if self.phase != expected {
            logging::log_lifecycle_violation(WIDGET_TYPE, &self.key, hook, self.phase.as_str());
        }
        self.phase = next;
    }
}

impl Widget for RecentSearchesWidget {
    fn widget_type(&self) -> &'static str {
        WIDGET_TYPE
    }

    fn init(&mut self, ctx: &LifecycleContext) -> Result<()> {
        self.enter("init", LifecyclePhase::Uninitialized, LifecyclePhase::Active);
        let state = self.recent_searches_render_state(ctx)?;
        (self.render_fn)(&state, true)
    }

    fn render(&mut self, ctx: &LifecycleContext) -> Result<()> {
        self.enter("render", LifecyclePhase::Active, LifecyclePhase::Active);
        let state = self.recent_searches_render_state(ctx)?;
        (self.render_fn)(&state, false)
    }

    fn dispose(&mut self, _ctx: &LifecycleContext) -> Result<()> {
        self.enter("dispose", LifecyclePhase::Active, LifecyclePhase::Disposed);
        (self.dispose_fn)()
    }

    fn get_widget_render_state(&self, ctx: &LifecycleContext) -> Result<WidgetRenderState> {
        self.recent_searches_render_state(ctx)
            .map(WidgetRenderState::RecentSearches)
    }

    fn get_render_state(
        &self,
        global: GlobalRenderState,
        ctx: &LifecycleContext,
    ) -> Result<GlobalRenderState> {
        let state = self.get_widget_render_state(ctx)?;
        Ok(merge_render_state(global, WIDGET_TYPE, &self.key, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResiftError;
    use crate::storage::{MemoryStorage, SharedStorage, StorageArea};
    use crate::widgets::SearchHelper;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records every call the connector makes on the session
    #[derive(Default)]
    struct RecordingHelper {
        calls: Mutex<Vec<String>>,
    }

    impl SearchHelper for RecordingHelper {
        fn set_query(&self, query: &str) {
            self.calls.lock().push(format!("set_query:{}", query));
        }

        fn search(&self) {
            self.calls.lock().push("search".to_string());
        }

        fn query(&self) -> String {
            String::new()
        }
    }

    /// Storage wrapper counting every read and write
    #[derive(Default)]
    struct CountingStorage {
        inner: MemoryStorage,
        reads: AtomicUsize,
        writes: AtomicUsize,
    }

    impl StorageArea for CountingStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.get_item(key)
        }
        fn set_item(&self, key: &str, value: &str) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set_item(key, value)
        }
        fn remove_item(&self, key: &str) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.remove_item(key)
        }
        fn keys(&self) -> Result<Vec<String>> {
            self.inner.keys()
        }
        fn clear(&self) -> Result<()> {
            self.inner.clear()
        }
    }

    type Renders = Arc<Mutex<Vec<(Vec<String>, bool)>>>;

    fn recording_connector() -> (RecentSearchesConnector, Renders, Arc<AtomicUsize>) {
        let renders: Renders = Arc::default();
        let disposed = Arc::new(AtomicUsize::new(0));

        let render_fn: RenderFn = {
            let renders = renders.clone();
            Arc::new(move |state: &RecentSearchesRenderState, first: bool| {
                renders.lock().push((state.items.clone(), first));
                Ok(())
            })
        };
        let dispose_fn: DisposeFn = {
            let disposed = disposed.clone();
            Arc::new(move || {
                disposed.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        };

        (
            connect_recent_searches(render_fn, Some(dispose_fn)),
            renders,
            disposed,
        )
    }

    fn context(helper: Arc<RecordingHelper>) -> LifecycleContext {
        LifecycleContext::new(helper, InstanceId::next())
    }

    #[test]
    fn init_renders_first_then_render_renders_again() {
        let store = RecentSearches::new(MemoryStorage::shared());
        store.upsert("R", "hat").unwrap();
        let (connector, renders, disposed) = recording_connector();
        let mut widget = connector.create(RecentSearchesParams {
            key: "R".into(),
            store: store.clone(),
        });
        let ctx = context(Arc::default());

        assert_eq!(widget.phase(), LifecyclePhase::Uninitialized);
        widget.init(&ctx).unwrap();
        assert_eq!(widget.phase(), LifecyclePhase::Active);

        store.upsert("R", "shoes").unwrap();
        widget.render(&ctx).unwrap();
        widget.dispose(&ctx).unwrap();
        assert_eq!(widget.phase(), LifecyclePhase::Disposed);

        let renders = renders.lock();
        assert_eq!(renders.len(), 2);
        assert_eq!(renders[0], (vec!["hat".to_string()], true));
        assert_eq!(renders[1], (vec!["shoes".to_string(), "hat".to_string()], false));
        assert_eq!(disposed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dispose_never_touches_the_store() {
        let storage = Arc::new(CountingStorage::default());
        let store = RecentSearches::new(storage.clone());
        let (connector, _, _) = recording_connector();
        let mut widget = connector.create(RecentSearchesParams {
            key: "R".into(),
            store,
        });
        let ctx = context(Arc::default());

        widget.init(&ctx).unwrap();
        let reads = storage.reads.load(Ordering::SeqCst);
        let writes = storage.writes.load(Ordering::SeqCst);

        widget.dispose(&ctx).unwrap();
        assert_eq!(storage.reads.load(Ordering::SeqCst), reads);
        assert_eq!(storage.writes.load(Ordering::SeqCst), writes);
    }

    #[test]
    fn click_search_sets_query_then_searches_without_writing() {
        let storage = Arc::new(CountingStorage::default());
        let store = RecentSearches::new(storage.clone());
        let (connector, _, _) = recording_connector();
        let widget = connector.create(RecentSearchesParams {
            key: "R".into(),
            store,
        });
        let helper = Arc::new(RecordingHelper::default());

        let state = widget.recent_searches_render_state(&context(helper.clone())).unwrap();
        state.click_search("shoes").unwrap();

        assert_eq!(*helper.calls.lock(), vec!["set_query:shoes", "search"]);
        assert_eq!(storage.writes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn remove_search_removes_then_searches() {
        let store = RecentSearches::new(MemoryStorage::shared());
        store.upsert("R", "hat").unwrap();
        store.upsert("R", "shoes").unwrap();
        let (connector, _, _) = recording_connector();
        let widget = connector.create(RecentSearchesParams {
            key: "R".into(),
            store: store.clone(),
        });
        let helper = Arc::new(RecordingHelper::default());

        let state = widget.recent_searches_render_state(&context(helper.clone())).unwrap();
        state.remove_search("hat").unwrap();

        assert_eq!(store.get("R").unwrap(), vec!["shoes"]);
        assert_eq!(*helper.calls.lock(), vec!["search"]);
        // the snapshot itself is not updated in place
        assert_eq!(state.items, vec!["shoes", "hat"]);
    }

    #[test]
    fn remove_search_propagates_storage_failures_without_searching() {
        struct ReadOnly(MemoryStorage);
        impl StorageArea for ReadOnly {
            fn get_item(&self, key: &str) -> Result<Option<String>> {
                self.0.get_item(key)
            }
            fn set_item(&self, key: &str, _value: &str) -> Result<()> {
                Err(ResiftError::StorageWrite {
                    key: key.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "quota exceeded"),
                })
            }
            fn remove_item(&self, key: &str) -> Result<()> {
                self.0.remove_item(key)
            }
            fn keys(&self) -> Result<Vec<String>> {
                self.0.keys()
            }
            fn clear(&self) -> Result<()> {
                self.0.clear()
            }
        }

        let storage: SharedStorage = Arc::new(ReadOnly(MemoryStorage::new()));
        let (connector, _, _) = recording_connector();
        let widget = connector.create(RecentSearchesParams {
            key: "R".into(),
            store: RecentSearches::new(storage),
        });
        let helper = Arc::new(RecordingHelper::default());

        let state = widget.recent_searches_render_state(&context(helper.clone())).unwrap();
        assert!(state.remove_search("x").is_err());
        assert!(helper.calls.lock().is_empty());
    }

    #[test]
    fn render_state_is_keyed_into_global_state() {
        let store = RecentSearches::new(MemoryStorage::shared());
        store.upsert("A", "a").unwrap();
        store.upsert("B", "b").unwrap();
        let (connector, _, _) = recording_connector();
        let a = connector.create(RecentSearchesParams {
            key: "A".into(),
            store: store.clone(),
        });
        let b = connector.create(RecentSearchesParams {
            key: "B".into(),
            store,
        });
        let ctx = context(Arc::default());

        let global = a.get_render_state(GlobalRenderState::new(), &ctx).unwrap();
        let global = b.get_render_state(global, &ctx).unwrap();

        let items_of = |key: &str| {
            global
                .get(WIDGET_TYPE, key)
                .and_then(WidgetRenderState::as_recent_searches)
                .map(|s| s.items.clone())
        };
        assert_eq!(items_of("A"), Some(vec!["a".to_string()]));
        assert_eq!(items_of("B"), Some(vec!["b".to_string()]));
    }

    #[test]
    fn missing_dispose_callback_is_a_noop() {
        let render_fn: RenderFn = Arc::new(|_: &RecentSearchesRenderState, _: bool| Ok(()));
        let connector = connect_recent_searches(render_fn, None);
        let mut widget = connector.create(RecentSearchesParams {
            key: "R".into(),
            store: RecentSearches::new(MemoryStorage::shared()),
        });
        let ctx = context(Arc::default());
        widget.init(&ctx).unwrap();
        widget.dispose(&ctx).unwrap();
    }
}
