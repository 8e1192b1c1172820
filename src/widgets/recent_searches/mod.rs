//! Recent searches widget
//!
//! Split the same way as any connector/renderer widget:
//!
//! - [`connector`] reads the persisted list and binds the row actions.
//! - [`renderer`] draws a list into a page container.
//!
//! [`recent_searches_list`] wires both together (optionally inside a
//! [`Panel`]) for the common case of one list in one container.

pub mod connector;
pub mod renderer;

pub use connector::{
    connect_recent_searches, DisposeFn, RecentSearchesConnector, RecentSearchesParams,
    RecentSearchesRenderState, RecentSearchesWidget, RenderFn, SearchAction, WIDGET_TYPE,
};
pub use renderer::{
    ContainerRef, CssClasses, ItemTemplate, RecentSearchesRenderer, RendererOptions, Templates,
};

use super::Panel;
use crate::error::Result;
use crate::page::Page;
use crate::recent::RecentSearches;

/// Everything needed to mount a recent searches list on a page
#[derive(Debug, Clone)]
pub struct RecentSearchesListParams {
    pub container: ContainerRef,
    pub key: String,
    pub store: RecentSearches,
    pub css_classes: CssClasses,
    pub templates: Templates,
    pub panel: Option<Panel>,
}

impl RecentSearchesListParams {
    pub fn new(container: impl Into<ContainerRef>, key: impl Into<String>, store: RecentSearches) -> Self {
        Self {
            container: container.into(),
            key: key.into(),
            store,
            css_classes: CssClasses::default(),
            templates: Templates::default(),
            panel: None,
        }
    }

    pub fn with_panel(mut self, panel: Panel) -> Self {
        self.panel = Some(panel);
        self
    }
}

/// Build a ready-to-register recent searches widget
pub fn recent_searches_list(params: RecentSearchesListParams, page: &Page) -> Result<RecentSearchesWidget> {
    let options = RendererOptions::new(params.container)
        .with_css_classes(params.css_classes)
        .with_templates(params.templates);
    let renderer = RecentSearchesRenderer::new(options, page)?;
    let container = renderer.container().clone();

    let (render_fn, dispose_fn) = renderer.into_callbacks();
    let render_fn = match params.panel {
        Some(panel) => panel.wrap(container, render_fn),
        None => render_fn,
    };

    let connector = connect_recent_searches(render_fn, Some(dispose_fn));
    Ok(connector.create(RecentSearchesParams {
        key: params.key,
        store: params.store,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SearchSession;
    use crate::storage::MemoryStorage;
    use crate::widgets::{LifecycleContext, Widget};
    use std::sync::Arc;

    #[test]
    fn mounted_list_renders_store_contents_inside_panel() {
        let page = Page::new();
        let container = page.mount("#recent-searches");
        let store = RecentSearches::new(MemoryStorage::shared());
        let params = RecentSearchesListParams::new("#recent-searches", "R", store.clone())
            .with_panel(Panel::recent_searches());
        let mut widget = recent_searches_list(params, &page).unwrap();

        let (session, _events) = SearchSession::new();
        let instance_id = session.instance_id();
        let ctx = LifecycleContext::new(Arc::new(session), instance_id);

        widget.init(&ctx).unwrap();
        assert!(container.snapshot().hidden);

        store.upsert("R", "shoes").unwrap();
        widget.render(&ctx).unwrap();
        let content = container.snapshot();
        assert!(!content.hidden);
        assert_eq!(content.body.unwrap().rows[0].label, "shoes");

        widget.dispose(&ctx).unwrap();
        assert!(container.is_empty());
    }
}
