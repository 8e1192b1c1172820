//! Recent searches renderer
//!
//! Turns a [`RecentSearchesRenderState`] into a [`ListView`] inside one page
//! container. Each render replaces the previous presentation wholesale.

use super::connector::{DisposeFn, RecentSearchesRenderState, RenderFn};
use crate::error::{ResiftError, Result};
use crate::page::{Container, ListRow, ListView, Page, RowAction};
use std::sync::Arc;

/// Where the renderer draws: a selector looked up once, or a direct handle
#[derive(Debug, Clone)]
pub enum ContainerRef {
    Selector(String),
    Handle(Container),
}

impl From<&str> for ContainerRef {
    fn from(selector: &str) -> Self {
        ContainerRef::Selector(selector.to_string())
    }
}

impl From<Container> for ContainerRef {
    fn from(container: Container) -> Self {
        ContainerRef::Handle(container)
    }
}

/// Class names applied to the rendered elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssClasses {
    pub root: String,
    pub list: String,
    pub item: String,
    pub label_text: String,
    pub remove: String,
}

impl Default for CssClasses {
    fn default() -> Self {
        Self {
            root: "ais-RecentSearchesList".to_string(),
            list: "ais-RecentSearchesList-list".to_string(),
            item: "ais-RecentSearchesList-item".to_string(),
            label_text: "ais-RecentSearchesList-labelText".to_string(),
            remove: "ais-RecentSearchesList-remove".to_string(),
        }
    }
}

/// Produces the label text for one entry
pub type ItemTemplate = Arc<dyn Fn(&str) -> String + Send + Sync>;

#[derive(Clone)]
pub struct Templates {
    pub item_label: ItemTemplate,
    pub remove_label: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            item_label: Arc::new(|item: &str| item.to_string()),
            remove_label: "x".to_string(),
        }
    }
}

impl std::fmt::Debug for Templates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Templates")
            .field("remove_label", &self.remove_label)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct RendererOptions {
    pub container: ContainerRef,
    pub css_classes: CssClasses,
    pub templates: Templates,
}

impl RendererOptions {
    pub fn new(container: impl Into<ContainerRef>) -> Self {
        Self {
            container: container.into(),
            css_classes: CssClasses::default(),
            templates: Templates::default(),
        }
    }

    pub fn with_css_classes(mut self, css_classes: CssClasses) -> Self {
        self.css_classes = css_classes;
        self
    }

    pub fn with_templates(mut self, templates: Templates) -> Self {
        self.templates = templates;
        self
    }
}

/// Draws recent searches into a page container
#[derive(Debug, Clone)]
pub struct RecentSearchesRenderer {
    container: Container,
    css_classes: CssClasses,
    templates: Templates,
}

impl RecentSearchesRenderer {
    /// Resolve the container once; it is reused for the renderer's lifetime
    pub fn new(options: RendererOptions, page: &Page) -> Result<Self> {
        let container = match options.container {
            ContainerRef::Handle(container) => container,
            ContainerRef::Selector(selector) => page
                .query_selector(&selector)
                .ok_or(ResiftError::ContainerNotFound(selector))?,
        };

        Ok(Self {
            container,
            css_classes: options.css_classes,
            templates: options.templates,
        })
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Replace the container's list with one row per entry
    pub fn render(&self, state: &RecentSearchesRenderState) -> Result<()> {
        let rows = state
            .items
            .iter()
            .map(|item| self.row(state, item))
            .collect();

        self.container.set_body(Some(ListView {
            root_class: self.css_classes.root.clone(),
            list_class: self.css_classes.list.clone(),
            rows,
        }));
        Ok(())
    }

    /// Remove everything this renderer presented
    pub fn dispose(&self) -> Result<()> {
        self.container.clear();
        Ok(())
    }

    /// Split into the callback pair a connector expects
    pub fn into_callbacks(self) -> (RenderFn, DisposeFn) {
        let renderer = Arc::new(self);

        let render_fn: RenderFn = {
            let renderer = renderer.clone();
            Arc::new(move |state: &RecentSearchesRenderState, _first: bool| renderer.render(state))
        };
        let dispose_fn: DisposeFn = Arc::new(move || renderer.dispose());

        (render_fn, dispose_fn)
    }

    fn row(&self, state: &RecentSearchesRenderState, item: &str) -> ListRow {
        let on_select: RowAction = {
            let click = state.click_search_action();
            let item = item.to_string();
            Arc::new(move || click(item.as_str()))
        };
        let on_remove: RowAction = {
            let remove = state.remove_search_action();
            let item = item.to_string();
            Arc::new(move || remove(item.as_str()))
        };

        let mut row = ListRow::new(item, (self.templates.item_label)(item), on_select, on_remove);
        row.item_class = self.css_classes.item.clone();
        row.label_class = self.css_classes.label_text.clone();
        row.remove_label = self.templates.remove_label.clone();
        row.remove_class = self.css_classes.remove.clone();
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::recent_searches::SearchAction;
    use crate::widgets::InstanceId;
    use parking_lot::Mutex;

    fn recording_state(items: &[&str]) -> (RecentSearchesRenderState, Arc<Mutex<Vec<String>>>) {
        let log: Arc<Mutex<Vec<String>>> = Arc::default();
        let click: SearchAction = {
            let log = log.clone();
            Arc::new(move |q: &str| {
                log.lock().push(format!("click:{}", q));
                Ok(())
            })
        };
        let remove: SearchAction = {
            let log = log.clone();
            Arc::new(move |q: &str| {
                log.lock().push(format!("remove:{}", q));
                Ok(())
            })
        };
        let state = RecentSearchesRenderState::new(
            items.iter().map(|s| s.to_string()).collect(),
            InstanceId::next(),
            click,
            remove,
        );
        (state, log)
    }

    #[test]
    fn unknown_selector_fails_at_construction() {
        let page = Page::new();
        let err = RecentSearchesRenderer::new(RendererOptions::new("#missing"), &page).unwrap_err();
        assert!(matches!(err, ResiftError::ContainerNotFound(ref s) if s == "#missing"));
    }

    #[test]
    fn renders_one_row_per_item_with_default_classes() {
        let page = Page::new();
        let container = page.mount("#recent-searches");
        let renderer =
            RecentSearchesRenderer::new(RendererOptions::new("#recent-searches"), &page).unwrap();
        let (state, _) = recording_state(&["shoes", "hat"]);

        renderer.render(&state).unwrap();

        let body = container.snapshot().body.expect("rendered body");
        assert_eq!(body.root_class, "ais-RecentSearchesList");
        assert_eq!(body.list_class, "ais-RecentSearchesList-list");
        let labels: Vec<&str> = body.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["shoes", "hat"]);
        assert_eq!(body.rows[0].item_class, "ais-RecentSearchesList-item");
        assert_eq!(body.rows[0].remove_label, "x");
    }

    #[test]
    fn row_controls_invoke_bound_actions() {
        let container = Container::new("direct");
        let renderer =
            RecentSearchesRenderer::new(RendererOptions::new(container.clone()), &Page::new())
                .unwrap();
        let (state, log) = recording_state(&["shoes", "hat"]);
        renderer.render(&state).unwrap();

        let body = container.snapshot().body.unwrap();
        body.rows[1].select().unwrap();
        body.rows[0].remove().unwrap();
        assert_eq!(*log.lock(), vec!["click:hat", "remove:shoes"]);
    }

    #[test]
    fn rerender_replaces_previous_rows() {
        let container = Container::new("c");
        let renderer =
            RecentSearchesRenderer::new(RendererOptions::new(container.clone()), &Page::new())
                .unwrap();
        renderer.render(&recording_state(&["a", "b", "c"]).0).unwrap();
        renderer.render(&recording_state(&[]).0).unwrap();

        let body = container.snapshot().body.expect("empty shell still rendered");
        assert!(body.rows.is_empty());
    }

    #[test]
    fn custom_templates_and_classes_apply() {
        let container = Container::new("c");
        let options = RendererOptions::new(container.clone())
            .with_css_classes(CssClasses {
                item: "row".into(),
                ..CssClasses::default()
            })
            .with_templates(Templates {
                item_label: Arc::new(|item: &str| format!("> {}", item)),
                remove_label: "del".into(),
            });
        let renderer = RecentSearchesRenderer::new(options, &Page::new()).unwrap();
        renderer.render(&recording_state(&["a"]).0).unwrap();

        let row = &container.snapshot().body.unwrap().rows[0];
        assert_eq!(row.label, "> a");
        assert_eq!(row.item, "a");
        assert_eq!(row.item_class, "row");
        assert_eq!(row.remove_label, "del");
    }

    #[test]
    fn dispose_clears_container() {
        let container = Container::new("c");
        let renderer =
            RecentSearchesRenderer::new(RendererOptions::new(container.clone()), &Page::new())
                .unwrap();
        let (render_fn, dispose_fn) = renderer.into_callbacks();

        render_fn(&recording_state(&["a"]).0, true).unwrap();
        assert!(!container.is_empty());
        dispose_fn().unwrap();
        assert!(container.is_empty());
    }
}
