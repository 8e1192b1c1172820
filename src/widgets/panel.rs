//! Panel decorator
//!
//! Wraps a render callback with a header and a visibility rule evaluated on
//! every render. The widget underneath keeps rendering normally; a hidden
//! panel only tells the page not to draw the container.

use super::recent_searches::{RecentSearchesRenderState, RenderFn};
use crate::page::Container;
use std::sync::Arc;

/// Decides from the render state whether the panel is hidden
pub type HiddenFn = Arc<dyn Fn(&RecentSearchesRenderState) -> bool + Send + Sync>;

#[derive(Clone)]
pub struct Panel {
    header: Option<String>,
    hidden: HiddenFn,
}

impl Default for Panel {
    fn default() -> Self {
        Self {
            header: None,
            hidden: Arc::new(|_: &RecentSearchesRenderState| false),
        }
    }
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    /// "Recent Searches" header, hidden while the list is empty
    pub fn recent_searches() -> Self {
        Self::new()
            .with_header("Recent Searches")
            .hidden_when(|state| state.items.is_empty())
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn hidden_when<F>(mut self, hidden: F) -> Self
    where
        F: Fn(&RecentSearchesRenderState) -> bool + Send + Sync + 'static,
    {
        self.hidden = Arc::new(hidden);
        self
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn is_hidden(&self, state: &RecentSearchesRenderState) -> bool {
        (self.hidden)(state)
    }

    /// Render callback that updates the panel chrome on `container` before
    /// delegating to `inner`
    pub fn wrap(&self, container: Container, inner: RenderFn) -> RenderFn {
        let panel = self.clone();
        Arc::new(move |state: &RecentSearchesRenderState, first: bool| {
            container.set_panel(panel.header.clone(), panel.is_hidden(state));
            inner(state, first)
        })
    }
}

impl std::fmt::Debug for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Panel")
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::recent_searches::SearchAction;
    use crate::widgets::InstanceId;

    fn state(items: &[&str]) -> RecentSearchesRenderState {
        let noop: SearchAction = Arc::new(|_: &str| Ok(()));
        RecentSearchesRenderState::new(
            items.iter().map(|s| s.to_string()).collect(),
            InstanceId::next(),
            noop.clone(),
            noop,
        )
    }

    #[test]
    fn recent_searches_panel_hides_when_empty() {
        let panel = Panel::recent_searches();
        assert_eq!(panel.header(), Some("Recent Searches"));
        assert!(panel.is_hidden(&state(&[])));
        assert!(!panel.is_hidden(&state(&["a"])));
    }

    #[test]
    fn wrapped_render_updates_panel_then_delegates() {
        let container = Container::new("c");
        let inner: RenderFn = Arc::new(|_: &RecentSearchesRenderState, _: bool| Ok(()));
        let render = Panel::recent_searches().wrap(container.clone(), inner);

        render(&state(&[]), true).unwrap();
        let content = container.snapshot();
        assert!(content.hidden);
        assert_eq!(content.header.as_deref(), Some("Recent Searches"));

        render(&state(&["a"]), false).unwrap();
        assert!(!container.snapshot().hidden);
    }

    #[test]
    fn default_panel_is_always_visible() {
        assert!(!Panel::new().is_hidden(&state(&[])));
    }
}
