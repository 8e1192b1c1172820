//! Page containers
//!
//! A [`Page`] is the set of named slots a results page is laid out from
//! (`#searchbox`, `#recent-searches`, `#hits`, ...). Widgets write their
//! presentation into a [`Container`]; the terminal UI reads containers back
//! when it draws a frame. Containers are shared handles, so a renderer that
//! resolved its container once keeps writing to the same slot for its whole
//! lifetime.

use crate::error::Result;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Callback wired to a row control
pub type RowAction = Arc<dyn Fn() -> Result<()> + Send + Sync>;

/// One rendered list row
#[derive(Clone)]
pub struct ListRow {
    /// Underlying entry the actions operate on
    pub item: String,
    /// Display text produced by the item template
    pub label: String,
    pub item_class: String,
    pub label_class: String,
    pub remove_label: String,
    pub remove_class: String,
    on_select: RowAction,
    on_remove: RowAction,
}

impl ListRow {
    pub fn new(item: impl Into<String>, label: impl Into<String>, on_select: RowAction, on_remove: RowAction) -> Self {
        Self {
            item: item.into(),
            label: label.into(),
            item_class: String::new(),
            label_class: String::new(),
            remove_label: "x".to_string(),
            remove_class: String::new(),
            on_select,
            on_remove,
        }
    }

    /// Activate the row's label control
    pub fn select(&self) -> Result<()> {
        (self.on_select)()
    }

    /// Activate the row's remove control
    pub fn remove(&self) -> Result<()> {
        (self.on_remove)()
    }
}

impl std::fmt::Debug for ListRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListRow")
            .field("item", &self.item)
            .field("label", &self.label)
            .field("item_class", &self.item_class)
            .finish_non_exhaustive()
    }
}

/// A list presentation: root element, list element, rows
#[derive(Debug, Clone, Default)]
pub struct ListView {
    pub root_class: String,
    pub list_class: String,
    pub rows: Vec<ListRow>,
}

/// Everything currently presented inside a container
#[derive(Debug, Clone, Default)]
pub struct ContainerContent {
    /// Panel header, set by a surrounding panel
    pub header: Option<String>,
    /// Whether the surrounding panel hides the container
    pub hidden: bool,
    /// The widget's own presentation; `None` when nothing is mounted
    pub body: Option<ListView>,
}

/// Shared handle to one slot of the page
#[derive(Clone)]
pub struct Container {
    id: String,
    content: Arc<Mutex<ContainerContent>>,
}

impl Container {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: Arc::new(Mutex::new(ContainerContent::default())),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Replace the widget presentation
    pub fn set_body(&self, body: Option<ListView>) {
        self.content.lock().body = body;
    }

    /// Set the surrounding panel's header and visibility
    pub fn set_panel(&self, header: Option<String>, hidden: bool) {
        let mut content = self.content.lock();
        content.header = header;
        content.hidden = hidden;
    }

    /// Copy of the current content, for drawing
    pub fn snapshot(&self) -> ContainerContent {
        self.content.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.content.lock().body.is_none()
    }

    /// Drop everything presented in the container
    pub fn clear(&self) {
        *self.content.lock() = ContainerContent::default();
    }

    /// Two handles refer to the same slot
    pub fn same_slot(&self, other: &Container) -> bool {
        Arc::ptr_eq(&self.content, &other.content)
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container").field("id", &self.id).finish()
    }
}

/// The set of containers making up a results page
#[derive(Debug, Default)]
pub struct Page {
    containers: DashMap<String, Container>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the container for `selector`, or return the existing one
    pub fn mount(&self, selector: &str) -> Container {
        let id = normalize_selector(selector);
        self.containers
            .entry(id.to_string())
            .or_insert_with(|| Container::new(id))
            .value()
            .clone()
    }

    /// Look up an existing container by `#id` or bare id
    pub fn query_selector(&self, selector: &str) -> Option<Container> {
        self.containers
            .get(normalize_selector(selector))
            .map(|c| c.value().clone())
    }
}

fn normalize_selector(selector: &str) -> &str {
    selector.trim().trim_start_matches('#')
}
