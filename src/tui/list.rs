/// Selection and scrolling state of a vertical list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSelection {
    pub selected: Option<usize>,
    pub scroll_offset: usize,
    pub visible_rows: usize,
}

impl Default for ListSelection {
    fn default() -> Self {
        Self {
            selected: None,
            scroll_offset: 0,
            visible_rows: 10,
        }
    }
}

impl ListSelection {
    pub fn select_next(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        let i = match self.selected {
            Some(i) => (i + 1).min(total - 1),
            None => 0,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn select_prev(&mut self) {
        let i = match self.selected {
            Some(0) | None => 0,
            Some(i) => i - 1,
        };
        self.selected = Some(i);
        self.ensure_visible(i);
    }

    pub fn select_first(&mut self, total: usize) {
        if total == 0 {
            self.selected = None;
        } else {
            self.selected = Some(0);
        }
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        self.selected = Some(total - 1);
        self.ensure_visible(total - 1);
    }

    /// Keep the selection inside a list that may have shrunk
    pub fn clamp(&mut self, total: usize) {
        match self.selected {
            _ if total == 0 => {
                self.selected = None;
                self.scroll_offset = 0;
            }
            Some(i) if i >= total => {
                self.selected = Some(total - 1);
                self.ensure_visible(total - 1);
            }
            None => self.selected = Some(0),
            Some(_) => {}
        }
    }

    /// Resize the viewport, keeping the selection on screen
    pub fn set_visible_rows(&mut self, rows: usize) {
        self.visible_rows = rows;
        if let Some(i) = self.selected {
            self.ensure_visible(i);
        }
    }

    fn ensure_visible(&mut self, index: usize) {
        if index < self.scroll_offset {
            self.scroll_offset = index;
        } else if self.visible_rows > 0 && index >= self.scroll_offset + self.visible_rows {
            self.scroll_offset = index - self.visible_rows + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_scrolls_with_cursor() {
        let mut list = ListSelection {
            visible_rows: 2,
            ..ListSelection::default()
        };
        list.select_next(5);
        list.select_next(5);
        list.select_next(5);
        assert_eq!(list.selected, Some(2));
        assert_eq!(list.scroll_offset, 1);

        list.select_last(5);
        assert_eq!(list.scroll_offset, 3);
        list.select_prev();
        list.select_prev();
        list.select_prev();
        assert_eq!(list.selected, Some(1));
        assert_eq!(list.scroll_offset, 1);
    }

    #[test]
    fn shrinking_viewport_scrolls_to_selection() {
        let mut list = ListSelection::default();
        list.select_last(6);
        assert_eq!(list.scroll_offset, 0);

        list.set_visible_rows(3);
        assert_eq!(list.selected, Some(5));
        assert_eq!(list.scroll_offset, 3);
    }

    #[test]
    fn clamp_follows_removals() {
        let mut list = ListSelection::default();
        list.select_last(3);
        list.clamp(2);
        assert_eq!(list.selected, Some(1));
        list.clamp(0);
        assert_eq!(list.selected, None);
        list.clamp(4);
        assert_eq!(list.selected, Some(0));
    }
}
