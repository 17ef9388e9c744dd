//! Scrollable list over one loaded page, narrowed by a `Searchable` query.

use shifa_proto::filter::{filter_page, Searchable};

pub struct ScrollableList<T> {
    items: Vec<T>,
    /// Indices into `items` that match `filter`, in page order.
    filtered_indices: Vec<usize>,
    pub selected: usize,
    pub scroll_offset: usize,
    filter: String,
}

impl<T: Searchable> ScrollableList<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            filtered_indices: Vec::new(),
            selected: 0,
            scroll_offset: 0,
            filter: String::new(),
        }
    }

    /// Replace the page. Cursor goes back to the top; the filter stays.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.selected = 0;
        self.scroll_offset = 0;
        self.rebuild_filter();
    }

    pub fn set_filter(&mut self, query: &str) {
        let old_idx = self.filtered_indices.get(self.selected).copied();
        self.filter = query.to_string();
        self.rebuild_filter();
        // Keep the same item under the cursor if it still matches.
        self.selected = old_idx
            .and_then(|prev| self.filtered_indices.iter().position(|&i| i == prev))
            .unwrap_or(0);
        self.scroll_offset = 0;
    }

    fn rebuild_filter(&mut self) {
        self.filtered_indices = filter_page(&self.items, &self.filter);
        if self.selected >= self.filtered_indices.len() {
            self.selected = self.filtered_indices.len().saturating_sub(1);
        }
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn select_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn select_down(&mut self, n: usize) {
        if self.filtered_indices.is_empty() {
            return;
        }
        self.selected = (self.selected + n).min(self.filtered_indices.len() - 1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.filtered_indices.len().saturating_sub(1);
    }

    pub fn selected_item(&self) -> Option<&T> {
        let idx = self.filtered_indices.get(self.selected)?;
        self.items.get(*idx)
    }

    /// Matching items that fit in `height` rows from the scroll offset.
    pub fn visible_items(&self, height: usize) -> Vec<&T> {
        self.filtered_indices
            .iter()
            .skip(self.scroll_offset)
            .take(height)
            .filter_map(|&i| self.items.get(i))
            .collect()
    }

    /// Scroll so the cursor row is inside a viewport of `height` rows.
    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + height {
            self.scroll_offset = self.selected + 1 - height;
        }
    }

    /// Click on viewport row `row`. Returns true if it landed on an item.
    pub fn handle_click(&mut self, row: usize) -> bool {
        let target = self.scroll_offset + row;
        if target < self.filtered_indices.len() {
            self.selected = target;
            return true;
        }
        false
    }

    pub fn selected_in_view(&self) -> usize {
        self.selected.saturating_sub(self.scroll_offset)
    }

    pub fn len(&self) -> usize {
        self.filtered_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtered_indices.is_empty()
    }

    pub fn total_len(&self) -> usize {
        self.items.len()
    }
}

impl<T: Searchable> Default for ScrollableList<T> {
    fn default() -> Self {
        Self::new()
    }
}
