//! Gallery model: the externally supplied ordered collection, the current
//! selection, scroll state and the geometric hit-test used to resolve
//! which item sits under a pinch.

use tracing::debug;

use crate::geometry::{Point, Region};

/// One selectable item with a stable id.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryItem {
    pub id: u64,
    pub title: String,
}

impl GalleryItem {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// Grid placement of the gallery in normalized display space.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    /// Visible gallery area.
    pub region: Region,
    /// Items per row.
    pub columns: usize,
    /// Row height in normalized units.
    pub row_height: f32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            region: Region::new(0.0, 0.0, 0.25, 1.0),
            columns: 2,
            row_height: 0.2,
        }
    }
}

/// Ordered collection plus selection and scroll.
#[derive(Debug, Clone)]
pub struct Gallery {
    pub layout: GridLayout,
    items: Vec<GalleryItem>,
    selected: Option<u64>,
    /// Index of the most recent selection, kept after the selection clears.
    last_index: usize,
    scroll_offset: f32,
}

impl Gallery {
    pub fn new(layout: GridLayout) -> Self {
        Self {
            layout,
            items: Vec::new(),
            selected: None,
            last_index: 0,
            scroll_offset: 0.0,
        }
    }

    /// Replace the collection.  The selection survives only if its id is
    /// still present.
    pub fn set_items(&mut self, items: Vec<GalleryItem>) {
        self.items = items;
        if let Some(id) = self.selected {
            match self.index_of(id) {
                Some(i) => self.last_index = i,
                None => {
                    debug!("Selected item {} left the collection", id);
                    self.selected = None;
                }
            }
        }
        self.last_index = self.last_index.min(self.items.len().saturating_sub(1));
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn index_of(&self, id: u64) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.selected
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected.and_then(|id| self.index_of(id))
    }

    /// Selected index, or the last externally known one.
    pub fn current_index(&self) -> usize {
        self.selected_index().unwrap_or(self.last_index)
    }

    /// Select by id.  Returns false if the id is unknown.
    pub fn select(&mut self, id: u64) -> bool {
        match self.index_of(id) {
            Some(i) => {
                self.selected = Some(id);
                self.last_index = i;
                true
            }
            None => false,
        }
    }

    /// Select by index, returning the selected id.
    pub fn select_index(&mut self, index: usize) -> Option<u64> {
        let id = self.items.get(index)?.id;
        self.selected = Some(id);
        self.last_index = index;
        Some(id)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    /// Furthest the content can scroll.
    pub fn max_scroll(&self) -> f32 {
        let columns = self.layout.columns.max(1);
        let rows = self.items.len().div_ceil(columns);
        (rows as f32 * self.layout.row_height - self.layout.region.height()).max(0.0)
    }

    /// Scroll by `delta`, clamped.  Returns the new offset.
    pub fn scroll_by(&mut self, delta: f32) -> f32 {
        if delta.is_finite() {
            self.scroll_offset = (self.scroll_offset + delta).clamp(0.0, self.max_scroll());
        }
        self.scroll_offset
    }

    /// Item under `p`, by grid geometry only.
    pub fn item_at(&self, p: Point) -> Option<(usize, &GalleryItem)> {
        let layout = &self.layout;
        if !layout.region.contains(p) || layout.columns == 0 || layout.row_height <= 0.0 {
            return None;
        }
        let cell_width = layout.region.width() / layout.columns as f32;
        if cell_width <= 0.0 {
            return None;
        }
        let col = (p.x - layout.region.left) / cell_width;
        let row = (p.y - layout.region.top + self.scroll_offset) / layout.row_height;
        if !col.is_finite() || !row.is_finite() {
            return None;
        }
        // Float-to-int casts saturate; a huge row must miss, not wrap.
        let col = (col as usize).min(layout.columns - 1);
        let index = (row as usize)
            .checked_mul(layout.columns)?
            .checked_add(col)?;
        self.items.get(index).map(|item| (index, item))
    }
}


// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::test_support::gallery_with;
    use super::*;

    #[test]
    fn test_hit_test_grid() {
        let g = gallery_with(5);
        // Columns are 0.125 wide, rows 0.2 tall.
        let (i, item) = g.item_at(Point::new(0.05, 0.1)).unwrap();
        assert_eq!((i, item.id), (0, 100));
        let (i, _) = g.item_at(Point::new(0.2, 0.1)).unwrap();
        assert_eq!(i, 1);
        let (i, _) = g.item_at(Point::new(0.05, 0.45)).unwrap();
        assert_eq!(i, 4);
    }

    #[test]
    fn test_hit_test_empty_cell_and_outside() {
        let g = gallery_with(5);
        assert!(g.item_at(Point::new(0.2, 0.45)).is_none(), "cell 5 is empty");
        assert!(g.item_at(Point::new(0.5, 0.1)).is_none(), "outside the gallery");
    }

    #[test]
    fn test_hit_test_tiny_rows_miss() {
        let mut g = Gallery::new(GridLayout {
            row_height: 1e-20,
            ..GridLayout::default()
        });
        g.set_items(vec![GalleryItem::new(1, "a")]);
        assert!(g.item_at(Point::new(0.1, 0.5)).is_none());
        assert!(g.item_at(Point::new(0.2, 1.0)).is_none());
    }

    #[test]
    fn test_hit_test_follows_scroll() {
        let mut g = gallery_with(20); // 10 rows -> 2.0 tall, max scroll 1.0
        assert!((g.max_scroll() - 1.0).abs() < 1e-6);
        g.scroll_by(0.4);
        let (i, _) = g.item_at(Point::new(0.05, 0.1)).unwrap();
        assert_eq!(i, 4, "row 2 is now at the top");
    }

    #[test]
    fn test_scroll_clamped() {
        let mut g = gallery_with(20);
        assert_eq!(g.scroll_by(-0.5), 0.0);
        assert!((g.scroll_by(5.0) - 1.0).abs() < 1e-6);
        assert!((g.scroll_by(f32::NAN) - 1.0).abs() < 1e-6);

        let mut small = gallery_with(3);
        assert_eq!(small.scroll_by(0.3), 0.0, "content fits, no scrolling");
    }

    #[test]
    fn test_selection_and_current_index() {
        let mut g = gallery_with(5);
        assert_eq!(g.current_index(), 0);
        assert!(g.select(102));
        assert_eq!(g.selected_index(), Some(2));
        g.clear_selection();
        assert_eq!(g.selected_id(), None);
        assert_eq!(g.current_index(), 2, "last known index survives");
        assert!(!g.select(999));
        assert_eq!(g.select_index(4), Some(104));
        assert_eq!(g.select_index(5), None);
    }

    #[test]
    fn test_set_items_drops_vanished_selection() {
        let mut g = gallery_with(5);
        g.select(104);
        g.set_items(vec![GalleryItem::new(100, "a"), GalleryItem::new(101, "b")]);
        assert_eq!(g.selected_id(), None);
        assert_eq!(g.current_index(), 1, "last index clamped into range");

        g.select(100);
        g.set_items(vec![GalleryItem::new(7, "x"), GalleryItem::new(100, "a")]);
        assert_eq!(g.selected_index(), Some(1), "selection follows its id");
    }
}
