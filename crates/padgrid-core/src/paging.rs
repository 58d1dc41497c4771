//! Grid paging for one top-level category
//!
//! A category occupies the grid below the header row. Sub-categories take as
//! many rows as they need, whatever is left shows leaf items page by page:
//!
//! ```text
//! row 0        │ header (one pad per top-level category)
//! rows 1..=s   │ sub-categories, s = ceil(sub_count / width)
//! rows s+1..   │ leaf items of the selected sub-category, current page
//! ```
//!
//! All row and page counts are derived on every call so they always follow
//! the current sub-category selection.

use crate::node::BrowseNode;
use serde::{Deserialize, Serialize};

/// Error type for paging state transitions
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PagingError {
    #[error("Sub-category index {index} out of range ({count} available)")]
    SubIndexOutOfRange { index: usize, count: usize },

    #[error("Category '{0}' has no sub-categories")]
    NoSubCategories(String),
}

/// Size of the pad grid, header row included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridGeometry {
    pub width: usize,
    pub height: usize,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
        }
    }
}

impl GridGeometry {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Rows needed to show `count` items, `width` per row
    pub fn rows_for(&self, count: usize) -> usize {
        if self.width == 0 {
            return 0;
        }
        count.div_ceil(self.width)
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }
}

/// How a category's children map onto the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryLayout {
    /// Children are the leaves; no sub-category rows
    Flat,
    /// Children are sub-categories whose own children are the leaves
    Tiered,
}

/// A top-level category plus its navigation state
#[derive(Debug, Clone)]
pub struct PaginatedCategory {
    node: BrowseNode,
    layout: CategoryLayout,
    geometry: GridGeometry,
    selected_sub_index: usize,
    selected_page_index: usize,
}

impl PaginatedCategory {
    /// Leaves are the node's direct children
    pub fn flat(node: BrowseNode, geometry: GridGeometry) -> Self {
        Self::with_layout(node, CategoryLayout::Flat, geometry)
    }

    /// Direct children are sub-categories
    pub fn tiered(node: BrowseNode, geometry: GridGeometry) -> Self {
        Self::with_layout(node, CategoryLayout::Tiered, geometry)
    }

    /// Direct children are regrouped by source into synthetic sub-categories
    pub fn grouped(node: &BrowseNode, geometry: GridGeometry) -> Self {
        Self::with_layout(
            crate::grouping::group_by_source(node),
            CategoryLayout::Tiered,
            geometry,
        )
    }

    /// Pick flat or tiered from the node's shape
    pub fn from_node(node: BrowseNode, geometry: GridGeometry) -> Self {
        if node.is_tiered() {
            Self::tiered(node, geometry)
        } else {
            Self::flat(node, geometry)
        }
    }

    fn with_layout(node: BrowseNode, layout: CategoryLayout, geometry: GridGeometry) -> Self {
        Self {
            node,
            layout,
            geometry,
            selected_sub_index: 0,
            selected_page_index: 0,
        }
    }

    pub fn node(&self) -> &BrowseNode {
        &self.node
    }

    pub fn name(&self) -> &str {
        self.node.name()
    }

    pub fn layout(&self) -> CategoryLayout {
        self.layout
    }

    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    pub fn selected_sub_index(&self) -> usize {
        self.selected_sub_index
    }

    pub fn selected_page_index(&self) -> usize {
        self.selected_page_index
    }

    /// Sub-category nodes shown in the sub-category rows
    pub fn sub_items(&self) -> &[BrowseNode] {
        match self.layout {
            CategoryLayout::Flat => &[],
            CategoryLayout::Tiered => self.node.children(),
        }
    }

    /// The sub-category at the current selection
    pub fn selected_sub_item(&self) -> Result<&BrowseNode, PagingError> {
        let items = self.sub_items();
        if items.is_empty() {
            return Err(PagingError::NoSubCategories(self.name().to_string()));
        }
        items
            .get(self.selected_sub_index)
            .ok_or(PagingError::SubIndexOutOfRange {
                index: self.selected_sub_index,
                count: items.len(),
            })
    }

    /// Leaf items of the current selection, all pages
    pub fn leaves(&self) -> &[BrowseNode] {
        match self.layout {
            CategoryLayout::Flat => self.node.children(),
            CategoryLayout::Tiered => self
                .selected_sub_item()
                .map(BrowseNode::children)
                .unwrap_or(&[]),
        }
    }

    /// Select a sub-category and go back to its first page
    pub fn select_sub_category(&mut self, index: usize) -> Result<(), PagingError> {
        let count = self.sub_items().len();
        if index >= count {
            return Err(PagingError::SubIndexOutOfRange { index, count });
        }
        self.selected_sub_index = index;
        self.reset_page();
        Ok(())
    }

    pub fn reset_page(&mut self) {
        self.selected_page_index = 0;
    }

    /// Move `delta` pages; out-of-range moves leave the state untouched
    ///
    /// Returns true if the page changed.
    pub fn move_page(&mut self, delta: isize) -> bool {
        let Some(target) = self.selected_page_index.checked_add_signed(delta) else {
            return false;
        };
        if delta == 0 || target >= self.num_pages() {
            return false;
        }
        self.selected_page_index = target;
        true
    }

    pub fn num_sub_category_rows(&self) -> usize {
        self.geometry.rows_for(self.sub_items().len())
    }

    /// Rows left for leaves; zero when sub-categories fill the grid
    pub fn num_main_item_rows(&self) -> usize {
        self.geometry
            .height
            .saturating_sub(1)
            .saturating_sub(self.num_sub_category_rows())
    }

    pub fn items_per_page(&self) -> usize {
        self.geometry.width * self.num_main_item_rows()
    }

    /// Zero when there are no leaves or no room to show them
    pub fn num_pages(&self) -> usize {
        let per_page = self.items_per_page();
        if per_page == 0 {
            return 0;
        }
        self.leaves().len().div_ceil(per_page)
    }

    /// Index of the first leaf on the current page
    pub fn page_offset(&self) -> usize {
        self.items_per_page() * self.selected_page_index
    }

    /// Leaf shown at `slot` (0-based, row-major within the leaf rows)
    pub fn leaf_at_slot(&self, slot: usize) -> Option<&BrowseNode> {
        if slot >= self.items_per_page() {
            return None;
        }
        self.leaves().get(self.page_offset() + slot)
    }

    pub fn has_previous_page(&self) -> bool {
        self.selected_page_index > 0
    }

    pub fn has_next_page(&self) -> bool {
        self.selected_page_index + 1 < self.num_pages()
    }
}
