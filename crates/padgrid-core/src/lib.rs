//! Browse tree model and grid paging for padgrid control surfaces
//!
//! This crate provides:
//! - A uniform view over heterogeneous browse trees (`BrowseNode`)
//! - Regrouping of flat collections by source (`group_by`, `group_by_source`)
//! - Per-category navigation state and grid row/page arithmetic
//!   (`PaginatedCategory`)
//!
//! Nothing here touches hardware or the host; the surface crate drives these
//! types from button events and renders them back onto pads.

pub mod grouping;
pub mod node;
pub mod paging;

pub use grouping::{group_by, group_by_source, UNKNOWN_SOURCE};
pub use node::BrowseNode;
pub use paging::{CategoryLayout, GridGeometry, PaginatedCategory, PagingError};
