//! Frame composition
//!
//! Derives the complete visual state of the grid from navigation state. The
//! same cell classification drives both rendering and press dispatch, so a
//! lit pad always means the same thing as pressing it.

use crate::config::RowStyles;
use crate::types::{GridCell, VisualStyle};
use padgrid_core::{GridGeometry, PaginatedCategory};

/// What a grid position represents under the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    /// Header pad for the category at this column
    Category(usize),
    /// Pad for a sub-category index of the selected category
    SubCategory(usize),
    /// Leaf slot on the current page (row-major within the leaf rows)
    LeafSlot(usize),
    /// Outside the configured geometry
    Outside,
}

/// Classify a grid position against the selected category
pub fn cell_role(
    geometry: GridGeometry,
    category: Option<&PaginatedCategory>,
    cell: GridCell,
) -> CellRole {
    if !geometry.contains(cell.x, cell.y) {
        return CellRole::Outside;
    }
    if cell.y == 0 {
        return CellRole::Category(cell.x);
    }

    let sub_rows = category.map_or(0, PaginatedCategory::num_sub_category_rows);
    if cell.y <= sub_rows {
        CellRole::SubCategory((cell.y - 1) * geometry.width + cell.x)
    } else {
        CellRole::LeafSlot((cell.y - 1 - sub_rows) * geometry.width + cell.x)
    }
}

/// Drop the last `suffix_len` characters (a file extension such as `.adv`)
pub fn strip_name_suffix(name: &str, suffix_len: usize) -> &str {
    let count = name.chars().count();
    if suffix_len == 0 || count <= suffix_len {
        return name;
    }
    match name.char_indices().nth(count - suffix_len) {
        Some((idx, _)) => &name[..idx],
        None => name,
    }
}

/// Check whether a leaf is the device currently selected in the host
///
/// The device name may carry the file extension; the leaf name is compared
/// as is.
pub fn names_match(leaf_name: &str, device_name: &str, suffix_len: usize) -> bool {
    leaf_name == device_name || strip_name_suffix(device_name, suffix_len) == leaf_name
}

/// Visual state of one pad
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellState {
    pub enabled: bool,
    pub lit: bool,
    pub style: VisualStyle,
}

impl CellState {
    fn disabled(style: &VisualStyle) -> Self {
        Self {
            enabled: false,
            lit: false,
            style: style.clone(),
        }
    }
}

/// Lit state of the page buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavState {
    pub previous_lit: bool,
    pub next_lit: bool,
}

/// Visual state of the whole surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    geometry: GridGeometry,
    cells: Vec<CellState>,
    pub nav: NavState,
}

impl Frame {
    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    /// State of the pad at `cell`, None outside the geometry
    pub fn cell(&self, cell: GridCell) -> Option<&CellState> {
        if !self.geometry.contains(cell.x, cell.y) {
            return None;
        }
        self.cells.get(cell.y * self.geometry.width + cell.x)
    }

    /// Compact text dump, one line per row (`#` lit, `o` enabled, `.` disabled)
    pub fn to_ascii(&self) -> String {
        self.cells
            .chunks(self.geometry.width.max(1))
            .map(|row| {
                row.iter()
                    .map(|c| match (c.enabled, c.lit) {
                        (true, true) => '#',
                        (true, false) => 'o',
                        _ => '.',
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Everything a frame is derived from
pub struct RenderContext<'a> {
    pub geometry: GridGeometry,
    pub categories: &'a [PaginatedCategory],
    pub selected_category: usize,
    pub selected_device: Option<&'a str>,
    pub styles: &'a RowStyles,
    pub device_suffix_len: usize,
}

/// Compose the frame for the current state
pub fn compose_frame(ctx: &RenderContext<'_>) -> Frame {
    let geometry = ctx.geometry;
    let category = ctx.categories.get(ctx.selected_category);
    let page = category.map_or(0, PaginatedCategory::selected_page_index);
    let leaf_style = ctx.styles.leaf_style(page);

    let mut cells = Vec::with_capacity(geometry.width * geometry.height);
    for y in 0..geometry.height {
        for x in 0..geometry.width {
            let state = match cell_role(geometry, category, GridCell::new(x, y)) {
                CellRole::Category(index) => CellState {
                    enabled: index < ctx.categories.len(),
                    lit: index < ctx.categories.len() && index == ctx.selected_category,
                    style: ctx.styles.header.clone(),
                },
                CellRole::SubCategory(index) => match category {
                    Some(category) if index < category.sub_items().len() => CellState {
                        enabled: true,
                        lit: index == category.selected_sub_index(),
                        style: ctx.styles.sub_category.clone(),
                    },
                    _ => CellState::disabled(&ctx.styles.sub_category),
                },
                CellRole::LeafSlot(slot) => {
                    match category.and_then(|c| c.leaf_at_slot(slot)) {
                        Some(leaf) => CellState {
                            enabled: true,
                            lit: ctx.selected_device.is_some_and(|device| {
                                names_match(leaf.name(), device, ctx.device_suffix_len)
                            }),
                            style: leaf_style.clone(),
                        },
                        None => CellState::disabled(&leaf_style),
                    }
                }
                CellRole::Outside => CellState::disabled(&leaf_style),
            };
            cells.push(state);
        }
    }

    let nav = category
        .map(|c| NavState {
            previous_lit: c.has_previous_page(),
            next_lit: c.has_next_page(),
        })
        .unwrap_or_default();

    Frame {
        geometry,
        cells,
        nav,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use padgrid_core::BrowseNode;

    fn categories(geometry: GridGeometry) -> Vec<PaginatedCategory> {
        let sounds = BrowseNode::category(
            "Sounds",
            (0..10)
                .map(|s| {
                    BrowseNode::group(
                        format!("Sub {}", s),
                        (0..50)
                            .map(|i| BrowseNode::leaf(format!("Item {}-{}.adv", s, i)))
                            .collect(),
                    )
                })
                .collect(),
        );
        let colors = BrowseNode::category(
            "Colors",
            vec![BrowseNode::leaf("Red"), BrowseNode::leaf("Blue")],
        );
        vec![
            PaginatedCategory::from_node(sounds, geometry),
            PaginatedCategory::from_node(colors, geometry),
        ]
    }

    fn render(
        categories: &[PaginatedCategory],
        selected_category: usize,
        device: Option<&str>,
    ) -> Frame {
        let styles = RowStyles::default();
        compose_frame(&RenderContext {
            geometry: GridGeometry::new(8, 8),
            categories,
            selected_category,
            selected_device: device,
            styles: &styles,
            device_suffix_len: 4,
        })
    }

    #[test]
    fn test_cell_roles() {
        let geometry = GridGeometry::new(8, 8);
        let cats = categories(geometry);
        let sounds = Some(&cats[0]);

        assert_eq!(cell_role(geometry, sounds, GridCell::new(3, 0)), CellRole::Category(3));
        assert_eq!(cell_role(geometry, sounds, GridCell::new(1, 2)), CellRole::SubCategory(9));
        assert_eq!(cell_role(geometry, sounds, GridCell::new(0, 3)), CellRole::LeafSlot(0));
        assert_eq!(cell_role(geometry, sounds, GridCell::new(7, 7)), CellRole::LeafSlot(39));
        assert_eq!(cell_role(geometry, sounds, GridCell::new(8, 0)), CellRole::Outside);

        // Flat category: leaves start right under the header
        assert_eq!(cell_role(geometry, Some(&cats[1]), GridCell::new(2, 1)), CellRole::LeafSlot(2));
    }

    #[test]
    fn test_strip_name_suffix() {
        assert_eq!(strip_name_suffix("MyPreset.adv", 4), "MyPreset");
        assert_eq!(strip_name_suffix(".adv", 4), ".adv");
        assert_eq!(strip_name_suffix("Piano", 0), "Piano");
        assert_eq!(strip_name_suffix("Flügel.adg", 4), "Flügel");
    }

    #[test]
    fn test_names_match() {
        assert!(names_match("MyPreset", "MyPreset.adv", 4));
        assert!(names_match("Bass", "Bass", 4));
        assert!(!names_match("MyPreset", "Other.adv", 4));
        // Only the device side is stripped
        assert!(!names_match("MyPreset.adv", "MyPreset", 4));
        assert!(!names_match("Kick 808", "Kick", 4));
        assert!(!names_match("Piano", "P", 4));
    }

    #[test]
    fn test_one_device_lights_one_leaf() {
        let geometry = GridGeometry::new(8, 8);
        let drums = BrowseNode::category(
            "Drums",
            vec![
                BrowseNode::leaf("Kick"),
                BrowseNode::leaf("Kick 808"),
                BrowseNode::leaf("Piano"),
            ],
        );
        let cats = vec![PaginatedCategory::from_node(drums, geometry)];

        for device in ["Kick", "Kick.adv"] {
            let ascii = render(&cats, 0, Some(device)).to_ascii();
            assert_eq!(ascii.lines().nth(1), Some("#oo....."), "{}", device);
        }

        let frame = render(&cats, 0, Some("P"));
        assert!(!frame.cell(GridCell::new(2, 1)).unwrap().lit);
    }

    #[test]
    fn test_header_row() {
        let cats = categories(GridGeometry::new(8, 8));
        let frame = render(&cats, 1, None);

        let first = frame.cell(GridCell::new(0, 0)).unwrap();
        assert!(first.enabled && !first.lit);
        let second = frame.cell(GridCell::new(1, 0)).unwrap();
        assert!(second.enabled && second.lit);
        assert_eq!(second.style.token(), "QuickScale.Quant");
        assert!(!frame.cell(GridCell::new(2, 0)).unwrap().enabled);
    }

    #[test]
    fn test_sub_category_rows() {
        let cats = categories(GridGeometry::new(8, 8));
        let frame = render(&cats, 0, None);

        let selected = frame.cell(GridCell::new(0, 1)).unwrap();
        assert!(selected.enabled && selected.lit);
        assert_eq!(selected.style.token(), "Mode.Session");
        assert!(frame.cell(GridCell::new(1, 2)).unwrap().enabled);
        // Sub-categories 10..16 do not exist
        assert!(!frame.cell(GridCell::new(2, 2)).unwrap().enabled);
    }

    #[test]
    fn test_leaf_rows_follow_page() {
        let mut cats = categories(GridGeometry::new(8, 8));
        let frame = render(&cats, 0, None);
        let leaf = frame.cell(GridCell::new(7, 7)).unwrap();
        assert!(leaf.enabled && !leaf.lit);
        assert_eq!(leaf.style.token(), "Mode.Drum");
        assert!(!frame.nav.previous_lit);
        assert!(frame.nav.next_lit);

        cats[0].move_page(1);
        let frame = render(&cats, 0, None);
        // Page 1 shows items 40..49 only
        assert!(frame.cell(GridCell::new(1, 4)).unwrap().enabled);
        assert!(!frame.cell(GridCell::new(2, 4)).unwrap().enabled);
        assert_eq!(frame.cell(GridCell::new(0, 3)).unwrap().style.token(), "Mode.Melodic");
        assert!(frame.nav.previous_lit);
        assert!(!frame.nav.next_lit);
    }

    #[test]
    fn test_selected_device_lights_leaf() {
        let cats = categories(GridGeometry::new(8, 8));
        let frame = render(&cats, 1, Some("Blue.adv"));
        assert!(!frame.cell(GridCell::new(0, 1)).unwrap().lit);
        assert!(frame.cell(GridCell::new(1, 1)).unwrap().lit);
    }

    #[test]
    fn test_compose_is_deterministic() {
        let cats = categories(GridGeometry::new(8, 8));
        let first = render(&cats, 0, Some("Item 0-3"));
        let second = render(&cats, 0, Some("Item 0-3"));
        assert_eq!(first, second);
        assert_eq!(first.to_ascii(), second.to_ascii());
    }

    #[test]
    fn test_no_categories() {
        let frame = render(&[], 0, None);
        assert!(frame.to_ascii().chars().all(|c| c == '.' || c == '\n'));
        assert_eq!(frame.nav, NavState::default());
    }

    #[test]
    fn test_ascii_dump() {
        let cats = categories(GridGeometry::new(8, 8));
        let frame = render(&cats, 1, Some("Red"));
        let ascii = frame.to_ascii();
        let lines: Vec<&str> = ascii.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "o#......");
        assert_eq!(lines[1], "#o......");
        assert_eq!(lines[2], "........");
    }
}
