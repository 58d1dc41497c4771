//! Protocol-agnostic surface types
//!
//! These types abstract over the physical controller, so the engine, the
//! renderer and any controller binding all speak in grid cells and semantic events
//! rather than notes and CCs.

use serde::{Deserialize, Serialize};

/// Position of a pad on the grid (x = column, y = row, row 0 on top)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub x: usize,
    pub y: usize,
}

impl GridCell {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Direction of a page button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Previous,
    Next,
}

impl PageDirection {
    /// Page delta applied to the selected category
    pub fn delta(&self) -> isize {
        match self {
            PageDirection::Previous => -1,
            PageDirection::Next => 1,
        }
    }
}

/// Commands handled by the track navigation delegate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackCommand {
    PreviousTrack,
    NextTrack,
    Undo,
}

/// Event delivered through a surface subscription
///
/// `value` is the raw control value (MIDI velocity or CC value); zero means
/// released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Pad on the button matrix
    Grid { x: usize, y: usize, value: u8 },
    /// Page navigation button
    Page { direction: PageDirection, value: u8 },
    /// Track navigation / undo button
    Track { command: TrackCommand, value: u8 },
}

impl SurfaceEvent {
    pub fn value(&self) -> u8 {
        match self {
            SurfaceEvent::Grid { value, .. }
            | SurfaceEvent::Page { value, .. }
            | SurfaceEvent::Track { value, .. } => *value,
        }
    }

    /// Check if this is a "press" event
    pub fn is_press(&self) -> bool {
        self.value() > 0
    }
}

/// Visual style token for a button
///
/// The token names a family of LED colours (e.g. `Mode.Session`); the button
/// chooses the `.On` or `.Off` variant from its lit state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisualStyle(String);

impl VisualStyle {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    /// Skin name for the lit state, e.g. `Mode.Drum.On`
    pub fn on_name(&self) -> String {
        format!("{}.On", self.0)
    }

    /// Skin name for the unlit state, e.g. `Mode.Drum.Off`
    pub fn off_name(&self) -> String {
        format!("{}.Off", self.0)
    }
}

impl From<&str> for VisualStyle {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}
