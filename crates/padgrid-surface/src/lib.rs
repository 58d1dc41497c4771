//! Control-surface engine for browsing a host's device library on a pad grid
//!
//! This crate provides:
//! - The grid browser engine (`GridBrowser`): category, sub-category and page
//!   navigation driven by pad presses
//! - Pure frame composition shared by rendering and press dispatch
//! - Seams for the host (`BrowserService`, `SongHost`) and the hardware
//!   (`Button`, `ButtonGrid`)
//! - YAML configuration
//!
//! # Architecture
//!
//! ```text
//! input thread → ButtonGrid subscriber → flume channel → GridBrowser::process_events()
//!                                                                  │
//!                                      ButtonGrid / PageButtons ◄── render()
//! ```
//!
//! Event sources may live on any thread; the engine and everything it renders
//! to live on the thread that drains the channel.

pub mod browser;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod grid;
pub mod render;
pub mod track;
pub mod types;

pub use browser::{load_library, BrowserError, BrowserFilter, BrowserService, MemoryBrowser};
pub use config::{
    default_config_path, load_surface_config, save_surface_config, RowStyles, SurfaceConfig,
};
pub use diagnostics::{
    Diagnostics, LogDiagnostics, LogStatus, NoopDiagnostics, StateSnapshot, StatusDisplay,
};
pub use engine::{GridBrowser, PressOutcome, SurfaceError};
pub use grid::{Button, ButtonGrid, PageButtons};
pub use render::{compose_frame, CellRole, CellState, Frame, NavState, RenderContext};
pub use track::{SongHost, TrackController, TrackNavigation};
pub use types::{GridCell, PageDirection, SurfaceEvent, TrackCommand, VisualStyle};
