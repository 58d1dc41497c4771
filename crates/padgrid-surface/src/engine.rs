//! Grid browser engine
//!
//! Owns the top-level categories and their navigation state, turns pad
//! presses into selections or load commands, and re-renders the whole surface
//! after every change.
//!
//! # Architecture
//!
//! ```text
//! pad press ─► ButtonGrid ─► flume ─► process_events() ─► on_button_press()
//!                                                           │
//!                         BrowserService::load_item() ◄─────┤
//!                                                           ▼
//!                    ButtonGrid / PageButtons ◄──────── render()
//! ```
//!
//! Everything runs on the thread that calls `process_events`; a press is
//! fully handled (state change, load command, render) before the next event
//! is taken from the channel.

use crate::browser::{BrowserError, BrowserService};
use crate::config::SurfaceConfig;
use crate::diagnostics::{Diagnostics, LogStatus, NoopDiagnostics, StateSnapshot, StatusDisplay};
use crate::grid::{Button, ButtonGrid, PageButtons};
use crate::render::{cell_role, compose_frame, CellRole, Frame, RenderContext};
use crate::track::TrackNavigation;
use crate::types::{GridCell, PageDirection, SurfaceEvent};
use flume::{Receiver, Sender};
use padgrid_core::{GridGeometry, PaginatedCategory};

/// Error type for surface operations
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("Host browser error: {0}")]
    Browser(#[from] BrowserError),
}

/// Result of a pad press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressOutcome {
    /// Release, disabled surface or a pad with nothing behind it
    Ignored,
    CategorySelected(usize),
    SubCategorySelected(usize),
    /// Name of the item sent to the host
    ItemLoaded(String),
}

/// Main grid browser
pub struct GridBrowser {
    config: SurfaceConfig,
    categories: Vec<PaginatedCategory>,
    selected_category: usize,
    enabled: bool,
    browser: Box<dyn BrowserService>,
    grid: Option<Box<dyn ButtonGrid>>,
    page_buttons: PageButtons,
    track_navigation: Option<Box<dyn TrackNavigation>>,
    status: Box<dyn StatusDisplay>,
    diagnostics: Box<dyn Diagnostics>,
    event_tx: Sender<SurfaceEvent>,
    event_rx: Receiver<SurfaceEvent>,
}

impl GridBrowser {
    /// Build categories from the host's top-level groups
    ///
    /// The engine starts disabled with no grid attached.
    pub fn new(config: SurfaceConfig, browser: Box<dyn BrowserService>) -> Self {
        let categories: Vec<PaginatedCategory> = browser
            .top_level_groups()
            .into_iter()
            .map(|node| {
                if config.grouped_categories.iter().any(|name| name == node.name()) {
                    PaginatedCategory::grouped(&node, config.grid)
                } else {
                    PaginatedCategory::from_node(node, config.grid)
                }
            })
            .collect();

        log::info!(
            "GridBrowser: {} categories on a {}x{} grid",
            categories.len(),
            config.grid.width,
            config.grid.height
        );
        for category in &categories {
            log::debug!(
                "  - {} ({:?}, {} sub-categories)",
                category.name(),
                category.layout(),
                category.sub_items().len()
            );
        }

        let (event_tx, event_rx) = flume::bounded(256);

        Self {
            config,
            categories,
            selected_category: 0,
            enabled: false,
            browser,
            grid: None,
            page_buttons: PageButtons::default(),
            track_navigation: None,
            status: Box::new(LogStatus),
            diagnostics: Box::new(NoopDiagnostics),
            event_tx,
            event_rx,
        }
    }

    pub fn with_status_display(mut self, status: Box<dyn StatusDisplay>) -> Self {
        self.status = status;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Box<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Attach the track navigation delegate (disabled until the engine is enabled)
    pub fn with_track_navigation(mut self, mut track_navigation: Box<dyn TrackNavigation>) -> Self {
        track_navigation.set_enabled(self.enabled);
        self.track_navigation = Some(track_navigation);
        self
    }

    /// Sender for event sources other than the grid (page and track buttons)
    pub fn event_sender(&self) -> Sender<SurfaceEvent> {
        self.event_tx.clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn geometry(&self) -> GridGeometry {
        self.config.grid
    }

    pub fn categories(&self) -> &[PaginatedCategory] {
        &self.categories
    }

    pub fn selected_category_index(&self) -> usize {
        self.selected_category
    }

    pub fn selected_category(&self) -> Option<&PaginatedCategory> {
        self.categories.get(self.selected_category)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        let category = self.selected_category();
        StateSnapshot {
            enabled: self.enabled,
            category: category.map(|c| c.name().to_string()),
            category_index: self.selected_category,
            sub_index: category.map_or(0, PaginatedCategory::selected_sub_index),
            page_index: category.map_or(0, PaginatedCategory::selected_page_index),
            num_pages: category.map_or(0, PaginatedCategory::num_pages),
        }
    }

    /// Replace the grid binding
    ///
    /// The previous grid is unsubscribed and cleared before the new one is
    /// subscribed, then the surface is rendered. Pad presses still queued
    /// from the previous grid are dropped. Returns the detached grid.
    pub fn attach_grid(
        &mut self,
        grid: Option<Box<dyn ButtonGrid>>,
    ) -> Option<Box<dyn ButtonGrid>> {
        let previous = self.grid.take().map(|mut old| {
            old.unsubscribe();
            old.reset();
            old
        });
        if previous.is_some() {
            self.drop_queued_grid_events();
        }

        if let Some(mut grid) = grid {
            if grid.width() != self.config.grid.width || grid.height() != self.config.grid.height {
                log::warn!(
                    "GridBrowser: Attached {}x{} grid, configured for {}x{}",
                    grid.width(),
                    grid.height(),
                    self.config.grid.width,
                    self.config.grid.height
                );
            }
            grid.reset();
            grid.subscribe(self.event_tx.clone());
            self.grid = Some(grid);
        }

        self.render();
        previous
    }

    /// Discard pending pad events, keeping page and track events in order
    fn drop_queued_grid_events(&mut self) {
        let pending: Vec<SurfaceEvent> = self.event_rx.try_iter().collect();
        let mut dropped = 0;
        for event in pending {
            if matches!(event, SurfaceEvent::Grid { .. }) {
                dropped += 1;
            } else if let Err(e) = self.event_tx.try_send(event) {
                log::warn!("GridBrowser: Lost queued event {:?}", e.into_inner());
            }
        }
        if dropped > 0 {
            log::debug!("GridBrowser: Dropped {} queued pad events from detached grid", dropped);
        }
    }

    /// Bind the page navigation buttons
    pub fn set_page_buttons(
        &mut self,
        previous: Option<Box<dyn Button>>,
        next: Option<Box<dyn Button>>,
    ) {
        self.page_buttons = PageButtons::new(previous, next);
        self.render();
    }

    /// Enable or disable the surface and its track navigation delegate
    pub fn set_enabled(&mut self, enabled: bool) {
        log::info!("GridBrowser: {}", if enabled { "enabled" } else { "disabled" });
        self.enabled = enabled;

        if let Some(track_navigation) = self.track_navigation.as_mut() {
            track_navigation.set_enabled(enabled);
        }

        if enabled {
            self.on_selected_track_changed();
        } else {
            self.browser.stop_preview();
        }
    }

    /// Re-apply the browser filter for the selected track and render
    pub fn on_selected_track_changed(&mut self) {
        if !self.enabled {
            return;
        }
        self.browser.set_filter(self.config.filter);
        self.render();
    }

    /// Handle a pad press at grid position (`x`, `y`)
    ///
    /// Presses outside anything populated are ignored. Host load errors are
    /// returned unchanged; the surface is not re-rendered in that case.
    pub fn on_button_press(&mut self, x: usize, y: usize, value: u8) -> Result<PressOutcome, SurfaceError> {
        if !self.enabled || value == 0 {
            return Ok(PressOutcome::Ignored);
        }
        self.status.show_message(&format!("Clicked on {}, {}", x, y));

        let geometry = self.config.grid;
        let role = cell_role(geometry, self.categories.get(self.selected_category), GridCell::new(x, y));

        let outcome = match role {
            CellRole::Category(index) if index < self.categories.len() => {
                self.selected_category = index;
                PressOutcome::CategorySelected(index)
            }
            CellRole::SubCategory(index) => match self.categories.get_mut(self.selected_category) {
                Some(category) => match category.select_sub_category(index) {
                    Ok(()) => PressOutcome::SubCategorySelected(index),
                    Err(e) => {
                        log::trace!("GridBrowser: Ignoring press at ({}, {}): {}", x, y, e);
                        PressOutcome::Ignored
                    }
                },
                None => PressOutcome::Ignored,
            },
            CellRole::LeafSlot(slot) => {
                let item = self
                    .categories
                    .get(self.selected_category)
                    .and_then(|c| c.leaf_at_slot(slot))
                    .cloned();
                match item {
                    Some(item) => {
                        self.browser.load_item(&item)?;
                        self.status.show_message(&format!("Selected {}", item.name()));
                        PressOutcome::ItemLoaded(item.name().to_string())
                    }
                    None => PressOutcome::Ignored,
                }
            }
            CellRole::Category(_) | CellRole::Outside => PressOutcome::Ignored,
        };

        if outcome == PressOutcome::Ignored {
            log::trace!("GridBrowser: Press at ({}, {}) ignored", x, y);
            return Ok(outcome);
        }

        log::debug!("GridBrowser: Press at ({}, {}) -> {:?}", x, y, outcome);
        self.diagnostics.checkpoint("press", &self.snapshot());
        self.render();
        Ok(outcome)
    }

    /// Move one page in `direction`
    ///
    /// Always re-renders so the page buttons reflect the bounds. Returns true
    /// if the page changed.
    pub fn on_page_press(&mut self, direction: PageDirection) -> bool {
        if !self.enabled {
            return false;
        }

        let moved = self
            .categories
            .get_mut(self.selected_category)
            .is_some_and(|category| category.move_page(direction.delta()));

        if moved {
            self.diagnostics.checkpoint("page", &self.snapshot());
        }
        self.render();
        moved
    }

    /// Drain pending surface events and dispatch them
    ///
    /// Returns the number of events handled. Stops at the first host error;
    /// later events stay queued for the next call.
    pub fn process_events(&mut self) -> Result<usize, SurfaceError> {
        let mut handled = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            handled += 1;
            match event {
                SurfaceEvent::Grid { x, y, value } => {
                    self.on_button_press(x, y, value)?;
                }
                SurfaceEvent::Page { direction, value } => {
                    if value > 0 {
                        self.on_page_press(direction);
                    }
                }
                SurfaceEvent::Track { command, value } => {
                    if value > 0 {
                        if let Some(track_navigation) = self.track_navigation.as_mut() {
                            track_navigation.handle(command);
                        }
                    }
                }
            }
        }
        Ok(handled)
    }

    /// Compose the frame for the current state without touching any button
    pub fn frame(&self) -> Frame {
        let selected_device = self.browser.selected_device_name();
        compose_frame(&RenderContext {
            geometry: self.config.grid,
            categories: &self.categories,
            selected_category: self.selected_category,
            selected_device: selected_device.as_deref(),
            styles: &self.config.styles,
            device_suffix_len: self.config.device_suffix_len,
        })
    }

    /// Push the current state to every bound button
    ///
    /// Does nothing while disabled. Never changes navigation state.
    pub fn render(&mut self) {
        if !self.enabled {
            return;
        }

        let frame = self.frame();

        if let Some(grid) = self.grid.as_mut() {
            grid.for_each_button(&mut |cell, button| match frame.cell(cell) {
                Some(state) => {
                    button.set_visual_style(&state.style);
                    button.set_enabled(state.enabled);
                    button.set_lit(state.lit);
                }
                None => {
                    button.set_enabled(false);
                    button.set_lit(false);
                }
            });
        }

        self.page_buttons
            .apply(frame.nav.previous_lit, frame.nav.next_lit);
    }
}
