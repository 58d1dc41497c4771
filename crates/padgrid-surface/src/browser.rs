//! Host browser seam
//!
//! The host application owns the browse tree and knows how to load items.
//! The engine only reads the tree once, issues load commands and asks which
//! device is currently selected so it can highlight the matching pad.

use padgrid_core::BrowseNode;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// Device filter applied to the host browser when the surface is enabled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowserFilter {
    /// No restriction
    #[default]
    All,
    /// Devices that can sit on a MIDI track (instruments, MIDI effects)
    MidiTrackDevices,
    /// Devices that can sit on an audio track
    AudioTrackDevices,
}

/// Error type for host browser operations
#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("Item '{0}' is not loadable")]
    NotLoadable(String),

    #[error("Failed to load '{name}': {reason}")]
    LoadFailed { name: String, reason: String },
}

/// Operations the engine needs from the host browser
pub trait BrowserService {
    /// Top-level groupings (instruments, sounds, colors...)
    fn top_level_groups(&self) -> Vec<BrowseNode>;

    /// Load `item` onto the selected track
    fn load_item(&mut self, item: &BrowseNode) -> Result<(), BrowserError>;

    /// Stop any running preview
    fn stop_preview(&mut self);

    /// Name of the device currently selected in the host, if any
    fn selected_device_name(&self) -> Option<String>;

    fn set_filter(&mut self, filter: BrowserFilter);
}

impl<B: BrowserService> BrowserService for Rc<RefCell<B>> {
    fn top_level_groups(&self) -> Vec<BrowseNode> {
        self.borrow().top_level_groups()
    }

    fn load_item(&mut self, item: &BrowseNode) -> Result<(), BrowserError> {
        self.borrow_mut().load_item(item)
    }

    fn stop_preview(&mut self) {
        self.borrow_mut().stop_preview()
    }

    fn selected_device_name(&self) -> Option<String> {
        self.borrow().selected_device_name()
    }

    fn set_filter(&mut self, filter: BrowserFilter) {
        self.borrow_mut().set_filter(filter)
    }
}

/// Load a browse library (a YAML list of top-level categories)
pub fn load_library(path: &Path) -> anyhow::Result<Vec<BrowseNode>> {
    use anyhow::Context;

    log::info!("load_library: Loading from {:?}", path);

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read library file: {:?}", path))?;
    let library: Vec<BrowseNode> =
        serde_yaml::from_str(&contents).context("Failed to parse library YAML")?;

    log::info!("load_library: Loaded {} categories", library.len());
    Ok(library)
}

/// In-memory browser backed by a static library
///
/// Loading an item makes it the selected device. Used by the player binary
/// when no host is attached, and by tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryBrowser {
    library: Vec<BrowseNode>,
    filter: BrowserFilter,
    selected_device: Option<String>,
    loaded: Vec<String>,
    preview_stops: usize,
}

impl MemoryBrowser {
    pub fn new(library: Vec<BrowseNode>) -> Self {
        Self {
            library,
            ..Self::default()
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        Ok(Self::new(load_library(path)?))
    }

    /// Pretend the host selected a device by name
    pub fn select_device(&mut self, name: impl Into<String>) {
        self.selected_device = Some(name.into());
    }

    pub fn filter(&self) -> BrowserFilter {
        self.filter
    }

    /// Names of loaded items, oldest first
    pub fn loaded(&self) -> &[String] {
        &self.loaded
    }

    pub fn preview_stops(&self) -> usize {
        self.preview_stops
    }
}

impl BrowserService for MemoryBrowser {
    fn top_level_groups(&self) -> Vec<BrowseNode> {
        self.library.clone()
    }

    fn load_item(&mut self, item: &BrowseNode) -> Result<(), BrowserError> {
        if !item.is_loadable() {
            return Err(BrowserError::NotLoadable(item.name().to_string()));
        }
        log::info!("MemoryBrowser: Loading '{}' ({:?})", item.name(), item.uri());
        self.loaded.push(item.name().to_string());
        // The host names the device after the loaded file
        let device = item
            .uri()
            .and_then(|uri| Path::new(uri).file_name())
            .map(|file| file.to_string_lossy().into_owned())
            .unwrap_or_else(|| item.name().to_string());
        self.selected_device = Some(device);
        Ok(())
    }

    fn stop_preview(&mut self) {
        self.preview_stops += 1;
    }

    fn selected_device_name(&self) -> Option<String> {
        self.selected_device.clone()
    }

    fn set_filter(&mut self, filter: BrowserFilter) {
        log::debug!("MemoryBrowser: Filter set to {:?}", filter);
        self.filter = filter;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_records_selection() {
        let mut browser = MemoryBrowser::new(vec![]);
        browser.load_item(&BrowseNode::leaf("Bass.adv")).unwrap();
        assert_eq!(browser.loaded(), &["Bass.adv".to_string()]);
        assert_eq!(browser.selected_device_name().as_deref(), Some("Bass.adv"));
    }

    #[test]
    fn test_load_selects_file_name_of_uri() {
        let yaml = "kind: leaf\nname: Grand\nuri: presets/keys/Grand.adv\n";
        let leaf: BrowseNode = serde_yaml::from_str(yaml).unwrap();
        let mut browser = MemoryBrowser::new(vec![]);
        browser.load_item(&leaf).unwrap();
        assert_eq!(browser.loaded(), &["Grand".to_string()]);
        assert_eq!(browser.selected_device_name().as_deref(), Some("Grand.adv"));
    }

    #[test]
    fn test_load_rejects_folders() {
        let mut browser = MemoryBrowser::new(vec![]);
        let err = browser
            .load_item(&BrowseNode::group("Folder", vec![]))
            .unwrap_err();
        assert!(matches!(err, BrowserError::NotLoadable(name) if name == "Folder"));
        assert!(browser.loaded().is_empty());
    }

    #[test]
    fn test_shared_handle() {
        let shared = Rc::new(RefCell::new(MemoryBrowser::new(vec![])));
        let mut handle = shared.clone();
        handle.stop_preview();
        handle.set_filter(BrowserFilter::MidiTrackDevices);
        assert_eq!(shared.borrow().preview_stops(), 1);
        assert_eq!(shared.borrow().filter(), BrowserFilter::MidiTrackDevices);
    }

    #[test]
    fn test_load_library_file() {
        let path = std::env::temp_dir().join(format!("padgrid-library-{}.yaml", std::process::id()));
        std::fs::write(
            &path,
            r#"
- kind: category
  name: Colors
  children:
    - kind: leaf
      name: Red
- kind: category
  name: Sounds
"#,
        )
        .unwrap();

        let browser = MemoryBrowser::from_file(&path).unwrap();
        let groups = browser.top_level_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].children()[0].name(), "Red");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_library_missing_file() {
        assert!(load_library(Path::new("/nonexistent/padgrid/library.yaml")).is_err());
    }
}
