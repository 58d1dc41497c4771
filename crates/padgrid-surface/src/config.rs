//! Surface configuration schema and loader
//!
//! Configuration is stored as YAML.
//! Default location: ~/.config/padgrid/surface.yaml

use crate::browser::BrowserFilter;
use crate::types::VisualStyle;
use padgrid_core::GridGeometry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root surface configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Pad grid size, header row included
    pub grid: GridGeometry,

    /// Style tokens per row band
    pub styles: RowStyles,

    /// Characters stripped from names (file extension such as `.adv`) before
    /// comparing a leaf with the selected device
    pub device_suffix_len: usize,

    /// Browser filter applied whenever the surface is enabled
    pub filter: BrowserFilter,

    /// Top-level categories whose items are grouped by source
    pub grouped_categories: Vec<String>,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            grid: GridGeometry::default(),
            styles: RowStyles::default(),
            device_suffix_len: 4,
            filter: BrowserFilter::MidiTrackDevices,
            grouped_categories: Vec::new(),
        }
    }
}

/// Style tokens for each band of the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowStyles {
    /// Category row (row 0)
    pub header: VisualStyle,
    /// Sub-category rows
    pub sub_category: VisualStyle,
    /// Leaf rows; the page index picks the entry, wrapping around
    pub leaf_palette: Vec<VisualStyle>,
}

impl Default for RowStyles {
    fn default() -> Self {
        Self {
            header: VisualStyle::new("QuickScale.Quant"),
            sub_category: VisualStyle::new("Mode.Session"),
            leaf_palette: vec![
                VisualStyle::new("Mode.Drum"),
                VisualStyle::new("Mode.Melodic"),
                VisualStyle::new("Mode.Session.Scene"),
                VisualStyle::new("Mode.Note"),
            ],
        }
    }
}

impl RowStyles {
    /// Leaf style for a page
    pub fn leaf_style(&self, page: usize) -> VisualStyle {
        if self.leaf_palette.is_empty() {
            return VisualStyle::new("Mode.Drum");
        }
        self.leaf_palette[page % self.leaf_palette.len()].clone()
    }
}

/// Get the default surface config file path
///
/// Returns: ~/.config/padgrid/surface.yaml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("padgrid")
        .join("surface.yaml")
}

/// Load surface configuration from a YAML file
///
/// If the file doesn't exist, returns the default config.
/// If the file exists but is invalid, logs a warning and returns the default config.
pub fn load_surface_config(path: &Path) -> SurfaceConfig {
    log::info!("load_surface_config: Loading from {:?}", path);

    if !path.exists() {
        log::info!("load_surface_config: Config file doesn't exist, using defaults");
        return SurfaceConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<SurfaceConfig>(&contents) {
            Ok(config) => {
                log::info!(
                    "load_surface_config: {}x{} grid, {} grouped categor(ies), filter {:?}",
                    config.grid.width,
                    config.grid.height,
                    config.grouped_categories.len(),
                    config.filter
                );
                config
            }
            Err(e) => {
                log::warn!("load_surface_config: Failed to parse config: {}", e);
                SurfaceConfig::default()
            }
        },
        Err(e) => {
            log::warn!("load_surface_config: Failed to read config file: {}", e);
            SurfaceConfig::default()
        }
    }
}

/// Save surface configuration to a YAML file
///
/// Creates parent directories if they don't exist.
pub fn save_surface_config(config: &SurfaceConfig, path: &Path) -> anyhow::Result<()> {
    use anyhow::Context;

    log::info!("save_surface_config: Saving to {:?}", path);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let yaml =
        serde_yaml::to_string(config).context("Failed to serialize surface config to YAML")?;

    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write surface config file: {:?}", path))?;

    log::info!("save_surface_config: Config saved successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SurfaceConfig::default();
        assert_eq!(config.grid, GridGeometry::new(8, 8));
        assert_eq!(config.device_suffix_len, 4);
        assert_eq!(config.filter, BrowserFilter::MidiTrackDevices);
        assert!(config.grouped_categories.is_empty());
    }

    #[test]
    fn test_leaf_style_wraps() {
        let styles = RowStyles::default();
        assert_eq!(styles.leaf_style(0).token(), "Mode.Drum");
        assert_eq!(styles.leaf_style(1).token(), "Mode.Melodic");
        assert_eq!(styles.leaf_style(4).token(), "Mode.Drum");

        let empty = RowStyles {
            leaf_palette: vec![],
            ..RowStyles::default()
        };
        assert_eq!(empty.leaf_style(3).token(), "Mode.Drum");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
grid:
  width: 8
  height: 6
device_suffix_len: 4
filter: audio_track_devices
grouped_categories: ["Sounds"]
styles:
  header: "QuickScale.Quant"
  sub_category: "Mode.Session"
  leaf_palette: ["Mode.Drum", "Mode.Note"]
"#;

        let config: SurfaceConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.grid.height, 6);
        assert_eq!(config.filter, BrowserFilter::AudioTrackDevices);
        assert_eq!(config.grouped_categories, vec!["Sounds".to_string()]);
        assert_eq!(config.styles.leaf_palette.len(), 2);
        assert_eq!(config.styles.leaf_style(1).token(), "Mode.Note");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: SurfaceConfig = serde_yaml::from_str("device_suffix_len: 0").unwrap();
        assert_eq!(config.device_suffix_len, 0);
        assert_eq!(config.grid, GridGeometry::default());
        assert_eq!(config.styles, RowStyles::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir()
            .join(format!("padgrid-config-{}", std::process::id()))
            .join("surface.yaml");

        let mut config = SurfaceConfig::default();
        config.grouped_categories.push("Sounds".to_string());
        config.filter = BrowserFilter::All;
        save_surface_config(&config, &path).unwrap();

        let loaded = load_surface_config(&path);
        assert_eq!(loaded.grouped_categories, vec!["Sounds".to_string()]);
        assert_eq!(loaded.filter, BrowserFilter::All);

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_load_missing_file() {
        let config = load_surface_config(Path::new("/nonexistent/padgrid/surface.yaml"));
        assert_eq!(config.device_suffix_len, 4);
    }
}
