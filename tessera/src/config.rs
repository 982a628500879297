use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::{Color, GeometryError, TesseraError, TesseraResult};

pub const DEFAULT_TILE_SIZE: u32 = 32;
pub const DEFAULT_TITLE: &str = "Tiles";
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Startup configuration as read from a JSON file. Every key is optional.
///
/// ```json
/// {
///   "manager": { "screen_width": 800, "tile_size": 16, "window_color": "#202020" },
///   "resources": { "tileset": "assets/tiles.png" }
/// }
/// ```
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub manager: ManagerConfig,
    pub resources: ResourcesConfig,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManagerConfig {
    pub screen_width: Option<u32>,
    pub screen_height: Option<u32>,
    pub tile_size: Option<u32>,
    pub limit_fps: Option<u32>,
    pub window_color: Option<Color>,
    pub title: Option<String>,
    pub show_fps: Option<bool>,
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResourcesConfig {
    pub tileset: Option<PathBuf>,
    pub font: Option<PathBuf>,
    pub font_size: Option<f32>,
}

/// Fully resolved settings the manager is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub width: u32,
    pub height: u32,
    pub tile_size: u32,
    pub limit_fps: Option<u32>,
    pub window_color: Color,
    pub title: String,
    pub show_fps: bool,
    pub tileset: Option<PathBuf>,
    pub font: Option<PathBuf>,
    pub font_size: f32,
}

impl Settings {
    /// Settings for a `width x height` screen with every other value at its
    /// default.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tile_size: DEFAULT_TILE_SIZE,
            limit_fps: None,
            window_color: Color::BLACK,
            title: DEFAULT_TITLE.to_string(),
            show_fps: false,
            tileset: None,
            font: None,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> TesseraResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a config file, failing on a missing file or bad contents.
    pub fn load(path: impl AsRef<Path>) -> TesseraResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reads a config file, falling back to defaults when it cannot be read.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), %err, "using default configuration");
                Self::default()
            }
        }
    }

    /// Fills the gaps in the config. A missing screen dimension falls back
    /// to the matching `display` dimension.
    pub fn resolve(&self, display: Option<(u32, u32)>) -> TesseraResult<Settings> {
        let m = &self.manager;

        let width = m.screen_width.or(display.map(|(w, _)| w));
        let height = m.screen_height.or(display.map(|(_, h)| h));
        let (Some(width), Some(height)) = (width, height) else {
            return Err(TesseraError::Config(
                "no screen size configured and no display size available".to_string(),
            ));
        };

        let tile_size = m.tile_size.unwrap_or(DEFAULT_TILE_SIZE);
        if tile_size == 0 {
            return Err(GeometryError::ZeroTileSize.into());
        }

        let font_size = self.resources.font_size.unwrap_or(DEFAULT_FONT_SIZE);
        if font_size <= 0.0 {
            return Err(TesseraError::Config(format!(
                "font size must be positive, got {font_size}"
            )));
        }

        Ok(Settings {
            width,
            height,
            tile_size,
            limit_fps: m.limit_fps.filter(|&fps| fps > 0),
            window_color: m.window_color.unwrap_or(Color::BLACK),
            title: m.title.clone().unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            show_fps: m.show_fps.unwrap_or(false),
            tileset: self.resources.tileset.clone(),
            font: self.resources.font.clone(),
            font_size,
        })
    }
}

impl From<serde_json::Error> for TesseraError {
    fn from(err: serde_json::Error) -> Self {
        TesseraError::Config(err.to_string())
    }
}
