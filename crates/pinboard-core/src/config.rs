//! Editor configuration.

use crate::shapes::ShapeKind;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A shape placed on the first canvas at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarterShape {
    pub kind: ShapeKind,
    pub position: Point,
}

/// Tunables for the editor. Every field has a default, so a partial JSON
/// file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Prefix of generated canvas names ("Canvas 3").
    pub canvas_name_prefix: String,
    /// Code buffer contents of a new canvas.
    pub default_code: String,
    /// Where shapes added from the menu appear (model coordinates).
    pub default_shape_position: Point,
    /// Screen-space area that deletes shapes dropped onto it.
    pub trash_region: Rect,
    /// Pick radius of connection handles (model units).
    pub handle_radius: f64,
    /// Shapes on the first canvas when the workspace starts.
    pub starter_shapes: Vec<StarterShape>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_name_prefix: "Canvas".to_string(),
            default_code: "// Write your code here\n".to_string(),
            default_shape_position: Point::new(250.0, 150.0),
            trash_region: Rect::new(20.0, 520.0, 100.0, 600.0),
            handle_radius: 6.0,
            starter_shapes: vec![
                StarterShape {
                    kind: ShapeKind::Sensor,
                    position: Point::new(150.0, 120.0),
                },
                StarterShape {
                    kind: ShapeKind::Output,
                    position: Point::new(350.0, 200.0),
                },
            ],
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
