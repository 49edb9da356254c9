//! Visualization settings
//!
//! Settings are grouped into sections that mirror what a caller would tweak:
//! rendered sizes, interaction/simulation knobs (`misc`), the initial camera,
//! and lower-level solver constants. Every field has a default, so a settings
//! file only needs to name what it overrides.
//!
//! The record is immutable once handed to [`crate::Network`]; runtime changes
//! to the solver go through [`SimulationParams`] and
//! [`crate::Network::reconfigure`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::ColorValue;
use crate::error::{ConfigError, LoadError, LoadResult};

/// Complete settings record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sizes: Sizes,
    pub misc: Misc,
    pub camera: CameraSettings,
    pub simulation: SolverSettings,
}

/// Rendered sizes, in normalized ([-1, 1]) units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sizes {
    /// Diameter of a regular node
    pub point_size: f32,
    /// Diameter of a hub node
    pub hub_size: f32,
    /// Size multiplier applied to the selected node
    pub selection_size_mult: f32,
    /// Thickness of link lines
    pub edge_width: f32,
}

impl Default for Sizes {
    fn default() -> Self {
        Self {
            point_size: 0.1,
            hub_size: 0.3,
            selection_size_mult: 1.5,
            edge_width: 0.008,
        }
    }
}

/// Interaction and simulation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Misc {
    /// Many-body strength (negative = repulsion)
    pub manybody_strength: f32,
    /// Constant link strength; `None` derives it from endpoint degrees
    pub link_strength: Option<f32>,
    /// Number of solver ticks to run before freezing the layout
    pub max_iterations: usize,
    /// Enable pointer selection and tooltips
    pub interactive: bool,
    /// Allow every node to be selected, regardless of its `selectable` flag
    pub select_all: bool,
    /// Tooltip offset from the pointer, in pixels
    pub tooltip_offset: f32,
    pub edge_color: ColorValue,
    pub edge_opacity: f32,
    /// Pick threshold: max distance between the pick ray and a point
    pub raycast_res: f32,
    /// Report layout progress to the host
    pub show_simulation_progress: bool,
    /// Outline nodes in black (white otherwise)
    pub node_outline_black: bool,
    pub background_color: ColorValue,
}

impl Default for Misc {
    fn default() -> Self {
        Self {
            manybody_strength: -1.0,
            link_strength: None,
            max_iterations: 250,
            interactive: true,
            select_all: true,
            tooltip_offset: 20.0,
            edge_color: ColorValue::Hex(0xbababa),
            edge_opacity: 0.1,
            raycast_res: 0.05,
            show_simulation_progress: true,
            node_outline_black: true,
            background_color: ColorValue::Css("white".to_string()),
        }
    }
}

/// Initial camera placement.
///
/// Reads either the flat form (`fov`, `start_pos: [x, y, z]`) or the nested
/// widget form (`setup: {fov, near, far}`, `start_pos: {x, y, z}`). A flat
/// field wins over the same field in `setup`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CameraSettingsRepr")]
pub struct CameraSettings {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Camera position on load
    pub start_pos: [f32; 3],
    /// Point the camera initially looks at
    pub center: [f32; 3],
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov: 65.0,
            near: 0.1,
            far: 100.0,
            start_pos: [1.2, 1.2, 2.0],
            center: [0.5, 0.5, 0.5],
        }
    }
}

/// A point written as `[x, y, z]` or `{x, y, z}`
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum Vec3Setting {
    Array([f32; 3]),
    Object { x: f32, y: f32, z: f32 },
}

impl From<Vec3Setting> for [f32; 3] {
    fn from(value: Vec3Setting) -> Self {
        match value {
            Vec3Setting::Array(v) => v,
            Vec3Setting::Object { x, y, z } => [x, y, z],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CameraSetup {
    fov: Option<f32>,
    near: Option<f32>,
    far: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CameraSettingsRepr {
    setup: CameraSetup,
    fov: Option<f32>,
    near: Option<f32>,
    far: Option<f32>,
    start_pos: Option<Vec3Setting>,
    center: Option<Vec3Setting>,
}

impl From<CameraSettingsRepr> for CameraSettings {
    fn from(repr: CameraSettingsRepr) -> Self {
        let defaults = CameraSettings::default();
        Self {
            fov: repr.fov.or(repr.setup.fov).unwrap_or(defaults.fov),
            near: repr.near.or(repr.setup.near).unwrap_or(defaults.near),
            far: repr.far.or(repr.setup.far).unwrap_or(defaults.far),
            start_pos: repr.start_pos.map_or(defaults.start_pos, Into::into),
            center: repr.center.map_or(defaults.center, Into::into),
        }
    }
}

/// Solver constants that are not exposed as runtime controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Seed for the jitter applied to coincident nodes
    pub seed: u64,
    /// Spring rest length
    pub link_distance: f32,
    /// Fraction of velocity removed each tick
    pub velocity_decay: f32,
    /// Barnes-Hut approximation threshold
    pub theta: f32,
    /// Floor for the decaying alpha
    pub alpha_min: f32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            link_distance: 0.0,
            velocity_decay: 0.4,
            theta: 0.9,
            alpha_min: 0.001,
        }
    }
}

impl Settings {
    /// Load settings from a `.json`, `.yaml` or `.yml` file
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| LoadError::UnknownExtension(path.display().to_string()))?;
        let text = std::fs::read_to_string(path)?;

        match ext.to_ascii_lowercase().as_str() {
            "json" => Ok(serde_json::from_str(&text)?),
            "yaml" | "yml" => Ok(serde_yaml::from_str(&text)?),
            _ => Err(LoadError::UnknownExtension(path.display().to_string())),
        }
    }

    /// The runtime-adjustable subset of the settings
    pub fn simulation_params(&self) -> SimulationParams {
        SimulationParams {
            manybody_strength: self.misc.manybody_strength,
            link_strength: self.misc.link_strength,
            max_iterations: self.misc.max_iterations,
        }
    }
}

/// Solver parameters that may change while the visualization is running
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    pub manybody_strength: f32,
    pub link_strength: Option<f32>,
    pub max_iterations: usize,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Settings::default().simulation_params()
    }
}

impl SimulationParams {
    /// Reject values that would poison the solver
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.manybody_strength.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "manybody_strength",
                value: self.manybody_strength,
            });
        }
        if let Some(strength) = self.link_strength {
            if !strength.is_finite() {
                return Err(ConfigError::InvalidParameter {
                    name: "link_strength",
                    value: strength,
                });
            }
        }
        Ok(())
    }
}
