//! Collaborators supplied by the embedding environment
//!
//! A [`Host`] owns everything that touches the outside world: the renderer,
//! the tooltip, the progress display and the camera controls. The network
//! calls into it at fixed points of each frame and never holds on to
//! anything it is handed.

use serde::Serialize;

use crate::camera::Camera3D;
use crate::color::Rgb;
use crate::error::{LoadError, LoadResult};
use crate::geometry::{DirtyFlags, GeometryBuffers};
use crate::settings::Settings;

/// A position in screen pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

/// Drawable area in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

/// Resolved colors and line parameters for drawing
#[derive(Debug, Clone, PartialEq)]
pub struct SceneStyle {
    pub background: Rgb,
    pub edge_color: Rgb,
    pub edge_opacity: f32,
    pub edge_width: f32,
    pub node_outline: Rgb,
}

impl SceneStyle {
    pub fn from_settings(settings: &Settings) -> LoadResult<Self> {
        let resolve = |id: &str, value: &crate::color::ColorValue| {
            value.resolve().ok_or_else(|| LoadError::InvalidColor {
                id: id.to_string(),
                value: value.to_string(),
            })
        };

        Ok(Self {
            background: resolve("misc.background_color", &settings.misc.background_color)?,
            edge_color: resolve("misc.edge_color", &settings.misc.edge_color)?,
            edge_opacity: settings.misc.edge_opacity,
            edge_width: settings.sizes.edge_width,
            node_outline: if settings.misc.node_outline_black {
                Rgb([0.0; 3])
            } else {
                Rgb([1.0; 3])
            },
        })
    }
}

/// What the renderer gets to see for one frame
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    /// `None` until a dataset is loaded
    pub buffers: Option<&'a GeometryBuffers>,
    /// Attributes that changed since the previous draw
    pub dirty: DirtyFlags,
    pub camera: &'a Camera3D,
    pub viewport: Viewport,
    pub style: &'a SceneStyle,
}

/// Callbacks into the embedding environment.
///
/// Every method has a no-op default so a host only implements what it
/// actually displays.
pub trait Host {
    /// Show the tooltip at `at` with `content` (nothing to show when `None`)
    fn show_tooltip(&mut self, _content: Option<&str>, _at: ScreenPoint) {}

    fn hide_tooltip(&mut self) {}

    fn show_progress(&mut self) {}

    /// Layout progress, called once per solver tick
    fn update_progress(&mut self, _iteration: usize, _budget: usize) {}

    fn hide_progress(&mut self) {}

    /// Apply pending user input to the camera
    fn update_controls(&mut self, _camera: &mut Camera3D) {}

    fn draw(&mut self, _scene: &Scene<'_>) {}

    /// Release GPU resources tied to `buffers`; they are dropped afterwards
    fn dispose_geometry(&mut self, _buffers: &GeometryBuffers) {}
}

/// A host call as recorded by [`HeadlessHost`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    ShowTooltip {
        content: Option<String>,
        at: ScreenPoint,
    },
    HideTooltip,
    ShowProgress,
    UpdateProgress {
        iteration: usize,
        budget: usize,
    },
    HideProgress,
    Draw {
        points: usize,
        lines: usize,
    },
    DisposeGeometry {
        points: usize,
        lines: usize,
    },
}

/// Host without a display: records every call it receives
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    pub events: Vec<HostEvent>,
}

impl HeadlessHost {
    /// Number of recorded events matching `predicate`
    pub fn count(&self, predicate: impl Fn(&HostEvent) -> bool) -> usize {
        self.events.iter().filter(|e| predicate(e)).count()
    }
}

impl Host for HeadlessHost {
    fn show_tooltip(&mut self, content: Option<&str>, at: ScreenPoint) {
        self.events.push(HostEvent::ShowTooltip {
            content: content.map(str::to_string),
            at,
        });
    }

    fn hide_tooltip(&mut self) {
        self.events.push(HostEvent::HideTooltip);
    }

    fn show_progress(&mut self) {
        self.events.push(HostEvent::ShowProgress);
    }

    fn update_progress(&mut self, iteration: usize, budget: usize) {
        self.events
            .push(HostEvent::UpdateProgress { iteration, budget });
    }

    fn hide_progress(&mut self) {
        self.events.push(HostEvent::HideProgress);
    }

    fn draw(&mut self, scene: &Scene<'_>) {
        let (points, lines) = scene
            .buffers
            .map_or((0, 0), |b| (b.point_count(), b.line_count()));
        self.events.push(HostEvent::Draw { points, lines });
    }

    fn dispose_geometry(&mut self, buffers: &GeometryBuffers) {
        self.events.push(HostEvent::DisposeGeometry {
            points: buffers.point_count(),
            lines: buffers.line_count(),
        });
    }
}
