//! Pointer tracking and the hover selection state machine

use crate::geometry::{GeometryBuffers, StaticAttributes};
use crate::graph::Node;
use crate::host::{Host, ScreenPoint};
use crate::picking::Hit;

/// Last known pointer position.
///
/// `ndc` drives the pick ray; `client` is the raw page position used to place
/// the tooltip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub ndc: [f32; 2],
    pub client: ScreenPoint,
}

impl Default for Pointer {
    /// Far outside the view volume, so nothing is hit before the first move
    fn default() -> Self {
        Self {
            ndc: [100.0, 100.0],
            client: ScreenPoint::default(),
        }
    }
}

impl Pointer {
    /// Build from a pointer event.
    ///
    /// `offset` is relative to the canvas, `client` to the page.
    pub fn from_event(offset: ScreenPoint, client: ScreenPoint, width: f32, height: f32) -> Self {
        Self {
            ndc: [
                (offset.x / width) * 2.0 - 1.0,
                -(offset.y / height) * 2.0 + 1.0,
            ],
            client,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Selected {
        index: usize,
        name: Option<String>,
    },
}

impl SelectionState {
    pub fn index(&self) -> Option<usize> {
        match self {
            SelectionState::Idle => None,
            SelectionState::Selected { index, .. } => Some(*index),
        }
    }
}

/// Everything the selection pass reads and writes for one frame
pub struct SelectionFrame<'a, H: Host> {
    pub hits: &'a [Hit],
    pub nodes: &'a [Node],
    pub statics: &'a StaticAttributes,
    pub buffers: &'a mut GeometryBuffers,
    pub pointer: Pointer,
    pub host: &'a mut H,
}

/// Hover selection: highlights the nearest eligible node under the pointer
/// and keeps the tooltip in sync with it.
#[derive(Debug, Clone)]
pub struct SelectionController {
    state: SelectionState,
    select_all: bool,
    size_mult: f32,
    tooltip_offset: f32,
}

impl SelectionController {
    pub fn new(select_all: bool, size_mult: f32, tooltip_offset: f32) -> Self {
        Self {
            state: SelectionState::Idle,
            select_all,
            size_mult,
            tooltip_offset,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Forget the selection without touching buffers (new dataset)
    pub fn clear(&mut self) {
        self.state = SelectionState::Idle;
    }

    /// Run one frame of the state machine
    pub fn update<H: Host>(&mut self, frame: SelectionFrame<'_, H>) {
        let SelectionFrame {
            hits,
            nodes,
            statics,
            buffers,
            pointer,
            host,
        } = frame;

        let eligible = hits
            .iter()
            .map(|hit| hit.index)
            .find(|&index| nodes[index].selectable || self.select_all);

        let Some(index) = eligible else {
            if matches!(self.state, SelectionState::Selected { .. }) {
                buffers.reset_highlight(statics);
                host.hide_tooltip();
                self.state = SelectionState::Idle;
                tracing::trace!("selection cleared");
            }
            return;
        };

        let name = &nodes[index].name;
        let changed = match &self.state {
            SelectionState::Idle => true,
            SelectionState::Selected { name: current, .. } => current != name,
        };
        if changed {
            buffers.reset_highlight(statics);
            self.state = SelectionState::Selected {
                index,
                name: name.clone(),
            };
            tracing::trace!(index, "selected node");
        }

        if let SelectionState::Selected { index, name } = &self.state {
            buffers.highlight(*index, statics, self.size_mult);
            let at = ScreenPoint {
                x: pointer.client.x + self.tooltip_offset,
                y: pointer.client.y + self.tooltip_offset,
            };
            host.show_tooltip(name.as_deref(), at);
        }
    }
}
