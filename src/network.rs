//! The network visualization: data, solver, geometry and selection driven
//! one frame at a time
//!
//! A [`Network`] owns every piece of mutable state. The embedding
//! environment calls [`Network::tick`] from its frame driver and forwards
//! pointer and resize events; everything else happens through the [`Host`].

use std::ops::ControlFlow;

use serde::Serialize;

use crate::camera::Camera3D;
use crate::error::{ConfigError, LoadError, LoadResult};
use crate::geometry::{GeometryBuffers, StaticAttributes, build_static_attributes};
use crate::graph::{Dataset, Graph};
use crate::host::{Host, Scene, SceneStyle, ScreenPoint, Viewport};
use crate::normalize::normalize;
use crate::picking::Raycaster;
use crate::selection::{Pointer, SelectionController, SelectionFrame, SelectionState};
use crate::settings::{Settings, SimulationParams};
use crate::simulation::{ForceConfig, Simulation};

/// Everything derived from one loaded dataset
struct Layout {
    graph: Graph,
    simulation: Simulation,
    statics: StaticAttributes,
    buffers: GeometryBuffers,
}

/// Interactive 3D network layout
pub struct Network<H: Host> {
    settings: Settings,
    params: SimulationParams,
    host: H,
    camera: Camera3D,
    viewport: Viewport,
    style: SceneStyle,
    pointer: Pointer,
    raycaster: Raycaster,
    selection: SelectionController,
    layout: Option<Layout>,
    iteration: usize,
    stopped: bool,
}

impl<H: Host> Network<H> {
    /// Create an empty network. Nothing is simulated until [`Network::load`].
    pub fn new(settings: Settings, host: H, viewport: Viewport) -> LoadResult<Self> {
        let params = settings.simulation_params();
        params.validate()?;
        let style = SceneStyle::from_settings(&settings)?;

        Ok(Self {
            camera: Camera3D::from_settings(&settings.camera, viewport.aspect()),
            raycaster: Raycaster::new(settings.misc.raycast_res),
            selection: SelectionController::new(
                settings.misc.select_all,
                settings.sizes.selection_size_mult,
                settings.misc.tooltip_offset,
            ),
            settings,
            params,
            host,
            viewport,
            style,
            pointer: Pointer::default(),
            layout: None,
            iteration: 0,
            stopped: false,
        })
    }

    /// Replace the displayed dataset.
    ///
    /// On error the previous dataset stays loaded and untouched. A stopped
    /// network accepts no new data.
    pub fn load(&mut self, data: &Dataset) -> LoadResult<()> {
        if self.stopped {
            return Err(LoadError::Stopped);
        }
        let mut graph = Graph::from_dataset(data)?;

        normalize(&mut graph.nodes);
        let statics = build_static_attributes(&graph.nodes, &self.settings.sizes);
        let buffers = GeometryBuffers::new(&graph.nodes, &graph.links, &statics);
        let simulation = Simulation::new(
            &graph,
            ForceConfig::new(&self.params, &self.settings.simulation),
            self.settings.simulation.seed,
        );

        if let Some(old) = self.layout.take() {
            self.host.dispose_geometry(&old.buffers);
        }
        if matches!(self.selection.state(), SelectionState::Selected { .. }) {
            self.host.hide_tooltip();
        }
        self.selection.clear();

        tracing::info!(
            nodes = graph.node_count(),
            links = graph.link_count(),
            "loaded dataset"
        );

        self.layout = Some(Layout {
            graph,
            simulation,
            statics,
            buffers,
        });
        self.iteration = 0;

        if self.settings.misc.show_simulation_progress && self.params.max_iterations > 0 {
            self.host.show_progress();
        }
        Ok(())
    }

    /// Run one frame. Returns `Break` once the network has been stopped.
    pub fn tick(&mut self) -> ControlFlow<()> {
        if self.stopped {
            return ControlFlow::Break(());
        }

        if let Some(layout) = self.layout.as_mut() {
            let budget = self.params.max_iterations;
            if self.iteration < budget {
                layout.simulation.tick(&mut layout.graph);
                normalize(&mut layout.graph.nodes);
                layout
                    .buffers
                    .update_positions(&layout.graph.nodes, &layout.graph.links);
                self.iteration += 1;

                if self.settings.misc.show_simulation_progress {
                    if self.iteration == budget {
                        self.host.hide_progress();
                    } else {
                        self.host.update_progress(self.iteration, budget);
                    }
                }
                if self.iteration == budget {
                    tracing::debug!(
                        iterations = budget,
                        alpha = layout.simulation.alpha(),
                        "layout complete"
                    );
                }
            }

            if self.settings.misc.interactive {
                let ray = self.camera.ray_through(self.pointer.ndc);
                let hits = self
                    .raycaster
                    .with_clip(self.camera.near, self.camera.far)
                    .intersect_points(&ray, layout.buffers.point_positions());
                self.selection.update(SelectionFrame {
                    hits: &hits,
                    nodes: &layout.graph.nodes,
                    statics: &layout.statics,
                    buffers: &mut layout.buffers,
                    pointer: self.pointer,
                    host: &mut self.host,
                });
            }
        }

        self.host.update_controls(&mut self.camera);

        let dirty = self
            .layout
            .as_mut()
            .map(|l| l.buffers.take_dirty())
            .unwrap_or_default();
        let scene = Scene {
            buffers: self.layout.as_ref().map(|l| &l.buffers),
            dirty,
            camera: &self.camera,
            viewport: self.viewport,
            style: &self.style,
        };
        self.host.draw(&scene);

        tracing::trace!(iteration = self.iteration, "frame");
        ControlFlow::Continue(())
    }

    /// Record a pointer move.
    ///
    /// `offset` is relative to the canvas; `client` is the page position the
    /// tooltip is placed against.
    pub fn pointer_moved(&mut self, offset: ScreenPoint, client: ScreenPoint) {
        self.pointer = Pointer::from_event(
            offset,
            client,
            self.viewport.width,
            self.viewport.height,
        );
    }

    /// Resize the drawable area
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport { width, height };
        self.camera.resize(width, height);
    }

    /// Swap in new simulation parameters and restart the layout from the
    /// current positions.
    ///
    /// Non-finite strengths are rejected and the previous parameters kept.
    pub fn reconfigure(&mut self, params: SimulationParams) -> Result<(), ConfigError> {
        if let Err(err) = params.validate() {
            tracing::warn!(%err, "rejected simulation parameters");
            return Err(err);
        }

        let progress_visible = self.iteration < self.params.max_iterations;
        self.params = params;
        self.iteration = 0;
        tracing::debug!(
            manybody_strength = params.manybody_strength,
            link_strength = ?params.link_strength,
            max_iterations = params.max_iterations,
            "reconfigured simulation"
        );

        if let Some(layout) = self.layout.as_mut() {
            layout.simulation.reconfigure(
                &layout.graph,
                params.manybody_strength,
                params.link_strength.into(),
            );

            if self.settings.misc.show_simulation_progress {
                if params.max_iterations == 0 {
                    if progress_visible {
                        self.host.hide_progress();
                    }
                } else {
                    self.host.show_progress();
                }
            }
        }
        Ok(())
    }

    /// Tear down: dispose the geometry and stop the frame loop
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        if let Some(layout) = self.layout.take() {
            self.host.dispose_geometry(&layout.buffers);
        }
        self.stopped = true;
        tracing::info!("network stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn params(&self) -> SimulationParams {
        self.params
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn graph(&self) -> Option<&Graph> {
        self.layout.as_ref().map(|l| &l.graph)
    }

    pub fn buffers(&self) -> Option<&GeometryBuffers> {
        self.layout.as_ref().map(|l| &l.buffers)
    }

    pub fn static_attributes(&self) -> Option<&StaticAttributes> {
        self.layout.as_ref().map(|l| &l.statics)
    }

    /// Current solver temperature, if a dataset is loaded
    pub fn alpha(&self) -> Option<f32> {
        self.layout.as_ref().map(|l| l.simulation.alpha())
    }

    pub fn camera(&self) -> &Camera3D {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Snapshot of the layout in render space
    pub fn report(&self) -> LayoutReport {
        let nodes = self
            .graph()
            .map(|g| {
                g.nodes
                    .iter()
                    .map(|n| NodeReport {
                        id: n.id.clone(),
                        name: n.name.clone(),
                        position: n.normalized,
                        degree: n.degree,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let selected = match (self.selection.state(), self.graph()) {
            (SelectionState::Selected { index, .. }, Some(g)) => Some(g.nodes[*index].id.clone()),
            _ => None,
        };

        LayoutReport {
            iterations: self.iteration,
            nodes,
            selected,
        }
    }
}

/// Serializable layout snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutReport {
    pub iterations: usize,
    pub nodes: Vec<NodeReport>,
    /// Id of the selected node
    pub selected: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeReport {
    pub id: String,
    pub name: Option<String>,
    pub position: [f32; 3],
    pub degree: usize,
}
