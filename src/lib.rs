//! network3d - force-directed 3D network layout with hover selection.
//!
//! A [`Network`] takes a dataset of vertices and edges, lays it out with a
//! d3-style force simulation, normalizes the layout into the cube [-1, 1]³
//! and keeps GPU-ready point and line buffers in sync with it. Pointer hover
//! highlights the node under the cursor and drives a tooltip. All rendering
//! and UI goes through a [`Host`] supplied by the embedding environment.
//!
//! ```
//! use network3d::{Dataset, HeadlessHost, Network, Settings, Viewport};
//!
//! let data = Dataset::from_json_str(
//!     r##"{"vertices": [{"id": "a", "color": "#ff0000"}, {"id": "b", "color": "#00ff00"}],
//!         "edges": [{"source": "a", "target": "b"}]}"##,
//! )?;
//! let viewport = Viewport { width: 800.0, height: 600.0 };
//! let mut network = Network::new(Settings::default(), HeadlessHost::default(), viewport)?;
//! network.load(&data)?;
//!
//! while network.iteration() < network.params().max_iterations {
//!     network.tick();
//! }
//! network.stop();
//! assert!(network.tick().is_break());
//! # Ok::<(), network3d::LoadError>(())
//! ```

pub mod camera;
pub mod color;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod host;
pub mod network;
pub mod normalize;
pub mod picking;
pub mod selection;
pub mod settings;
pub mod simulation;

pub use error::{ConfigError, LoadError, LoadResult};
pub use graph::{Dataset, Graph};
pub use host::{HeadlessHost, Host, HostEvent, Scene, ScreenPoint, Viewport};
pub use network::{LayoutReport, Network};
pub use settings::{Settings, SimulationParams};
