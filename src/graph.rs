//! Graph model: input records and the resolved node/link arena
//!
//! Input vertices and edges reference each other by string id. Loading runs a
//! single resolution pass that turns every edge endpoint into an index into
//! the node arena; nothing downstream ever looks an id up again.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::color::{ColorValue, Rgb};
use crate::error::{LoadError, LoadResult};

/// Radius scale of the initial phyllotaxis placement
const INITIAL_RADIUS: f32 = 10.0;

/// A vertex as supplied by the data layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    /// Unique identifier (strings and integers are both accepted)
    #[serde(deserialize_with = "id_string")]
    pub id: String,

    /// Display name, shown in the tooltip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub color: ColorValue,

    /// Hubs render at `hub_size` instead of `point_size`
    #[serde(default)]
    pub hub: bool,

    /// Whether the node can be picked when `select_all` is off
    #[serde(default)]
    pub selectable: bool,
}

/// An edge as supplied by the data layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    #[serde(deserialize_with = "id_string")]
    pub source: String,
    #[serde(deserialize_with = "id_string")]
    pub target: String,
}

/// Raw dataset: vertex and edge lists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub vertices: Vec<Vertex>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Dataset {
    /// Parse a dataset from JSON text
    pub fn from_json_str(text: &str) -> LoadResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a dataset from a JSON file
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(i) => i.to_string(),
    })
}

/// A node in the resolved graph
#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub name: Option<String>,
    pub color: Rgb,
    pub hub: bool,
    pub selectable: bool,
    /// Number of incident links (self-loops count twice)
    pub degree: usize,
    /// Solver-space position
    pub position: [f32; 3],
    /// Solver-space velocity
    pub velocity: [f32; 3],
    /// Render-space position in [-1, 1]
    pub normalized: [f32; 3],
}

impl Node {
    fn from_vertex(vertex: &Vertex, index: usize) -> LoadResult<Self> {
        let color = vertex
            .color
            .resolve()
            .ok_or_else(|| LoadError::InvalidColor {
                id: vertex.id.clone(),
                value: vertex.color.to_string(),
            })?;

        Ok(Self {
            id: vertex.id.clone(),
            name: vertex.name.clone(),
            color,
            hub: vertex.hub,
            selectable: vertex.selectable,
            degree: 0,
            position: initial_position(index),
            velocity: [0.0; 3],
            normalized: [0.0; 3],
        })
    }
}

/// Initial placement on a 3D phyllotaxis spiral.
///
/// Deterministic and non-coincident for distinct indices, so the first tick
/// never starts from a degenerate configuration.
pub fn initial_position(index: usize) -> [f32; 3] {
    let angle_roll = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
    let angle_yaw = std::f32::consts::PI * 20.0 / (9.0 + 221.0_f32.sqrt());

    let i = index as f32;
    let radius = INITIAL_RADIUS * (0.5 + i).cbrt();
    let roll = i * angle_roll;
    let yaw = i * angle_yaw;

    [
        radius * roll.cos(),
        radius * roll.sin() * yaw.cos(),
        radius * roll.sin() * yaw.sin(),
    ]
}

/// A link between two nodes, by arena index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub source: usize,
    pub target: usize,
}

/// Resolved graph: node arena plus index-based links
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl Graph {
    /// Resolve a dataset into a graph.
    ///
    /// Fails on duplicate vertex ids, unparseable colors, or any edge that
    /// names an id missing from the vertex list.
    pub fn from_dataset(data: &Dataset) -> LoadResult<Self> {
        let mut index_by_id: HashMap<&str, usize> = HashMap::with_capacity(data.vertices.len());
        let mut nodes = Vec::with_capacity(data.vertices.len());

        for (index, vertex) in data.vertices.iter().enumerate() {
            if index_by_id.insert(vertex.id.as_str(), index).is_some() {
                return Err(LoadError::DuplicateNode(vertex.id.clone()));
            }
            nodes.push(Node::from_vertex(vertex, index)?);
        }

        let resolve = |edge: usize, id: &str| {
            index_by_id
                .get(id)
                .copied()
                .ok_or_else(|| LoadError::UnknownNode {
                    edge,
                    id: id.to_string(),
                })
        };

        let links = data
            .edges
            .iter()
            .enumerate()
            .map(|(i, e)| {
                Ok(Link {
                    source: resolve(i, &e.source)?,
                    target: resolve(i, &e.target)?,
                })
            })
            .collect::<LoadResult<Vec<_>>>()?;

        for link in &links {
            nodes[link.source].degree += 1;
            nodes[link.target].degree += 1;
        }

        Ok(Self { nodes, links })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}
