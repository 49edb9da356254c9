//! Point and line geometry buffers
//!
//! Buffers are flat `f32` arrays laid out the way a GPU vertex buffer wants
//! them: positions and colors are 3 floats per vertex, sizes 1 float per
//! vertex, and each line contributes two position triples. Lengths are fixed
//! at construction; every later update writes in place.

use bytemuck::{Pod, Zeroable};

use crate::color::Rgb;
use crate::graph::{Link, Node};
use crate::settings::Sizes;

/// Point positions from the normalized node coordinates (length 3N)
pub fn build_point_positions(nodes: &[Node]) -> Vec<f32> {
    nodes.iter().flat_map(|n| n.normalized).collect()
}

/// Line segment endpoints, source then target (length 6M)
pub fn build_line_positions(nodes: &[Node], links: &[Link]) -> Vec<f32> {
    links
        .iter()
        .flat_map(|l| {
            let [sx, sy, sz] = nodes[l.source].normalized;
            let [tx, ty, tz] = nodes[l.target].normalized;
            [sx, sy, sz, tx, ty, tz]
        })
        .collect()
}

/// Per-node colors and sizes as computed at load.
///
/// These are the values the live buffers return to whenever nothing is
/// selected.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticAttributes {
    /// 3 floats per node
    pub colors: Vec<f32>,
    /// 1 float per node
    pub sizes: Vec<f32>,
}

impl StaticAttributes {
    pub fn color(&self, index: usize) -> Rgb {
        let c = &self.colors[index * 3..index * 3 + 3];
        Rgb([c[0], c[1], c[2]])
    }
}

pub fn build_static_attributes(nodes: &[Node], sizes: &Sizes) -> StaticAttributes {
    StaticAttributes {
        colors: nodes.iter().flat_map(|n| n.color.0).collect(),
        sizes: nodes
            .iter()
            .map(|n| if n.hub { sizes.hub_size } else { sizes.point_size })
            .collect(),
    }
}

/// Sphere enclosing every point, for culling and camera fitting.
///
/// Layout matches a `vec4<f32>` uniform.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BoundingSphere {
    pub center: [f32; 3],
    pub radius: f32,
}

impl BoundingSphere {
    /// Center of the axis-aligned bounding box, radius to the farthest point
    pub fn from_positions(positions: &[f32]) -> Self {
        if positions.is_empty() {
            return Self::default();
        }

        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for p in positions.chunks_exact(3) {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        let center = [
            (min[0] + max[0]) / 2.0,
            (min[1] + max[1]) / 2.0,
            (min[2] + max[2]) / 2.0,
        ];

        let radius_sq = positions
            .chunks_exact(3)
            .map(|p| {
                (p[0] - center[0]).powi(2) + (p[1] - center[1]).powi(2) + (p[2] - center[2]).powi(2)
            })
            .fold(0.0_f32, f32::max);

        Self {
            center,
            radius: radius_sq.sqrt(),
        }
    }
}

/// Which attributes changed since the renderer last uploaded them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyFlags {
    pub point_positions: bool,
    pub line_positions: bool,
    pub colors: bool,
    pub sizes: bool,
}

impl DirtyFlags {
    const ALL: Self = Self {
        point_positions: true,
        line_positions: true,
        colors: true,
        sizes: true,
    };

    pub fn any(self) -> bool {
        self.point_positions || self.line_positions || self.colors || self.sizes
    }
}

/// Live geometry for one loaded dataset
#[derive(Debug, Clone)]
pub struct GeometryBuffers {
    point_positions: Vec<f32>,
    line_positions: Vec<f32>,
    colors: Vec<f32>,
    sizes: Vec<f32>,
    bounding_sphere: BoundingSphere,
    dirty: DirtyFlags,
}

impl GeometryBuffers {
    /// Allocate buffers for `nodes` and `links`, seeded from the static
    /// attributes. Everything starts dirty.
    pub fn new(nodes: &[Node], links: &[Link], statics: &StaticAttributes) -> Self {
        let point_positions = build_point_positions(nodes);
        Self {
            bounding_sphere: BoundingSphere::from_positions(&point_positions),
            line_positions: build_line_positions(nodes, links),
            point_positions,
            colors: statics.colors.clone(),
            sizes: statics.sizes.clone(),
            dirty: DirtyFlags::ALL,
        }
    }

    pub fn point_count(&self) -> usize {
        self.sizes.len()
    }

    pub fn line_count(&self) -> usize {
        self.line_positions.len() / 6
    }

    pub fn point_positions(&self) -> &[f32] {
        &self.point_positions
    }

    pub fn line_positions(&self) -> &[f32] {
        &self.line_positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn bounding_sphere(&self) -> BoundingSphere {
        self.bounding_sphere
    }

    /// Overwrite both position buffers from the nodes' normalized coordinates
    pub fn update_positions(&mut self, nodes: &[Node], links: &[Link]) {
        for (dst, node) in self.point_positions.chunks_exact_mut(3).zip(nodes) {
            dst.copy_from_slice(&node.normalized);
        }
        for (dst, link) in self.line_positions.chunks_exact_mut(6).zip(links) {
            dst[..3].copy_from_slice(&nodes[link.source].normalized);
            dst[3..].copy_from_slice(&nodes[link.target].normalized);
        }

        self.bounding_sphere = BoundingSphere::from_positions(&self.point_positions);
        self.dirty.point_positions = true;
        self.dirty.line_positions = true;
    }

    /// Restore every color and size to its static value
    pub fn reset_highlight(&mut self, statics: &StaticAttributes) {
        self.colors.copy_from_slice(&statics.colors);
        self.sizes.copy_from_slice(&statics.sizes);
        self.dirty.colors = true;
        self.dirty.sizes = true;
    }

    /// Darken and enlarge one node, starting from its static values
    pub fn highlight(&mut self, index: usize, statics: &StaticAttributes, size_mult: f32) {
        let darker = statics.color(index).darker();
        self.colors[index * 3..index * 3 + 3].copy_from_slice(&darker.0);
        self.sizes[index] = statics.sizes[index] * size_mult;
        self.dirty.colors = true;
        self.dirty.sizes = true;
    }

    /// Return the dirty flags and clear them
    pub fn take_dirty(&mut self) -> DirtyFlags {
        std::mem::take(&mut self.dirty)
    }

    pub fn point_position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.point_positions)
    }

    pub fn line_position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.line_positions)
    }

    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    pub fn size_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.sizes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(normalized: [f32; 3], color: [f32; 3], hub: bool) -> Node {
        Node {
            id: String::new(),
            name: None,
            color: Rgb(color),
            hub,
            selectable: true,
            degree: 1,
            position: normalized,
            velocity: [0.0; 3],
            normalized,
        }
    }

    fn fixture() -> (Vec<Node>, Vec<Link>, StaticAttributes) {
        let nodes = vec![
            node([-1.0, 0.0, 0.0], [1.0, 0.0, 0.0], true),
            node([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], false),
            node([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], false),
        ];
        let links = vec![
            Link {
                source: 0,
                target: 1,
            },
            Link {
                source: 1,
                target: 2,
            },
        ];
        let statics = build_static_attributes(&nodes, &Sizes::default());
        (nodes, links, statics)
    }

    #[test]
    fn buffer_lengths_follow_counts() {
        let (nodes, links, statics) = fixture();
        let buffers = GeometryBuffers::new(&nodes, &links, &statics);

        assert_eq!(buffers.point_positions().len(), 9);
        assert_eq!(buffers.colors().len(), 9);
        assert_eq!(buffers.sizes().len(), 3);
        assert_eq!(buffers.line_positions().len(), 12);
        assert_eq!(buffers.point_count(), 3);
        assert_eq!(buffers.line_count(), 2);
    }

    #[test]
    fn hubs_get_hub_size() {
        let (_, _, statics) = fixture();
        assert_eq!(statics.sizes, vec![0.3, 0.1, 0.1]);
    }

    #[test]
    fn line_positions_pair_source_and_target() {
        let (nodes, links, _) = fixture();
        let lines = build_line_positions(&nodes, &links);
        assert_eq!(&lines[..6], &[-1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(&lines[6..], &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn update_positions_writes_in_place_and_marks_dirty() {
        let (mut nodes, links, statics) = fixture();
        let mut buffers = GeometryBuffers::new(&nodes, &links, &statics);
        buffers.take_dirty();

        nodes[2].normalized = [0.0, -1.0, 0.5];
        buffers.update_positions(&nodes, &links);

        assert_eq!(&buffers.point_positions()[6..], &[0.0, -1.0, 0.5]);
        assert_eq!(&buffers.line_positions()[9..], &[0.0, -1.0, 0.5]);
        let dirty = buffers.take_dirty();
        assert!(dirty.point_positions && dirty.line_positions);
        assert!(!dirty.colors && !dirty.sizes);
        assert!(!buffers.take_dirty().any());
    }

    #[test]
    fn bounding_sphere_encloses_points() {
        let sphere = BoundingSphere::from_positions(&[-1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(sphere.center, [0.0, 0.5, 0.0]);
        assert!((sphere.radius - 1.25_f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn empty_bounding_sphere_is_zero() {
        assert_eq!(BoundingSphere::from_positions(&[]), BoundingSphere::default());
    }

    #[test]
    fn highlight_darkens_and_scales_one_node() {
        let (nodes, links, statics) = fixture();
        let mut buffers = GeometryBuffers::new(&nodes, &links, &statics);

        buffers.highlight(1, &statics, 1.5);

        assert_eq!(&buffers.colors()[3..6], &Rgb([0.0, 1.0, 0.0]).darker().0);
        assert_eq!(buffers.sizes()[1], 0.1 * 1.5);
        assert_eq!(&buffers.colors()[..3], &statics.colors[..3]);
        assert_eq!(buffers.sizes()[0], statics.sizes[0]);
    }

    #[test]
    fn repeated_highlight_is_idempotent() {
        let (nodes, links, statics) = fixture();
        let mut once = GeometryBuffers::new(&nodes, &links, &statics);
        once.highlight(0, &statics, 1.5);

        let mut many = GeometryBuffers::new(&nodes, &links, &statics);
        for _ in 0..5 {
            many.highlight(0, &statics, 1.5);
        }

        assert_eq!(once.colors(), many.colors());
        assert_eq!(once.sizes(), many.sizes());
    }

    #[test]
    fn reset_restores_static_defaults_exactly() {
        let (nodes, links, statics) = fixture();
        let mut buffers = GeometryBuffers::new(&nodes, &links, &statics);
        buffers.highlight(2, &statics, 3.0);
        buffers.reset_highlight(&statics);

        assert_eq!(buffers.colors(), statics.colors.as_slice());
        assert_eq!(buffers.sizes(), statics.sizes.as_slice());
    }

    #[test]
    fn byte_views_cover_every_float() {
        let (nodes, links, statics) = fixture();
        let buffers = GeometryBuffers::new(&nodes, &links, &statics);
        assert_eq!(buffers.point_position_bytes().len(), 9 * 4);
        assert_eq!(buffers.line_position_bytes().len(), 12 * 4);
        assert_eq!(buffers.color_bytes().len(), 9 * 4);
        assert_eq!(buffers.size_bytes().len(), 3 * 4);
        assert_eq!(bytemuck::bytes_of(&buffers.bounding_sphere()).len(), 16);
    }
}
