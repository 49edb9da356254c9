//! Map solver-space positions into the render cube [-1, 1]³
//!
//! Each axis is scaled independently from its observed extent. Degenerate
//! axes collapse to the midpoint and non-finite coordinates are pinned to 0,
//! so the output is always inside the cube no matter what the solver did.

use crate::graph::Node;

/// Observed extent of one axis
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisRange {
    min: f32,
    max: f32,
}

impl AxisRange {
    fn of(nodes: &[Node], axis: usize) -> Option<Self> {
        nodes
            .iter()
            .map(|n| n.position[axis])
            .filter(|v| v.is_finite())
            .fold(None, |range: Option<Self>, v| {
                Some(match range {
                    Some(r) => Self {
                        min: r.min.min(v),
                        max: r.max.max(v),
                    },
                    None => Self { min: v, max: v },
                })
            })
    }

    fn map(self, value: f32) -> f32 {
        let extent = self.max - self.min;
        if !value.is_finite() || !extent.is_finite() || extent <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / extent * 2.0 - 1.0).clamp(-1.0, 1.0)
    }
}

/// Write `normalized` for every node from its current `position`
pub fn normalize(nodes: &mut [Node]) {
    let ranges: [Option<AxisRange>; 3] = std::array::from_fn(|axis| AxisRange::of(nodes, axis));

    for node in nodes.iter_mut() {
        for (axis, range) in ranges.iter().enumerate() {
            node.normalized[axis] = range.map_or(0.0, |r| r.map(node.position[axis]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use proptest::prelude::*;

    fn node_at(position: [f32; 3]) -> Node {
        Node {
            id: String::new(),
            name: None,
            color: Rgb([0.0; 3]),
            hub: false,
            selectable: false,
            degree: 0,
            position,
            velocity: [0.0; 3],
            normalized: [9.0; 3],
        }
    }

    #[test]
    fn extremes_map_to_cube_faces() {
        let mut nodes = vec![
            node_at([-10.0, 0.0, 5.0]),
            node_at([10.0, 4.0, 6.0]),
            node_at([0.0, 2.0, 5.5]),
        ];
        normalize(&mut nodes);

        assert_eq!(nodes[0].normalized, [-1.0, -1.0, -1.0]);
        assert_eq!(nodes[1].normalized, [1.0, 1.0, 1.0]);
        assert_eq!(nodes[2].normalized, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn single_node_maps_to_origin() {
        let mut nodes = vec![node_at([3.0, -7.0, 12.0])];
        normalize(&mut nodes);
        assert_eq!(nodes[0].normalized, [0.0; 3]);
    }

    #[test]
    fn degenerate_axis_maps_to_midpoint() {
        let mut nodes = vec![node_at([0.0, 1.0, 2.0]), node_at([4.0, 1.0, 2.0])];
        normalize(&mut nodes);
        assert_eq!(nodes[0].normalized, [-1.0, 0.0, 0.0]);
        assert_eq!(nodes[1].normalized, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn non_finite_positions_map_to_zero() {
        let mut nodes = vec![
            node_at([f32::NAN, 0.0, 0.0]),
            node_at([1.0, f32::INFINITY, 0.0]),
            node_at([3.0, 2.0, 1.0]),
        ];
        normalize(&mut nodes);

        assert_eq!(nodes[0].normalized[0], 0.0);
        assert_eq!(nodes[1].normalized[1], 0.0);
        // finite values still span their axis
        assert_eq!(nodes[1].normalized[0], -1.0);
        assert_eq!(nodes[2].normalized[0], 1.0);
    }

    #[test]
    fn empty_input_is_a_no_op() {
        let mut nodes: Vec<Node> = Vec::new();
        normalize(&mut nodes);
        assert!(nodes.is_empty());
    }

    fn coordinate() -> impl Strategy<Value = f32> {
        prop_oneof![
            8 => -1.0e6_f32..1.0e6,
            1 => Just(f32::NAN),
            1 => Just(f32::INFINITY),
            1 => Just(0.0_f32),
        ]
    }

    proptest! {
        #[test]
        fn normalized_coordinates_stay_in_cube(
            positions in prop::collection::vec([coordinate(), coordinate(), coordinate()], 1..64)
        ) {
            let mut nodes: Vec<Node> = positions.into_iter().map(node_at).collect();
            normalize(&mut nodes);

            for node in &nodes {
                for c in node.normalized {
                    prop_assert!((-1.0..=1.0).contains(&c), "{c} escaped the cube");
                }
            }
        }

        #[test]
        fn coincident_nodes_share_the_origin(
            point in [-1.0e3_f32..1.0e3, -1.0e3_f32..1.0e3, -1.0e3_f32..1.0e3],
            count in 1_usize..20,
        ) {
            let mut nodes = vec![node_at(point); count];
            normalize(&mut nodes);
            for node in &nodes {
                prop_assert_eq!(node.normalized, [0.0; 3]);
            }
        }
    }
}
