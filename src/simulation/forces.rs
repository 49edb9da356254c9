use rand::Rng;
use rand::rngs::StdRng;

use super::Vec3;
use super::octree::OctNode;
use crate::graph::{Link, Node};

/// Squared minimum distance below which repulsion is softened
const DISTANCE_MIN_SQ: f32 = 1.0;

#[derive(Clone, Copy)]
pub(super) struct RepulsionParams {
    pub(super) strength: f32,
    pub(super) theta_sq: f32,
    pub(super) alpha: f32,
}

/// Tiny random offset used to separate coincident nodes
pub(super) fn jiggle(rng: &mut StdRng) -> f32 {
    (rng.r#gen::<f32>() - 0.5) * 1e-6
}

fn delta_and_length_sq(from: Vec3, to: Vec3, rng: &mut StdRng) -> (Vec3, f32) {
    let mut delta = [to[0] - from[0], to[1] - from[1], to[2] - from[2]];
    let mut length_sq = 0.0;
    for d in &mut delta {
        if *d == 0.0 {
            *d = jiggle(rng);
        }
        length_sq += *d * *d;
    }
    (delta, length_sq)
}

fn softened(length_sq: f32) -> f32 {
    if length_sq < DISTANCE_MIN_SQ {
        (DISTANCE_MIN_SQ * length_sq).sqrt()
    } else {
        length_sq
    }
}

/// Walk the octree and accumulate the many-body velocity change for one node.
///
/// `velocity += delta * strength * mass * alpha / l`, where `delta` points from
/// the node toward the cell (or point) and `l` is the softened squared
/// distance. A negative strength therefore pushes the node away.
pub(super) fn accumulate_repulsion_for_node(
    node: &OctNode,
    index: usize,
    positions: &[Vec3],
    params: RepulsionParams,
    rng: &mut StdRng,
    velocity: &mut Vec3,
) {
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other_index in &node.indices {
            if other_index == index {
                continue;
            }
            let (delta, length_sq) = delta_and_length_sq(point, positions[other_index], rng);
            let scale = params.strength * params.alpha / softened(length_sq);
            for axis in 0..3 {
                velocity[axis] += delta[axis] * scale;
            }
        }
        return;
    }

    let delta = [
        node.center_of_mass[0] - point[0],
        node.center_of_mass[1] - point[1],
        node.center_of_mass[2] - point[2],
    ];
    let distance_sq = delta[0] * delta[0] + delta[1] * delta[1] + delta[2] * delta[2];
    let width = node.bounds.side_length();
    let can_approximate =
        !node.bounds.contains(point) && width * width / params.theta_sq < distance_sq;

    if can_approximate {
        let scale = params.strength * node.mass * params.alpha / softened(distance_sq);
        for axis in 0..3 {
            velocity[axis] += delta[axis] * scale;
        }
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_repulsion_for_node(child, index, positions, params, rng, velocity);
    }
}

/// Apply the many-body force to every node
pub(super) fn apply_many_body(
    nodes: &mut [Node],
    positions: &mut Vec<Vec3>,
    params: RepulsionParams,
    rng: &mut StdRng,
) {
    positions.clear();
    positions.extend(nodes.iter().map(|n| n.position));

    let Some(tree) = OctNode::build(positions) else {
        return;
    };

    for (index, node) in nodes.iter_mut().enumerate() {
        accumulate_repulsion_for_node(&tree, index, positions, params, rng, &mut node.velocity);
    }
}

/// Per-link spring constants, computed whenever the graph or params change
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct LinkCoefficients {
    pub(super) strength: f32,
    /// Share of the displacement applied to the target
    pub(super) bias: f32,
}

/// Pull each link's endpoints toward the rest length.
///
/// Uses the positions the endpoints will have after this tick's velocity is
/// applied, so the spring anticipates the motion already accumulated.
pub(super) fn apply_links(
    nodes: &mut [Node],
    links: &[Link],
    coefficients: &[LinkCoefficients],
    rest_length: f32,
    alpha: f32,
    rng: &mut StdRng,
) {
    for (link, coeff) in links.iter().zip(coefficients) {
        let (source, target) = (link.source, link.target);
        let projected = |node: &Node| {
            [
                node.position[0] + node.velocity[0],
                node.position[1] + node.velocity[1],
                node.position[2] + node.velocity[2],
            ]
        };

        let (delta, length_sq) =
            delta_and_length_sq(projected(&nodes[source]), projected(&nodes[target]), rng);
        let length = length_sq.sqrt();
        let scale = (length - rest_length) / length * alpha * coeff.strength;

        for axis in 0..3 {
            let displacement = delta[axis] * scale;
            nodes[target].velocity[axis] -= displacement * coeff.bias;
            nodes[source].velocity[axis] += displacement * (1.0 - coeff.bias);
        }
    }
}
