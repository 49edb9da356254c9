//! 3D force simulation for network layout
//!
//! A velocity-Verlet style solver in the d3-force family: each tick decays a
//! global `alpha`, lets the link and many-body forces add alpha-scaled
//! velocity, then damps and integrates. Many-body repulsion is approximated
//! with a Barnes-Hut octree.

mod forces;
mod octree;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::graph::Graph;
use crate::settings::{SimulationParams, SolverSettings};

use forces::{LinkCoefficients, RepulsionParams};

pub(crate) type Vec3 = [f32; 3];

/// How the spring constant of each link is chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinkStrength {
    /// Same constant for every link
    Constant(f32),
    /// `1 / min(degree(source), degree(target))`
    DegreeDerived,
}

impl From<Option<f32>> for LinkStrength {
    fn from(value: Option<f32>) -> Self {
        value.map_or(LinkStrength::DegreeDerived, LinkStrength::Constant)
    }
}

/// Force parameters for the solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceConfig {
    /// Many-body strength (negative = repulsion)
    pub manybody_strength: f32,
    pub link_strength: LinkStrength,
    /// Spring rest length
    pub link_distance: f32,
    /// Fraction of velocity removed per tick
    pub velocity_decay: f32,
    /// Barnes-Hut threshold
    pub theta: f32,
    /// Floor for alpha
    pub alpha_min: f32,
    /// Per-tick alpha decay rate
    pub alpha_decay: f32,
}

impl ForceConfig {
    pub fn new(params: &SimulationParams, solver: &SolverSettings) -> Self {
        Self {
            manybody_strength: params.manybody_strength,
            link_strength: params.link_strength.into(),
            link_distance: solver.link_distance,
            velocity_decay: solver.velocity_decay,
            theta: solver.theta,
            alpha_min: solver.alpha_min,
            alpha_decay: 1.0 - solver.alpha_min.powf(1.0 / 300.0),
        }
    }
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self::new(&SimulationParams::default(), &SolverSettings::default())
    }
}

/// Force solver state for one graph
pub struct Simulation {
    config: ForceConfig,
    alpha: f32,
    rng: StdRng,
    coefficients: Vec<LinkCoefficients>,
    positions: Vec<Vec3>,
}

impl Simulation {
    /// Create a solver for `graph`, starting at `alpha = 1`
    pub fn new(graph: &Graph, config: ForceConfig, seed: u64) -> Self {
        Self {
            config,
            alpha: 1.0,
            rng: StdRng::seed_from_u64(seed),
            coefficients: link_coefficients(graph, config.link_strength),
            positions: Vec::with_capacity(graph.node_count()),
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn config(&self) -> &ForceConfig {
        &self.config
    }

    /// Replace the strengths and restart decay from `alpha = 1`.
    ///
    /// Node positions are left where they are.
    pub fn reconfigure(&mut self, graph: &Graph, manybody_strength: f32, link: LinkStrength) {
        self.config.manybody_strength = manybody_strength;
        self.config.link_strength = link;
        self.coefficients = link_coefficients(graph, link);
        self.reheat();
    }

    /// Restart decay without touching the forces
    pub fn reheat(&mut self) {
        self.alpha = 1.0;
    }

    /// Advance the layout by one step
    pub fn tick(&mut self, graph: &mut Graph) {
        let config = self.config;
        self.alpha = (self.alpha - self.alpha * config.alpha_decay).max(config.alpha_min);

        if graph.nodes.is_empty() {
            return;
        }

        forces::apply_links(
            &mut graph.nodes,
            &graph.links,
            &self.coefficients,
            config.link_distance,
            self.alpha,
            &mut self.rng,
        );

        if config.manybody_strength != 0.0 {
            let params = RepulsionParams {
                strength: config.manybody_strength,
                theta_sq: config.theta * config.theta,
                alpha: self.alpha,
            };
            forces::apply_many_body(&mut graph.nodes, &mut self.positions, params, &mut self.rng);
        }

        let keep = 1.0 - config.velocity_decay;
        for node in &mut graph.nodes {
            for axis in 0..3 {
                node.velocity[axis] *= keep;
                node.position[axis] += node.velocity[axis];
            }
        }
    }

    /// Run `ticks` steps back to back
    pub fn run(&mut self, graph: &mut Graph, ticks: usize) {
        for _ in 0..ticks {
            self.tick(graph);
        }
    }
}

fn link_coefficients(graph: &Graph, link: LinkStrength) -> Vec<LinkCoefficients> {
    graph
        .links
        .iter()
        .map(|l| {
            let source = graph.nodes[l.source].degree as f32;
            let target = graph.nodes[l.target].degree as f32;
            let strength = match link {
                LinkStrength::Constant(value) => value,
                LinkStrength::DegreeDerived => 1.0 / source.min(target),
            };
            LinkCoefficients {
                strength,
                bias: source / (source + target),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorValue;
    use crate::graph::{Dataset, Edge, Vertex};

    fn make_graph(count: usize, edges: &[(usize, usize)]) -> Graph {
        let data = Dataset {
            vertices: (0..count)
                .map(|i| Vertex {
                    id: format!("n{i}"),
                    name: Some(format!("Node {i}")),
                    color: ColorValue::Hex(0x336699),
                    hub: false,
                    selectable: true,
                })
                .collect(),
            edges: edges
                .iter()
                .map(|(s, t)| Edge {
                    source: format!("n{s}"),
                    target: format!("n{t}"),
                })
                .collect(),
        };
        Graph::from_dataset(&data).unwrap()
    }

    fn distance(a: Vec3, b: Vec3) -> f32 {
        ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
    }

    #[test]
    fn alpha_decays_toward_floor() {
        let mut graph = make_graph(2, &[(0, 1)]);
        let mut sim = Simulation::new(&graph, ForceConfig::default(), 1);

        sim.tick(&mut graph);
        assert!(sim.alpha() < 1.0);

        sim.run(&mut graph, 1000);
        assert_eq!(sim.alpha(), sim.config().alpha_min);
    }

    #[test]
    fn reconfigure_reheats_and_keeps_positions() {
        let mut graph = make_graph(3, &[(0, 1)]);
        let mut sim = Simulation::new(&graph, ForceConfig::default(), 1);
        sim.run(&mut graph, 20);
        let before: Vec<Vec3> = graph.nodes.iter().map(|n| n.position).collect();

        sim.reconfigure(&graph, -5.0, LinkStrength::Constant(0.5));

        assert_eq!(sim.alpha(), 1.0);
        assert_eq!(sim.config().manybody_strength, -5.0);
        let after: Vec<Vec3> = graph.nodes.iter().map(|n| n.position).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn degree_derived_strengths_for_path() {
        let graph = make_graph(3, &[(0, 1), (1, 2)]);
        let coefficients = link_coefficients(&graph, LinkStrength::DegreeDerived);

        assert_eq!(coefficients.len(), 2);
        for c in &coefficients {
            assert_eq!(c.strength, 1.0);
        }
        // leaf -> hub: bias = 1 / (1 + 2)
        assert!((coefficients[0].bias - 1.0 / 3.0).abs() < 1e-6);
        assert!((coefficients[1].bias - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn constant_strength_is_used_verbatim() {
        let graph = make_graph(4, &[(0, 1), (1, 2), (1, 3)]);
        let coefficients = link_coefficients(&graph, LinkStrength::Constant(0.25));
        assert!(coefficients.iter().all(|c| c.strength == 0.25));
    }

    #[test]
    fn path_leaves_settle_equidistant_from_hub() {
        let mut graph = make_graph(3, &[(0, 1), (1, 2)]);
        let mut sim = Simulation::new(&graph, ForceConfig::default(), 0x5eed);
        sim.run(&mut graph, 300);

        let hub = graph.nodes[1].position;
        let left = distance(graph.nodes[0].position, hub);
        let right = distance(graph.nodes[2].position, hub);
        assert!(
            (left - right).abs() < 0.05 * left.max(right),
            "leaves at {left} and {right} from hub"
        );
    }

    #[test]
    fn isolated_nodes_stay_put_without_repulsion() {
        let mut graph = make_graph(4, &[]);
        let config = ForceConfig {
            manybody_strength: 0.0,
            ..ForceConfig::default()
        };
        let mut sim = Simulation::new(&graph, config, 1);
        let before: Vec<Vec3> = graph.nodes.iter().map(|n| n.position).collect();

        sim.run(&mut graph, 5);

        let after: Vec<Vec3> = graph.nodes.iter().map(|n| n.position).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let run = || {
            let mut graph = make_graph(12, &[(0, 1), (1, 2), (2, 3), (5, 6)]);
            let mut sim = Simulation::new(&graph, ForceConfig::default(), 42);
            sim.run(&mut graph, 50);
            graph.nodes.iter().map(|n| n.position).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn empty_graph_handles_gracefully() {
        let mut graph = Graph::default();
        let mut sim = Simulation::new(&graph, ForceConfig::default(), 1);
        sim.run(&mut graph, 10);
        assert!(sim.alpha() < 1.0);
    }

    #[test]
    fn repulsion_spreads_unlinked_nodes() {
        let mut graph = make_graph(2, &[]);
        let mut sim = Simulation::new(&graph, ForceConfig::default(), 1);
        let initial = distance(graph.nodes[0].position, graph.nodes[1].position);

        sim.run(&mut graph, 50);

        let spread = distance(graph.nodes[0].position, graph.nodes[1].position);
        assert!(spread > initial);
    }
}
