use super::Vec3;

const OCTREE_LEAF_CAPACITY: usize = 8;
const OCTREE_MAX_DEPTH: usize = 12;

/// Axis-aligned cube
#[derive(Debug, Clone, Copy)]
pub(super) struct OctBounds {
    pub(super) center: Vec3,
    pub(super) half_extent: f32,
}

impl OctBounds {
    fn from_points(points: &[Vec3]) -> Option<Self> {
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];

        for point in points {
            for axis in 0..3 {
                min[axis] = min[axis].min(point[axis]);
                max[axis] = max[axis].max(point[axis]);
            }
        }

        if min.iter().chain(max.iter()).any(|c| !c.is_finite()) {
            return None;
        }

        let center = [
            (min[0] + max[0]) * 0.5,
            (min[1] + max[1]) * 0.5,
            (min[2] + max[2]) * 0.5,
        ];
        let span = (0..3)
            .map(|axis| max[axis] - min[axis])
            .fold(1.0_f32, f32::max);

        Some(Self {
            center,
            half_extent: span * 0.5 + 1.0,
        })
    }

    pub(super) fn contains(self, point: Vec3) -> bool {
        (0..3).all(|axis| (point[axis] - self.center[axis]).abs() <= self.half_extent)
    }

    fn child(self, octant: usize) -> Self {
        let quarter = self.half_extent * 0.5;
        let mut center = self.center;
        for (axis, c) in center.iter_mut().enumerate() {
            if octant & (1 << axis) != 0 {
                *c += quarter;
            } else {
                *c -= quarter;
            }
        }

        Self {
            center,
            half_extent: quarter,
        }
    }

    /// Bit `axis` is set when the point lies on the positive side of that axis.
    fn octant_for(self, point: Vec3) -> usize {
        (0..3)
            .filter(|&axis| point[axis] >= self.center[axis])
            .fold(0, |octant, axis| octant | (1 << axis))
    }

    pub(super) fn side_length(self) -> f32 {
        self.half_extent * 2.0
    }
}

/// Barnes-Hut octree cell. Leaves keep their point indices; internal cells
/// only carry the aggregate mass and center of mass.
pub(super) struct OctNode {
    pub(super) bounds: OctBounds,
    pub(super) center_of_mass: Vec3,
    pub(super) mass: f32,
    pub(super) indices: Vec<usize>,
    pub(super) children: [Option<Box<OctNode>>; 8],
}

impl OctNode {
    pub(super) fn build(positions: &[Vec3]) -> Option<Self> {
        if positions.is_empty() {
            return None;
        }
        let bounds = OctBounds::from_points(positions)?;
        let indices = (0..positions.len()).collect::<Vec<_>>();
        Some(Self::build_node(bounds, indices, positions, 0))
    }

    fn build_node(bounds: OctBounds, indices: Vec<usize>, positions: &[Vec3], depth: usize) -> Self {
        let mut center_of_mass = [0.0; 3];
        for &index in &indices {
            for axis in 0..3 {
                center_of_mass[axis] += positions[index][axis];
            }
        }

        let mass = indices.len() as f32;
        if mass > 0.0 {
            for c in &mut center_of_mass {
                *c /= mass;
            }
        }

        let mut node = Self {
            bounds,
            center_of_mass,
            mass,
            indices,
            children: std::array::from_fn(|_| None),
        };

        if depth >= OCTREE_MAX_DEPTH || node.indices.len() <= OCTREE_LEAF_CAPACITY {
            return node;
        }

        let mut buckets = std::array::from_fn::<_, 8, _>(|_| Vec::new());
        for &index in &node.indices {
            buckets[bounds.octant_for(positions[index])].push(index);
        }

        // Coincident points all land in one octant; splitting further would
        // never separate them.
        let non_empty = buckets.iter().filter(|bucket| !bucket.is_empty()).count();
        if non_empty <= 1 {
            return node;
        }

        for (octant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            node.children[octant] = Some(Box::new(Self::build_node(
                bounds.child(octant),
                bucket,
                positions,
                depth + 1,
            )));
        }
        node.indices.clear();
        node
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(|child| child.is_none())
    }
}
