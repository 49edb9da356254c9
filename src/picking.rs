//! Ray picking against the point cloud

use crate::camera::Ray;

/// A point within the pick threshold of a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Node index
    pub index: usize,
    /// Distance from the ray origin to the point's projection on the ray
    pub distance: f32,
    /// Perpendicular distance from the point to the ray
    pub distance_to_ray: f32,
}

/// Point raycaster with a world-space threshold.
///
/// Hits are kept only when their distance along the ray falls in
/// `near..=far`, the same clip range the camera renders.
#[derive(Debug, Clone, Copy)]
pub struct Raycaster {
    threshold: f32,
    near: f32,
    far: f32,
}

impl Raycaster {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            near: 0.0,
            far: f32::INFINITY,
        }
    }

    /// Restrict hits to the `near..=far` range along the ray
    pub fn with_clip(self, near: f32, far: f32) -> Self {
        Self { near, far, ..self }
    }

    /// All points closer than the threshold to `ray`, nearest first.
    ///
    /// `positions` is a flat xyz buffer; the hit index is the triple's index.
    pub fn intersect_points(&self, ray: &Ray, positions: &[f32]) -> Vec<Hit> {
        let threshold_sq = self.threshold * self.threshold;

        let mut hits: Vec<Hit> = positions
            .chunks_exact(3)
            .enumerate()
            .filter_map(|(index, p)| {
                let point = [p[0], p[1], p[2]];
                let distance_sq = ray.distance_sq_to_point(point);
                if distance_sq >= threshold_sq {
                    return None;
                }
                let distance = ray.closest_param(point);
                (self.near..=self.far).contains(&distance).then(|| Hit {
                    index,
                    distance,
                    distance_to_ray: distance_sq.sqrt(),
                })
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
