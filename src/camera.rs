//! Perspective camera with orbit controls, and pick rays
//!
//! The camera orbits a target point in spherical coordinates. Hosts drive it
//! from their input handling through [`crate::Host::update_controls`]; the
//! selection pass uses it to cast rays through the pointer.

use crate::settings::CameraSettings;

/// 3D camera for orbit-style navigation
#[derive(Debug, Clone, PartialEq)]
pub struct Camera3D {
    /// Camera position in world space
    pub position: [f32; 3],
    /// Point the camera looks at
    pub target: [f32; 3],
    pub up: [f32; 3],

    /// Vertical field of view in radians
    pub fov: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    /// Distance from target
    pub distance: f32,
    /// Azimuth in radians
    pub theta: f32,
    /// Polar angle from +Y in radians
    pub phi: f32,
}

const MIN_PHI: f32 = 0.01;
const MIN_DISTANCE: f32 = 0.05;

impl Camera3D {
    /// Camera at `start_pos` looking at `center`
    pub fn from_settings(settings: &CameraSettings, aspect: f32) -> Self {
        let offset = sub(settings.start_pos, settings.center);
        let distance = length(offset).max(MIN_DISTANCE);
        let theta = offset[0].atan2(offset[2]);
        let phi = (offset[1] / distance).clamp(-1.0, 1.0).acos();

        let mut cam = Self {
            position: settings.start_pos,
            target: settings.center,
            up: [0.0, 1.0, 0.0],
            fov: settings.fov.to_radians(),
            aspect,
            near: settings.near,
            far: settings.far,
            distance,
            theta,
            phi: phi.clamp(MIN_PHI, std::f32::consts::PI - MIN_PHI),
        };
        cam.update_position();
        cam
    }

    /// Update aspect ratio on resize
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    /// Orbit horizontally (azimuth)
    pub fn orbit_horizontal(&mut self, delta: f32) {
        self.theta += delta;
        self.update_position();
    }

    /// Orbit vertically, clamped short of the poles
    pub fn orbit_vertical(&mut self, delta: f32) {
        self.phi = (self.phi + delta).clamp(MIN_PHI, std::f32::consts::PI - MIN_PHI);
        self.update_position();
    }

    /// Scale the distance to the target
    pub fn zoom(&mut self, factor: f32) {
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, self.far);
        self.update_position();
    }

    /// Move the target (and camera with it) in the view plane
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let (_, right, up) = self.basis();
        let scale = self.distance * 0.002;
        for axis in 0..3 {
            self.target[axis] += right[axis] * dx * scale + up[axis] * dy * scale;
        }
        self.update_position();
    }

    fn update_position(&mut self) {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();

        self.position[0] = self.target[0] + self.distance * sin_phi * sin_theta;
        self.position[1] = self.target[1] + self.distance * cos_phi;
        self.position[2] = self.target[2] + self.distance * sin_phi * cos_theta;
    }

    /// Forward, right and up unit vectors
    fn basis(&self) -> ([f32; 3], [f32; 3], [f32; 3]) {
        let forward = normalize(sub(self.target, self.position));
        let right = normalize(cross(forward, self.up));
        let up = cross(right, forward);
        (forward, right, up)
    }

    /// Ray from the camera through a point in normalized device coordinates
    pub fn ray_through(&self, ndc: [f32; 2]) -> Ray {
        let (forward, right, up) = self.basis();
        let half_height = (self.fov / 2.0).tan();
        let half_width = half_height * self.aspect;

        let direction = normalize([
            forward[0] + right[0] * ndc[0] * half_width + up[0] * ndc[1] * half_height,
            forward[1] + right[1] * ndc[0] * half_width + up[1] * ndc[1] * half_height,
            forward[2] + right[2] * ndc[0] * half_width + up[2] * ndc[1] * half_height,
        ]);

        Ray {
            origin: self.position,
            direction,
        }
    }

    /// View matrix (4x4 column-major)
    pub fn view_matrix(&self) -> [f32; 16] {
        look_at(self.position, self.target, self.up)
    }

    /// Projection matrix (4x4 column-major)
    pub fn projection_matrix(&self) -> [f32; 16] {
        perspective(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> [f32; 16] {
        mat4_multiply(self.projection_matrix(), self.view_matrix())
    }
}

/// Half-line with a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: [f32; 3],
    pub direction: [f32; 3],
}

impl Ray {
    /// Distance along the ray to the point closest to `point` (never negative)
    pub fn closest_param(&self, point: [f32; 3]) -> f32 {
        dot(sub(point, self.origin), self.direction).max(0.0)
    }

    pub fn at(&self, t: f32) -> [f32; 3] {
        [
            self.origin[0] + self.direction[0] * t,
            self.origin[1] + self.direction[1] * t,
            self.origin[2] + self.direction[2] * t,
        ]
    }

    /// Squared distance from `point` to the ray
    pub fn distance_sq_to_point(&self, point: [f32; 3]) -> f32 {
        let closest = self.at(self.closest_param(point));
        let d = sub(point, closest);
        dot(d, d)
    }
}

// Math helper functions

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn length(v: [f32; 3]) -> f32 {
    dot(v, v).sqrt()
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = length(v);
    if len > 0.0 {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        v
    }
}

/// Look-at view matrix (column-major)
fn look_at(eye: [f32; 3], target: [f32; 3], up: [f32; 3]) -> [f32; 16] {
    let f = normalize(sub(target, eye));
    let s = normalize(cross(f, up));
    let u = cross(s, f);

    [
        s[0],
        u[0],
        -f[0],
        0.0,
        s[1],
        u[1],
        -f[1],
        0.0,
        s[2],
        u[2],
        -f[2],
        0.0,
        -dot(s, eye),
        -dot(u, eye),
        dot(f, eye),
        1.0,
    ]
}

/// Perspective projection matrix (column-major)
fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> [f32; 16] {
    let f = 1.0 / (fov / 2.0).tan();
    let nf = 1.0 / (near - far);

    [
        f / aspect,
        0.0,
        0.0,
        0.0,
        0.0,
        f,
        0.0,
        0.0,
        0.0,
        0.0,
        (far + near) * nf,
        -1.0,
        0.0,
        0.0,
        2.0 * far * near * nf,
        0.0,
    ]
}

fn mat4_multiply(a: [f32; 16], b: [f32; 16]) -> [f32; 16] {
    let mut result = [0.0f32; 16];
    for col in 0..4 {
        for row in 0..4 {
            result[col * 4 + row] = (0..4).map(|k| a[k * 4 + row] * b[col * 4 + k]).sum();
        }
    }
    result
}
