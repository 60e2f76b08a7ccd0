//! Perspective camera, orbit controls and ray picking.

use crate::geometry::Ray;
use crate::graph::{NodeContent, NodeRole, SceneGraph};
use crate::registry::NodeRegistry;
use floorplan_core::ElementId;
use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            position: Vec3::splat(500.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: 45.0,
            aspect: 1.0,
            near: 1.0,
            far: 10_000.0,
        }
    }
}

impl PerspectiveCamera {
    pub fn new(aspect: f32) -> Self {
        Self {
            aspect,
            ..Self::default()
        }
    }

    /// Update the aspect ratio after a resize. Degenerate sizes are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// World-space ray through a point in normalized device coordinates.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_projection().inverse();
        let unproject = |z: f32| {
            let p = inv * ndc.extend(z).extend(1.0);
            p.xyz() / p.w
        };
        let near = unproject(0.0);
        let far = unproject(1.0);
        Ray::new(self.position, (far - near).normalize_or_zero())
    }
}

/// Screen position (origin top-left, y down) to normalized device
/// coordinates in `[-1, 1]`, y up.
pub fn ndc_from_screen(screen: Vec2, size: Vec2) -> Vec2 {
    Vec2::new(
        screen.x / size.x * 2.0 - 1.0,
        -(screen.y / size.y) * 2.0 + 1.0,
    )
}

/// Camera orbit around a target with exponential damping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitControls {
    pub enabled: bool,
    pub damping: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    azimuth_delta: f32,
    polar_delta: f32,
    dolly_scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enabled: true,
            damping: 0.05,
            min_distance: 1.0,
            max_distance: 10_000.0,
            azimuth_delta: 0.0,
            polar_delta: 0.0,
            dolly_scale: 1.0,
        }
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an orbit by the given angles in radians.
    pub fn rotate(&mut self, azimuth: f32, polar: f32) {
        if self.enabled {
            self.azimuth_delta += azimuth;
            self.polar_delta += polar;
        }
    }

    /// Queue a zoom. Factors above 1 move the camera away from the target.
    pub fn dolly(&mut self, factor: f32) {
        if self.enabled && factor > 0.0 {
            self.dolly_scale *= factor;
        }
    }

    /// Whether queued motion is still being applied.
    pub fn is_settling(&self) -> bool {
        self.azimuth_delta.abs() > 1e-6 || self.polar_delta.abs() > 1e-6
    }

    /// Advance one frame. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        if !self.is_settling() && self.dolly_scale == 1.0 {
            return false;
        }
        let offset = camera.position - camera.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return false;
        }
        let mut azimuth = offset.x.atan2(offset.z);
        let mut polar = (offset.y / radius).clamp(-1.0, 1.0).acos();

        azimuth += self.azimuth_delta * self.damping;
        polar = (polar + self.polar_delta * self.damping)
            .clamp(1e-3, std::f32::consts::PI - 1e-3);
        let radius = (radius * self.dolly_scale).clamp(self.min_distance, self.max_distance);

        let (sp, cp) = polar.sin_cos();
        let (sa, ca) = azimuth.sin_cos();
        let next = camera.target + Vec3::new(radius * sp * sa, radius * cp, radius * sp * ca);
        let moved = next.distance_squared(camera.position) > 1e-8;
        camera.position = next;

        self.azimuth_delta *= 1.0 - self.damping;
        self.polar_delta *= 1.0 - self.damping;
        self.dolly_scale = 1.0;
        moved
    }
}

/// Element whose node is nearest along `ray`.
///
/// Helper nodes (ground grid) and hidden nodes are skipped. Only the nearest
/// mesh is considered; it resolves to its closest registered ancestor, or to
/// nothing when it has none.
pub fn pick(graph: &SceneGraph, registry: &NodeRegistry, ray: &Ray) -> Option<ElementId> {
    let (_, nearest) = graph
        .meshes()
        .filter(|(id, node)| node.role != NodeRole::Helper && graph.is_effectively_visible(*id))
        .filter_map(|(id, node)| {
            let NodeContent::Mesh { primitive, .. } = &node.content else {
                return None;
            };
            let world = graph.world_matrix(id)?;
            if world.determinant().abs() <= f32::EPSILON {
                return None;
            }
            let local = ray.transformed(&world.inverse());
            primitive.intersect_local(&local).map(|t| (t, id))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))?;

    graph
        .ancestors(nearest)
        .into_iter()
        .find_map(|n| registry.element_of(n))
}
