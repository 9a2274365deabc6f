use bevy::prelude::*;

/// Size of the drawing surface in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq, Reflect)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Snapshot of a perspective camera: where it sits and how it maps world space to clip space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraView {
    pub position: Vec3,
    pub clip_from_world: Mat4,
}

impl CameraView {
    pub fn new(world_from_view: Mat4, clip_from_view: Mat4) -> Self {
        Self {
            position: world_from_view.w_axis.truncate(),
            clip_from_world: clip_from_view * world_from_view.inverse(),
        }
    }

    /// Camera at `eye` looking at `target` with Y up, like the one the scene starts with.
    pub fn looking_at(
        eye: Vec3,
        target: Vec3,
        fov_y: f32,
        viewport: Viewport,
        near: f32,
        far: f32,
    ) -> Self {
        let view_from_world = Mat4::look_at_rh(eye, target, Vec3::Y);
        let clip_from_view = Mat4::perspective_rh(fov_y, viewport.aspect_ratio(), near, far);
        Self::new(view_from_world.inverse(), clip_from_view)
    }

    pub fn from_camera(camera: &Camera, transform: &Transform) -> Self {
        Self::new(transform.compute_matrix(), camera.clip_from_view())
    }

    /// Like [`CameraView::from_camera`], but `None` until the camera is active and its
    /// projection has been computed for a render target.
    ///
    /// A freshly spawned camera still holds an identity projection during its first `Update`.
    pub fn from_active_camera(camera: &Camera, transform: &Transform) -> Option<Self> {
        if !camera.is_active || camera.logical_viewport_size().is_none() {
            return None;
        }
        Some(Self::from_camera(camera, transform))
    }

    /// Projects a world point to normalized device coordinates, or `None` when it lies behind
    /// the camera.
    pub fn world_to_ndc(&self, world: Vec3) -> Option<Vec3> {
        let clip = self.clip_from_world * world.extend(1.0);
        (clip.w > f32::EPSILON).then(|| clip.truncate() / clip.w)
    }

    /// Ray from the camera through a point given in normalized device coordinates.
    pub fn ray_through_ndc(&self, ndc: Vec2) -> Option<Ray3d> {
        // Depth 0.5 is in front of the camera for both forward and reversed depth ranges.
        let through = self.clip_from_world.inverse().project_point3(ndc.extend(0.5));
        let direction = Dir3::new(through - self.position).ok()?;
        Some(Ray3d {
            origin: self.position,
            direction,
        })
    }
}
