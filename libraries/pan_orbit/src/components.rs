use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

// The internal state of the pan-orbit controller
#[derive(Debug, Clone, Component, Reflect)]
#[reflect(Component)]
#[require(PanOrbitMomentum)]
pub struct PanOrbitState {
    pub center: Vec3,
    pub radius: f32,
    pub upside_down: bool,
    pub pitch: f32,
    pub yaw: f32,
}

impl Default for PanOrbitState {
    fn default() -> Self {
        PanOrbitState {
            center: Vec3::ZERO,
            radius: 1.0,
            upside_down: false,
            pitch: 0.0,
            yaw: 0.0,
        }
    }
}

impl PanOrbitState {
    /// State that puts the camera at `eye`, looking at `target`.
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let radius = offset.length();
        let back = offset.try_normalize().unwrap_or(Vec3::Z);
        Self {
            center: target,
            radius: radius.max(f32::EPSILON),
            upside_down: false,
            pitch: -back.y.clamp(-1.0, 1.0).asin(),
            yaw: back.x.atan2(back.z),
        }
    }

    pub fn rotation(&self) -> Quat {
        // YXZ Euler Rotation performs yaw/pitch/roll.
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    pub fn transform(&self) -> Transform {
        let rotation = self.rotation();
        Transform::from_translation(self.center + rotation * Vec3::Z * self.radius)
            .with_rotation(rotation)
    }

    /// Turns the camera around the center, keeping both angles within +- 180 degrees.
    pub fn orbit(&mut self, delta: Vec2) {
        self.yaw = wrap_angle(self.yaw + delta.x);
        self.pitch = wrap_angle(self.pitch + delta.y);
    }

    /// Zooms exponentially, so equal inputs feel the same at every distance.
    pub fn zoom(&mut self, delta: f32) {
        self.radius *= (-delta).exp();
    }

    /// Moves the center along the camera's own right and up axes, scaled by the radius.
    pub fn pan(&mut self, delta: Vec2) {
        let rotation = self.rotation();
        let radius = self.radius;
        self.center += rotation * Vec3::X * delta.x * radius;
        self.center += rotation * Vec3::Y * delta.y * radius;
    }
}

fn wrap_angle(angle: f32) -> f32 {
    if angle > PI {
        angle - TAU
    } else if angle < -PI {
        angle + TAU
    } else {
        angle
    }
}

/// Input that has not been applied to the camera yet.
///
/// Each frame only a fraction of it is applied, and the rest decays, so the camera eases out
/// after the mouse stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Component, Reflect)]
#[reflect(Component)]
pub struct PanOrbitMomentum {
    pub orbit: Vec2,
    pub pan: Vec2,
    pub zoom: f32,
}

impl PanOrbitMomentum {
    /// Below this, leftover motion is dropped instead of being eased forever.
    const REST_THRESHOLD: f32 = 1e-5;

    pub fn is_at_rest(&self) -> bool {
        self.orbit.length_squared() < Self::REST_THRESHOLD * Self::REST_THRESHOLD
            && self.pan.length_squared() < Self::REST_THRESHOLD * Self::REST_THRESHOLD
            && self.zoom.abs() < Self::REST_THRESHOLD
    }

    /// Takes the `damping` share of every pending motion and leaves the rest for later frames.
    ///
    /// A damping of 1 applies everything at once.
    pub fn take(&mut self, damping: f32) -> PanOrbitMomentum {
        let damping = damping.clamp(0.0, 1.0);
        let step = PanOrbitMomentum {
            orbit: self.orbit * damping,
            pan: self.pan * damping,
            zoom: self.zoom * damping,
        };
        self.orbit -= step.orbit;
        self.pan -= step.pan;
        self.zoom -= step.zoom;
        if self.is_at_rest() {
            *self = Self::default();
        }
        step
    }
}

/// The configuration of the pan-orbit controller
#[derive(Debug, Clone, Component, Reflect)]
#[reflect(Component)]
#[require(PanOrbitState)]
pub struct PanOrbitSettings {
    /// World units per pixel of mouse motion
    pub pan_sensitivity: f32,
    /// Radians per pixel of mouse motion
    pub orbit_sensitivity: f32,
    /// Exponent per pixel of mouse motion
    pub zoom_sensitivity: f32,
    /// For devices with a notched scroll wheel, like desktop mice
    pub scroll_line_sensitivity: f32,
    /// For devices with smooth scrolling, like touchpads
    pub scroll_pixel_sensitivity: f32,
    /// Share of the pending motion applied each frame
    pub damping: f32,
}

impl Default for PanOrbitSettings {
    fn default() -> Self {
        PanOrbitSettings {
            pan_sensitivity: 0.001,                 // 1000 pixels per world unit
            orbit_sensitivity: 0.1f32.to_radians(), // 0.1 degree per pixel
            zoom_sensitivity: 0.01,
            scroll_line_sensitivity: 16.0, // 1 "line" == 16 "pixels of motion"
            scroll_pixel_sensitivity: 1.0,
            damping: 0.25,
        }
    }
}
