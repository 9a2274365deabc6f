use crate::body::CelestialBody;
use crate::camera::{CameraView, Viewport};
use bevy::prelude::*;

/// Vertical pixel offset applied to overlay labels, so they sit above their body.
pub const LABEL_OFFSET_Y: f32 = -30.0;
/// Height above a body's center at which its billboard label hangs.
pub const BILLBOARD_LIFT: f32 = 0.7;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Reflect)]
pub enum LabelStyle {
    /// Flat text drawn over the scene, a fixed number of pixels above the body.
    #[default]
    Overlay,
    /// Flat text centered on the projection of a world-space anchor just above the body.
    ///
    /// Drawn at a fixed size, so it does not shrink with distance.
    Billboard,
}

impl LabelStyle {
    fn anchor(self, body: &CelestialBody) -> Vec3 {
        match self {
            Self::Overlay => body.position,
            Self::Billboard => body.position + Vec3::Y * BILLBOARD_LIFT,
        }
    }

    fn pixel_offset(self) -> Vec2 {
        match self {
            Self::Overlay => Vec2::new(0.0, LABEL_OFFSET_Y),
            Self::Billboard => Vec2::ZERO,
        }
    }
}

/// Where a body's name should be drawn this frame; `screen` is the label's center in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub name: String,
    pub screen: Option<Vec2>,
}

/// Maps normalized device coordinates to pixels with the origin at the top-left corner.
pub fn ndc_to_pixels(ndc: Vec2, viewport: Viewport) -> Vec2 {
    Vec2::new(
        (ndc.x * 0.5 + 0.5) * viewport.width,
        (-(ndc.y * 0.5) + 0.5) * viewport.height,
    )
}

pub fn world_to_pixels(world: Vec3, camera: &CameraView, viewport: Viewport) -> Option<Vec2> {
    let ndc = camera.world_to_ndc(world)?;
    Some(ndc_to_pixels(ndc.truncate(), viewport))
}

/// Recomputes the label of every body into `labels`, reusing its allocation.
pub fn project_labels(
    style: LabelStyle,
    bodies: &[CelestialBody],
    camera: &CameraView,
    viewport: Viewport,
    labels: &mut Vec<Label>,
) {
    labels.truncate(bodies.len());
    for (i, body) in bodies.iter().enumerate() {
        let screen = world_to_pixels(style.anchor(body), camera, viewport)
            .map(|pixels| pixels + style.pixel_offset());
        match labels.get_mut(i) {
            Some(label) => {
                if label.name != body.name {
                    label.name.clone_from(&body.name);
                }
                label.screen = screen;
            }
            None => labels.push(Label {
                name: body.name.clone(),
                screen,
            }),
        }
    }
}
