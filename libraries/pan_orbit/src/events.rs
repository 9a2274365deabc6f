use bevy::prelude::*;

/// Moves the orbit center back to the origin.
#[derive(Debug, Clone, Copy, Event)]
pub struct RecenterCamera;

/// Moves the orbit center onto a point, keeping the current distance and angles.
#[derive(Debug, Clone, Copy, Event)]
pub struct FocusOn(pub Vec3);
