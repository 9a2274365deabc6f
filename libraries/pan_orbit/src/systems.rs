use bevy::prelude::*;

use crate::components::{PanOrbitMomentum, PanOrbitSettings, PanOrbitState};
use crate::events::{FocusOn, RecenterCamera};
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use std::f32::consts::FRAC_PI_2;

#[derive(Default)]
pub(crate) struct BlockedInputs {
    pointer: bool,
    keyboard: bool,
}

pub(crate) fn get_blocked_inputs(
    mut egui: bevy_egui::EguiContexts,
    q_window_entities: Query<Entity, With<Window>>,
) -> BlockedInputs {
    let mut ret = BlockedInputs::default();
    for window_entity in &q_window_entities {
        if let Some(ctx) = egui.try_ctx_for_entity_mut(window_entity) {
            ret.pointer |= ctx.wants_pointer_input();
            ret.keyboard |= ctx.wants_keyboard_input();
        }
    }
    ret
}

pub(crate) fn pan_orbit_camera(
    In(blocked_inputs): In<BlockedInputs>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut evr_motion: EventReader<MouseMotion>,
    mut evr_scroll: EventReader<MouseWheel>,
    mut q_camera: Query<(
        &PanOrbitSettings,
        &mut PanOrbitState,
        &mut PanOrbitMomentum,
        &mut Transform,
    )>,
) {
    // Pending events are drained either way, so motion over the UI is not replayed later.
    let mut total_motion: Vec2 = evr_motion.read().map(|ev| ev.delta).sum();

    // Reverse Y (Bevy's Worldspace coordinate system is Y-Up,
    // but events are in window/ui coordinates, which are Y-Down)
    total_motion.y = -total_motion.y;

    let mut total_scroll_lines = Vec2::ZERO;
    let mut total_scroll_pixels = Vec2::ZERO;
    for ev in evr_scroll.read() {
        match ev.unit {
            MouseScrollUnit::Line => {
                total_scroll_lines.x += ev.x;
                total_scroll_lines.y -= ev.y;
            }
            MouseScrollUnit::Pixel => {
                total_scroll_pixels.x += ev.x;
                total_scroll_pixels.y -= ev.y;
            }
        }
    }
    if blocked_inputs.pointer {
        total_motion = Vec2::ZERO;
        total_scroll_lines = Vec2::ZERO;
        total_scroll_pixels = Vec2::ZERO;
    }

    for (settings, mut state, mut momentum, mut transform) in &mut q_camera {
        let dragging = mouse_buttons.pressed(MouseButton::Left) && !blocked_inputs.pointer;
        let shift = !blocked_inputs.keyboard
            && (keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight));

        if dragging && shift {
            momentum.pan -= total_motion * settings.pan_sensitivity;
        } else if dragging {
            // Upon starting a new orbit maneuver, check if we are starting it upside-down
            if mouse_buttons.just_pressed(MouseButton::Left) {
                state.upside_down = state.pitch < -FRAC_PI_2 || state.pitch > FRAC_PI_2;
            }
            let mut orbit = -total_motion * settings.orbit_sensitivity;
            // If we are upside down, reverse the X orbiting
            if state.upside_down {
                orbit.x = -orbit.x;
            }
            momentum.orbit += orbit;
        }

        momentum.zoom -= total_scroll_lines.y
            * settings.scroll_line_sensitivity
            * settings.zoom_sensitivity
            + total_scroll_pixels.y * settings.scroll_pixel_sensitivity * settings.zoom_sensitivity;

        let moving = !momentum.is_at_rest();
        if moving {
            let step = momentum.take(settings.damping);
            state.zoom(step.zoom);
            state.orbit(step.orbit);
            state.pan(step.pan);
        }

        // Also runs when the controller was just added, or an observer moved the center.
        if moving || state.is_changed() {
            *transform = state.transform();
        }
    }
}

pub(crate) fn recenter_camera(_: Trigger<RecenterCamera>, mut q_state: Query<&mut PanOrbitState>) {
    for mut state in &mut q_state {
        debug!("Recentering camera");
        state.center = Vec3::ZERO;
    }
}

pub(crate) fn focus_camera(trigger: Trigger<FocusOn>, mut q_state: Query<&mut PanOrbitState>) {
    let FocusOn(target) = *trigger.event();
    for mut state in &mut q_state {
        debug!("Focusing camera on {target}");
        state.center = target;
    }
}
