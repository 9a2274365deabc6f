use bevy::prelude::*;

pub mod components;
pub mod events;
mod systems;

/// Runs the camera controller; order systems that read the camera transform after this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SystemSet)]
pub struct PanOrbitSet;

#[derive(Default)]
pub struct PanOrbitCameraPlugin;

impl Plugin for PanOrbitCameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<components::PanOrbitState>()
            .register_type::<components::PanOrbitMomentum>()
            .register_type::<components::PanOrbitSettings>()
            .add_systems(
                Update,
                systems::get_blocked_inputs
                    .pipe(systems::pan_orbit_camera)
                    .in_set(PanOrbitSet)
                    .run_if(
                        any_with_component::<components::PanOrbitState>
                            .and(resource_exists::<bevy_egui::EguiUserTextures>),
                    ),
            )
            .add_observer(systems::recenter_camera)
            .add_observer(systems::focus_camera);
    }
}
