use bevy::prelude::*;
use pan_orbit::events::{FocusOn, RecenterCamera};
use solar_system::{Simulation, SimulationSet};

pub(super) struct PlanetsPlugin;

impl Plugin for PlanetsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Focus>()
            .init_resource::<Focus>()
            .add_systems(
                Update,
                follow_focus
                    .after(SimulationSet::Step)
                    .run_if(resource_exists::<Simulation>),
            );
    }
}

/// Body the camera orbits around, as an index into the simulation's bodies.
#[derive(Debug, Default, Resource, Reflect)]
#[reflect(Resource)]
pub(super) struct Focus {
    body: Option<usize>,
}

impl Focus {
    pub(super) fn body(&self) -> Option<usize> {
        self.body
    }

    pub(super) fn set(&mut self, body: usize) {
        self.body = Some(body);
    }

    pub(super) fn clear(&mut self) {
        self.body = None;
    }
}

/// Keeps the orbit center on the focused body, which matters for the Moon.
fn follow_focus(
    mut commands: Commands,
    focus: Res<Focus>,
    simulation: Res<Simulation>,
    mut last: Local<Option<Vec3>>,
) {
    let target = focus
        .body()
        .and_then(|index| simulation.system().bodies().get(index))
        .map(|body| body.position);
    if focus.is_changed() && !focus.is_added() && target.is_none() {
        commands.trigger(RecenterCamera);
    }
    if let Some(target) = target {
        if focus.is_changed() || *last != Some(target) {
            commands.trigger(FocusOn(target));
        }
    }
    *last = target;
}
