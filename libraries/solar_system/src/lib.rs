use bevy::app::PluginGroupBuilder;
use bevy::prelude::*;

pub mod body;
pub mod camera;
pub mod details;
pub mod orbit;
pub mod picking;
pub mod scene;
pub mod scheduler;
pub mod screen_space;
pub mod simulation;
pub mod sun;
pub mod system;

pub use simulation::{ControlEvent, Simulation, SimulationSet};

/// Bodies, orbits, lighting and the per-frame simulation step.
///
/// Nothing is spawned until a [`Simulation`] resource has been inserted.
pub struct SolarSystemPlugin {
    pub draw_orbits: bool,
}

impl Default for SolarSystemPlugin {
    fn default() -> Self {
        Self { draw_orbits: true }
    }
}

impl PluginGroup for SolarSystemPlugin {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(body::BodyPlugin)
            .add(orbit::OrbitPlugin {
                draw_orbits: self.draw_orbits,
            })
            .add(sun::SunPlugin)
            .add(simulation::SimulationPlugin)
    }
}
