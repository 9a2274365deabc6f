//! Frame loop decoupled from any particular host.
//!
//! The windowed app lets Bevy's runner drive [`Simulation::step`]; headless runs use [`run`]
//! with a [`FrameSource`] such as [`FixedFrames`].

use crate::camera::CameraView;
use crate::simulation::Simulation;
use std::time::Duration;

/// Hands out frames until the host goes away.
pub trait FrameSource {
    /// Time since the previous frame, or `None` once no more frames will come.
    fn next_frame(&mut self) -> Option<Duration>;
}

/// A fixed number of evenly spaced frames.
#[derive(Debug, Clone)]
pub struct FixedFrames {
    remaining: u64,
    dt: Duration,
}

impl FixedFrames {
    pub fn new(frames: u64, dt: Duration) -> Self {
        Self {
            remaining: frames,
            dt,
        }
    }

    pub fn at_60hz(frames: u64) -> Self {
        Self::new(frames, Duration::from_secs_f64(1.0 / 60.0))
    }
}

impl FrameSource for FixedFrames {
    fn next_frame(&mut self) -> Option<Duration> {
        self.remaining = self.remaining.checked_sub(1)?;
        Some(self.dt)
    }
}

/// Steps `simulation` once per frame from `source`, calling `render` after every step.
///
/// Returns the number of frames run.
pub fn run(
    simulation: &mut Simulation,
    camera: &CameraView,
    source: &mut impl FrameSource,
    mut render: impl FnMut(&Simulation, Duration),
) -> u64 {
    let mut frames = 0;
    while let Some(dt) = source.next_frame() {
        simulation.step(Some(camera));
        render(simulation, dt);
        frames += 1;
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{EARTH_NAME, MOON_NAME};
    use crate::camera::Viewport;
    use crate::scene::SystemManifest;
    use crate::simulation::ControlEvent;
    use approx::assert_abs_diff_eq;
    use bevy::math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f32::consts;

    fn camera() -> CameraView {
        CameraView::looking_at(
            Vec3::new(0.0, 0.0, 50.0),
            Vec3::ZERO,
            75f32.to_radians(),
            Viewport::default(),
            0.1,
            1000.0,
        )
    }

    #[test]
    fn fixed_frames_run_out() {
        let mut source = FixedFrames::at_60hz(3);
        assert!(source.next_frame().is_some());
        assert!(source.next_frame().is_some());
        assert!(source.next_frame().is_some());
        assert!(source.next_frame().is_none());
        assert!(source.next_frame().is_none());
    }

    #[test]
    fn fifty_frames_move_moon_by_one_radian() {
        let mut rng = StdRng::seed_from_u64(5);
        let manifest = SystemManifest::builtin();
        let mut sim = Simulation::from_manifest(&manifest, Viewport::default(), &mut rng);
        let initial = sim.system().clone();
        let initial_moon = initial.get(MOON_NAME).unwrap().orbital_angle;

        let mut rendered = 0;
        let frames = run(&mut sim, &camera(), &mut FixedFrames::at_60hz(50), |_, _| {
            rendered += 1
        });
        assert_eq!(frames, 50);
        assert_eq!(rendered, 50);
        assert_eq!(sim.frame(), 50);

        let moon = sim.system().get(MOON_NAME).unwrap();
        assert_abs_diff_eq!(
            moon.orbital_angle,
            (initial_moon - 1.0).rem_euclid(consts::TAU),
            epsilon = 1e-4
        );
        let earth = sim.system().position_of(EARTH_NAME).unwrap();
        assert_abs_diff_eq!(moon.position.distance(earth), 5.0, epsilon = 1e-4);

        for (before, after) in initial.bodies().iter().zip(sim.system().bodies()) {
            if after.name == MOON_NAME {
                continue;
            }
            assert_eq!(after.position, before.position);
            assert_abs_diff_eq!(
                after.position.length(),
                after.orbital_distance,
                epsilon = 1e-3
            );
        }
        assert_eq!(manifest.bodies().count(), sim.system().bodies().len());
    }

    /// Host that hands out frames until it is torn down.
    struct Host {
        open_for: u32,
    }

    impl FrameSource for Host {
        fn next_frame(&mut self) -> Option<Duration> {
            self.open_for = self.open_for.checked_sub(1)?;
            Some(Duration::from_millis(16))
        }
    }

    #[test]
    fn loop_stops_when_host_goes_away() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut sim =
            Simulation::from_manifest(&SystemManifest::builtin(), Viewport::default(), &mut rng);
        sim.push(ControlEvent::DismissDetails);
        let frames = run(&mut sim, &camera(), &mut Host { open_for: 2 }, |_, dt| {
            assert_eq!(dt, Duration::from_millis(16))
        });
        assert_eq!(frames, 2);
        assert_eq!(sim.pending_events(), 0);
    }
}
