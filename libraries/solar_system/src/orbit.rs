use crate::simulation::Simulation;
use bevy::prelude::*;
use std::f32::consts;

/// Number of straight segments used to approximate a circular orbit.
pub const ORBIT_SEGMENTS: usize = 128;

const ORBIT_COLOR: Color = Color::WHITE;

pub struct OrbitPlugin {
    pub draw_orbits: bool,
}

impl Default for OrbitPlugin {
    fn default() -> Self {
        Self { draw_orbits: true }
    }
}

impl Plugin for OrbitPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(DrawOrbits(self.draw_orbits)).add_systems(
            PostUpdate,
            draw_orbits
                .after(TransformSystem::TransformPropagate)
                .run_if(resource_exists::<Simulation>.and(should_draw_orbits)),
        );
    }
}

#[derive(Resource, Deref, DerefMut)]
pub struct DrawOrbits(pub bool);

/// Point at `angle` radians on a circle of `radius` lying in the XZ plane.
#[inline]
pub fn point_on_circle(radius: f32, angle: f32) -> Vec3 {
    Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
}

/// Samples a closed circle of `radius` around the origin in the XZ plane.
///
/// The returned polyline has `ORBIT_SEGMENTS + 1` points; the last point is the first one
/// repeated so the line closes without a gap.
pub fn generate_orbit_path(radius: f32) -> Vec<Vec3> {
    let step = consts::TAU / ORBIT_SEGMENTS as f32;
    (0..=ORBIT_SEGMENTS)
        .map(|i| point_on_circle(radius, (i % ORBIT_SEGMENTS) as f32 * step))
        .collect()
}

/// Guide line drawn along a body's orbit.
///
/// Points are stored relative to `center`; only the center moves after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitPath {
    radius: f32,
    center: Vec3,
    points: Vec<Vec3>,
}

impl OrbitPath {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            center: Vec3::ZERO,
            points: generate_orbit_path(radius),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn recenter(&mut self, center: Vec3) {
        self.center = center;
    }

    pub fn world_points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.points.iter().map(move |p| *p + self.center)
    }
}

fn should_draw_orbits(draw_orbits: Res<DrawOrbits>) -> bool {
    **draw_orbits
}

fn draw_orbits(mut gizmos: Gizmos, simulation: Res<Simulation>) {
    for path in simulation.system().orbit_paths() {
        gizmos.linestrip(path.world_points(), ORBIT_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn orbit_path_has_closing_point() {
        let points = generate_orbit_path(20.0);
        assert_eq!(points.len(), ORBIT_SEGMENTS + 1);
        assert_eq!(points.first(), points.last());
    }

    #[test]
    fn orbit_path_points_lie_on_circle() {
        for radius in [0.5, 7.8, 20.0, 601.0] {
            for point in generate_orbit_path(radius) {
                assert_abs_diff_eq!(point.length(), radius, epsilon = radius * 1e-5);
                assert_eq!(point.y, 0.0);
            }
        }
    }

    #[test]
    fn orbit_path_steps_are_even() {
        let points = generate_orbit_path(10.0);
        let expected = 2.0 * 10.0 * (consts::PI / ORBIT_SEGMENTS as f32).sin();
        for pair in points.windows(2) {
            assert_abs_diff_eq!(pair[0].distance(pair[1]), expected, epsilon = 1e-4);
        }
    }

    #[test]
    fn recentering_translates_without_rotating() {
        let mut path = OrbitPath::new(5.0);
        let center = Vec3::new(20.0, 0.0, -3.0);
        path.recenter(center);
        for (local, world) in path.points().iter().zip(path.world_points()) {
            assert_abs_diff_eq!((world - center).distance(*local), 0.0, epsilon = 1e-4);
        }
        assert_eq!(path.radius(), 5.0);
    }
}
