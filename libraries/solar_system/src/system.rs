use crate::body::{self, BodyKind, CelestialBody, EARTH_NAME, SPIN_SPEED};
use crate::orbit::OrbitPath;
use crate::scene::SystemManifest;
use bevy::log::warn_once;
use bevy::prelude::*;
use rand::Rng;

/// Radians per frame the Moon travels around Earth.
pub const MOON_ORBIT_SPEED: f32 = 0.02;

/// Every body of the scene, in descriptor order.
#[derive(Debug, Clone, Default)]
pub struct SolarSystem {
    bodies: Vec<CelestialBody>,
}

impl SolarSystem {
    pub fn new(bodies: Vec<CelestialBody>) -> Self {
        let mut system = Self { bodies };
        system.attach_moon_orbits();
        system
    }

    pub fn from_manifest(manifest: &SystemManifest, rng: &mut impl Rng) -> Self {
        let bodies = manifest
            .bodies()
            .map(|descriptor| {
                let [r, g, b] = descriptor.color;
                body::create_body(
                    descriptor.radius,
                    descriptor.texture.clone(),
                    manifest.scaled_distance(descriptor),
                    descriptor.name.clone(),
                    &mut *rng,
                )
                .with_color(Color::srgb(r, g, b))
            })
            .collect();
        Self::new(bodies)
    }

    /// Gives each moon its dedicated orbit path and puts it next to Earth right away, so the
    /// first frame already shows it in place.
    fn attach_moon_orbits(&mut self) {
        let earth = self.position_of(EARTH_NAME);
        for moon in self.bodies.iter_mut().filter(|b| b.kind == BodyKind::Moon) {
            moon.orbit = Some(OrbitPath::new(moon.orbital_distance));
            if let Some(earth) = earth {
                moon.revolve_around(earth, 0.0);
            }
        }
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn get(&self, name: &str) -> Option<&CelestialBody> {
        self.bodies.iter().find(|b| b.name == name)
    }

    pub fn position_of(&self, name: &str) -> Option<Vec3> {
        self.get(name).map(|b| b.position)
    }

    pub fn orbit_paths(&self) -> impl Iterator<Item = &OrbitPath> {
        self.bodies.iter().filter_map(|b| b.orbit.as_ref())
    }

    /// Bodies that can be clicked: everything except the star.
    pub fn pick_candidates(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter().filter(|b| b.is_pickable())
    }

    /// Advances one frame: the Moon moves around Earth and every planet turns in place.
    ///
    /// Planets keep the orbital angle they were created with.
    pub fn update_positions(&mut self) {
        match self.position_of(EARTH_NAME) {
            Some(earth) => {
                for moon in self.bodies.iter_mut().filter(|b| b.kind == BodyKind::Moon) {
                    moon.revolve_around(earth, MOON_ORBIT_SPEED);
                }
            }
            None => warn_once!("No body named {EARTH_NAME}; the Moon stays where it is"),
        }
        for planet in self.bodies.iter_mut().filter(|b| b.kind == BodyKind::Planet) {
            planet.spin(SPIN_SPEED);
        }
    }
}
