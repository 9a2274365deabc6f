use crate::details::DetailEntry;
use crate::scene::error::SceneLoadError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

fn default_scale() -> f32 {
    20.0
}

fn default_color() -> [f32; 3] {
    [0.5, 0.5, 0.5]
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BodyDescriptor {
    pub name: String,
    pub radius: f32,
    /// Orbital radius in AU, before scaling. Zero for the Sun; relative to Earth for the Moon.
    #[serde(default)]
    pub distance: f32,
    pub texture: String,
    /// Shown until the texture has loaded, or for good if it fails to.
    #[serde(default = "default_color")]
    pub color: [f32; 3],
}

impl BodyDescriptor {
    fn new(name: &str, radius: f32, distance: f32, texture: &str, color: [f32; 3]) -> Self {
        Self {
            name: name.to_string(),
            radius,
            distance,
            texture: texture.to_string(),
            color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CameraConfig {
    pub translation: [f32; 3],
    #[serde(default)]
    pub target: [f32; 3],
    /// Vertical field of view, in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            translation: [0.0, 0.0, 50.0],
            target: [0.0; 3],
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SystemManifest {
    /// World units per AU.
    #[serde(default = "default_scale")]
    pub scale: f32,
    pub sun: BodyDescriptor,
    pub planets: Vec<BodyDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moon: Option<BodyDescriptor>,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub details: HashMap<String, DetailEntry>,
}

impl Default for SystemManifest {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SystemManifest {
    pub fn builtin() -> Self {
        Self {
            scale: default_scale(),
            sun: BodyDescriptor::new("Sun", 1.5, 0.0, "textures/sun.jpg", [1.0, 0.8, 0.3]),
            planets: vec![
                BodyDescriptor::new("Mercury", 0.3, 0.39, "textures/mercury.jpg", [0.6, 0.55, 0.5]),
                BodyDescriptor::new("Venus", 0.5, 0.72, "textures/venus.jpg", [0.9, 0.75, 0.4]),
                BodyDescriptor::new("Earth", 0.5, 1.00, "textures/earth.jpg", [0.2, 0.4, 0.8]),
                BodyDescriptor::new("Mars", 0.4, 1.52, "textures/mars.jpg", [0.8, 0.3, 0.15]),
                BodyDescriptor::new("Jupiter", 0.9, 5.20, "textures/jupiter.jpg", [0.8, 0.7, 0.5]),
                BodyDescriptor::new("Saturn", 0.7, 9.58, "textures/saturn.jpg", [0.85, 0.75, 0.5]),
                BodyDescriptor::new("Uranus", 0.6, 19.22, "textures/uranus.jpg", [0.5, 0.75, 0.85]),
                BodyDescriptor::new("Neptune", 0.5, 30.05, "textures/neptune.jpg", [0.25, 0.35, 0.8]),
            ],
            moon: Some(BodyDescriptor::new(
                "Moon",
                0.15,
                0.25,
                "textures/moon.jpg",
                [0.7, 0.7, 0.7],
            )),
            camera: CameraConfig::default(),
            details: HashMap::new(),
        }
    }

    pub fn from_yaml(input: &str) -> Result<Self, SceneLoadError> {
        let manifest = serde_yaml::from_str::<Self>(input)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneLoadError> {
        let input = fs::read_to_string(path)?;
        Self::from_yaml(&input)
    }

    /// Sun first, then the planets in file order, then the Moon.
    pub fn bodies(&self) -> impl Iterator<Item = &BodyDescriptor> {
        std::iter::once(&self.sun)
            .chain(&self.planets)
            .chain(self.moon.as_ref())
    }

    pub fn scaled_distance(&self, descriptor: &BodyDescriptor) -> f32 {
        descriptor.distance * self.scale
    }

    pub fn validate(&self) -> Result<(), SceneLoadError> {
        use SceneLoadError::*;
        let invalid = |descriptor: &BodyDescriptor, reason| InvalidBody {
            name: descriptor.name.clone(),
            reason,
        };

        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(invalid(&self.sun, "scale must be positive"));
        }
        if self.sun.distance != 0.0 {
            return Err(invalid(&self.sun, "the sun must sit at distance 0"));
        }
        let mut names = HashSet::new();
        for descriptor in self.bodies() {
            if !(descriptor.radius.is_finite() && descriptor.radius > 0.0) {
                return Err(invalid(descriptor, "radius must be positive"));
            }
            if !(descriptor.distance.is_finite() && descriptor.distance >= 0.0) {
                return Err(invalid(descriptor, "distance must not be negative"));
            }
            if !names.insert(descriptor.name.as_str()) {
                return Err(DuplicateBody(descriptor.name.clone()));
            }
        }
        if let Some(planet) = self.planets.iter().find(|p| p.distance == 0.0) {
            return Err(invalid(planet, "planets must orbit at a positive distance"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHIPPED_SCENE: &str = include_str!("../../../../assets/scenes/solar.system.yaml");

    #[test]
    fn builtin_table_is_valid() {
        let manifest = SystemManifest::builtin();
        manifest.validate().unwrap();
        assert_eq!(manifest.planets.len(), 8);
        assert_eq!(manifest.bodies().count(), 10);
        assert_eq!(manifest.scaled_distance(&manifest.planets[2]), 20.0);
    }

    #[test]
    fn shipped_scene_matches_builtin_table() {
        let manifest = SystemManifest::from_yaml(SHIPPED_SCENE).unwrap();
        let builtin = SystemManifest::builtin();
        assert_eq!(manifest.sun, builtin.sun);
        assert_eq!(manifest.planets, builtin.planets);
        assert_eq!(manifest.moon, builtin.moon);
        assert_eq!(manifest.camera, builtin.camera);
    }

    #[test]
    fn minimal_scene_uses_defaults() {
        let manifest = SystemManifest::from_yaml(
            r#"
sun: { name: Sun, radius: 2.0, texture: textures/sun.jpg }
planets:
  - { name: Vulcan, radius: 0.2, distance: 0.1, texture: textures/vulcan.jpg }
details:
  Vulcan:
    description: Does not exist.
"#,
        )
        .unwrap();
        assert_eq!(manifest.scale, 20.0);
        assert!(manifest.moon.is_none());
        assert_eq!(manifest.camera, CameraConfig::default());
        assert_eq!(manifest.planets[0].color, [0.5, 0.5, 0.5]);
        assert_eq!(manifest.details["Vulcan"].description, "Does not exist.");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut manifest = SystemManifest::builtin();
        manifest.planets[1].name = "Mercury".into();
        assert!(matches!(
            manifest.validate(),
            Err(SceneLoadError::DuplicateBody(name)) if name == "Mercury"
        ));
    }

    #[test]
    fn non_positive_radius_is_rejected() {
        let mut manifest = SystemManifest::builtin();
        manifest.planets[0].radius = 0.0;
        assert!(matches!(
            manifest.validate(),
            Err(SceneLoadError::InvalidBody { name, .. }) if name == "Mercury"
        ));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        assert!(matches!(
            SystemManifest::from_yaml("sun: [not, a, body]"),
            Err(SceneLoadError::ParseError(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            SystemManifest::load("does/not/exist.yaml"),
            Err(SceneLoadError::IoError(_))
        ));
    }
}
