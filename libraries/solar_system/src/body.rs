use crate::orbit::{self, OrbitPath};
use crate::simulation::{Simulation, SimulationSet};
use crate::sun::Sun;
use bevy::asset::AssetLoadFailedEvent;
use bevy::math::bounding::BoundingSphere;
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts;

pub const EARTH_NAME: &str = "Earth";
pub const MOON_NAME: &str = "Moon";

/// Radians per frame a planet turns about its own axis.
pub const SPIN_SPEED: f32 = 0.01;

const DEFAULT_PLACEHOLDER_COLOR: Color = Color::srgb(0.5, 0.5, 0.5);

pub struct BodyPlugin;

impl Plugin for BodyPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PlanetaryBody>()
            .add_systems(Startup, spawn_bodies.run_if(resource_exists::<Simulation>))
            .add_systems(
                Update,
                (
                    sync_transforms.after(SimulationSet::Step),
                    attach_loaded_textures,
                    report_failed_textures,
                )
                    .run_if(resource_exists::<Simulation>),
            );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum BodyKind {
    /// Sits at the origin and does not orbit.
    Star,
    Planet,
    /// Circles Earth rather than the origin.
    Moon,
}

#[derive(Debug, Clone)]
pub struct CelestialBody {
    pub name: String,
    pub radius: f32,
    pub texture: String,
    pub orbital_distance: f32,
    pub kind: BodyKind,
    pub orbital_angle: f32,
    pub position: Vec3,
    pub spin_angle: f32,
    pub color: Color,
    pub orbit: Option<OrbitPath>,
}

impl CelestialBody {
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Puts the body at `angle` on its orbit around the origin.
    pub fn place_on_orbit(&mut self, angle: f32) {
        self.orbital_angle = angle.rem_euclid(consts::TAU);
        self.position = orbit::point_on_circle(self.orbital_distance, self.orbital_angle);
    }

    /// Moves the body `delta` radians backwards along a circle centered on `center`, dragging
    /// its orbit path along.
    pub fn revolve_around(&mut self, center: Vec3, delta: f32) {
        self.orbital_angle = (self.orbital_angle - delta).rem_euclid(consts::TAU);
        self.position = center + orbit::point_on_circle(self.orbital_distance, self.orbital_angle);
        if let Some(path) = &mut self.orbit {
            path.recenter(center);
        }
    }

    pub fn spin(&mut self, delta: f32) {
        self.spin_angle = (self.spin_angle + delta).rem_euclid(consts::TAU);
    }

    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(self.position, self.radius)
    }

    pub fn is_pickable(&self) -> bool {
        self.kind != BodyKind::Star
    }
}

/// Builds a body from its static parameters.
///
/// Planets start at a uniformly random angle on their orbit and carry an orbit path. The Moon
/// starts at angle zero without a path; the solar system gives it one centered on Earth. A body
/// at distance zero is the star.
pub fn create_body(
    radius: f32,
    texture: impl Into<String>,
    orbital_distance: f32,
    name: impl Into<String>,
    rng: &mut impl Rng,
) -> CelestialBody {
    let name = name.into();
    let kind = if name == MOON_NAME {
        BodyKind::Moon
    } else if orbital_distance == 0.0 {
        BodyKind::Star
    } else {
        BodyKind::Planet
    };
    let mut body = CelestialBody {
        name,
        radius,
        texture: texture.into(),
        orbital_distance,
        kind,
        orbital_angle: 0.0,
        position: Vec3::ZERO,
        spin_angle: 0.0,
        color: DEFAULT_PLACEHOLDER_COLOR,
        orbit: None,
    };
    match kind {
        BodyKind::Planet => {
            body.orbit = Some(OrbitPath::new(orbital_distance));
            body.place_on_orbit(rng.gen_range(0.0..consts::TAU));
        }
        BodyKind::Moon => body.place_on_orbit(0.0),
        BodyKind::Star => {}
    }
    body
}

/// Links a rendered entity to its body in [`Simulation`].
#[derive(Debug, Copy, Clone, Component, Reflect)]
#[reflect(Component)]
pub struct PlanetaryBody(pub usize);

/// Texture still loading for a body; the placeholder material is shown until then.
#[derive(Debug, Clone, Component)]
struct PendingTexture(Handle<Image>);

fn placeholder_material(body: &CelestialBody) -> StandardMaterial {
    match body.kind {
        BodyKind::Star => StandardMaterial {
            base_color: body.color,
            emissive: body.color.to_linear() * 4.0,
            ..default()
        },
        _ => StandardMaterial {
            base_color: body.color,
            perceptual_roughness: 0.9,
            ..default()
        },
    }
}

fn spawn_bodies(
    mut commands: Commands,
    simulation: Res<Simulation>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (index, body) in simulation.system().bodies().iter().enumerate() {
        let mesh = meshes.add(Sphere::new(body.radius).mesh().uv(32, 32));
        let material = materials.add(placeholder_material(body));
        let texture = asset_server.load::<Image>(body.texture.clone());
        let mut entity = commands.spawn((
            PlanetaryBody(index),
            Name::new(body.name.clone()),
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_translation(body.position),
            PendingTexture(texture),
        ));
        if body.kind == BodyKind::Star {
            entity.insert(Sun);
        }
        debug!("Spawned {} as {}", body.name, entity.id());
    }
}

fn sync_transforms(simulation: Res<Simulation>, mut q: Query<(&PlanetaryBody, &mut Transform)>) {
    let bodies = simulation.system().bodies();
    for (&PlanetaryBody(index), mut transform) in &mut q {
        let Some(body) = bodies.get(index) else {
            continue;
        };
        transform.translation = body.position;
        transform.rotation = Quat::from_rotation_y(body.spin_angle);
    }
}

fn attach_loaded_textures(
    mut commands: Commands,
    mut events: EventReader<AssetEvent<Image>>,
    q: Query<(
        Entity,
        &Name,
        &PendingTexture,
        &MeshMaterial3d<StandardMaterial>,
        Has<Sun>,
    )>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for event in events.read() {
        let AssetEvent::LoadedWithDependencies { id } = event else {
            continue;
        };
        for (entity, name, PendingTexture(texture), material, is_sun) in &q {
            if texture.id() != *id {
                continue;
            }
            if let Some(material) = materials.get_mut(&material.0) {
                material.base_color = Color::WHITE;
                material.base_color_texture = Some(texture.clone());
                if is_sun {
                    material.emissive = LinearRgba::WHITE * 4.0;
                    material.emissive_texture = Some(texture.clone());
                }
            }
            debug!("Texture attached to {name}");
            commands.entity(entity).remove::<PendingTexture>();
        }
    }
}

fn report_failed_textures(
    mut commands: Commands,
    mut events: EventReader<AssetLoadFailedEvent<Image>>,
    q: Query<(Entity, &Name, &PendingTexture)>,
) {
    for event in events.read() {
        for (entity, name, PendingTexture(texture)) in &q {
            if texture.id() != event.id {
                continue;
            }
            warn!(
                "Could not load texture {} for {name}: {}; keeping placeholder material",
                event.path, event.error
            );
            commands.entity(entity).remove::<PendingTexture>();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use bevy::asset::io::AssetReaderError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::PathBuf;

    #[test]
    fn planet_starts_on_its_orbit() {
        let mut rng = StdRng::seed_from_u64(7);
        let mars = create_body(0.4, "textures/mars.jpg", 30.4, "Mars", &mut rng);
        assert_eq!(mars.kind, BodyKind::Planet);
        assert_abs_diff_eq!(mars.position.length(), 30.4, epsilon = 1e-4);
        assert_eq!(mars.position.y, 0.0);
        assert!((0.0..consts::TAU).contains(&mars.orbital_angle));
        assert_eq!(mars.orbit.as_ref().map(OrbitPath::radius), Some(30.4));
    }

    #[test]
    fn moon_and_star_have_no_generic_orbit() {
        let mut rng = StdRng::seed_from_u64(7);
        let moon = create_body(0.15, "textures/moon.jpg", 5.0, MOON_NAME, &mut rng);
        assert_eq!(moon.kind, BodyKind::Moon);
        assert!(moon.orbit.is_none());
        assert_eq!(moon.orbital_angle, 0.0);

        let sun = create_body(1.5, "textures/sun.jpg", 0.0, "Sun", &mut rng);
        assert_eq!(sun.kind, BodyKind::Star);
        assert!(sun.orbit.is_none());
        assert_eq!(sun.position, Vec3::ZERO);
        assert!(!sun.is_pickable());
    }

    #[test]
    fn starting_angles_vary_between_seeds() {
        let angles = (0..8)
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                create_body(0.5, "", 20.0, EARTH_NAME, &mut rng).orbital_angle
            })
            .collect::<Vec<_>>();
        assert!(angles.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn revolving_moves_path_with_center() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut moon = create_body(0.15, "", 5.0, MOON_NAME, &mut rng);
        moon.orbit = Some(OrbitPath::new(5.0));
        let earth = Vec3::new(12.0, 0.0, -16.0);
        moon.revolve_around(earth, 0.02);
        assert_abs_diff_eq!(moon.orbital_angle, consts::TAU - 0.02, epsilon = 1e-6);
        assert_abs_diff_eq!(moon.position.distance(earth), 5.0, epsilon = 1e-4);
        assert_eq!(moon.position.y, 0.0);
        assert_eq!(moon.orbit.as_ref().map(OrbitPath::center), Some(earth));
    }

    #[test]
    fn spin_wraps_without_touching_orbit() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut venus = create_body(0.5, "", 14.4, "Venus", &mut rng);
        let before = venus.position;
        for _ in 0..1000 {
            venus.spin(SPIN_SPEED);
        }
        assert_abs_diff_eq!(venus.spin_angle, 10.0f32.rem_euclid(consts::TAU), epsilon = 1e-3);
        assert_eq!(venus.position, before);
    }

    struct TexturedBody {
        app: App,
        entity: Entity,
        texture: Handle<Image>,
        material: Handle<StandardMaterial>,
    }

    fn textured_body(name: &str, distance: f32) -> TexturedBody {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Image>()
            .init_asset::<StandardMaterial>()
            .add_event::<AssetLoadFailedEvent<Image>>()
            .add_systems(Update, (attach_loaded_textures, report_failed_textures));

        let mut rng = StdRng::seed_from_u64(9);
        let body = create_body(0.5, "textures/body.jpg", distance, name, &mut rng);
        let texture = app.world().resource::<Assets<Image>>().reserve_handle();
        let material = app
            .world_mut()
            .resource_mut::<Assets<StandardMaterial>>()
            .add(placeholder_material(&body));
        let mut entity = app.world_mut().spawn((
            Name::new(body.name.clone()),
            MeshMaterial3d(material.clone()),
            PendingTexture(texture.clone()),
        ));
        if body.kind == BodyKind::Star {
            entity.insert(Sun);
        }
        let entity = entity.id();
        TexturedBody {
            app,
            entity,
            texture,
            material,
        }
    }

    impl TexturedBody {
        fn material(&self) -> &StandardMaterial {
            self.app
                .world()
                .resource::<Assets<StandardMaterial>>()
                .get(&self.material)
                .unwrap()
        }

        fn is_pending(&self) -> bool {
            self.app.world().get::<PendingTexture>(self.entity).is_some()
        }
    }

    #[test]
    fn loaded_texture_replaces_placeholder() {
        let mut body = textured_body("Mars", 30.4);
        body.app.update();
        assert!(body.is_pending());
        assert_eq!(body.material().base_color_texture, None);

        let id = body.texture.id();
        body.app
            .world_mut()
            .send_event(AssetEvent::LoadedWithDependencies { id });
        body.app.update();

        assert!(!body.is_pending());
        assert_eq!(body.material().base_color_texture, Some(body.texture.clone()));
        assert_eq!(body.material().base_color, Color::WHITE);
        assert_eq!(body.material().emissive_texture, None);
    }

    #[test]
    fn loaded_texture_also_lights_the_sun() {
        let mut body = textured_body("Sun", 0.0);
        let id = body.texture.id();
        body.app
            .world_mut()
            .send_event(AssetEvent::LoadedWithDependencies { id });
        body.app.update();

        assert!(!body.is_pending());
        assert_eq!(body.material().emissive_texture, Some(body.texture.clone()));
    }

    #[test]
    fn failed_texture_keeps_placeholder() {
        let mut body = textured_body("Mars", 30.4);
        let id = body.texture.id();
        body.app.world_mut().send_event(AssetLoadFailedEvent {
            id,
            path: "textures/body.jpg".into(),
            error: AssetReaderError::NotFound(PathBuf::from("textures/body.jpg")).into(),
        });
        body.app.update();

        assert!(!body.is_pending());
        assert_eq!(body.material().base_color_texture, None);
        assert_eq!(body.material().base_color, DEFAULT_PLACEHOLDER_COLOR);
    }

    #[test]
    fn unrelated_texture_events_are_ignored() {
        let mut body = textured_body("Mars", 30.4);
        let other = body
            .app
            .world()
            .resource::<Assets<Image>>()
            .reserve_handle();
        body.app
            .world_mut()
            .send_event(AssetEvent::LoadedWithDependencies { id: other.id() });
        body.app.update();

        assert!(body.is_pending());
        assert_eq!(body.material().base_color_texture, None);
    }
}
