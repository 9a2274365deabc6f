use crate::ui;
use bevy::core_pipeline::bloom::Bloom;
use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use bevy::render::render_resource::Face;
use bevy::window::WindowResolution;
use bevy_blur_regions::BlurRegionsCamera;
use bevy_inspector_egui::DefaultInspectorConfigPlugin;
use pan_orbit::components::{PanOrbitSettings, PanOrbitState};
use pan_orbit::{PanOrbitCameraPlugin, PanOrbitSet};
use solar_system::camera::Viewport;
use solar_system::scene::components::SceneCamera;
use solar_system::scene::{CameraConfig, SystemManifest};
use solar_system::screen_space::LabelStyle;
use solar_system::{Simulation, SimulationSet, SolarSystemPlugin};
use std::path::{Path, PathBuf};

const BACKGROUND_TEXTURE: &str = "textures/background.jpg";
/// Inside the default far plane, so the sky stays visible from anywhere near the system.
const BACKGROUND_RADIUS: f32 = 900.0;

pub(crate) struct AppSettings {
    pub(crate) resolution: WindowResolution,
    pub(crate) with_inspector: bool,
    pub(crate) scene: Option<PathBuf>,
    pub(crate) label_style: LabelStyle,
    pub(crate) draw_orbits: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            resolution: WindowResolution::default(),
            with_inspector: false,
            scene: None,
            label_style: LabelStyle::default(),
            draw_orbits: true,
        }
    }
}

#[derive(Debug, Clone, Resource, Deref)]
struct InitialCamera(CameraConfig);

pub fn get_app(settings: AppSettings) -> App {
    let viewport = Viewport::new(settings.resolution.width(), settings.resolution.height());
    let mut app = App::new();
    app.add_plugins((
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Bevy Orrery".to_string(),
                    resolution: settings.resolution,
                    ..default()
                }),
                ..default()
            })
            .set(ImagePlugin::default_linear()),
        DefaultInspectorConfigPlugin,
        PanOrbitCameraPlugin,
    ));

    // Loaded after the log plugin is up, so a bad scene file gets reported.
    let manifest = load_manifest(settings.scene.as_deref());
    let simulation = Simulation::from_manifest(&manifest, viewport, &mut rand::thread_rng())
        .with_label_style(settings.label_style);

    app.add_plugins((
        SolarSystemPlugin {
            draw_orbits: settings.draw_orbits,
        },
        ui::UiPlugin {
            with_inspector: settings.with_inspector,
        },
    ))
    .configure_sets(Update, SimulationSet::Input.after(PanOrbitSet))
    .insert_resource(ClearColor(Color::BLACK))
    .insert_resource(InitialCamera(manifest.camera.clone()))
    .insert_resource(simulation)
    .add_systems(Startup, (setup_camera, setup_background))
    .add_observer(on_add_scene_camera);
    app
}

/// Reads the scene at `path`, or the built-in solar system when there is none or it is unusable.
pub(crate) fn load_manifest(path: Option<&Path>) -> SystemManifest {
    let Some(path) = path else {
        info!("Using the built-in solar system");
        return SystemManifest::builtin();
    };
    match SystemManifest::load(path) {
        Ok(manifest) => {
            info!(
                "Loaded scene {} with {} bodies",
                path.display(),
                manifest.bodies().count()
            );
            manifest
        }
        Err(err) => {
            error!(
                "Cannot load scene {}: {err}; using the built-in solar system",
                path.display()
            );
            SystemManifest::builtin()
        }
    }
}

fn setup_camera(mut commands: Commands, camera: Res<InitialCamera>) {
    let eye = Vec3::from(camera.translation);
    let target = Vec3::from(camera.target);
    commands.spawn((
        Name::new("Scene camera"),
        SceneCamera,
        PanOrbitState::looking_at(eye, target),
        Transform::from_translation(eye).looking_at(target, Vec3::Y),
        Projection::Perspective(PerspectiveProjection {
            fov: camera.fov.to_radians(),
            near: camera.near,
            far: camera.far,
            ..default()
        }),
    ));
}

fn setup_background(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Name::new("Background"),
        Mesh3d(meshes.add(Sphere::new(BACKGROUND_RADIUS).mesh().uv(64, 32))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color_texture: Some(asset_server.load(BACKGROUND_TEXTURE)),
            unlit: true,
            // Seen from the inside.
            cull_mode: Some(Face::Front),
            ..default()
        })),
        Transform::default(),
        NotShadowCaster,
    ));
}

fn on_add_scene_camera(trigger: Trigger<OnAdd, SceneCamera>, mut commands: Commands) {
    debug!("Add scene camera to {}", trigger.entity());
    commands.entity(trigger.entity()).insert((
        PanOrbitSettings::default(),
        Camera3d::default(),
        Camera {
            hdr: true,
            ..default()
        },
        Bloom {
            intensity: 0.05,
            ..default()
        },
        BlurRegionsCamera::<20>::default(),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_scene_falls_back_to_builtin() {
        let manifest = load_manifest(Some(Path::new("does/not/exist.yaml")));
        assert_eq!(manifest, SystemManifest::builtin());
    }

    #[test]
    fn shipped_scene_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/scenes/solar.system.yaml");
        let manifest = load_manifest(Some(&path));
        assert_eq!(manifest.planets.len(), 8);
        assert_eq!(manifest.camera, CameraConfig::default());
    }

    #[test]
    fn default_settings_draw_orbits() {
        let settings = AppSettings::default();
        assert!(settings.draw_orbits);
        assert!(!settings.with_inspector);
        assert_eq!(settings.label_style, LabelStyle::Overlay);
    }
}
