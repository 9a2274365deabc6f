use bevy::prelude::*;

pub struct SunPlugin;

impl Plugin for SunPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Sunlight>()
            .insert_resource(AmbientLight {
                color: Color::WHITE,
                brightness: AMBIENT_BRIGHTNESS,
            })
            .add_systems(Startup, setup_sunlight)
            .add_systems(Update, sun_lighting);
    }
}

/// Ambient light at half strength, so the night sides stay readable.
const AMBIENT_BRIGHTNESS: f32 = 250.0;

#[derive(Debug, Clone, Copy, Component)]
pub struct Sun;

#[derive(Component, Reflect)]
#[reflect(Component)]
struct Sunlight;

fn setup_sunlight(mut commands: Commands) {
    commands.spawn((
        Sunlight,
        Name::new("Sunlight"),
        PointLight {
            color: Color::WHITE,
            intensity: 2e7,
            range: 2_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::default(),
    ));
}

fn sun_lighting(
    q_sun: Query<&Transform, (With<Sun>, Without<Sunlight>)>,
    mut q_light: Query<&mut Transform, With<Sunlight>>,
) {
    let Ok(sun) = q_sun.get_single() else {
        return;
    };
    for mut light in &mut q_light {
        light.translation = sun.translation;
    }
}
