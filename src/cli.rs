use crate::app;
use bevy::log::{info, LogPlugin};
use bevy::prelude::App;
use bevy::window::WindowResolution;
use clap::ArgAction;
use rand::rngs::StdRng;
use rand::SeedableRng;
use solar_system::camera::{CameraView, Viewport};
use solar_system::scheduler::{self, FixedFrames};
use solar_system::screen_space::LabelStyle;
use solar_system::Simulation;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(clap::Parser)]
pub(crate) struct Cli {
    #[clap(subcommand)]
    command: CliCommand,
}

impl Cli {
    pub(crate) fn run(self) {
        self.command.run();
    }
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Print the render graph
    #[cfg(feature = "print-render-graph")]
    Dump,
    /// Open the interactive viewer
    Run {
        #[clap(short, long)]
        resolution: Option<Resolution>,
        #[clap(long, action = ArgAction::SetTrue)]
        inspector: bool,
        /// Scene descriptor to load instead of the built-in solar system
        #[clap(long)]
        scene: Option<PathBuf>,
        #[clap(long, value_enum, default_value_t = LabelStyleArg::Overlay)]
        labels: LabelStyleArg,
        #[clap(long, action = ArgAction::SetTrue)]
        no_orbits: bool,
    },
    /// Step the simulation without a window and log where every body ends up
    Simulate {
        #[clap(short, long, default_value_t = 600)]
        frames: u64,
        #[clap(long)]
        scene: Option<PathBuf>,
        /// Seed for the starting orbital angles
        #[clap(long)]
        seed: Option<u64>,
    },
}

#[derive(Debug, Copy, Clone)]
struct Resolution {
    width: f32,
    height: f32,
}

impl FromStr for Resolution {
    type Err = ResolutionInvalidFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s.split_once('x').ok_or(ResolutionInvalidFormat)?;
        let width = w.parse::<f32>().map_err(|_| ResolutionInvalidFormat)?;
        let height = h.parse::<f32>().map_err(|_| ResolutionInvalidFormat)?;
        if !(width > 0.0 && height > 0.0) {
            return Err(ResolutionInvalidFormat);
        }
        Ok(Self { width, height })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid format for resolution; expected <width>x<height>")]
struct ResolutionInvalidFormat;

#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
enum LabelStyleArg {
    /// Name drawn just above the body's screen position
    Overlay,
    /// Name anchored slightly above the body in the world
    Billboard,
}

impl From<LabelStyleArg> for LabelStyle {
    fn from(value: LabelStyleArg) -> Self {
        match value {
            LabelStyleArg::Overlay => LabelStyle::Overlay,
            LabelStyleArg::Billboard => LabelStyle::Billboard,
        }
    }
}

impl CliCommand {
    fn run(self) {
        match self {
            #[cfg(feature = "print-render-graph")]
            Self::Dump => {
                let mut app = app::get_app(Default::default());
                bevy_mod_debugdump::print_render_graph(&mut app);
            }
            Self::Run {
                resolution,
                inspector,
                scene,
                labels,
                no_orbits,
            } => {
                app::get_app(app::AppSettings {
                    resolution: resolution
                        .map(|r| WindowResolution::new(r.width, r.height))
                        .unwrap_or_default(),
                    with_inspector: inspector,
                    scene,
                    label_style: labels.into(),
                    draw_orbits: !no_orbits,
                })
                .run();
            }
            Self::Simulate {
                frames,
                scene,
                seed,
            } => simulate(frames, scene, seed),
        }
    }
}

fn simulate(frames: u64, scene: Option<PathBuf>, seed: Option<u64>) {
    // Installs the global log subscriber; the loop below is driven by hand.
    App::new().add_plugins(LogPlugin::default());

    let manifest = app::load_manifest(scene.as_deref());
    let viewport = Viewport::default();
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut simulation = Simulation::from_manifest(&manifest, viewport, &mut rng);
    let camera = CameraView::looking_at(
        manifest.camera.translation.into(),
        manifest.camera.target.into(),
        manifest.camera.fov.to_radians(),
        viewport,
        manifest.camera.near,
        manifest.camera.far,
    );

    let ran = scheduler::run(
        &mut simulation,
        &camera,
        &mut FixedFrames::at_60hz(frames),
        |_, _| {},
    );
    info!("Ran {ran} frames");
    for (body, label) in simulation.system().bodies().iter().zip(simulation.labels()) {
        let screen = label
            .screen
            .map(|p| format!("({:.0}, {:.0})", p.x, p.y))
            .unwrap_or_else(|| "off screen".to_string());
        info!(
            "{name}: position {position}, orbital angle {angle:.3} rad, spin {spin:.3} rad, label {screen}",
            name = body.name,
            position = body.position,
            angle = body.orbital_angle,
            spin = body.spin_angle,
        );
    }
}
