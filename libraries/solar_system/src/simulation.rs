use crate::camera::{CameraView, Viewport};
use crate::details::{DetailCatalog, DetailPanel};
use crate::picking;
use crate::scene::components::SceneCamera;
use crate::scene::SystemManifest;
use crate::screen_space::{self, Label, LabelStyle};
use crate::system::SolarSystem;
use bevy::log::warn_once;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use bevy_egui::EguiContext;
use rand::Rng;
use std::collections::VecDeque;

/// How far, in logical pixels, the pointer may travel between press and release for the
/// gesture to still count as a click rather than a camera drag.
const CLICK_TOLERANCE: f32 = 4.0;

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<SceneCamera>()
            .configure_sets(Update, (SimulationSet::Input, SimulationSet::Step).chain())
            .add_systems(
                Update,
                (
                    (track_viewport, collect_clicks).in_set(SimulationSet::Input),
                    step_simulation.in_set(SimulationSet::Step),
                )
                    .run_if(resource_exists::<Simulation>),
            );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SystemSet)]
pub enum SimulationSet {
    /// Turns window and pointer input into [`ControlEvent`]s.
    Input,
    /// Drains queued events, then advances the bodies and reprojects labels.
    Step,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    /// Pointer click at logical pixel coordinates, origin top-left.
    Click { x: f32, y: f32 },
    Resize { width: f32, height: f32 },
    DismissDetails,
}

/// All mutable scene state, advanced once per frame by [`Simulation::step`].
#[derive(Debug, Resource)]
pub struct Simulation {
    system: SolarSystem,
    catalog: DetailCatalog,
    panel: DetailPanel,
    viewport: Viewport,
    label_style: LabelStyle,
    labels: Vec<Label>,
    events: VecDeque<ControlEvent>,
    frame: u64,
}

impl Simulation {
    pub fn new(system: SolarSystem, catalog: DetailCatalog, viewport: Viewport) -> Self {
        Self {
            system,
            catalog,
            panel: DetailPanel::default(),
            viewport,
            label_style: LabelStyle::default(),
            labels: Vec::new(),
            events: VecDeque::new(),
            frame: 0,
        }
    }

    pub fn from_manifest(manifest: &SystemManifest, viewport: Viewport, rng: &mut impl Rng) -> Self {
        let mut catalog = DetailCatalog::builtin();
        catalog.extend(manifest.details.clone());
        Self::new(SolarSystem::from_manifest(manifest, rng), catalog, viewport)
    }

    pub fn with_label_style(mut self, style: LabelStyle) -> Self {
        self.label_style = style;
        self
    }

    pub fn push(&mut self, event: ControlEvent) {
        self.events.push_back(event);
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Runs one frame.
    ///
    /// Queued events are applied in arrival order, then the bodies move, then labels are
    /// projected from the new positions. Without a camera, clicks are dropped and labels are
    /// left unplaced.
    pub fn step(&mut self, camera: Option<&CameraView>) {
        while let Some(event) = self.events.pop_front() {
            self.apply(event, camera);
        }
        self.system.update_positions();
        match camera {
            Some(camera) => screen_space::project_labels(
                self.label_style,
                self.system.bodies(),
                camera,
                self.viewport,
                &mut self.labels,
            ),
            None => self.labels.iter_mut().for_each(|label| label.screen = None),
        }
        self.frame += 1;
    }

    fn apply(&mut self, event: ControlEvent, camera: Option<&CameraView>) {
        match event {
            ControlEvent::Resize { width, height } => {
                debug!("Viewport resized to {width}x{height}");
                self.viewport = Viewport::new(width, height);
            }
            ControlEvent::Click { x, y } => {
                let Some(camera) = camera else {
                    debug!("Click at ({x}, {y}) dropped: no camera");
                    return;
                };
                let picked = picking::pick(
                    Vec2::new(x, y),
                    self.viewport,
                    camera,
                    self.system.pick_candidates(),
                );
                if let Some(body) = picked {
                    info!("Selected {}", body.name);
                    let name = body.name.clone();
                    self.panel.show_details(&self.catalog, &name);
                }
            }
            ControlEvent::DismissDetails => self.panel.hide_details(),
        }
    }

    pub fn system(&self) -> &SolarSystem {
        &self.system
    }

    pub fn panel(&self) -> &DetailPanel {
        &self.panel
    }

    pub fn catalog(&self) -> &DetailCatalog {
        &self.catalog
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn label_style(&self) -> LabelStyle {
        self.label_style
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

fn track_viewport(
    mut simulation: ResMut<Simulation>,
    mut evr_resized: EventReader<WindowResized>,
    q_primary: Query<(Entity, &Window), With<PrimaryWindow>>,
) {
    let Ok((primary, window)) = q_primary.get_single() else {
        evr_resized.clear();
        return;
    };
    let resized = evr_resized.read().filter(|ev| ev.window == primary).count() > 0;
    let viewport = Viewport::new(window.width(), window.height());
    if resized || simulation.viewport() != viewport {
        simulation.push(ControlEvent::Resize {
            width: viewport.width,
            height: viewport.height,
        });
    }
}

/// Tells clicks apart from camera drags and from presses that land on the UI.
#[derive(Debug, Default)]
struct ClickTracker {
    pressed_at: Option<Vec2>,
}

impl ClickTracker {
    fn press(&mut self, cursor: Option<Vec2>, over_ui: bool) {
        self.pressed_at = cursor.filter(|_| !over_ui);
    }

    /// The click position, if this release completes one.
    fn release(&mut self, cursor: Option<Vec2>) -> Option<Vec2> {
        let (start, end) = (self.pressed_at.take()?, cursor?);
        (start.distance(end) <= CLICK_TOLERANCE).then_some(end)
    }
}

fn collect_clicks(
    mut simulation: ResMut<Simulation>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut q_window: Query<(&Window, Option<&mut EguiContext>), With<PrimaryWindow>>,
    mut tracker: Local<ClickTracker>,
) {
    let Ok((window, egui)) = q_window.get_single_mut() else {
        return;
    };
    let over_ui = egui.is_some_and(|mut ctx| ctx.get_mut().is_pointer_over_area());
    let cursor = window.cursor_position();

    if mouse_buttons.just_pressed(MouseButton::Left) {
        tracker.press(cursor, over_ui);
    }
    if mouse_buttons.just_released(MouseButton::Left) {
        if let Some(Vec2 { x, y }) = tracker.release(cursor) {
            simulation.push(ControlEvent::Click { x, y });
        }
    }
}

fn step_simulation(
    mut simulation: ResMut<Simulation>,
    q_camera: Query<(&Camera, &Transform), With<SceneCamera>>,
) {
    let camera = q_camera
        .iter()
        .find_map(|(camera, transform)| CameraView::from_active_camera(camera, transform));
    if camera.is_none() && !q_camera.is_empty() {
        debug!("Scene camera projection not ready; picking and labels wait a frame");
    } else if camera.is_none() {
        warn_once!("No active scene camera; picking and labels are paused");
    }
    simulation.step(camera.as_ref());
}
