use crate::ui::planets::Focus;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::ecs::system::SystemParam;
use bevy::math::vec2;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_blur_regions::{BlurRegionsCamera, BlurRegionsPlugin};
use bevy_egui::{EguiContext, EguiPlugin, EguiUserTextures};
use egui::load::SizedTexture;
use egui::panel::{Side, TopBottomSide};
use egui::{containers, Align, FontId, Ui};
use egui_plot::{PlotPoint, PlotPoints};
use solar_system::orbit::DrawOrbits;
use solar_system::{ControlEvent, Simulation, SimulationSet};

mod inspector;
mod planets;

const LABEL_FONT_SIZE: f32 = 14.0;
const DETAIL_PANEL_WIDTH: f32 = 280.0;

#[derive(Default)]
pub struct UiPlugin {
    pub with_inspector: bool,
}

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<EguiPlugin>() {
            app.add_plugins(EguiPlugin);
        }
        if !app.is_plugin_added::<FrameTimeDiagnosticsPlugin>() {
            app.add_plugins(FrameTimeDiagnosticsPlugin);
        }

        app.add_plugins(BlurRegionsPlugin::<20>)
            .add_plugins(planets::PlanetsPlugin)
            .init_resource::<UiState>()
            .add_systems(
                Update,
                ui.after(SimulationSet::Step)
                    .run_if(resource_exists::<Simulation>),
            );

        if self.with_inspector {
            app.add_plugins(inspector::Plugin);
        }
    }
}

#[derive(Resource)]
struct UiState {
    topbar_expanded: bool,
    show_labels: bool,
    detail_image: Option<DetailImage>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            topbar_expanded: false,
            show_labels: true,
            detail_image: None,
        }
    }
}

/// Picture of the body shown in the detail panel, registered with egui.
struct DetailImage {
    path: String,
    handle: Handle<Image>,
    texture: egui::TextureId,
}

#[derive(SystemParam)]
struct UiSystems<'w, 's> {
    state: ResMut<'w, UiState>,
    focus: ResMut<'w, Focus>,
    simulation: ResMut<'w, Simulation>,
    diagnostics: Res<'w, DiagnosticsStore>,
    draw_orbits: ResMut<'w, DrawOrbits>,
    asset_server: Res<'w, AssetServer>,
    images: Res<'w, Assets<Image>>,
    egui_textures: ResMut<'w, EguiUserTextures>,
    q_camera_blur: Query<'w, 's, &'static mut BlurRegionsCamera<20>>,
}

fn ui(mut this: UiSystems, mut q_egui: Query<&mut EguiContext, With<PrimaryWindow>>) {
    let Ok(mut egui) = q_egui.get_single_mut() else {
        return;
    };

    let ctx = egui.get_mut();
    this.toplevel(ctx);
}

impl UiSystems<'_, '_> {
    fn toplevel(&mut self, ctx: &egui::Context) {
        self.topbar(ctx);
        self.details_panel(ctx);
        self.labels(ctx);
    }

    fn blur(&mut self, ctx: &egui::Context, rect: egui::Rect) {
        if let Ok(mut blur_regions) = self.q_camera_blur.get_single_mut() {
            let scale_factor = ctx.options(|op| op.zoom_factor);
            let min = vec2(rect.min.x, rect.min.y) * scale_factor;
            let max = vec2(rect.max.x, rect.max.y) * scale_factor;
            blur_regions.blur(Rect::from_corners(min, max));
        }
    }

    fn topbar(&mut self, ctx: &egui::Context) {
        let rect = egui::TopBottomPanel::new(TopBottomSide::Top, "toolbar")
            .frame(default_blurry_frame())
            .show(ctx, |ui| {
                self.topbar_ui(ui);
            })
            .response
            .rect;
        self.blur(ctx, rect);
    }

    fn topbar_ui(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            self.focus_selector(ui);
            ui.with_layout(egui::Layout::right_to_left(Align::Max), |ui| {
                if self.state.topbar_expanded {
                    self.fps_display_history(ui);
                } else {
                    self.fps_display(ui);
                }
                ui.separator();
                self.draw_orbit_toggle(ui);
                ui.checkbox(&mut self.state.show_labels, "Show labels");
            });
        });
    }

    fn focus_selector(&mut self, ui: &mut Ui) {
        let bodies = self.simulation.system().bodies();
        let selected = self
            .focus
            .body()
            .and_then(|index| bodies.get(index))
            .map(|body| body.name.clone());
        let names = bodies.iter().map(|b| b.name.clone()).collect::<Vec<_>>();
        containers::ComboBox::new("focus", "Focus")
            .selected_text(selected.as_deref().unwrap_or("Origin"))
            .show_ui(ui, |ui| {
                if ui.button("Origin").clicked() {
                    self.focus.clear();
                }
                for (index, name) in names.into_iter().enumerate() {
                    if ui.button(name).clicked() {
                        self.focus.set(index);
                    }
                }
            });
    }

    fn draw_orbit_toggle(&mut self, ui: &mut Ui) {
        let mut draw = **self.draw_orbits;
        if ui.checkbox(&mut draw, "Draw orbits").changed() {
            **self.draw_orbits = draw;
        };
    }

    fn fps_display(&mut self, ui: &mut Ui) {
        let Some(fps) = self.diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) else {
            return;
        };
        if !fps.is_enabled {
            return;
        }
        if ui
            .label(
                fps.average()
                    .map(|v| format!("FPS: {v:2.1} Hz"))
                    .unwrap_or_else(|| String::from("N/A")),
            )
            .double_clicked()
        {
            self.state.topbar_expanded = true;
        }
    }

    fn fps_display_history(&mut self, ui: &mut Ui) {
        let Some(fps) = self.diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) else {
            return;
        };
        if !fps.is_enabled {
            return;
        }
        let response = egui_plot::Plot::new("fps_history")
            .width(fps.history_len() as _)
            .allow_boxed_zoom(false)
            .allow_double_click_reset(false)
            .allow_scroll(false)
            .allow_drag(false)
            .allow_zoom(false)
            .show_x(false)
            .show_grid(false)
            .include_y(0.0)
            .show(ui, |ui| {
                ui.line(egui_plot::Line::new(PlotPoints::Owned(
                    fps.values()
                        .enumerate()
                        .map(|(i, &v)| PlotPoint::new(i as f64, v))
                        .collect::<Vec<_>>(),
                )));
            })
            .response;
        if response.double_clicked() {
            self.state.topbar_expanded = false;
        }
    }

    fn details_panel(&mut self, ctx: &egui::Context) {
        if !self.simulation.panel().is_visible() {
            return;
        }
        let texture = self.detail_texture();
        let panel = self.simulation.panel().clone();
        let mut close = false;
        let rect = egui::SidePanel::new(Side::Right, "details")
            .exact_width(DETAIL_PANEL_WIDTH)
            .resizable(false)
            .frame(default_blurry_frame())
            .show(ctx, |ui| {
                ui.heading(panel.title());
                ui.separator();
                if let Some(texture) = texture {
                    ui.add(egui::Image::new(texture).shrink_to_fit());
                }
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.label(panel.text());
                });
                ui.with_layout(egui::Layout::bottom_up(Align::Max), |ui| {
                    close = ui.button("Close").clicked();
                });
            })
            .response
            .rect;
        self.blur(ctx, rect);
        if close {
            self.simulation.push(ControlEvent::DismissDetails);
        }
    }

    /// The detail panel's picture, once it has loaded. Loads it on first request.
    fn detail_texture(&mut self) -> Option<SizedTexture> {
        let path = self.simulation.panel().image().to_string();
        let stale = self
            .state
            .detail_image
            .as_ref()
            .map_or(true, |image| image.path != path);
        if stale {
            if let Some(previous) = self.state.detail_image.take() {
                self.egui_textures.remove_image(&previous.handle);
            }
            let handle = self.asset_server.load::<Image>(path.clone());
            let texture = self.egui_textures.add_image(handle.clone());
            debug!("Loading detail image {path}");
            self.state.detail_image = Some(DetailImage {
                path,
                handle,
                texture,
            });
        }

        let image = self.state.detail_image.as_ref()?;
        let size = self.images.get(&image.handle)?.size_f32();
        let width = DETAIL_PANEL_WIDTH;
        Some(SizedTexture::new(
            image.texture,
            [width, width * size.y / size.x.max(1.0)],
        ))
    }

    fn labels(&mut self, ctx: &egui::Context) {
        if !self.state.show_labels {
            return;
        }
        // Painted without an area, so clicks still reach the scene underneath.
        let painter = ctx.layer_painter(egui::LayerId::background());
        let scale_factor = ctx.options(|op| op.zoom_factor);
        for label in self.simulation.labels() {
            let Some(screen) = label.screen else {
                continue;
            };
            painter.text(
                egui::pos2(screen.x, screen.y) / scale_factor,
                egui::Align2::CENTER_CENTER,
                &label.name,
                FontId::proportional(LABEL_FONT_SIZE),
                egui::Color32::WHITE,
            );
        }
    }
}

fn default_blurry_frame() -> egui::Frame {
    let default_frame = egui::Frame::default();
    let [r, g, b, _] = default_frame.fill.to_array();
    default_frame
        .fill(egui::Color32::from_rgba_unmultiplied(r, g, b, 128))
        .inner_margin(egui::vec2(8.0, 6.0))
}
