use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_blur_regions::EguiWindowBlurExt;
use bevy_egui::EguiContext;
use bevy_inspector_egui::bevy_inspector;
use egui::containers;
use solar_system::Simulation;

pub struct Plugin;

impl bevy::prelude::Plugin for Plugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, inspector_ui);
    }
}

fn inspector_ui(world: &mut World) {
    let Ok(mut ctx) = world
        .query_filtered::<&mut EguiContext, With<PrimaryWindow>>()
        .get_single_mut(world)
        .map(|ctx| ctx.clone())
    else {
        return;
    };

    containers::Window::new("Simulation")
        .frame(super::default_blurry_frame())
        .default_open(false)
        .show_with_blur(ctx.get_mut(), |ui| {
            let Some(simulation) = world.get_resource::<Simulation>() else {
                ui.disable();
                ui.label("No simulation");
                return;
            };
            ui.label(format!(
                "Frame {} | viewport {}x{} | {} pending events",
                simulation.frame(),
                simulation.viewport().width,
                simulation.viewport().height,
                simulation.pending_events()
            ));
            egui::Grid::new("bodies").striped(true).show(ui, |ui| {
                ui.strong("Body");
                ui.strong("Kind");
                ui.strong("Orbital angle");
                ui.strong("Position");
                ui.end_row();
                for body in simulation.system().bodies() {
                    ui.label(&body.name);
                    ui.label(format!("{:?}", body.kind));
                    ui.label(format!("{:.3} rad", body.orbital_angle));
                    ui.label(format!(
                        "{:.2}, {:.2}, {:.2}",
                        body.position.x, body.position.y, body.position.z
                    ));
                    ui.end_row();
                }
            });
        });

    containers::Window::new("Inspector")
        .frame(super::default_blurry_frame())
        .show_with_blur(ctx.get_mut(), |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                bevy_inspector::ui_for_world_entities(world, ui);
            });
        });
}
