use egui::{Color32, Context, RichText, Ui};

use crate::math::Scene;
use crate::renderer::ViewState;
use crate::ui::theme::*;

const CONTROLS: &[&str] = &[
    "W/S - Rotate X",
    "A/D - Rotate Y",
    "Q/E - Rotate Z",
    "+/- - Zoom",
    "Arrows - Move",
    "1/2/3 - Modes",
    "P - Projection",
    "R - Reset",
    "T - Auto rotate",
    "G - Grid",
    "X - Axes",
    "L/F5 - Reload",
    "ESC - Quit",
];

pub fn draw_info_panel(ctx: &Context, scene: &Scene, view: &ViewState) {
    egui::Area::new(egui::Id::new("info_panel"))
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 10.0))
        .show(ctx, |ui| {
            overlay_frame().show(ui, |ui| {
                stat(ui, "Points", scene.map.len().to_string());
                stat(ui, "Edges", scene.mesh.edges.len().to_string());
                stat(ui, "Faces", scene.mesh.faces.len().to_string());
                stat(
                    ui,
                    "Height",
                    format!("{:.1} - {:.1}", scene.map.min_z, scene.map.max_z),
                );
                stat(ui, "Scale", format!("{:.1}", view.scale));
                stat(ui, "Rotation X", format!("{:.1}°", view.angle_x.to_degrees()));
                stat(ui, "Rotation Y", format!("{:.1}°", view.angle_y.to_degrees()));
                stat(ui, "Mode", view.mode.label().to_string());
                stat(ui, "Projection", view.projection.label().to_string());

                ui.add_space(8.0);
                section_header(ui, "CONTROLS");
                for line in CONTROLS {
                    ui.label(RichText::new(*line).color(TEXT_MUTED).small());
                }
            });
        });
}

pub fn draw_status_overlay(ctx: &Context, scene: &Scene, view: &ViewState, error: Option<&str>) {
    egui::Area::new(egui::Id::new("status_overlay"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-10.0, 10.0))
        .show(ctx, |ui| {
            ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
                ui.heading(RichText::new("FdF VIEWER").color(TEXT_TITLE).strong());
                ui.label(RichText::new(scene.source.display().to_string()).color(TEXT_MUTED).small());
                ui.add_space(6.0);

                if view.auto_rotate {
                    ui.label(RichText::new("AUTO ROTATE: ON").color(STATUS_AUTO_ROTATE));
                }
                if view.show_grid {
                    ui.label(RichText::new("GRID: ON").color(STATUS_GRID));
                }
                if let Some(error) = error {
                    ui.add_space(6.0);
                    ui.label(RichText::new(format!("Reload failed: {error}")).color(STATUS_ERROR));
                }
            });
        });
}

fn overlay_frame() -> egui::Frame {
    egui::Frame::default()
        .fill(BG_OVERLAY)
        .rounding(6.0)
        .inner_margin(10.0)
}

fn section_header(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).color(TEXT_MUTED).size(11.0).strong());
    ui.add_space(4.0);
}

fn stat(ui: &mut Ui, name: &str, value: String) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(format!("{name}:")).color(TEXT_MUTED));
        ui.label(RichText::new(value).color(Color32::WHITE));
    });
}
