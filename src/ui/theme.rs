use egui::{Color32, FontFamily, FontId, Stroke, TextStyle, Visuals};

pub const BG_SCENE: Color32 = Color32::from_rgb(15, 15, 35);
pub const BG_OVERLAY: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 170);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(220, 220, 220);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(140, 140, 160);
pub const TEXT_TITLE: Color32 = Color32::from_rgb(255, 255, 200);

pub const STATUS_AUTO_ROTATE: Color32 = Color32::from_rgb(0, 255, 100);
pub const STATUS_GRID: Color32 = Color32::from_rgb(100, 200, 255);
pub const STATUS_ERROR: Color32 = Color32::from_rgb(255, 110, 110);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgba_premultiplied(50, 51, 113, 77);

pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals = Visuals {
        override_text_color: Some(TEXT_PRIMARY),
        window_fill: BG_OVERLAY,
        window_stroke: Stroke::new(1.0, BORDER_SUBTLE),
        panel_fill: Color32::TRANSPARENT,
        ..Visuals::dark()
    };

    style.spacing.item_spacing = egui::vec2(8.0, 4.0);

    style.text_styles = [
        (TextStyle::Small, FontId::new(11.0, FontFamily::Monospace)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(20.0, FontFamily::Monospace)),
        (TextStyle::Monospace, FontId::new(13.0, FontFamily::Monospace)),
    ]
    .into();

    ctx.set_style(style);
}
