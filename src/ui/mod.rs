pub mod panels;
pub mod theme;

pub use panels::{draw_info_panel, draw_status_overlay};
pub use theme::apply_theme;
