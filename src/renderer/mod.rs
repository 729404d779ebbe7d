pub mod camera;
pub mod canvas;
pub mod frame;
pub mod gpu;

pub use camera::{RenderMode, ViewState};
pub use canvas::{EguiCanvas, replay};
pub use frame::render_frame;
pub use gpu::GpuState;
