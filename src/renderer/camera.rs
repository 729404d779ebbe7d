use glam::Vec2;

use crate::input::{Command, Controls};
use crate::math::Projection;

pub const DEFAULT_SCALE: f32 = 20.0;
pub const MIN_SCALE: f32 = 1.0;

const ROTATION_SPEED: f32 = 0.03;
const ZOOM_SPEED: f32 = 1.0;
const PAN_SPEED: f32 = 5.0;

const AUTO_YAW_STEP: f32 = 0.01;
const AUTO_PITCH_STEP: f32 = 0.005;
const ANIMATION_STEP: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    Wireframe,
    Points,
    Solid,
}

impl RenderMode {
    pub fn label(self) -> &'static str {
        match self {
            RenderMode::Wireframe => "WIREFRAME",
            RenderMode::Points => "POINTS",
            RenderMode::Solid => "SOLID",
        }
    }
}

fn default_angles() -> (f32, f32, f32) {
    (30.0_f32.to_radians(), -45.0_f32.to_radians(), 0.0)
}

pub struct ViewState {
    pub angle_x: f32,
    pub angle_y: f32,
    pub angle_z: f32,
    pub scale: f32,
    pub offset: Vec2,

    pub projection: Projection,
    pub mode: RenderMode,

    pub show_axes: bool,
    pub show_grid: bool,
    pub auto_rotate: bool,

    /// Clock driving the auto-rotate height ripple.
    pub time: f32,

    home_offset: Vec2,
}

impl ViewState {
    pub fn new(viewport: Vec2, projection: Projection) -> Self {
        let (angle_x, angle_y, angle_z) = default_angles();
        let home_offset = viewport / 2.0;

        Self {
            angle_x,
            angle_y,
            angle_z,
            scale: DEFAULT_SCALE,
            offset: home_offset,

            projection,
            mode: RenderMode::Wireframe,

            show_axes: true,
            show_grid: true,
            auto_rotate: false,

            time: 0.0,

            home_offset,
        }
    }

    /// Camera parameters only; toggles and modes survive a reset.
    pub fn reset(&mut self) {
        let (angle_x, angle_y, angle_z) = default_angles();
        self.angle_x = angle_x;
        self.angle_y = angle_y;
        self.angle_z = angle_z;
        self.scale = DEFAULT_SCALE;
        self.offset = self.home_offset;
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.home_offset = Vec2::new(width, height) / 2.0;
    }

    pub fn process_controls(&mut self, controls: &Controls) {
        self.angle_x += controls.pitch * ROTATION_SPEED;
        self.angle_y += controls.yaw * ROTATION_SPEED;
        self.angle_z += controls.roll * ROTATION_SPEED;

        self.scale = (self.scale + controls.zoom * ZOOM_SPEED).max(MIN_SCALE);
        self.offset += controls.pan * PAN_SPEED;
    }

    /// Applies a view command. Returns false for commands the view does not
    /// own (quit, reload).
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::ResetView => self.reset(),
            Command::ToggleAutoRotate => self.auto_rotate = !self.auto_rotate,
            Command::ToggleGrid => self.show_grid = !self.show_grid,
            Command::ToggleAxes => self.show_axes = !self.show_axes,
            Command::ToggleProjection => self.projection = self.projection.toggled(),
            Command::SetRenderMode(mode) => self.mode = mode,
            Command::Quit | Command::Reload => return false,
        }
        true
    }

    pub fn tick(&mut self) {
        if self.auto_rotate {
            self.angle_y += AUTO_YAW_STEP;
            self.angle_x += AUTO_PITCH_STEP;
        }
        self.time += ANIMATION_STEP;
    }
}
