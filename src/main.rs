use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use clap::Parser;
use glam::Vec2;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

mod config;
mod input;
mod math;
mod renderer;
mod ui;

use config::{Cli, ViewerConfig};
use input::{Command, InputState};
use math::{LoaderEngine, LoaderResult, Scene};
use renderer::{EguiCanvas, GpuState, ViewState, render_frame, replay};
use ui::{apply_theme, draw_info_panel, draw_status_overlay};

struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    egui_state: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    egui_ctx: egui::Context,

    config: ViewerConfig,
    scene: Scene,
    view: ViewState,
    input: InputState,
    loader: LoaderEngine,

    last_frame_time: Instant,
}

impl App {
    fn new(config: ViewerConfig, scene: Scene) -> Self {
        let (width, height) = config.window_size;
        let view = ViewState::new(Vec2::new(width as f32, height as f32), config.projection);

        Self {
            window: None,
            gpu: None,
            egui_state: None,
            egui_renderer: None,
            egui_ctx: egui::Context::default(),

            config,
            scene,
            view,
            input: InputState::default(),
            loader: LoaderEngine::new(),

            last_frame_time: Instant::now(),
        }
    }

    fn init_gpu(&mut self, window: Arc<Window>) -> anyhow::Result<()> {
        let gpu = pollster::block_on(GpuState::new(window.clone(), ui::theme::BG_SCENE))?;

        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            self.egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2048),
        );

        let egui_renderer =
            egui_wgpu::Renderer::new(&gpu.device, gpu.config.format, None, 1, false);

        apply_theme(&self.egui_ctx);

        let size = window.inner_size();
        self.view
            .set_viewport(size.width as f32, size.height as f32);
        self.view.reset();

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.egui_state = Some(egui_state);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    fn update(&mut self, event_loop: &ActiveEventLoop) {
        for command in self.input.take_commands() {
            debug!(?command, "command");
            match command {
                Command::Quit => {
                    self.loader.stop();
                    event_loop.exit();
                    return;
                }
                Command::Reload => {
                    info!(path = %self.config.file.display(), "reloading");
                    self.loader
                        .request_load(&self.config.file, self.config.scene);
                }
                other => {
                    self.view.apply(other);
                }
            }
        }

        self.view.process_controls(&self.input.controls());
        self.view.tick();

        while let Some(result) = self.loader.try_recv_result() {
            match result {
                LoaderResult::Loaded(scene) => self.scene = *scene,
                LoaderResult::Error(e) => debug!(error = %e, "keeping previous scene"),
            }
        }
    }

    fn render(&mut self) {
        let frame_duration = Duration::from_secs_f64(1.0 / self.config.fps as f64);
        let elapsed = self.last_frame_time.elapsed();
        if elapsed < frame_duration {
            std::thread::sleep(frame_duration - elapsed);
        }
        self.last_frame_time = Instant::now();

        let (Some(window), Some(egui_state)) = (&self.window, &mut self.egui_state) else {
            return;
        };

        let raw_input = egui_state.take_egui_input(window);
        let commands = render_frame(&self.scene, &self.view);
        let reload_error = self.loader.last_error();

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::background());
            let mut canvas = EguiCanvas::new(&painter, ctx.pixels_per_point());
            replay(&commands, &mut canvas);

            draw_info_panel(ctx, &self.scene, &self.view);
            draw_status_overlay(ctx, &self.scene, &self.view, reload_error.as_deref());
        });

        let Some(gpu) = &mut self.gpu else { return };
        let Some(window) = &self.window else { return };
        let Some(egui_state) = &mut self.egui_state else {
            return;
        };
        let Some(egui_renderer) = &mut self.egui_renderer else {
            return;
        };

        egui_state.handle_platform_output(window, full_output.platform_output);

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.resize(gpu.size);
                return;
            }
            Err(e) => {
                error!(error = %e, "failed to acquire surface texture");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, delta) in full_output.textures_delta.set {
            egui_renderer.update_texture(&gpu.device, &gpu.queue, id, &delta);
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Main Encoder"),
            });

        egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        gpu.clear(&view, &mut encoder);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut render_pass = render_pass.forget_lifetime();
            egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        for id in full_output.textures_delta.free {
            egui_renderer.free_texture(&id);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let (width, height) = self.config.window_size;
        let window_attrs = Window::default_attributes()
            .with_title("FdF 3D Viewer")
            .with_inner_size(PhysicalSize::new(width, height));

        let result = event_loop
            .create_window(window_attrs)
            .context("failed to create window")
            .and_then(|window| self.init_gpu(Arc::new(window)));

        if let Err(e) = result {
            let message = format!("{e:#}");
            error!(error = %message, "failed to initialise display");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(egui_state) = &mut self.egui_state {
            if let Some(window) = &self.window {
                let response = egui_state.on_window_event(window, &event);
                if response.consumed {
                    return;
                }
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                self.loader.stop();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size);
                    self.view
                        .set_viewport(size.width as f32, size.height as f32);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.input
                        .handle_key(key, event.state == ElementState::Pressed, event.repeat);
                }
            }

            WindowEvent::Focused(false) => self.input.release_all(),

            WindowEvent::RedrawRequested => {
                self.update(event_loop);
                self.render();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fdf3d=info")),
        )
        .init();

    let config = ViewerConfig::from(Cli::parse());

    let scene = Scene::load(&config.file, config.scene)
        .with_context(|| format!("failed to load {}", config.file.display()))?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, scene);
    event_loop.run_app(&mut app)?;
    Ok(())
}
