mod config;

use anyhow::{Context, Result};
use clap::Parser;
use config::ViewerConfig;
use deskscene_input::{HeldKeys, Key};
use deskscene_render_wgpu::WgpuBackend;
use deskscene_scene::{LightRig, SceneComposer};
use deskscene_view::ViewController;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Scroll lines per pixel of trackpad motion.
const PIXELS_PER_LINE: f64 = 20.0;

#[derive(Parser)]
#[command(name = "deskscene-desktop", about = "Interactive desk still-life viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML viewer config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Texture directory, overrides the config file
    #[arg(long)]
    textures: Option<PathBuf>,
}

fn map_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyO => Key::O,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Escape => Key::Escape,
        _ => return None,
    })
}

/// GPU objects that exist once the window is up.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    backend: WgpuBackend,
}

struct DeskApp {
    settings: ViewerConfig,
    view: ViewController,
    scene: SceneComposer,
    keys: HeldKeys,
    gpu: Option<Gpu>,
}

impl DeskApp {
    fn new(settings: ViewerConfig) -> Self {
        let lights = LightRig::default().with_positions(settings.light_positions);
        let scene = SceneComposer::new(&settings.texture_dir).with_lights(lights);
        let view = ViewController::new(Instant::now()).with_sensitivity(settings.mouse_sensitivity);
        Self {
            settings,
            view,
            scene,
            keys: HeldKeys::new(),
            gpu: None,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = self.view.create_window(event_loop, &self.settings.title)?;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("deskscene_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        let mut backend =
            WgpuBackend::new(device, queue, surface_format, config.width, config.height);
        backend.set_clear_color(self.settings.clear_color);
        self.scene.prepare_scene(&mut backend);

        self.gpu = Some(Gpu {
            window,
            surface,
            config,
            backend,
        });
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        gpu.config.width = width.max(1);
        gpu.config.height = height.max(1);
        gpu.surface.configure(gpu.backend.device(), &gpu.config);
        gpu.backend.resize(gpu.config.width, gpu.config.height);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        gpu.backend.begin_frame();
        self.view.prepare_frame(Instant::now(), &self.keys, &mut gpu.backend);
        if self.view.close_requested() {
            self.shutdown(event_loop);
            return;
        }
        self.scene.render_scene(&mut gpu.backend);

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(gpu.backend.device(), &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        gpu.backend.end_frame(&target);
        output.present();
        gpu.window.request_redraw();
    }

    /// Releases are not delivered to an unfocused window, so held keys are dropped.
    fn focus_changed(&mut self, focused: bool) {
        if !focused {
            tracing::debug!(held = self.keys.len(), "focus lost, releasing keys");
            self.keys.clear();
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &mut self.gpu {
            self.scene.destroy_textures(&mut gpu.backend);
        }
        self.gpu = None;
        event_loop.exit();
    }
}

impl ApplicationHandler for DeskApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        if let Err(e) = self.init_gpu(event_loop) {
            tracing::error!("startup failed: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.shutdown(event_loop);
            }
            WindowEvent::Resized(new_size) => {
                self.resize(new_size.width, new_size.height);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                if let Some(key) = map_key(code) {
                    self.keys.set(key, state == ElementState::Pressed);
                }
            }
            WindowEvent::Focused(focused) => {
                self.focus_changed(focused);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let scale = self.gpu.as_ref().map_or(1.0, |g| g.window.scale_factor());
                let logical = position.to_logical::<f64>(scale);
                self.view.mouse_moved(logical.x as f32, logical.y as f32);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
                };
                self.view.scrolled(dy);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut settings = match &cli.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    if let Some(dir) = cli.textures {
        settings.texture_dir = dir;
    }

    tracing::info!(textures = %settings.texture_dir.display(), "deskscene-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = DeskApp::new(settings);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::time::Duration;

    #[test]
    fn every_viewer_key_has_a_code() {
        let mapped: Vec<Key> = [
            KeyCode::KeyW,
            KeyCode::KeyA,
            KeyCode::KeyS,
            KeyCode::KeyD,
            KeyCode::KeyQ,
            KeyCode::KeyE,
            KeyCode::KeyP,
            KeyCode::KeyO,
            KeyCode::Digit1,
            KeyCode::Digit2,
            KeyCode::Digit3,
            KeyCode::Escape,
        ]
        .into_iter()
        .filter_map(map_key)
        .collect();
        assert_eq!(mapped, Key::ALL.to_vec());
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        assert_eq!(map_key(KeyCode::Space), None);
        assert_eq!(map_key(KeyCode::ShiftLeft), None);
    }

    #[test]
    fn focus_loss_stops_held_movement() {
        let mut app = DeskApp::new(ViewerConfig::default());
        let start = Instant::now();
        app.view.update(start, &app.keys);

        app.keys.set(Key::W, true);
        app.view.update(start + Duration::from_millis(100), &app.keys);
        let moved_to = app.view.camera().position;
        assert_ne!(moved_to, Vec3::new(0.0, 5.0, 12.0));

        app.focus_changed(true);
        assert!(!app.keys.is_empty());
        app.focus_changed(false);
        assert!(app.keys.is_empty());

        app.view.update(start + Duration::from_secs(1), &app.keys);
        assert_eq!(app.view.camera().position, moved_to);
    }
}
