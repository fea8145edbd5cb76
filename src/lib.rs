//! Aim Trainer: click the growing-then-shrinking targets before they vanish.
//!
//! A single winit event loop drives all three screens (menu, playing, end)
//! as states of one `Screen` enum; the fixed-rate game rules live in
//! `session` and everything here is plumbing between winit, wgpu, and the
//! sound bank.

use std::path::Path;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use cgmath::Vector2;
use wgpu::util::DeviceExt;
use wgpu_text::{
    glyph_brush::{ab_glyph::FontArc, OwnedSection},
    BrushBuilder, TextBrush,
};
use winit::{
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowBuilder},
};

mod audio;
mod difficulty;
mod graphics;
mod hud;
mod session;
mod settings;
mod target;

use audio::SoundBank;
use difficulty::Difficulty;
use session::{Session, SessionStats};
use settings::Settings;

/// Game configuration constants.
pub mod consts {
    /// Logical canvas size. All gameplay coordinates live in this space.
    pub const WIDTH: u32 = 800;
    pub const HEIGHT: u32 = 600;

    /// Fixed game tick rate. Frames render as fast as the surface allows;
    /// the simulation advances in steps of `TICK_DT`.
    pub const TICK_RATE: f32 = 80.0;
    pub const TICK_DT: f32 = 1.0 / TICK_RATE;
    /// Maximum ticks per frame to prevent a spiral of death after a stall.
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Misses allowed before the session ends.
    pub const LIVES: u32 = 5;
    /// Concurrent target cap; the spawn timer skips while at the cap.
    pub const MAX_TARGETS: usize = 5;
    /// Spawn attempt every 500 ms of tick time.
    pub const SPAWN_INTERVAL_TICKS: u64 = 40;
    /// Targets spawn at least this far from every screen edge.
    pub const TARGET_PADDING: f32 = 50.0;

    pub const TOP_BAR_HEIGHT: f32 = 40.0;
}

use consts::*;

/// Worst-case vertex count for the per-frame geometry: the top bar plus a
/// full bullseye for every live target.
const SCENE_VERTEX_CAPACITY: usize = 6 + MAX_TARGETS * 5 * graphics::CIRCLE_SEGMENTS * 3;

enum Screen {
    Menu,
    Playing(Session),
    End(SessionStats),
}

struct State<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    render_pipeline: wgpu::RenderPipeline,
    gradient_buffer: wgpu::Buffer,
    gradient_vertex_count: u32,
    scene_buffer: wgpu::Buffer,
    scene_vertex_count: u32,

    brush: TextBrush<FontArc>,
    sounds: SoundBank,

    cursor_position: PhysicalPosition<f64>,
    screen: Screen,
    last_frame: Instant,
    accumulator: f32,
    should_exit: bool,

    // Declaring window after surface is important to ensure surface is
    // dropped first (it holds unsafe references to the window's resources)
    window: &'a Window,
}

/// Maps a physical cursor position onto the 800x600 canvas.
fn cursor_to_canvas(pos: PhysicalPosition<f64>, size: PhysicalSize<u32>) -> Vector2<f32> {
    Vector2::new(
        (pos.x / size.width.max(1) as f64 * WIDTH as f64) as f32,
        (pos.y / size.height.max(1) as f64 * HEIGHT as f64) as f32,
    )
}

impl<'a> State<'a> {
    async fn new(window: &'a Window, settings: &Settings) -> Result<State<'a>> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create render surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable GPU adapter found")?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .context("failed to acquire GPU device")?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let surface_format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_capabilities.present_modes[0],
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let render_pipeline = graphics::create_pipeline(&device, config.format);

        // The background never changes, so its mesh is built and uploaded
        // exactly once.
        let gradient = graphics::build_gradient(graphics::BG_TOP, graphics::BG_BOTTOM);
        let gradient_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Gradient Buffer"),
            contents: bytemuck::cast_slice(&gradient),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let gradient_vertex_count = gradient.len() as u32;

        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Buffer"),
            size: (SCENE_VERTEX_CAPACITY * std::mem::size_of::<graphics::Vertex>())
                as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let font_path = settings.font_path();
        let font_bytes = std::fs::read(&font_path)
            .with_context(|| format!("missing font asset {}", font_path.display()))?;
        let font = FontArc::try_from_vec(font_bytes)
            .map_err(|_| anyhow!("invalid font file {}", font_path.display()))?;
        let brush = BrushBuilder::using_font(font).build(
            &device,
            config.width,
            config.height,
            config.format,
        );

        let sounds = SoundBank::load(settings)?;

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            render_pipeline,
            gradient_buffer,
            gradient_vertex_count,
            scene_buffer,
            scene_vertex_count: 0,

            brush,
            sounds,

            cursor_position: PhysicalPosition::new(0.0, 0.0),
            screen: Screen::Menu,
            last_frame: Instant::now(),
            accumulator: 0.0,
            should_exit: false,

            window,
        })
    }

    pub fn window(&self) -> &Window {
        self.window
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.brush.resize_view(
                self.config.width as f32,
                self.config.height as f32,
                &self.queue,
            );
        }
    }

    /// Handles an input event; returns true if it was consumed here.
    fn input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_position = *position;
                true
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if let Screen::Playing(session) = &mut self.screen {
                    session.register_click();
                }
                true
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => self.handle_key(*code),
            _ => false,
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        match (&self.screen, code) {
            (Screen::Menu, KeyCode::KeyE) => self.start_session(Difficulty::Easy),
            (Screen::Menu, KeyCode::KeyM) => self.start_session(Difficulty::Medium),
            (Screen::Menu, KeyCode::KeyH) => self.start_session(Difficulty::Hard),
            (Screen::End(_), KeyCode::KeyR) => {
                log::info!("restarting, back to menu");
                self.screen = Screen::Menu;
            }
            (Screen::End(_), KeyCode::KeyQ) => self.should_exit = true,
            _ => return false,
        }
        true
    }

    fn start_session(&mut self, difficulty: Difficulty) {
        log::info!("starting {} session", difficulty.label());
        self.screen = Screen::Playing(Session::new(difficulty));
        self.accumulator = 0.0;
        self.last_frame = Instant::now();
    }

    /// Advances the game clock. Only the playing screen animates; the menu
    /// and end screens are static until a key arrives.
    fn update(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        let cursor = cursor_to_canvas(self.cursor_position, self.size);
        if let Screen::Playing(session) = &mut self.screen {
            self.accumulator += dt;

            let mut steps = 0;
            let mut finished: Option<SessionStats> = None;
            while self.accumulator >= TICK_DT && steps < MAX_SUBSTEPS {
                self.accumulator -= TICK_DT;
                steps += 1;

                let feedback = session.tick(cursor);
                for _ in 0..feedback.hits {
                    self.sounds.play_hit();
                }
                for _ in 0..feedback.misses {
                    self.sounds.play_miss();
                }

                if session.is_over() {
                    finished = Some(session.stats());
                    break;
                }
            }
            if steps == MAX_SUBSTEPS {
                // Fell too far behind; drop the remainder instead of rushing
                // a burst of catch-up ticks.
                self.accumulator = 0.0;
            }

            if let Some(stats) = finished {
                log::info!(
                    "session over: {} hits / {} clicks in {}",
                    stats.hits,
                    stats.clicks,
                    hud::format_time(stats.elapsed)
                );
                self.screen = Screen::End(stats);
            }
        }
    }

    fn render(&mut self) -> std::result::Result<(), wgpu::SurfaceError> {
        let scale = self.config.width as f32 / WIDTH as f32;

        let mut scene: Vec<graphics::Vertex> = Vec::with_capacity(SCENE_VERTEX_CAPACITY);
        let sections: Vec<OwnedSection> = match &self.screen {
            Screen::Menu => hud::menu_sections(scale),
            Screen::Playing(session) => {
                for target in session.targets() {
                    target.tessellate(&mut scene);
                }
                // The bar covers any target poking into the top of the
                // screen, same as the original draw order.
                graphics::push_rect(
                    &mut scene,
                    0.0,
                    0.0,
                    WIDTH as f32,
                    TOP_BAR_HEIGHT,
                    graphics::AQUA,
                );
                hud::top_bar_sections(session.elapsed(), session.hits(), session.misses(), scale)
            }
            Screen::End(stats) => hud::end_sections(stats, scale),
        };

        self.scene_vertex_count = scene.len() as u32;
        if !scene.is_empty() {
            self.queue
                .write_buffer(&self.scene_buffer, 0, bytemuck::cast_slice(&scene));
        }

        let section_refs: Vec<&OwnedSection> = sections.iter().collect();
        if let Err(err) = self.brush.queue(&self.device, &self.queue, section_refs) {
            log::warn!("failed to queue text: {err:?}");
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);

            render_pass.set_vertex_buffer(0, self.gradient_buffer.slice(..));
            render_pass.draw(0..self.gradient_vertex_count, 0..1);

            if self.scene_vertex_count > 0 {
                render_pass.set_vertex_buffer(0, self.scene_buffer.slice(..));
                render_pass.draw(0..self.scene_vertex_count, 0..1);
            }

            self.brush.draw(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

pub async fn run() -> Result<()> {
    // When wgpu hits an error, it panics with a generic message and logs the
    // real error via the log crate. Initializing logging first keeps wgpu
    // from failing silently.
    env_logger::init();

    let settings = Settings::load(Path::new("settings.json"));

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let window = WindowBuilder::new()
        .with_inner_size(LogicalSize::new(WIDTH, HEIGHT))
        .with_resizable(false)
        .with_title("Aim Trainer")
        .build(&event_loop)
        .context("failed to create window")?;

    let mut state = State::new(&window, &settings).await?;

    event_loop
        .run(move |event, control_flow| match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == state.window().id() => {
                if state.input(event) {
                    if state.should_exit {
                        control_flow.exit();
                    }
                    return;
                }
                match event {
                    WindowEvent::CloseRequested
                    | WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                state: ElementState::Pressed,
                                physical_key: PhysicalKey::Code(KeyCode::Escape),
                                ..
                            },
                        ..
                    } => control_flow.exit(),
                    WindowEvent::Resized(physical_size) => {
                        state.resize(*physical_size);
                    }
                    WindowEvent::RedrawRequested if window_id == state.window().id() => {
                        // Tell winit that we want another frame after this one
                        state.window().request_redraw();

                        state.update();
                        match state.render() {
                            Ok(_) => {}
                            // Reconfigure the surface if lost
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                state.resize(state.size)
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("OutOfMemory");
                                control_flow.exit();
                            }
                            Err(wgpu::SurfaceError::Timeout) => {
                                // This happens when a frame takes too long to present
                                log::warn!("Surface timeout")
                            }
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        })
        .context("event loop error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_maps_to_canvas_space() {
        let size = PhysicalSize::new(1600u32, 1200u32);
        let center = cursor_to_canvas(PhysicalPosition::new(800.0, 600.0), size);
        assert_eq!(center, Vector2::new(400.0, 300.0));

        let corner = cursor_to_canvas(PhysicalPosition::new(1600.0, 1200.0), size);
        assert_eq!(corner, Vector2::new(800.0, 600.0));
    }

    #[test]
    fn scene_capacity_covers_a_full_board() {
        // Five targets, five rings each, plus the top bar quad.
        assert_eq!(SCENE_VERTEX_CAPACITY, 6 + 5 * 5 * 48 * 3);
    }
}
