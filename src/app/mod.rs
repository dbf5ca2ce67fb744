use crate::config::{AppConfig, AppConfigOverrides};
use crate::panels::{FrameCtx, PanelQueue, PanelRegistry};
use crate::renderer::{render_egui, WindowSurface};
use crate::session::SessionState;
use anyhow::{Context as AnyhowContext, Result};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};

use egui::Context as EguiCtx;
use egui_wgpu::{Renderer as EguiRenderer, RendererOptions, ScreenDescriptor};
use egui_winit::State as EguiWinit;

pub mod file_prompt;
pub mod inspector_ui;

use file_prompt::{FileOpenPrompt, PromptOutcome};

pub async fn run_with_overrides(overrides: AppConfigOverrides) -> Result<()> {
    let mut config = AppConfig::load_or_default("config/app.json");
    if !overrides.is_empty() {
        println!("[cli] applying overrides: {}", overrides.applied_fields().join(", "));
        config.apply_overrides(&overrides);
    }
    let event_loop = EventLoop::new().context("Failed to create winit event loop")?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app).context("Event loop execution failed")?;
    Ok(())
}

pub struct App {
    surface: WindowSurface,
    should_close: bool,

    // egui
    egui_ctx: EguiCtx,
    egui_winit: Option<EguiWinit>,
    egui_renderer: Option<EguiRenderer>,
    egui_screen: Option<ScreenDescriptor>,

    session: SessionState,
    registry: PanelRegistry,
    panel_queue: PanelQueue,
    file_prompt: Option<FileOpenPrompt>,
    status: Option<String>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let mut session = SessionState::new();
        let mut status = None;
        if let Some(path) = &config.startup.container {
            if let Err(err) = session.load(path) {
                eprintln!("[session] startup load failed: {err:?}");
                status = Some(format!("Failed to load {path}: {err:#}"));
            }
        }
        let mut panel_queue = PanelQueue::new();
        panel_queue.open(inspector_ui::asset_browser_panel());
        Self {
            surface: WindowSurface::new(&config.window),
            should_close: false,
            egui_ctx: EguiCtx::default(),
            egui_winit: None,
            egui_renderer: None,
            egui_screen: None,
            session,
            registry: PanelRegistry::new(),
            panel_queue,
            file_prompt: None,
            status,
        }
    }

    fn frame_ui(&mut self, ctx: &EguiCtx) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.menu_button("Project", |menu| {
                    if menu.button("Open Pack\u{2026}").clicked() {
                        let initial = self
                            .session
                            .active()
                            .map(|loaded| loaded.source().display().to_string())
                            .unwrap_or_else(|| "assets/packs/demo_pack.json".to_string());
                        self.file_prompt = Some(FileOpenPrompt::new(initial));
                        menu.close();
                    }
                    if menu.button("Quit").clicked() {
                        self.should_close = true;
                        menu.close();
                    }
                });
            });
        });

        if let Some(prompt) = self.file_prompt.as_mut() {
            prompt.show(ctx);
            if prompt.ready() {
                match prompt.take_result() {
                    Some(PromptOutcome::Selected(path)) => {
                        match self.session.load(&path) {
                            Ok(()) => self.status = None,
                            Err(err) => {
                                eprintln!("[session] load failed: {err:?}");
                                self.status =
                                    Some(format!("Failed to load {}: {err:#}", path.display()));
                            }
                        }
                    }
                    Some(PromptOutcome::Cancelled) | None => {}
                }
                self.file_prompt = None;
            }
        }

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match (&self.status, self.session.active_label()) {
                    (Some(status), _) => {
                        ui.colored_label(egui::Color32::LIGHT_RED, status.clone());
                    }
                    (None, Some(label)) => {
                        ui.label(label.to_string());
                        let decoded =
                            self.session.active().map(|loaded| loaded.cached_count()).unwrap_or(0);
                        ui.weak(format!("{decoded} decoded"));
                    }
                    (None, None) => {
                        ui.weak("No container loaded");
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(format!("{} panels", self.registry.live_count()));
                });
            });
        });

        let mut frame_ctx =
            FrameCtx { session: &mut self.session, panels: &mut self.panel_queue };
        self.registry.render_all(ctx, &mut frame_ctx);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(err) = self.surface.ensure_window(event_loop) {
            eprintln!("Renderer initialization error: {err:?}");
            self.should_close = true;
            return;
        }
        if self.egui_winit.is_none() {
            if let Some(window) = self.surface.window() {
                let state = EguiWinit::new(
                    self.egui_ctx.clone(),
                    egui::ViewportId::ROOT,
                    window,
                    Some(1.0),
                    window.theme(),
                    None,
                );
                self.egui_winit = Some(state);
            }
        }
        let egui_renderer = match (self.surface.device(), self.surface.surface_format()) {
            (Ok(device), Ok(format)) => EguiRenderer::new(device, format, RendererOptions::default()),
            (Err(err), _) | (_, Err(err)) => {
                eprintln!("Unable to initialize egui renderer: {err:?}");
                self.should_close = true;
                return;
            }
        };
        self.egui_renderer = Some(egui_renderer);
        let size = self.surface.size();
        self.egui_screen = Some(ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: 1.0,
        });
    }

    fn window_event(&mut self, _el: &ActiveEventLoop, id: winit::window::WindowId, event: WindowEvent) {
        let mut consumed = false;
        if let (Some(window), Some(state)) = (self.surface.window(), self.egui_winit.as_mut()) {
            if id == window.id() {
                let resp = state.on_window_event(window, &event);
                if resp.consumed {
                    consumed = true;
                }
            }
        }
        if consumed {
            return;
        }

        match &event {
            WindowEvent::CloseRequested => self.should_close = true,
            WindowEvent::Resized(size) => {
                self.surface.resize(*size);
                if let Some(sd) = &mut self.egui_screen {
                    sd.size_in_pixels = [size.width, size.height];
                }
            }
            WindowEvent::KeyboardInput { event: KeyEvent { logical_key, state, .. }, .. } => {
                if let Key::Named(NamedKey::Escape) = logical_key {
                    if *state == ElementState::Pressed {
                        self.should_close = true;
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_close {
            event_loop.exit();
            return;
        }

        // Panels queued during the previous frame join the live set here,
        // before any UI for this frame is built.
        self.registry.flush_pending(&mut self.panel_queue);

        let frame = match self.surface.acquire_surface_frame() {
            Ok(frame) => frame,
            Err(err) => {
                eprintln!("Render error: {err:?}");
                return;
            }
        };

        let raw_input = match (self.surface.window(), self.egui_winit.as_mut()) {
            (Some(window), Some(state)) => state.take_egui_input(window),
            _ => {
                frame.present();
                return;
            }
        };

        let egui_ctx = self.egui_ctx.clone();
        let full_output = egui_ctx.run(raw_input, |ctx| self.frame_ui(ctx));
        let egui::FullOutput { platform_output, textures_delta, shapes, .. } = full_output;
        if let (Some(window), Some(state)) = (self.surface.window(), self.egui_winit.as_mut()) {
            state.handle_platform_output(window, platform_output);
        }

        if let (Some(painter), Some(screen)) =
            (self.egui_renderer.as_mut(), self.egui_screen.as_ref())
        {
            if let (Ok(device), Ok(queue)) = (self.surface.device(), self.surface.queue()) {
                for (id, delta) in &textures_delta.set {
                    painter.update_texture(device, queue, *id, delta);
                }
                let meshes = self.egui_ctx.tessellate(shapes, screen.pixels_per_point);
                if let Err(err) = render_egui(device, queue, painter, &meshes, screen, frame) {
                    eprintln!("Egui render error: {err:?}");
                }
                for id in &textures_delta.free {
                    painter.free_texture(id);
                }
            } else {
                frame.present();
            }
        } else {
            frame.present();
        }

        if let Some(window) = self.surface.window() {
            window.request_redraw();
        }
    }
}
