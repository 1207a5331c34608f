//! Window, event loop and per-frame driving of the scene and renderer

use std::{sync::Arc, time::Instant};

use anyhow::{Context, Result};
use log::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::AppConfig,
    controller::SceneController,
    gfx::RenderEngine,
    ui::{debug_panel, title_overlay, PanelAction, UiManager},
};

pub struct GeometryWarsApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: AppConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    controller: SceneController,
    started: Instant,
    /// First fatal error; stops the event loop and is returned from `run`
    error: Option<anyhow::Error>,
}

impl GeometryWarsApp {
    pub fn new(config: AppConfig) -> Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;

        let (width, height) = config.window_size;
        let controller = SceneController::new(&config, width as f32 / height.max(1) as f32);

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                ui_manager: None,
                controller,
                started: Instant::now(),
                error: None,
            },
        })
    }

    /// Runs the event loop until the window closes
    pub fn run(mut self) -> Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .context("event loop terminated abnormally")?;

        match self.app_state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (width, height) = self.config.window_size;
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title(self.config.window_title.clone())
                    .with_inner_size(LogicalSize::new(width, height)),
            )
            .context("failed to create window")?;
        let window = Arc::new(window);

        let (width, height) = window.inner_size().into();
        let surface_target = window.clone();
        let renderer = pollster::block_on(RenderEngine::new(surface_target, width, height))
            .context("failed to initialize renderer")?;

        let ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
        );

        self.controller
            .scene_mut()
            .camera
            .resize_projection(width, height);
        info!("Window ready at {}x{}", width, height);

        self.window = Some(window);
        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
        // The startup sequence is timed from the moment the window opens.
        self.started = Instant::now();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{:#}", err);
        if self.error.is_none() {
            self.error = Some(err);
        }
        event_loop.exit();
    }

    fn redraw(&mut self, window: &Window) -> Result<()> {
        self.controller.update(self.started.elapsed());

        let title = self.controller.title();
        let mut actions = Vec::new();
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let settings = self.controller.settings_mut();
            ui_manager.update_logic(window, |ui| {
                actions = debug_panel(ui, settings);
                title_overlay(ui, title);
            });
        }
        for action in actions {
            match action {
                PanelAction::LogCharacters => self.controller.log_characters(),
                PanelAction::LogCharacterIds => self.controller.log_character_ids(),
            }
        }

        let Some(render_engine) = self.render_engine.as_mut() else {
            return Ok(());
        };
        let opacity = self.controller.opacity();
        let (scene, settings) = self.controller.render_parts();
        let draw_ui = self.ui_manager.as_mut().map(|ui_manager| {
            move |device: &wgpu::Device,
                  queue: &wgpu::Queue,
                  encoder: &mut wgpu::CommandEncoder,
                  view: &wgpu::TextureView| {
                ui_manager.render(device, queue, encoder, view)
            }
        });

        render_engine
            .render_frame(scene, settings, opacity, draw_ui)
            .context("failed to render frame")
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init_window(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };

        if let Some(ui_manager) = self.ui_manager.as_mut() {
            if ui_manager.handle_input(&window, window_id, &event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            }
            | WindowEvent::CloseRequested => {
                info!("Closing");
                event_loop.exit();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if width == 0 || height == 0 {
                    return;
                }
                self.controller
                    .scene_mut()
                    .camera
                    .resize_projection(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw(&window) {
                    self.fail(event_loop, err);
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
