//! Window, event loop and the glue between shell, tasks, scene and UI

use std::sync::Arc;

use log::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::{
    catalog::CatalogSource,
    config::ViewerConfig,
    error::{Result, ViewerError},
    gfx::{
        camera::CameraManager,
        rendering::RenderEngine,
        scene::{Scene, SceneContent},
    },
    ui::{viewer_panel, PanelAction, UiManager},
    viewer::{ModelLoader, ShellPhase, TaskRunner, ViewerEvent, ViewerShell},
};

pub struct ViewerApp {
    event_loop: Option<EventLoop<ViewerEvent>>,
    app_state: AppState,
}

struct AppState {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    shell: ViewerShell,
    tasks: TaskRunner,
    catalog_requested: bool,
}

impl ViewerApp {
    /// Creates the event loop, HTTP client and task runtime.
    ///
    /// Nothing is fetched until the window and GPU are ready.
    pub fn new(config: ViewerConfig) -> Result<Self> {
        let event_loop = EventLoop::<ViewerEvent>::with_user_event()
            .build()
            .map_err(|e| ViewerError::Platform(e.to_string()))?;

        let client = config.http_client()?;
        let tasks = TaskRunner::new(
            event_loop.create_proxy(),
            CatalogSource::new(client.clone(), config.endpoint.clone()),
            ModelLoader::new(client),
        )
        .map_err(|e| ViewerError::Platform(e.to_string()))?;

        let aspect = config.window_width as f32 / config.window_height.max(1) as f32;
        let scene = Scene::new(CameraManager::for_viewer(config.fovy_degrees, aspect));

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                ui_manager: None,
                scene,
                shell: ViewerShell::new(),
                tasks,
                catalog_requested: false,
            },
        })
    }

    /// Runs the event loop until the window closes
    pub fn run(mut self) -> Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .ok_or_else(|| ViewerError::Platform("event loop already consumed".into()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .map_err(|e| ViewerError::Platform(e.to_string()))
    }
}

impl AppState {
    /// Hands a new model request to the task runner, or swaps in the placeholder
    fn sync_model(&mut self) {
        if let Some(request) = self.shell.pending_load() {
            self.scene.clear();
            self.tasks.load_model(request);
            return;
        }

        match scene_target(&self.shell) {
            SceneContent::Empty if self.scene.content() != SceneContent::Empty => {
                self.tasks.cancel_model_load();
                self.scene.clear();
            }
            SceneContent::Placeholder if self.scene.content() != SceneContent::Placeholder => {
                self.tasks.cancel_model_load();
                self.scene.show_placeholder();
            }
            _ => (),
        }
    }

    fn apply_panel_action(&mut self, action: PanelAction) {
        match action {
            PanelAction::SetFilter(filter) => self.shell.set_filter(filter),
            PanelAction::Previous => self.shell.previous_product(),
            PanelAction::Next => self.shell.next_product(),
        }
        self.sync_model();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state == ElementState::Pressed {
            match event.physical_key {
                PhysicalKey::Code(KeyCode::Escape) => {
                    event_loop.exit();
                    return;
                }
                PhysicalKey::Code(KeyCode::ArrowLeft) => {
                    self.apply_panel_action(PanelAction::Previous);
                    return;
                }
                PhysicalKey::Code(KeyCode::ArrowRight) => {
                    self.apply_panel_action(PanelAction::Next);
                    return;
                }
                _ => (),
            }
        }

        // Shift tracking and Shift+C
        self.scene.camera_manager.process_keyboard_event(event);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(render_engine), Some(window)) = (self.render_engine.as_mut(), self.window.as_ref())
        else {
            return;
        };

        self.scene.update();
        render_engine.update(self.scene.camera_manager.camera.uniform);

        let mut action = None;
        let result = match self.ui_manager.as_mut() {
            Some(ui_manager) => {
                let shell = &self.shell;
                let source_label = self.config.endpoint.as_str();
                render_engine.render_frame(
                    &self.scene,
                    Some(|device: &wgpu::Device,
                          queue: &wgpu::Queue,
                          encoder: &mut wgpu::CommandEncoder,
                          color_attachment: &wgpu::TextureView| {
                        ui_manager.draw(device, queue, encoder, window, color_attachment, |ui| {
                            action = viewer_panel(ui, shell, source_label);
                        });
                    }),
                )
            }
            None => render_engine.render_frame(
                &self.scene,
                None::<fn(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView)>,
            ),
        };

        if let Err(e) = result {
            error!("Rendering failed: {}", e);
            event_loop.exit();
            return;
        }

        if let Some(action) = action {
            self.apply_panel_action(action);
        }
    }
}

/// What the viewport should hold for the shell's current state.
///
/// Only the browsing layout has a viewport worth drawing, and a filter
/// without matches shows its message over an empty one.
fn scene_target(shell: &ViewerShell) -> SceneContent {
    if shell.phase() != &ShellPhase::Browsing || shell.pagination().is_empty() {
        SceneContent::Empty
    } else if shell.model_state().shows_placeholder() {
        SceneContent::Placeholder
    } else {
        SceneContent::Model
    }
}

impl ApplicationHandler<ViewerEvent> for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title("Vitrine")
            .with_inner_size(LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));
        let window_handle = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window_handle.clone());

        let (width, height) = window_handle.inner_size().into();

        let window_clone = window_handle.clone();
        let renderer = match pollster::block_on(RenderEngine::new(window_clone, width, height)) {
            Ok(renderer) => renderer,
            Err(e) => {
                error!("Failed to initialise rendering: {}", e);
                event_loop.exit();
                return;
            }
        };

        self.scene
            .init_gpu_resources(renderer.device(), renderer.transform_layout());
        self.scene
            .camera_manager
            .camera
            .resize_projection(width, height);

        let mut ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window_handle,
            self.config.font_size,
        );
        ui_manager.update_display_size(width, height);

        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);

        if !self.catalog_requested {
            self.catalog_requested = true;
            self.tasks.fetch_catalog();
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: ViewerEvent) {
        match event {
            ViewerEvent::CatalogFetched(result) => {
                self.shell.on_catalog(result);
                self.sync_model();
            }
            ViewerEvent::ModelProgress { ticket, fraction } => {
                self.shell.on_model_progress(ticket, fraction);
            }
            ViewerEvent::ModelLoaded { ticket, object } => {
                let Some(object) = self.shell.accept_model(ticket, object) else {
                    return;
                };
                match self.render_engine.as_ref() {
                    Some(render_engine) => {
                        info!("Showing '{}'", object.name);
                        self.scene.show_model(
                            object,
                            render_engine.device(),
                            render_engine.transform_layout(),
                        );
                        debug!("{:?}", self.scene.get_statistics());
                    }
                    None => warn!("Model '{}' arrived without a GPU device", object.name),
                }
            }
            ViewerEvent::ModelFailed { ticket, error } => {
                if self.shell.on_model_failed(ticket, error) {
                    self.scene.show_placeholder();
                }
            }
        }

        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // UI gets the first look at input
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(&window, &ui_event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene
                    .camera_manager
                    .camera
                    .resize_projection(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        // Don't orbit while the pointer is over the UI
        if let Some(ui_manager) = self.ui_manager.as_ref() {
            if ui_manager.wants_input() {
                return;
            }
        }

        self.scene.camera_manager.process_event(&event, window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::Product, viewer::FilterState};

    #[test]
    fn test_scene_target_follows_browsing_state() {
        let mut shell = ViewerShell::new();
        assert_eq!(scene_target(&shell), SceneContent::Empty);

        shell.on_catalog(Ok(vec![
            Product::new("Plain Shirt", None),
            Product::new("Nike Air", Some("https://cdn/a.glb")),
        ]));
        assert_eq!(scene_target(&shell), SceneContent::Placeholder);

        shell.next_product();
        assert_eq!(scene_target(&shell), SceneContent::Model);
    }

    #[test]
    fn test_filter_without_matches_clears_the_viewport() {
        let mut shell = ViewerShell::new();
        shell.on_catalog(Ok(vec![Product::new("Plain Shirt", None)]));
        assert_eq!(scene_target(&shell), SceneContent::Placeholder);

        shell.set_filter(FilterState::Fashion);
        assert!(shell.pagination().is_empty());
        assert_eq!(scene_target(&shell), SceneContent::Empty);

        shell.set_filter(FilterState::All);
        assert_eq!(scene_target(&shell), SceneContent::Placeholder);
    }
}
