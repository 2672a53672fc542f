//! Standalone visualization window backed by winit.
//!
//! The window opens on the home particle field and shows one view at a
//! time. Number keys switch views, `B` pauses the home field, the bound
//! action keys start flows, and `Tab` toggles editing of the message that
//! encryption sends. Labels are drawn over the scene at their anchors;
//! results and the active view go into the window title. With the `gui`
//! feature, notices open a native message dialog; otherwise they are only
//! logged.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use ecviz::{service::CannedService, service::KeyPair, Viewer};
//! let service = Arc::new(CannedService::new(KeyPair {
//!     private_key: "d".into(),
//!     public_key: "Q".into(),
//! }));
//! Viewer::builder(service)
//!     .with_message("hello")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use rustc_hash::FxHashMap;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    engine::{CurveVizEngine, VizCommand},
    error::VizError,
    flows::FlowKind,
    gpu::render_context::RenderContext,
    host::{HostView, Notice, ResultField},
    input::{InputEvent, KeyAction},
    options::Options,
    renderer::SceneRenderer,
    scene::{ContainerId, LabelOverlay},
    service::CryptoService,
    util::{frame_timing::FrameTiming, text::abbreviate},
};

/// Longest message excerpt shown in the title.
const TITLE_MESSAGE_CHARS: usize = 24;

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    service: Arc<dyn CryptoService>,
    options: Option<Options>,
    message: String,
    title: String,
    target_fps: u32,
}

impl ViewerBuilder {
    fn new(service: Arc<dyn CryptoService>) -> Self {
        Self {
            service,
            options: None,
            message: String::new(),
            title: "ecviz".into(),
            target_fps: 60,
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Initial contents of the message field.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the window title prefix.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Cap the redraw rate (0 = uncapped).
    #[must_use]
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            service: self.service,
            options: self.options.unwrap_or_default(),
            message: self.message,
            title: self.title,
            target_fps: self.target_fps,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A window running the three flows against a crypto service.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    service: Arc<dyn CryptoService>,
    options: Options,
    message: String,
    title: String,
    target_fps: u32,
}

impl Viewer {
    /// Start a new builder for a viewer talking to `service`.
    #[must_use]
    pub fn builder(service: Arc<dyn CryptoService>) -> ViewerBuilder {
        ViewerBuilder::new(service)
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Viewer`] if the event loop cannot be created or
    /// exits with an error.
    pub fn run(self) -> Result<(), VizError> {
        let event_loop =
            EventLoop::new().map_err(|e| VizError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let engine =
            CurveVizEngine::new(self.options, self.service, WindowHost::default());
        let mut app = ViewerApp {
            window: None,
            gpu: None,
            engine,
            timing: FrameTiming::new(self.target_fps),
            message: self.message,
            editing: false,
            title: self.title,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| VizError::Viewer(e.to_string()))
    }
}

// ── Host ─────────────────────────────────────────────────────────────────

/// Host side of the window: result fields, label overlays and notices.
#[derive(Default)]
struct WindowHost {
    fields: FxHashMap<ResultField, String>,
    /// Latest overlays per container, drawn over that container's scene.
    labels: FxHashMap<ContainerId, Vec<LabelOverlay>>,
    /// Title needs rebuilding.
    dirty: bool,
}

impl HostView for WindowHost {
    fn notify(&mut self, notice: &Notice) {
        log::warn!("{notice}");
        #[cfg(feature = "gui")]
        {
            let level = match notice.level {
                crate::host::NoticeLevel::Warning => rfd::MessageLevel::Warning,
                crate::host::NoticeLevel::Failure => rfd::MessageLevel::Error,
            };
            let _ = rfd::MessageDialog::new()
                .set_level(level)
                .set_title(format!("ecviz: {}", notice.flow))
                .set_description(&notice.message)
                .set_buttons(rfd::MessageButtons::Ok)
                .show();
        }
    }

    fn write_field(&mut self, field: ResultField, text: &str) {
        let _ = self.fields.insert(field, text.to_owned());
        self.dirty = true;
    }

    fn place_labels(&mut self, container: &ContainerId, overlays: &[LabelOverlay]) {
        let slot = self.labels.entry(container.clone()).or_default();
        if slot.as_slice() != overlays {
            slot.clear();
            slot.extend_from_slice(overlays);
        }
    }
}

impl WindowHost {
    /// Overlays to draw over `container`'s scene.
    fn labels(&self, container: &ContainerId) -> &[LabelOverlay] {
        self.labels
            .get(container)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn title(
        &self,
        prefix: &str,
        flow: Option<FlowKind>,
        message: &str,
        editing: bool,
    ) -> String {
        let mut parts = vec![prefix.to_owned()];
        parts.push(flow.map_or_else(|| "[home]".to_owned(), |f| format!("[{f}]")));
        let cursor = if editing { "_" } else { "" };
        parts.push(format!(
            "msg \"{}{cursor}\"",
            abbreviate(message, TITLE_MESSAGE_CHARS)
        ));
        for (field, name) in [
            (ResultField::PublicKey, "Q"),
            (ResultField::Ciphertext, "ct"),
            (ResultField::Plaintext, "pt"),
        ] {
            if let Some(text) = self.fields.get(&field) {
                parts.push(format!("{name} {text}"));
            }
        }
        parts.join(" | ")
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Surface and renderer, created once the window exists.
struct Gpu {
    context: RenderContext,
    renderer: SceneRenderer,
}

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    engine: CurveVizEngine<WindowHost>,
    timing: FrameTiming,
    message: String,
    /// Keys edit the message instead of triggering bindings.
    editing: bool,
    title: String,
}

/// Surface size for a window, never zero.
fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

impl ViewerApp {
    fn refresh_title(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let title = self.engine.host().title(
            &self.title,
            self.engine.active_view(),
            &self.message,
            self.editing,
        );
        window.set_title(&title);
        self.engine.host_mut().dirty = false;
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(gpu) = &mut self.gpu {
            if gpu.context.resize(width, height) {
                gpu.renderer.resize(&gpu.context);
            }
        }
        self.engine
            .handle_input(InputEvent::Resized { width, height });
    }

    fn redraw(&mut self) {
        if !self.timing.should_render() {
            return;
        }
        self.engine.frame();
        if self.engine.host().dirty {
            self.refresh_title();
        }

        let Some(gpu) = &mut self.gpu else {
            let _ = self.timing.end_frame();
            return;
        };
        let result = match (self.engine.active_scene(), self.engine.hero()) {
            (Some(scene), _) => {
                let labels = self.engine.host().labels(scene.container());
                gpu.renderer.render(&gpu.context, scene, labels)
            }
            (None, Some(hero)) => gpu.renderer.render_hero(&gpu.context, hero),
            (None, None) => Ok(()),
        };
        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                gpu.context.reconfigure();
            }
            Err(e) => log::error!("render error: {e:?}"),
        }
        let _ = self.timing.end_frame();
        if self.timing.frames() % 600 == 0 {
            log::debug!("{:.1} fps", self.timing.fps());
        }
    }

    /// Keys while the message is being edited.
    fn edit_message(&mut self, event: &KeyEvent) {
        match event.physical_key {
            PhysicalKey::Code(KeyCode::Tab | KeyCode::Enter | KeyCode::Escape) => {
                self.editing = false;
            }
            PhysicalKey::Code(KeyCode::Backspace) => {
                let _ = self.message.pop();
            }
            _ => {
                if let Some(text) = &event.text {
                    self.message
                        .extend(text.chars().filter(|c| !c.is_control()));
                }
            }
        }
        self.refresh_title();
    }

    fn key_pressed(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if self.editing {
            self.edit_message(event);
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        if code == KeyCode::Tab {
            self.editing = true;
            self.refresh_title();
            return;
        }

        let key_str = format!("{code:?}");
        let Some(action) = self.engine.key_action(&key_str) else {
            return;
        };
        if action == KeyAction::Quit {
            event_loop.exit();
            return;
        }
        if let Some(command) = VizCommand::from_key_action(action, &self.message) {
            if let Err(e) = self.engine.execute(command) {
                log::info!("{action:?} rejected: {e}");
            }
            self.refresh_title();
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let attrs = if let Some(mon) = &monitor {
            let mon_size = mon.size();
            let scale = mon.scale_factor();
            let logical_w = (f64::from(mon_size.width) / scale * 0.75) as u32;
            let logical_h = (f64::from(mon_size.height) / scale * 0.75) as u32;
            Window::default_attributes()
                .with_title(&self.title)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    logical_w, logical_h,
                ))
        } else {
            Window::default_attributes().with_title(&self.title)
        };

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let (vp_w, vp_h) = viewport_size(window.inner_size());
        let context = match pollster::block_on(RenderContext::new(
            window.clone(),
            (vp_w, vp_h),
        )) {
            Ok(c) => c,
            Err(e) => {
                log::error!("Failed to initialize GPU: {e}");
                event_loop.exit();
                return;
            }
        };
        let renderer = SceneRenderer::new(&context);
        self.gpu = Some(Gpu { context, renderer });

        self.engine.declare_all_viewports(vp_w, vp_h);
        let _ = self.engine.show_home();

        window.request_redraw();
        self.window = Some(window);
        self.refresh_title();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                let (w, h) = viewport_size(size);
                self.resize(w, h);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.engine.handle_input(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    self.key_pressed(event_loop, &event);
                }
            }
            _ => (),
        }
    }
}
