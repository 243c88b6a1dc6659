//=========================================================================
// Platform Subsystem
//
// Winit desktop host for the stage orchestrator.
//
// Architecture:
// ```text
//  Main Thread (single):
//  ┌─────────────────────────────────────────────────────────────┐
//  │  Winit Event Loop                                           │
//  │   ↓ window_event()                                          │
//  │  InputProcessor ──HostEvent──> channel ──┐                  │
//  │   ↓ about_to_wait()                      ↓                  │
//  │  App::pump() ──> PlatformContext (DesktopContext)           │
//  │                   ├─ request_frame() → window.request_redraw│
//  │                   ├─ enumerate_displays() → simulated HMD   │
//  │                   └─ create/mount surfaces (bookkeeping)    │
//  └─────────────────────────────────────────────────────────────┘
//
//  Frame Boundary: RedrawRequested
//    → FrameCallback sent only if the app asked for a frame
//    → the app renders and asks again unless paused
// ```
//
// Key Design Decisions:
// - **One thread**: the app pumps inside `about_to_wait`, so host
//   notifications are always applied between winit callbacks
// - **Requested frames only**: OS-initiated redraws do not produce
//   frames, keeping one frame in flight
// - **Lazy window**: created in `resumed()`; frame requests made before
//   that are replayed once the window exists
//
//=========================================================================

//=== Submodules ==========================================================

mod event_mapper;
mod input_processor;
mod surface;

pub use surface::WindowSurface;

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use crossbeam_channel::Sender;
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Dependencies ===============================================

use crate::app::{host_channel, App, AppBuilder};
use crate::core::config::{AppConfig, SimulatedDisplayConfig, WindowConfig};
use crate::core::display::{DiscoveryResponder, DisplayHandle};
use crate::core::platform_bridge::{HostEvent, PlatformContext, PlatformError, TickControl};
use crate::core::render::{RenderSurface, SurfaceRole};
use input_processor::InputProcessor;

//=== WindowState =========================================================

/// Window-side state shared by the host and its `PlatformContext`.
struct WindowState {
    window: Option<Window>,
    viewport: (u32, u32),
    frame_requested: bool,
    mounted: Option<SurfaceRole>,
    preloader_visible: bool,
}

impl WindowState {
    fn new(viewport: (u32, u32)) -> Self {
        Self {
            window: None,
            viewport,
            frame_requested: false,
            mounted: None,
            preloader_visible: true,
        }
    }
}

//=== DesktopContext ======================================================

/// `PlatformContext` backed by a winit window.
pub struct DesktopContext {
    shared: Rc<RefCell<WindowState>>,
    simulated: Option<SimulatedDisplayConfig>,
}

impl DesktopContext {
    fn new(shared: Rc<RefCell<WindowState>>, simulated: Option<SimulatedDisplayConfig>) -> Self {
        Self { shared, simulated }
    }

    pub fn mounted_surface(&self) -> Option<SurfaceRole> {
        self.shared.borrow().mounted
    }

    pub fn preloader_visible(&self) -> bool {
        self.shared.borrow().preloader_visible
    }
}

impl PlatformContext for DesktopContext {
    fn viewport_size(&self) -> (u32, u32) {
        self.shared.borrow().viewport
    }

    fn request_frame(&mut self) {
        let mut shared = self.shared.borrow_mut();
        shared.frame_requested = true;
        if let Some(window) = shared.window.as_ref() {
            window.request_redraw();
        }
    }

    fn enumerate_displays(&mut self, responder: DiscoveryResponder) {
        let displays: Vec<DisplayHandle> = match self.simulated.as_ref() {
            Some(simulated) => {
                info!(target: "platform", "Reporting simulated display '{}'", simulated.name);
                let device: DisplayHandle = Rc::new(simulated.build());
                vec![device]
            }
            None => Vec::new(),
        };
        responder.resolve(displays);
    }

    fn create_surface(&mut self, role: SurfaceRole) -> Box<dyn RenderSurface> {
        debug!(target: "platform", "Creating {:?} surface", role);
        Box::new(WindowSurface::new(role, self.viewport_size()))
    }

    fn mount_surface(&mut self, role: SurfaceRole) {
        info!(target: "platform", "{:?} surface mounted", role);
        self.shared.borrow_mut().mounted = Some(role);
    }

    fn hide_preloader(&mut self) {
        info!(target: "platform", "Preloader hidden");
        self.shared.borrow_mut().preloader_visible = false;
    }
}

//=== DesktopHost =========================================================

/// Winit application driving one [`App`].
///
/// # Lifecycle
///
/// 1. **Construction**: [`DesktopHost::new`] builds the app on a fresh
///    host channel
/// 2. **Execution**: [`DesktopHost::run`] starts the event loop
/// 3. **Startup**: `resumed()` creates the window, initializes the app
///    and selects the configured mode
/// 4. **Shutdown**: window close → `CloseRequested` → `pump()` returns
///    `Exit` → event loop exits
pub struct DesktopHost {
    app: App<DesktopContext>,
    sender: Sender<HostEvent>,
    shared: Rc<RefCell<WindowState>>,
    window_config: WindowConfig,
    input: InputProcessor,
}

impl DesktopHost {
    //--- Construction -----------------------------------------------------

    pub fn new(config: AppConfig) -> Self {
        let (sender, events) = host_channel();
        let window_config = config.window.clone();
        let shared = Rc::new(RefCell::new(WindowState::new((
            window_config.width,
            window_config.height,
        ))));

        let context = DesktopContext::new(Rc::clone(&shared), config.display.simulated.clone());
        let app = AppBuilder::new().with_config(config).build(context, events);

        info!(target: "platform", "Desktop host initialized");
        Self {
            app,
            sender,
            shared,
            window_config,
            input: InputProcessor::new(),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop =
            EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

        event_loop
            .run_app(&mut self)
            .map_err(|e| PlatformError::EventLoopExecution(e.to_string()))
    }

    pub fn app(&self) -> &App<DesktopContext> {
        &self.app
    }

    //--- Internal Helpers -------------------------------------------------

    fn send(&self, event: HostEvent) {
        if self.sender.send(event).is_err() {
            warn!(target: "platform", "Host channel disconnected, dropping {:?}", event);
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), PlatformError> {
        let attrs = WindowAttributes::default()
            .with_title(self.window_config.title.clone())
            .with_inner_size(LogicalSize::new(self.window_config.width, self.window_config.height));

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| PlatformError::WindowCreation(e.to_string()))?;

        let size = window.inner_size();
        info!(
            target: "platform",
            "Window created: {}x{} @ {}x DPI",
            size.width,
            size.height,
            window.scale_factor()
        );

        let mut shared = self.shared.borrow_mut();
        shared.viewport = (size.width, size.height);
        if shared.frame_requested {
            window.request_redraw();
        }
        shared.window = Some(window);
        Ok(())
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for DesktopHost {
    /// Creates the window on first activation and starts the stage.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.shared.borrow().window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        if let Err(e) = self.create_window(event_loop) {
            error!(target: "platform", "{}", e);
            event_loop.exit();
            return;
        }

        let (width, height) = self.shared.borrow().viewport;
        self.send(HostEvent::ViewportResized { width, height });

        self.app.init();
        let spectator = self.app.config().spectator.enabled;
        self.app.mode_selected(spectator);
    }

    /// Translates window events into host notifications.
    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.send(HostEvent::CloseRequested);
            }

            WindowEvent::Resized(size) => {
                self.shared.borrow_mut().viewport = (size.width, size.height);
                self.send(HostEvent::ViewportResized {
                    width: size.width,
                    height: size.height,
                });
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                match self
                    .input
                    .process_key(key_event.physical_key, key_event.state, key_event.repeat)
                {
                    Some(event) => self.send(event),
                    None => trace!(target: "platform::input", "Key ignored"),
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.input.process_mouse_button(button, state);
            }

            WindowEvent::CursorMoved { position, .. } => {
                if let Some(event) = self.input.process_cursor_move(position.x as f32, position.y as f32) {
                    self.send(event);
                }
            }

            WindowEvent::CursorLeft { .. } => self.input.process_cursor_left(),

            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(event) = self.input.process_wheel(delta) {
                    self.send(event);
                }
            }

            WindowEvent::RedrawRequested => {
                let requested = std::mem::take(&mut self.shared.borrow_mut().frame_requested);
                if requested {
                    self.send(HostEvent::FrameCallback);
                } else {
                    trace!(target: "platform", "Unrequested redraw ignored");
                }
            }

            _ => {}
        }
    }

    /// Lets the app apply everything queued during this batch of events.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.app.pump() == TickControl::Exit {
            event_loop.exit();
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::display::{DiscoveryOutcome, DisplayDiscovery, StageDimensions};

    fn context(simulated: Option<SimulatedDisplayConfig>) -> DesktopContext {
        DesktopContext::new(Rc::new(RefCell::new(WindowState::new((800, 600)))), simulated)
    }

    //=====================================================================
    // DesktopContext Tests
    //=====================================================================

    #[test]
    fn frame_requests_are_remembered_without_a_window() {
        let mut context = context(None);
        context.request_frame();
        assert!(context.shared.borrow().frame_requested);
    }

    #[test]
    fn enumeration_without_simulation_finds_nothing() {
        let mut context = context(None);
        let mut discovery = DisplayDiscovery::new(StageDimensions::default());

        context.enumerate_displays(discovery.discover().unwrap());

        let resolution = discovery.poll().unwrap();
        assert!(matches!(resolution.outcome, DiscoveryOutcome::NotFound));
    }

    #[test]
    fn enumeration_reports_the_simulated_display() {
        let mut context = context(Some(SimulatedDisplayConfig::default()));
        let mut discovery = DisplayDiscovery::new(StageDimensions::default());

        context.enumerate_displays(discovery.discover().unwrap());

        let resolution = discovery.poll().unwrap();
        assert!(resolution.outcome.is_found());
        assert_eq!(resolution.stage, StageDimensions::new(3.0, 4.0));
    }

    #[test]
    fn surfaces_start_at_viewport_size() {
        let mut context = context(None);
        let surface = context.create_surface(SurfaceRole::Spectator);
        assert_eq!(surface.size(), (800, 600));
        assert_eq!(surface.role(), SurfaceRole::Spectator);
    }

    #[test]
    fn mounting_and_preloader_are_tracked() {
        let mut context = context(None);
        assert!(context.preloader_visible());

        context.mount_surface(SurfaceRole::Spectator);
        context.hide_preloader();

        assert_eq!(context.mounted_surface(), Some(SurfaceRole::Spectator));
        assert!(!context.preloader_visible());
    }

    //=====================================================================
    // DesktopHost Tests
    //=====================================================================

    #[test]
    fn host_creation_defers_window() {
        let host = DesktopHost::new(AppConfig::default());
        assert!(host.shared.borrow().window.is_none());
        assert_eq!(host.app().platform().viewport_size(), (1280, 720));
    }

    #[test]
    fn platform_error_is_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PlatformError>();
    }
}
