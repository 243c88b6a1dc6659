//=========================================================================
// Test Host
//
// A scripted `PlatformContext` plus a harness that drives an `App`
// through host events with a hand-stepped clock.
//
//=========================================================================

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use crossbeam_channel::Sender;

use xr_stage::core::clock::{Clock, ManualTimeSource};
use xr_stage::core::error::DiscoveryError;
use xr_stage::prelude::*;

//=== Recorded Host State =================================================

#[derive(Debug, Default)]
pub struct HostLog {
    pub frame_requests: u32,
    pub mounts: Vec<SurfaceRole>,
    pub created: Vec<SurfaceRole>,
    pub preloader_hidden: bool,
    pub surface_sizes: HashMap<SurfaceRole, (u32, u32)>,
    pub draws: HashMap<SurfaceRole, u64>,
}

//=== FakeSurface =========================================================

struct FakeSurface {
    role: SurfaceRole,
    size: (u32, u32),
    log: Rc<RefCell<HostLog>>,
}

impl RenderSurface for FakeSurface {
    fn role(&self) -> SurfaceRole {
        self.role
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.log.borrow_mut().surface_sizes.insert(self.role, self.size);
    }

    fn draw(&mut self, _scene: &SceneRoot, _views: &[CameraView]) {
        *self.log.borrow_mut().draws.entry(self.role).or_default() += 1;
    }
}

//=== FakePlatform ========================================================

/// Host that keeps the discovery responder until the test answers it.
pub struct FakePlatform {
    viewport: (u32, u32),
    responder: Option<DiscoveryResponder>,
    pub log: Rc<RefCell<HostLog>>,
}

impl FakePlatform {
    pub fn new(viewport: (u32, u32)) -> Self {
        Self {
            viewport,
            responder: None,
            log: Rc::new(RefCell::new(HostLog::default())),
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    pub fn has_pending_discovery(&self) -> bool {
        self.responder.is_some()
    }

    pub fn answer(&mut self, displays: Vec<DisplayHandle>) {
        if let Some(responder) = self.responder.take() {
            responder.resolve(displays);
        }
    }

    pub fn reject(&mut self, error: DiscoveryError) {
        if let Some(responder) = self.responder.take() {
            responder.reject(error);
        }
    }
}

impl PlatformContext for FakePlatform {
    fn viewport_size(&self) -> (u32, u32) {
        self.viewport
    }

    fn request_frame(&mut self) {
        self.log.borrow_mut().frame_requests += 1;
    }

    fn enumerate_displays(&mut self, responder: DiscoveryResponder) {
        self.responder = Some(responder);
    }

    fn create_surface(&mut self, role: SurfaceRole) -> Box<dyn RenderSurface> {
        let mut log = self.log.borrow_mut();
        log.created.push(role);
        log.surface_sizes.insert(role, self.viewport);
        Box::new(FakeSurface {
            role,
            size: self.viewport,
            log: Rc::clone(&self.log),
        })
    }

    fn mount_surface(&mut self, role: SurfaceRole) {
        self.log.borrow_mut().mounts.push(role);
    }

    fn hide_preloader(&mut self) {
        self.log.borrow_mut().preloader_hidden = true;
    }
}

//=== Harness =============================================================

pub const FRAME: Duration = Duration::from_millis(16);

pub struct Harness {
    pub app: App<FakePlatform>,
    pub host: Sender<HostEvent>,
    pub time: ManualTimeSource,
    pub log: Rc<RefCell<HostLog>>,
    published: Rc<RefCell<Vec<Event>>>,
}

impl Harness {
    /// Builds and initializes an app on an 800x600 fake host.
    pub fn new(config: AppConfig) -> Self {
        Self::with_builder(AppBuilder::new().with_config(config))
    }

    pub fn with_builder(builder: AppBuilder) -> Self {
        let time = ManualTimeSource::new();
        let platform = FakePlatform::new((800, 600));
        let log = Rc::clone(&platform.log);
        let (host, events) = host_channel();

        let mut app = builder
            .with_clock(Clock::with_source(time.clone()))
            .build(platform, events);

        let published = Rc::new(RefCell::new(Vec::new()));
        for topic in [
            Topic::StageChanged,
            Topic::UpdateScene,
            Topic::PauseAll,
            Topic::SpectatorModeChanged,
            Topic::CameraSwitched,
            Topic::DebugPhysicsChange,
        ] {
            let sink = Rc::clone(&published);
            let _ = app.bus().subscribe(topic, move |event| sink.borrow_mut().push(event.clone()));
        }

        app.init();
        Self {
            app,
            host,
            time,
            log,
            published,
        }
    }

    /// Fallback app with discovery resolved to "no device".
    pub fn desktop() -> Self {
        let mut harness = Self::new(AppConfig::default());
        harness.resolve(Vec::new());
        harness
    }

    /// App with discovery resolved to `display`.
    pub fn with_display(display: SimulatedDisplay) -> Self {
        let mut harness = Self::new(AppConfig::default());
        let device: DisplayHandle = Rc::new(display);
        harness.resolve(vec![device]);
        harness
    }

    pub fn resolve(&mut self, displays: Vec<DisplayHandle>) -> TickControl {
        self.app.platform_mut().answer(displays);
        self.app.pump()
    }

    pub fn send(&mut self, event: HostEvent) -> TickControl {
        self.host.send(event).expect("host channel open");
        self.app.pump()
    }

    /// Advances time by one frame and delivers a frame callback.
    pub fn frame(&mut self) -> TickControl {
        self.time.advance(FRAME);
        self.send(HostEvent::FrameCallback)
    }

    pub fn frames(&mut self, count: usize) {
        for _ in 0..count {
            self.frame();
        }
    }

    pub fn key(&mut self, key: KeyCode) -> TickControl {
        self.send(HostEvent::Key(key))
    }

    /// Everything published on `topic` so far.
    pub fn published(&self, topic: Topic) -> Vec<Event> {
        self.published
            .borrow()
            .iter()
            .filter(|event| event.topic() == topic)
            .cloned()
            .collect()
    }

    pub fn count(&self, topic: Topic) -> usize {
        self.published(topic).len()
    }

    pub fn frame_requests(&self) -> u32 {
        self.log.borrow().frame_requests
    }

    pub fn draws(&self, role: SurfaceRole) -> u64 {
        self.log.borrow().draws.get(&role).copied().unwrap_or(0)
    }

    pub fn surface_size(&self, role: SurfaceRole) -> Option<(u32, u32)> {
        self.log.borrow().surface_sizes.get(&role).copied()
    }
}
