//=========================================================================
// Stage Orchestrator
//
// Composes discovery, render path selection, the frame loop, spectator
// mode and resize handling into one application driven by host events.
//
// Architecture:
// ```text
//     AppBuilder ──build(platform, events)──> App ──init()──> discovery
//         │                                    │
//         ├─ with_config()                     └─ pump() per host wake-up:
//         ├─ with_clock()                           discovery poll
//         ├─ with_bindings()                        host events → frames, resize, keys
//         └─ with_content()                         queued bus commands
// ```
//
// Bus handlers registered here never touch the app directly. They queue
// a `Command` that `pump()` applies once the current dispatch is over.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use glam::Vec3;
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::clock::{Clock, FrameTick};
use crate::core::config::AppConfig;
use crate::core::display::{
    DiscoveryOutcome, DiscoveryResolution, DiscoveryStatus, DisplayDiscovery, DisplayHandle,
    HeadMountedDisplay, StageDimensions,
};
use crate::core::event_bus::{Event, EventBus, Subscription, Topic};
use crate::core::frame::{Easing, FrameScheduler, Tween, TweenQueue};
use crate::core::input::InputBindings;
use crate::core::platform_bridge::{EventCollector, HostEvent, PlatformContext, TickControl};
use crate::core::render::{RenderPath, RenderPathSelector, SurfaceRole};
use crate::core::resize::{ResizeCoordinator, ResizePlan};
use crate::core::scene::{
    keys, nodes, Attachable, Camera, KeyLight, NodeId, SceneRoot, SceneState, Transform,
};
use crate::core::spectator::SpectatorCoordinator;

//=== Host Channel ========================================================

/// Creates the host → app notification channel.
///
/// Unbounded: the host and the app share one thread, so a bounded send
/// from the host could never be drained.
pub fn host_channel() -> (Sender<HostEvent>, Receiver<HostEvent>) {
    unbounded()
}

//=== ModeState ===========================================================

/// Snapshot of the three orchestrator mode flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeState {
    pub presenting: bool,
    pub spectator_enabled: bool,
    pub paused: bool,
}

//=== Command =============================================================

/// Deferred work requested from inside a bus dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    ToggleSpectator,
    SwitchCamera(usize),
    TogglePause,
    ShellRised,
    ElevationStarted,
    HideAll,
    LastAssetLoaded,
}

type CommandQueue = Rc<RefCell<VecDeque<Command>>>;

//=== AppBuilder ==========================================================

/// Builder for configuring and constructing an [`App`].
///
/// # Examples
///
/// ```no_run
/// use crossbeam_channel::Receiver;
/// use xr_stage::prelude::*;
///
/// fn run<P: PlatformContext>(platform: P, events: Receiver<HostEvent>) {
///     let mut app = AppBuilder::new()
///         .with_config(AppConfig::default())
///         .build(platform, events);
///
///     app.init();
///     while app.pump() == TickControl::Continue {}
/// }
/// ```
pub struct AppBuilder {
    config: AppConfig,
    clock: Option<Clock>,
    bindings: Option<InputBindings>,
    content: Vec<Box<dyn Attachable>>,
}

impl AppBuilder {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            clock: None,
            bindings: None,
            content: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the wall clock that times frames.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Replaces the stock key layout from [`InputBindings::defaults`].
    pub fn with_bindings(mut self, bindings: InputBindings) -> Self {
        self.bindings = Some(bindings);
        self
    }

    /// Queues scene content, attached once discovery resolves.
    pub fn with_content(mut self, content: Box<dyn Attachable>) -> Self {
        self.content.push(content);
        self
    }

    /// Builds the app on top of `platform`, reading its notifications
    /// from `events`.
    pub fn build<P: PlatformContext>(self, mut platform: P, events: Receiver<HostEvent>) -> App<P> {
        let config = self.config;
        let (width, height) = platform.viewport_size();
        info!(target: "stage::app", "Building app for a {}x{} viewport", width, height);

        let bus = EventBus::new();
        let state = SceneState::new();
        let camera = config.camera.camera(width, height);

        let spectator = SpectatorCoordinator::new(
            bus.clone(),
            state.clone(),
            camera.clone(),
            config.spectator.transforms(),
        );
        let selector = RenderPathSelector::new(
            platform.create_surface(SurfaceRole::Primary),
            config.camera.user_height,
        );
        let bindings = self
            .bindings
            .unwrap_or_else(|| InputBindings::defaults(config.spectator.fixed_cameras.len()));

        App {
            discovery: DisplayDiscovery::new(config.stage.dimensions()),
            resize: ResizeCoordinator::new(config.default_eye()),
            scheduler: FrameScheduler::new(self.clock.unwrap_or_default()),
            collector: EventCollector::new(events),
            scene: Rc::new(RefCell::new(SceneRoot::new())),
            camera: Rc::new(RefCell::new(camera)),
            commands: Rc::new(RefCell::new(VecDeque::new())),
            subscriptions: Vec::new(),
            pending_content: self.content,
            tweens: TweenQueue::new(),
            key_light: None,
            key_light_node: None,
            stage: config.stage.dimensions(),
            initialized: false,
            populated: false,
            mode_selected: false,
            presentation_requested: false,
            platform,
            config,
            bus,
            state,
            selector,
            spectator,
            bindings,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== App =================================================================

/// The scene-lifecycle and rendering-mode orchestrator.
pub struct App<P: PlatformContext> {
    platform: P,
    config: AppConfig,

    bus: EventBus,
    state: SceneState,
    scene: Rc<RefCell<SceneRoot>>,
    camera: Rc<RefCell<Camera>>,

    discovery: DisplayDiscovery,
    selector: RenderPathSelector,
    scheduler: FrameScheduler,
    spectator: SpectatorCoordinator,
    resize: ResizeCoordinator,
    tweens: TweenQueue,

    collector: EventCollector,
    bindings: InputBindings,
    commands: CommandQueue,
    subscriptions: Vec<Subscription>,

    pending_content: Vec<Box<dyn Attachable>>,
    key_light: Option<Rc<RefCell<KeyLight>>>,
    key_light_node: Option<NodeId>,
    stage: StageDimensions,

    initialized: bool,
    populated: bool,
    mode_selected: bool,
    presentation_requested: bool,
}

impl<P: PlatformContext> App<P> {
    //--- Initialization ---------------------------------------------------

    /// Registers shared handles, wires bus commands and starts discovery.
    ///
    /// Only the first call has any effect.
    pub fn init(&mut self) {
        if self.initialized {
            debug!(target: "stage::app", "App already initialized");
            return;
        }
        self.initialized = true;
        info!(target: "stage::app", "Initializing stage");

        self.state.add(keys::SCENE, Rc::clone(&self.scene));
        self.state.add(keys::CAMERA, Rc::clone(&self.camera));

        self.forward(Topic::ChangeSpectatorMode, |_| Some(Command::ToggleSpectator));
        self.forward(Topic::CameraIndexSelected, |event| match event {
            Event::CameraIndexSelected(index) => Some(Command::SwitchCamera(*index)),
            _ => None,
        });
        self.forward(Topic::TogglePause, |_| Some(Command::TogglePause));

        if self.config.spectator.enabled {
            self.enable_spectator();
        } else {
            self.platform.mount_surface(SurfaceRole::Primary);
        }

        match self.discovery.discover() {
            Some(responder) => self.platform.enumerate_displays(responder),
            None => warn!(target: "stage::discovery", "Discovery was already attempted"),
        }
    }

    /// Subscribes a handler that turns `topic` events into commands.
    fn forward(&mut self, topic: Topic, to_command: fn(&Event) -> Option<Command>) {
        let queue = Rc::clone(&self.commands);
        let subscription = self.bus.subscribe(topic, move |event| {
            if let Some(command) = to_command(event) {
                queue.borrow_mut().push_back(command);
            }
        });
        self.subscriptions.push(subscription);
    }

    /// Adds scene content. Before discovery resolves it is queued.
    pub fn add_content(&mut self, content: Box<dyn Attachable>) -> Option<NodeId> {
        if !self.populated {
            self.pending_content.push(content);
            return None;
        }
        Some(self.attach(content))
    }

    fn attach(&mut self, mut content: Box<dyn Attachable>) -> NodeId {
        content.on_attach(&self.bus, &self.state);
        self.scene.borrow_mut().add(content)
    }

    //--- Pump -------------------------------------------------------------

    /// Processes everything the host has delivered since the last call.
    ///
    /// Returns `Exit` once the host asked to close or went away.
    pub fn pump(&mut self) -> TickControl {
        if let Some(resolution) = self.discovery.poll() {
            self.on_discovery_resolved(resolution);
            self.drain_commands();
        }

        let control = self.collector.collect();
        for event in self.collector.take_events() {
            self.handle_host_event(event);
            self.drain_commands();
        }
        self.drain_commands();

        if control == TickControl::Exit {
            info!(target: "stage::app", "Host closed, shutting down after {} frames", self.scheduler.frames());
        }
        control
    }

    fn handle_host_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::ViewportResized { width, height } => {
                self.on_viewport_change(width, height);
            }
            HostEvent::PresentationActivated => {
                debug!(target: "stage::app", "Presentation activation noted");
                self.presentation_requested = true;
            }
            HostEvent::FrameCallback => self.run_frame(),
            HostEvent::Key(key) => {
                if let Some(event) = self.bindings.map_key(key) {
                    self.bus.publish(event);
                }
            }
            HostEvent::PointerDrag { dx, dy } => {
                if let Some(controls) = self.selector.controls_mut() {
                    controls.on_pointer_drag(dx, dy);
                }
            }
            HostEvent::Scroll(delta) => {
                if let Some(controls) = self.selector.controls_mut() {
                    controls.on_scroll(delta);
                }
            }
            HostEvent::CloseRequested => {}
        }
    }

    fn drain_commands(&mut self) {
        loop {
            let next = self.commands.borrow_mut().pop_front();
            let Some(command) = next else { break };

            debug!(target: "stage::app", "Applying {:?}", command);
            match command {
                Command::ToggleSpectator => self.toggle_spectator(),
                Command::SwitchCamera(index) => {
                    self.switch_camera(index);
                }
                Command::TogglePause => self.toggle_pause(),
                Command::ShellRised => self.shell_rised(),
                Command::ElevationStarted => self.elevation_started(),
                Command::HideAll => self.hide_all(),
                Command::LastAssetLoaded => self.last_asset_loaded(),
            }
        }
    }

    //--- Discovery Continuation -------------------------------------------

    fn on_discovery_resolved(&mut self, resolution: DiscoveryResolution) {
        let DiscoveryResolution { outcome, stage } = resolution;

        let path = self.selector.resolve(&outcome, &mut self.camera.borrow_mut());
        self.stage = stage;
        self.state.add(keys::STAGE, stage);
        if let DiscoveryOutcome::Found(device) = &outcome {
            self.state.add(keys::DISPLAY, DisplayHandle::clone(device));
        }

        info!(
            target: "stage::app",
            "Discovery resolved on {:?}, stage {}x{}",
            path,
            stage.width,
            stage.depth
        );
        self.populate_scene(outcome.is_found());
    }

    fn populate_scene(&mut self, found: bool) {
        for content in std::mem::take(&mut self.pending_content) {
            self.attach(content);
        }

        self.state.add(keys::ROOM_AREA, self.stage.area());

        let map_size = if found {
            self.config.shadows.hmd_map_size
        } else {
            self.config.shadows.desktop_map_size
        };
        let key_light = Rc::new(RefCell::new(KeyLight::new(map_size)));
        let light_position = key_light.borrow().position;
        self.state.add(keys::KEY_LIGHT, Rc::clone(&key_light));
        self.key_light = Some(key_light);

        {
            let mut scene = self.scene.borrow_mut();
            self.key_light_node =
                Some(scene.add_named(nodes::KEY_LIGHT, Transform::from_position(light_position)));
            scene.add_named(nodes::FILL_LIGHT, Transform::from_position(Vec3::new(8.0, 10.0, 18.0)));
        }

        self.forward(Topic::ShellRised, |_| Some(Command::ShellRised));
        self.forward(Topic::ElevationStarted, |_| Some(Command::ElevationStarted));
        self.forward(Topic::HideAll, |_| Some(Command::HideAll));
        self.forward(Topic::LastAssetIsLoaded, |_| Some(Command::LastAssetLoaded));
        self.populated = true;

        let stage_name = if self.config.debug_mode { "experience" } else { "intro" };
        self.bus.publish(Event::StageChanged(stage_name.to_string()));

        let (width, height) = self.platform.viewport_size();
        self.on_viewport_change(width, height);

        self.scene.borrow_mut().set_visible(false);
        self.scheduler.start(&mut self.platform);

        if self.mode_selected {
            self.enter_presentation();
        }
    }

    //--- Presentation -----------------------------------------------------

    /// Shows the scene and, on the HMD path, asks the device to present.
    pub fn enter_presentation(&mut self) {
        self.scene.borrow_mut().set_visible(true);

        let Some(device) = self.selector.device().cloned() else {
            debug!(target: "stage::app", "Scene shown on {:?} path", self.selector.path());
            return;
        };

        match device.request_present() {
            Ok(()) => {
                info!(target: "stage::app", "Presenting on '{}'", device.display_name());
                let (width, height) = self.platform.viewport_size();
                self.on_viewport_change(width, height);
            }
            Err(err) => warn!(target: "stage::app", "Could not start presenting: {}", err),
        }
    }

    /// Records the user's mode choice and presents if the stage is ready.
    pub fn mode_selected(&mut self, spectator: bool) {
        info!(target: "stage::app", "Mode selected (spectator: {})", spectator);
        self.mode_selected = true;
        if spectator {
            self.enable_spectator();
        }
        if self.is_ready_to_start() {
            self.enter_presentation();
        }
    }

    //--- Frame ------------------------------------------------------------

    fn run_frame(&mut self) {
        let Some(tick) = self.scheduler.begin_frame() else {
            return;
        };

        if std::mem::take(&mut self.presentation_requested) {
            self.enter_presentation();
        }

        self.selector
            .update_controls(&mut self.camera.borrow_mut(), tick.delta as f32);
        self.publish_update(tick);
        self.tweens.update(tick.elapsed);
        self.sync_key_light();

        {
            let camera = self.camera.borrow();
            self.spectator.sync(&camera, &mut self.scene.borrow_mut());

            let scene = self.scene.borrow();
            self.selector.render(&scene, &camera);
            self.spectator.render(&scene);
        }

        self.scheduler.end_frame(&mut self.platform);
    }

    fn publish_update(&self, tick: FrameTick) {
        self.bus.publish(Event::UpdateScene {
            delta: tick.delta,
            elapsed: tick.elapsed,
        });
    }

    fn sync_key_light(&mut self) {
        let (Some(light), Some(id)) = (self.key_light.as_ref(), self.key_light_node) else {
            return;
        };
        let position = light.borrow().position;
        if let Some(node) = self.scene.borrow_mut().node_mut(id) {
            node.transform.position = position;
        }
    }

    //--- Pause ------------------------------------------------------------

    /// Halts or resumes the frame loop, announcing real changes on the bus.
    pub fn pause_all(&mut self, paused: bool) {
        if self.scheduler.pause(paused, &mut self.platform) {
            self.bus.publish(Event::PauseAll(paused));
        }
    }

    pub fn toggle_pause(&mut self) {
        self.pause_all(!self.scheduler.is_paused());
    }

    //--- Spectator --------------------------------------------------------

    pub fn toggle_spectator(&mut self) {
        let was_enabled = self.spectator.is_enabled();
        let enabled = self.spectator.toggle(&mut self.platform, &self.scene);
        if enabled && !was_enabled {
            self.fit_spectator();
        }
    }

    fn enable_spectator(&mut self) {
        if self.spectator.enable(&mut self.platform, &self.scene) {
            self.fit_spectator();
        }
    }

    /// Sizes a freshly enabled spectator to the current viewport.
    fn fit_spectator(&mut self) {
        let (width, height) = self.platform.viewport_size();
        self.on_viewport_change(width, height);
    }

    /// Selects the spectator pose source (0 = head camera).
    pub fn switch_camera(&mut self, index: usize) -> bool {
        self.spectator.switch_camera(index, &self.scene)
    }

    //--- Resize -----------------------------------------------------------

    /// Re-sizes cameras and surfaces for a new viewport.
    pub fn on_viewport_change(&mut self, width: u32, height: u32) -> Option<ResizePlan> {
        self.resize.on_viewport_change(
            width,
            height,
            &mut self.camera.borrow_mut(),
            &mut self.selector,
            &mut self.spectator,
        )
    }

    //--- Stage Events -----------------------------------------------------

    fn shell_rised(&mut self) {
        self.widen_shadow_camera();
    }

    fn elevation_started(&mut self) {
        if self.state.get::<u32>(keys::END_MODE) != Some(1) {
            debug!(target: "stage::app", "Elevation started outside end mode 1");
            return;
        }
        let Some(light) = self.key_light.clone() else {
            return;
        };

        let start = light.borrow().position;
        let duration = 20.0;

        let x_light = Rc::clone(&light);
        self.tweens.push(
            Tween::new(start.x, 0.0, duration, move |x| x_light.borrow_mut().position.x = x)
                .with_easing(Easing::SinusoidalOut),
        );
        let z_light = Rc::clone(&light);
        self.tweens.push(
            Tween::new(start.z, 0.0, duration, move |z| z_light.borrow_mut().position.z = z)
                .with_easing(Easing::SinusoidalOut),
        );

        self.widen_shadow_camera();
    }

    /// Opens the key light's shadow range to cover the whole final scene.
    fn widen_shadow_camera(&mut self) {
        let Some(light) = self.key_light.clone() else {
            return;
        };

        let shadow = light.borrow().shadow;
        let duration = 10.0;

        let near_light = Rc::clone(&light);
        self.tweens.push(Tween::new(shadow.near, 8.0, duration, move |near| {
            near_light.borrow_mut().shadow.near = near;
        }));
        let far_light = Rc::clone(&light);
        self.tweens.push(Tween::new(shadow.far, 35.0, duration, move |far| {
            far_light.borrow_mut().shadow.far = far;
        }));
    }

    fn hide_all(&mut self) {
        let mut scene = self.scene.borrow_mut();
        let removed: usize = nodes::HIDE_ALL
            .iter()
            .map(|name| scene.remove_named(name))
            .sum();
        if self.key_light_node.is_some_and(|id| scene.node(id).is_none()) {
            self.key_light_node = None;
        }
        info!(target: "stage::app", "Hid {} environment nodes", removed);
    }

    fn last_asset_loaded(&mut self) {
        debug!(target: "stage::app", "Last asset loaded, hiding preloader");
        self.platform.hide_preloader();
    }

    //--- Queries ----------------------------------------------------------

    pub fn mode_state(&self) -> ModeState {
        ModeState {
            presenting: self.selector.is_presenting(),
            spectator_enabled: self.spectator.is_enabled(),
            paused: self.scheduler.is_paused(),
        }
    }

    /// Discovery resolved and the scene is populated.
    pub fn is_ready_to_start(&self) -> bool {
        self.populated
    }

    pub fn render_path(&self) -> RenderPath {
        self.selector.path()
    }

    pub fn discovery_status(&self) -> DiscoveryStatus {
        self.discovery.status()
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn scene(&self) -> Rc<RefCell<SceneRoot>> {
        Rc::clone(&self.scene)
    }

    pub fn camera(&self) -> Rc<RefCell<Camera>> {
        Rc::clone(&self.camera)
    }

    pub fn selector(&self) -> &RenderPathSelector {
        &self.selector
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn spectator(&self) -> &SpectatorCoordinator {
        &self.spectator
    }

    pub fn key_light(&self) -> Option<KeyLight> {
        self.key_light.as_ref().map(|light| light.borrow().clone())
    }

    pub fn active_tweens(&self) -> usize {
        self.tweens.len()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }
}

impl<P: PlatformContext> Drop for App<P> {
    fn drop(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            self.bus.unsubscribe(subscription);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
