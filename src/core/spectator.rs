//=========================================================================
// Spectator Coordinator
//=========================================================================
//
// Second viewpoint watching the same scene on its own surface.
//
// Architecture:
//   enable()  → lazy camera + surface → mount Spectator → spectatorModeChanged(true)
//   disable() → mount Primary                          → spectatorModeChanged(false)
//   switch_camera(i) → pose source: 0 = head camera, 1..=N = fixed cameras
//
// The camera and surface outlive disable() so re-entry keeps both, along
// with the selected camera index. The headset proxy node is shown only
// while the spectator is on and watching from a fixed camera.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::event_bus::{Event, EventBus};
use crate::core::platform_bridge::PlatformContext;
use crate::core::render::{CameraView, RenderSurface, SurfaceRole};
use crate::core::scene::{keys, nodes, Camera, NodeId, SceneRoot, SceneState, Transform};

//=== SpectatorCoordinator ================================================

pub struct SpectatorCoordinator {
    bus: EventBus,
    state: SceneState,

    /// Projection settings copied into the camera when it is first built.
    template: Camera,
    fixed_cameras: Vec<Transform>,

    camera: Option<Rc<RefCell<Camera>>>,
    surface: Option<Box<dyn RenderSurface>>,
    headset: Option<NodeId>,

    enabled: bool,
    active_index: usize,
    frames: u64,
}

impl SpectatorCoordinator {
    //--- Construction -----------------------------------------------------

    pub fn new(bus: EventBus, state: SceneState, template: Camera, fixed_cameras: Vec<Transform>) -> Self {
        Self {
            bus,
            state,
            template,
            fixed_cameras,
            camera: None,
            surface: None,
            headset: None,
            enabled: false,
            active_index: 0,
            frames: 0,
        }
    }

    //--- Mode Switching ---------------------------------------------------

    /// Turns spectator mode on. Returns `false` if it already was.
    ///
    /// `scene` is only borrowed while the headset proxy is updated, so
    /// `spectatorModeChanged` listeners may borrow it again.
    pub fn enable(&mut self, platform: &mut dyn PlatformContext, scene: &RefCell<SceneRoot>) -> bool {
        if self.enabled {
            debug!(target: "stage::spectator", "Spectator already enabled");
            return false;
        }

        if self.camera.is_none() {
            let (width, height) = platform.viewport_size();
            let mut camera = self.template.clone();
            if height > 0 {
                camera.set_aspect(width as f32 / height as f32);
            }

            let camera = Rc::new(RefCell::new(camera));
            self.state.add(keys::CAMERA_SPECTATOR, Rc::clone(&camera));
            self.camera = Some(camera);
            debug!(target: "stage::spectator", "Spectator camera created");
        }

        if self.surface.is_none() {
            self.surface = Some(platform.create_surface(SurfaceRole::Spectator));
            debug!(target: "stage::spectator", "Spectator surface created");
        }

        platform.mount_surface(SurfaceRole::Spectator);
        self.enabled = true;
        {
            let mut scene = scene.borrow_mut();
            if self.headset.is_none() {
                self.headset = Some(scene.add_named(nodes::HEADSET, Transform::IDENTITY));
            }
            self.update_headset(&mut scene);
        }

        info!(
            target: "stage::spectator",
            "Spectator mode on, watching from camera {}",
            self.active_index
        );
        self.bus.publish(Event::SpectatorModeChanged(true));
        true
    }

    /// Turns spectator mode off. Returns `false` if it already was off.
    pub fn disable(&mut self, platform: &mut dyn PlatformContext, scene: &RefCell<SceneRoot>) -> bool {
        if !self.enabled {
            debug!(target: "stage::spectator", "Spectator already disabled");
            return false;
        }

        platform.mount_surface(SurfaceRole::Primary);
        self.enabled = false;
        self.update_headset(&mut scene.borrow_mut());

        info!(target: "stage::spectator", "Spectator mode off");
        self.bus.publish(Event::SpectatorModeChanged(false));
        true
    }

    /// Flips spectator mode. Returns the new state.
    pub fn toggle(&mut self, platform: &mut dyn PlatformContext, scene: &RefCell<SceneRoot>) -> bool {
        if self.enabled {
            self.disable(platform, scene);
        } else {
            self.enable(platform, scene);
        }
        self.enabled
    }

    /// Selects the pose source. Unknown indices are logged and ignored.
    pub fn switch_camera(&mut self, index: usize, scene: &RefCell<SceneRoot>) -> bool {
        if index >= self.camera_count() {
            warn!(
                target: "stage::spectator",
                "Camera {} does not exist ({} available), ignoring",
                index,
                self.camera_count()
            );
            return false;
        }

        self.active_index = index;
        self.update_headset(&mut scene.borrow_mut());

        info!(target: "stage::spectator", "Spectator switched to camera {}", index);
        self.bus.publish(Event::CameraSwitched(index));
        true
    }

    fn update_headset(&self, scene: &mut SceneRoot) {
        let visible = self.enabled && self.active_index != 0;
        if let Some(node) = self.headset.and_then(|id| scene.node_mut(id)) {
            node.visible = visible;
        }
    }

    //--- Per-frame --------------------------------------------------------

    /// Moves the spectator camera onto its pose source and the headset
    /// proxy onto the head camera.
    pub fn sync(&mut self, primary: &Camera, scene: &mut SceneRoot) {
        if !self.enabled {
            return;
        }

        if let Some(node) = self.headset.and_then(|id| scene.node_mut(id)) {
            node.transform = primary.transform;
        }

        let pose = match self.active_index {
            0 => primary.transform,
            index => self.fixed_cameras[index - 1],
        };
        if let Some(camera) = self.camera.as_ref() {
            camera.borrow_mut().transform = pose;
        }
    }

    /// Draws the spectator view. Returns `false` when spectator mode is off.
    pub fn render(&mut self, scene: &SceneRoot) -> bool {
        if !self.enabled {
            return false;
        }

        let (Some(surface), Some(camera)) = (self.surface.as_mut(), self.camera.as_ref()) else {
            return false;
        };

        let (width, height) = surface.size();
        let view = CameraView::mono(&camera.borrow(), width, height);
        surface.draw(scene, &[view]);
        self.frames += 1;
        true
    }

    /// Applies a precomputed viewport to the spectator camera and surface.
    pub(crate) fn apply_viewport(&mut self, aspect: f32, width: u32, height: u32) {
        if let Some(camera) = self.camera.as_ref() {
            camera.borrow_mut().set_aspect(aspect);
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.set_size(width, height);
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// Head camera plus the fixed cameras.
    pub fn camera_count(&self) -> usize {
        self.fixed_cameras.len() + 1
    }

    pub fn camera(&self) -> Option<Rc<RefCell<Camera>>> {
        self.camera.clone()
    }

    pub fn surface_size(&self) -> Option<(u32, u32)> {
        self.surface.as_ref().map(|surface| surface.size())
    }

    pub fn headset_visible(&self, scene: &SceneRoot) -> bool {
        self.headset
            .and_then(|id| scene.node(id))
            .is_some_and(|node| node.visible)
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::display::DiscoveryResponder;
    use crate::core::event_bus::Topic;
    use glam::Vec3;

    //--- Test Host --------------------------------------------------------

    struct SizedSurface((u32, u32));

    impl RenderSurface for SizedSurface {
        fn role(&self) -> SurfaceRole {
            SurfaceRole::Spectator
        }
        fn size(&self) -> (u32, u32) {
            self.0
        }
        fn set_size(&mut self, width: u32, height: u32) {
            self.0 = (width, height);
        }
        fn draw(&mut self, _scene: &SceneRoot, _views: &[CameraView]) {}
    }

    #[derive(Default)]
    struct MountingHost {
        created: u32,
        mounted: Vec<SurfaceRole>,
    }

    impl PlatformContext for MountingHost {
        fn viewport_size(&self) -> (u32, u32) {
            (1600, 900)
        }
        fn request_frame(&mut self) {}
        fn enumerate_displays(&mut self, _responder: DiscoveryResponder) {}
        fn create_surface(&mut self, _role: SurfaceRole) -> Box<dyn RenderSurface> {
            self.created += 1;
            Box::new(SizedSurface(self.viewport_size()))
        }
        fn mount_surface(&mut self, role: SurfaceRole) {
            self.mounted.push(role);
        }
    }

    fn coordinator(bus: &EventBus, state: &SceneState) -> SpectatorCoordinator {
        let fixed = vec![
            Transform::from_position(Vec3::new(3.0, 2.0, 3.0)),
            Transform::from_position(Vec3::new(-3.0, 2.0, 3.0)),
        ];
        SpectatorCoordinator::new(bus.clone(), state.clone(), Camera::default(), fixed)
    }

    fn mode_log(bus: &EventBus) -> Rc<RefCell<Vec<bool>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let _ = bus.subscribe(Topic::SpectatorModeChanged, move |event| {
            if let Event::SpectatorModeChanged(on) = event {
                sink.borrow_mut().push(*on);
            }
        });
        log
    }

    //=====================================================================
    // Enable / Disable Tests
    //=====================================================================

    #[test]
    fn enable_builds_camera_and_surface_lazily() {
        let (bus, state) = (EventBus::new(), SceneState::new());
        let mut spectator = coordinator(&bus, &state);
        let mut host = MountingHost::default();
        let scene = RefCell::new(SceneRoot::new());

        assert!(spectator.camera().is_none());
        assert!(spectator.enable(&mut host, &scene));

        assert!(spectator.camera().is_some());
        assert!(state.contains(keys::CAMERA_SPECTATOR));
        assert_eq!(host.created, 1);
        assert_eq!(host.mounted, vec![SurfaceRole::Spectator]);
        assert!(scene.borrow().find(nodes::HEADSET).is_some());
    }

    #[test]
    fn enable_twice_is_noop() {
        let (bus, state) = (EventBus::new(), SceneState::new());
        let log = mode_log(&bus);
        let mut spectator = coordinator(&bus, &state);
        let mut host = MountingHost::default();
        let scene = RefCell::new(SceneRoot::new());

        spectator.enable(&mut host, &scene);
        assert!(!spectator.enable(&mut host, &scene));

        assert_eq!(*log.borrow(), vec![true]);
        assert_eq!(host.created, 1);
        assert_eq!(host.mounted.len(), 1);
        assert_eq!(scene.borrow().len(), 1);
    }

    #[test]
    fn disable_remounts_primary_and_keeps_camera() {
        let (bus, state) = (EventBus::new(), SceneState::new());
        let log = mode_log(&bus);
        let mut spectator = coordinator(&bus, &state);
        let mut host = MountingHost::default();
        let scene = RefCell::new(SceneRoot::new());

        spectator.enable(&mut host, &scene);
        let camera = spectator.camera().unwrap();
        assert!(spectator.disable(&mut host, &scene));
        assert!(!spectator.disable(&mut host, &scene));
        spectator.enable(&mut host, &scene);

        assert_eq!(*log.borrow(), vec![true, false, true]);
        assert_eq!(host.mounted, vec![SurfaceRole::Spectator, SurfaceRole::Primary, SurfaceRole::Spectator]);
        assert!(Rc::ptr_eq(&camera, &spectator.camera().unwrap()));
        assert_eq!(host.created, 1);
    }

    #[test]
    fn toggle_flips_state() {
        let (bus, state) = (EventBus::new(), SceneState::new());
        let mut spectator = coordinator(&bus, &state);
        let mut host = MountingHost::default();
        let scene = RefCell::new(SceneRoot::new());

        assert!(spectator.toggle(&mut host, &scene));
        assert!(!spectator.toggle(&mut host, &scene));
    }

    #[test]
    fn mode_listeners_may_borrow_the_scene() {
        let (bus, state) = (EventBus::new(), SceneState::new());
        let scene = Rc::new(RefCell::new(SceneRoot::new()));
        let seen = Rc::new(RefCell::new(Vec::new()));
        for topic in [Topic::SpectatorModeChanged, Topic::CameraSwitched] {
            let (scene, seen) = (Rc::clone(&scene), Rc::clone(&seen));
            let _ = bus.subscribe(topic, move |event| {
                let nodes = scene.borrow().len();
                seen.borrow_mut().push((event.clone(), nodes));
            });
        }

        let mut spectator = coordinator(&bus, &state);
        let mut host = MountingHost::default();
        spectator.enable(&mut host, &scene);
        spectator.switch_camera(1, &scene);
        spectator.disable(&mut host, &scene);

        assert_eq!(
            *seen.borrow(),
            vec![
                (Event::SpectatorModeChanged(true), 1),
                (Event::CameraSwitched(1), 1),
                (Event::SpectatorModeChanged(false), 1),
            ]
        );
    }

    //=====================================================================
    // Camera Switch Tests
    //=====================================================================

    #[test]
    fn switch_publishes_and_shows_headset_for_fixed_cameras() {
        let (bus, state) = (EventBus::new(), SceneState::new());
        let switched = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&switched);
        let _ = bus.subscribe(Topic::CameraSwitched, move |event| {
            if let Event::CameraSwitched(index) = event {
                sink.borrow_mut().push(*index);
            }
        });

        let mut spectator = coordinator(&bus, &state);
        let mut host = MountingHost::default();
        let scene = RefCell::new(SceneRoot::new());
        spectator.enable(&mut host, &scene);
        assert!(!spectator.headset_visible(&scene.borrow()));

        assert!(spectator.switch_camera(2, &scene));
        assert!(spectator.headset_visible(&scene.borrow()));

        assert!(spectator.switch_camera(0, &scene));
        assert!(!spectator.headset_visible(&scene.borrow()));
        assert_eq!(*switched.borrow(), vec![2, 0]);
    }

    #[test]
    fn unknown_camera_index_is_ignored() {
        let (bus, state) = (EventBus::new(), SceneState::new());
        let mut spectator = coordinator(&bus, &state);
        let scene = RefCell::new(SceneRoot::new());

        assert!(spectator.switch_camera(1, &scene));
        assert!(!spectator.switch_camera(3, &scene));
        assert_eq!(spectator.active_index(), 1);
    }

    #[test]
    fn selected_camera_survives_disable_enable() {
        let (bus, state) = (EventBus::new(), SceneState::new());
        let mut spectator = coordinator(&bus, &state);
        let mut host = MountingHost::default();
        let scene = RefCell::new(SceneRoot::new());

        spectator.enable(&mut host, &scene);
        spectator.switch_camera(1, &scene);
        spectator.disable(&mut host, &scene);
        assert!(!spectator.headset_visible(&scene.borrow()));

        spectator.enable(&mut host, &scene);
        assert_eq!(spectator.active_index(), 1);
        assert!(spectator.headset_visible(&scene.borrow()));
    }

    //=====================================================================
    // Per-frame Tests
    //=====================================================================

    #[test]
    fn sync_follows_head_or_fixed_pose() {
        let (bus, state) = (EventBus::new(), SceneState::new());
        let mut spectator = coordinator(&bus, &state);
        let mut host = MountingHost::default();
        let scene = RefCell::new(SceneRoot::new());
        spectator.enable(&mut host, &scene);

        let mut primary = Camera::default();
        primary.transform = Transform::from_position(Vec3::new(0.0, 1.7, 0.0));

        spectator.sync(&primary, &mut scene.borrow_mut());
        let camera = spectator.camera().unwrap();
        assert_eq!(camera.borrow().transform.position, Vec3::new(0.0, 1.7, 0.0));

        spectator.switch_camera(2, &scene);
        spectator.sync(&primary, &mut scene.borrow_mut());
        assert_eq!(camera.borrow().transform.position, Vec3::new(-3.0, 2.0, 3.0));

        let headset = scene.borrow().find(nodes::HEADSET).unwrap();
        assert_eq!(scene.borrow().node(headset).unwrap().transform.position, Vec3::new(0.0, 1.7, 0.0));
    }

    #[test]
    fn render_only_while_enabled() {
        let (bus, state) = (EventBus::new(), SceneState::new());
        let mut spectator = coordinator(&bus, &state);
        let mut host = MountingHost::default();
        let scene = RefCell::new(SceneRoot::new());

        assert!(!spectator.render(&scene.borrow()));
        spectator.enable(&mut host, &scene);
        assert!(spectator.render(&scene.borrow()));
        assert_eq!(spectator.frames(), 1);
    }
}
