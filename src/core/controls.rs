//=========================================================================
// Camera Controls
//=========================================================================
//
// Drivers that move the primary camera each frame.
//
// - HeadTrackingControls: copies the headset pose (HMD path)
// - OrbitControls: pointer-driven orbit around a target (fallback path)
//
// Exactly one set of controls drives the primary camera once the render
// path is decided.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Quat, Vec3};

//=== Internal Dependencies ===============================================

use crate::core::display::DisplayHandle;
use crate::core::scene::Camera;

//=== ControlsKind ========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlsKind {
    HeadTracking,
    Orbit,
}

//=== CameraControls Trait ================================================

/// Moves a camera once per frame.
pub trait CameraControls {
    fn kind(&self) -> ControlsKind;

    /// Applies accumulated input to `camera`.
    fn update(&mut self, camera: &mut Camera, dt: f32);

    /// Pointer drag in pixels. Default implementation ignores it.
    fn on_pointer_drag(&mut self, _dx: f32, _dy: f32) {}

    /// Scroll in lines, positive = away from the user. Ignored by default.
    fn on_scroll(&mut self, _delta: f32) {}
}

//=== HeadTrackingControls ================================================

/// Standing-space head tracking from the discovered display.
pub struct HeadTrackingControls {
    device: DisplayHandle,
}

impl HeadTrackingControls {
    pub fn new(device: DisplayHandle) -> Self {
        Self { device }
    }
}

impl CameraControls for HeadTrackingControls {
    fn kind(&self) -> ControlsKind {
        ControlsKind::HeadTracking
    }

    fn update(&mut self, camera: &mut Camera, _dt: f32) {
        // Lost tracking keeps the last known pose.
        if let Some(pose) = self.device.pose() {
            camera.transform.position = pose.position;
            camera.transform.rotation = pose.orientation;
        }
    }
}

//=== OrbitControls =======================================================

/// Desktop orbit controls with keyboard panning disabled.
///
/// The camera orbits `target` on a sphere; drags change yaw/pitch and
/// scrolling changes the radius.
pub struct OrbitControls {
    target: Vec3,
    radius: f32,
    yaw: f32,
    pitch: f32,
    pending_drag: (f32, f32),
    pending_scroll: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitControls {
    /// Places the camera at user height and orbits a point just ahead of it.
    pub fn at_user_height(camera: &mut Camera, user_height: f32) -> Self {
        let position = Vec3::new(0.0, user_height, 0.0);
        let target = Vec3::new(0.0, user_height, -1.0);
        camera.transform.position = position;

        let mut controls = Self {
            target,
            radius: 1.0,
            yaw: 0.0,
            pitch: 0.0,
            pending_drag: (0.0, 0.0),
            pending_scroll: 0.0,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            min_distance: 0.1,
            max_distance: 50.0,
        };
        controls.apply(camera);
        controls
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    fn apply(&self, camera: &mut Camera) {
        let rotation = Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch);
        let offset = rotation * Vec3::new(0.0, 0.0, self.radius);
        camera.transform.position = self.target + offset;
        camera.transform.rotation = rotation;
    }
}

impl CameraControls for OrbitControls {
    fn kind(&self) -> ControlsKind {
        ControlsKind::Orbit
    }

    fn update(&mut self, camera: &mut Camera, _dt: f32) {
        let (dx, dy) = std::mem::take(&mut self.pending_drag);
        let scroll = std::mem::take(&mut self.pending_scroll);

        self.yaw -= dx * self.rotate_speed;
        self.pitch -= dy * self.rotate_speed;

        // Stop short of the poles
        let max_pitch = std::f32::consts::FRAC_PI_2 - 0.01;
        self.pitch = self.pitch.clamp(-max_pitch, max_pitch);

        if scroll != 0.0 {
            let factor = (1.0 + self.zoom_speed).powf(scroll);
            self.radius = (self.radius * factor).clamp(self.min_distance, self.max_distance);
        }

        self.apply(camera);
    }

    fn on_pointer_drag(&mut self, dx: f32, dy: f32) {
        self.pending_drag.0 += dx;
        self.pending_drag.1 += dy;
    }

    fn on_scroll(&mut self, delta: f32) {
        self.pending_scroll += delta;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
