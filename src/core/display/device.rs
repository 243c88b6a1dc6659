//=========================================================================
// Display Devices
//=========================================================================
//
// Host-facing contract for a head-mounted display, plus a simulated
// device for desktop development and tests.
//
// Device state (connection, presenting) is always queried live through
// the trait; nothing here caches it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::rc::Rc;

use glam::{Quat, Vec3};
use log::info;

//=== Internal Dependencies ===============================================

use crate::core::error::PresentError;

//=== Value Types =========================================================

/// Physical play-area extents reported by a tracked device, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageDimensions {
    pub width: f32,
    pub depth: f32,
}

impl StageDimensions {
    pub fn new(width: f32, depth: f32) -> Self {
        Self { width, depth }
    }

    pub fn area(&self) -> f32 {
        self.width * self.depth
    }
}

impl Default for StageDimensions {
    fn default() -> Self {
        Self::new(2.0, 2.0)
    }
}

/// Which eye a set of parameters belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Eye {
    Left,
    Right,
}

/// Per-eye render target size and offset from the head center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeParameters {
    pub render_width: u32,
    pub render_height: u32,
    pub offset: Vec3,
}

/// Head pose in standing space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

//=== HeadMountedDisplay ==================================================

/// A discovered head-mounted display.
///
/// Methods take `&self`: the device is shared between the selector, the
/// resize coordinator and the scene state.
pub trait HeadMountedDisplay {
    fn display_name(&self) -> &str;

    /// Play-area size, if the device tracks one.
    fn stage_parameters(&self) -> Option<StageDimensions>;

    fn is_connected(&self) -> bool;

    /// Whether the device is currently showing our frames.
    fn is_presenting(&self) -> bool;

    fn eye_parameters(&self, eye: Eye) -> Option<EyeParameters>;

    /// Latest head pose, if tracking is available.
    fn pose(&self) -> Option<Pose>;

    /// Asks the device to start presenting.
    fn request_present(&self) -> Result<(), PresentError>;
}

/// Shared handle to a discovered device.
pub type DisplayHandle = Rc<dyn HeadMountedDisplay>;

//=== SimulatedDisplay ====================================================

/// In-process stand-in for a real headset.
///
/// Presents immediately when asked, reports a fixed pose at standing
/// height, and can be disconnected to exercise stale-device paths.
#[derive(Debug)]
pub struct SimulatedDisplay {
    name: String,
    stage: Option<StageDimensions>,
    eye: Option<(u32, u32)>,
    connected: Cell<bool>,
    presenting: Cell<bool>,
    head_height: f32,
}

impl SimulatedDisplay {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stage: None,
            eye: Some((1080, 1200)),
            connected: Cell::new(true),
            presenting: Cell::new(false),
            head_height: 1.7,
        }
    }

    pub fn with_stage(mut self, stage: StageDimensions) -> Self {
        self.stage = Some(stage);
        self
    }

    /// Per-eye render size; `None` simulates a device reporting nothing.
    pub fn with_eye_size(mut self, eye: Option<(u32, u32)>) -> Self {
        self.eye = eye;
        self
    }

    pub fn with_head_height(mut self, height: f32) -> Self {
        self.head_height = height;
        self
    }

    /// Simulates the user unplugging the headset.
    pub fn disconnect(&self) {
        self.connected.set(false);
        self.presenting.set(false);
    }

    /// Simulates presentation ending (headset taken off, etc.).
    pub fn exit_present(&self) {
        self.presenting.set(false);
    }
}

impl HeadMountedDisplay for SimulatedDisplay {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn stage_parameters(&self) -> Option<StageDimensions> {
        self.stage
    }

    fn is_connected(&self) -> bool {
        self.connected.get()
    }

    fn is_presenting(&self) -> bool {
        self.presenting.get()
    }

    fn eye_parameters(&self, eye: Eye) -> Option<EyeParameters> {
        let (render_width, render_height) = self.eye?;
        let half_ipd = 0.032;
        let offset = match eye {
            Eye::Left => Vec3::new(-half_ipd, 0.0, 0.0),
            Eye::Right => Vec3::new(half_ipd, 0.0, 0.0),
        };
        Some(EyeParameters {
            render_width,
            render_height,
            offset,
        })
    }

    fn pose(&self) -> Option<Pose> {
        self.connected.get().then(|| Pose {
            position: Vec3::new(0.0, self.head_height, 0.0),
            orientation: Quat::IDENTITY,
        })
    }

    fn request_present(&self) -> Result<(), PresentError> {
        if !self.connected.get() {
            return Err(PresentError::Disconnected(self.name.clone()));
        }
        if !self.presenting.replace(true) {
            info!(target: "stage::display", "'{}' started presenting", self.name);
        }
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stage_is_two_by_two() {
        let stage = StageDimensions::default();
        assert_eq!(stage.area(), 4.0);
    }

    #[test]
    fn simulated_display_presents_on_request() {
        let display = SimulatedDisplay::new("sim");
        assert!(!display.is_presenting());
        display.request_present().unwrap();
        assert!(display.is_presenting());
    }

    #[test]
    fn disconnected_display_refuses_presentation() {
        let display = SimulatedDisplay::new("sim");
        display.disconnect();
        assert_eq!(
            display.request_present(),
            Err(PresentError::Disconnected("sim".into()))
        );
        assert!(display.pose().is_none());
    }

    #[test]
    fn eyes_are_offset_symmetrically() {
        let display = SimulatedDisplay::new("sim");
        let left = display.eye_parameters(Eye::Left).unwrap();
        let right = display.eye_parameters(Eye::Right).unwrap();
        assert_eq!(left.offset.x, -right.offset.x);
        assert_eq!(left.render_width, 1080);
    }

    #[test]
    fn missing_eye_parameters_are_reported_as_none() {
        let display = SimulatedDisplay::new("sim").with_eye_size(None);
        assert!(display.eye_parameters(Eye::Left).is_none());
    }
}
