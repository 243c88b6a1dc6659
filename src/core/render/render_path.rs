//=========================================================================
// Render Path Selector
//=========================================================================
//
// Chooses between the HMD stereo pipeline and the desktop renderer once
// display discovery resolves.
//
// State machine:
//   Undecided ──found──────→ Hmd       (head tracking installed)
//   Undecided ──not found──→ Fallback  (orbit controls installed)
//
// Both resolved states are terminal for the session.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::{CameraView, RenderSurface, StereoEffect};
use crate::core::controls::{CameraControls, ControlsKind, HeadTrackingControls, OrbitControls};
use crate::core::display::{DiscoveryOutcome, DisplayHandle};
use crate::core::scene::{Camera, SceneRoot};

//=== RenderPath ==========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPath {
    /// Discovery has not answered yet; nothing is drawn.
    Undecided,

    /// Rendering through the head-mounted display's stereo effect.
    Hmd,

    /// Rendering directly to the desktop surface.
    Fallback,
}

//=== RenderPathSelector ==================================================

/// Owns the primary surface and decides how it is drawn.
pub struct RenderPathSelector {
    path: RenderPath,
    surface: Box<dyn RenderSurface>,
    effect: Option<StereoEffect>,
    controls: Option<Box<dyn CameraControls>>,
    user_height: f32,
    hmd_frames: u64,
    direct_frames: u64,
}

impl RenderPathSelector {
    //--- Construction -----------------------------------------------------

    /// `user_height` places the desktop camera when falling back.
    pub fn new(surface: Box<dyn RenderSurface>, user_height: f32) -> Self {
        Self {
            path: RenderPath::Undecided,
            surface,
            effect: None,
            controls: None,
            user_height,
            hmd_frames: 0,
            direct_frames: 0,
        }
    }

    //--- Transitions ------------------------------------------------------

    /// Applies the discovery outcome. Only the first call transitions.
    pub fn resolve(&mut self, outcome: &DiscoveryOutcome, camera: &mut Camera) -> RenderPath {
        if self.path != RenderPath::Undecided {
            warn!(
                target: "stage::render",
                "Render path already {:?}, ignoring {:?}",
                self.path,
                outcome
            );
            return self.path;
        }

        match outcome {
            DiscoveryOutcome::Found(device) => {
                info!(
                    target: "stage::render",
                    "Using HMD path on '{}'",
                    device.display_name()
                );
                self.effect = Some(StereoEffect::new(DisplayHandle::clone(device)));
                self.controls = Some(Box::new(HeadTrackingControls::new(DisplayHandle::clone(device))));
                self.path = RenderPath::Hmd;
            }
            DiscoveryOutcome::NotFound | DiscoveryOutcome::Failed(_) => {
                info!(target: "stage::render", "Using desktop fallback path with orbit controls");
                self.controls = Some(Box::new(OrbitControls::at_user_height(camera, self.user_height)));
                self.path = RenderPath::Fallback;
            }
        }

        self.path
    }

    //--- Queries ----------------------------------------------------------

    pub fn path(&self) -> RenderPath {
        self.path
    }

    /// The device backing the HMD path.
    pub fn device(&self) -> Option<&DisplayHandle> {
        self.effect.as_ref().map(StereoEffect::device)
    }

    /// True only on the HMD path while the device is presenting right now.
    pub fn is_presenting(&self) -> bool {
        self.device().is_some_and(|device| device.is_presenting())
    }

    pub fn controls_kind(&self) -> Option<ControlsKind> {
        self.controls.as_ref().map(|c| c.kind())
    }

    pub fn controls_mut(&mut self) -> Option<&mut (dyn CameraControls + 'static)> {
        self.controls.as_deref_mut()
    }

    pub fn surface_size(&self) -> (u32, u32) {
        self.surface.size()
    }

    /// Frames drawn through the HMD effect and directly, respectively.
    pub fn frame_counts(&self) -> (u64, u64) {
        (self.hmd_frames, self.direct_frames)
    }

    //--- Per-frame --------------------------------------------------------

    /// Runs the installed controls against the primary camera.
    pub fn update_controls(&mut self, camera: &mut Camera, dt: f32) {
        if let Some(controls) = self.controls.as_mut() {
            controls.update(camera, dt);
        }
    }

    /// Draws one frame on the active path. Returns `false` while undecided.
    pub fn render(&mut self, scene: &SceneRoot, camera: &Camera) -> bool {
        match self.path {
            RenderPath::Undecided => {
                trace!(target: "stage::render", "Render skipped, path undecided");
                false
            }
            RenderPath::Hmd => {
                if let Some(effect) = self.effect.as_ref() {
                    effect.render(self.surface.as_mut(), scene, camera);
                }
                self.hmd_frames += 1;
                true
            }
            RenderPath::Fallback => {
                let (width, height) = self.surface.size();
                self.surface.draw(scene, &[CameraView::mono(camera, width, height)]);
                self.direct_frames += 1;
                true
            }
        }
    }

    /// Resizes the primary surface, whichever path is active.
    pub fn resize(&mut self, width: u32, height: u32) {
        debug!(target: "stage::render", "Primary surface resized to {}x{}", width, height);
        self.surface.set_size(width, height);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
