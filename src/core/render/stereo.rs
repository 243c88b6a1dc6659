//=========================================================================
// Stereo Effect
//=========================================================================
//
// HMD render pipeline: splits the surface into left/right eye viewports
// and offsets the camera per eye while the device is presenting.
//
// When the device is not presenting the effect falls back to a single
// full-surface view, so the desktop mirror keeps working.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{CameraView, RenderSurface, Viewport};
use crate::core::display::{DisplayHandle, Eye};
use crate::core::scene::{Camera, SceneRoot};

//=== StereoEffect ========================================================

/// Renders a camera stereoscopically for a head-mounted display.
pub struct StereoEffect {
    device: DisplayHandle,
}

impl StereoEffect {
    pub fn new(device: DisplayHandle) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &DisplayHandle {
        &self.device
    }

    /// Views to draw this frame, based on the device's live state.
    pub fn views(&self, camera: &Camera, width: u32, height: u32) -> Vec<CameraView> {
        if !self.device.is_presenting() {
            return vec![CameraView::mono(camera, width, height)];
        }

        let half = width / 2;
        [Eye::Left, Eye::Right]
            .into_iter()
            .map(|eye| {
                let viewport = match eye {
                    Eye::Left => Viewport { x: 0, y: 0, width: half, height },
                    Eye::Right => Viewport { x: half, y: 0, width: width - half, height },
                };

                let mut eye_camera = camera.clone();
                eye_camera.set_aspect(viewport.aspect());
                if let Some(params) = self.device.eye_parameters(eye) {
                    eye_camera.transform.position += camera.transform.rotation * params.offset;
                }

                CameraView {
                    view_projection: eye_camera.view_projection(),
                    viewport,
                }
            })
            .collect()
    }

    pub fn render(&self, surface: &mut dyn RenderSurface, scene: &SceneRoot, camera: &Camera) {
        let (width, height) = surface.size();
        let views = self.views(camera, width, height);
        surface.draw(scene, &views);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
