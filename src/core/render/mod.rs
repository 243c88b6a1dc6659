//=========================================================================
// Render Subsystem
//=========================================================================
//
// Render surfaces and the HMD/fallback path selection.
//
// Architecture:
//   RenderPathSelector
//     ├─ Undecided → draws nothing
//     ├─ Hmd       → StereoEffect → RenderSurface (two eye views)
//     └─ Fallback  → RenderSurface (one view)
//
// Surfaces come from the host platform; this module only decides which
// views get drawn into them and at what size.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Mat4;

//=== Internal Dependencies ===============================================

use crate::core::scene::{Camera, SceneRoot};

//=== Module Declarations =================================================

mod render_path;
mod stereo;

//=== Public API ==========================================================

pub use render_path::{RenderPath, RenderPathSelector};
pub use stereo::StereoEffect;

//=== Surface Types =======================================================

/// Which viewport slot a surface fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceRole {
    Primary,
    Spectator,
}

/// Pixel rectangle inside a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn full(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// One camera's view drawn into one viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub view_projection: Mat4,
    pub viewport: Viewport,
}

impl CameraView {
    /// Full-surface view of `camera`.
    pub fn mono(camera: &Camera, width: u32, height: u32) -> Self {
        Self {
            view_projection: camera.view_projection(),
            viewport: Viewport::full(width, height),
        }
    }
}

//=== RenderSurface Trait =================================================

/// An output target bound to a viewport slot.
///
/// Implemented by the host; GPU work happens behind `draw`.
pub trait RenderSurface {
    fn role(&self) -> SurfaceRole;

    fn size(&self) -> (u32, u32);

    fn set_size(&mut self, width: u32, height: u32);

    /// Draws the visible nodes of `scene` once per view.
    fn draw(&mut self, scene: &SceneRoot, views: &[CameraView]);
}
