//=========================================================================
// Window Surface
//=========================================================================
//
// Bookkeeping render surface for the desktop host.
//
// Tracks its size and what it was asked to draw. Rasterization belongs
// to whichever renderer the application plugs in behind the window.
//
//=========================================================================

use log::trace;

use crate::core::render::{CameraView, RenderSurface, SurfaceRole};
use crate::core::scene::SceneRoot;

//=== WindowSurface =======================================================

#[derive(Debug)]
pub struct WindowSurface {
    role: SurfaceRole,
    size: (u32, u32),
    draws: u64,
    last_node_count: usize,
}

impl WindowSurface {
    pub fn new(role: SurfaceRole, size: (u32, u32)) -> Self {
        Self {
            role,
            size,
            draws: 0,
            last_node_count: 0,
        }
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Visible nodes submitted by the last draw.
    pub fn last_node_count(&self) -> usize {
        self.last_node_count
    }
}

impl RenderSurface for WindowSurface {
    fn role(&self) -> SurfaceRole {
        self.role
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn draw(&mut self, scene: &SceneRoot, views: &[CameraView]) {
        self.draws += 1;
        self.last_node_count = scene.visible_nodes().count();
        trace!(
            target: "platform",
            "{:?} surface draw #{}: {} node(s) in {} view(s)",
            self.role,
            self.draws,
            self.last_node_count,
            views.len()
        );
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
