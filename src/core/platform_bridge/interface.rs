//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Host-to-core contract: the capabilities the orchestrator asks of the
// host, the notifications the host sends back, and host errors.
//
// Calls flow core → host through `PlatformContext`. Notifications flow
// host → core as `HostEvent`s on a channel that the orchestrator drains
// on every pump, so the host never calls into the core re-entrantly.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::display::DiscoveryResponder;
use crate::core::input::KeyCode;
use crate::core::render::{RenderSurface, SurfaceRole};

//=== PlatformContext =====================================================

/// Capabilities the host platform exposes to the orchestrator.
pub trait PlatformContext {
    /// Current viewport size in physical pixels.
    fn viewport_size(&self) -> (u32, u32);

    /// Asks for one `HostEvent::FrameCallback` before the next repaint.
    fn request_frame(&mut self);

    /// Starts device enumeration. The host answers through `responder`,
    /// now or later; dropping it unanswered counts as abandonment.
    fn enumerate_displays(&mut self, responder: DiscoveryResponder);

    /// Builds a render surface for `role`, sized to the viewport.
    fn create_surface(&mut self, role: SurfaceRole) -> Box<dyn RenderSurface>;

    /// Puts the surface for `role` in the viewport, replacing the other.
    fn mount_surface(&mut self, role: SurfaceRole);

    /// Removes the loading indicator, if the host shows one.
    fn hide_preloader(&mut self) {}
}

//=== HostEvent ===========================================================

/// Notifications sent from the host to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// The viewport changed size.
    ViewportResized { width: u32, height: u32 },

    /// The device began presenting, or the user activated presentation.
    PresentationActivated,

    /// A frame requested through `request_frame` is due.
    FrameCallback,

    /// A key was pressed.
    Key(KeyCode),

    /// Pointer moved with the primary button held, in pixels.
    PointerDrag { dx: f32, dy: f32 },

    /// Wheel scrolled, in lines (positive away from the user).
    Scroll(f32),

    /// The host is shutting down.
    CloseRequested,
}

//=== PlatformError =======================================================

/// Host initialization and runtime errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Event loop creation failed (OS-level issue).
    #[error("Event loop creation failed: {0}")]
    EventLoopCreation(String),

    /// Event loop execution error.
    #[error("Event loop error: {0}")]
    EventLoopExecution(String),

    /// Window creation failed.
    #[error("Window creation failed: {0}")]
    WindowCreation(String),
}
