//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use xr_stage::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Orchestrator
pub use crate::app::{host_channel, App, AppBuilder, ModeState};
pub use crate::core::config::AppConfig;

// Host contract
pub use crate::core::platform_bridge::{HostEvent, PlatformContext, TickControl};
pub use crate::core::render::{CameraView, RenderPath, RenderSurface, SurfaceRole};

// Displays
pub use crate::core::display::{
    DiscoveryResponder, DisplayHandle, HeadMountedDisplay, SimulatedDisplay, StageDimensions,
};

// Scene content
pub use crate::core::event_bus::{Event, EventBus, Topic};
pub use crate::core::input::{InputBindings, KeyCode};
pub use crate::core::scene::{Attachable, Camera, SceneRoot, SceneState, Transform};
