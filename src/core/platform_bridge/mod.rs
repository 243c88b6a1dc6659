//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the host platform (winit window, test fake) with the core.
//
// Components:
// - `interface`: `PlatformContext`, `HostEvent`, host errors (the contract)
// - `event_collector`: core-side draining of host notifications
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Public API ==========================================================

pub use event_collector::TickControl;
pub use interface::{HostEvent, PlatformContext, PlatformError};

pub(crate) use event_collector::EventCollector;
