//=========================================================================
// Event Bus
//=========================================================================
//
// Publish/subscribe channel decoupling the orchestrator from scene content.
//
// Components:
// - `event`: topics and typed payloads
// - `bus`: the subscriber registry and synchronous dispatch
//
//=========================================================================

//=== Module Declarations =================================================

mod bus;
mod event;

//=== Public API ==========================================================

pub use bus::{EventBus, Subscription};
pub use event::{Event, Topic};
