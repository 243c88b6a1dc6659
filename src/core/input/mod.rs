//=========================================================================
// Input
//=========================================================================
//
// Key codes reported by the host and the bindings that turn them into
// bus events.
//
//=========================================================================

//=== Module Declarations =================================================

mod bindings;
mod event;

//=== Public API ==========================================================

pub use bindings::InputBindings;
pub use event::KeyCode;
