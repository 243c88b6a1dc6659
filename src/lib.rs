//=========================================================================
// xr_stage: Library Root
//
// Scene-lifecycle and rendering-mode orchestrator for experiences that
// run on a head-mounted display when one is present and on the desktop
// otherwise.
//
// Typical usage:
// ```no_run
// use xr_stage::prelude::*;
//
// let mut app = AppBuilder::new().build(platform, events);
// app.init();
// while app.pump() == TickControl::Continue {}
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds every host-independent system. It is public so content
// collaborators can reach the bus, the scene and the shared state.
//
pub mod core;
pub mod prelude;

//--- Application ---------------------------------------------------------
//
// `app` composes the core systems; `platform` is the winit desktop host
// used by the binary.
//
pub mod app;
pub mod platform;

//--- Public Exports ------------------------------------------------------

pub use app::{host_channel, App, AppBuilder, ModeState};
