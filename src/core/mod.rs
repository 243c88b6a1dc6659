//=========================================================================
// Stage Core
//
// Host-independent systems of the stage orchestrator.
//
// Layers (leaves first):
// - `event_bus`, `clock`, `scene`: shared primitives
// - `display`: head-mounted display contract and discovery
// - `render`, `controls`: render path selection and camera controls
// - `frame`, `spectator`, `resize`: per-frame loop and viewport handling
// - `platform_bridge`, `input`, `config`: host contract and settings
//
// Everything here is single-threaded. Shared handles are `Rc<RefCell<..>>`
// and the only asynchronous input is the host event channel.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod clock;
pub mod config;
pub mod controls;
pub mod display;
pub mod error;
pub mod event_bus;
pub mod frame;
pub mod input;
pub mod platform_bridge;
pub mod render;
pub mod resize;
pub mod scene;
pub mod spectator;
