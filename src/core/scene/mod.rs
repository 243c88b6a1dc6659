//=========================================================================
// Scene System
//=========================================================================
//
// World graph, cameras, and the shared handle registry.
//
// Architecture:
//   SceneRoot
//     └─ nodes: Vec<SceneNode>  (optionally backed by Box<dyn Attachable>)
//   SceneState
//     └─ "camera", "scene", "vrDisplay", "stage", ... → shared handles
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::event_bus::EventBus;

//=== Module Declarations =================================================

mod camera;
mod light;
mod scene_root;
mod scene_state;

//=== Public API ==========================================================

pub use camera::{Camera, Transform};
pub use light::{KeyLight, ShadowCamera};
pub use scene_root::{NodeId, SceneNode, SceneRoot};
pub use scene_state::{keys, SceneState};

//=== Well-known Node Names ===============================================

/// Node names the orchestrator manipulates directly.
pub mod nodes {
    pub const HEADSET: &str = "headset";
    pub const KEY_LIGHT: &str = "keyLight";
    pub const FILL_LIGHT: &str = "fillLight";

    /// Environment nodes removed by `hideAll`.
    pub const HIDE_ALL: [&str; 9] = [
        "sky",
        "ground",
        "superHead",
        "cracks",
        KEY_LIGHT,
        FILL_LIGHT,
        "gamepadR",
        "gamepadL",
        "introBall",
    ];
}

//=== Attachable Trait ====================================================

/// Capability of scene content that can be attached to the scene root.
///
/// Content is composed, not inherited: anything with a name can be added.
/// Subscribing to bus topics is optional and happens in `on_attach`.
///
/// # Minimal Implementation
///
/// ```rust
/// # use xr_stage::prelude::*;
/// struct Sky;
///
/// impl Attachable for Sky {
///     fn name(&self) -> &str {
///         "sky"
///     }
/// }
/// ```
pub trait Attachable {
    /// Node name; used for lookup and by `hideAll`.
    fn name(&self) -> &str;

    /// Transform the node starts with.
    fn initial_transform(&self) -> Transform {
        Transform::IDENTITY
    }

    /// Called once, right before the node joins the scene root.
    ///
    /// Default implementation does nothing. Override to subscribe to
    /// `updateScene`, `stageChanged`, etc., or to register handles.
    fn on_attach(&mut self, _bus: &EventBus, _state: &SceneState) {}
}
