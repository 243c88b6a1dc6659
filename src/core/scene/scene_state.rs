//=========================================================================
// Scene State
//=========================================================================
//
// Shared registry of named handles (camera, scene root, display device,
// named scene objects).
//
// Values are stored type-erased and read back by cloning, so handles are
// usually `Rc<..>` types or small `Copy` values. Reading a key with the
// wrong type yields `None`, the same as a missing key.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::{trace, warn};

//=== Well-known Keys =====================================================

/// Keys the orchestrator populates.
pub mod keys {
    pub const SCENE: &str = "scene";
    pub const CAMERA: &str = "camera";
    pub const CAMERA_SPECTATOR: &str = "cameraSpectator";
    pub const DISPLAY: &str = "vrDisplay";
    pub const STAGE: &str = "stage";
    pub const ROOM_AREA: &str = "roomArea";
    pub const KEY_LIGHT: &str = "keyLight";
    /// Ending chosen by the experience, stored as `u32`.
    pub const END_MODE: &str = "endMode";
}

//=== SceneState ==========================================================

/// Cloneable handle onto the shared key-value registry.
#[derive(Clone, Default)]
pub struct SceneState {
    entries: Rc<RefCell<HashMap<String, Box<dyn Any>>>>,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn add<T: 'static>(&self, key: &str, value: T) {
        trace!(target: "stage::state", "Registering '{}'", key);
        if self
            .entries
            .borrow_mut()
            .insert(key.to_string(), Box::new(value))
            .is_some()
        {
            warn!(target: "stage::state", "State entry '{}' was replaced", key);
        }
    }

    /// Returns a clone of the value under `key` if it exists with type `T`.
    pub fn get<T: Clone + 'static>(&self, key: &str) -> Option<T> {
        self.entries
            .borrow()
            .get(key)
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    pub fn remove(&self, key: &str) -> bool {
        self.entries.borrow_mut().remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl fmt::Debug for SceneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.borrow();
        let mut keys: Vec<_> = entries.keys().collect();
        keys.sort();
        f.debug_struct("SceneState").field("keys", &keys).finish()
    }
}

//=========================================================================
// Tests
//=========================================================================
