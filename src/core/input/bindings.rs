//=========================================================================
// Input Bindings
//=========================================================================
//
// Maps host key presses to bus events.
//
// Architecture:
//   KeyCode → HashMap → Event → EventBus
//
// The bindings are the whole input collaborator: the orchestrator never
// reacts to keys directly, it reacts to the events they publish.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::trace;

//=== Internal Dependencies ===============================================

use super::KeyCode;
use crate::core::event_bus::Event;

//=== InputBindings =======================================================

/// Key → event lookup table.
#[derive(Debug, Clone, Default)]
pub struct InputBindings {
    keys: HashMap<KeyCode, Event>,
}

impl InputBindings {
    /// Empty table; every key is unbound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stock layout for `fixed_cameras` numbered spectator cameras.
    ///
    /// | Key | Event |
    /// |-----|-------|
    /// | `P` | `DebugPhysicsChange` |
    /// | `V` | `ChangeSpectatorMode` |
    /// | `Space` | `TogglePause` |
    /// | `0`..=`N` | `CameraIndexSelected(n)` |
    pub fn defaults(fixed_cameras: usize) -> Self {
        let mut bindings = Self::new();
        bindings.bind_key(KeyCode::KeyP, Event::DebugPhysicsChange);
        bindings.bind_key(KeyCode::KeyV, Event::ChangeSpectatorMode);
        bindings.bind_key(KeyCode::Space, Event::TogglePause);

        for index in 0..=fixed_cameras {
            if let Some(key) = KeyCode::digit(index) {
                bindings.bind_key(key, Event::CameraIndexSelected(index));
            }
        }
        bindings
    }

    //--- Binding Management -----------------------------------------------

    /// Binds `key`, replacing any previous binding.
    pub fn bind_key(&mut self, key: KeyCode, event: Event) {
        self.keys.insert(key, event);
    }

    pub fn unbind_key(&mut self, key: KeyCode) {
        self.keys.remove(&key);
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    //--- Event Mapping ----------------------------------------------------

    /// Event to publish for a key press, if the key is bound.
    pub fn map_key(&self, key: KeyCode) -> Option<Event> {
        let event = self.keys.get(&key).cloned();
        trace!(target: "stage::input", "{:?} → {:?}", key, event);
        event
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
