//=========================================================================
// Bus Events
//=========================================================================
//
// Topics and payloads carried by the EventBus.
//
// Each `Event` variant belongs to exactly one `Topic`. Handlers subscribe
// by topic and receive the whole event, so the payload travels with the
// topic instead of as loose positional arguments.
//
//=========================================================================

//=== Topic ===============================================================

/// Identifies a channel on the [`EventBus`](super::EventBus).
///
/// Topics without subscribers are valid; publishing to them does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    //--- Published by the orchestrator -----------------------------------
    StageChanged,
    UpdateScene,
    PauseAll,
    SpectatorModeChanged,
    CameraSwitched,

    //--- Published by scene content --------------------------------------
    ShellRised,
    ElevationStarted,
    HideAll,
    LastAssetIsLoaded,

    //--- Published by the input collaborator -----------------------------
    DebugPhysicsChange,
    ChangeSpectatorMode,
    CameraIndexSelected,
    TogglePause,
}

//=== Event ===============================================================

/// A published message together with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The experience moved to a named stage (`"intro"`, `"experience"`, ...).
    StageChanged(String),

    /// Published once per frame, before rendering.
    UpdateScene { delta: f64, elapsed: f64 },

    /// The frame loop was paused (`true`) or resumed (`false`).
    PauseAll(bool),

    /// Spectator mode was switched on (`true`) or off (`false`).
    SpectatorModeChanged(bool),

    /// The spectator camera now follows the camera with this index.
    CameraSwitched(usize),

    ShellRised,
    ElevationStarted,
    HideAll,
    LastAssetIsLoaded,
    DebugPhysicsChange,

    /// Request to flip spectator mode.
    ChangeSpectatorMode,

    /// Request to point the spectator camera at camera `n` (0 = headset).
    CameraIndexSelected(usize),

    /// Request to flip the paused state of the frame loop.
    TogglePause,
}

impl Event {
    /// Returns the topic this event is published on.
    pub fn topic(&self) -> Topic {
        match self {
            Self::StageChanged(_) => Topic::StageChanged,
            Self::UpdateScene { .. } => Topic::UpdateScene,
            Self::PauseAll(_) => Topic::PauseAll,
            Self::SpectatorModeChanged(_) => Topic::SpectatorModeChanged,
            Self::CameraSwitched(_) => Topic::CameraSwitched,
            Self::ShellRised => Topic::ShellRised,
            Self::ElevationStarted => Topic::ElevationStarted,
            Self::HideAll => Topic::HideAll,
            Self::LastAssetIsLoaded => Topic::LastAssetIsLoaded,
            Self::DebugPhysicsChange => Topic::DebugPhysicsChange,
            Self::ChangeSpectatorMode => Topic::ChangeSpectatorMode,
            Self::CameraIndexSelected(_) => Topic::CameraIndexSelected,
            Self::TogglePause => Topic::TogglePause,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
