//=========================================================================
// Key Codes
//=========================================================================
//
// Portable physical key identifiers reported by the host.
//
// Hosts translate their native key codes into `KeyCode`; the core only
// ever sees this enum. Keys the host cannot translate arrive as
// `Unidentified` and never match a binding.
//
//=========================================================================

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced, so
/// `KeyP` is the same key on QWERTY and AZERTY layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,

    /// Any key the host could not translate.
    Unidentified,
}

impl KeyCode {
    const DIGITS: [KeyCode; 10] = [
        KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4,
        KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8, KeyCode::Digit9,
    ];

    /// Number-row key for `n`, if `n` is a single digit.
    pub fn digit(n: usize) -> Option<KeyCode> {
        Self::DIGITS.get(n).copied()
    }

    /// Numeric value of a number-row key.
    pub fn digit_value(self) -> Option<usize> {
        Self::DIGITS.iter().position(|&key| key == self)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
