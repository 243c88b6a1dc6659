//=========================================================================
// Platform Event Mapper
//
// Converts Winit physical key codes into the core's portable `KeyCode`.
//
// Only the keys the stage can bind are mapped; everything else becomes
// `KeyCode::Unidentified` and is dropped by the input processor.
//
//=========================================================================

use winit::keyboard::KeyCode as WinitKeyCode;

use crate::core::input::KeyCode;

//=== Key Conversion ======================================================

impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Numeric keys -------------------------------------------------
            Digit0 | Numpad0 => KeyCode::Digit0, Digit1 | Numpad1 => KeyCode::Digit1,
            Digit2 | Numpad2 => KeyCode::Digit2, Digit3 | Numpad3 => KeyCode::Digit3,
            Digit4 | Numpad4 => KeyCode::Digit4, Digit5 | Numpad5 => KeyCode::Digit5,
            Digit6 | Numpad6 => KeyCode::Digit6, Digit7 | Numpad7 => KeyCode::Digit7,
            Digit8 | Numpad8 => KeyCode::Digit8, Digit9 | Numpad9 => KeyCode::Digit9,

            //--- Alphabetic keys ----------------------------------------------
            KeyA => KeyCode::KeyA, KeyB => KeyCode::KeyB, KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD, KeyE => KeyCode::KeyE, KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG, KeyH => KeyCode::KeyH, KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ, KeyK => KeyCode::KeyK, KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM, KeyN => KeyCode::KeyN, KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP, KeyQ => KeyCode::KeyQ, KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS, KeyT => KeyCode::KeyT, KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV, KeyW => KeyCode::KeyW, KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY, KeyZ => KeyCode::KeyZ,

            //--- Special keys -------------------------------------------------
            Space => KeyCode::Space,
            Enter | NumpadEnter => KeyCode::Enter,
            Escape => KeyCode::Escape,

            //--- Fallback -----------------------------------------------------
            _ => KeyCode::Unidentified,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_keys_are_mapped() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyP), KeyCode::KeyP);
        assert_eq!(KeyCode::from(WinitKeyCode::KeyV), KeyCode::KeyV);
        assert_eq!(KeyCode::from(WinitKeyCode::Space), KeyCode::Space);
        assert_eq!(KeyCode::from(WinitKeyCode::Enter), KeyCode::Enter);
    }

    #[test]
    fn numpad_digits_select_cameras_too() {
        assert_eq!(KeyCode::from(WinitKeyCode::Numpad3), KeyCode::Digit3);
        assert_eq!(KeyCode::from(WinitKeyCode::Digit3), KeyCode::Digit3);
    }

    #[test]
    fn unmapped_keys_are_unidentified() {
        assert_eq!(KeyCode::from(WinitKeyCode::F13), KeyCode::Unidentified);
        assert_eq!(KeyCode::from(WinitKeyCode::ArrowUp), KeyCode::Unidentified);
    }
}
