//=========================================================================
// Input Processor
//=========================================================================
//
// Converts Winit input into host notifications for the stage.
//
// Architecture:
//   Winit Events → InputProcessor → HostEvent (Key, PointerDrag, Scroll)
//
// Stateful pointer tracking: the last cursor position and the primary
// button state turn absolute cursor moves into drag deltas. Key repeats,
// releases and unmapped keys are filtered out.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, MouseButton, MouseScrollDelta},
    keyboard::PhysicalKey,
};

//=== Internal Dependencies ===============================================

use crate::core::input::KeyCode;
use crate::core::platform_bridge::HostEvent;

//=== InputProcessor ======================================================

/// Turns raw pointer and key input into `HostEvent`s.
pub(crate) struct InputProcessor {
    cursor: Option<(f32, f32)>,
    dragging: bool,
}

impl InputProcessor {
    /// Pixels per wheel line for touchpads reporting pixel deltas.
    const PIXELS_PER_LINE: f32 = 40.0;

    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            cursor: None,
            dragging: false,
        }
    }

    //--- Event Processing -------------------------------------------------

    /// Maps a fresh key press. Releases, repeats and unmapped keys yield `None`.
    ///
    /// `Enter` is the user's activation gesture and becomes
    /// `PresentationActivated` instead of a key event.
    pub(crate) fn process_key(
        &self,
        physical_key: PhysicalKey,
        state: ElementState,
        repeat: bool,
    ) -> Option<HostEvent> {
        if state != ElementState::Pressed || repeat {
            return None;
        }

        let key = match physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            PhysicalKey::Unidentified(_) => return None,
        };

        match key {
            KeyCode::Unidentified => None,
            KeyCode::Enter => Some(HostEvent::PresentationActivated),
            key => Some(HostEvent::Key(key)),
        }
    }

    /// Tracks the primary button; other buttons are ignored.
    pub(crate) fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.dragging = state == ElementState::Pressed;
        }
    }

    /// Records the cursor and reports the delta while dragging.
    pub(crate) fn process_cursor_move(&mut self, x: f32, y: f32) -> Option<HostEvent> {
        let previous = self.cursor.replace((x, y));

        match previous {
            Some((px, py)) if self.dragging => Some(HostEvent::PointerDrag { dx: x - px, dy: y - py }),
            _ => None,
        }
    }

    /// Forgets the cursor once it leaves the window.
    pub(crate) fn process_cursor_left(&mut self) {
        self.cursor = None;
        self.dragging = false;
    }

    /// Normalizes wheel input to lines.
    pub(crate) fn process_wheel(&self, delta: MouseScrollDelta) -> Option<HostEvent> {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(position) => position.y as f32 / Self::PIXELS_PER_LINE,
        };
        (lines != 0.0).then_some(HostEvent::Scroll(lines))
    }

    #[cfg(test)]
    pub(crate) fn is_dragging(&self) -> bool {
        self.dragging
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;
    use winit::keyboard::KeyCode as WinitKeyCode;

    //=====================================================================
    // Key Tests
    //=====================================================================

    #[test]
    fn pressed_keys_become_key_events() {
        let processor = InputProcessor::new();
        let event = processor.process_key(PhysicalKey::Code(WinitKeyCode::KeyV), ElementState::Pressed, false);
        assert_eq!(event, Some(HostEvent::Key(KeyCode::KeyV)));
    }

    #[test]
    fn releases_and_repeats_are_dropped() {
        let processor = InputProcessor::new();
        let code = PhysicalKey::Code(WinitKeyCode::Space);

        assert_eq!(processor.process_key(code, ElementState::Released, false), None);
        assert_eq!(processor.process_key(code, ElementState::Pressed, true), None);
    }

    #[test]
    fn enter_activates_presentation() {
        let processor = InputProcessor::new();
        let event = processor.process_key(PhysicalKey::Code(WinitKeyCode::Enter), ElementState::Pressed, false);
        assert_eq!(event, Some(HostEvent::PresentationActivated));
    }

    #[test]
    fn unmapped_keys_are_filtered() {
        let processor = InputProcessor::new();
        let event = processor.process_key(PhysicalKey::Code(WinitKeyCode::F24), ElementState::Pressed, false);
        assert_eq!(event, None);
    }

    //=====================================================================
    // Pointer Tests
    //=====================================================================

    #[test]
    fn cursor_moves_without_button_are_not_drags() {
        let mut processor = InputProcessor::new();
        assert_eq!(processor.process_cursor_move(10.0, 10.0), None);
        assert_eq!(processor.process_cursor_move(20.0, 15.0), None);
    }

    #[test]
    fn dragging_reports_deltas() {
        let mut processor = InputProcessor::new();
        processor.process_cursor_move(10.0, 10.0);
        processor.process_mouse_button(MouseButton::Left, ElementState::Pressed);

        assert_eq!(
            processor.process_cursor_move(14.0, 7.0),
            Some(HostEvent::PointerDrag { dx: 4.0, dy: -3.0 })
        );

        processor.process_mouse_button(MouseButton::Left, ElementState::Released);
        assert!(!processor.is_dragging());
    }

    #[test]
    fn leaving_the_window_ends_the_drag() {
        let mut processor = InputProcessor::new();
        processor.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        processor.process_cursor_move(0.0, 0.0);
        processor.process_cursor_left();

        assert_eq!(processor.process_cursor_move(50.0, 50.0), None);
    }

    #[test]
    fn wheel_is_normalized_to_lines() {
        let processor = InputProcessor::new();

        assert_eq!(
            processor.process_wheel(MouseScrollDelta::LineDelta(0.0, -2.0)),
            Some(HostEvent::Scroll(-2.0))
        );
        assert_eq!(
            processor.process_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 80.0))),
            Some(HostEvent::Scroll(2.0))
        );
        assert_eq!(processor.process_wheel(MouseScrollDelta::LineDelta(3.0, 0.0)), None);
    }
}
