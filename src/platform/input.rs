//! Input mapping
//!
//! Browser events arrive as key codes and pointer presses; the simulation
//! only knows about `jump` and `start`.

use crate::sim::TickInput;

/// Discrete input the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Space, ArrowUp or pointer down
    Jump,
    /// Enter
    Start,
    /// Toggle the demo autopilot
    ToggleAutopilot,
    /// Toggle the hitbox overlay
    ToggleHitboxes,
    /// Switch to the next difficulty preset (between runs)
    CycleDifficulty,
}

/// Map a `KeyboardEvent.code` to an input event
pub fn map_key(code: &str) -> Option<InputEvent> {
    match code {
        "Space" | "ArrowUp" => Some(InputEvent::Jump),
        "Enter" | "NumpadEnter" => Some(InputEvent::Start),
        "KeyI" => Some(InputEvent::ToggleAutopilot),
        "KeyH" => Some(InputEvent::ToggleHitboxes),
        "KeyD" => Some(InputEvent::CycleDifficulty),
        _ => None,
    }
}

impl InputEvent {
    /// Fold this event into the pending tick input.
    /// Returns true for events that should also prevent the browser default.
    pub fn apply(self, input: &mut TickInput) -> bool {
        match self {
            InputEvent::Jump => {
                input.jump = true;
                true
            }
            InputEvent::Start => {
                input.start = true;
                true
            }
            InputEvent::ToggleAutopilot => {
                input.autopilot = !input.autopilot;
                log::info!("Autopilot: {}", input.autopilot);
                false
            }
            // Settings, handled by the shell
            InputEvent::ToggleHitboxes | InputEvent::CycleDifficulty => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(map_key("Space"), Some(InputEvent::Jump));
        assert_eq!(map_key("ArrowUp"), Some(InputEvent::Jump));
        assert_eq!(map_key("Enter"), Some(InputEvent::Start));
        assert_eq!(map_key("KeyD"), Some(InputEvent::CycleDifficulty));
        assert_eq!(map_key("KeyQ"), None);
    }

    #[test]
    fn test_apply_sets_one_shot_flags() {
        let mut input = TickInput::default();
        assert!(InputEvent::Jump.apply(&mut input));
        assert!(input.jump);
        assert!(InputEvent::Start.apply(&mut input));
        assert!(input.start);
        assert!(!InputEvent::ToggleAutopilot.apply(&mut input));
        assert!(input.autopilot);
        assert!(!InputEvent::CycleDifficulty.apply(&mut input));
    }
}
