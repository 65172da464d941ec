//! Pointer commands
//!
//! The abstract command set handed to the OS injection layer.

use serde::{Deserialize, Serialize};

/// One pointer action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PointerCommand {
    /// Absolute move in screen pixels
    MoveTo { x: i32, y: i32 },
    /// Left button pressed and held (drag start)
    ButtonDown,
    /// Left button released (drop)
    ButtonUp,
    /// Left click
    Click,
    /// Right click
    RightClick,
    /// Wheel scroll; positive scrolls up
    ScrollBy { amount: i32 },
    /// Pause before the next command so the target settles under the cursor
    Settle { millis: u64 },
}

impl PointerCommand {
    /// Short stable name, used for logging and summaries.
    pub fn name(&self) -> &'static str {
        match self {
            PointerCommand::MoveTo { .. } => "move_to",
            PointerCommand::ButtonDown => "button_down",
            PointerCommand::ButtonUp => "button_up",
            PointerCommand::Click => "click",
            PointerCommand::RightClick => "right_click",
            PointerCommand::ScrollBy { .. } => "scroll_by",
            PointerCommand::Settle { .. } => "settle",
        }
    }

    /// Check if this changes the left button state
    pub fn is_button(&self) -> bool {
        matches!(self, PointerCommand::ButtonDown | PointerCommand::ButtonUp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&PointerCommand::MoveTo { x: 10, y: -2 }).unwrap();
        assert_eq!(json, r#"{"cmd":"move_to","x":10,"y":-2}"#);

        let json = serde_json::to_string(&PointerCommand::ButtonDown).unwrap();
        assert_eq!(json, r#"{"cmd":"button_down"}"#);

        let parsed: PointerCommand =
            serde_json::from_str(r#"{"cmd":"scroll_by","amount":-4}"#).unwrap();
        assert_eq!(parsed, PointerCommand::ScrollBy { amount: -4 });
    }

    #[test]
    fn test_classification() {
        assert!(PointerCommand::ButtonUp.is_button());
        assert!(!PointerCommand::Click.is_button());
        assert!(PointerCommand::ButtonDown.is_button());
        assert_eq!(PointerCommand::ScrollBy { amount: 1 }.name(), "scroll_by");
    }
}
