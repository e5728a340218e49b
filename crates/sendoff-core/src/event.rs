//! Page-level input events.

use crate::document::ElementId;
use serde::{Deserialize, Serialize};

/// Events the page runtime forwards to its controllers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PageEvent {
    /// Primary click reaching the document
    Click {
        /// Innermost element that was clicked
        target: ElementId,
    },
    /// Key pressed anywhere in the document
    KeyDown {
        /// Key pressed
        key: Key,
    },
    /// The page or any scroll container scrolled
    Scroll,
    /// A CSS transition finished on an element
    TransitionEnd {
        /// Element whose transition ended
        target: ElementId,
    },
}

/// Keys the runtime distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Escape
    Escape,
    /// Enter / Return
    Enter,
    /// Tab
    Tab,
    /// Space bar
    Space,
    /// Backspace
    Backspace,
    /// Arrow up
    Up,
    /// Arrow down
    Down,
    /// Arrow left
    Left,
    /// Arrow right
    Right,
    /// Any key not listed above
    Other,
}

impl Key {
    /// Map a `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            // "Esc" is what older Edge builds report
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            " " | "Spacebar" => Self::Space,
            "Backspace" => Self::Backspace,
            "ArrowUp" | "Up" => Self::Up,
            "ArrowDown" | "Down" => Self::Down,
            "ArrowLeft" | "Left" => Self::Left,
            "ArrowRight" | "Right" => Self::Right,
            _ => Self::Other,
        }
    }
}

/// Whether an event should keep bubbling after a handler ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Propagation {
    /// Let the event reach outer listeners
    #[default]
    Continue,
    /// Call `stopPropagation()` on the native event
    Stop,
}
