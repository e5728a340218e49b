//! Browser event handling - converts web events to page events.

use sendoff_core::{Key, PageEvent};
use wasm_bindgen::JsCast;
use web_sys::{Event, KeyboardEvent};

/// Convert a `keydown` event.
///
/// Returns `None` for events that are not keyboard events.
pub fn keydown_to_page(event: &Event) -> Option<PageEvent> {
    let event = event.dyn_ref::<KeyboardEvent>()?;
    Some(PageEvent::KeyDown {
        key: Key::from_dom_key(&event.key()),
    })
}

/// Whether a click used a modifier or non-primary button, in which case the
/// browser's own link handling should win.
pub fn is_modified_click(event: &Event) -> bool {
    event
        .dyn_ref::<web_sys::MouseEvent>()
        .is_some_and(|e| e.button() != 0 || e.ctrl_key() || e.meta_key() || e.shift_key())
}
