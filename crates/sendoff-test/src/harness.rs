//! Test harness for tooltip interactions.

use sendoff_core::{Document, ElementId, Key, MemoryDocument, PageEvent, Propagation, Rect};
use sendoff_widgets::{Completion, Reaction, TooltipConfig, TooltipController, VisibilityPhase};

/// Simulated page with a tooltip controller attached.
pub struct Harness {
    doc: MemoryDocument,
    tooltip: TooltipController,
    /// Safety timeouts, as (due time in ms, completion)
    timers: Vec<(u64, Completion)>,
    now_ms: u64,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    /// Create a harness with a 1280x720 viewport and default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TooltipConfig::default())
    }

    /// Create a harness with custom tooltip settings.
    #[must_use]
    pub fn with_config(config: TooltipConfig) -> Self {
        Self {
            doc: MemoryDocument::default(),
            tooltip: TooltipController::new(config),
            timers: Vec::new(),
            now_ms: 0,
        }
    }

    /// Set the viewport size.
    #[must_use]
    pub fn viewport(mut self, width: f32, height: f32) -> Self {
        self.doc.set_viewport(width, height);
        self
    }

    // === Page Setup ===

    /// Add a trigger element showing `text`.
    pub fn add_trigger(&mut self, text: &str, rect: Rect) -> ElementId {
        let class = self.tooltip.config().trigger_class.clone();
        self.doc.add("span", &class, text, rect)
    }

    /// Add a plain element.
    pub fn add_element(&mut self, tag: &str, text: &str, rect: Rect) -> ElementId {
        self.doc.add(tag, "", text, rect)
    }

    // === Event Simulation ===

    /// Click an element.
    ///
    /// A click inside a trigger is handled by the trigger and only reaches
    /// the document if the trigger lets it propagate.
    pub fn click(&mut self, target: ElementId) -> &mut Self {
        let trigger_class = &self.tooltip.config().trigger_class;
        if let Some(trigger) = self.doc.closest_with_class(target, trigger_class) {
            let reaction = self.tooltip.on_trigger_click(&mut self.doc, trigger);
            self.schedule(reaction);
            if reaction.propagation == Propagation::Stop {
                return self;
            }
        }
        self.dispatch(&PageEvent::Click { target })
    }

    /// Click an element that has no listener of its own, so the event goes
    /// straight to the document handler. This is what happens to triggers
    /// added to the page after the app was wired.
    pub fn click_unwired(&mut self, target: ElementId) -> &mut Self {
        self.dispatch(&PageEvent::Click { target })
    }

    /// Click the search action of the current tooltip.
    pub fn click_search(&mut self) -> &mut Self {
        let action = self
            .doc
            .elements_with_class(sendoff_widgets::ACTION_CLASS)
            .first()
            .copied();
        if let Some(action) = action {
            self.click(action);
        }
        self
    }

    /// Simulate a key press.
    pub fn press_key(&mut self, key: Key) -> &mut Self {
        self.dispatch(&PageEvent::KeyDown { key })
    }

    /// Simulate pressing Escape.
    pub fn press_escape(&mut self) -> &mut Self {
        self.press_key(Key::Escape)
    }

    /// Simulate a window scroll.
    pub fn scroll(&mut self) -> &mut Self {
        self.dispatch(&PageEvent::Scroll)
    }

    /// Fire `transitionend` on the overlay, as the browser does when the CSS
    /// transition runs to completion.
    pub fn end_transition(&mut self) -> &mut Self {
        if let Some(overlay) = self.tooltip.overlay() {
            self.dispatch(&PageEvent::TransitionEnd { target: overlay });
        }
        self
    }

    /// Advance simulated time, firing due safety timeouts.
    pub fn tick(&mut self, ms: u64) -> &mut Self {
        self.now_ms += ms;
        let now = self.now_ms;
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.timers.drain(..).partition(|(at, _)| *at <= now);
        self.timers = waiting;
        for (_, completion) in due {
            self.tooltip.complete(&mut self.doc, completion);
        }
        self
    }

    // === Queries ===

    /// The simulated document.
    #[must_use]
    pub const fn document(&self) -> &MemoryDocument {
        &self.doc
    }

    /// The controller under test.
    #[must_use]
    pub const fn tooltip(&self) -> &TooltipController {
        &self.tooltip
    }

    /// Number of overlays attached to the document.
    #[must_use]
    pub fn overlay_count(&self) -> usize {
        self.doc
            .elements_with_class(&self.tooltip.config().overlay_class)
            .len()
    }

    /// Bounding box of the attached overlay.
    #[must_use]
    pub fn overlay_rect(&self) -> Option<Rect> {
        self.tooltip
            .overlay()
            .and_then(|overlay| self.doc.bounding_rect(overlay))
    }

    /// Safety timeouts still waiting to fire.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    // === Assertions ===

    /// Assert the number of overlays in the document.
    ///
    /// # Panics
    ///
    /// Panics if the count does not match.
    pub fn assert_overlay_count(&self, expected: usize) -> &Self {
        let actual = self.overlay_count();
        assert_eq!(
            actual, expected,
            "Expected {expected} tooltip overlays but found {actual}"
        );
        self
    }

    /// Assert the text of the current tooltip.
    ///
    /// # Panics
    ///
    /// Panics if there is no tooltip or its text differs.
    pub fn assert_tooltip_text(&self, expected: &str) -> &Self {
        let overlay = self
            .tooltip
            .overlay()
            .unwrap_or_else(|| panic!("Expected tooltip '{expected}' but none is shown"));
        let actual = self.doc.text_content(overlay).unwrap_or_default();
        assert!(
            actual.contains(expected),
            "Expected tooltip text '{expected}' but overlay reads '{actual}'"
        );
        assert_eq!(self.tooltip.text(), Some(expected));
        self
    }

    /// Assert the current phase.
    ///
    /// # Panics
    ///
    /// Panics if the phase does not match.
    pub fn assert_phase(&self, expected: VisibilityPhase) -> &Self {
        let actual = self.tooltip.phase();
        assert_eq!(
            actual, expected,
            "Expected phase {expected:?} but tooltip is {actual:?}"
        );
        self
    }

    /// Assert the URLs opened so far.
    ///
    /// # Panics
    ///
    /// Panics if the opened URLs differ.
    pub fn assert_opened(&self, expected: &[&str]) -> &Self {
        let actual: Vec<&str> = self.doc.opened_urls().iter().map(String::as_str).collect();
        assert_eq!(actual, expected, "Unexpected URLs opened");
        self
    }

    // === Internal ===

    fn dispatch(&mut self, event: &PageEvent) -> &mut Self {
        let reaction = self.tooltip.handle_event(&mut self.doc, event);
        self.schedule(reaction);
        self
    }

    fn schedule(&mut self, reaction: Reaction) {
        if let Some(completion) = reaction.completion {
            let timeout = self.tooltip.config().transition_timeout_ms;
            self.timers
                .push((self.now_ms + u64::from(timeout), completion));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term_rect() -> Rect {
        Rect::new(400.0, 300.0, 120.0, 18.0)
    }

    #[test]
    fn test_harness_default_viewport() {
        let h = Harness::new();
        assert_eq!(h.document().viewport().width, 1280.0);
        assert_eq!(h.overlay_count(), 0);
    }

    #[test]
    fn test_viewport_builder() {
        let h = Harness::new().viewport(375.0, 667.0);
        assert_eq!(h.document().viewport().width, 375.0);
    }

    #[test]
    fn test_click_trigger_schedules_timer() {
        let mut h = Harness::new();
        let term = h.add_trigger("term", term_rect());
        h.click(term);
        assert_eq!(h.pending_timers(), 1);
        h.assert_phase(VisibilityPhase::Showing);
    }

    #[test]
    fn test_tick_before_due_keeps_timer() {
        let mut h = Harness::new();
        let term = h.add_trigger("term", term_rect());
        h.click(term).tick(399);
        assert_eq!(h.pending_timers(), 1);
        h.assert_phase(VisibilityPhase::Showing);
        h.tick(1);
        assert_eq!(h.pending_timers(), 0);
        h.assert_phase(VisibilityPhase::Visible);
    }

    #[test]
    fn test_click_child_of_trigger_routes_to_trigger() {
        let mut h = Harness::new();
        let term = h.add_trigger("term", term_rect());
        // Nested markup inside the trigger
        let inner = h.doc.create_element("em", "");
        h.doc.append_child(term, inner);
        h.click(inner);
        h.assert_overlay_count(1);
    }

    #[test]
    fn test_end_transition_without_overlay() {
        let mut h = Harness::new();
        h.end_transition().assert_overlay_count(0);
    }

    #[test]
    #[should_panic(expected = "Expected 1 tooltip overlays")]
    fn test_assert_overlay_count_fails() {
        Harness::new().assert_overlay_count(1);
    }

    #[test]
    #[should_panic(expected = "none is shown")]
    fn test_assert_tooltip_text_without_tooltip() {
        Harness::new().assert_tooltip_text("x");
    }
}
