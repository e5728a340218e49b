//! Click-to-show tooltip with a "search this text" action.
//!
//! A [`TooltipController`] owns at most one overlay. Showing a new tooltip
//! tears the previous one down synchronously; hiding plays the exit transition
//! and removes the overlay once the host resolves the returned
//! [`Completion`], either on `transitionend` or after
//! [`TooltipController::transition_timeout`], whichever comes first.

use crate::placement::{place, Placement, Spacing};
use sendoff_core::{
    encode_uri_component, Document, ElementId, Key, PageEvent, Point, Propagation,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Class on the text span inside the overlay.
pub const TEXT_CLASS: &str = "tooltip-text";
/// Class on the search action inside the overlay.
pub const ACTION_CLASS: &str = "tooltip-search";
/// `id` given to the overlay so anchors can reference it.
pub const OVERLAY_ID: &str = "sendoff-tooltip";

/// Position of the tooltip in its show/hide lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VisibilityPhase {
    /// No overlay in the document
    #[default]
    Hidden,
    /// Overlay inserted, enter transition running
    Showing,
    /// Enter transition finished
    Visible,
    /// Exit transition running, overlay still in the document
    Hiding,
}

/// Tooltip settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    /// Marker class of elements that open a tooltip when clicked
    pub trigger_class: String,
    /// Class of the overlay element
    pub overlay_class: String,
    /// Class that drives the enter/exit CSS transition
    pub visible_class: String,
    /// Label of the search action
    pub action_label: String,
    /// Search URL prefix; the encoded text is appended
    pub search_url: String,
    /// Viewport margin and anchor gap
    pub spacing: Spacing,
    /// Upper bound on waiting for `transitionend`
    pub transition_timeout_ms: u32,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            trigger_class: "tooltip-trigger".to_string(),
            overlay_class: "tooltip".to_string(),
            visible_class: "visible".to_string(),
            action_label: "Search this text".to_string(),
            search_url: "https://www.google.com/search?q=".to_string(),
            spacing: Spacing::default(),
            transition_timeout_ms: 400,
        }
    }
}

/// Single-shot handle for one transition of one tooltip instance.
///
/// Resolving it twice, or after the tooltip it belongs to was replaced, does
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    generation: u64,
    phase: VisibilityPhase,
}

impl Completion {
    /// Phase this completion ends.
    #[must_use]
    pub const fn phase(&self) -> VisibilityPhase {
        self.phase
    }
}

/// What the host should do after the controller handled an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[must_use]
pub struct Reaction {
    /// Whether the native event should keep bubbling
    pub propagation: Propagation,
    /// Transition the host must resolve, if one started
    pub completion: Option<Completion>,
}

impl Reaction {
    const fn bubble(completion: Option<Completion>) -> Self {
        Self {
            propagation: Propagation::Continue,
            completion,
        }
    }
}

#[derive(Debug, Clone)]
struct ActiveTooltip {
    anchor: ElementId,
    text: String,
    overlay: ElementId,
    action: ElementId,
    phase: VisibilityPhase,
    generation: u64,
    placement: Placement,
}

impl ActiveTooltip {
    const fn completion(&self) -> Completion {
        Completion {
            generation: self.generation,
            phase: self.phase,
        }
    }
}

/// Owner of the page's single tooltip.
#[derive(Debug, Clone, Default)]
pub struct TooltipController {
    config: TooltipConfig,
    active: Option<ActiveTooltip>,
    generation: u64,
}

impl TooltipController {
    /// Create a controller.
    #[must_use]
    pub fn new(config: TooltipConfig) -> Self {
        Self {
            config,
            active: None,
            generation: 0,
        }
    }

    /// Settings in use.
    #[must_use]
    pub const fn config(&self) -> &TooltipConfig {
        &self.config
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> VisibilityPhase {
        self.active.as_ref().map_or(VisibilityPhase::Hidden, |a| a.phase)
    }

    /// Text of the active tooltip.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.text.as_str())
    }

    /// Element the active tooltip is anchored to.
    #[must_use]
    pub fn anchor(&self) -> Option<ElementId> {
        self.active.as_ref().map(|a| a.anchor)
    }

    /// The overlay element, while one exists.
    #[must_use]
    pub fn overlay(&self) -> Option<ElementId> {
        self.active.as_ref().map(|a| a.overlay)
    }

    /// Where the active overlay was placed.
    #[must_use]
    pub fn placement(&self) -> Option<Placement> {
        self.active.as_ref().map(|a| a.placement)
    }

    /// Transition that is still waiting to be resolved.
    #[must_use]
    pub fn pending(&self) -> Option<Completion> {
        self.active
            .as_ref()
            .filter(|a| matches!(a.phase, VisibilityPhase::Showing | VisibilityPhase::Hiding))
            .map(ActiveTooltip::completion)
    }

    /// How long the host waits for `transitionend` before resolving anyway.
    #[must_use]
    pub fn transition_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.config.transition_timeout_ms))
    }

    /// Search URL for the active tooltip's text.
    #[must_use]
    pub fn search_url(&self) -> Option<String> {
        self.active
            .as_ref()
            .map(|a| format!("{}{}", self.config.search_url, encode_uri_component(&a.text)))
    }

    /// Show a tooltip with `text` anchored to `anchor`.
    ///
    /// Does nothing if the anchor is not in the document or the text is blank.
    /// Any tooltip already present is removed immediately, without waiting
    /// for its transition.
    pub fn show<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        anchor: ElementId,
        text: &str,
    ) -> Option<Completion> {
        let text = text.trim();
        if text.is_empty() {
            log::debug!("tooltip: ignoring blank text for {anchor}");
            return None;
        }
        let Some(anchor_rect) = doc.bounding_rect(anchor) else {
            log::debug!("tooltip: anchor {anchor} is not in the document");
            return None;
        };

        self.teardown(doc);
        self.generation += 1;

        let overlay = doc.create_element("div", &self.config.overlay_class);
        doc.set_attribute(overlay, "id", OVERLAY_ID);
        doc.set_attribute(overlay, "role", "tooltip");
        doc.set_attribute(overlay, "aria-hidden", "true");
        // Out of flow before measuring, so the overlay sizes to its content
        doc.set_position(overlay, Point::ORIGIN);

        let label = doc.create_element("span", TEXT_CLASS);
        doc.set_text(label, text);
        doc.append_child(overlay, label);

        let action = doc.create_element("button", ACTION_CLASS);
        doc.set_attribute(action, "type", "button");
        doc.set_text(action, &self.config.action_label);
        doc.append_child(overlay, action);

        let body = doc.body();
        doc.append_child(body, overlay);

        let size = doc.bounding_rect(overlay).map(|r| r.size()).unwrap_or_default();
        let placement = place(anchor_rect, size, doc.viewport(), self.config.spacing);
        doc.set_position(overlay, placement.origin);

        doc.set_attribute(anchor, "aria-describedby", OVERLAY_ID);
        doc.set_attribute(overlay, "aria-hidden", "false");
        doc.add_class(overlay, &self.config.visible_class);

        log::debug!(
            "tooltip: showing {:?} at ({}, {}) {:?} of {anchor}",
            text,
            placement.origin.x,
            placement.origin.y,
            placement.side
        );

        let active = ActiveTooltip {
            anchor,
            text: text.to_string(),
            overlay,
            action,
            phase: VisibilityPhase::Showing,
            generation: self.generation,
            placement,
        };
        let completion = active.completion();
        self.active = Some(active);
        Some(completion)
    }

    /// Start the exit transition.
    ///
    /// Returns `None` when there is nothing to hide or the tooltip is already
    /// hiding, so repeated calls have no further effect.
    pub fn hide<D: Document + ?Sized>(&mut self, doc: &mut D) -> Option<Completion> {
        let active = self.active.as_mut()?;
        if active.phase == VisibilityPhase::Hiding {
            return None;
        }
        doc.remove_class(active.overlay, &self.config.visible_class);
        doc.set_attribute(active.overlay, "aria-hidden", "true");
        active.phase = VisibilityPhase::Hiding;
        log::debug!("tooltip: hiding {:?}", active.text);
        Some(active.completion())
    }

    /// Resolve a transition.
    ///
    /// Returns `true` if the completion was current and changed state:
    /// `Showing` becomes `Visible`, `Hiding` removes the overlay.
    pub fn complete<D: Document + ?Sized>(&mut self, doc: &mut D, completion: Completion) -> bool {
        let current = self.pending();
        if current != Some(completion) {
            log::trace!("tooltip: ignoring stale {completion:?}");
            return false;
        }
        match completion.phase {
            VisibilityPhase::Showing => {
                if let Some(active) = self.active.as_mut() {
                    active.phase = VisibilityPhase::Visible;
                }
                true
            }
            VisibilityPhase::Hiding => {
                self.teardown(doc);
                true
            }
            VisibilityPhase::Hidden | VisibilityPhase::Visible => false,
        }
    }

    /// Handle a click on a trigger element.
    ///
    /// Shows the trigger's text and asks the host to stop propagation so the
    /// document-level click handler does not hide the tooltip right away.
    pub fn on_trigger_click<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        trigger: ElementId,
    ) -> Reaction {
        let text = doc.text_content(trigger).unwrap_or_default();
        Reaction {
            propagation: Propagation::Stop,
            completion: self.show(doc, trigger, &text),
        }
    }

    /// Handle a document-level event.
    pub fn handle_event<D: Document + ?Sized>(&mut self, doc: &mut D, event: &PageEvent) -> Reaction {
        match event {
            PageEvent::Click { target } => self.on_document_click(doc, *target),
            PageEvent::KeyDown { key: Key::Escape } | PageEvent::Scroll => {
                Reaction::bubble(self.hide(doc))
            }
            PageEvent::KeyDown { .. } => Reaction::default(),
            PageEvent::TransitionEnd { target } => {
                if self.overlay() == Some(*target) {
                    if let Some(pending) = self.pending() {
                        self.complete(doc, pending);
                    }
                }
                Reaction::default()
            }
        }
    }

    fn on_document_click<D: Document + ?Sized>(&mut self, doc: &mut D, target: ElementId) -> Reaction {
        if let Some((action, overlay)) = self.active.as_ref().map(|a| (a.action, a.overlay)) {
            if doc.is_within(target, action) {
                if let Some(url) = self.search_url() {
                    log::info!("tooltip: opening search {url}");
                    doc.open_in_new_context(&url);
                }
                return Reaction::bubble(self.hide(doc));
            }
            if doc.is_within(target, overlay) {
                return Reaction::default();
            }
        }
        // Triggers added after the page was wired only reach the document
        if let Some(trigger) = doc.closest_with_class(target, &self.config.trigger_class) {
            return self.on_trigger_click(doc, trigger);
        }
        Reaction::bubble(self.hide(doc))
    }

    fn teardown<D: Document + ?Sized>(&mut self, doc: &mut D) {
        if let Some(active) = self.active.take() {
            doc.remove(active.overlay);
            doc.remove_attribute(active.anchor, "aria-describedby");
            log::debug!("tooltip: removed overlay {}", active.overlay);
        }
    }
}
