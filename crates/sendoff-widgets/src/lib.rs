//! Page controllers for the Sendoff site.
//!
//! Each controller works against [`sendoff_core::Document`], so the same code
//! drives the browser DOM and the in-memory document used in tests.
//!
//! # Example
//!
//! ```
//! use sendoff_core::{MemoryDocument, Rect};
//! use sendoff_widgets::{TooltipController, VisibilityPhase};
//!
//! let mut doc = MemoryDocument::new(1024.0, 768.0);
//! let term = doc.add("span", "tooltip-trigger", "latency", Rect::new(300.0, 300.0, 60.0, 18.0));
//!
//! let mut tooltip = TooltipController::default();
//! let reaction = tooltip.on_trigger_click(&mut doc, term);
//! assert_eq!(tooltip.phase(), VisibilityPhase::Showing);
//!
//! if let Some(done) = reaction.completion {
//!     tooltip.complete(&mut doc, done);
//! }
//! assert_eq!(tooltip.phase(), VisibilityPhase::Visible);
//! ```

mod fetch;
mod idea_panel;
mod newsletter;
mod placement;
mod tooltip;

pub use fetch::{FetchError, HttpReply};
pub use idea_panel::{IdeaPanel, PROMPT};
pub use newsletter::{LoadRequest, NewsletterLoader, ACTIVE_CLASS, PATH_ATTRIBUTE};
pub use placement::{place, Placement, Side, Spacing};
pub use tooltip::{
    Completion, Reaction, TooltipConfig, TooltipController, VisibilityPhase, ACTION_CLASS,
    OVERLAY_ID, TEXT_CLASS,
};
