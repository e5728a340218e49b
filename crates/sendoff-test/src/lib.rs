//! Testing harness for Sendoff page controllers.
//!
//! [`Harness`] drives a [`TooltipController`](sendoff_widgets::TooltipController)
//! over an in-memory document the way the browser runtime does: trigger
//! clicks stop at the trigger, other clicks reach the document handler, and
//! every transition gets a safety timeout on a simulated clock.
//!
//! ```
//! use sendoff_core::Rect;
//! use sendoff_test::Harness;
//!
//! let mut h = Harness::new();
//! let term = h.add_trigger("latency", Rect::new(300.0, 300.0, 60.0, 18.0));
//!
//! h.click(term).assert_overlay_count(1).assert_tooltip_text("latency");
//! h.press_escape().tick(400).assert_overlay_count(0);
//! ```

mod harness;

pub use harness::Harness;
