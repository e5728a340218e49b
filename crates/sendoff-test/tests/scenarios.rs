//! End-to-end tooltip scenarios driven through the harness.

use proptest::prelude::*;
use sendoff_core::{Key, Rect};
use sendoff_test::Harness;
use sendoff_widgets::{Side, TooltipConfig, VisibilityPhase};

fn term_rect() -> Rect {
    Rect::new(400.0, 300.0, 120.0, 18.0)
}

// =========================================================================
// Lifecycle
// =========================================================================

#[test]
fn test_show_creates_single_overlay_with_text() {
    let mut h = Harness::new();
    let term = h.add_trigger("quantum computing", term_rect());
    h.click(term)
        .assert_overlay_count(1)
        .assert_tooltip_text("quantum computing");
}

#[test]
fn test_second_trigger_replaces_first() {
    let mut h = Harness::new();
    let first = h.add_trigger("first term", term_rect());
    let second = h.add_trigger("second term", Rect::new(100.0, 500.0, 90.0, 18.0));

    h.click(first).click(second);
    h.assert_overlay_count(1).assert_tooltip_text("second term");
}

#[test]
fn test_same_trigger_twice_keeps_one_overlay() {
    let mut h = Harness::new();
    let term = h.add_trigger("term", term_rect());
    h.click(term).click(term).assert_overlay_count(1);
}

#[test]
fn test_trigger_added_later_replaces_showing_tooltip() {
    let mut h = Harness::new();
    let term = h.add_trigger("quantum computing", term_rect());
    h.click(term).assert_tooltip_text("quantum computing");

    // Arrives with a newsletter fragment, after startup wiring
    let added = h.add_trigger("living will", Rect::new(100.0, 500.0, 80.0, 18.0));
    h.click_unwired(added)
        .assert_overlay_count(1)
        .assert_tooltip_text("living will")
        .assert_phase(VisibilityPhase::Showing);
    assert_eq!(h.tooltip().anchor(), Some(added));
}

#[test]
fn test_trigger_added_later_shows_from_hidden() {
    let mut h = Harness::new();
    let added = h.add_trigger("legacy contact", term_rect());
    h.click_unwired(added)
        .assert_overlay_count(1)
        .assert_tooltip_text("legacy contact");
}

#[test]
fn test_full_cycle_with_transition_events() {
    let mut h = Harness::new();
    let term = h.add_trigger("term", term_rect());
    let elsewhere = h.add_element("p", "paragraph", Rect::new(0.0, 600.0, 300.0, 20.0));

    h.click(term).assert_phase(VisibilityPhase::Showing);
    h.end_transition().assert_phase(VisibilityPhase::Visible);
    h.click(elsewhere).assert_phase(VisibilityPhase::Hiding);
    h.assert_overlay_count(1);
    h.end_transition()
        .assert_phase(VisibilityPhase::Hidden)
        .assert_overlay_count(0);
}

#[test]
fn test_safety_timeout_removes_overlay_without_transition_end() {
    let mut h = Harness::new();
    let term = h.add_trigger("term", term_rect());
    h.click(term).press_escape();
    h.assert_overlay_count(1);
    h.tick(400).assert_overlay_count(0);
}

#[test]
fn test_late_timeout_after_transition_end_is_harmless() {
    let mut h = Harness::new();
    let term = h.add_trigger("term", term_rect());
    h.click(term).end_transition().press_escape().end_transition();
    h.assert_overlay_count(0);

    // New tooltip shown before the old timers fire
    h.click(term);
    h.tick(400);
    h.assert_overlay_count(1).assert_phase(VisibilityPhase::Visible);
}

#[test]
fn test_show_during_exit_transition() {
    let mut h = Harness::new();
    let first = h.add_trigger("first", term_rect());
    let second = h.add_trigger("second", Rect::new(100.0, 500.0, 60.0, 18.0));

    h.click(first).press_escape().click(second);
    h.assert_overlay_count(1).assert_tooltip_text("second");
    h.tick(1000).assert_overlay_count(1);
}

#[test]
fn test_custom_timeout() {
    let config = TooltipConfig {
        transition_timeout_ms: 50,
        ..TooltipConfig::default()
    };
    let mut h = Harness::with_config(config);
    let term = h.add_trigger("term", term_rect());
    h.click(term).scroll().tick(50).assert_overlay_count(0);
}

// =========================================================================
// Dismissal
// =========================================================================

#[test]
fn test_hide_when_hidden_is_noop() {
    let mut h = Harness::new();
    h.press_escape().scroll().tick(1000);
    h.assert_overlay_count(0).assert_phase(VisibilityPhase::Hidden);
}

#[test]
fn test_escape_removes_visible_overlay() {
    let mut h = Harness::new();
    let term = h.add_trigger("term", term_rect());
    h.click(term).end_transition().press_escape().tick(400);
    h.assert_overlay_count(0);
}

#[test]
fn test_non_escape_keys_are_ignored() {
    let mut h = Harness::new();
    let term = h.add_trigger("term", term_rect());
    h.click(term)
        .press_key(Key::Enter)
        .press_key(Key::Other)
        .tick(1000);
    h.assert_overlay_count(1).assert_phase(VisibilityPhase::Visible);
}

#[test]
fn test_scroll_hides_without_repositioning() {
    let mut h = Harness::new();
    let term = h.add_trigger("term", term_rect());
    h.click(term);
    let before = h.overlay_rect();
    h.scroll();
    assert_eq!(h.overlay_rect(), before);
    h.assert_phase(VisibilityPhase::Hiding);
}

#[test]
fn test_click_inside_overlay_keeps_tooltip() {
    let mut h = Harness::new();
    let term = h.add_trigger("term", term_rect());
    h.click(term);
    let overlay = h.tooltip().overlay().expect("overlay");
    h.click(overlay).assert_phase(VisibilityPhase::Showing);
}

#[test]
fn test_search_opens_encoded_query_then_hides() {
    let mut h = Harness::new();
    let term = h.add_trigger("quantum computing", term_rect());
    h.click(term).click_search();
    h.assert_opened(&["https://www.google.com/search?q=quantum%20computing"])
        .assert_phase(VisibilityPhase::Hiding);
    h.tick(400).assert_overlay_count(0);
}

#[test]
fn test_empty_trigger_shows_nothing() {
    let mut h = Harness::new();
    let blank = h.add_trigger("   ", term_rect());
    h.click(blank).assert_overlay_count(0);
    assert_eq!(h.pending_timers(), 0);
}

// =========================================================================
// Placement
// =========================================================================

#[test]
fn test_top_left_anchor_flips_below_inside_margin() {
    let mut h = Harness::new();
    let corner = h.add_trigger("Example", Rect::new(0.0, 0.0, 56.0, 18.0));
    h.click(corner);

    let rect = h.overlay_rect().expect("overlay");
    assert!(rect.x >= 10.0);
    assert!(rect.y >= 18.0);
    assert_eq!(h.tooltip().placement().map(|p| p.side), Some(Side::Below));
}

#[test]
fn test_right_edge_anchor_is_clamped() {
    let mut h = Harness::new().viewport(800.0, 600.0);
    let edge = h.add_trigger("edge of the page", Rect::new(780.0, 300.0, 20.0, 18.0));
    h.click(edge);
    let rect = h.overlay_rect().expect("overlay");
    assert!(rect.right() <= 790.0 + 1e-3);
}

#[test]
fn test_narrow_viewport_long_text() {
    let mut h = Harness::new().viewport(320.0, 568.0);
    let text = "an unusually long glossary term that wraps over several lines";
    let term = h.add_trigger(text, Rect::new(150.0, 400.0, 100.0, 18.0));
    h.click(term).assert_tooltip_text(text);
    let rect = h.overlay_rect().expect("overlay");
    assert!(rect.x >= 10.0);
    assert!(rect.right() <= 310.0 + 1e-3);
}

proptest! {
    #[test]
    fn prop_overlay_stays_inside_horizontal_margins(
        x in 0.0f32..1260.0,
        y in 0.0f32..700.0,
        len in 1usize..60,
    ) {
        let mut h = Harness::new();
        let text = "w".repeat(len);
        let term = h.add_trigger(&text, Rect::new(x, y, 20.0, 18.0));
        h.click(term);
        let rect = h.overlay_rect().expect("overlay");
        prop_assert!(rect.x >= 10.0);
        prop_assert!(rect.right() <= 1270.0 + 1e-3);
    }

    #[test]
    fn prop_at_most_one_overlay(ops in proptest::collection::vec(0u8..6, 1..40)) {
        let mut h = Harness::new();
        let a = h.add_trigger("alpha", Rect::new(100.0, 300.0, 50.0, 18.0));
        let b = h.add_trigger("beta", Rect::new(600.0, 20.0, 50.0, 18.0));
        let outside = h.add_element("p", "text", Rect::new(0.0, 650.0, 100.0, 20.0));
        for op in ops {
            match op {
                0 => { h.click(a); }
                1 => { h.click(b); }
                2 => { h.click(outside); }
                3 => { h.press_escape(); }
                4 => { h.end_transition(); }
                _ => { h.tick(200); }
            }
            prop_assert!(h.overlay_count() <= 1);
        }
        h.press_escape().tick(400);
        prop_assert_eq!(h.overlay_count(), 0);
    }
}
