//! Overlay placement relative to an anchor, kept inside the viewport.

use sendoff_core::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Which side of the anchor the overlay ended up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Side {
    /// Above the anchor
    #[default]
    Above,
    /// Below the anchor
    Below,
}

/// Computed overlay position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Top-left corner of the overlay in viewport coordinates
    pub origin: Point,
    /// Side of the anchor
    pub side: Side,
}

impl Placement {
    /// Overlay rectangle for an overlay of `size`.
    #[must_use]
    pub const fn rect(&self, size: Size) -> Rect {
        Rect::from_origin_size(self.origin, size)
    }
}

/// Spacing rules for [`place`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spacing {
    /// Minimum distance between the overlay and the viewport edges
    pub margin: f32,
    /// Distance between the overlay and the anchor
    pub gap: f32,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            margin: 10.0,
            gap: 10.0,
        }
    }
}

/// Place an overlay of `overlay` size next to `anchor`.
///
/// Horizontally the overlay is centered on the anchor, then clamped to stay
/// `margin` away from both viewport edges; an overlay too wide for that keeps
/// the left margin. Vertically it sits `gap` above the anchor unless its top
/// edge would come closer than `margin` to the viewport top, in which case it
/// goes `gap` below the anchor instead.
#[must_use]
pub fn place(anchor: Rect, overlay: Size, viewport: Size, spacing: Spacing) -> Placement {
    let centered = anchor.center_x() - overlay.width / 2.0;
    let right_limit = viewport.width - overlay.width - spacing.margin;
    let x = centered.min(right_limit).max(spacing.margin);

    let above = anchor.y - overlay.height - spacing.gap;
    let (y, side) = if above < spacing.margin {
        (anchor.bottom() + spacing.gap, Side::Below)
    } else {
        (above, Side::Above)
    };

    Placement {
        origin: Point::new(x, y),
        side,
    }
}
