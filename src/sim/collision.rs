//! Overlap tests between playfield bodies
//!
//! Every body collides through its axis-aligned bounding box, with strict
//! inequalities on all four edges: rectangles that merely touch are not
//! overlapping. The margin variant serves spawn placement, where "too
//! close" counts the same as overlapping.

use super::rect::Rect;

/// Strict AABB overlap
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.intersects(b)
}

/// Overlap with `b` grown by `margin` on every side.
///
/// Two boxes conflict when they are closer than `margin` on both axes;
/// a gap of exactly `margin` on either axis keeps them clear.
#[inline]
pub fn overlaps_with_margin(a: &Rect, b: &Rect, margin: f32) -> bool {
    a.intersects(&b.expanded(margin))
}
