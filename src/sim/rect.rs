//! Axis-aligned rectangles for hit tests

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Inward margin applied to both boxes in every overlap test
pub const HIT_MARGIN: f32 = 5.0;

/// An axis-aligned box given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box of `size` centered on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x / 2.0, center.y - size.y / 2.0, size.x, size.y)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Shrink the box by `amount` on every side
    pub fn inset(&self, amount: f32) -> Self {
        Self::new(
            self.x + amount,
            self.y + amount,
            self.width - 2.0 * amount,
            self.height - 2.0 * amount,
        )
    }

    /// All four fields are finite numbers
    pub fn is_well_formed(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }

    /// Overlap test with a forgiving margin
    ///
    /// Malformed boxes (NaN or infinite fields) never collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        overlaps_with_margin(self, other, HIT_MARGIN)
    }
}

/// Strict overlap after pulling each edge of both boxes inward by `margin`
pub fn overlaps_with_margin(a: &Rect, b: &Rect, margin: f32) -> bool {
    if !a.is_well_formed() || !b.is_well_formed() || !margin.is_finite() {
        return false;
    }
    a.x + margin < b.right() - margin
        && a.right() - margin > b.x + margin
        && a.y + margin < b.bottom() - margin
        && a.bottom() - margin > b.y + margin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_respects_margin() {
        let a = Rect::new(0.0, 0.0, 20.0, 20.0);
        // Edges 8px deep: with 5px margin on both boxes, 8 < 10 -> miss
        let shallow = Rect::new(12.0, 0.0, 20.0, 20.0);
        assert!(!a.overlaps(&shallow));
        // 12px deep -> hit
        let deep = Rect::new(8.0, 0.0, 20.0, 20.0);
        assert!(a.overlaps(&deep));
    }

    #[test]
    fn test_disjoint_boxes_miss() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(100.0, 100.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_malformed_bounds_never_collide() {
        let a = Rect::new(0.0, 0.0, 50.0, 50.0);
        let nan = Rect::new(f32::NAN, 0.0, 50.0, 50.0);
        let inf = Rect::new(0.0, 0.0, f32::INFINITY, 50.0);
        assert!(!a.overlaps(&nan));
        assert!(!nan.overlaps(&a));
        assert!(!a.overlaps(&inf));
    }

    #[test]
    fn test_inset_and_center() {
        let r = Rect::new(10.0, 20.0, 50.0, 50.0).inset(10.0);
        assert_eq!(r, Rect::new(20.0, 30.0, 30.0, 30.0));
        assert_eq!(r.center(), Vec2::new(35.0, 45.0));
        let c = Rect::centered(Vec2::new(35.0, 45.0), Vec2::new(30.0, 30.0));
        assert_eq!(c, r);
    }
}
