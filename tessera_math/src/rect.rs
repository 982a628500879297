use std::fmt::Display;

use thiserror::Error;

use crate::{v2i, Vec2i};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RectError {
    #[error("rectangle size must not be negative, got {w}x{h}")]
    NegativeSize { w: i32, h: i32 },
}

/// Axis-aligned integer rectangle.
///
/// The rectangle covers the half-open ranges `x..x + w` and `y..y + h`, so a
/// rectangle never contains its right or bottom edge. Width and height are
/// never negative.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    x: i32,
    y: i32,
    w: i32,
    h: i32,
}

impl Rect {
    pub const ZERO: Self = Self::from_raw(0, 0, 0, 0);

    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Result<Self, RectError> {
        if w < 0 || h < 0 {
            return Err(RectError::NegativeSize { w, h });
        }

        Ok(Self::from_raw(x, y, w, h))
    }

    pub fn from_size(size: Vec2i) -> Result<Self, RectError> {
        Self::new(0, 0, size.x, size.y)
    }

    const fn from_raw(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn w(&self) -> i32 {
        self.w
    }

    pub fn h(&self) -> i32 {
        self.h
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn size(&self) -> Vec2i {
        v2i(self.w, self.h)
    }

    pub fn topleft(&self) -> Vec2i {
        v2i(self.x, self.y)
    }

    pub fn bottomright(&self) -> Vec2i {
        v2i(self.right(), self.bottom())
    }

    pub fn center(&self) -> Vec2i {
        v2i(self.x + self.w / 2, self.y + self.h / 2)
    }

    pub fn area(&self) -> i64 {
        self.w as i64 * self.h as i64
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub fn set_topleft(&mut self, position: Vec2i) {
        self.x = position.x;
        self.y = position.y;
    }

    pub fn set_size(&mut self, w: i32, h: i32) -> Result<(), RectError> {
        if w < 0 || h < 0 {
            return Err(RectError::NegativeSize { w, h });
        }

        self.w = w;
        self.h = h;

        Ok(())
    }

    /// Translates the rectangle in place.
    pub fn move_by(&mut self, dx: i32, dy: i32) -> &mut Self {
        self.x += dx;
        self.y += dy;
        self
    }

    pub fn translated(&self, offset: Vec2i) -> Self {
        Self::from_raw(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// True when the two rectangles share a region of positive area.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if left < right && top < bottom {
            Some(Self::from_raw(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());

        Self::from_raw(left, top, right - left, bottom - top)
    }

    /// The empty space separating two rectangles.
    ///
    /// Overlapping rectangles have no gap: the result is a zero-size rectangle
    /// at the top-left of their intersection. Otherwise the primary axis of
    /// separation is the one with the wider separation (horizontal on ties),
    /// and the gap is the bounding box of both rectangles trimmed to the space
    /// between them along that axis. Touching rectangles yield a zero-width
    /// (or zero-height) gap along the shared edge.
    pub fn gap(&self, other: &Rect) -> Rect {
        if let Some(overlap) = self.intersection(other) {
            return Self::from_raw(overlap.x, overlap.y, 0, 0);
        }

        let bounds = self.union(other);
        let sep_x = self.left().max(other.left()) - self.right().min(other.right());
        let sep_y = self.top().max(other.top()) - self.bottom().min(other.bottom());

        if sep_x >= sep_y {
            let left = self.right().min(other.right());
            Self::from_raw(left, bounds.y, sep_x, bounds.h)
        } else {
            let top = self.bottom().min(other.bottom());
            Self::from_raw(bounds.x, top, bounds.w, sep_y)
        }
    }
}

impl Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.x, self.y, self.w, self.h)
    }
}

impl From<Rect> for (i32, i32, i32, i32) {
    fn from(r: Rect) -> Self {
        (r.x, r.y, r.w, r.h)
    }
}

impl TryFrom<(i32, i32, i32, i32)> for Rect {
    type Error = RectError;

    fn try_from((x, y, w, h): (i32, i32, i32, i32)) -> Result<Self, Self::Error> {
        Self::new(x, y, w, h)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn rect(x: i32, y: i32, w: i32, h: i32) -> Rect {
        Rect::new(x, y, w, h).unwrap()
    }

    #[test]
    fn negative_size_is_rejected() {
        assert_eq!(
            Err(RectError::NegativeSize { w: -1, h: 4 }),
            Rect::new(0, 0, -1, 4)
        );

        let mut r = rect(0, 0, 2, 2);
        assert!(r.set_size(3, -2).is_err());
        assert_eq!(rect(0, 0, 2, 2), r);
    }

    #[test]
    fn derived_attributes() {
        let r = rect(10, 20, 30, 40);
        assert_eq!(v2i(10, 20), r.topleft());
        assert_eq!(v2i(40, 60), r.bottomright());
        assert_eq!(v2i(25, 40), r.center());
        assert_eq!(1200, r.area());
    }

    #[test]
    fn move_by_chains() {
        let mut r = rect(0, 0, 4, 4);
        r.move_by(2, 3).move_by(-1, 1);
        assert_eq!(rect(1, 4, 4, 4), r);
    }

    #[test]
    fn point_membership_is_half_open() {
        let r = rect(0, 0, 10, 10);
        assert!(r.contains_point(0, 0));
        assert!(r.contains_point(9, 9));
        assert!(!r.contains_point(10, 5));
        assert!(!r.contains_point(5, 10));
        assert!(!r.contains_point(-1, 0));
    }

    #[test]
    fn rect_containment() {
        let outer = rect(0, 0, 10, 10);
        assert!(outer.contains_rect(&rect(0, 0, 10, 10)));
        assert!(outer.contains_rect(&rect(2, 2, 3, 3)));
        assert!(!outer.contains_rect(&rect(8, 8, 3, 3)));
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = rect(0, 0, 10, 10);
        let b = rect(10, 0, 10, 10);
        assert!(!a.intersects(&b));
        assert_eq!(None, a.intersection(&b));
        assert_eq!(Some(rect(5, 5, 5, 5)), a.intersection(&rect(5, 5, 10, 10)));
    }

    #[test]
    fn union_is_bounding_box() {
        assert_eq!(
            rect(0, 0, 30, 25),
            rect(0, 0, 10, 10).union(&rect(20, 15, 10, 10))
        );
    }

    #[test]
    fn gap_of_overlapping_rects_is_empty() {
        let a = rect(0, 0, 10, 10);
        let b = rect(5, 5, 10, 10);
        let gap = a.gap(&b);
        assert!(gap.is_empty());
        assert_eq!(rect(5, 5, 0, 0), gap);
        assert_eq!(gap, b.gap(&a));
    }

    #[test]
    fn gap_between_side_by_side_rects() {
        let a = rect(0, 0, 10, 10);
        let b = rect(25, 5, 10, 10);
        assert_eq!(rect(10, 0, 15, 15), a.gap(&b));
        assert_eq!(a.gap(&b), b.gap(&a));
    }

    #[test]
    fn gap_between_stacked_rects() {
        let a = rect(0, 0, 10, 10);
        let b = rect(2, 30, 10, 10);
        assert_eq!(rect(0, 10, 12, 20), a.gap(&b));
    }

    #[test]
    fn gap_uses_the_wider_separation_for_diagonal_rects() {
        let a = rect(600, 10, 100, 100);
        let b = rect(400, 400, 100, 100);
        // Horizontal separation is 100, vertical is 290.
        assert_eq!(rect(400, 110, 300, 290), a.gap(&b));
        assert_eq!(a.gap(&b), b.gap(&a));
    }

    #[test]
    fn gap_of_touching_rects_is_zero_width() {
        let a = rect(0, 0, 10, 10);
        let b = rect(10, 0, 10, 10);
        assert_eq!(rect(10, 0, 0, 10), a.gap(&b));
    }

    #[test]
    fn gap_is_symmetric_for_many_pairs() {
        let rects = [
            rect(0, 0, 10, 10),
            rect(3, 12, 4, 4),
            rect(-20, -5, 8, 30),
            rect(11, -9, 2, 2),
            rect(4, 4, 0, 0),
        ];
        for a in rects {
            for b in rects {
                assert_eq!(a.gap(&b), b.gap(&a), "{a} vs {b}");
                if a.intersects(&b) {
                    assert!(a.gap(&b).is_empty());
                }
            }
        }
    }
}
