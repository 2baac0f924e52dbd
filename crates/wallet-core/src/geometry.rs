#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Positions are signed so that nodes can sit above or left of the viewport
//! (scrolled content, a dragged card following the pointer off-grid). Sizes
//! stay unsigned cell counts.

/// A point in cell space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    #[inline]
    pub const fn delta_from(self, other: Point) -> (i32, i32) {
        (self.x - other.x, self.y - other.y)
    }

    /// Translate by `(dx, dy)`.
    #[inline]
    pub const fn translate(self, dx: i32, dy: i32) -> Point {
        Point::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// A rectangle for layout slots, snapshot geometry, and hit testing.
///
/// Uses terminal coordinates (origin at top-left, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    #[inline]
    pub const fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width as i32)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height as i32)
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Area in cells.
    #[inline]
    pub const fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Same size, moved so its top-left corner sits at `origin`.
    #[inline]
    pub const fn with_origin(&self, origin: Point) -> Rect {
        Rect::new(origin.x, origin.y, self.width, self.height)
    }

    /// Move the rectangle by `(dx, dy)`.
    #[inline]
    pub const fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns an empty rectangle if the rectangles don't overlap.
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if x >= right || y >= bottom {
            return Rect::default();
        }
        Rect::new(x, y, clamp_len(right - x), clamp_len(bottom - y))
    }

    /// Create a new rectangle inside the current one with the given margin.
    pub fn inner(&self, margin: Sides) -> Rect {
        Rect {
            x: self.x.saturating_add(i32::from(margin.left)),
            y: self.y.saturating_add(i32::from(margin.top)),
            width: self.width.saturating_sub(margin.horizontal_sum()),
            height: self.height.saturating_sub(margin.vertical_sum()),
        }
    }
}

fn clamp_len(len: i32) -> u16 {
    len.clamp(0, i32::from(u16::MAX)) as u16
}

/// Sides for padding/margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sides {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

impl Sides {
    /// Create new sides with equal values.
    pub const fn all(val: u16) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Create new sides with specific values.
    pub const fn new(top: u16, right: u16, bottom: u16, left: u16) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Sum of left and right.
    #[inline]
    pub const fn horizontal_sum(&self) -> u16 {
        self.left.saturating_add(self.right)
    }

    /// Sum of top and bottom.
    #[inline]
    pub const fn vertical_sum(&self) -> u16 {
        self.top.saturating_add(self.bottom)
    }
}

/// A fractional visual displacement, applied on top of a node's layout slot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub dx: f32,
    pub dy: f32,
}

impl Offset {
    pub const ZERO: Offset = Offset { dx: 0.0, dy: 0.0 };

    #[inline]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }

    /// Linear interpolation toward `to`; `t` is not clamped.
    #[inline]
    pub fn lerp(self, to: Offset, t: f32) -> Offset {
        Offset::new(
            self.dx + (to.dx - self.dx) * t,
            self.dy + (to.dy - self.dy) * t,
        )
    }

    /// Offset rounded to whole cells.
    #[inline]
    pub fn round(self) -> (i32, i32) {
        (self.dx.round() as i32, self.dy.round() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::{Offset, Point, Rect, Sides};

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(2, 3, 4, 5);
        assert!(rect.contains(Point::new(2, 3)));
        assert!(rect.contains(Point::new(5, 7)));
        assert!(!rect.contains(Point::new(6, 3)));
        assert!(!rect.contains(Point::new(2, 8)));
    }

    #[test]
    fn rect_contains_negative_origin() {
        let rect = Rect::new(-4, -2, 6, 3);
        assert!(rect.contains(Point::new(-4, -2)));
        assert!(rect.contains(Point::new(1, 0)));
        assert!(!rect.contains(Point::new(2, 0)));
    }

    #[test]
    fn rect_intersection_overlaps() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(2, 2, 4, 4);
        assert_eq!(a.intersection(&b), Rect::new(2, 2, 2, 2));
    }

    #[test]
    fn rect_intersection_no_overlap_is_empty() {
        let a = Rect::new(0, 0, 2, 2);
        let b = Rect::new(3, 3, 2, 2);
        assert_eq!(a.intersection(&b), Rect::default());
        assert!(a.intersection(&b).is_empty());
    }

    #[test]
    fn rect_inner_reduces() {
        let rect = Rect::new(0, 0, 10, 10);
        let inner = rect.inner(Sides::new(1, 2, 3, 4));
        assert_eq!(inner, Rect::new(4, 1, 4, 6));
    }

    #[test]
    fn rect_translate_and_with_origin_keep_size() {
        let rect = Rect::new(3, 4, 10, 5);
        assert_eq!(rect.translate(-5, 2), Rect::new(-2, 6, 10, 5));
        assert_eq!(rect.with_origin(Point::new(9, 9)), Rect::new(9, 9, 10, 5));
    }

    #[test]
    fn sides_sums() {
        let sides = Sides::new(1, 2, 3, 4);
        assert_eq!(sides.horizontal_sum(), 6);
        assert_eq!(sides.vertical_sum(), 4);
    }

    #[test]
    fn offset_lerp_endpoints() {
        let from = Offset::new(-8.0, 4.0);
        assert_eq!(from.lerp(Offset::ZERO, 0.0), from);
        assert_eq!(from.lerp(Offset::ZERO, 1.0), Offset::ZERO);
        assert_eq!(from.lerp(Offset::ZERO, 0.5), Offset::new(-4.0, 2.0));
    }

    #[test]
    fn offset_round_and_zero() {
        assert!(Offset::ZERO.is_zero());
        assert!(!Offset::new(0.0, 0.1).is_zero());
        assert_eq!(Offset::new(1.6, -2.4).round(), (2, -2));
    }
}
