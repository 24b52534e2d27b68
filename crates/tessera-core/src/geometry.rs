#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All lengths are layout pixels. Sizes and positions are unsigned; only
//! drag deltas carry a sign.

/// One of the two layout axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Axis {
    /// Left to right (widths).
    Horizontal,
    /// Top to bottom (heights).
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    #[inline]
    #[must_use]
    pub const fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Dimension name used in diagnostics.
    #[must_use]
    pub const fn dimension(self) -> &'static str {
        match self {
            Self::Horizontal => "width",
            Self::Vertical => "height",
        }
    }
}

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// Zero size.
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a new size.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Length along `axis`.
    #[inline]
    #[must_use]
    pub const fn get(self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Copy of `self` with the length along `axis` replaced.
    #[inline]
    #[must_use]
    pub const fn with(self, axis: Axis, value: u32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(value, self.height),
            Axis::Vertical => Self::new(self.width, value),
        }
    }

    /// Build a size from a main-axis and a cross-axis length.
    #[inline]
    #[must_use]
    pub const fn from_axes(axis: Axis, main: u32, cross: u32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(main, cross),
            Axis::Vertical => Self::new(cross, main),
        }
    }

    /// Component-wise maximum.
    #[inline]
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Component-wise minimum.
    #[inline]
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.width.min(other.width), self.height.min(other.height))
    }

    /// Shrink by the given amounts, stopping at zero.
    #[inline]
    #[must_use]
    pub const fn saturating_shrink(self, width: u32, height: u32) -> Self {
        Self::new(
            self.width.saturating_sub(width),
            self.height.saturating_sub(height),
        )
    }

    /// Check if either dimension is zero.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width, height)
    }
}

/// Signed pointer movement accumulated since a drag started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Delta {
    pub width: i32,
    pub height: i32,
}

impl Delta {
    /// Create a new delta.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Component along `axis`.
    #[inline]
    #[must_use]
    pub const fn get(self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Apply the component along `axis` to `length`, saturating at the
    /// bounds of `u32`.
    #[inline]
    #[must_use]
    pub const fn apply(self, axis: Axis, length: u32) -> u32 {
        length.saturating_add_signed(self.get(axis))
    }
}

/// A positioned rectangle in layout pixels (origin at top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u32,
    /// Top edge (inclusive).
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at `(x, y)` with the given size.
    #[inline]
    pub const fn at(x: u32, y: u32, size: Size) -> Self {
        Self::new(x, y, size.width, size.height)
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::at(0, 0, size)
    }

    /// Size of the rectangle.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Start coordinate along `axis`.
    #[inline]
    pub const fn origin(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Copy of `self` moved to `offset` along `axis`.
    #[inline]
    #[must_use]
    pub const fn with_origin(self, axis: Axis, offset: u32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(offset, self.y, self.width, self.height),
            Axis::Vertical => Self::new(self.x, offset, self.width, self.height),
        }
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::{Axis, Delta, Rect, Size};
    use proptest::prelude::*;

    #[test]
    fn size_axis_accessors() {
        let size = Size::new(300, 200);
        assert_eq!(size.get(Axis::Horizontal), 300);
        assert_eq!(size.get(Axis::Vertical), 200);
        assert_eq!(size.with(Axis::Vertical, 10), Size::new(300, 10));
        assert_eq!(Size::from_axes(Axis::Vertical, 5, 7), Size::new(7, 5));
    }

    #[test]
    fn delta_apply_saturates() {
        let delta = Delta::new(-150, 20);
        assert_eq!(delta.apply(Axis::Horizontal, 200), 50);
        assert_eq!(delta.apply(Axis::Horizontal, 100), 0);
        assert_eq!(delta.apply(Axis::Vertical, u32::MAX), u32::MAX);
    }

    #[test]
    fn rect_edges_and_origin() {
        let rect = Rect::new(2, 3, 4, 5);
        assert_eq!(rect.right(), 6);
        assert_eq!(rect.bottom(), 8);
        assert!(rect.contains(5, 7));
        assert!(!rect.contains(6, 3));
        assert_eq!(rect.with_origin(Axis::Vertical, 9), Rect::new(2, 9, 4, 5));
        assert_eq!(rect.origin(Axis::Horizontal), 2);
    }

    #[test]
    fn axis_cross_is_involution() {
        assert_eq!(Axis::Horizontal.cross(), Axis::Vertical);
        assert_eq!(Axis::Vertical.cross().cross(), Axis::Vertical);
        assert_eq!(Axis::Horizontal.dimension(), "width");
    }

    proptest! {
        #[test]
        fn size_with_then_get_round_trips(w in 0u32..10_000, h in 0u32..10_000, v in 0u32..10_000) {
            for axis in [Axis::Horizontal, Axis::Vertical] {
                let size = Size::new(w, h).with(axis, v);
                prop_assert_eq!(size.get(axis), v);
                prop_assert_eq!(size.get(axis.cross()), Size::new(w, h).get(axis.cross()));
            }
        }
    }
}
