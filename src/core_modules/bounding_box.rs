// THEORY:
// The `BoundingBox` is the single value type that flows through the whole
// region pipeline. The upstream detector emits one per surviving contour, the
// cluster engine consumes and produces them, and the renderer draws them.
//
// Key architectural principles:
// 1.  **Dumb Value Type**: Like `Pixel` and `Point`, a `BoundingBox` is a plain
//     `Copy` data container. It has no identity beyond its four coordinates, and
//     two boxes with the same coordinates are interchangeable.
// 2.  **Top-Left + Size**: Boxes use the `(x, y, w, h)` layout produced by
//     OpenCV's `bounding_rect`, so detector output maps onto this type without
//     any arithmetic.
// 3.  **Validation at the Edge**: The fields are public so the engine can build
//     boxes freely. Checking the `w >= 0 && h >= 0` invariant is the job of the
//     frame boundary, through `BoundingBox::new` / `validate`. Origins may be
//     negative, e.g. for detectors reporting in offset coordinates.
// 4.  **Shared Enclosure Math**: The `left/right/top/bottom` of the rectangle
//     enclosing two boxes is needed by both the proximity predicate and the
//     merger. It lives here as `Enclosure` so both use identical formulas.

use crate::error::RegionError;

/// A pixel coordinate or extent.
pub type Coord = i32;
/// A pixel area. Wider than `Coord` so `w * h` never overflows.
pub type Area = i64;

/// An axis-aligned rectangle described by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    /// Left edge, in pixels.
    pub x: Coord,
    /// Top edge, in pixels.
    pub y: Coord,
    /// Width in pixels. Never negative for a well-formed box.
    pub w: Coord,
    /// Height in pixels. Never negative for a well-formed box.
    pub h: Coord,
}

impl BoundingBox {
    /// Builds a box, rejecting anything that violates the pipeline's input invariants.
    pub fn new(x: Coord, y: Coord, w: Coord, h: Coord) -> Result<Self, RegionError> {
        let candidate = Self { x, y, w, h };
        candidate.validate(0)?;
        Ok(candidate)
    }

    /// Checks the box against the input invariants. `index` is the position of
    /// the box in the frame it came from and is echoed back in the error.
    pub fn validate(&self, index: usize) -> Result<(), RegionError> {
        if self.w < 0 || self.h < 0 {
            return Err(RegionError::NegativeExtent {
                index,
                width: self.w,
                height: self.h,
            });
        }
        if self.x.checked_add(self.w).is_none() || self.y.checked_add(self.h).is_none() {
            return Err(RegionError::ExtentOverflow { index });
        }
        Ok(())
    }

    /// One past the right-most column covered by the box.
    pub fn right(&self) -> Coord {
        self.x + self.w
    }

    /// One past the bottom-most row covered by the box.
    pub fn bottom(&self) -> Coord {
        self.y + self.h
    }

    pub fn area(&self) -> Area {
        Area::from(self.w) * Area::from(self.h)
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }
}

impl From<(Coord, Coord, Coord, Coord)> for BoundingBox {
    fn from((x, y, w, h): (Coord, Coord, Coord, Coord)) -> Self {
        Self { x, y, w, h }
    }
}

impl From<BoundingBox> for (Coord, Coord, Coord, Coord) {
    fn from(b: BoundingBox) -> Self {
        (b.x, b.y, b.w, b.h)
    }
}

/// The edges of the smallest rectangle enclosing two boxes.
///
/// Edges are kept in `Area` precision so that callers comparing combined and
/// summed extents cannot overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enclosure {
    pub left: Area,
    pub right: Area,
    pub top: Area,
    pub bottom: Area,
}

impl Enclosure {
    pub fn of(a: &BoundingBox, b: &BoundingBox) -> Self {
        let edge = |origin: Coord, extent: Coord| Area::from(origin) + Area::from(extent);
        Self {
            left: Area::from(a.x.min(b.x)),
            right: edge(a.x, a.w).max(edge(b.x, b.w)),
            top: Area::from(a.y.min(b.y)),
            bottom: edge(a.y, a.h).max(edge(b.y, b.h)),
        }
    }

    pub fn width(&self) -> Area {
        self.right - self.left
    }

    pub fn height(&self) -> Area {
        self.bottom - self.top
    }
}
