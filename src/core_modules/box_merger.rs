// THEORY:
// The `box_merger` is the action half of the clustering layer. Once the
// proximity predicate has decided two boxes belong together, the merger
// replaces them with the smallest axis-aligned rectangle that encloses both.
//
// Key architectural principles:
// 1.  **Total Over a Valid Frame**: Any two boxes whose enclosure fits in
//     `Coord` produce a well-formed box. `frame_boundary::validate` rejects
//     frames that could break this, so the engine never sees such a pair.
// 2.  **Commutative**: `merge(a, b) == merge(b, a)`; the enclosing rectangle does
//     not care which box came first.
// 3.  **Full Enclosure**: The result contains both inputs, so a merged region
//     can never hide part of a detected contour.

pub mod box_merger {
    use crate::core_modules::bounding_box::{BoundingBox, Coord, Enclosure};

    /// Smallest axis-aligned box enclosing both `a` and `b`.
    ///
    /// Precondition: the enclosure is at most `Coord::MAX` wide and tall. This
    /// holds for any two boxes of a frame accepted by
    /// `frame_boundary::validate`. Debug builds assert it; release builds
    /// saturate the extent instead of wrapping.
    pub fn merge(a: &BoundingBox, b: &BoundingBox) -> BoundingBox {
        let enclosure = Enclosure::of(a, b);
        let (width, height) = (enclosure.width(), enclosure.height());
        debug_assert!(
            Coord::try_from(width).is_ok() && Coord::try_from(height).is_ok(),
            "enclosure of {a:?} and {b:?} is {width}x{height}, past Coord::MAX"
        );
        BoundingBox {
            // Each edge comes from one of the inputs, so these always fit.
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            w: Coord::try_from(width).unwrap_or(Coord::MAX),
            h: Coord::try_from(height).unwrap_or(Coord::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::box_merger::merge;
    use crate::core_modules::bounding_box::{BoundingBox, Coord};

    fn bb(x: i32, y: i32, w: i32, h: i32) -> BoundingBox {
        BoundingBox { x, y, w, h }
    }

    #[test]
    fn merges_side_by_side_boxes() {
        assert_eq!(merge(&bb(0, 0, 10, 10), &bb(12, 0, 10, 10)), bb(0, 0, 22, 10));
    }

    #[test]
    fn merge_is_commutative_and_encloses_inputs() {
        let pairs = [
            (bb(0, 0, 10, 10), bb(12, 0, 10, 10)),
            (bb(5, 20, 3, 1), bb(0, 0, 1, 1)),
            (bb(10, 10, 0, 0), bb(2, 30, 4, 4)),
        ];
        for (a, b) in pairs {
            let m = merge(&a, &b);
            assert_eq!(m, merge(&b, &a));
            assert!(m.contains(&a));
            assert!(m.contains(&b));
        }
    }

    #[test]
    fn nested_box_yields_outer_box() {
        let outer = bb(0, 0, 100, 50);
        assert_eq!(merge(&outer, &bb(10, 10, 5, 5)), outer);
    }

    #[test]
    fn merges_across_the_origin() {
        assert_eq!(merge(&bb(-3, -4, 10, 10), &bb(8, 0, 5, 5)), bb(-3, -4, 16, 10));
    }

    #[test]
    fn span_of_exactly_coord_max_is_lossless() {
        let m = merge(&bb(-1, 0, 1, 1), &bb(Coord::MAX - 2, 0, 1, 1));
        assert_eq!(m, bb(-1, 0, Coord::MAX, 1));
        assert_eq!(m.right(), Coord::MAX - 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "past Coord::MAX")]
    fn oversized_span_is_caught_in_debug_builds() {
        merge(
            &bb(-1_500_000_000, 0, 1_500_000_000, 10),
            &bb(1_000_000_000, 0, 1_000_000_000, 10),
        );
    }

    #[test]
    fn identical_boxes_merge_to_themselves() {
        let b = bb(7, 8, 9, 10);
        assert_eq!(merge(&b, &b), b);
    }
}
