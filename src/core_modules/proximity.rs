// THEORY:
// The `proximity` module answers a single question: should two boxes be treated
// as one region? It is the decision half of the clustering layer; the
// `box_merger` is the action half.
//
// Key architectural principles:
// 1.  **Per-Axis Projected Gap**: For each axis independently, it compares the
//     extent of the rectangle that would enclose both boxes against the sum of
//     their individual extents. Overlap on an axis makes the difference negative
//     (always close enough); separation makes it approximate the gap between
//     them. Both axes must be within `gap` for the boxes to merge.
// 2.  **Not a Euclidean Test**: Two boxes offset diagonally can pass on both
//     axes while their nearest corners are further than `gap` apart. The region
//     engine relies on this exact heuristic, so it is kept as-is.
// 3.  **Symmetry**: Swapping the arguments never changes the answer. The
//     cluster engine's order sensitivity comes from its worklist, not from here.

pub mod proximity {
    use crate::core_modules::bounding_box::{Area, BoundingBox, Coord, Enclosure};

    /// How far the enclosing rectangle exceeds the summed box extents, per axis.
    /// Negative values mean the boxes overlap on that axis.
    pub fn projected_gaps(a: &BoundingBox, b: &BoundingBox) -> (Area, Area) {
        let enclosure = Enclosure::of(a, b);
        let sum_w = Area::from(a.w) + Area::from(b.w);
        let sum_h = Area::from(a.h) + Area::from(b.h);
        (enclosure.width() - sum_w, enclosure.height() - sum_h)
    }

    /// Returns true when `a` and `b` overlap or sit within `gap` pixels of each
    /// other on both axes.
    pub fn mergeable(a: &BoundingBox, b: &BoundingBox, gap: Coord) -> bool {
        debug_assert!(gap >= 0, "merge gap must be non-negative");
        let (horizontal, vertical) = projected_gaps(a, b);
        let gap = Area::from(gap);
        horizontal < gap && vertical < gap
    }
}

#[cfg(test)]
mod tests {
    use super::proximity::*;
    use crate::core_modules::bounding_box::BoundingBox;

    fn bb(x: i32, y: i32, w: i32, h: i32) -> BoundingBox {
        BoundingBox { x, y, w, h }
    }

    #[test]
    fn horizontal_neighbours_within_gap_merge() {
        let a = bb(0, 0, 10, 10);
        let b = bb(12, 0, 10, 10);
        assert_eq!(projected_gaps(&a, &b), (2, -10));
        assert!(mergeable(&a, &b, 5));
    }

    #[test]
    fn gap_comparison_is_strict() {
        let a = bb(0, 0, 10, 10);
        let b = bb(12, 0, 10, 10);
        assert!(!mergeable(&a, &b, 2));
        assert!(mergeable(&a, &b, 3));
        assert!(!mergeable(&a, &b, 1));
    }

    #[test]
    fn overlapping_boxes_merge_even_with_zero_gap() {
        let a = bb(0, 0, 10, 10);
        let b = bb(5, 5, 10, 10);
        assert!(mergeable(&a, &b, 0));
    }

    #[test]
    fn touching_edges_need_a_positive_gap() {
        let a = bb(0, 0, 10, 10);
        let b = bb(10, 0, 10, 10);
        assert_eq!(projected_gaps(&a, &b).0, 0);
        assert!(!mergeable(&a, &b, 0));
        assert!(mergeable(&a, &b, 1));
    }

    #[test]
    fn far_apart_on_one_axis_does_not_merge() {
        let a = bb(0, 0, 10, 10);
        let b = bb(2, 100, 10, 10);
        assert!(!mergeable(&a, &b, 20));
    }

    #[test]
    fn diagonal_separation_is_judged_per_axis() {
        // Corners are ~25px apart, but each axis only sees an 18px gap.
        let a = bb(0, 0, 10, 10);
        let b = bb(28, 28, 10, 10);
        assert!(mergeable(&a, &b, 20));
    }

    #[test]
    fn nested_boxes_always_merge() {
        let outer = bb(0, 0, 100, 100);
        let inner = bb(40, 40, 5, 5);
        assert!(mergeable(&outer, &inner, 0));
        assert!(mergeable(&inner, &outer, 0));
    }

    #[test]
    fn symmetric_for_sample_pairs() {
        let boxes = [
            bb(0, 0, 10, 10),
            bb(12, 0, 10, 10),
            bb(3, 40, 1, 1),
            bb(50, 50, 0, 0),
            bb(9, 9, 30, 2),
        ];
        for a in &boxes {
            for b in &boxes {
                for gap in [0, 1, 5, 20] {
                    assert_eq!(mergeable(a, b, gap), mergeable(b, a, gap));
                }
            }
        }
    }
}
