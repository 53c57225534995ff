// THEORY:
// The `frame_boundary` is the gate between the external contour detector and
// the cluster engine. The engine trusts its input completely, so everything
// that could make that trust misplaced is handled here, once per frame.
//
// Key architectural principles:
// 1.  **Reject, Don't Repair**: A box with a negative extent is a detector bug.
//     The whole frame is rejected with the index of the first offending box
//     instead of silently clamping it. Negative origins are fine.
// 2.  **Representable Regions**: Any region the engine builds lies inside the
//     enclosure of the whole frame. If that enclosure fits in `Coord` on both
//     axes, every merge is lossless, so a frame wider or taller than
//     `Coord::MAX` is rejected here rather than truncated later.
// 3.  **Noise Filtering**: Contours whose bounding box covers fewer than
//     `minimum_area` pixels are sensor noise or mask speckle. They are dropped
//     before clustering, in detector order.
// 4.  **Soft Backpressure**: Clustering is superlinear in the box count. When a
//     cap is configured and a frame exceeds it, only the largest boxes are kept
//     (in their original relative order) and a warning is logged. The frame
//     still produces regions.

use crate::core_modules::bounding_box::{Area, BoundingBox, Coord};
use crate::error::RegionError;
use crate::pipeline::ClusterConfig;
use log::warn;

/// The boxes of one frame, ready for the cluster engine, plus what was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedFrame {
    pub boxes: Vec<BoundingBox>,
    /// Number of boxes received from the detector.
    pub detected: usize,
    /// Number of boxes that passed the area filter.
    pub retained: usize,
    /// Number of boxes dropped by the box-count cap.
    pub capped: usize,
}

/// Checks every box against the input invariants, failing on the first bad one,
/// then checks that the frame as a whole fits in `Coord` (see [`frame_span`]).
pub fn validate(boxes: &[BoundingBox]) -> Result<(), RegionError> {
    boxes
        .iter()
        .enumerate()
        .try_for_each(|(index, b)| b.validate(index))?;

    let (width, height) = frame_span(boxes);
    let limit = Area::from(Coord::MAX);
    if width > limit || height > limit {
        return Err(RegionError::FrameSpanOverflow { width, height });
    }
    Ok(())
}

/// Width and height of the rectangle enclosing every box, `(0, 0)` for an
/// empty frame. Computed in `Area` so boxes at opposite ends of the `Coord`
/// range cannot overflow.
pub fn frame_span(boxes: &[BoundingBox]) -> (Area, Area) {
    let Some(first) = boxes.first() else {
        return (0, 0);
    };
    let edges = |b: &BoundingBox| {
        (
            Area::from(b.x),
            Area::from(b.x) + Area::from(b.w),
            Area::from(b.y),
            Area::from(b.y) + Area::from(b.h),
        )
    };
    let (left, right, top, bottom) = boxes.iter().map(edges).fold(
        edges(first),
        |(l, r, t, b), (bl, br, bt, bb)| (l.min(bl), r.max(br), t.min(bt), b.max(bb)),
    );
    (right - left, bottom - top)
}

/// Keeps the boxes covering at least `minimum_area` pixels, in order.
pub fn filter_by_area(boxes: Vec<BoundingBox>, minimum_area: Area) -> Vec<BoundingBox> {
    boxes.into_iter().filter(|b| b.area() >= minimum_area).collect()
}

/// Keeps at most `max_boxes` boxes, preferring the largest.
///
/// Ties in area keep the box seen first. Survivors stay in detector order.
pub fn cap_box_count(boxes: Vec<BoundingBox>, max_boxes: usize) -> Vec<BoundingBox> {
    if boxes.len() <= max_boxes {
        return boxes;
    }

    let mut ranked: Vec<usize> = (0..boxes.len()).collect();
    // Stable sort, so equal areas keep their detector order.
    ranked.sort_by(|&a, &b| boxes[b].area().cmp(&boxes[a].area()));
    let mut keep = vec![false; boxes.len()];
    for &index in ranked.iter().take(max_boxes) {
        keep[index] = true;
    }

    warn!(
        "frame has {} boxes, dropping the {} smallest (cap {})",
        boxes.len(),
        boxes.len() - max_boxes,
        max_boxes
    );

    boxes
        .into_iter()
        .zip(keep)
        .filter_map(|(b, kept)| kept.then_some(b))
        .collect()
}

/// Validates, filters and caps one frame of detector output.
pub fn prepare_frame(raw: Vec<BoundingBox>, config: &ClusterConfig) -> Result<PreparedFrame, RegionError> {
    validate(&raw)?;
    let detected = raw.len();

    let filtered = filter_by_area(raw, config.minimum_area);
    let retained = filtered.len();

    let boxes = match config.max_boxes {
        Some(max_boxes) => cap_box_count(filtered, max_boxes),
        None => filtered,
    };
    let capped = retained - boxes.len();

    Ok(PreparedFrame {
        boxes,
        detected,
        retained,
        capped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bb(x: i32, y: i32, w: i32, h: i32) -> BoundingBox {
        BoundingBox { x, y, w, h }
    }

    #[test]
    fn validate_reports_first_bad_index() {
        let boxes = [bb(0, 0, 1, 1), bb(0, 0, 5, -1), bb(0, 0, 6, -2)];
        assert_eq!(
            validate(&boxes),
            Err(RegionError::NegativeExtent {
                index: 1,
                width: 5,
                height: -1
            })
        );
    }

    #[test]
    fn validate_accepts_empty_frame() {
        assert_eq!(validate(&[]), Ok(()));
        assert_eq!(frame_span(&[]), (0, 0));
    }

    #[test]
    fn validate_accepts_negative_origins() {
        let boxes = [bb(-3, 0, 10, 10), bb(-50, -40, 5, 5)];
        assert_eq!(validate(&boxes), Ok(()));
        assert_eq!(frame_span(&boxes), (57, 50));
    }

    #[test]
    fn validate_rejects_frames_wider_than_a_coordinate() {
        // Each box is fine on its own; together they span 2.5e9 px.
        let boxes = [
            bb(-1_500_000_000, 0, 1_500_000_000, 10),
            bb(1_000_000_000, 0, 1_000_000_000, 10),
        ];
        assert_eq!(
            validate(&boxes),
            Err(RegionError::FrameSpanOverflow {
                width: 2_500_000_000,
                height: 10
            })
        );
    }

    #[test]
    fn validate_accepts_a_span_of_exactly_coord_max() {
        let boxes = [bb(-1, 0, 1, 1), bb(Coord::MAX - 2, 5, 1, 1)];
        assert_eq!(frame_span(&boxes), (Area::from(Coord::MAX), 6));
        assert_eq!(validate(&boxes), Ok(()));
    }

    #[test]
    fn area_filter_keeps_boxes_at_the_threshold() {
        let boxes = vec![bb(0, 0, 10, 10), bb(0, 0, 9, 11), bb(5, 5, 20, 5)];
        assert_eq!(
            filter_by_area(boxes, 100),
            vec![bb(0, 0, 10, 10), bb(5, 5, 20, 5)]
        );
    }

    #[test]
    fn cap_keeps_largest_in_detector_order() {
        let boxes = vec![
            bb(0, 0, 2, 2),
            bb(10, 0, 8, 8),
            bb(20, 0, 3, 3),
            bb(30, 0, 6, 6),
        ];
        assert_eq!(
            cap_box_count(boxes, 2),
            vec![bb(10, 0, 8, 8), bb(30, 0, 6, 6)]
        );
    }

    #[test]
    fn cap_breaks_ties_by_detector_order() {
        let boxes = vec![bb(0, 0, 4, 4), bb(10, 0, 4, 4), bb(20, 0, 4, 4)];
        assert_eq!(
            cap_box_count(boxes, 2),
            vec![bb(0, 0, 4, 4), bb(10, 0, 4, 4)]
        );
    }

    #[test]
    fn cap_is_a_no_op_under_the_limit() {
        let boxes = vec![bb(0, 0, 4, 4)];
        assert_eq!(cap_box_count(boxes.clone(), 3), boxes);
    }

    #[test]
    fn prepare_frame_counts_each_stage() {
        let config = ClusterConfig {
            minimum_area: 50,
            merge_gap: 5,
            max_boxes: Some(1),
            settle_regions: false,
        };
        let raw = vec![bb(0, 0, 10, 10), bb(0, 0, 2, 2), bb(40, 40, 20, 20)];
        let prepared = prepare_frame(raw, &config).unwrap();
        assert_eq!(prepared.boxes, vec![bb(40, 40, 20, 20)]);
        assert_eq!(
            (prepared.detected, prepared.retained, prepared.capped),
            (3, 2, 1)
        );
    }

    #[test]
    fn prepare_frame_rejects_before_filtering() {
        // A malformed box is an error even when it would be filtered out as noise.
        let raw = vec![bb(0, 0, 10, 10), bb(3, 3, -4, 1)];
        let err = prepare_frame(raw, &ClusterConfig::default()).unwrap_err();
        assert!(matches!(err, RegionError::NegativeExtent { index: 1, .. }));
    }
}
