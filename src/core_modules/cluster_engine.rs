// THEORY:
// The `cluster_engine` is the heart of the region layer. It takes the ordered
// list of raw per-contour boxes for one frame and greedily consolidates them
// into a small set of regions, using the `proximity` predicate to decide and
// the `box_merger` to act.
//
// Key architectural principles & algorithm steps:
// 1.  **Owned Worklist**: The input boxes become a mutable worklist, kept in
//     detector order. Boxes are removed by index as they are consumed.
// 2.  **Growing Accumulator**: The first box in the worklist is taken as the
//     accumulator. The rest of the worklist is scanned from the start for the
//     first box the accumulator is close to.
// 3.  **Restart After Every Merge**: When a match is found, the accumulator
//     absorbs it, the match leaves the worklist and the scan starts again from
//     the beginning. A box that was too far from the small accumulator may be
//     close to the grown one.
// 4.  **Finalisation**: A full scan without a match finalises the accumulator as
//     one output region, and the next worklist head becomes the new accumulator.
// 5.  **Order Sensitivity**: Because the predicate is tested against the growing
//     accumulator and not the original boxes, the partition depends on the
//     worklist order. Permuting the detector output can change the regions.
//     This is the engine's contract, not a defect to optimise away.
// 6.  **Stateless Utility**: Like the blob detector, the engine has no memory of
//     previous frames. Each call owns its worklist for the duration of the call.
//
// Every successful merge restarts a full scan, so the worst case is cubic in the
// box count. The upstream area filter (and the optional cap in the frame
// boundary) keeps that count small enough for a video frame budget.

use crate::core_modules::bounding_box::{BoundingBox, Coord};
use crate::core_modules::box_merger::box_merger::merge;
use crate::core_modules::proximity::proximity::mergeable;

pub mod cluster_engine {
    use super::*;
    use log::{debug, trace};

    /// Consolidates `boxes` into merged regions, in the order they are finalised.
    ///
    /// Total over well-formed boxes: an empty input gives an empty output, and a
    /// non-empty input gives between one and `boxes.len()` regions.
    ///
    /// The frame as a whole must fit in `Coord` on both axes, as checked by
    /// `frame_boundary::validate`; every region lies inside that span.
    pub fn cluster(boxes: Vec<BoundingBox>, gap: Coord) -> Vec<BoundingBox> {
        let input_len = boxes.len();
        let mut worklist = boxes;
        let mut regions: Vec<BoundingBox> = Vec::new();
        let mut merges = 0usize;

        while !worklist.is_empty() {
            let mut accumulator = worklist.remove(0);

            while let Some(index) = first_mergeable(&accumulator, &worklist, gap) {
                let other = worklist.remove(index);
                let grown = merge(&accumulator, &other);
                trace!("merged {:?} into {:?} -> {:?}", other, accumulator, grown);
                accumulator = grown;
                merges += 1;
            }

            regions.push(accumulator);
        }

        debug!(
            "clustered {} boxes into {} regions ({} merges, gap {})",
            input_len,
            regions.len(),
            merges,
            gap
        );
        regions
    }

    /// Re-runs [`cluster`] over its own output until a pass makes no merge.
    ///
    /// A single pass can finalise a region before a later group grows close to
    /// it. This variant keeps going until no pair of regions is mergeable, so
    /// its result is a fixed point of [`cluster`].
    pub fn cluster_until_stable(boxes: Vec<BoundingBox>, gap: Coord) -> Vec<BoundingBox> {
        let mut regions = cluster(boxes, gap);
        let mut passes = 1usize;
        loop {
            let previous_len = regions.len();
            let next = cluster(regions, gap);
            passes += 1;
            if next.len() == previous_len {
                debug!("regions settled after {} passes", passes);
                return next;
            }
            regions = next;
        }
    }

    /// Index of the first worklist entry the accumulator may absorb.
    fn first_mergeable(accumulator: &BoundingBox, worklist: &[BoundingBox], gap: Coord) -> Option<usize> {
        worklist
            .iter()
            .position(|candidate| mergeable(accumulator, candidate, gap))
    }
}
