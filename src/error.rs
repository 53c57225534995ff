use thiserror::Error;

use crate::core_modules::bounding_box::{Area, Coord};

/// Errors raised at the input boundary of the region pipeline.
///
/// The cluster engine itself is total over well-formed boxes and never
/// returns an error; everything here is a rejected precondition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    /// A detector box with a negative width or height.
    #[error("box {index} has a negative extent ({width}x{height})")]
    NegativeExtent {
        index: usize,
        width: Coord,
        height: Coord,
    },

    /// A detector box whose right or bottom edge does not fit in a pixel coordinate.
    #[error("box {index} extends past the representable coordinate range")]
    ExtentOverflow { index: usize },

    /// A frame whose boxes together span more than a pixel coordinate can hold,
    /// so their enclosing region could not be represented.
    #[error("frame spans {width}x{height} pixels, past the representable coordinate range")]
    FrameSpanOverflow { width: Area, height: Area },

    #[error("invalid cluster configuration: {0}")]
    InvalidConfig(String),
}
