// THEORY:
// The `pipeline` module is the top-level API of the region engine. It wraps the
// frame boundary and the cluster engine into a single call per video frame:
// raw detector boxes go in, merged regions (plus a few counters) come out.
//
// The pipeline owns only its configuration and a frame counter used for log
// context. No cluster state survives from one frame to the next; every frame
// is clustered from scratch.

use crate::core_modules::bounding_box::{Area, BoundingBox, Coord};
use crate::core_modules::cluster_engine::cluster_engine::{cluster, cluster_until_stable};
use crate::core_modules::frame_boundary::prepare_frame;
use crate::error::RegionError;
use log::debug;
use std::str::FromStr;

/// Smallest box area (px²) treated as a real contour rather than mask noise.
pub const DEFAULT_MINIMUM_AREA: Area = 100;
/// Per-axis gap (px) under which two boxes are merged.
pub const DEFAULT_MERGE_GAP: Coord = 20;

pub const ENV_MINIMUM_AREA: &str = "CHROMA_MIN_AREA";
pub const ENV_MERGE_GAP: &str = "CHROMA_MERGE_GAP";
pub const ENV_MAX_BOXES: &str = "CHROMA_MAX_BOXES";
pub const ENV_SETTLE_REGIONS: &str = "CHROMA_SETTLE_REGIONS";

/// Configuration for the RegionPipeline, allowing for tunable behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClusterConfig {
    /// Boxes covering fewer pixels than this never reach the cluster engine.
    pub minimum_area: Area,
    /// Larger values merge more aggressively. Must not be negative.
    pub merge_gap: Coord,
    /// Optional cap on the boxes clustered per frame. The largest are kept.
    pub max_boxes: Option<usize>,
    /// Repeat clustering until no two regions are mergeable. Off by default,
    /// which gives the single greedy pass.
    pub settle_regions: bool,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            minimum_area: DEFAULT_MINIMUM_AREA,
            merge_gap: DEFAULT_MERGE_GAP,
            max_boxes: None,
            settle_regions: false,
        }
    }
}

impl ClusterConfig {
    pub fn validate(&self) -> Result<(), RegionError> {
        if self.minimum_area < 0 {
            return Err(RegionError::InvalidConfig(format!(
                "minimum_area must be non-negative, got {}",
                self.minimum_area
            )));
        }
        if self.merge_gap < 0 {
            return Err(RegionError::InvalidConfig(format!(
                "merge_gap must be non-negative, got {}",
                self.merge_gap
            )));
        }
        if self.max_boxes == Some(0) {
            return Err(RegionError::InvalidConfig(
                "max_boxes must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Defaults overlaid with any `CHROMA_*` environment variables.
    pub fn from_env() -> Result<Self, RegionError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each `CHROMA_*` key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RegionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_MINIMUM_AREA) {
            config.minimum_area = parse_setting(ENV_MINIMUM_AREA, &value)?;
        }
        if let Some(value) = lookup(ENV_MERGE_GAP) {
            config.merge_gap = parse_setting(ENV_MERGE_GAP, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_BOXES) {
            config.max_boxes = Some(parse_setting(ENV_MAX_BOXES, &value)?);
        }
        if let Some(value) = lookup(ENV_SETTLE_REGIONS) {
            config.settle_regions = parse_setting(ENV_SETTLE_REGIONS, &value)?;
        }
        config.validate()?;
        Ok(config)
    }
}

fn parse_setting<T: FromStr>(key: &str, value: &str) -> Result<T, RegionError> {
    value
        .trim()
        .parse()
        .map_err(|_| RegionError::InvalidConfig(format!("{key}: cannot parse {value:?}")))
}

/// The primary output of the region pipeline for a single frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Merged regions, in the order the engine finalised them.
    pub regions: Vec<BoundingBox>,
    /// Boxes received from the detector.
    pub detected: usize,
    /// Boxes that passed the minimum-area filter.
    pub retained: usize,
    /// Boxes dropped by the `max_boxes` cap.
    pub capped: usize,
}

/// The main, top-level struct for the region engine.
pub struct RegionPipeline {
    config: ClusterConfig,
    frames_processed: u64,
}

impl RegionPipeline {
    pub fn new(config: ClusterConfig) -> Result<Self, RegionError> {
        config.validate()?;
        Ok(Self {
            config,
            frames_processed: 0,
        })
    }

    pub fn process_frame(&mut self, raw: Vec<BoundingBox>) -> Result<FrameReport, RegionError> {
        let prepared = prepare_frame(raw, &self.config)?;
        let regions = if self.config.settle_regions {
            cluster_until_stable(prepared.boxes, self.config.merge_gap)
        } else {
            cluster(prepared.boxes, self.config.merge_gap)
        };

        self.frames_processed += 1;
        debug!(
            "frame {}: {} detected, {} retained, {} capped, {} regions",
            self.frames_processed,
            prepared.detected,
            prepared.retained,
            prepared.capped,
            regions.len()
        );

        Ok(FrameReport {
            regions,
            detected: prepared.detected,
            retained: prepared.retained,
            capped: prepared.capped,
        })
    }

    /// Like `process_frame`, keeping only the merged regions.
    pub fn regions(&mut self, raw: Vec<BoundingBox>) -> Result<Vec<BoundingBox>, RegionError> {
        Ok(self.process_frame(raw)?.regions)
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }
}
