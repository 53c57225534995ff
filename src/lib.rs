// THEORY:
// This file is the main entry point for the `chroma_vision` library crate.
// It exposes the per-frame region clustering engine to external consumers
// (such as the `visual_tester` capture loop).
//
// The public surface is deliberately small: the `RegionPipeline` and its
// `ClusterConfig` / `FrameReport` form the high-level interface, while the
// `core_modules` hold the pure building blocks (box value type, proximity
// predicate, merger, cluster engine, frame boundary) that the pipeline wires
// together. Callers that already validate their own input can call the
// cluster engine directly.

pub mod core_modules;
pub mod error;
pub mod pipeline;

pub use core_modules::bounding_box::{BoundingBox, Coord};
pub use error::RegionError;
pub use pipeline::{ClusterConfig, FrameReport, RegionPipeline};
