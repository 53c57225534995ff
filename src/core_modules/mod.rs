pub mod bounding_box;
pub mod box_merger;
pub mod cluster_engine;
pub mod colour_limits;
pub mod frame_boundary;
pub mod proximity;
pub mod region_overlay;
