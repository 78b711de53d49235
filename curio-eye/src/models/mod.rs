//! Detection model fetching, loading, and inference

pub mod manager;
pub mod yolo;

pub use manager::ModelFetcher;
pub use yolo::{Detection, YoloModel, COCO_CLASSES};
