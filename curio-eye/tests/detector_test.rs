//! Tests for the detection adapter and selection policy

use curio_eye::config::VisionConfig;
use curio_eye::detector::Detector;
use curio_eye::error::VisionError;
use curio_eye::models::{Detection, COCO_CLASSES};
use curio_eye::processing::best_detection;
use opencv::core::Mat;
use std::sync::Arc;

fn det(class_name: &str, confidence: f32) -> Detection {
    Detection {
        class_id: 0,
        class_name: class_name.to_string(),
        confidence,
        bbox: (0.0, 0.0, 1.0, 1.0),
    }
}

#[test]
fn test_detector_starts_unloaded() {
    let detector = Detector::new(Arc::new(VisionConfig::default()));
    assert!(!detector.is_loaded());
}

#[test]
fn test_detect_without_model_errors() {
    let detector = Detector::new(Arc::new(VisionConfig::default()));
    let frame = Mat::default();

    match detector.detect(&frame) {
        Err(VisionError::Model(msg)) => assert!(msg.contains("not loaded")),
        Ok(_) => panic!("detect must fail before the model is loaded"),
        Err(other) => panic!("Expected a model error, got {}", other),
    }
}

#[test]
fn test_selection_top_scorer_at_threshold() {
    let detections = vec![det("cat", 0.9), det("dog", 0.95)];
    let best = best_detection(&detections, 0.5).unwrap();
    assert_eq!(best.class_name, "dog");
    assert_eq!((best.confidence * 100.0).round() as u32, 95);
}

#[test]
fn test_selection_empty_below_threshold() {
    let detections = vec![det("cat", 0.49), det("dog", 0.2), det("bus", 0.0)];
    assert!(best_detection(&detections, 0.5).is_none());
}

#[test]
fn test_coco_labels_cover_common_objects() {
    for label in ["person", "dog", "cat", "bus", "cup"] {
        assert!(COCO_CLASSES.contains(&label));
    }
}
