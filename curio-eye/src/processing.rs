//! Caller-side selection over raw detections

use crate::models::Detection;

/// Filter detections at `threshold` and pick the single highest scorer
///
/// The sort is stable and descending, so equal scores keep their encounter
/// order and the first of a tie wins.
pub fn best_detection(detections: &[Detection], threshold: f32) -> Option<Detection> {
    let mut qualifying: Vec<&Detection> = detections
        .iter()
        .filter(|d| d.confidence >= threshold)
        .collect();

    qualifying.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    qualifying.first().map(|d| (*d).clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(class_name: &str, confidence: f32) -> Detection {
        Detection {
            class_id: 0,
            class_name: class_name.to_string(),
            confidence,
            bbox: (0.0, 0.0, 10.0, 10.0),
        }
    }

    #[test]
    fn test_picks_highest_above_threshold() {
        let detections = vec![det("cat", 0.9), det("dog", 0.95)];
        let best = best_detection(&detections, 0.5).unwrap();
        assert_eq!(best.class_name, "dog");
        assert!((best.confidence - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_none_when_all_below_threshold() {
        let detections = vec![det("cat", 0.4), det("dog", 0.49), det("bird", 0.1)];
        assert!(best_detection(&detections, 0.5).is_none());
    }

    #[test]
    fn test_none_for_empty_list() {
        assert!(best_detection(&[], 0.5).is_none());
    }

    #[test]
    fn test_tie_keeps_encounter_order() {
        let detections = vec![det("cat", 0.8), det("dog", 0.8)];
        let best = best_detection(&detections, 0.5).unwrap();
        assert_eq!(best.class_name, "cat");
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let detections = vec![det("cup", 0.5)];
        assert!(best_detection(&detections, 0.5).is_some());
    }
}
