//! Configuration for curio-eye

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Vision system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Device index used for the front (user-facing) camera
    pub front_camera_id: u32,
    /// Device index used for the back (environment-facing) camera
    pub back_camera_id: u32,
    /// Preferred capture resolution (width, height); best-effort, the
    /// device may deliver something else
    pub resolution: (u32, u32),
    /// Minimum confidence for a detection to qualify as the scan result
    pub confidence_threshold: f32,
    /// Directory where the detection model is stored
    pub model_dir: PathBuf,
}

impl Default for VisionConfig {
    fn default() -> Self {
        let model_dir = dirs::home_dir()
            .map(|mut p| {
                p.push(".curio");
                p.push("models");
                p
            })
            .unwrap_or_else(|| PathBuf::from("./models"));

        Self {
            front_camera_id: 1,
            back_camera_id: 0,
            resolution: (640, 480),
            confidence_threshold: 0.5,
            model_dir,
        }
    }
}

impl VisionConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.resolution.0 == 0 || self.resolution.1 == 0 {
            return Err("Resolution must be non-zero".to_string());
        }

        if self.resolution.0 > 7680 || self.resolution.1 > 4320 {
            return Err("Resolution too large (max 8K)".to_string());
        }

        let total_pixels = self.resolution.0
            .checked_mul(self.resolution.1)
            .ok_or_else(|| "Resolution would cause integer overflow".to_string())?;

        if total_pixels > 100_000_000 {
            return Err("Resolution too large (max 100M pixels)".to_string());
        }

        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err("Confidence threshold must be within [0, 1]".to_string());
        }

        if self.front_camera_id > 100 || self.back_camera_id > 100 {
            return Err("Camera ID too large (max 100)".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = VisionConfig::default();
        assert_eq!(config.back_camera_id, 0);
        assert_eq!(config.resolution, (640, 480));
        assert_eq!(config.confidence_threshold, 0.5);
    }

    #[test]
    fn test_config_validation_valid() {
        assert!(VisionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_resolution_zero() {
        let mut config = VisionConfig::default();
        config.resolution = (0, 480);
        assert!(config.validate().is_err());

        config.resolution = (640, 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_resolution_too_large() {
        let mut config = VisionConfig::default();
        config.resolution = (7681, 4320);
        assert!(config.validate().is_err());

        config.resolution = (u32::MAX, 2);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_threshold_out_of_range() {
        let mut config = VisionConfig::default();
        config.confidence_threshold = 1.5;
        assert!(config.validate().is_err());

        config.confidence_threshold = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_camera_id_too_large() {
        let mut config = VisionConfig::default();
        config.front_camera_id = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_edge_cases() {
        let mut config = VisionConfig::default();
        config.resolution = (1, 1);
        config.confidence_threshold = 0.0;
        config.back_camera_id = 100;
        assert!(config.validate().is_ok());

        config.confidence_threshold = 1.0;
        assert!(config.validate().is_ok());
    }
}
