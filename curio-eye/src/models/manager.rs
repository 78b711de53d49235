//! Model fetcher with auto-download

use crate::config::VisionConfig;
use crate::error::VisionError;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// The fixed pretrained variant used for detection
const YOLO_V8N_FILE: &str = "yolov8n.onnx";
const YOLO_V8N_URL: &str =
    "https://github.com/ultralytics/assets/releases/download/v8.2.0/yolov8n.onnx";
const YOLO_V8N_SHA256: &str = ""; // pinned release asset; checksum optional

const MAX_MODEL_SIZE: usize = 2_000_000_000;
const MIN_MODEL_SIZE: usize = 1024;
const DOWNLOAD_TIMEOUT_SECS: u64 = 3600;

/// Fetches model files into the configured model directory
pub struct ModelFetcher {
    config: Arc<VisionConfig>,
}

impl ModelFetcher {
    pub fn new(config: Arc<VisionConfig>) -> Self {
        Self { config }
    }

    /// Ensure the model directory exists
    pub fn ensure_model_dir(&self) -> Result<PathBuf, VisionError> {
        let model_dir = &self.config.model_dir;
        if !model_dir.exists() {
            fs::create_dir_all(model_dir)?;
            info!("Created model directory: {:?}", model_dir);
        }
        Ok(model_dir.clone())
    }

    /// Download a model file if not already present
    pub async fn ensure_model(
        &self,
        file_name: &str,
        url: &str,
        checksum: &str,
    ) -> Result<PathBuf, VisionError> {
        if file_name.is_empty() || file_name.len() > 255 {
            return Err(VisionError::Model("Invalid model file name".to_string()));
        }

        // No path traversal through the file name
        if file_name.contains("..") || file_name.contains('/') || file_name.contains('\\') {
            return Err(VisionError::Model(
                "Model file name contains invalid characters".to_string(),
            ));
        }

        if url.is_empty() || url.len() > 2048 {
            return Err(VisionError::Model("Invalid model URL".to_string()));
        }

        if !url.starts_with("https://") {
            return Err(VisionError::Model(
                "Only HTTPS URLs are allowed for model downloads".to_string(),
            ));
        }

        self.ensure_model_dir()?;
        let model_path = self.config.model_dir.join(file_name);

        if model_path.exists() {
            info!("Model {} already present at {:?}", file_name, model_path);
            return Ok(model_path);
        }

        info!("Downloading model {} from {}", file_name, url);

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .build()?;

        let response = client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(VisionError::Model(format!(
                "Failed to download model: HTTP {}",
                response.status()
            )));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > MAX_MODEL_SIZE as u64 {
                return Err(VisionError::Model(format!(
                    "Model too large: {} bytes (max {} bytes)",
                    content_length, MAX_MODEL_SIZE
                )));
            }
        }

        let bytes = response.bytes().await?;
        if bytes.len() > MAX_MODEL_SIZE {
            return Err(VisionError::Model(format!(
                "Downloaded model too large: {} bytes (max {} bytes)",
                bytes.len(),
                MAX_MODEL_SIZE
            )));
        }
        if bytes.len() < MIN_MODEL_SIZE {
            return Err(VisionError::Model(
                "Downloaded file too small, likely corrupted".to_string(),
            ));
        }

        if !checksum.is_empty() {
            let mut hasher = Sha256::new();
            hasher.update(&bytes);
            let computed = hex::encode(hasher.finalize());
            if computed != checksum {
                return Err(VisionError::Model(format!(
                    "Checksum mismatch for model {}: expected {}, got {}",
                    file_name, checksum, computed
                )));
            }
            info!("Verified checksum for model {}", file_name);
        } else {
            info!(
                "Downloaded {} bytes for model {} (checksum verification skipped)",
                bytes.len(),
                file_name
            );
        }

        // Write via temp file and rename so a partial download never
        // masquerades as a valid model
        let temp_path = model_path.with_extension("tmp");
        fs::write(&temp_path, &bytes)?;
        fs::rename(&temp_path, &model_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            VisionError::Io(e)
        })?;

        info!("Model {} saved to {:?}", file_name, model_path);
        Ok(model_path)
    }

    /// Path to the detection model, downloading it on first use
    pub async fn detection_model(&self) -> Result<PathBuf, VisionError> {
        self.ensure_model(YOLO_V8N_FILE, YOLO_V8N_URL, YOLO_V8N_SHA256)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fetcher_with_dir(dir: &TempDir) -> ModelFetcher {
        let config = VisionConfig {
            model_dir: dir.path().to_path_buf(),
            ..VisionConfig::default()
        };
        ModelFetcher::new(Arc::new(config))
    }

    #[tokio::test]
    async fn test_ensure_model_dir_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = fetcher_with_dir(&temp_dir);

        assert!(fetcher.ensure_model_dir().is_ok());
        assert!(fetcher.ensure_model_dir().is_ok());
    }

    #[tokio::test]
    async fn test_ensure_model_invalid_name() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = fetcher_with_dir(&temp_dir);

        let result = fetcher.ensure_model("", "https://example.com/m.onnx", "").await;
        assert!(result.is_err());

        let result = fetcher.ensure_model("../evil", "https://example.com/m.onnx", "").await;
        assert!(result.is_err());

        let result = fetcher.ensure_model("a/b.onnx", "https://example.com/m.onnx", "").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_ensure_model_invalid_url() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = fetcher_with_dir(&temp_dir);

        let result = fetcher.ensure_model("m.onnx", "", "").await;
        assert!(result.is_err());

        let result = fetcher.ensure_model("m.onnx", "http://example.com/m.onnx", "").await;
        assert!(result.is_err());

        let result = fetcher.ensure_model("m.onnx", "ftp://example.com/m.onnx", "").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_ensure_model_existing_file_short_circuits() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = fetcher_with_dir(&temp_dir);

        let path = temp_dir.path().join("m.onnx");
        fs::write(&path, b"already here").unwrap();

        // URL is unreachable on purpose; the existing file must win
        let result = fetcher
            .ensure_model("m.onnx", "https://127.0.0.1:1/m.onnx", "")
            .await
            .unwrap();
        assert_eq!(result, path);
    }
}
