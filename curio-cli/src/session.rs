//! Scan session: the orchestration state machine
//!
//! Owns the camera, the detector, and the fact resolver, and dispatches
//! explicit commands against them. Every failure is rendered as a status
//! string for the console; nothing here aborts the process.

use crate::text::title_case;
use curio_eye::processing::best_detection;
use curio_eye::{CameraManager, Detector, FacingMode, VisionConfig};
use curio_facts::{Fact, FactResolver, WikiBackend};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// User-issued commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Scan,
    Flip,
    Stop,
    Status,
    Help,
    Quit,
}

impl Command {
    /// Parse a console line into a command
    pub fn parse(input: &str) -> Option<Command> {
        match input.trim().to_ascii_lowercase().as_str() {
            "start" => Some(Command::Start),
            "scan" => Some(Command::Scan),
            "flip" => Some(Command::Flip),
            "stop" => Some(Command::Stop),
            "status" => Some(Command::Status),
            "help" | "?" => Some(Command::Help),
            "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Orchestration phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    ModelLoading,
    CameraReady,
    Scanning,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::ModelLoading => "model-loading",
            Phase::CameraReady => "camera-ready",
            Phase::Scanning => "scanning",
        };
        write!(f, "{}", name)
    }
}

/// Result of one completed scan
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Title-cased display label
    pub label: String,
    /// Rounded percentage confidence
    pub confidence_pct: u32,
    /// Fact for the label, when a lookup candidate hit
    pub fact: Option<Fact>,
}

/// The view controller: owns all mutable scan state
pub struct ScanSession<B: WikiBackend> {
    camera: CameraManager,
    detector: Detector,
    resolver: FactResolver<B>,
    confidence_threshold: f32,
    phase: Phase,
    last_scan: Option<ScanOutcome>,
}

impl<B: WikiBackend> ScanSession<B> {
    pub fn new(
        config: Arc<VisionConfig>,
        resolver: FactResolver<B>,
        initial_facing: FacingMode,
    ) -> Self {
        Self {
            camera: CameraManager::new(config.clone(), initial_facing),
            detector: Detector::new(config.clone()),
            resolver,
            confidence_threshold: config.confidence_threshold,
            phase: Phase::Idle,
            last_scan: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn last_scan(&self) -> Option<&ScanOutcome> {
        self.last_scan.as_ref()
    }

    async fn load_model(&mut self) -> Result<(), String> {
        if self.detector.is_loaded() {
            return Ok(());
        }
        self.phase = Phase::ModelLoading;
        info!("Loading detection model");
        self.detector
            .ensure_loaded()
            .await
            .map_err(|e| format!("Failed to load detection model: {}", e))
    }

    /// Load the model if needed, then start the camera
    pub async fn start(&mut self) -> String {
        if let Err(message) = self.load_model().await {
            self.phase = Phase::Idle;
            return message;
        }

        match self.camera.start(self.camera.facing()) {
            Ok(()) => {
                self.phase = Phase::CameraReady;
                format!(
                    "Camera ready ({} facing). 'scan' identifies the object in view.",
                    self.camera.facing()
                )
            }
            Err(e) => {
                self.phase = Phase::Idle;
                format!("Camera unavailable: {}", e)
            }
        }
    }

    /// Capture a frame, pick the best detection, and look up a fact
    pub async fn scan(&mut self) -> String {
        if let Err(message) = self.load_model().await {
            self.phase = if self.camera.is_active() {
                Phase::CameraReady
            } else {
                Phase::Idle
            };
            return message;
        }

        if !self.camera.is_active() {
            self.phase = Phase::Idle;
            return "Camera is not running. Use 'start' first.".to_string();
        }

        self.phase = Phase::Scanning;
        let message = self.scan_active().await;
        self.phase = Phase::CameraReady;
        message
    }

    async fn scan_active(&mut self) -> String {
        let frame = match self.camera.capture_frame() {
            Ok(frame) => frame,
            Err(e) => return format!("Failed to capture a frame: {}", e),
        };

        let detections = match self.detector.detect(&frame) {
            Ok(detections) => detections,
            Err(e) => return format!("Detection failed: {}", e),
        };

        let best = match best_detection(&detections, self.confidence_threshold) {
            Some(best) => best,
            None => return "No clear object in view.".to_string(),
        };

        // Lookup uses the lowercased label; display uses title case
        let query = best.class_name.to_lowercase();
        let fact = self.resolver.resolve(&query).await;

        let outcome = ScanOutcome {
            label: title_case(&best.class_name),
            confidence_pct: (best.confidence * 100.0).round() as u32,
            fact,
        };
        let rendered = render_outcome(&outcome);
        self.last_scan = Some(outcome);
        rendered
    }

    /// Toggle facing mode and restart the camera
    pub fn flip(&mut self) -> String {
        match self.camera.flip() {
            Ok(mode) => {
                self.phase = Phase::CameraReady;
                format!("Switched to the {} camera.", mode)
            }
            Err(e) => {
                self.phase = Phase::Idle;
                format!("Camera unavailable after flip: {}", e)
            }
        }
    }

    /// Release the camera
    pub fn stop(&mut self) -> String {
        self.camera.stop();
        self.phase = Phase::Idle;
        "Camera stopped.".to_string()
    }

    /// Human-readable session state
    pub fn status(&self) -> String {
        let mut lines = vec![
            format!("Phase: {}", self.phase),
            format!("Facing: {}", self.camera.facing()),
            format!(
                "Model: {}",
                if self.detector.is_loaded() { "loaded" } else { "not loaded" }
            ),
            format!(
                "Camera: {}",
                if self.camera.is_active() { "active" } else { "inactive" }
            ),
        ];
        if let Some(outcome) = &self.last_scan {
            lines.push(format!(
                "Last scan: {} ({}%)",
                outcome.label, outcome.confidence_pct
            ));
        }
        lines.join("\n")
    }
}

/// Render one scan outcome for display
fn render_outcome(outcome: &ScanOutcome) -> String {
    let mut lines = vec![format!(
        "Detected: {} ({}%)",
        outcome.label, outcome.confidence_pct
    )];
    match &outcome.fact {
        Some(fact) => {
            lines.push(fact.extract.clone());
            lines.push(format!("Source: {} <{}>", fact.source_title, fact.source_url));
        }
        None => lines.push(format!(
            "No encyclopedia entry found for \"{}\".",
            outcome.label.to_lowercase()
        )),
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parse_known() {
        assert_eq!(Command::parse("start"), Some(Command::Start));
        assert_eq!(Command::parse("  SCAN "), Some(Command::Scan));
        assert_eq!(Command::parse("flip"), Some(Command::Flip));
        assert_eq!(Command::parse("stop"), Some(Command::Stop));
        assert_eq!(Command::parse("status"), Some(Command::Status));
        assert_eq!(Command::parse("?"), Some(Command::Help));
        assert_eq!(Command::parse("exit"), Some(Command::Quit));
    }

    #[test]
    fn test_command_parse_unknown() {
        assert_eq!(Command::parse("snap"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Idle.to_string(), "idle");
        assert_eq!(Phase::ModelLoading.to_string(), "model-loading");
        assert_eq!(Phase::CameraReady.to_string(), "camera-ready");
        assert_eq!(Phase::Scanning.to_string(), "scanning");
    }

    #[test]
    fn test_render_outcome_with_fact() {
        let outcome = ScanOutcome {
            label: "Dog".to_string(),
            confidence_pct: 95,
            fact: Some(Fact {
                extract: "The dog is a domesticated descendant of the wolf.".to_string(),
                source_title: "Dog".to_string(),
                source_url: "https://en.wikipedia.org/wiki/Dog".to_string(),
            }),
        };

        let rendered = render_outcome(&outcome);
        assert!(rendered.contains("Detected: Dog (95%)"));
        assert!(rendered.contains("domesticated descendant"));
        assert!(rendered.contains("Source: Dog <https://en.wikipedia.org/wiki/Dog>"));
    }

    #[test]
    fn test_render_outcome_without_fact() {
        let outcome = ScanOutcome {
            label: "Teddy Bear".to_string(),
            confidence_pct: 72,
            fact: None,
        };

        let rendered = render_outcome(&outcome);
        assert!(rendered.contains("Detected: Teddy Bear (72%)"));
        assert!(rendered.contains("No encyclopedia entry found for \"teddy bear\"."));
    }
}
