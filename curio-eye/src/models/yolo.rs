//! YOLOv8 object detection model

use crate::error::VisionError;
use crate::utils::mat_to_chw_tensor;
use opencv::{
    core::{Mat, Size, CV_32F},
    imgproc,
    prelude::*,
};
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use tracing::{debug, info};

/// COCO class names (80 classes)
pub const COCO_CLASSES: &[&str] = &[
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat",
    "dog", "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack",
    "umbrella", "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball",
    "kite", "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket",
    "bottle", "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple",
    "sandwich", "orange", "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair",
    "couch", "potted plant", "bed", "dining table", "toilet", "tv", "laptop", "mouse",
    "remote", "keyboard", "cell phone", "microwave", "oven", "toaster", "sink", "refrigerator",
    "book", "clock", "vase", "scissors", "teddy bear", "hair drier", "toothbrush",
];

/// YOLO standard input edge
const INPUT_SIZE: u32 = 640;
/// Decode-time floor; the scan-level confidence threshold is applied by the
/// caller, this only discards anchor noise
const SCORE_FLOOR: f32 = 0.25;
const NMS_IOU_THRESHOLD: f32 = 0.45;

/// Detected object
#[derive(Debug, Clone)]
pub struct Detection {
    pub class_id: usize,
    pub class_name: String,
    /// Confidence score in [0, 1]
    pub confidence: f32,
    /// x, y, width, height in frame pixels
    pub bbox: (f32, f32, f32, f32),
}

/// YOLOv8n model for object detection
pub struct YoloModel {
    session: Session,
}

impl YoloModel {
    /// Build an inference session from an ONNX file
    pub fn load(model_path: &Path) -> Result<Self, VisionError> {
        let session = Session::builder()?
            .with_intra_threads(2)?
            .commit_from_file(model_path)
            .map_err(|e| VisionError::Ort(format!("Failed to load detection model: {}", e)))?;

        info!("Detection model loaded from {:?}", model_path);
        Ok(Self { session })
    }

    /// Detect objects in a frame
    pub fn detect(&self, frame: &Mat) -> Result<Vec<Detection>, VisionError> {
        let frame_w = frame.cols() as f32;
        let frame_h = frame.rows() as f32;
        if frame_w <= 0.0 || frame_h <= 0.0 {
            return Err(VisionError::Processing("Cannot run detection on an empty frame".to_string()));
        }

        let chw = self.preprocess(frame)?;
        let input = Tensor::from_array((
            [1usize, 3, INPUT_SIZE as usize, INPUT_SIZE as usize],
            chw,
        ))?;

        let outputs = self.session.run(ort::inputs!["images" => input])?;
        let (shape, data) = outputs["output0"].try_extract_tensor::<f32>()?;

        let detections = apply_nms(
            decode_output(shape, data, frame_w, frame_h),
            NMS_IOU_THRESHOLD,
        );
        debug!("Detected {} objects", detections.len());
        Ok(detections)
    }

    /// Resize, convert BGR to RGB, normalize to [0, 1], reshape to CHW
    fn preprocess(&self, frame: &Mat) -> Result<Vec<f32>, VisionError> {
        let mut resized = Mat::default();
        imgproc::resize(
            frame,
            &mut resized,
            Size::new(INPUT_SIZE as i32, INPUT_SIZE as i32),
            0.0,
            0.0,
            imgproc::INTER_LINEAR,
        )?;

        let mut rgb = Mat::default();
        imgproc::cvt_color(&resized, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;

        let mut float_mat = Mat::default();
        rgb.convert_to(&mut float_mat, CV_32F, 1.0 / 255.0, 0.0)?;

        mat_to_chw_tensor(&float_mat, INPUT_SIZE, INPUT_SIZE)
    }
}

/// Decode the v8 output head `[1, 4 + classes, anchors]` into detections in
/// frame-pixel coordinates
fn decode_output(shape: &[i64], data: &[f32], frame_w: f32, frame_h: f32) -> Vec<Detection> {
    if shape.len() != 3 || shape[0] != 1 {
        return Vec::new();
    }

    let rows = shape[1] as usize;
    let anchors = shape[2] as usize;
    if rows < 5 || anchors == 0 || data.len() < rows * anchors {
        return Vec::new();
    }

    let num_classes = (rows - 4).min(COCO_CLASSES.len());
    let scale_x = frame_w / INPUT_SIZE as f32;
    let scale_y = frame_h / INPUT_SIZE as f32;

    let mut detections = Vec::new();
    for a in 0..anchors {
        let mut best_class = 0usize;
        let mut best_score = 0.0f32;
        for c in 0..num_classes {
            let score = data[(4 + c) * anchors + a];
            if score > best_score {
                best_score = score;
                best_class = c;
            }
        }

        if !best_score.is_finite() || best_score < SCORE_FLOOR {
            continue;
        }

        // Box center and extent in model input space
        let cx = data[a];
        let cy = data[anchors + a];
        let w = data[2 * anchors + a];
        let h = data[3 * anchors + a];
        if !(cx.is_finite() && cy.is_finite() && w.is_finite() && h.is_finite()) {
            continue;
        }
        if w <= 0.0 || h <= 0.0 {
            continue;
        }

        let x = ((cx - w / 2.0) * scale_x).max(0.0);
        let y = ((cy - h / 2.0) * scale_y).max(0.0);
        let bw = (w * scale_x).min(frame_w - x);
        let bh = (h * scale_y).min(frame_h - y);
        if bw <= 0.0 || bh <= 0.0 {
            continue;
        }

        detections.push(Detection {
            class_id: best_class,
            class_name: COCO_CLASSES[best_class].to_string(),
            confidence: best_score.min(1.0),
            bbox: (x, y, bw, bh),
        });
    }

    detections
}

/// Non-maximum suppression, per class, highest confidence first
fn apply_nms(mut detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    detections.retain(|d| d.confidence.is_finite());
    detections.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep: Vec<Detection> = Vec::new();
    'candidates: for det in detections {
        for kept in &keep {
            if kept.class_id == det.class_id && iou(&kept.bbox, &det.bbox) > iou_threshold {
                continue 'candidates;
            }
        }
        keep.push(det);
    }
    keep
}

/// Intersection over union of two x/y/w/h boxes
fn iou(a: &(f32, f32, f32, f32), b: &(f32, f32, f32, f32)) -> f32 {
    let (ax, ay, aw, ah) = *a;
    let (bx, by, bw, bh) = *b;
    if aw <= 0.0 || ah <= 0.0 || bw <= 0.0 || bh <= 0.0 {
        return 0.0;
    }

    let inter_x_min = ax.max(bx);
    let inter_y_min = ay.max(by);
    let inter_x_max = (ax + aw).min(bx + bw);
    let inter_y_max = (ay + ah).min(by + bh);
    if inter_x_max <= inter_x_min || inter_y_max <= inter_y_min {
        return 0.0;
    }

    let inter = (inter_x_max - inter_x_min) * (inter_y_max - inter_y_min);
    let union = aw * ah + bw * bh - inter;
    if union <= 0.0 || !union.is_finite() {
        return 0.0;
    }

    (inter / union).clamp(0.0, 1.0)
}
