//! Pixel buffer helpers for model input

use crate::error::VisionError;
use opencv::core::{Mat, Vec3f};
use opencv::prelude::*;

/// Convert a CV_32FC3 RGB Mat into a CHW float tensor buffer
pub fn mat_to_chw_tensor(mat: &Mat, width: u32, height: u32) -> Result<Vec<f32>, VisionError> {
    let (w, h) = (width as usize, height as usize);
    if mat.cols() as usize != w || mat.rows() as usize != h {
        return Err(VisionError::Processing(format!(
            "Expected a {}x{} input, got {}x{}",
            w,
            h,
            mat.cols(),
            mat.rows()
        )));
    }
    if mat.channels() != 3 {
        return Err(VisionError::Processing(format!(
            "Expected a 3-channel input, got {} channels",
            mat.channels()
        )));
    }

    let pixels = mat
        .data_typed::<Vec3f>()
        .map_err(|e| VisionError::OpenCv(e.message))?;

    let mut chw = vec![0.0f32; 3 * h * w];
    let plane = h * w;
    for (i, px) in pixels.iter().enumerate() {
        chw[i] = px[0];
        chw[plane + i] = px[1];
        chw[2 * plane + i] = px[2];
    }

    Ok(chw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::{Scalar, CV_32FC3};

    #[test]
    fn test_chw_layout_uniform_fill() {
        let mat = Mat::new_rows_cols_with_default(
            2,
            2,
            CV_32FC3,
            Scalar::new(0.25, 0.5, 0.75, 0.0),
        )
        .unwrap();

        let chw = mat_to_chw_tensor(&mat, 2, 2).unwrap();
        assert_eq!(chw.len(), 12);
        // Channel planes are contiguous
        assert!(chw[0..4].iter().all(|v| (*v - 0.25).abs() < 1e-6));
        assert!(chw[4..8].iter().all(|v| (*v - 0.5).abs() < 1e-6));
        assert!(chw[8..12].iter().all(|v| (*v - 0.75).abs() < 1e-6));
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let mat =
            Mat::new_rows_cols_with_default(2, 2, CV_32FC3, Scalar::all(0.0)).unwrap();
        assert!(mat_to_chw_tensor(&mat, 4, 4).is_err());
    }
}
