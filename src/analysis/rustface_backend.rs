use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context;
use image::{imageops::FilterType, RgbImage};
use tracing::{debug, info};

use super::detector::{Face, FaceDetector, Pose};
use super::pixels::{to_gray, Rect};

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// The model is read once; each call builds a lightweight detector from a
/// clone of it, so concurrent requests never share mutable detector state.
pub struct RustfaceDetector {
    model: rustface::Model,
    detect_size: u32,
}

impl RustfaceDetector {
    pub fn load(path: impl AsRef<Path>, detect_size: u32) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("open face model {}", path.display()))?;
        let model = rustface::read_model(BufReader::new(file))
            .with_context(|| format!("parse face model {}", path.display()))?;
        info!(model = %path.display(), detect_size, "face detector loaded");
        Ok(Self {
            model,
            detect_size: detect_size.max(32),
        })
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, image: &RgbImage) -> Vec<Face> {
        let mut gray = to_gray(image);
        let (w, h) = gray.dimensions();
        let longest = w.max(h);
        let scale = if longest > self.detect_size {
            let s = self.detect_size as f64 / longest as f64;
            let nw = ((w as f64 * s).round() as u32).max(1);
            let nh = ((h as f64 * s).round() as u32).max(1);
            gray = image::imageops::resize(&gray, nw, nh, FilterType::Triangle);
            w as f64 / nw as f64
        } else {
            1.0
        };

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(20);
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), gray.width(), gray.height()));
        debug!(count = faces.len(), scale, "rustface detection");

        faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                // SeetaFace frontal model yields boxes only
                Face {
                    bbox: source_rect(bbox.x(), bbox.y(), bbox.width(), bbox.height(), scale),
                    landmarks: Vec::new(),
                    pose: Pose::default(),
                    confidence: face.score(),
                }
            })
            .filter(|f| f.bbox.width > 0 && f.bbox.height > 0)
            .collect()
    }
}

/// Detector box clipped at the top-left edge and scaled back to source pixels.
fn source_rect(x: i32, y: i32, width: u32, height: u32, scale: f64) -> Rect {
    let clip = |origin: i32, len: u32| {
        let start = origin.max(0) as i64;
        let end = (origin as i64 + len as i64).max(0);
        (start, end - start)
    };
    let (x0, w) = clip(x, width);
    let (y0, h) = clip(y, height);
    Rect {
        x: (x0 as f64 * scale) as u32,
        y: (y0 as f64 * scale) as u32,
        width: (w as f64 * scale) as u32,
        height: (h as f64 * scale) as u32,
    }
}
