use serde::Serialize;

pub const BRIGHTNESS_MIN: f64 = 110.0;
pub const BRIGHTNESS_MAX: f64 = 180.0;

/// Advisory admissibility flags for an uploaded photo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityReport {
    pub face_ok: bool,
    pub lighting_ok: bool,
    pub brightness: f64,
}

pub fn lighting_ok(brightness: f64) -> bool {
    (BRIGHTNESS_MIN..=BRIGHTNESS_MAX).contains(&brightness)
}

impl QualityReport {
    pub fn new(brightness: f64, faces: usize) -> Self {
        Self {
            face_ok: faces > 0,
            lighting_ok: lighting_ok(brightness),
            brightness: (brightness * 100.0).round() / 100.0,
        }
    }
}
