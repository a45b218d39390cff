//! The six per-dimension skin scorers.
//!
//! Each is a pure function of the face crop returning an integer in `[0, 100]`,
//! higher meaning healthier skin on that dimension.

use image::RgbImage;
use serde::{Deserialize, Serialize};

use super::pixels::{fractional_region, hsv_of, lab_of, laplacian, to_gray};
use super::stats::{fraction, mean, std_dev, variance};

/// Per-dimension scores of one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Radar {
    pub smoothness: i32,
    pub redness: i32,
    pub tone: i32,
    pub oiliness: i32,
    pub eyebag: i32,
    pub acne: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Smoothness,
    Redness,
    Tone,
    Oiliness,
    Eyebag,
    Acne,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Smoothness,
        Dimension::Redness,
        Dimension::Tone,
        Dimension::Oiliness,
        Dimension::Eyebag,
        Dimension::Acne,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Smoothness => "smoothness",
            Dimension::Redness => "redness",
            Dimension::Tone => "tone",
            Dimension::Oiliness => "oiliness",
            Dimension::Eyebag => "eyebag",
            Dimension::Acne => "acne",
        }
    }
}

impl Radar {
    pub fn get(&self, dim: Dimension) -> i32 {
        match dim {
            Dimension::Smoothness => self.smoothness,
            Dimension::Redness => self.redness,
            Dimension::Tone => self.tone,
            Dimension::Oiliness => self.oiliness,
            Dimension::Eyebag => self.eyebag,
            Dimension::Acne => self.acne,
        }
    }

    /// Run every scorer over a face crop.
    pub fn score(face: &RgbImage) -> Self {
        Self {
            smoothness: smoothness(face),
            redness: redness(face),
            tone: tone(face),
            oiliness: oiliness(face),
            eyebag: eyebag(face),
            acne: acne(face),
        }
    }
}

/// Clamp to `[0, 100]` then truncate.
fn bounded(v: f64) -> i32 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, 100.0) as i32
}

fn gray_samples(img: &RgbImage) -> Vec<f64> {
    to_gray(img).pixels().map(|p| p.0[0] as f64).collect()
}

pub fn smoothness(img: &RgbImage) -> i32 {
    let lap = laplacian(&to_gray(img));
    bounded(100.0 - variance(&lap) / 5.0)
}

pub fn redness(img: &RgbImage) -> i32 {
    let red_sat: Vec<f64> = img
        .pixels()
        .map(hsv_of)
        .filter(|(h, _, _)| *h < 10 || *h > 170)
        .map(|(_, s, _)| s as f64)
        .collect();
    bounded(100.0 - mean(&red_sat) * 0.5)
}

pub fn tone(img: &RgbImage) -> i32 {
    bounded(100.0 - std_dev(&gray_samples(img)) / 2.0)
}

pub fn oiliness(img: &RgbImage) -> i32 {
    let specular = fraction(img.pixels().map(hsv_of), |(_, _, v)| *v > 230) * 100.0;
    bounded(100.0 - (specular - 15.0).abs() * 3.0)
}

pub fn eyebag(img: &RgbImage) -> i32 {
    let roi = fractional_region(img, (0.55, 0.75), (0.25, 0.75));
    let samples = gray_samples(&roi);
    let darkness = if samples.is_empty() { 255.0 } else { 255.0 - mean(&samples) };
    bounded(100.0 - darkness * 0.5)
}

pub fn acne(img: &RgbImage) -> i32 {
    let blemish = fraction(img.pixels().map(lab_of), |(_, a, _)| *a > 155) * 100.0;
    bounded(100.0 - blemish * 2.0)
}
