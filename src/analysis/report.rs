//! Unit-interval skin report returned by the stateless `/analyze/skin` route.
//!
//! These statistics are a separate formula set from the persisted 0-100
//! scorers and are never written to the database.

use std::collections::BTreeMap;

use image::RgbImage;
use serde::Serialize;

use super::pixels::{fractional_region, lab_of, laplacian, to_gray};
use super::stats::{fraction, mean, percentile, std_dev};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RawDimension {
    Wrinkle,
    Redness,
    Tone,
    Oiliness,
    Eyebag,
    Acne,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawScores {
    pub wrinkle: f64,
    pub redness: f64,
    pub tone: f64,
    pub oiliness: f64,
    pub eyebag: f64,
    pub acne: f64,
}

fn unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

impl RawScores {
    pub fn measure(face: &RgbImage) -> Self {
        let gray = to_gray(face);
        let gray_samples: Vec<f64> = gray.pixels().map(|p| p.0[0] as f64).collect();

        let wrinkle = unit(std_dev(&laplacian(&gray)) / 80.0);

        let reds: Vec<f64> = face.pixels().map(|p| p.0[0] as f64).collect();
        let redness = unit((mean(&reds) - 110.0) / 80.0);

        let (a, b): (Vec<f64>, Vec<f64>) = face
            .pixels()
            .map(|p| {
                let (_, a, b) = lab_of(p);
                (a as f64, b as f64)
            })
            .unzip();
        let tone = unit((std_dev(&a) + std_dev(&b)) / 40.0);

        let p95 = percentile(&gray_samples, 95.0);
        let oiliness = unit(fraction(gray_samples.iter(), |v| **v >= p95) * 3.0);

        let roi = to_gray(&fractional_region(face, (0.25, 0.4), (0.2, 0.8)));
        let roi_samples: Vec<f64> = roi.pixels().map(|p| p.0[0] as f64).collect();
        let eyebag = if roi_samples.is_empty() {
            0.0
        } else {
            unit(1.0 - mean(&roi_samples) / 255.0)
        };

        let acne = unit(redness * 0.8 + oiliness * 0.2);

        Self {
            wrinkle,
            redness,
            tone,
            oiliness,
            eyebag,
            acne,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (RawDimension, f64)> {
        [
            (RawDimension::Wrinkle, self.wrinkle),
            (RawDimension::Redness, self.redness),
            (RawDimension::Tone, self.tone),
            (RawDimension::Oiliness, self.oiliness),
            (RawDimension::Eyebag, self.eyebag),
            (RawDimension::Acne, self.acne),
        ]
        .into_iter()
    }

    pub fn descriptions(&self) -> BTreeMap<RawDimension, &'static str> {
        self.iter().map(|(dim, v)| (dim, describe(dim, v))).collect()
    }
}

/// Thai description for a unit score, banded at 30 and 60 percent.
pub fn describe(dim: RawDimension, score: f64) -> &'static str {
    let s = score * 100.0;
    let band = if s < 30.0 {
        0
    } else if s < 60.0 {
        1
    } else {
        2
    };
    let texts: [&'static str; 3] = match dim {
        RawDimension::Acne => ["ผิวสะอาด ไม่มีสิว", "มีสิวเล็กน้อย", "มีสิวชัดเจน ควรลดความมัน"],
        RawDimension::Wrinkle => ["ผิวเรียบเนียน", "ริ้วรอยเล็กน้อย", "ริ้วรอยชัด ควรบำรุง"],
        RawDimension::Oiliness => ["ผิวสมดุล", "ค่อนข้างมัน", "ผิวมันมาก"],
        RawDimension::Redness => ["ผิวปกติ", "รอยแดงเล็กน้อย", "รอยแดงชัด"],
        RawDimension::Tone => ["สีผิวสม่ำเสมอ", "สีผิวเริ่มไม่สม่ำเสมอ", "สีผิวหมองคล้ำ"],
        RawDimension::Eyebag => ["ใต้ตาสดใส", "คล้ำเล็กน้อย", "คล้ำมาก"],
    };
    texts[band]
}

pub const REPORT_SUMMARY: &str =
    "สรุปผลเบื้องต้น: ผิวโดยรวมอยู่ในเกณฑ์ดี ควรรักษาความชุ่มชื้นและทาครีมกันแดดสม่ำเสมอ";
