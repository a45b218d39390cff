//! decode -> detect -> gate -> crop -> score.
//!
//! Everything here is synchronous and CPU bound; [`run_blocking`] moves a
//! pipeline stage onto tokio's blocking pool for the HTTP handlers.

use std::{collections::BTreeMap, sync::Arc};

use bytes::Bytes;
use image::RgbImage;
use serde::Serialize;
use tracing::debug;

use super::detector::{best_face, pose_label, FaceDetector, Pose};
use super::error::AnalysisError;
use super::pixels::{brightness, crop, decode};
use super::quality::QualityReport;
use super::report::{RawDimension, RawScores, REPORT_SUMMARY};
use super::scorers::Radar;
use super::scoring::{combine_score, skin_type_from, summarize, SkinType, Verdict};

pub fn quick_check(detector: &dyn FaceDetector, img: &RgbImage) -> QualityReport {
    let faces = detector.detect(img);
    QualityReport::new(brightness(img), faces.len())
}

/// Body of a successful `/analyze/skin` call.
#[derive(Debug, Clone, Serialize)]
pub struct SkinReport {
    pub pose: Pose,
    pub results: RawScores,
    pub descriptions: BTreeMap<RawDimension, &'static str>,
    pub summary: &'static str,
}

/// Raw report over the most confident face, `None` when no face is found.
pub fn skin_report(detector: &dyn FaceDetector, img: &RgbImage) -> Result<Option<SkinReport>, AnalysisError> {
    let faces = detector.detect(img);
    let Some(face) = best_face(&faces) else {
        return Ok(None);
    };
    let face_crop = crop(img, face.bbox)?;
    let results = RawScores::measure(&face_crop);
    Ok(Some(SkinReport {
        pose: face.effective_pose(),
        descriptions: results.descriptions(),
        results,
        summary: REPORT_SUMMARY,
    }))
}

/// Scored face ready to be persisted as a scan.
#[derive(Debug, Clone)]
pub struct ScoredFace {
    pub radar: Radar,
    pub total: i32,
    pub skin_type: SkinType,
    pub verdict: Verdict,
    pub angle: &'static str,
    pub face_crop: RgbImage,
}

#[derive(Debug, Clone)]
pub struct FullAnalysis {
    pub quality: QualityReport,
    /// `None` when the quality gate found no face.
    pub scored: Option<ScoredFace>,
}

pub fn analyze_full(detector: &dyn FaceDetector, img: &RgbImage) -> Result<FullAnalysis, AnalysisError> {
    let faces = detector.detect(img);
    let quality = QualityReport::new(brightness(img), faces.len());
    let Some(face) = best_face(&faces) else {
        return Ok(FullAnalysis {
            quality,
            scored: None,
        });
    };

    let face_crop = crop(img, face.bbox)?;
    let radar = Radar::score(&face_crop);
    let total = combine_score(&radar);
    debug!(?radar, total, confidence = face.confidence, "face scored");

    Ok(FullAnalysis {
        quality,
        scored: Some(ScoredFace {
            skin_type: skin_type_from(&radar),
            verdict: summarize(&radar, total),
            angle: pose_label(face.effective_pose().yaw),
            radar,
            total,
            face_crop,
        }),
    })
}

/// Decode `bytes` and run `stage` on the blocking pool.
pub async fn run_blocking<T, F>(detector: Arc<dyn FaceDetector>, bytes: Bytes, stage: F) -> Result<T, AnalysisError>
where
    T: Send + 'static,
    F: FnOnce(&dyn FaceDetector, &RgbImage) -> Result<T, AnalysisError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let img = decode(&bytes)?;
        stage(detector.as_ref(), &img)
    })
    .await
    .map_err(|e| AnalysisError::Detector(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::detector::stub::StubDetector;
    use crate::analysis::scorers::fixtures::skinlike;

    #[test]
    fn no_face_yields_no_report() {
        let img = skinlike(40, 40);
        assert!(skin_report(&StubDetector::none(), &img).unwrap().is_none());

        let full = analyze_full(&StubDetector::none(), &img).unwrap();
        assert!(!full.quality.face_ok);
        assert!(full.scored.is_none());
    }

    #[test]
    fn full_analysis_scores_face_crop() {
        let img = skinlike(80, 60);
        let full = analyze_full(&StubDetector::centered(80, 60), &img).unwrap();
        assert!(full.quality.face_ok);
        let scored = full.scored.expect("face present");
        assert_eq!(scored.face_crop.dimensions(), (40, 30));
        assert_eq!(scored.total, combine_score(&scored.radar));
        assert_eq!(scored.angle, "front");
        assert!((0..=100).contains(&scored.total));
    }

    #[test]
    fn report_carries_detector_pose() {
        let img = skinlike(80, 60);
        let report = skin_report(&StubDetector::centered(80, 60), &img)
            .unwrap()
            .expect("face present");
        assert_eq!(report.pose.yaw, 3.0);
        assert_eq!(report.descriptions.len(), 6);
    }

    #[test]
    fn report_estimates_roll_from_eye_landmarks() {
        let img = skinlike(80, 60);
        let detector = StubDetector::with_eyes(80, 60, (30.0, 25.0), (50.0, 25.0));
        let report = skin_report(&detector, &img).unwrap().expect("face present");
        assert_eq!(report.pose.roll, 0.0);

        let detector = StubDetector::with_eyes(80, 60, (30.0, 20.0), (50.0, 40.0));
        let report = skin_report(&detector, &img).unwrap().expect("face present");
        assert!((report.pose.roll + 45.0).abs() < 1e-9);
    }

    #[test]
    fn quick_check_reports_brightness() {
        let img = skinlike(20, 20);
        let q = quick_check(&StubDetector::centered(20, 20), &img);
        assert!(q.face_ok);
        assert!(q.brightness > 0.0);
    }

    #[tokio::test]
    async fn run_blocking_rejects_undecodable_bytes() {
        let detector: Arc<dyn FaceDetector> = Arc::new(StubDetector::none());
        let err = run_blocking(detector, Bytes::from_static(b"garbage"), |d, img| Ok(quick_check(d, img)))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Decode(_)));
    }
}
