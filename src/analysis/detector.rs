use image::RgbImage;
use serde::Serialize;

use super::pixels::Rect;

/// Head orientation in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Pose {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub bbox: Rect,
    /// Facial keypoints in source pixels; empty when the model has none.
    /// The first two points are the left and right eye centres.
    pub landmarks: Vec<(f32, f32)>,
    pub pose: Pose,
    pub confidence: f64,
}

impl Face {
    /// Detector pose, or one estimated from the landmarks when the
    /// detector left it at zero.
    pub fn effective_pose(&self) -> Pose {
        if self.pose != Pose::default() {
            return self.pose;
        }
        pose_from_landmarks(&self.landmarks).unwrap_or_default()
    }
}

/// Roll in degrees from the eye line, `None` without both eye points.
pub fn pose_from_landmarks(landmarks: &[(f32, f32)]) -> Option<Pose> {
    let [(lx, ly), (rx, ry), ..] = landmarks else {
        return None;
    };
    let dx = (rx - lx) as f64;
    let dy = (ry - ly) as f64;
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    Some(Pose {
        roll: -dy.atan2(dx).to_degrees(),
        ..Pose::default()
    })
}

/// Pluggable face detection backend.
///
/// Implementations must be safe to call from many requests at once; the
/// handle is loaded once at startup and shared read-only.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, image: &RgbImage) -> Vec<Face>;
}

/// Most confident face, if any.
pub fn best_face(faces: &[Face]) -> Option<&Face> {
    faces
        .iter()
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
}

/// Coarse pose label stored with each scan.
pub fn pose_label(yaw: f64) -> &'static str {
    const FRONT_THRESH: f64 = 10.0;
    const SIDE_THRESH: f64 = 15.0;

    if yaw.abs() < FRONT_THRESH {
        "front"
    } else if yaw > SIDE_THRESH {
        "left"
    } else if yaw < -SIDE_THRESH {
        "right"
    } else {
        "uncertain"
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn face(confidence: f64) -> Face {
        Face {
            bbox: Rect {
                x: 0,
                y: 0,
                width: 1,
                height: 1,
            },
            landmarks: Vec::new(),
            pose: Pose::default(),
            confidence,
        }
    }

    #[test]
    fn best_face_picks_max_confidence() {
        let faces = vec![face(0.4), face(0.9), face(0.7)];
        assert_eq!(best_face(&faces).unwrap().confidence, 0.9);
        assert!(best_face(&[]).is_none());
    }

    #[test]
    fn eye_line_gives_roll() {
        let pose = pose_from_landmarks(&[(0.0, 0.0), (10.0, 10.0)]).unwrap();
        assert!((pose.roll + 45.0).abs() < 1e-9);
        assert_eq!((pose.yaw, pose.pitch), (0.0, 0.0));

        let level = pose_from_landmarks(&[(5.0, 7.0), (25.0, 7.0), (15.0, 15.0)]).unwrap();
        assert_eq!(level.roll, 0.0);

        assert!(pose_from_landmarks(&[(1.0, 1.0)]).is_none());
        assert!(pose_from_landmarks(&[(3.0, 3.0), (3.0, 3.0)]).is_none());
    }

    #[test]
    fn detector_pose_wins_over_landmarks() {
        let mut f = face(0.9);
        f.landmarks = vec![(0.0, 0.0), (10.0, -10.0)];
        assert!((f.effective_pose().roll - 45.0).abs() < 1e-9);

        f.pose = Pose { yaw: 20.0, pitch: 0.0, roll: 1.0 };
        assert_eq!(f.effective_pose(), f.pose);

        assert_eq!(face(0.5).effective_pose(), Pose::default());
    }

    #[test]
    fn pose_label_bands() {
        assert_eq!(pose_label(0.0), "front");
        assert_eq!(pose_label(-9.9), "front");
        assert_eq!(pose_label(12.0), "uncertain");
        assert_eq!(pose_label(-12.0), "uncertain");
        assert_eq!(pose_label(15.1), "left");
        assert_eq!(pose_label(-30.0), "right");
    }
}
