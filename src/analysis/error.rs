use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("image dimensions are zero")]
    ZeroDimensions,

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("face region is empty")]
    EmptyFaceRegion,

    #[error("detector task failed: {0}")]
    Detector(String),
}
