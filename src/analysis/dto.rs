use serde::Serialize;

use super::pipeline::SkinReport;

pub const NO_FACE_MESSAGE: &str = "no face found";

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SkinResponse {
    Found {
        ok: bool,
        #[serde(flatten)]
        report: SkinReport,
    },
    NoFace {
        ok: bool,
        message: &'static str,
    },
}

impl SkinResponse {
    pub fn found(report: SkinReport) -> Self {
        Self::Found { ok: true, report }
    }

    pub fn no_face() -> Self {
        Self::NoFace {
            ok: false,
            message: NO_FACE_MESSAGE,
        }
    }
}
