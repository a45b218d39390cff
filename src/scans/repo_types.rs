use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::analysis::scorers::Radar;

/// Scan record in the database. Immutable once inserted.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Scan {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub lighting_ok: bool,
    pub face_ok: bool,
    pub angle: Option<String>,
    pub source_image: Option<String>,
    pub result_image: Option<String>,
    pub score_total: i32,
    pub smoothness: i32,
    pub redness: i32,
    pub tone: i32,
    pub oiliness: i32,
    pub eyebag: i32,
    pub acne: i32,
    pub summary: Option<String>,
}

impl Scan {
    pub fn radar(&self) -> Radar {
        Radar {
            smoothness: self.smoothness,
            redness: self.redness,
            tone: self.tone,
            oiliness: self.oiliness,
            eyebag: self.eyebag,
            acne: self.acne,
        }
    }
}

/// Values for a scan insert.
#[derive(Debug, Clone)]
pub struct NewScan {
    pub user_id: Uuid,
    pub lighting_ok: bool,
    pub face_ok: bool,
    pub angle: String,
    pub source_image: String,
    pub result_image: String,
    pub score_total: i32,
    pub radar: Radar,
    pub summary: String,
}
