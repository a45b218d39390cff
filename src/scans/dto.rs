use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::Scan;
use crate::analysis::scorers::Radar;

pub const MAX_PAGE_SIZE: i64 = 100;
pub const MAX_PAGE: i64 = 1_000_000;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}
fn default_page() -> i64 { 1 }
fn default_page_size() -> i64 { 10 }

impl ListQuery {
    /// `(page, page_size)` clamped to sane bounds.
    pub fn normalized(&self) -> (i64, i64) {
        (self.page.clamp(1, MAX_PAGE), self.page_size.clamp(1, MAX_PAGE_SIZE))
    }

    /// `(page, page_size, offset)` after clamping.
    pub fn window(&self) -> (i64, i64, i64) {
        let (page, page_size) = self.normalized();
        (page, page_size, (page - 1) * page_size)
    }
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub period: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScanListItem {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub score_total: i32,
    pub summary: Option<String>,
}

impl From<Scan> for ScanListItem {
    fn from(s: Scan) -> Self {
        Self {
            id: s.id,
            created_at: s.created_at,
            score_total: s.score_total,
            summary: s.summary,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScanPage {
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub items: Vec<ScanListItem>,
}

#[derive(Debug, Serialize)]
pub struct ScanCreated {
    pub scan_id: Uuid,
    pub score_total: i32,
    pub radar: Radar,
    pub skin_type: &'static str,
    pub highlights: Vec<&'static str>,
    pub improvements: Vec<&'static str>,
    pub summary: &'static str,
    pub angle: String,
    pub lighting_ok: bool,
    pub face_ok: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CreateScanResponse {
    Created(ScanCreated),
    NoFace {
        ok: bool,
        message: &'static str,
        lighting_ok: bool,
        face_ok: bool,
        brightness: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_defaults_and_clamps() {
        let q: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.normalized(), (1, 10));

        let q = ListQuery { page: 0, page_size: 5000 };
        assert_eq!(q.normalized(), (1, MAX_PAGE_SIZE));
    }

    #[test]
    fn huge_page_numbers_do_not_overflow_offset() {
        let q: ListQuery = serde_json::from_value(serde_json::json!({
            "page": i64::MAX,
            "page_size": i64::MAX,
        }))
        .unwrap();
        let (page, page_size, offset) = q.window();
        assert_eq!((page, page_size), (MAX_PAGE, MAX_PAGE_SIZE));
        assert_eq!(offset, (MAX_PAGE - 1) * MAX_PAGE_SIZE);

        let q = ListQuery { page: i64::MIN, page_size: 10 };
        assert_eq!(q.window(), (1, 10, 0));
    }

    #[test]
    fn offset_follows_page() {
        let q = ListQuery { page: 3, page_size: 20 };
        assert_eq!(q.window(), (3, 20, 40));
    }

    #[test]
    fn no_face_response_shape() {
        let json = serde_json::to_value(CreateScanResponse::NoFace {
            ok: false,
            message: "no face found",
            lighting_ok: true,
            face_ok: false,
            brightness: 140.0,
        })
        .unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["face_ok"], false);
        assert!(json.get("scan_id").is_none());
    }
}
