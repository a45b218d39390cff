//! Canned advice derived from the most recent scan.

use super::dto::AdviseResponse;
use crate::analysis::scorers::Radar;

const NO_SCAN_REPLY: &str = "ยังไม่มีผลวิเคราะห์ล่าสุด ลองสแกนก่อนนะครับ";
const NO_SCAN_SUGGESTIONS: [&str; 2] = ["เริ่มสแกนใบหน้า", "ดูวิธีถ่ายให้แสงเหมาะสม"];
const FOLLOW_UPS: [&str; 3] = ["แนะนำผลิตภัณฑ์บำรุงผิว", "สาเหตุผิวแดง?", "ลดสิวอย่างไร?"];
const DEFAULT_SUMMARY: &str = "ผิวโดยรวมปกติดี";

/// Care tips for the weak dimensions of `radar`, in display order.
pub fn tips_for(radar: &Radar) -> Vec<&'static str> {
    let mut tips = Vec::new();
    if radar.redness < 60 {
        tips.push("ลองใช้ครีมลดรอยแดงที่มี Niacinamide");
    }
    if radar.oiliness < 40 {
        tips.push("บำรุงด้วยมอยส์เจอร์ไรเซอร์เพิ่มความชุ่มชื้น");
    }
    if radar.acne < 60 {
        tips.push("เลือกโฟมล้างหน้าสูตรอ่อนโยน ลดการอุดตัน");
    }
    tips
}

/// Reply for the caller's latest scan, if any. The question text does not
/// change the answer yet.
pub fn advise(latest: Option<(&Radar, Option<&str>)>) -> AdviseResponse {
    let Some((radar, summary)) = latest else {
        return AdviseResponse {
            reply: NO_SCAN_REPLY.to_string(),
            suggestions: NO_SCAN_SUGGESTIONS.to_vec(),
        };
    };

    let summary = summary.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_SUMMARY);
    let mut reply = format!("สรุปจากผลล่าสุด: {summary}");
    let tips = tips_for(radar);
    if !tips.is_empty() {
        reply.push_str(" | ");
        reply.push_str(&tips.join(" • "));
    }
    AdviseResponse {
        reply,
        suggestions: FOLLOW_UPS.to_vec(),
    }
}
