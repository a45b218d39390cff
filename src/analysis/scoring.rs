use serde::{Deserialize, Serialize};

use super::scorers::{Dimension, Radar};

pub const WEIGHTS: [(Dimension, f64); 6] = [
    (Dimension::Smoothness, 0.25),
    (Dimension::Redness, 0.15),
    (Dimension::Tone, 0.20),
    (Dimension::Oiliness, 0.15),
    (Dimension::Eyebag, 0.10),
    (Dimension::Acne, 0.15),
];

/// Weighted composite of the six dimensions, rounded down.
pub fn combine_score(radar: &Radar) -> i32 {
    let total: f64 = WEIGHTS
        .iter()
        .map(|(dim, w)| radar.get(*dim) as f64 * w)
        .sum();
    // guard against 79.99999 style float error on exact sums
    (total + 1e-9).floor().clamp(0.0, 100.0) as i32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkinType {
    Dry,
    Oily,
    Combination,
}

impl SkinType {
    pub fn as_str(self) -> &'static str {
        match self {
            SkinType::Dry => "dry",
            SkinType::Oily => "oily",
            SkinType::Combination => "combination",
        }
    }
}

pub fn skin_type_from(radar: &Radar) -> SkinType {
    if radar.oiliness < 40 {
        SkinType::Dry
    } else if radar.oiliness > 70 && radar.redness > 60 {
        SkinType::Oily
    } else {
        SkinType::Combination
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub highlights: Vec<&'static str>,
    pub improvements: Vec<&'static str>,
    pub summary: &'static str,
}

pub fn summarize(radar: &Radar, total: i32) -> Verdict {
    let mut highlights = Vec::new();
    let mut improvements = Vec::new();
    if radar.smoothness > 75 {
        highlights.push("ผิวเรียบเนียน");
    }
    if radar.oiliness > 60 {
        highlights.push("สมดุลความมันดี");
    }
    if radar.redness < 60 {
        improvements.push("ผิวแดงเล็กน้อย");
    }
    if radar.acne < 60 {
        improvements.push("สิว/จุดอุดตัน");
    }
    let summary = if total >= 80 {
        "ผิวสุขภาพดีมาก ✨"
    } else {
        "ผิวปกติดี 😊"
    };
    Verdict {
        highlights,
        improvements,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(v: i32) -> Radar {
        Radar {
            smoothness: v,
            redness: v,
            tone: v,
            oiliness: v,
            eyebag: v,
            acne: v,
        }
    }

    #[test]
    fn weights_sum_to_one() {
        let sum: f64 = WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn uniform_radar_combines_to_itself() {
        for v in [0, 1, 37, 80, 99, 100] {
            assert_eq!(combine_score(&uniform(v)), v);
        }
    }

    #[test]
    fn combine_is_floored_weighted_sum() {
        let radar = Radar {
            smoothness: 81,
            redness: 55,
            tone: 72,
            oiliness: 64,
            eyebag: 90,
            acne: 47,
        };
        // 20.25 + 8.25 + 14.4 + 9.6 + 9.0 + 7.05 = 68.55
        assert_eq!(combine_score(&radar), 68);
    }

    #[test]
    fn one_dimension_moves_composite_by_its_weight() {
        let base = uniform(40);
        let mut bumped = base;
        bumped.smoothness += 20;
        // 0.25 * 20 = 5
        assert_eq!(combine_score(&bumped) - combine_score(&base), 5);

        let mut bumped = base;
        bumped.eyebag += 30;
        assert_eq!(combine_score(&bumped) - combine_score(&base), 3);
    }

    #[test]
    fn skin_type_partition_is_total() {
        for oil in 0..=100 {
            for red in 0..=100 {
                let radar = Radar {
                    oiliness: oil,
                    redness: red,
                    ..uniform(50)
                };
                let expected = if oil < 40 {
                    SkinType::Dry
                } else if oil > 70 && red > 60 {
                    SkinType::Oily
                } else {
                    SkinType::Combination
                };
                assert_eq!(skin_type_from(&radar), expected);
            }
        }
    }

    #[test]
    fn skin_type_boundaries() {
        let r = |oiliness, redness| Radar {
            oiliness,
            redness,
            ..uniform(50)
        };
        assert_eq!(skin_type_from(&r(39, 100)), SkinType::Dry);
        assert_eq!(skin_type_from(&r(40, 100)), SkinType::Combination);
        assert_eq!(skin_type_from(&r(71, 61)), SkinType::Oily);
        assert_eq!(skin_type_from(&r(70, 61)), SkinType::Combination);
        assert_eq!(skin_type_from(&r(71, 60)), SkinType::Combination);
    }

    #[test]
    fn summarize_selects_by_threshold() {
        let radar = Radar {
            smoothness: 76,
            redness: 59,
            tone: 50,
            oiliness: 61,
            eyebag: 50,
            acne: 60,
        };
        let v = summarize(&radar, 80);
        assert_eq!(v.highlights, vec!["ผิวเรียบเนียน", "สมดุลความมันดี"]);
        assert_eq!(v.improvements, vec!["ผิวแดงเล็กน้อย"]);
        assert_eq!(v.summary, "ผิวสุขภาพดีมาก ✨");

        let v = summarize(&uniform(60), 79);
        assert!(v.highlights.is_empty());
        assert!(v.improvements.is_empty());
        assert_eq!(v.summary, "ผิวปกติดี 😊");
    }
}
