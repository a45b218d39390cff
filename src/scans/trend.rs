//! Score history smoothing and windowed summaries.

use serde::Serialize;
use time::{Duration, OffsetDateTime};

use super::repo_types::Scan;
use crate::analysis::scorers::Dimension;

pub const DEFAULT_ALPHA: f64 = 0.4;

/// Exponential moving average; `out[0] = series[0]`.
pub fn ema(series: &[f64], alpha: f64) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::with_capacity(series.len());
    for &x in series {
        let next = match out.last() {
            Some(prev) => alpha * x + (1.0 - alpha) * prev,
            None => x,
        };
        out.push(next);
    }
    out
}

/// Trend window, `7d | 15d | 30d` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week,
    HalfMonth,
    Month,
}

impl Period {
    /// Unknown labels fall back to seven days.
    pub fn parse(label: Option<&str>) -> Self {
        match label {
            Some("15d") => Period::HalfMonth,
            Some("30d") => Period::Month,
            _ => Period::Week,
        }
    }

    pub fn days(self) -> i64 {
        match self {
            Period::Week => 7,
            Period::HalfMonth => 15,
            Period::Month => 30,
        }
    }

    pub fn since(self, now: OffsetDateTime) -> OffsetDateTime {
        now - Duration::days(self.days())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSummary {
    pub avg: i32,
    pub delta: i32,
    pub best_dimension: Option<Dimension>,
    pub count: usize,
    pub smoothed: Vec<f64>,
}

/// Summary over scans ordered oldest first.
pub fn summarize_window(rows: &[Scan]) -> TrendSummary {
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return TrendSummary {
            avg: 0,
            delta: 0,
            best_dimension: None,
            count: 0,
            smoothed: Vec::new(),
        };
    };

    let n = rows.len() as i64;
    let scores: Vec<f64> = rows.iter().map(|r| r.score_total as f64).collect();
    let avg = (rows.iter().map(|r| r.score_total as i64).sum::<i64>() / n) as i32;

    let mut best: Option<(Dimension, f64)> = None;
    for dim in Dimension::ALL {
        let mean = rows.iter().map(|r| r.radar().get(dim) as f64).sum::<f64>() / n as f64;
        if best.map_or(true, |(_, m)| mean > m) {
            best = Some((dim, mean));
        }
    }

    TrendSummary {
        avg,
        delta: last.score_total - first.score_total,
        best_dimension: best.map(|(d, _)| d),
        count: rows.len(),
        smoothed: ema(&scores, DEFAULT_ALPHA),
    }
}
