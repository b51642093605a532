use serde::Serialize;

use super::stats::{mean, round2};

/// Percentage change above which a series counts as improving (and below the negation, declining).
const TREND_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Trend {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TrendSummary {
    pub(crate) trend: Trend,
    /// `None` when the first half averages zero and the ratio is undefined.
    pub(crate) percentage: Option<f64>,
}

impl TrendSummary {
    const FLAT: Self = Self { trend: Trend::Stable, percentage: Some(0.0) };
}

/// Compares the mean of the later half of a chronological series with the earlier half.
///
/// The split point is `floor(n / 2)`, so an odd-length series puts the extra
/// score in the second half.
pub(crate) fn classify(scores: &[f64]) -> TrendSummary {
    if scores.len() < 2 {
        return TrendSummary::FLAT;
    }

    let (first, second) = scores.split_at(scores.len() / 2);
    let (Some(first_mean), Some(second_mean)) = (mean(first), mean(second)) else {
        return TrendSummary::FLAT;
    };

    if first_mean == 0.0 {
        let trend = if second_mean > first_mean {
            Trend::Improving
        } else if second_mean < first_mean {
            Trend::Declining
        } else {
            return TrendSummary::FLAT;
        };
        return TrendSummary { trend, percentage: None };
    }

    let percentage = round2((second_mean - first_mean) / first_mean * 100.0);
    let trend = if percentage > TREND_THRESHOLD {
        Trend::Improving
    } else if percentage < -TREND_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    };

    TrendSummary { trend, percentage: Some(percentage) }
}
