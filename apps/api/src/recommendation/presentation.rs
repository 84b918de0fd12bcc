//! ScorePresenter: display-only inflation of final scores.
//!
//! `presented = min(ceil((raw / 100)^0.6 * 100), 99)`, followed by a stable
//! descending sort on the presented score.

use std::cmp::Ordering;

use crate::models::job::ScoredJob;
use crate::recommendation::scoring::MAX_SCORE;

const INFLATION_EXPONENT: f64 = 0.6;
const PRESENTED_CEILING: f64 = 99.0;

pub fn present_score(raw: f64) -> f64 {
    let fraction = (raw / MAX_SCORE).clamp(0.0, 1.0);
    (fraction.powf(INFLATION_EXPONENT) * 100.0)
        .ceil()
        .min(PRESENTED_CEILING)
}

/// Applies the inflation transform to every entry's raw score, then re-sorts.
pub fn present(mut jobs: Vec<ScoredJob>) -> Vec<ScoredJob> {
    for scored in &mut jobs {
        scored.score = present_score(scored.raw_score);
    }
    // sort_by is stable: ties keep their prior relative order
    jobs.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    jobs
}
