//! Ranking pipeline: score → sort → curate → backfill → present.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::models::job::{Job, ScoredJob};
use crate::models::profile::Profile;
use crate::recommendation::backfill::backfill;
use crate::recommendation::diversity::curate;
use crate::recommendation::presentation::present;
use crate::recommendation::scoring::ScoreCalculator;
use crate::recommendation::RecommendationSettings;

/// Scores every job and returns them sorted descending by raw score.
/// Equal scores keep pool order.
pub fn score_and_sort(
    jobs: Vec<Job>,
    profile: &Profile,
    calculator: &ScoreCalculator,
    now: DateTime<Utc>,
) -> Vec<ScoredJob> {
    let mut scored: Vec<ScoredJob> = jobs
        .into_iter()
        .map(|job| {
            let raw = calculator.score(&job, profile, now);
            ScoredJob::new(job, raw)
        })
        .collect();
    sort_by_raw_score(&mut scored);
    scored
}

fn sort_by_raw_score(jobs: &mut [ScoredJob]) {
    jobs.sort_by(|a, b| {
        b.raw_score
            .partial_cmp(&a.raw_score)
            .unwrap_or(Ordering::Equal)
    });
}

/// Drops excluded ids and repeated ids from an upstream pool, keeping first occurrence.
pub fn eligible_pool(jobs: Vec<Job>, profile: &Profile) -> Vec<Job> {
    let mut seen = HashSet::new();
    jobs.into_iter()
        .filter(|job| !profile.excluded_job_ids.contains(&job.id))
        .filter(|job| seen.insert(job.id.clone()))
        .collect()
}

/// Full ranking of a fresh pool into a recommendation set.
pub fn rank_pool(
    pool: Vec<Job>,
    profile: &Profile,
    calculator: &ScoreCalculator,
    settings: &RecommendationSettings,
    now: DateTime<Utc>,
) -> Vec<ScoredJob> {
    let sorted = score_and_sort(eligible_pool(pool, profile), profile, calculator, now);
    let curated = curate(&sorted, settings);
    let filled = backfill(curated, &sorted, settings.target_size);
    present(filled)
}

/// Re-scores an existing set in place of a refetch. Membership never changes.
pub fn rescore(
    current: &[ScoredJob],
    profile: &Profile,
    calculator: &ScoreCalculator,
    settings: &RecommendationSettings,
    now: DateTime<Utc>,
) -> Vec<ScoredJob> {
    let jobs = current.iter().map(|s| s.job.clone()).collect();
    let sorted = score_and_sort(jobs, profile, calculator, now);
    if settings.rescore_applies_presentation {
        present(sorted)
    } else {
        sorted
    }
}
