//! ScoreCalculator: deterministic relevance score of one job for one profile.
//!
//! Score = min(Σ weight × credit, 100) over five independent factors. A factor
//! whose profile or job input is absent contributes 0; the remaining weights are
//! not rebalanced.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::job::{normalize, Job, JobType};
use crate::models::profile::Profile;
use crate::recommendation::specializations::RelatedSpecializations;

pub const MAX_SCORE: f64 = 100.0;

const RELATED_SPECIALIZATION_CREDIT: f64 = 0.6;
const FULLTIME_FOR_PARTTIME_CREDIT: f64 = 0.7;
const PARTTIME_FOR_FULLTIME_CREDIT: f64 = 0.8;
const JOB_TYPE_MISMATCH_CREDIT: f64 = 0.5;
const LOCATION_PARTIAL_CREDIT: f64 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreWeights {
    pub specialization: f64,
    pub job_type: f64,
    pub skills: f64,
    pub location: f64,
    pub recency: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            specialization: 35.0,
            job_type: 25.0,
            skills: 25.0,
            location: 10.0,
            recency: 5.0,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Factor matchers (shared with the reason generator)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum SpecializationMatch<'a> {
    Exact(&'a str),
    Related { job: &'a str, candidate: &'a str },
    None,
}

impl SpecializationMatch<'_> {
    pub fn credit(&self) -> f64 {
        match self {
            SpecializationMatch::Exact(_) => 1.0,
            SpecializationMatch::Related { .. } => RELATED_SPECIALIZATION_CREDIT,
            SpecializationMatch::None => 0.0,
        }
    }
}

pub fn match_specialization<'a>(
    job: &'a Job,
    profile: &'a Profile,
    related: &RelatedSpecializations,
) -> SpecializationMatch<'a> {
    let Some(job_spec) = job.specialization.as_deref() else {
        return SpecializationMatch::None;
    };
    let job_key = normalize(job_spec);
    if job_key.is_empty() || profile.industry_specializations.is_empty() {
        return SpecializationMatch::None;
    }

    if profile
        .industry_specializations
        .iter()
        .any(|s| normalize(s) == job_key)
    {
        return SpecializationMatch::Exact(job_spec);
    }

    match related.related_via(&profile.industry_specializations, job_spec) {
        Some(candidate) => SpecializationMatch::Related {
            job: job_spec,
            candidate,
        },
        None => SpecializationMatch::None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JobTypeMatch {
    Exact(JobType),
    /// Full-time job for a part-time seeker, or the reverse.
    Adjacent { job: JobType, preferred: JobType },
    Mismatch(JobType),
    None,
}

impl JobTypeMatch {
    pub fn credit(&self) -> f64 {
        match self {
            JobTypeMatch::Exact(_) => 1.0,
            JobTypeMatch::Adjacent {
                preferred: JobType::Parttime,
                ..
            } => FULLTIME_FOR_PARTTIME_CREDIT,
            JobTypeMatch::Adjacent { .. } => PARTTIME_FOR_FULLTIME_CREDIT,
            JobTypeMatch::Mismatch(_) => JOB_TYPE_MISMATCH_CREDIT,
            JobTypeMatch::None => 0.0,
        }
    }
}

pub fn match_job_type(job: &Job, profile: &Profile) -> JobTypeMatch {
    let Some(job_type) = job.job_type else {
        return JobTypeMatch::None;
    };
    let preferred = &profile.job_types;
    if preferred.is_empty() {
        return JobTypeMatch::None;
    }

    if preferred.contains(&job_type) {
        JobTypeMatch::Exact(job_type)
    } else if preferred.contains(&JobType::Parttime) && job_type == JobType::Fulltime {
        JobTypeMatch::Adjacent {
            job: job_type,
            preferred: JobType::Parttime,
        }
    } else if preferred.contains(&JobType::Fulltime) && job_type == JobType::Parttime {
        JobTypeMatch::Adjacent {
            job: job_type,
            preferred: JobType::Fulltime,
        }
    } else {
        JobTypeMatch::Mismatch(job_type)
    }
}

/// Candidate skills that overlap any job skill. A pair overlaps when either
/// lowercased string contains the other.
pub fn matching_skills<'a>(job: &Job, profile: &'a Profile) -> Vec<&'a str> {
    let job_skills: Vec<String> = job
        .skills
        .iter()
        .map(|s| normalize(s))
        .filter(|s| !s.is_empty())
        .collect();
    if job_skills.is_empty() {
        return Vec::new();
    }

    profile
        .skills
        .iter()
        .filter(|skill| {
            let candidate = normalize(skill);
            !candidate.is_empty()
                && job_skills
                    .iter()
                    .any(|js| js.contains(&candidate) || candidate.contains(js.as_str()))
        })
        .map(String::as_str)
        .collect()
}

pub fn skills_credit(job: &Job, profile: &Profile) -> f64 {
    if profile.skills.is_empty() {
        return 0.0;
    }
    let matched = matching_skills(job, profile).len();
    matched as f64 / profile.skills.len().max(1) as f64
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationMatch<'a> {
    Remote,
    Exact(&'a str),
    Partial(&'a str),
    None,
}

impl LocationMatch<'_> {
    pub fn credit(&self) -> f64 {
        match self {
            LocationMatch::Remote | LocationMatch::Exact(_) => 1.0,
            LocationMatch::Partial(_) => LOCATION_PARTIAL_CREDIT,
            LocationMatch::None => 0.0,
        }
    }
}

/// Best location match across all preferred locations.
pub fn match_location<'a>(job: &Job, profile: &'a Profile) -> LocationMatch<'a> {
    if job.is_remote {
        return LocationMatch::Remote;
    }
    let job_location = normalize(&job.location);
    if job_location.is_empty() {
        return LocationMatch::None;
    }

    let mut best = LocationMatch::None;
    for preferred in &profile.location_preferences {
        let pref = normalize(preferred);
        if pref.is_empty() {
            continue;
        }
        if pref == job_location {
            return LocationMatch::Exact(preferred);
        }
        if best == LocationMatch::None
            && (job_location.contains(&pref) || pref.contains(&job_location))
        {
            best = LocationMatch::Partial(preferred);
        }
    }
    best
}

/// Whole calendar days between posting and `now`; negative for future-dated postings.
pub fn days_since_posted(job: &Job, now: DateTime<Utc>) -> i64 {
    (now.date_naive() - job.posted_date.date_naive()).num_days()
}

pub fn recency_credit(days_ago: i64) -> f64 {
    match days_ago {
        d if d <= 0 => 1.0,
        1 => 0.8,
        d if d <= 3 => 0.6,
        d if d <= 7 => 0.4,
        _ => 0.0,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Calculator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ScoreCalculator {
    weights: ScoreWeights,
    related: Arc<RelatedSpecializations>,
}

impl ScoreCalculator {
    pub fn new(weights: ScoreWeights, related: Arc<RelatedSpecializations>) -> Self {
        Self { weights, related }
    }

    pub fn related(&self) -> &RelatedSpecializations {
        &self.related
    }

    /// Scores `job` for `profile` as of `now`. Always within `[0, 100]`.
    pub fn score(&self, job: &Job, profile: &Profile, now: DateTime<Utc>) -> f64 {
        let w = &self.weights;
        let total = w.specialization * match_specialization(job, profile, &self.related).credit()
            + w.job_type * match_job_type(job, profile).credit()
            + w.skills * skills_credit(job, profile)
            + w.location * match_location(job, profile).credit()
            + w.recency * recency_credit(days_since_posted(job, now));

        total.clamp(0.0, MAX_SCORE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::fixtures::{job, job_with_spec};
    use chrono::Duration;

    fn calculator() -> ScoreCalculator {
        ScoreCalculator::new(
            ScoreWeights::default(),
            Arc::new(RelatedSpecializations::builtin()),
        )
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_all_factors_full_credit_sum_to_100() {
        let now = Utc::now();
        let mut j = job_with_spec("1", "Backend Engineer", "Acme", "backend");
        j.job_type = Some(JobType::Fulltime);
        j.skills = strings(&["Rust", "PostgreSQL"]);
        j.is_remote = true;
        j.posted_date = now;

        let profile = Profile {
            industry_specializations: strings(&["Backend"]),
            job_types: vec![JobType::Fulltime],
            skills: strings(&["rust", "postgresql"]),
            location_preferences: strings(&["Berlin"]),
            ..Profile::default()
        };

        let score = calculator().score(&j, &profile, now);
        assert!((score - 100.0).abs() < 1e-9, "Score was {score}");
    }

    #[test]
    fn test_exact_spec_remote_today_scores_50() {
        let now = Utc::now();
        let mut j = job_with_spec("1", "Engineer", "Acme", "design");
        j.is_remote = true;
        j.posted_date = now;
        let profile = Profile {
            industry_specializations: strings(&["Design"]),
            ..Profile::default()
        };

        let score = calculator().score(&j, &profile, now);
        assert!((score - 50.0).abs() < 1e-9, "Score was {score}");
    }

    #[test]
    fn test_related_specialization_partial_credit() {
        let j = job_with_spec("1", "Engineer", "Acme", "devops");
        let profile = Profile {
            industry_specializations: strings(&["backend"]),
            ..Profile::default()
        };
        let m = match_specialization(&j, &profile, &RelatedSpecializations::builtin());
        assert_eq!(
            m,
            SpecializationMatch::Related {
                job: "devops",
                candidate: "backend"
            }
        );
        assert!((m.credit() - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_job_type_credits() {
        let mut j = job("1", "Engineer", "Acme");
        let mut profile = Profile {
            job_types: vec![JobType::Parttime],
            ..Profile::default()
        };

        j.job_type = Some(JobType::Fulltime);
        assert!((match_job_type(&j, &profile).credit() - 0.7).abs() < f64::EPSILON);

        profile.job_types = vec![JobType::Fulltime];
        j.job_type = Some(JobType::Parttime);
        assert!((match_job_type(&j, &profile).credit() - 0.8).abs() < f64::EPSILON);

        j.job_type = Some(JobType::Contract);
        assert_eq!(match_job_type(&j, &profile), JobTypeMatch::Mismatch(JobType::Contract));
        assert!((match_job_type(&j, &profile).credit() - 0.5).abs() < f64::EPSILON);

        j.job_type = None;
        assert_eq!(match_job_type(&j, &profile), JobTypeMatch::None);
    }

    #[test]
    fn test_job_type_absent_from_profile_contributes_zero() {
        let mut j = job("1", "Engineer", "Acme");
        j.job_type = Some(JobType::Contract);
        assert_eq!(match_job_type(&j, &Profile::default()).credit(), 0.0);
    }

    #[test]
    fn test_skills_substring_match_either_direction() {
        let mut j = job("1", "Engineer", "Acme");
        j.skills = strings(&["React Native", "go"]);
        let profile = Profile {
            skills: strings(&["react", "golang", "python", "  "]),
            ..Profile::default()
        };
        let matched = matching_skills(&j, &profile);
        assert_eq!(matched, vec!["react", "golang"]);
        // 2 of 4 candidate skills
        assert!((skills_credit(&j, &profile) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_location_takes_best_preference() {
        let mut j = job("1", "Engineer", "Acme");
        j.location = "San Francisco, CA".to_string();
        let profile = Profile {
            location_preferences: strings(&["San Francisco", "san francisco, ca"]),
            ..Profile::default()
        };
        assert_eq!(
            match_location(&j, &profile),
            LocationMatch::Exact("san francisco, ca")
        );

        let partial_only = Profile {
            location_preferences: strings(&["San Francisco"]),
            ..Profile::default()
        };
        assert!((match_location(&j, &partial_only).credit() - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn test_remote_job_full_location_credit_without_preferences() {
        let mut j = job("1", "Engineer", "Acme");
        j.is_remote = true;
        assert_eq!(match_location(&j, &Profile::default()), LocationMatch::Remote);
    }

    #[test]
    fn test_recency_steps() {
        assert_eq!(recency_credit(-2), 1.0);
        assert_eq!(recency_credit(0), 1.0);
        assert_eq!(recency_credit(1), 0.8);
        assert_eq!(recency_credit(3), 0.6);
        assert_eq!(recency_credit(7), 0.4);
        assert_eq!(recency_credit(8), 0.0);
    }

    #[test]
    fn test_days_since_posted_uses_calendar_days() {
        let now = Utc::now();
        let mut j = job("1", "Engineer", "Acme");
        j.posted_date = now - Duration::days(5);
        assert_eq!(days_since_posted(&j, now), 5);
    }

    #[test]
    fn test_empty_inputs_score_zero_when_stale() {
        let now = Utc::now();
        let mut j = job("1", "Engineer", "Acme");
        j.posted_date = now - Duration::days(30);
        assert_eq!(calculator().score(&j, &Profile::default(), now), 0.0);
    }

    #[test]
    fn test_score_capped_with_inflated_weights() {
        let now = Utc::now();
        let calc = ScoreCalculator::new(
            ScoreWeights {
                specialization: 80.0,
                job_type: 80.0,
                skills: 0.0,
                location: 80.0,
                recency: 80.0,
            },
            Arc::new(RelatedSpecializations::builtin()),
        );
        let mut j = job_with_spec("1", "Engineer", "Acme", "backend");
        j.is_remote = true;
        let profile = Profile {
            industry_specializations: strings(&["backend"]),
            ..Profile::default()
        };
        assert_eq!(calc.score(&j, &profile, now), 100.0);
    }
}
