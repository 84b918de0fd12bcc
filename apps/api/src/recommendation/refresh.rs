//! Profile change classification: which profile edits need a fresh pool and
//! which only need the existing set re-ranked.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::job::normalize;
use crate::models::profile::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshKind {
    /// Fetch a new candidate pool and run the whole pipeline.
    Full,
    /// Re-score the jobs already published.
    Rescore,
    None,
}

pub fn classify_change(previous: Option<&Profile>, next: &Profile) -> RefreshKind {
    let Some(previous) = previous else {
        return RefreshKind::Full;
    };

    if previous.role_level != next.role_level
        || previous.sponsorship_required != next.sponsorship_required
        || normalized_set(&previous.industry_specializations)
            != normalized_set(&next.industry_specializations)
        || previous.excluded_job_ids.len() != next.excluded_job_ids.len()
    {
        return RefreshKind::Full;
    }

    if previous.job_types.iter().collect::<HashSet<_>>()
        != next.job_types.iter().collect::<HashSet<_>>()
        || normalized_set(&previous.skills) != normalized_set(&next.skills)
        || normalized_set(&previous.location_preferences)
            != normalized_set(&next.location_preferences)
        || previous.salary_expectation != next.salary_expectation
    {
        return RefreshKind::Rescore;
    }

    RefreshKind::None
}

fn normalized_set(values: &[String]) -> HashSet<String> {
    values
        .iter()
        .map(|v| normalize(v))
        .filter(|v| !v.is_empty())
        .collect()
}
