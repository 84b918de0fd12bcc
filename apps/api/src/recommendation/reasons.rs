//! ReasonGenerator: short, human-readable justifications for a recommended job.
//!
//! Candidate reasons are evaluated in a fixed priority order (experience level,
//! specialization, job type, skills, location, recency) and the first three that
//! apply are returned. Missing profile or job fields simply skip a reason.

use chrono::{DateTime, Utc};

use crate::models::job::Job;
use crate::models::profile::Profile;
use crate::recommendation::scoring::{
    days_since_posted, match_job_type, match_location, match_specialization, matching_skills,
    JobTypeMatch, LocationMatch, SpecializationMatch,
};
use crate::recommendation::specializations::RelatedSpecializations;

pub const MAX_REASONS: usize = 3;

/// Skill names listed verbatim in the skills reason.
const LISTED_SKILLS: usize = 3;

pub fn explain(
    job: &Job,
    profile: &Profile,
    related: &RelatedSpecializations,
    now: DateTime<Utc>,
) -> Vec<String> {
    [
        experience_reason(job, profile),
        specialization_reason(job, profile, related),
        job_type_reason(job, profile),
        skills_reason(job, profile),
        location_reason(job, profile),
        recency_reason(job, now),
    ]
    .into_iter()
    .flatten()
    .filter(|reason| !reason.is_empty())
    .take(MAX_REASONS)
    .collect()
}

fn experience_reason(job: &Job, profile: &Profile) -> Option<String> {
    let (wanted, offered) = (profile.role_level?, job.experience_level?);
    match wanted.distance(&offered) {
        0 => Some(format!(
            "Perfect match for your {} experience level",
            wanted.label()
        )),
        1 if offered > wanted => Some(format!(
            "A step up from {} to {}, a natural next move",
            wanted.label(),
            offered.label()
        )),
        1 => Some(format!(
            "Adjacent to your {} experience level",
            wanted.label()
        )),
        _ => None,
    }
}

fn specialization_reason(
    job: &Job,
    profile: &Profile,
    related: &RelatedSpecializations,
) -> Option<String> {
    match match_specialization(job, profile, related) {
        SpecializationMatch::Exact(spec) => {
            Some(format!("Perfect match for your {spec} specialization"))
        }
        SpecializationMatch::Related { job, candidate } => Some(format!(
            "{job} is closely related to your {candidate} specialization"
        )),
        SpecializationMatch::None => None,
    }
}

fn job_type_reason(job: &Job, profile: &Profile) -> Option<String> {
    match match_job_type(job, profile) {
        JobTypeMatch::Exact(t) => Some(format!("Matches your preference for {} work", t.label())),
        JobTypeMatch::Adjacent { job, preferred } => Some(format!(
            "A {} role, close to your {} preference",
            job.label(),
            preferred.label()
        )),
        JobTypeMatch::Mismatch(_) | JobTypeMatch::None => None,
    }
}

fn skills_reason(job: &Job, profile: &Profile) -> Option<String> {
    let matched = matching_skills(job, profile);
    match matched.len() {
        0 => None,
        n if n == profile.skills.len() && n > 1 => Some(format!(
            "Uses all {n} of your listed skills: {}",
            join_limited(&matched)
        )),
        1 => Some(format!("Uses your {} skills", matched[0])),
        n => Some(format!(
            "Uses {n} of your skills: {}",
            join_limited(&matched)
        )),
    }
}

fn join_limited(skills: &[&str]) -> String {
    let mut listed = skills
        .iter()
        .take(LISTED_SKILLS)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    if skills.len() > LISTED_SKILLS {
        listed.push_str(&format!(" and {} more", skills.len() - LISTED_SKILLS));
    }
    listed
}

fn location_reason(job: &Job, profile: &Profile) -> Option<String> {
    match match_location(job, profile) {
        LocationMatch::Remote => Some("Remote position, work from anywhere".to_string()),
        LocationMatch::Exact(loc) => Some(format!("Located in {loc}, one of your preferred locations")),
        LocationMatch::Partial(loc) => Some(format!("Located near your preferred location {loc}")),
        LocationMatch::None => None,
    }
}

fn recency_reason(job: &Job, now: DateTime<Utc>) -> Option<String> {
    match days_since_posted(job, now) {
        d if d <= 0 => Some("Posted today".to_string()),
        1 => Some("Posted yesterday".to_string()),
        d if d <= 3 => Some(format!("Posted {d} days ago")),
        d if d <= 7 => Some("Posted this week".to_string()),
        _ => None,
    }
}
