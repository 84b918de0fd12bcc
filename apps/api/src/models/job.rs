use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::profile::RoleLevel;

/// Employment arrangement of a posting. Closed vocabulary shared with `Profile::job_types`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Fulltime,
    Parttime,
    Contract,
    Internship,
    Temporary,
}

impl JobType {
    pub fn label(&self) -> &'static str {
        match self {
            JobType::Fulltime => "full-time",
            JobType::Parttime => "part-time",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
            JobType::Temporary => "temporary",
        }
    }
}

/// A job posting as returned by the upstream pool service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub job_type: Option<JobType>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub is_remote: bool,
    #[serde(default)]
    pub experience_level: Option<RoleLevel>,
    pub posted_date: DateTime<Utc>,
}

impl Job {
    /// Case- and whitespace-normalized `(title, company)` pair used for duplicate detection.
    pub fn dedup_key(&self) -> (String, String) {
        (normalize(&self.title), normalize(&self.company))
    }

    pub fn company_key(&self) -> String {
        normalize(&self.company)
    }

    pub fn specialization_key(&self) -> Option<String> {
        self.specialization
            .as_deref()
            .map(normalize)
            .filter(|s| !s.is_empty())
    }
}

/// A job paired with its relevance score.
///
/// `raw_score` is the ScoreCalculator output; `score` is what the presentation
/// layer displays (equal to `raw_score` until the presentation transform runs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredJob {
    pub job: Job,
    pub score: f64,
    pub raw_score: f64,
}

impl ScoredJob {
    pub fn new(job: Job, raw_score: f64) -> Self {
        Self {
            job,
            score: raw_score,
            raw_score,
        }
    }
}

pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Minimal job posted `now` with no optional attributes set.
    pub fn job(id: &str, title: &str, company: &str) -> Job {
        Job {
            id: id.to_string(),
            title: title.to_string(),
            company: company.to_string(),
            specialization: None,
            job_type: None,
            skills: vec![],
            location: String::new(),
            is_remote: false,
            experience_level: None,
            posted_date: Utc::now(),
        }
    }

    pub fn job_with_spec(id: &str, title: &str, company: &str, spec: &str) -> Job {
        Job {
            specialization: Some(spec.to_string()),
            ..job(id, title, company)
        }
    }
}
