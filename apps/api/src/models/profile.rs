use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::job::JobType;

/// Seniority ladder, ordered from most junior to most senior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleLevel {
    Internship,
    Entry,
    Associate,
    MidSenior,
    Director,
    Executive,
}

impl RoleLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RoleLevel::Internship => "internship",
            RoleLevel::Entry => "entry-level",
            RoleLevel::Associate => "associate",
            RoleLevel::MidSenior => "mid-senior",
            RoleLevel::Director => "director",
            RoleLevel::Executive => "executive",
        }
    }

    /// Number of rungs between two levels on the ladder.
    pub fn distance(&self, other: &RoleLevel) -> u8 {
        (*self as u8).abs_diff(*other as u8)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryExpectation {
    pub min: u32,
    #[serde(default)]
    pub max: Option<u32>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Candidate signal set. Every field is independent and may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub role_level: Option<RoleLevel>,
    #[serde(default)]
    pub industry_specializations: Vec<String>,
    #[serde(default)]
    pub job_types: Vec<JobType>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub location_preferences: Vec<String>,
    #[serde(default)]
    pub sponsorship_required: bool,
    #[serde(default)]
    pub salary_expectation: Option<SalaryExpectation>,
    /// Jobs already liked, disliked or applied to.
    #[serde(default)]
    pub excluded_job_ids: HashSet<String>,
}

impl Profile {
    /// Counts populated signal categories: role level, specializations,
    /// job types, skills, location preferences.
    pub fn signal_categories(&self) -> usize {
        [
            self.role_level.is_some(),
            !self.industry_specializations.is_empty(),
            !self.job_types.is_empty(),
            !self.skills.is_empty(),
            !self.location_preferences.is_empty(),
        ]
        .into_iter()
        .filter(|populated| *populated)
        .count()
    }
}
