//! DiversityCurator: single greedy pass over score-sorted candidates.
//!
//! Constraints, checked per candidate in order:
//! 1. at most `max_per_company` entries from one company
//! 2. no repeated normalized `(title, company)` pair
//! 3. while fewer than `soft_diversity_slots` entries are selected, no repeated specialization
//!
//! No backtracking; the result is a greedy approximation, not an optimum.

use std::collections::{HashMap, HashSet};

use crate::models::job::ScoredJob;
use crate::recommendation::RecommendationSettings;

/// Why a candidate was passed over during curation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    CompanyCap,
    Duplicate,
    SpecializationRepeat,
}

/// Curates `sorted` (descending by raw score) into at most `first_pass_budget` entries.
pub fn curate(sorted: &[ScoredJob], settings: &RecommendationSettings) -> Vec<ScoredJob> {
    let mut selected: Vec<ScoredJob> = Vec::with_capacity(settings.first_pass_budget);
    let mut company_counts: HashMap<String, usize> = HashMap::new();
    let mut seen_pairs: HashSet<(String, String)> = HashSet::new();
    let mut seen_specializations: HashSet<String> = HashSet::new();

    for candidate in sorted {
        if selected.len() >= settings.first_pass_budget {
            break;
        }

        let company = candidate.job.company_key();
        let pair = candidate.job.dedup_key();
        let specialization = candidate.job.specialization_key();

        let skip = if company_counts.get(&company).copied().unwrap_or(0) >= settings.max_per_company
        {
            Some(SkipReason::CompanyCap)
        } else if seen_pairs.contains(&pair) {
            Some(SkipReason::Duplicate)
        } else if selected.len() < settings.soft_diversity_slots
            && specialization
                .as_ref()
                .is_some_and(|s| seen_specializations.contains(s))
        {
            Some(SkipReason::SpecializationRepeat)
        } else {
            None
        };

        if let Some(reason) = skip {
            tracing::trace!("Curation skipped job {} ({:?})", candidate.job.id, reason);
            continue;
        }

        *company_counts.entry(company).or_insert(0) += 1;
        seen_pairs.insert(pair);
        if let Some(spec) = specialization {
            seen_specializations.insert(spec);
        }
        selected.push(candidate.clone());
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::fixtures::{job, job_with_spec};

    fn scored(j: crate::models::job::Job, score: f64) -> ScoredJob {
        ScoredJob::new(j, score)
    }

    #[test]
    fn test_company_cap_of_two() {
        let sorted: Vec<_> = (0..5)
            .map(|i| scored(job(&i.to_string(), &format!("Role {i}"), "Acme"), 90.0 - i as f64))
            .collect();
        let result = curate(&sorted, &RecommendationSettings::default());
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].job.id, "0");
        assert_eq!(result[1].job.id, "1");
    }

    #[test]
    fn test_company_cap_is_case_insensitive() {
        let sorted = vec![
            scored(job("1", "A", "Acme"), 90.0),
            scored(job("2", "B", "ACME "), 80.0),
            scored(job("3", "C", "acme"), 70.0),
        ];
        assert_eq!(curate(&sorted, &RecommendationSettings::default()).len(), 2);
    }

    #[test]
    fn test_duplicate_title_company_skipped() {
        let sorted = vec![
            scored(job("1", "Backend Engineer", "Acme"), 90.0),
            scored(job("2", " backend engineer", "acme"), 85.0),
            scored(job("3", "Backend Engineer", "Globex"), 80.0),
        ];
        let result = curate(&sorted, &RecommendationSettings::default());
        let ids: Vec<_> = result.iter().map(|s| s.job.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_specialization_diversity_only_in_first_slots() {
        let settings = RecommendationSettings {
            soft_diversity_slots: 2,
            ..RecommendationSettings::default()
        };
        let sorted = vec![
            scored(job_with_spec("1", "A", "C1", "backend"), 99.0),
            scored(job_with_spec("2", "B", "C2", "backend"), 98.0),
            scored(job_with_spec("3", "C", "C3", "design"), 97.0),
            scored(job_with_spec("4", "D", "C4", "backend"), 96.0),
        ];
        let result = curate(&sorted, &settings);
        let ids: Vec<_> = result.iter().map(|s| s.job.id.as_str()).collect();
        // "2" skipped while under 2 slots; "4" admitted once 2 slots are filled
        assert_eq!(ids, vec!["1", "3", "4"]);
    }

    #[test]
    fn test_jobs_without_specialization_not_constrained() {
        let sorted: Vec<_> = (0..4)
            .map(|i| scored(job(&i.to_string(), "Role", &format!("C{i}")), 50.0))
            .collect();
        assert_eq!(curate(&sorted, &RecommendationSettings::default()).len(), 4);
    }

    #[test]
    fn test_budget_limits_output() {
        let sorted: Vec<_> = (0..40)
            .map(|i| scored(job(&i.to_string(), "Role", &format!("C{i}")), 50.0))
            .collect();
        let settings = RecommendationSettings::default();
        assert_eq!(curate(&sorted, &settings).len(), settings.first_pass_budget);
    }

    #[test]
    fn test_empty_input() {
        assert!(curate(&[], &RecommendationSettings::default()).is_empty());
    }
}
