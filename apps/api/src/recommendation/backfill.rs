//! Backfiller: tops a curated list up to the target size.
//!
//! Only the `(title, company)` duplicate rule is enforced here. Company caps and
//! specialization diversity are deliberately not re-checked, so a thin pool may
//! end up with more than `max_per_company` entries from one employer.

use std::collections::HashSet;

use crate::models::job::ScoredJob;

pub fn backfill(curated: Vec<ScoredJob>, sorted: &[ScoredJob], target_size: usize) -> Vec<ScoredJob> {
    let mut result = curated;
    if result.len() < target_size {
        let mut used_ids: HashSet<String> = result.iter().map(|s| s.job.id.clone()).collect();
        let mut seen_pairs: HashSet<(String, String)> =
            result.iter().map(|s| s.job.dedup_key()).collect();

        for candidate in sorted {
            if result.len() >= target_size {
                break;
            }
            if used_ids.contains(&candidate.job.id) {
                continue;
            }
            if !seen_pairs.insert(candidate.job.dedup_key()) {
                continue;
            }
            used_ids.insert(candidate.job.id.clone());
            result.push(candidate.clone());
        }
    }

    result.truncate(target_size);
    result
}
