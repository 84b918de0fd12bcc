// Recommendation Engine
// Scores a candidate pool against a profile, curates a diverse fixed-size list,
// and decides when to refetch versus re-rank in place.

pub mod backfill;
pub mod diversity;
pub mod handlers;
pub mod orchestrator;
pub mod pipeline;
pub mod presentation;
pub mod reasons;
pub mod refresh;
pub mod registry;
pub mod scoring;
pub mod specializations;

/// Size and diversity limits for one recommendation set.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationSettings {
    pub target_size: usize,
    pub first_pass_budget: usize,
    pub soft_diversity_slots: usize,
    pub max_per_company: usize,
    /// Populated signal categories required before a pool fetch is attempted.
    pub min_signal_categories: usize,
    pub pool_limit: usize,
    /// Reapply the presentation transform after a rescore-only pass.
    pub rescore_applies_presentation: bool,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            target_size: 20,
            first_pass_budget: 15,
            soft_diversity_slots: 10,
            max_per_company: 2,
            min_signal_categories: 3,
            pool_limit: 200,
            rescore_applies_presentation: true,
        }
    }
}
