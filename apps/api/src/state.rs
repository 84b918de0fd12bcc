use std::sync::Arc;

use crate::config::Config;
use crate::pool_client::JobPoolSource;
use crate::recommendation::registry::RecommendationRegistry;
use crate::recommendation::scoring::{ScoreCalculator, ScoreWeights};
use crate::recommendation::specializations::RelatedSpecializations;
use crate::recommendation::RecommendationSettings;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Per-user recommendation orchestrators, all sharing one pool source.
    pub recommendations: Arc<RecommendationRegistry>,
}

impl AppState {
    pub fn new(
        config: &Config,
        source: Arc<dyn JobPoolSource>,
        related: Arc<RelatedSpecializations>,
    ) -> Self {
        let settings = RecommendationSettings {
            pool_limit: config.job_pool_limit,
            rescore_applies_presentation: config.rescore_applies_presentation,
            ..RecommendationSettings::default()
        };
        let calculator = ScoreCalculator::new(ScoreWeights::default(), related);

        Self {
            recommendations: Arc::new(RecommendationRegistry::new(source, calculator, settings)),
        }
    }
}
