//! One `RefreshOrchestrator` per candidate, created on first use.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::pool_client::JobPoolSource;
use crate::recommendation::orchestrator::RefreshOrchestrator;
use crate::recommendation::scoring::ScoreCalculator;
use crate::recommendation::RecommendationSettings;

pub struct RecommendationRegistry {
    source: Arc<dyn JobPoolSource>,
    calculator: ScoreCalculator,
    settings: RecommendationSettings,
    orchestrators: RwLock<HashMap<Uuid, Arc<RefreshOrchestrator>>>,
}

impl RecommendationRegistry {
    pub fn new(
        source: Arc<dyn JobPoolSource>,
        calculator: ScoreCalculator,
        settings: RecommendationSettings,
    ) -> Self {
        Self {
            source,
            calculator,
            settings,
            orchestrators: RwLock::new(HashMap::new()),
        }
    }

    /// Existing orchestrator for `user_id`, if any.
    pub async fn get(&self, user_id: Uuid) -> Option<Arc<RefreshOrchestrator>> {
        self.orchestrators.read().await.get(&user_id).cloned()
    }

    pub async fn get_or_create(&self, user_id: Uuid) -> Arc<RefreshOrchestrator> {
        if let Some(existing) = self.get(user_id).await {
            return existing;
        }

        let mut orchestrators = self.orchestrators.write().await;
        let active = orchestrators.len();
        orchestrators
            .entry(user_id)
            .or_insert_with(|| {
                info!("Creating recommendation orchestrator for user {user_id} ({active} active)");
                Arc::new(RefreshOrchestrator::new(
                    user_id,
                    Arc::clone(&self.source),
                    self.calculator.clone(),
                    self.settings.clone(),
                ))
            })
            .clone()
    }

    /// Forgets the orchestrator for `user_id`. A run still in flight finishes
    /// against its own handle and is then dropped. Returns whether one existed.
    pub async fn remove(&self, user_id: Uuid) -> bool {
        let mut orchestrators = self.orchestrators.write().await;
        let removed = orchestrators.remove(&user_id).is_some();
        if removed {
            info!(
                "Dropped recommendation orchestrator for user {user_id} ({} active)",
                orchestrators.len()
            );
        }
        removed
    }
}
