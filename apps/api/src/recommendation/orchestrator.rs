//! RefreshOrchestrator: owns one candidate's published recommendation set.
//!
//! At most one run (full refresh or rescore) is active at a time. A manual
//! refresh that arrives while a run is in flight is dropped; a profile change
//! is stored immediately and its refresh deferred until the in-flight run ends.
//! Every run and every accepted profile snapshot advances a monotonically
//! increasing token, and a run only publishes if its token is still the latest.
//! The published set is an `Arc<Vec<ScoredJob>>` replaced by whole-value
//! assignment.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::job::ScoredJob;
use crate::models::profile::Profile;
use crate::pool_client::{JobPoolSource, PoolError, PoolQuery};
use crate::recommendation::pipeline::{rank_pool, rescore};
use crate::recommendation::refresh::{classify_change, RefreshKind};
use crate::recommendation::scoring::ScoreCalculator;
use crate::recommendation::RecommendationSettings;

/// Result of a trigger, reported back to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RefreshOutcome {
    Published { count: usize },
    Rescored { count: usize },
    /// Fewer signal categories than required; an empty set was published without a fetch.
    InsufficientProfile,
    AlreadyRunning,
    /// A newer profile snapshot arrived while this run was in flight; its result was discarded.
    Superseded,
    Unchanged,
    NoProfile,
    Removed,
    NotPresent,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationSnapshot {
    pub recommendations: Vec<ScoredJob>,
    pub is_loading: bool,
    pub has_fetched_once: bool,
}

#[derive(Debug, Default)]
struct OrchestratorState {
    profile: Option<Profile>,
    recommendations: Arc<Vec<ScoredJob>>,
    has_fetched_once: bool,
    /// Profile change accepted while a run was in flight; picked up when that run ends.
    pending: Option<RefreshKind>,
    /// Jobs removed while a run was in flight; filtered out of that run's result.
    removed_in_flight: HashSet<String>,
}

/// Clears the loading flag if a run is cancelled or panics before releasing it normally.
struct LoadingGuard<'a> {
    flag: &'a AtomicBool,
    armed: bool,
}

impl<'a> LoadingGuard<'a> {
    fn new(flag: &'a AtomicBool) -> Self {
        Self { flag, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.flag.store(false, Ordering::Release);
        }
    }
}

fn merge_pending(pending: Option<RefreshKind>, next: RefreshKind) -> RefreshKind {
    match (pending, next) {
        (Some(RefreshKind::Full), _) | (_, RefreshKind::Full) => RefreshKind::Full,
        _ => next,
    }
}

pub struct RefreshOrchestrator {
    user_id: Uuid,
    source: Arc<dyn JobPoolSource>,
    calculator: ScoreCalculator,
    settings: RecommendationSettings,
    state: RwLock<OrchestratorState>,
    /// Read lock-free by `is_loading`; set and cleared while holding the `state` write lock.
    loading: AtomicBool,
    latest_token: AtomicU64,
}

impl RefreshOrchestrator {
    pub fn new(
        user_id: Uuid,
        source: Arc<dyn JobPoolSource>,
        calculator: ScoreCalculator,
        settings: RecommendationSettings,
    ) -> Self {
        Self {
            user_id,
            source,
            calculator,
            settings,
            state: RwLock::new(OrchestratorState::default()),
            loading: AtomicBool::new(false),
            latest_token: AtomicU64::new(0),
        }
    }

    pub fn calculator(&self) -> &ScoreCalculator {
        &self.calculator
    }

    // ────────────────────────────────────────────────────────────────────────
    // Read side
    // ────────────────────────────────────────────────────────────────────────

    pub async fn recommendations(&self) -> Arc<Vec<ScoredJob>> {
        Arc::clone(&self.state.read().await.recommendations)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub async fn has_fetched_once(&self) -> bool {
        self.state.read().await.has_fetched_once
    }

    pub async fn profile(&self) -> Option<Profile> {
        self.state.read().await.profile.clone()
    }

    pub async fn snapshot(&self) -> RecommendationSnapshot {
        let state = self.state.read().await;
        RecommendationSnapshot {
            recommendations: state.recommendations.as_ref().clone(),
            is_loading: self.is_loading(),
            has_fetched_once: state.has_fetched_once,
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Triggers
    // ────────────────────────────────────────────────────────────────────────

    /// Stores a new profile snapshot and runs whatever refresh the change calls for.
    ///
    /// A rescore-class change on an empty set escalates to a full refresh. If a
    /// run is already in flight the change is recorded as pending and computed
    /// as soon as that run finishes; this call then returns `AlreadyRunning`.
    pub async fn update_profile(&self, profile: Profile) -> Result<RefreshOutcome, PoolError> {
        let kind = {
            let mut state = self.state.write().await;
            let kind = match classify_change(state.profile.as_ref(), &profile) {
                RefreshKind::None => return Ok(RefreshOutcome::Unchanged),
                RefreshKind::Rescore if !state.recommendations.is_empty() => RefreshKind::Rescore,
                _ => RefreshKind::Full,
            };
            state.profile = Some(profile);
            // Invalidate any run started against the previous snapshot
            self.latest_token.fetch_add(1, Ordering::AcqRel);

            if self.is_loading() {
                let merged = merge_pending(state.pending, kind);
                state.pending = Some(merged);
                debug!(
                    "Deferring {:?} refresh for user {} until the in-flight run ends",
                    merged, self.user_id
                );
                return Ok(RefreshOutcome::AlreadyRunning);
            }
            self.loading.store(true, Ordering::Release);
            kind
        };

        self.drive(kind).await
    }

    /// Full refresh against the stored profile. Dropped with `AlreadyRunning` if a run is in flight.
    pub async fn trigger_refresh(&self) -> Result<RefreshOutcome, PoolError> {
        {
            let _state = self.state.write().await;
            if self.is_loading() {
                debug!(
                    "Dropping refresh trigger for user {}: run already in flight",
                    self.user_id
                );
                return Ok(RefreshOutcome::AlreadyRunning);
            }
            self.loading.store(true, Ordering::Release);
        }

        self.drive(RefreshKind::Full).await
    }

    /// Removes one entry by job id without re-running the pipeline. Idempotent.
    ///
    /// A removal during an in-flight run also applies to that run's result.
    pub async fn remove_recommendation(&self, job_id: &str) -> RefreshOutcome {
        let mut state = self.state.write().await;
        if self.is_loading() {
            state.removed_in_flight.insert(job_id.to_string());
        }
        if !state.recommendations.iter().any(|s| s.job.id == job_id) {
            return RefreshOutcome::NotPresent;
        }
        let remaining: Vec<ScoredJob> = state
            .recommendations
            .iter()
            .filter(|s| s.job.id != job_id)
            .cloned()
            .collect();
        state.recommendations = Arc::new(remaining);
        debug!("Removed job {job_id} from recommendations for user {}", self.user_id);
        RefreshOutcome::Removed
    }

    // ────────────────────────────────────────────────────────────────────────
    // Runs
    // ────────────────────────────────────────────────────────────────────────

    /// Runs `kind`, then any refresh deferred while it was in flight. The caller
    /// must have set `loading`; it is released here under the state lock, so a
    /// deferral can never slip in after the last pending check.
    async fn drive(&self, kind: RefreshKind) -> Result<RefreshOutcome, PoolError> {
        let mut guard = LoadingGuard::new(&self.loading);
        let mut kind = kind;

        loop {
            let outcome = self.run_once(kind).await;

            let mut state = self.state.write().await;
            match state.pending.take() {
                Some(next) => {
                    info!(
                        "Running deferred {:?} refresh for user {}",
                        next, self.user_id
                    );
                    kind = next;
                }
                None => {
                    state.removed_in_flight.clear();
                    self.loading.store(false, Ordering::Release);
                    guard.disarm();
                    return outcome;
                }
            }
        }
    }

    async fn run_once(&self, kind: RefreshKind) -> Result<RefreshOutcome, PoolError> {
        let token = self.latest_token.fetch_add(1, Ordering::AcqRel) + 1;

        let (profile, current) = {
            let state = self.state.read().await;
            (state.profile.clone(), Arc::clone(&state.recommendations))
        };
        let Some(profile) = profile else {
            return Ok(RefreshOutcome::NoProfile);
        };

        info!(
            "Starting {:?} recommendation run for user {} (token {token})",
            kind, self.user_id
        );

        match kind {
            RefreshKind::Rescore if !current.is_empty() => {
                let rescored = rescore(
                    &current,
                    &profile,
                    &self.calculator,
                    &self.settings,
                    Utc::now(),
                );
                let count = rescored.len();
                if self.publish(token, rescored).await {
                    Ok(RefreshOutcome::Rescored { count })
                } else {
                    Ok(RefreshOutcome::Superseded)
                }
            }
            _ => self.full_refresh(token, &profile).await,
        }
    }

    async fn full_refresh(&self, token: u64, profile: &Profile) -> Result<RefreshOutcome, PoolError> {
        let signals = profile.signal_categories();
        if signals < self.settings.min_signal_categories {
            info!(
                "Skipping pool fetch for user {}: {signals}/{} signal categories populated",
                self.user_id, self.settings.min_signal_categories
            );
            if self.publish(token, Vec::new()).await {
                return Ok(RefreshOutcome::InsufficientProfile);
            }
            return Ok(RefreshOutcome::Superseded);
        }

        let query = PoolQuery::from_profile(profile, self.settings.pool_limit);
        let pool = match self.source.fetch_candidate_pool(&query).await {
            Ok(pool) => pool,
            Err(e) => {
                warn!(
                    "Candidate pool fetch failed for user {}: {e}. Keeping previous recommendations.",
                    self.user_id
                );
                return Err(e);
            }
        };

        if !self.is_current(token) {
            info!("Discarding superseded pool for user {} (token {token})", self.user_id);
            return Ok(RefreshOutcome::Superseded);
        }

        let pool_size = pool.len();
        let ranked = rank_pool(pool, profile, &self.calculator, &self.settings, Utc::now());
        info!(
            "Ranked {pool_size} candidates into {} recommendations for user {}",
            ranked.len(),
            self.user_id
        );

        match self.publish(token, ranked).await {
            true => Ok(RefreshOutcome::Published {
                count: self.state.read().await.recommendations.len(),
            }),
            false => Ok(RefreshOutcome::Superseded),
        }
    }

    fn is_current(&self, token: u64) -> bool {
        self.latest_token.load(Ordering::Acquire) == token
    }

    /// Replaces the published set if `token` is still the latest. Returns whether it published.
    async fn publish(&self, token: u64, recommendations: Vec<ScoredJob>) -> bool {
        let mut state = self.state.write().await;
        if !self.is_current(token) {
            info!("Discarding superseded result for user {} (token {token})", self.user_id);
            return false;
        }
        let recommendations = if state.removed_in_flight.is_empty() {
            recommendations
        } else {
            recommendations
                .into_iter()
                .filter(|s| !state.removed_in_flight.contains(&s.job.id))
                .collect()
        };
        state.recommendations = Arc::new(recommendations);
        state.has_fetched_once = true;
        true
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::models::job::Job;

    /// Fake pool: counts calls, optionally fails, optionally waits on a gate before returning.
    pub struct FakeSource {
        pub jobs: Vec<Job>,
        pub calls: AtomicUsize,
        pub fail: AtomicBool,
        pub gate: Option<Arc<Notify>>,
    }

    impl FakeSource {
        pub fn new(jobs: Vec<Job>) -> Self {
            Self {
                jobs,
                calls: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
                gate: None,
            }
        }

        pub fn gated(jobs: Vec<Job>, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::new(jobs)
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JobPoolSource for FakeSource {
        async fn fetch_candidate_pool(&self, _query: &PoolQuery) -> Result<Vec<Job>, PoolError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(PoolError::Api {
                    status: 503,
                    message: "pool unavailable".to_string(),
                });
            }
            Ok(self.jobs.clone())
        }
    }

    pub fn pool(n: usize) -> Vec<Job> {
        (0..n)
            .map(|i| {
                let mut job = crate::models::job::fixtures::job(
                    &format!("job-{i}"),
                    &format!("Role {i}"),
                    &format!("Company {}", i % 12),
                );
                job.specialization = Some(["backend", "design", "data science"][i % 3].to_string());
                job
            })
            .collect()
    }

    pub fn complete_profile() -> Profile {
        Profile {
            role_level: Some(crate::models::profile::RoleLevel::Associate),
            industry_specializations: vec!["backend".to_string()],
            job_types: vec![crate::models::job::JobType::Fulltime],
            skills: vec!["rust".to_string()],
            location_preferences: vec!["Berlin".to_string()],
            ..Profile::default()
        }
    }
}
