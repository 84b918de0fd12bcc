//! Job pool client: the single point of entry for upstream candidate-pool queries.
//!
//! The orchestrator only sees the `JobPoolSource` trait; `HttpJobPoolClient` is
//! the production backend. There is no retry at this layer: a failed fetch
//! surfaces as `PoolError` and the caller keeps its last good result.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::job::Job;
use crate::models::profile::{Profile, RoleLevel};

const SEARCH_PATH: &str = "/jobs/search";

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Job pool API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Signals sent upstream for a candidate-pool query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolQuery {
    pub role_level: Option<RoleLevel>,
    pub specializations: Vec<String>,
    pub sponsorship_required: bool,
    pub excluded_job_ids: Vec<String>,
    pub limit: usize,
}

impl PoolQuery {
    pub fn from_profile(profile: &Profile, limit: usize) -> Self {
        let mut excluded_job_ids: Vec<String> = profile.excluded_job_ids.iter().cloned().collect();
        excluded_job_ids.sort();
        Self {
            role_level: profile.role_level,
            specializations: profile.industry_specializations.clone(),
            sponsorship_required: profile.sponsorship_required,
            excluded_job_ids,
            limit,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PoolResponse {
    jobs: Vec<Job>,
}

#[derive(Debug, Deserialize)]
struct PoolApiError {
    error: PoolApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct PoolApiErrorBody {
    message: String,
}

/// Upstream supplier of candidate jobs. Held as `Arc<dyn JobPoolSource>`.
#[async_trait]
pub trait JobPoolSource: Send + Sync {
    /// Returns an unordered job list for `query`.
    async fn fetch_candidate_pool(&self, query: &PoolQuery) -> Result<Vec<Job>, PoolError>;
}

/// reqwest-backed client for the job-pool query service.
#[derive(Clone)]
pub struct HttpJobPoolClient {
    client: Client,
    base_url: String,
}

impl HttpJobPoolClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PoolError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}{}", self.base_url, SEARCH_PATH)
    }
}

#[async_trait]
impl JobPoolSource for HttpJobPoolClient {
    async fn fetch_candidate_pool(&self, query: &PoolQuery) -> Result<Vec<Job>, PoolError> {
        let response = self
            .client
            .post(self.search_url())
            .header("content-type", "application/json")
            .json(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Job pool API returned {}: {}", status, body);
            return Err(parse_api_error(status.as_u16(), body));
        }

        let body = response.text().await?;
        let pool = decode_pool(&body)?;

        debug!(
            "Job pool fetch succeeded: {} jobs for {} specializations",
            pool.len(),
            query.specializations.len()
        );

        Ok(pool)
    }
}

fn decode_pool(body: &str) -> Result<Vec<Job>, PoolError> {
    let response: PoolResponse = serde_json::from_str(body)?;
    Ok(response.jobs)
}

fn parse_api_error(status: u16, body: String) -> PoolError {
    let message = serde_json::from_str::<PoolApiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    PoolError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_from_profile_sorts_exclusions() {
        let mut profile = Profile {
            role_level: Some(RoleLevel::Director),
            industry_specializations: vec!["finance".to_string()],
            sponsorship_required: true,
            ..Profile::default()
        };
        profile.excluded_job_ids.insert("b".to_string());
        profile.excluded_job_ids.insert("a".to_string());

        let query = PoolQuery::from_profile(&profile, 50);
        assert_eq!(query.excluded_job_ids, vec!["a", "b"]);
        assert_eq!(query.role_level, Some(RoleLevel::Director));
        assert!(query.sponsorship_required);
        assert_eq!(query.limit, 50);
    }

    #[test]
    fn test_decode_pool() {
        let body = r#"{"jobs": [{
            "id": "j-1",
            "title": "Analyst",
            "company": "Initech",
            "skills": ["sql"],
            "posted_date": "2024-05-01T12:00:00Z"
        }]}"#;
        let jobs = decode_pool(body).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].skills, vec!["sql"]);
    }

    #[test]
    fn test_decode_pool_rejects_garbage() {
        assert!(matches!(decode_pool("<html>"), Err(PoolError::Parse(_))));
    }

    #[test]
    fn test_api_error_message_extracted() {
        let err = parse_api_error(503, r#"{"error": {"message": "index rebuilding"}}"#.to_string());
        match err {
            PoolError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "index rebuilding");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_api_error_falls_back_to_raw_body() {
        let err = parse_api_error(500, "boom".to_string());
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HttpJobPoolClient::new("http://pool.local/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.search_url(), "http://pool.local/jobs/search");
    }
}
