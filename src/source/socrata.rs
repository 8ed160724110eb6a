use super::{RawObservation, Source, parse_rows};
use crate::config::Config;
use crate::error::PipelineError;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Socrata open-data endpoint (`/resource/{dataset}.json`).
pub struct SocrataSource {
    client: Client,
    url: String,
    limit: u64,
    app_token: Option<String>,
}

impl SocrataSource {
    pub fn new(cfg: &Config) -> Result<Self, PipelineError> {
        // `None` lifts reqwest's 30s default; the full download can take longer.
        let client = Client::builder()
            .timeout(request_timeout(cfg.source.timeout_seconds))
            .build()
            .map_err(|e| PipelineError::SourceUnavailable(format!("building HTTP client: {e}")))?;

        let app_token = if cfg.source.app_token_env.is_empty() {
            None
        } else {
            std::env::var(&cfg.source.app_token_env)
                .ok()
                .filter(|t| !t.trim().is_empty())
        };

        Ok(Self {
            client,
            url: resource_url(&cfg.source.base_url, &cfg.source.dataset),
            limit: cfg.source.limit,
            app_token,
        })
    }
}

impl Source for SocrataSource {
    fn fetch(&self) -> Result<Vec<RawObservation>, PipelineError> {
        debug!(
            "GET {} limit={} token={}",
            self.url,
            self.limit,
            self.app_token.is_some()
        );
        let mut req = self
            .client
            .get(&self.url)
            .query(&[("$limit", self.limit.to_string())]);
        if let Some(token) = &self.app_token {
            req = req.header("X-App-Token", token);
        }

        let resp = req
            .send()
            .map_err(|e| PipelineError::SourceUnavailable(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(PipelineError::SourceUnavailable(format!(
                "request failed with status {}",
                resp.status()
            )));
        }

        let body = resp
            .bytes()
            .map_err(|e| PipelineError::SourceUnavailable(format!("reading response body: {e}")))?;
        let rows = parse_rows(&body)?;
        info!("fetched {} rows from {}", rows.len(), self.url);
        Ok(rows)
    }
}

fn request_timeout(seconds: u64) -> Option<Duration> {
    (seconds > 0).then(|| Duration::from_secs(seconds))
}

fn resource_url(base_url: &str, dataset: &str) -> String {
    format!("{}/resource/{}.json", base_url.trim_end_matches('/'), dataset)
}
