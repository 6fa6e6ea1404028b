use crate::error::StatsError;
use crate::types::{PackageStatsResult, ProjectStats};
use log::{debug, info};
use reqwest::{StatusCode, Url};
use std::future::Future;

pub trait StatsFetcher {
    /// Looks up one package. Never fails outright: every problem is folded
    /// into [`PackageStatsResult::Error`].
    fn fetch(&self, package: &str, api_key: &str) -> impl Future<Output = PackageStatsResult> + Send;
}

pub struct PepyClient {
    client: reqwest::Client,
    base_url: Url,
}

impl PepyClient {
    pub fn new(base_url: &str) -> Result<Self, StatsError> {
        let base_url =
            Url::parse(base_url).map_err(|e| StatsError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(StatsError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Appends the package name as a single encoded path segment.
    fn project_url(&self, package: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(package);
        }
        url
    }
}

impl StatsFetcher for PepyClient {
    async fn fetch(&self, package: &str, api_key: &str) -> PackageStatsResult {
        let url = self.project_url(package);
        info!("Fetching stats: {}", url);

        let resp = match self.client.get(url).header("X-API-Key", api_key).send().await {
            Ok(resp) => resp,
            Err(e) => return PackageStatsResult::Error(format!("Request failed: {e}")),
        };

        let status = resp.status();
        debug!("{} responded with {}", package, status);

        match status {
            StatusCode::OK => match resp.json::<ProjectStats>().await {
                Ok(stats) => PackageStatsResult::Success(stats),
                Err(e) => PackageStatsResult::Error(format!("Invalid response body: {e}")),
            },
            other => PackageStatsResult::Error(status_message(package, other)),
        }
    }
}

fn status_message(package: &str, status: StatusCode) -> String {
    match status {
        StatusCode::NOT_FOUND => format!("Package '{package}' not found"),
        StatusCode::UNAUTHORIZED => "Invalid API key".to_string(),
        StatusCode::TOO_MANY_REQUESTS => "Rate limit exceeded".to_string(),
        other => format!("API error: {}", other.as_u16()),
    }
}
