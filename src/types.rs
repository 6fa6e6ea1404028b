use serde::Deserialize;
use std::collections::BTreeMap;

/// Date (`YYYY-MM-DD`) to version label to download count.
pub type DownloadsByDate = BTreeMap<String, BTreeMap<String, u64>>;

/// Body of a successful `GET /projects/{name}` response.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ProjectStats {
    #[serde(default)]
    pub total_downloads: u64,
    #[serde(default)]
    pub downloads: DownloadsByDate,
    #[serde(default)]
    pub versions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PackageStatsResult {
    Success(ProjectStats),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PackageStatus {
    Success {
        total_downloads: u64,
        recent_downloads: u64,
        versions: Vec<String>,
    },
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct PackageReport {
    pub package: String,
    pub status: PackageStatus,
}

#[derive(Debug)]
pub struct RunSummary {
    pub days: u32,
    pub total_downloads: u64,
    pub total_recent_downloads: u64,
    pub successful_packages: usize,
    pub package_count: usize,
    pub reports: Vec<PackageReport>,
}

/// Sum of every version count over the `days` most recent dates present.
pub fn recent_downloads(downloads: &DownloadsByDate, days: u32) -> u64 {
    downloads
        .values()
        .rev()
        .take(days as usize)
        .flat_map(|per_version| per_version.values())
        .fold(0u64, |total, count| total.saturating_add(*count))
}
