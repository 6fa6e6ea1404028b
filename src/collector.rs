use crate::fetcher::StatsFetcher;
use crate::rate_limit::Pause;
use crate::types::{recent_downloads, PackageReport, PackageStatsResult, PackageStatus, RunSummary};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

/// Drives one run: fetches every package in order, one at a time, pausing
/// after each request.
pub struct Collector<F, P> {
    fetcher: F,
    pause: P,
    days: u32,
    show_progress: bool,
}

impl<F: StatsFetcher, P: Pause> Collector<F, P> {
    pub fn new(fetcher: F, pause: P, days: u32, show_progress: bool) -> Self {
        Self {
            fetcher,
            pause,
            days,
            show_progress,
        }
    }

    pub async fn collect_all(&self, packages: Vec<String>, api_key: &str) -> RunSummary {
        info!("Collecting stats for {} packages over the last {} days", packages.len(), self.days);
        let pb = self.create_progress_bar(packages.len() as u64);

        let mut summary = RunSummary {
            days: self.days,
            total_downloads: 0,
            total_recent_downloads: 0,
            successful_packages: 0,
            package_count: packages.len(),
            reports: Vec::with_capacity(packages.len()),
        };

        for package in packages {
            pb.set_message(package.clone());
            let status = match self.fetcher.fetch(&package, api_key).await {
                PackageStatsResult::Success(stats) => {
                    let recent = recent_downloads(&stats.downloads, self.days);
                    info!("{}: {} total, {} recent", package, stats.total_downloads, recent);

                    summary.total_downloads = summary.total_downloads.saturating_add(stats.total_downloads);
                    summary.total_recent_downloads = summary.total_recent_downloads.saturating_add(recent);
                    summary.successful_packages += 1;

                    PackageStatus::Success {
                        total_downloads: stats.total_downloads,
                        recent_downloads: recent,
                        versions: stats.versions,
                    }
                }
                PackageStatsResult::Error(message) => {
                    warn!("{}: {}", package, message);
                    PackageStatus::Failed(message)
                }
            };

            summary.reports.push(PackageReport { package, status });
            pb.inc(1);
            self.pause.pause().await;
        }

        pb.finish_and_clear();
        info!(
            "Collected {}/{} packages successfully",
            summary.successful_packages, summary.package_count
        );
        summary
    }

    fn create_progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} Fetching package stats... [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}
