use crate::error::StatsError;
use log::debug;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Reads package names, one per line. Blank lines are skipped; order and
/// duplicates are kept.
pub async fn read_packages(path: &Path) -> Result<Vec<String>, StatsError> {
    if !path.exists() {
        return Err(StatsError::FileNotFound(path.to_path_buf()));
    }

    let mut file = File::open(path).await?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).await?;

    let packages: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    debug!("Parsed packages: {:?}", packages);
    Ok(packages)
}
