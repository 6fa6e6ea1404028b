use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("PEPY_API_KEY environment variable not set")]
    MissingApiKey,

    #[error("File '{}' not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}
