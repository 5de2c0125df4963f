use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("Program list not found: {}", .0.display())]
    ProgramListMissing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}
