use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.senecapolytechnic.ca";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    /// Root that `processed/`, `raw/` and the progress/summary files live in.
    pub data_dir: PathBuf,
    pub batch_size: usize,
    pub program_delay: Duration,
    pub batch_delay: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
    /// How many errors the final report prints.
    pub max_reported_errors: usize,
    /// Program scraped by `--test`.
    pub test_program: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            data_dir: PathBuf::from("."),
            batch_size: 50,
            program_delay: Duration::from_secs(1),
            batch_delay: Duration::from_secs(2),
            request_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_reported_errors: 10,
            test_program: "CPA".to_string(),
        }
    }
}
