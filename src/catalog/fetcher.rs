use crate::{config::Config, error::ScraperError, Fetcher};
use tracing::debug;

/// Downloads program course pages over HTTP. No retries: a failed request
/// fails the program.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self, ScraperError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .no_proxy()
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

pub fn course_page_url(base_url: &str, program_code: &str) -> String {
    format!(
        "{}/programs/fulltime/{}/courses.html",
        base_url.trim_end_matches('/'),
        program_code.to_uppercase()
    )
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, program_code: &str) -> Result<String, ScraperError> {
        let url = course_page_url(&self.base_url, program_code);
        debug!("Visit {}", url);
        let html = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(html)
    }
}
