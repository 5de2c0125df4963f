use crate::data::{Program, ProgramCourses};
use crate::report::{ProgressCheckpoint, RunSummary};
use crate::{utils, ScraperError, Storage};
use std::path::{Path, PathBuf};

/// JSON files under a data directory:
///
/// - `processed/all_programs.json` (input)
/// - `processed/courses/{id}_courses.json`
/// - `processed/courses_batch_{n}.json`
/// - `scraping_progress.json`, `scraping_summary.json`
/// - `raw/{id}_courses.json` for single-program test runs
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn programs_path(&self) -> PathBuf {
        self.root.join("processed").join("all_programs.json")
    }

    pub fn program_path(&self, program_id: &str) -> PathBuf {
        self.root
            .join("processed")
            .join("courses")
            .join(format!("{}_courses.json", program_id.to_lowercase()))
    }

    pub fn batch_path(&self, batch: usize) -> PathBuf {
        self.root
            .join("processed")
            .join(format!("courses_batch_{}.json", batch))
    }

    pub fn progress_path(&self) -> PathBuf {
        self.root.join("scraping_progress.json")
    }

    pub fn summary_path(&self) -> PathBuf {
        self.root.join("scraping_summary.json")
    }

    pub fn raw_path(&self, program_id: &str) -> PathBuf {
        self.root
            .join("raw")
            .join(format!("{}_courses.json", program_id.to_lowercase()))
    }

    pub async fn raw_insert(&self, record: &ProgramCourses) -> Result<PathBuf, ScraperError> {
        let path = self.raw_path(&record.program_id);
        utils::write_json(&path, record).await?;
        Ok(path)
    }
}

#[async_trait::async_trait]
impl Storage for JsonStore {
    async fn programs_get(&self) -> Result<Vec<Program>, ScraperError> {
        let path = self.programs_path();
        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ScraperError::ProgramListMissing(path));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&content)?)
    }

    async fn program_is_exists(&self, program: &Program) -> Result<bool, ScraperError> {
        Ok(tokio::fs::try_exists(self.program_path(&program.id())).await?)
    }

    async fn program_insert(&self, record: &ProgramCourses) -> Result<(), ScraperError> {
        utils::write_json(&self.program_path(&record.program_id), record).await
    }

    async fn batch_insert(
        &self,
        batch: usize,
        records: &[ProgramCourses],
    ) -> Result<(), ScraperError> {
        utils::write_json(&self.batch_path(batch), records).await
    }

    async fn progress_save(&self, progress: &ProgressCheckpoint) -> Result<(), ScraperError> {
        utils::write_json(&self.progress_path(), progress).await
    }

    async fn summary_save(&self, summary: &RunSummary) -> Result<(), ScraperError> {
        utils::write_json(&self.summary_path(), summary).await
    }
}
