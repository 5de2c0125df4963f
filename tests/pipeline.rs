use course_catalog_scraper::catalog::JsonStore;
use course_catalog_scraper::report::{ProgressCheckpoint, RunSummary};
use course_catalog_scraper::{
    run_scraper, Config, Fetcher, Program, ProgramCourses, ProgramOutcome, ScrapeEvent,
    ScraperError, ScrapingStats, SkipReason, Storage,
};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

const EMPTY_PAGE: &str = "<html><body><h1>Program (XYZ)</h1><p>No courses.</p></body></html>";

/// Serves pages from memory; codes without a page fail like a 404.
#[derive(Default)]
struct StubFetcher {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl StubFetcher {
    fn with_page(mut self, code: &str, html: &str) -> Self {
        self.pages.insert(code.to_string(), html.to_string());
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, program_code: &str) -> Result<String, ScraperError> {
        self.requests.lock().unwrap().push(program_code.to_string());
        self.pages.get(program_code).cloned().ok_or_else(|| {
            ScraperError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "404 Not Found",
            ))
        })
    }
}

/// Which storage call refuses to work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailOn {
    Exists(&'static str),
    Insert(&'static str),
    Batch,
    Progress,
}

/// `JsonStore` with one operation made to fail.
struct FailingStore {
    inner: JsonStore,
    fail_on: FailOn,
}

fn refused() -> ScraperError {
    ScraperError::Io(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "write refused",
    ))
}

#[async_trait::async_trait]
impl Storage for FailingStore {
    async fn programs_get(&self) -> Result<Vec<Program>, ScraperError> {
        self.inner.programs_get().await
    }

    async fn program_is_exists(&self, program: &Program) -> Result<bool, ScraperError> {
        if let FailOn::Exists(code) = self.fail_on {
            if program.code == code {
                return Err(refused());
            }
        }
        self.inner.program_is_exists(program).await
    }

    async fn program_insert(&self, record: &ProgramCourses) -> Result<(), ScraperError> {
        if let FailOn::Insert(code) = self.fail_on {
            if record.program_id == code.to_lowercase() {
                return Err(refused());
            }
        }
        self.inner.program_insert(record).await
    }

    async fn batch_insert(
        &self,
        batch: usize,
        records: &[ProgramCourses],
    ) -> Result<(), ScraperError> {
        if self.fail_on == FailOn::Batch {
            return Err(refused());
        }
        self.inner.batch_insert(batch, records).await
    }

    async fn progress_save(&self, progress: &ProgressCheckpoint) -> Result<(), ScraperError> {
        if self.fail_on == FailOn::Progress {
            return Err(refused());
        }
        self.inner.progress_save(progress).await
    }

    async fn summary_save(&self, summary: &RunSummary) -> Result<(), ScraperError> {
        self.inner.summary_save(summary).await
    }
}

fn failing_store(dir: &Path, fail_on: FailOn) -> FailingStore {
    FailingStore {
        inner: JsonStore::new(dir),
        fail_on,
    }
}

fn config(dir: &Path, batch_size: usize) -> Config {
    Config {
        data_dir: dir.to_path_buf(),
        batch_size,
        program_delay: Duration::ZERO,
        batch_delay: Duration::ZERO,
        ..Config::default()
    }
}

fn write_programs(dir: &Path, codes: &[&str]) {
    let programs = codes
        .iter()
        .map(|code| serde_json::json!({"code": code, "name": format!("Program {}", code)}))
        .collect::<Vec<_>>();
    fs::create_dir_all(dir.join("processed")).unwrap();
    fs::write(
        dir.join("processed/all_programs.json"),
        serde_json::to_string_pretty(&programs).unwrap(),
    )
    .unwrap();
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> T {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn fetcher() -> StubFetcher {
    let cpa = fs::read_to_string("tests/htmls/cpa.html").expect("Invalid file url");
    StubFetcher::default()
        .with_page("CPA", &cpa)
        .with_page("CPD", &cpa)
        .with_page("XYZ", EMPTY_PAGE)
}

#[tokio::test]
async fn full_run_writes_every_file() {
    let dir = tempfile::tempdir().unwrap();
    write_programs(dir.path(), &["CPA", "XYZ", "BAD", "CPD"]);

    let fetcher = fetcher();
    let store = JsonStore::new(dir.path());
    let mut events: Vec<ScrapeEvent> = vec![];

    let stats = run_scraper(&fetcher, &store, &config(dir.path(), 3), &mut events)
        .await
        .unwrap();

    assert_eq!(stats.total, 4);
    assert_eq!(stats.success, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.no_courses_found, 1);
    assert_eq!(stats.already_processed, 0);
    assert_eq!(stats.total, stats.success + stats.failed + stats.skipped);
    assert_eq!(stats.errors.len(), 1);
    assert!(stats.errors[0].starts_with("BAD: "));

    assert_eq!(fetcher.requests(), vec!["CPA", "XYZ", "BAD", "CPD"]);

    let cpa: ProgramCourses = read_json(&dir.path().join("processed/courses/cpa_courses.json"));
    assert_eq!(cpa.program_id, "cpa");
    assert_eq!(cpa.program_name, "Computer Programming and Analysis");
    assert_eq!(cpa.semesters.len(), 3);
    assert!(dir.path().join("processed/courses/cpd_courses.json").is_file());
    assert!(!dir.path().join("processed/courses/xyz_courses.json").exists());
    assert!(!dir.path().join("processed/courses/bad_courses.json").exists());

    let batch1: Vec<ProgramCourses> = read_json(&dir.path().join("processed/courses_batch_1.json"));
    let batch2: Vec<ProgramCourses> = read_json(&dir.path().join("processed/courses_batch_2.json"));
    assert_eq!(
        batch1.iter().map(|p| p.program_id.as_str()).collect::<Vec<_>>(),
        vec!["cpa"]
    );
    assert_eq!(
        batch2.iter().map(|p| p.program_id.as_str()).collect::<Vec<_>>(),
        vec!["cpd"]
    );

    let progress: serde_json::Value = read_json(&dir.path().join("scraping_progress.json"));
    assert_eq!(progress["completedBatches"], 2);
    assert_eq!(progress["stats"]["total"], 4);

    let summary: serde_json::Value = read_json(&dir.path().join("scraping_summary.json"));
    let summary_stats: ScrapingStats = serde_json::from_value(summary["stats"].clone()).unwrap();
    assert_eq!(summary_stats, stats);
    assert_eq!(summary["errors"], serde_json::json!(stats.errors));
}

#[tokio::test]
async fn events_follow_program_and_batch_order() {
    let dir = tempfile::tempdir().unwrap();
    write_programs(dir.path(), &["CPA", "XYZ", "BAD"]);

    let fetcher = fetcher();
    let store = JsonStore::new(dir.path());
    let mut events: Vec<ScrapeEvent> = vec![];

    run_scraper(&fetcher, &store, &config(dir.path(), 2), &mut events)
        .await
        .unwrap();

    assert_eq!(
        events.first(),
        Some(&ScrapeEvent::RunStarted {
            programs: 3,
            batches: 2
        })
    );
    assert!(matches!(events.last(), Some(ScrapeEvent::RunFinished { .. })));

    let outcomes = events
        .iter()
        .filter_map(|e| match e {
            ScrapeEvent::ProgramScraped { code, outcome } => Some((code.as_str(), outcome)),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(outcomes.len(), 3);
    assert_eq!(
        outcomes[0],
        (
            "CPA",
            &ProgramOutcome::Scraped {
                semesters: 3,
                courses: 9
            }
        )
    );
    assert_eq!(
        outcomes[1],
        ("XYZ", &ProgramOutcome::Skipped(SkipReason::NoCoursesFound))
    );
    assert!(matches!(outcomes[2], ("BAD", ProgramOutcome::Failed(_))));

    let batches = events
        .iter()
        .filter_map(|e| match e {
            ScrapeEvent::BatchCompleted { batch, scraped, .. } => Some((*batch, *scraped)),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(batches, vec![(1, 1), (2, 0)]);
}

#[tokio::test]
async fn second_run_skips_everything() {
    let dir = tempfile::tempdir().unwrap();
    write_programs(dir.path(), &["CPA", "CPD"]);

    let store = JsonStore::new(dir.path());
    let config = config(dir.path(), 50);

    let first = fetcher();
    run_scraper(&first, &store, &config, &mut Vec::<ScrapeEvent>::new())
        .await
        .unwrap();
    let cpa_path = dir.path().join("processed/courses/cpa_courses.json");
    let before = fs::read_to_string(&cpa_path).unwrap();

    let second = fetcher();
    let stats = run_scraper(&second, &store, &config, &mut Vec::<ScrapeEvent>::new())
        .await
        .unwrap();

    assert!(second.requests().is_empty());
    assert_eq!(stats.total, 2);
    assert_eq!(stats.skipped, 2);
    assert_eq!(stats.already_processed, 2);
    assert_eq!(stats.success, 0);
    assert_eq!(fs::read_to_string(&cpa_path).unwrap(), before);
}

#[tokio::test]
async fn missing_program_list_stops_before_fetching() {
    let dir = tempfile::tempdir().unwrap();

    let fetcher = fetcher();
    let store = JsonStore::new(dir.path());
    let mut events: Vec<ScrapeEvent> = vec![];

    let result = run_scraper(&fetcher, &store, &config(dir.path(), 50), &mut events).await;

    assert!(matches!(result, Err(ScraperError::ProgramListMissing(_))));
    assert!(fetcher.requests().is_empty());
    assert!(events.is_empty());
    assert!(!dir.path().join("scraping_progress.json").exists());
    assert!(!dir.path().join("scraping_summary.json").exists());
}

#[tokio::test]
async fn empty_program_list_still_writes_summary() {
    let dir = tempfile::tempdir().unwrap();
    write_programs(dir.path(), &[]);

    let store = JsonStore::new(dir.path());
    let mut events: Vec<ScrapeEvent> = vec![];
    let stats = run_scraper(&fetcher(), &store, &config(dir.path(), 50), &mut events)
        .await
        .unwrap();

    assert_eq!(stats, ScrapingStats::default());
    assert!(dir.path().join("scraping_summary.json").is_file());
    assert!(!dir.path().join("scraping_progress.json").exists());
}

#[tokio::test]
async fn program_write_failure_fails_only_that_program() {
    let dir = tempfile::tempdir().unwrap();
    write_programs(dir.path(), &["CPA", "CPD"]);

    let store = failing_store(dir.path(), FailOn::Insert("CPA"));
    let mut events: Vec<ScrapeEvent> = vec![];
    let stats = run_scraper(&fetcher(), &store, &config(dir.path(), 50), &mut events)
        .await
        .unwrap();

    assert_eq!(stats.total, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.success, 1);
    assert_eq!(stats.errors, vec!["CPA: IO error: write refused".to_string()]);
    assert!(!dir.path().join("processed/courses/cpa_courses.json").exists());
    assert!(dir.path().join("processed/courses/cpd_courses.json").is_file());
    assert!(dir.path().join("scraping_summary.json").is_file());
}

#[tokio::test]
async fn existence_check_failure_fails_program_without_fetching() {
    let dir = tempfile::tempdir().unwrap();
    write_programs(dir.path(), &["CPA", "CPD"]);

    let fetcher = fetcher();
    let store = failing_store(dir.path(), FailOn::Exists("CPA"));
    let mut events: Vec<ScrapeEvent> = vec![];
    let stats = run_scraper(&fetcher, &store, &config(dir.path(), 50), &mut events)
        .await
        .unwrap();

    assert_eq!(fetcher.requests(), vec!["CPD"]);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.success, 1);
    assert!(stats.errors[0].starts_with("CPA: "));
}

#[tokio::test]
async fn batch_file_failure_stops_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write_programs(dir.path(), &["CPA", "CPD"]);

    let fetcher = fetcher();
    let store = failing_store(dir.path(), FailOn::Batch);
    let mut events: Vec<ScrapeEvent> = vec![];
    let result = run_scraper(&fetcher, &store, &config(dir.path(), 1), &mut events).await;

    assert!(matches!(result, Err(ScraperError::Io(_))));
    assert_eq!(fetcher.requests(), vec!["CPA"]);
    assert!(!dir.path().join("scraping_progress.json").exists());
    assert!(!dir.path().join("scraping_summary.json").exists());
    assert!(!events
        .iter()
        .any(|e| matches!(e, ScrapeEvent::BatchCompleted { .. })));
}

#[tokio::test]
async fn checkpoint_failure_stops_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write_programs(dir.path(), &["CPA", "CPD"]);

    let fetcher = fetcher();
    let store = failing_store(dir.path(), FailOn::Progress);
    let mut events: Vec<ScrapeEvent> = vec![];
    let result = run_scraper(&fetcher, &store, &config(dir.path(), 1), &mut events).await;

    assert!(matches!(result, Err(ScraperError::Io(_))));
    assert_eq!(fetcher.requests(), vec!["CPA"]);
    assert!(dir.path().join("processed/courses_batch_1.json").is_file());
    assert!(!dir.path().join("processed/courses_batch_2.json").exists());
    assert!(!dir.path().join("scraping_summary.json").exists());
}

#[tokio::test]
async fn huge_requirement_counts_do_not_abort_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write_programs(dir.path(), &["BIG", "CPA"]);

    let page = r#"<html><body><h1>Big Program (BIG)</h1><table>
        <tr><td>APS145</td><td><a href="/subject">Applied Problem Solving</a></td></tr>
        <tr><td>Plus: General Education Course (4000000000)</td></tr>
        <tr><td>Plus: Professional Options (4000000000)</td></tr>
    </table></body></html>"#;
    let fetcher = fetcher().with_page("BIG", page);
    let store = JsonStore::new(dir.path());
    let mut events: Vec<ScrapeEvent> = vec![];
    let stats = run_scraper(&fetcher, &store, &config(dir.path(), 50), &mut events)
        .await
        .unwrap();

    assert_eq!(stats.success, 2);
    let big: ProgramCourses = read_json(&dir.path().join("processed/courses/big_courses.json"));
    assert_eq!(big.semesters[0].total_courses, Some(u32::MAX));
}
