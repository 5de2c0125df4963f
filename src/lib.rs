use tokio::time::{self, Duration};
use tracing::debug;

pub mod catalog;
pub mod config;
pub mod data;
pub mod events;
pub mod report;
pub mod stats;

mod error;
mod utils;

pub use config::Config;
pub use data::{Course, CourseRequirement, Program, ProgramCourses, Semester};
pub use error::ScraperError;
pub use events::{ConsoleReporter, EventSink, ProgramOutcome, ScrapeEvent};
pub use stats::{ScrapingStats, SkipReason};

use report::{ProgressCheckpoint, RunSummary};

/// Source of raw course pages, keyed by program code.
#[async_trait::async_trait]
pub trait Fetcher {
    async fn fetch(&self, program_code: &str) -> Result<String, ScraperError>;
}

#[async_trait::async_trait]
pub trait Storage {
    /// Fails with [`ScraperError::ProgramListMissing`] when there is no list.
    async fn programs_get(&self) -> Result<Vec<Program>, ScraperError>;

    async fn program_is_exists(&self, program: &Program) -> Result<bool, ScraperError>;
    async fn program_insert(&self, record: &ProgramCourses) -> Result<(), ScraperError>;

    async fn batch_insert(&self, batch: usize, records: &[ProgramCourses])
        -> Result<(), ScraperError>;
    async fn progress_save(&self, progress: &ProgressCheckpoint) -> Result<(), ScraperError>;
    async fn summary_save(&self, summary: &RunSummary) -> Result<(), ScraperError>;
}

/// Splits `items` into consecutive chunks of `size`, the last one possibly
/// shorter. A `size` of zero is treated as one.
pub fn create_batches<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    items.chunks(size.max(1)).map(<[T]>::to_vec).collect()
}

/// Fetches, parses and stores one program. `Ok(None)` means the page had no
/// recognisable semester.
pub async fn scrape_program<F, S>(
    fetcher: &F,
    storage: &S,
    program: &Program,
) -> Result<Option<ProgramCourses>, ScraperError>
where
    F: Fetcher + Sync,
    S: Storage + Sync,
{
    let html = fetcher.fetch(&program.code).await?;
    let result = catalog::parse_course_page(program, &html);
    if let Some(record) = &result {
        storage.program_insert(record).await?;
    }
    Ok(result)
}

/// Runs one program through its states. Never fails: errors become
/// [`ProgramOutcome::Failed`].
async fn process_program<F, S>(
    fetcher: &F,
    storage: &S,
    program: &Program,
) -> (ProgramOutcome, Option<ProgramCourses>)
where
    F: Fetcher + Sync,
    S: Storage + Sync,
{
    let failed = |e: ScraperError| ProgramOutcome::Failed(format!("{}: {}", program.code, e));

    match storage.program_is_exists(program).await {
        Ok(true) => return (ProgramOutcome::Skipped(SkipReason::AlreadyProcessed), None),
        Ok(false) => {}
        Err(e) => return (failed(e), None),
    }

    match scrape_program(fetcher, storage, program).await {
        Ok(Some(record)) => (
            ProgramOutcome::Scraped {
                semesters: record.semesters.len(),
                courses: record.course_count(),
            },
            Some(record),
        ),
        Ok(None) => (ProgramOutcome::Skipped(SkipReason::NoCoursesFound), None),
        Err(e) => (failed(e), None),
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        time::sleep(delay).await;
    }
}

/// Scrapes every program of the stored list, one at a time, batch after
/// batch. Only a missing program list or a failed batch-level write stops
/// the run.
pub async fn run_scraper<F, S, E>(
    fetcher: &F,
    storage: &S,
    config: &Config,
    events: &mut E,
) -> Result<ScrapingStats, ScraperError>
where
    F: Fetcher + Sync,
    S: Storage + Sync,
    E: EventSink,
{
    let programs = storage.programs_get().await?;
    let batches = create_batches(&programs, config.batch_size);
    events.handle(&ScrapeEvent::RunStarted {
        programs: programs.len(),
        batches: batches.len(),
    });

    let mut stats = ScrapingStats::default();
    for (index, batch) in batches.iter().enumerate() {
        let batch_number = index + 1;
        debug!("Batch {}: {} programs", batch_number, batch.len());

        let mut scraped = vec![];
        for program in batch {
            let (outcome, record) = process_program(fetcher, storage, program).await;
            match &outcome {
                ProgramOutcome::Scraped { .. } => stats.record_success(),
                ProgramOutcome::Skipped(reason) => stats.record_skip(*reason),
                ProgramOutcome::Failed(message) => stats.record_failure(message.clone()),
            }
            let fetched = outcome != ProgramOutcome::Skipped(SkipReason::AlreadyProcessed);
            events.handle(&ScrapeEvent::ProgramScraped {
                code: program.code.clone(),
                outcome,
            });
            scraped.extend(record);

            if fetched {
                pause(config.program_delay).await;
            }
        }

        storage.batch_insert(batch_number, &scraped).await?;
        storage
            .progress_save(&ProgressCheckpoint::new(batch_number, &stats))
            .await?;
        events.handle(&ScrapeEvent::BatchCompleted {
            batch: batch_number,
            batches: batches.len(),
            scraped: scraped.len(),
            stats: stats.clone(),
        });

        if batch_number < batches.len() {
            pause(config.batch_delay).await;
        }
    }

    storage.summary_save(&RunSummary::new(&stats)).await?;
    events.handle(&ScrapeEvent::RunFinished {
        stats: stats.clone(),
    });

    Ok(stats)
}
