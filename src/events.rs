use crate::report::FinalReport;
use crate::stats::{ScrapingStats, SkipReason};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramOutcome {
    Scraped { semesters: usize, courses: usize },
    Skipped(SkipReason),
    Failed(String),
}

/// What the orchestrator reports while it runs. It never prints on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeEvent {
    RunStarted {
        programs: usize,
        batches: usize,
    },
    ProgramScraped {
        code: String,
        outcome: ProgramOutcome,
    },
    BatchCompleted {
        batch: usize,
        batches: usize,
        scraped: usize,
        stats: ScrapingStats,
    },
    RunFinished {
        stats: ScrapingStats,
    },
}

pub trait EventSink {
    fn handle(&mut self, event: &ScrapeEvent);
}

impl EventSink for Vec<ScrapeEvent> {
    fn handle(&mut self, event: &ScrapeEvent) {
        self.push(event.clone());
    }
}

/// Renders events through `tracing`.
#[derive(Debug)]
pub struct ConsoleReporter {
    max_errors: usize,
}

impl ConsoleReporter {
    pub fn new(max_errors: usize) -> Self {
        Self { max_errors }
    }
}

impl EventSink for ConsoleReporter {
    fn handle(&mut self, event: &ScrapeEvent) {
        match event {
            ScrapeEvent::RunStarted { programs, batches } => {
                info!("Scraping {} programs in {} batches", programs, batches);
            }
            ScrapeEvent::ProgramScraped { code, outcome } => match outcome {
                ProgramOutcome::Scraped { semesters, courses } => {
                    info!("[{}] {} semesters, {} courses", code, semesters, courses);
                }
                ProgramOutcome::Skipped(SkipReason::AlreadyProcessed) => {
                    info!("[{}] Already processed", code);
                }
                ProgramOutcome::Skipped(SkipReason::NoCoursesFound) => {
                    warn!("[{}] No courses found", code);
                }
                ProgramOutcome::Failed(message) => {
                    warn!("[{}] Failed: {}", code, message);
                }
            },
            ScrapeEvent::BatchCompleted {
                batch,
                batches,
                scraped,
                stats,
            } => {
                info!(
                    "Batch {}/{} done: {} scraped (success {}, failed {}, skipped {})",
                    batch, batches, scraped, stats.success, stats.failed, stats.skipped
                );
            }
            ScrapeEvent::RunFinished { stats } => {
                info!(
                    "Scraping finished\n{}",
                    FinalReport::new(stats, self.max_errors)
                );
            }
        }
    }
}
