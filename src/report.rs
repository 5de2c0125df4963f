use crate::stats::ScrapingStats;
use crate::utils::{format_timestamp, get_now};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Written to `scraping_progress.json` after every batch. Informational only,
/// runs resume from the per-program files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressCheckpoint {
    pub timestamp: String,
    pub completed_batches: usize,
    pub stats: ScrapingStats,
}

impl ProgressCheckpoint {
    pub fn new(completed_batches: usize, stats: &ScrapingStats) -> Self {
        Self {
            timestamp: format_timestamp(&get_now()),
            completed_batches,
            stats: stats.clone(),
        }
    }
}

/// Written once to `scraping_summary.json` at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub timestamp: String,
    pub stats: ScrapingStats,
    pub errors: Vec<String>,
}

impl RunSummary {
    pub fn new(stats: &ScrapingStats) -> Self {
        Self {
            timestamp: format_timestamp(&get_now()),
            stats: stats.clone(),
            errors: stats.errors.clone(),
        }
    }
}

/// Console view of the final stats: counts, success rate and the first few
/// errors.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalReport<'a> {
    stats: &'a ScrapingStats,
    max_errors: usize,
}

impl<'a> FinalReport<'a> {
    pub fn new(stats: &'a ScrapingStats, max_errors: usize) -> Self {
        Self { stats, max_errors }
    }

    pub fn success_rate(&self) -> String {
        format!("{:.1}%", self.stats.success_rate())
    }

    pub fn shown_errors(&self) -> &'a [String] {
        let stats: &'a ScrapingStats = self.stats;
        let errors = stats.errors.as_slice();
        &errors[..errors.len().min(self.max_errors)]
    }

    pub fn hidden_errors(&self) -> usize {
        self.stats.errors.len().saturating_sub(self.max_errors)
    }
}

impl fmt::Display for FinalReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total           : {}", self.stats.total)?;
        writeln!(f, "Success         : {}", self.stats.success)?;
        writeln!(f, "Failed          : {}", self.stats.failed)?;
        writeln!(
            f,
            "Skipped         : {} ({} already processed, {} without courses)",
            self.stats.skipped, self.stats.already_processed, self.stats.no_courses_found
        )?;
        writeln!(f, "Success rate    : {}", self.success_rate())?;

        if !self.stats.errors.is_empty() {
            writeln!(f, "Errors          : ")?;
            for error in self.shown_errors() {
                writeln!(f, "> {}", error)?;
            }
            let hidden = self.hidden_errors();
            if hidden > 0 {
                writeln!(f, "... and {} more errors", hidden)?;
            }
        }

        Ok(())
    }
}
