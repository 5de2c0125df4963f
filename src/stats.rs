use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Output file already on disk.
    AlreadyProcessed,
    /// Page fetched but no semester table recognised.
    NoCoursesFound,
}

/// Counters for one run. `skipped` always equals
/// `already_processed + no_courses_found`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapingStats {
    pub total: u32,
    pub success: u32,
    pub failed: u32,
    pub skipped: u32,
    pub already_processed: u32,
    pub no_courses_found: u32,
    pub errors: Vec<String>,
}

impl ScrapingStats {
    pub fn record_success(&mut self) {
        self.total += 1;
        self.success += 1;
    }

    pub fn record_failure(&mut self, message: String) {
        self.total += 1;
        self.failed += 1;
        self.errors.push(message);
    }

    pub fn record_skip(&mut self, reason: SkipReason) {
        self.total += 1;
        self.skipped += 1;
        match reason {
            SkipReason::AlreadyProcessed => self.already_processed += 1,
            SkipReason::NoCoursesFound => self.no_courses_found += 1,
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.success) / f64::from(self.total) * 100.0
        }
    }
}
