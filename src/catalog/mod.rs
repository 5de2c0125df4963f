mod document;
mod extractor;
mod fetcher;
mod storage;

pub use document::ParsedDocument;
pub use extractor::{
    extract_course, extract_program_name, extract_requirement, extract_semester,
    extract_semesters, CourseExtractor,
};
pub use fetcher::{course_page_url, HttpFetcher};
pub use storage::JsonStore;

use crate::data::{Program, ProgramCourses};
use scraper::Html;

/// Parses a downloaded course page. `None` means no semester was found.
pub fn parse_course_page(program: &Program, html: &str) -> Option<ProgramCourses> {
    let doc = Html::parse_document(html);
    CourseExtractor.extract(program, &doc)
}
