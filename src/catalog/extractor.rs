use super::document::ParsedDocument;
use crate::data::{Course, CourseRequirement, Program, ProgramCourses, Semester};
use lazy_regex::regex;

/// Turns a program's course page into semesters of courses and elective
/// requirements.
#[derive(Debug, Default)]
pub struct CourseExtractor;

impl CourseExtractor {
    /// Returns `None` when no semester could be recognised on the page.
    pub fn extract<D: ParsedDocument>(&self, program: &Program, doc: &D) -> Option<ProgramCourses> {
        let semesters = extract_semesters(doc);
        if semesters.is_empty() {
            return None;
        }

        let program_name = extract_program_name(doc)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| program.name.clone());

        Some(ProgramCourses {
            program_id: program.id(),
            program_name,
            semesters,
        })
    }
}

/// Text of the first heading without the trailing "(CODE)".
pub fn extract_program_name<D: ParsedDocument>(doc: &D) -> Option<String> {
    let heading = doc.heading()?;
    let text = doc.text_of(heading);
    let name = regex!(r"\s*\([^)]*\)\s*$").replace(text.trim(), "");
    Some(name.trim().to_string())
}

pub fn extract_semesters<D: ParsedDocument>(doc: &D) -> Vec<Semester> {
    doc.find_tables()
        .into_iter()
        .enumerate()
        .filter_map(|(index, table)| extract_semester(doc, table, index))
        .collect()
}

/// `index` is the position of `table` among all tables of the document. It
/// always names the semester id, even when the heading says otherwise.
pub fn extract_semester<'a, D: ParsedDocument>(
    doc: &'a D,
    table: D::Node<'a>,
    index: usize,
) -> Option<Semester> {
    if !regex!(r"[A-Z]{3}\d{3}").is_match(&doc.text_of(table)) {
        return None;
    }

    let mut courses = vec![];
    let mut requirements = vec![];
    for row in doc.rows_of(table) {
        let text = doc.text_of(row);
        if regex!(r"[A-Z]{3}\d{3}").is_match(&text) {
            if let Some(course) = extract_course(doc, row) {
                courses.push(course);
            }
        } else if text.to_lowercase().contains("plus:") {
            if let Some(requirement) = extract_requirement(&text) {
                requirements.push(requirement);
            }
        }
    }

    if courses.is_empty() {
        return None;
    }

    Some(Semester::new(
        format!("semester{}", index + 1),
        semester_name(doc, table, index),
        courses,
        requirements,
    ))
}

/// Nearest "Semester N" before the table, or a positional fallback.
fn semester_name<'a, D: ParsedDocument>(doc: &'a D, table: D::Node<'a>, index: usize) -> String {
    let before = doc.text_before(table);
    match regex!(r"(?i)semester\s+(\d+)")
        .captures_iter(&before)
        .last()
    {
        Some(captures) => format!("Semester {}", &captures[1]),
        None => format!("Semester {}", index + 1),
    }
}

/// Code and name may sit in different cells: the code comes from the first
/// cell starting with a course code, the name from the first cell holding a
/// link.
pub fn extract_course<'a, D: ParsedDocument>(doc: &'a D, row: D::Node<'a>) -> Option<Course> {
    let mut code = None;
    let mut name = None;

    for cell in doc.cells_of(row) {
        if code.is_none() {
            let text = doc.text_of(cell);
            let text = text.trim();
            if regex!(r"^[A-Z]{3}\d{3}").is_match(text) {
                code = Some(text.to_string());
            }
        }
        if name.is_none() {
            if let Some(link) = doc.links_of(cell).into_iter().next() {
                name = Some(doc.text_of(link).trim().to_string());
            }
        }
    }

    let code = code?;
    let name = name?;
    let code = regex!(r"\s+or\s+")
        .split(&code)
        .next()
        .unwrap_or_default()
        .trim();

    Some(Course::new(code, &name))
}

/// Parses "Plus: <type> (<count>)". Zero counts are dropped.
pub fn extract_requirement(text: &str) -> Option<CourseRequirement> {
    let captures = regex!(r"(?i)plus:\s*(.+?)\s*\((\d+)\)").captures(text)?;
    let count: u32 = captures[2].parse().ok()?;
    if count == 0 {
        return None;
    }
    Some(CourseRequirement::new(captures[1].trim(), count))
}
