use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// Entry of `processed/all_programs.json`. Only `code` and `name` are read,
/// anything else the listing carries is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub code: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Program {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            extra: BTreeMap::new(),
        }
    }

    /// A program known only by its code; the code doubles as its name.
    pub fn from_code(code: &str) -> Self {
        Self::new(code, code)
    }

    pub fn id(&self) -> String {
        self.code.to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub code: String,
    pub name: String,
}

impl Course {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            id: code.to_lowercase(),
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}

/// An elective slot, e.g. "Plus: General Education Course (1)".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRequirement {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: u32,
    pub description: String,
}

impl CourseRequirement {
    pub fn new(kind: &str, count: u32) -> Self {
        Self {
            kind: kind.to_string(),
            count,
            description: format!("{} ({})", kind, count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semester {
    pub id: String,
    pub name: String,
    pub courses: Vec<Course>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<CourseRequirement>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_courses: Option<u32>,
}

impl Semester {
    /// `requirements` and `total_courses` are only set when at least one
    /// requirement was found. The total saturates at `u32::MAX`.
    pub fn new(
        id: String,
        name: String,
        courses: Vec<Course>,
        requirements: Vec<CourseRequirement>,
    ) -> Self {
        if requirements.is_empty() {
            return Self {
                id,
                name,
                courses,
                requirements: None,
                total_courses: None,
            };
        }

        let fixed = u32::try_from(courses.len()).unwrap_or(u32::MAX);
        let total = requirements
            .iter()
            .fold(fixed, |total, r| total.saturating_add(r.count));
        Self {
            id,
            name,
            courses,
            requirements: Some(requirements),
            total_courses: Some(total),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramCourses {
    pub program_id: String,
    pub program_name: String,
    pub semesters: Vec<Semester>,
}

impl ProgramCourses {
    pub fn course_count(&self) -> usize {
        self.semesters.iter().map(|s| s.courses.len()).sum()
    }
}

impl fmt::Display for ProgramCourses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Program         : {}", self.program_name)?;
        writeln!(f, "Id              : {}", self.program_id)?;
        writeln!(f, "Semesters       : {}", self.semesters.len())?;
        for semester in &self.semesters {
            writeln!(f, "> {} ({})", semester.name, semester.id)?;
            for course in &semester.courses {
                writeln!(f, "    {:<8} {}", course.code, course.name)?;
            }
            if let Some(requirements) = &semester.requirements {
                writeln!(
                    f,
                    "    Plus: {}",
                    requirements.iter().map(|r| &r.description).join(", ")
                )?;
            }
            if let Some(total) = semester.total_courses {
                writeln!(f, "    Total courses: {}", total)?;
            }
        }

        Ok(())
    }
}
