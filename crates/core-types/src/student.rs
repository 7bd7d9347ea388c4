use crate::enums::Tier;
use crate::error::CoreError;
use crate::grading;
use crate::validation::{validate_grade, validate_name};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Section stored when the operator leaves it blank.
pub const DEFAULT_SECTION: &str = "N/A";

/// The textual form of `created_at` / `updated_at` in the database.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The three subject grades of one student.
///
/// Can only be built through `Scores::new`, so every value is known to be
/// within `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scores {
    math: f64,
    science: f64,
    english: f64,
}

impl Scores {
    pub fn new(math: f64, science: f64, english: f64) -> Result<Self, CoreError> {
        Ok(Self {
            math: validate_grade("Math", math)?,
            science: validate_grade("Science", science)?,
            english: validate_grade("English", english)?,
        })
    }

    pub fn math(&self) -> f64 {
        self.math
    }

    pub fn science(&self) -> f64 {
        self.science
    }

    pub fn english(&self) -> f64 {
        self.english
    }

    pub fn average(&self) -> f64 {
        grading::average(self.math, self.science, self.english)
    }

    pub fn remarks(&self) -> Tier {
        Tier::from_average(self.average())
    }
}

/// A persisted row of the `students` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: i64,
    pub name: String,
    pub section: String,
    pub math: f64,
    pub science: f64,
    pub english: f64,
    /// Always the mean of the three grades.
    pub average: f64,
    pub remarks: Tier,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// The operator's input for a new student, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub name: String,
    pub section: String,
    pub scores: Scores,
}

impl NewStudent {
    /// Validates the name and falls back to `N/A` for a blank section.
    pub fn new(
        name: impl Into<String>,
        section: impl Into<String>,
        scores: Scores,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        validate_name(&name)?;
        let section = section.into();
        let section = if section.trim().is_empty() {
            DEFAULT_SECTION.to_string()
        } else {
            section
        };
        Ok(Self {
            name,
            section,
            scores,
        })
    }
}

/// Replacement values for an existing student.
///
/// `None` keeps the stored name or section. The grades are always replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub section: Option<String>,
    pub scores: Scores,
}

impl StudentUpdate {
    /// Builds an update from raw prompt text, where blank means "keep current".
    pub fn from_input(name: &str, section: &str, scores: Scores) -> Self {
        let keep_if_blank = |s: &str| {
            if s.trim().is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        };
        Self {
            name: keep_if_blank(name),
            section: keep_if_blank(section),
            scores,
        }
    }
}

/// The four numeric columns scanned from every stored record, collected
/// independently for the analytics dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradeColumns {
    pub math: Vec<f64>,
    pub science: Vec<f64>,
    pub english: Vec<f64>,
    pub averages: Vec<f64>,
}

impl GradeColumns {
    pub fn push(&mut self, math: f64, science: f64, english: f64, average: f64) {
        self.math.push(math);
        self.science.push(science);
        self.english.push(english);
        self.averages.push(average);
    }

    /// Number of students the columns were collected from.
    pub fn len(&self) -> usize {
        self.averages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.averages.is_empty()
    }
}
