use serde::{Deserialize, Serialize};

/// Highest, lowest and mean grade for one column, plus how many values it had.
///
/// `highest` / `lowest` / `mean` are `0.0` when `count` is zero, so `count`
/// is the only reliable "no data" signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectStats {
    pub highest: f64,
    pub lowest: f64,
    pub mean: f64,
    pub count: usize,
}

/// How many students fall into each performance tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub excellent: usize,
    pub good: usize,
    pub needs_improvement: usize,
}

impl TierCounts {
    pub fn total(&self) -> usize {
        self.excellent + self.good + self.needs_improvement
    }
}

/// The analytics dashboard: one row per subject, an overall row computed over
/// the stored averages, and the tier distribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeReport {
    pub math: SubjectStats,
    pub science: SubjectStats,
    pub english: SubjectStats,
    pub overall: SubjectStats,
    pub distribution: TierCounts,
}

impl GradeReport {
    /// True when the report was built from an empty table.
    pub fn is_empty(&self) -> bool {
        self.overall.count == 0
    }

    /// The subject rows in display order, paired with their labels.
    pub fn subjects(&self) -> [(&'static str, &SubjectStats); 3] {
        [
            ("Math", &self.math),
            ("Science", &self.science),
            ("English", &self.english),
        ]
    }
}
