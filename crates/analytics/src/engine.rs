use crate::report::{GradeReport, SubjectStats, TierCounts};
use core_types::{GradeColumns, Tier};

/// Arithmetic mean of `values`; `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Largest value; `0.0` for an empty slice.
pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

/// Smallest value; `0.0` for an empty slice.
pub fn min(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::min).unwrap_or(0.0)
}

/// Partitions averages into tiers using the same boundaries as `Tier::from_average`.
pub fn tier_counts(averages: &[f64]) -> TierCounts {
    averages
        .iter()
        .fold(TierCounts::default(), |mut counts, &average| {
            match Tier::from_average(average) {
                Tier::Excellent => counts.excellent += 1,
                Tier::Good => counts.good += 1,
                Tier::NeedsImprovement => counts.needs_improvement += 1,
            }
            counts
        })
}

/// A stateless calculator turning scanned grade columns into a `GradeReport`.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes every row of the dashboard. Each column is summarized on its
    /// own; the overall row uses the stored averages, not a recomputation.
    pub fn calculate(&self, columns: &GradeColumns) -> GradeReport {
        let report = GradeReport {
            math: Self::summarize(&columns.math),
            science: Self::summarize(&columns.science),
            english: Self::summarize(&columns.english),
            overall: Self::summarize(&columns.averages),
            distribution: tier_counts(&columns.averages),
        };
        tracing::debug!(
            students = report.overall.count,
            overall_mean = report.overall.mean,
            "Grade report calculated."
        );
        report
    }

    fn summarize(values: &[f64]) -> SubjectStats {
        SubjectStats {
            highest: max(values),
            lowest: min(values),
            mean: mean(values),
            count: values.len(),
        }
    }
}
