//! The derived-field calculator. Pure functions, no I/O.

use crate::enums::Tier;

/// Arithmetic mean of the three subject grades.
pub fn average(math: f64, science: f64, english: f64) -> f64 {
    (math + science + english) / 3.0
}

/// The `remarks` tier for a set of grades.
pub fn remarks(math: f64, science: f64, english: f64) -> Tier {
    Tier::from_average(average(math, science, english))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn average_is_the_arithmetic_mean() {
        assert!((average(95.0, 92.0, 91.0) - 92.666_666_666_666_67).abs() < EPSILON);
        assert!((average(70.0, 60.0, 65.0) - 65.0).abs() < EPSILON);
        assert!((average(0.0, 0.0, 0.0)).abs() < EPSILON);
        assert!((average(100.0, 100.0, 100.0) - 100.0).abs() < EPSILON);
    }

    #[test]
    fn average_over_a_grid_matches_manual_mean() {
        let steps = [0.0, 12.5, 33.3, 74.9, 75.0, 89.99, 90.0, 100.0];
        for &m in &steps {
            for &s in &steps {
                for &e in &steps {
                    let expected = (m + s + e) / 3.0;
                    assert!((average(m, s, e) - expected).abs() < EPSILON);
                    assert_eq!(remarks(m, s, e), Tier::from_average(expected));
                }
            }
        }
    }

    #[test]
    fn remarks_follow_the_tier_table() {
        assert_eq!(remarks(95.0, 92.0, 91.0), Tier::Excellent);
        assert_eq!(remarks(80.0, 75.0, 70.0), Tier::Good);
        assert_eq!(remarks(70.0, 60.0, 65.0), Tier::NeedsImprovement);
    }
}
