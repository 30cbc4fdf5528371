//! Course model for the CGPA calculator

use super::GradePoint;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A course taken in the current term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Session-local identifier
    pub id: u32,

    /// Course name (e.g., "Programming in Python")
    pub name: String,

    /// Credit value (can be fractional)
    pub credits: f64,

    /// Grade point earned
    pub grade: GradePoint,
}

impl Course {
    /// Create a new course
    ///
    /// # Arguments
    /// * `id` - Session-local identifier
    /// * `name` - Course name
    /// * `credits` - Credit value
    /// * `grade` - Grade point earned
    #[must_use]
    pub const fn new(id: u32, name: String, credits: f64, grade: GradePoint) -> Self {
        Self {
            id,
            name,
            credits,
            grade,
        }
    }

    /// Credits that count toward weighted averages (non-positive credits count as 0)
    #[must_use]
    pub fn effective_credits(&self) -> f64 {
        if self.credits.is_finite() && self.credits > 0.0 {
            self.credits
        } else {
            0.0
        }
    }

    /// Grade points weighted by credits
    #[must_use]
    pub fn weighted_points(&self) -> f64 {
        f64::from(self.grade.value()) * self.effective_credits()
    }
}

/// Course entry as typed on the command line: `NAME:CREDITS:GRADE`
///
/// The name may itself contain `:`; the last two segments are credits and grade.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseSpec {
    /// Course name
    pub name: String,
    /// Credit value
    pub credits: f64,
    /// Grade point
    pub grade: GradePoint,
}

impl FromStr for CourseSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.rsplitn(3, ':');
        let grade_str = parts.next().unwrap_or_default();
        let credits_str = parts
            .next()
            .ok_or_else(|| format!("Invalid course '{s}': expected NAME:CREDITS:GRADE"))?;
        let name = parts
            .next()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| format!("Invalid course '{s}': missing course name"))?;

        let credits = credits_str
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("Invalid credits '{credits_str}' for course '{name}'"))?;
        let grade = grade_str.parse::<GradePoint>()?;

        Ok(Self {
            name: name.to_string(),
            credits,
            grade,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grade(value: u8) -> GradePoint {
        GradePoint::new(value).expect("valid grade point")
    }

    #[test]
    fn test_course_creation() {
        let course = Course::new(1, "Programming in Python".to_string(), 4.0, grade(9));

        assert_eq!(course.id, 1);
        assert_eq!(course.name, "Programming in Python");
        assert!((course.credits - 4.0).abs() < f64::EPSILON);
        assert_eq!(course.grade.value(), 9);
    }

    #[test]
    fn test_weighted_points() {
        let course = Course::new(1, "Stats 1".to_string(), 4.0, grade(8));
        assert!((course.weighted_points() - 32.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_positive_credits_do_not_count() {
        let course = Course::new(1, "Audit".to_string(), -2.0, grade(10));
        assert!(course.effective_credits().abs() < f64::EPSILON);
        assert!(course.weighted_points().abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_course_spec() {
        let spec: CourseSpec = "Maths 1:4:10".parse().expect("valid spec");
        assert_eq!(spec.name, "Maths 1");
        assert!((spec.credits - 4.0).abs() < f64::EPSILON);
        assert_eq!(spec.grade.value(), 10);
    }

    #[test]
    fn test_parse_course_spec_with_colon_in_name() {
        let spec: CourseSpec = "BDM: Case Studies:3:A".parse().expect("valid spec");
        assert_eq!(spec.name, "BDM: Case Studies");
        assert_eq!(spec.grade.value(), 9);
    }

    #[test]
    fn test_parse_course_spec_errors() {
        assert!("Maths".parse::<CourseSpec>().is_err());
        assert!(":4:10".parse::<CourseSpec>().is_err());
        assert!("Maths:four:10".parse::<CourseSpec>().is_err());
        assert!("Maths:4:3".parse::<CourseSpec>().is_err());
    }
}
