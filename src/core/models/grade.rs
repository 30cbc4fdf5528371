//! Letter grades, grade points and computed results

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Letter grade on the institute's scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    /// Score ≥ 90
    S,
    /// Score ≥ 80
    A,
    /// Score ≥ 70
    B,
    /// Score ≥ 60
    C,
    /// Score ≥ 50
    D,
    /// Score ≥ 40
    E,
    /// Score < 40
    U,
}

impl LetterGrade {
    /// Every grade, best first
    pub const ALL: [Self; 7] = [Self::S, Self::A, Self::B, Self::C, Self::D, Self::E, Self::U];

    /// Grades a prediction can target, best first
    pub const PASSING: [Self; 6] = [Self::S, Self::A, Self::B, Self::C, Self::D, Self::E];

    /// Minimum score (inclusive) for this grade
    #[must_use]
    pub const fn threshold(self) -> f64 {
        match self {
            Self::S => 90.0,
            Self::A => 80.0,
            Self::B => 70.0,
            Self::C => 60.0,
            Self::D => 50.0,
            Self::E => 40.0,
            Self::U => 0.0,
        }
    }

    /// Grade points awarded. E is worth 4; there is no 5-point letter.
    #[must_use]
    pub const fn points(self) -> u8 {
        match self {
            Self::S => 10,
            Self::A => 9,
            Self::B => 8,
            Self::C => 7,
            Self::D => 6,
            Self::E => 4,
            Self::U => 0,
        }
    }

    /// Single-letter form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::U => "U",
        }
    }
}

impl FromStr for LetterGrade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(Self::S),
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            "E" => Ok(Self::E),
            "U" => Ok(Self::U),
            _ => Err(format!("Unknown letter grade: '{s}' (expected S, A, B, C, D, E or U)")),
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of grading one subject
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradeResult {
    /// Total score in `[0, 100]`, rounded to 2 decimal places
    pub score: f64,
    /// Letter grade for `score`
    pub letter: LetterGrade,
    /// Grade points for `score`
    pub points: u8,
}

/// Why a prediction is or is not possible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PredictionStatus {
    /// The target is reachable with a score inside the free component's bounds
    Achievable,
    /// The target is reached even with the minimum score on the free component
    AlreadySecured,
    /// The target is out of reach even with the maximum score on the free component
    Unattainable,
}

/// Required score on the free component to reach one target grade
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Target letter grade
    pub target: LetterGrade,
    /// Score needed on the free component, `None` unless `possible`
    pub required: Option<f64>,
    /// `true` when `required` lies within the free component's bounds
    pub possible: bool,
    /// Total score the subject ends at for the chosen free-component value
    pub final_grade: f64,
    /// Detailed outcome
    pub status: PredictionStatus,
}

/// Grade-point key of a course in the CGPA calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GradePoint(u8);

impl GradePoint {
    /// Accepted grade-point values, best first
    pub const VALUES: [u8; 8] = [10, 9, 8, 7, 6, 5, 4, 0];

    /// Build a grade point, rejecting values outside [`Self::VALUES`]
    ///
    /// # Errors
    /// Returns an error message for unsupported values.
    pub fn new(value: u8) -> Result<Self, String> {
        if Self::VALUES.contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!(
                "Unsupported grade point: {value} (expected one of 10, 9, 8, 7, 6, 5, 4, 0)"
            ))
        }
    }

    /// Numeric value
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Histogram bucket for the grade distribution
    #[must_use]
    pub const fn bucket(self) -> GradeBucket {
        match self.0 {
            10 => GradeBucket::S,
            9 => GradeBucket::A,
            8 => GradeBucket::B,
            7 => GradeBucket::C,
            _ => GradeBucket::Others,
        }
    }
}

impl From<LetterGrade> for GradePoint {
    fn from(letter: LetterGrade) -> Self {
        Self(letter.points())
    }
}

impl FromStr for GradePoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(value) = trimmed.parse::<u8>() {
            return Self::new(value);
        }
        trimmed
            .parse::<LetterGrade>()
            .map(Self::from)
            .map_err(|_| format!("Invalid grade: '{s}' (use a grade point or a letter)"))
    }
}

impl TryFrom<String> for GradePoint {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GradePoint> for String {
    fn from(value: GradePoint) -> Self {
        value.0.to_string()
    }
}

impl fmt::Display for GradePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Buckets of the CGPA grade distribution histogram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeBucket {
    /// 10 points
    S,
    /// 9 points
    A,
    /// 8 points
    B,
    /// 7 points
    C,
    /// Anything below 7
    Others,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_scale_skips_five() {
        let points: Vec<u8> = LetterGrade::ALL.iter().map(|g| g.points()).collect();
        assert_eq!(points, vec![10, 9, 8, 7, 6, 4, 0]);
    }

    #[test]
    fn thresholds_descend() {
        for pair in LetterGrade::ALL.windows(2) {
            assert!(pair[0].threshold() > pair[1].threshold());
        }
    }

    #[test]
    fn parses_letters() {
        assert_eq!("s".parse::<LetterGrade>(), Ok(LetterGrade::S));
        assert_eq!(" E ".parse::<LetterGrade>(), Ok(LetterGrade::E));
        assert!("F".parse::<LetterGrade>().is_err());
    }

    #[test]
    fn grade_point_accepts_numbers_and_letters() {
        assert_eq!("10".parse::<GradePoint>().map(GradePoint::value), Ok(10));
        assert_eq!("5".parse::<GradePoint>().map(GradePoint::value), Ok(5));
        assert_eq!("A".parse::<GradePoint>().map(GradePoint::value), Ok(9));
        assert_eq!("E".parse::<GradePoint>().map(GradePoint::value), Ok(4));
        assert!("3".parse::<GradePoint>().is_err());
        assert!("x".parse::<GradePoint>().is_err());
    }

    #[test]
    fn grade_point_buckets() {
        assert_eq!(GradePoint(10).bucket(), GradeBucket::S);
        assert_eq!(GradePoint(7).bucket(), GradeBucket::C);
        assert_eq!(GradePoint(6).bucket(), GradeBucket::Others);
        assert_eq!(GradePoint(0).bucket(), GradeBucket::Others);
    }
}
