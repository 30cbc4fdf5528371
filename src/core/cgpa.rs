//! CGPA aggregation and target projection
//!
//! Combines the current term's courses with a prior cumulative record into a
//! semester GPA, a new cumulative CGPA, a grade histogram and a standing
//! band. [`CgpaCalculator`] keeps the session state and recomputes the
//! summary on every change.

use crate::core::grading::round2;
use crate::core::input::parse_lenient;
use crate::core::models::{Course, GradeBucket, GradePoint};
use std::fmt;

/// Completed record before the current term
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriorRecord {
    /// CGPA so far
    pub cgpa: f64,
    /// Credits completed so far
    pub credits: f64,
    /// Subjects completed so far
    pub subjects: u32,
}

impl PriorRecord {
    /// Read a prior record from form text; blank or invalid text reads as 0
    ///
    /// Negative credits and subject counts read as 0.
    #[must_use]
    pub fn from_form(cgpa: &str, credits: &str, subjects: &str) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let subjects = parse_lenient(subjects).clamp(0.0, f64::from(u32::MAX)) as u32;
        Self {
            cgpa: parse_lenient(cgpa),
            credits: parse_lenient(credits).max(0.0),
            subjects,
        }
    }
}

/// Count of courses per grade bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GradeDistribution {
    /// 10-point courses
    pub s: usize,
    /// 9-point courses
    pub a: usize,
    /// 8-point courses
    pub b: usize,
    /// 7-point courses
    pub c: usize,
    /// Courses below 7 points
    pub others: usize,
}

impl GradeDistribution {
    /// Histogram of the given courses
    #[must_use]
    pub fn from_courses(courses: &[Course]) -> Self {
        let mut dist = Self::default();
        for course in courses {
            dist.add(course.grade);
        }
        dist
    }

    fn add(&mut self, grade: GradePoint) {
        match grade.bucket() {
            GradeBucket::S => self.s += 1,
            GradeBucket::A => self.a += 1,
            GradeBucket::B => self.b += 1,
            GradeBucket::C => self.c += 1,
            GradeBucket::Others => self.others += 1,
        }
    }

    /// Number of courses counted
    #[must_use]
    pub const fn total(&self) -> usize {
        self.s + self.a + self.b + self.c + self.others
    }
}

/// Qualitative band of a cumulative CGPA
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    /// CGPA ≥ 9.0
    Outstanding,
    /// CGPA ≥ 8.0
    VeryGood,
    /// CGPA ≥ 7.0
    Good,
    /// CGPA ≥ 6.0
    Satisfactory,
    /// CGPA < 6.0
    ActionRequired,
}

impl Standing {
    /// Band for a CGPA
    #[must_use]
    pub fn from_cgpa(cgpa: f64) -> Self {
        if cgpa >= 9.0 {
            Self::Outstanding
        } else if cgpa >= 8.0 {
            Self::VeryGood
        } else if cgpa >= 7.0 {
            Self::Good
        } else if cgpa >= 6.0 {
            Self::Satisfactory
        } else {
            Self::ActionRequired
        }
    }

    /// Display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Outstanding => "Outstanding",
            Self::VeryGood => "Very Good",
            Self::Good => "Good",
            Self::Satisfactory => "Satisfactory",
            Self::ActionRequired => "Action Required",
        }
    }

    /// Short advisory message
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Outstanding => "Excellent work. Keep up the consistency.",
            Self::VeryGood => "Strong performance with room to reach the top band.",
            Self::Good => "Solid progress. Target the quizzes to push higher.",
            Self::Satisfactory => "On track, but a few strong terms would help.",
            Self::ActionRequired => "Below 6.0. Plan upcoming terms carefully.",
        }
    }
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregated result for the current term and overall record
#[derive(Debug, Clone, PartialEq)]
pub struct CgpaSummary {
    /// Credit-weighted GPA of the current courses (0 without credits)
    pub semester_gpa: f64,
    /// Credit-weighted CGPA including the prior record (0 without credits)
    pub cumulative_cgpa: f64,
    /// Prior plus current credits
    pub total_credits: f64,
    /// Prior plus current subject count
    pub total_subjects: u32,
    /// Credits of the current courses
    pub current_credits: f64,
    /// Histogram of current grades
    pub distribution: GradeDistribution,
    /// Band of `cumulative_cgpa` as displayed, to 2 decimal places
    pub standing: Standing,
}

/// Aggregate a prior record with the current courses
#[must_use]
pub fn summarize(prior: &PriorRecord, courses: &[Course]) -> CgpaSummary {
    let current_credits: f64 = courses.iter().map(Course::effective_credits).sum();
    let current_points: f64 = courses.iter().map(Course::weighted_points).sum();

    let semester_gpa = if current_credits > 0.0 {
        current_points / current_credits
    } else {
        0.0
    };

    let total_credits = prior.credits + current_credits;
    let cumulative_cgpa = if total_credits > 0.0 {
        prior.cgpa.mul_add(prior.credits, current_points) / total_credits
    } else {
        0.0
    };

    let course_count = u32::try_from(courses.len()).unwrap_or(u32::MAX);

    CgpaSummary {
        semester_gpa,
        cumulative_cgpa,
        total_credits,
        total_subjects: prior.subjects.saturating_add(course_count),
        current_credits,
        distribution: GradeDistribution::from_courses(courses),
        standing: Standing::from_cgpa(round2(cumulative_cgpa)),
    }
}

/// GPA needed over future credits to reach a target CGPA
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Desired CGPA
    pub target_cgpa: f64,
    /// Credits still to be taken
    pub future_credits: f64,
    /// Required GPA; `None` when there are no future credits
    pub required_gpa: Option<f64>,
    /// Whether the required GPA lies in `[0, 10]`
    pub possible: bool,
}

/// Project the GPA needed on `future_credits` more credits to end at `target_cgpa`
#[must_use]
pub fn project(summary: &CgpaSummary, target_cgpa: f64, future_credits: f64) -> Projection {
    let required_gpa = (future_credits > 0.0).then(|| {
        target_cgpa.mul_add(
            summary.total_credits + future_credits,
            -(summary.cumulative_cgpa * summary.total_credits),
        ) / future_credits
    });
    Projection {
        target_cgpa,
        future_credits,
        required_gpa,
        possible: required_gpa.is_some_and(|gpa| (0.0..=10.0).contains(&gpa)),
    }
}

/// Calculator session: prior record, current course list and cached summary
#[derive(Debug, Clone)]
pub struct CgpaCalculator {
    prior: PriorRecord,
    courses: Vec<Course>,
    next_id: u32,
    summary: CgpaSummary,
}

impl Default for CgpaCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl CgpaCalculator {
    /// Empty session
    #[must_use]
    pub fn new() -> Self {
        let prior = PriorRecord::default();
        Self {
            prior,
            courses: Vec::new(),
            next_id: 1,
            summary: summarize(&prior, &[]),
        }
    }

    fn recompute(&mut self) {
        self.summary = summarize(&self.prior, &self.courses);
    }

    /// Replace the prior record
    pub fn set_prior(&mut self, prior: PriorRecord) {
        self.prior = prior;
        self.recompute();
    }

    /// Add a course and return its id
    pub fn add_course(&mut self, name: &str, credits: f64, grade: GradePoint) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.courses
            .push(Course::new(id, name.to_string(), credits, grade));
        self.recompute();
        id
    }

    /// Replace the fields of an existing course
    ///
    /// # Errors
    /// Returns an error if no course has this id.
    pub fn update_course(
        &mut self,
        id: u32,
        name: &str,
        credits: f64,
        grade: GradePoint,
    ) -> Result<(), String> {
        let course = self
            .courses
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| format!("No course with id {id}"))?;
        course.name = name.to_string();
        course.credits = credits;
        course.grade = grade;
        self.recompute();
        Ok(())
    }

    /// Remove a course, returning it if it existed
    pub fn remove_course(&mut self, id: u32) -> Option<Course> {
        let index = self.courses.iter().position(|c| c.id == id)?;
        let removed = self.courses.remove(index);
        self.recompute();
        Some(removed)
    }

    /// Remove every course
    pub fn clear_courses(&mut self) {
        self.courses.clear();
        self.recompute();
    }

    /// Current prior record
    #[must_use]
    pub const fn prior(&self) -> &PriorRecord {
        &self.prior
    }

    /// Current courses in insertion order
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Summary of the current state
    #[must_use]
    pub const fn summary(&self) -> &CgpaSummary {
        &self.summary
    }

    /// Projection from the current summary
    #[must_use]
    pub fn project(&self, target_cgpa: f64, future_credits: f64) -> Projection {
        project(&self.summary, target_cgpa, future_credits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gp(value: u8) -> GradePoint {
        GradePoint::new(value).expect("valid grade point")
    }

    #[test]
    fn semester_and_cumulative_with_prior() {
        let prior = PriorRecord::from_form("8.0", "40", "10");
        let courses = vec![Course::new(1, "Python".to_string(), 4.0, gp(10))];
        let summary = summarize(&prior, &courses);
        assert!((summary.semester_gpa - 10.0).abs() < 1e-12);
        assert!((summary.cumulative_cgpa - 360.0 / 44.0).abs() < 1e-12);
        assert!((summary.total_credits - 44.0).abs() < 1e-12);
        assert_eq!(summary.total_subjects, 11);
        assert_eq!(summary.standing, Standing::VeryGood);
    }

    #[test]
    fn empty_session_is_all_zero() {
        let calc = CgpaCalculator::new();
        let summary = calc.summary();
        assert!(summary.semester_gpa.abs() < f64::EPSILON);
        assert!(summary.cumulative_cgpa.abs() < f64::EPSILON);
        assert_eq!(summary.distribution.total(), 0);
        assert_eq!(summary.standing, Standing::ActionRequired);
    }

    #[test]
    fn prior_form_reads_blank_and_invalid_as_zero() {
        let prior = PriorRecord::from_form("", "abc", "-3");
        assert_eq!(prior, PriorRecord::default());
        let prior = PriorRecord::from_form("7.5", "20.5", "6.9");
        assert_eq!(prior.subjects, 6);
        assert!((prior.credits - 20.5).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_credit_courses_count_in_histogram_only() {
        let courses = vec![
            Course::new(1, "A".to_string(), 4.0, gp(8)),
            Course::new(2, "B".to_string(), 0.0, gp(10)),
        ];
        let summary = summarize(&PriorRecord::default(), &courses);
        assert!((summary.semester_gpa - 8.0).abs() < 1e-12);
        assert_eq!(summary.total_subjects, 2);
        assert_eq!(summary.distribution.s, 1);
        assert_eq!(summary.distribution.b, 1);
    }

    #[test]
    fn standing_thresholds_are_inclusive() {
        assert_eq!(Standing::from_cgpa(9.0), Standing::Outstanding);
        assert_eq!(Standing::from_cgpa(8.99), Standing::VeryGood);
        assert_eq!(Standing::from_cgpa(8.0), Standing::VeryGood);
        assert_eq!(Standing::from_cgpa(7.0), Standing::Good);
        assert_eq!(Standing::from_cgpa(6.0), Standing::Satisfactory);
        assert_eq!(Standing::from_cgpa(5.99), Standing::ActionRequired);
    }

    #[test]
    fn standing_follows_displayed_cgpa() {
        let prior = PriorRecord {
            cgpa: 8.997,
            credits: 10.0,
            subjects: 3,
        };
        let summary = summarize(&prior, &[]);
        assert_eq!(format!("{:.2}", summary.cumulative_cgpa), "9.00");
        assert_eq!(summary.standing, Standing::Outstanding);

        let prior = PriorRecord {
            cgpa: 8.994,
            ..prior
        };
        assert_eq!(summarize(&prior, &[]).standing, Standing::VeryGood);
    }

    #[test]
    fn projection_formula_and_guards() {
        let prior = PriorRecord {
            cgpa: 7.0,
            credits: 40.0,
            subjects: 10,
        };
        let summary = summarize(&prior, &[]);
        let p = project(&summary, 8.0, 40.0);
        // (8 × 80 − 7 × 40) / 40 = 9
        assert!((p.required_gpa.expect("defined") - 9.0).abs() < 1e-12);
        assert!(p.possible);

        let p = project(&summary, 9.5, 20.0);
        assert!(p.required_gpa.expect("defined") > 10.0);
        assert!(!p.possible);

        let p = project(&summary, 8.0, 0.0);
        assert_eq!(p.required_gpa, None);
        assert!(!p.possible);
    }

    #[test]
    fn calculator_recomputes_on_every_change() {
        let mut calc = CgpaCalculator::new();
        let first = calc.add_course("Maths 1", 4.0, gp(9));
        let second = calc.add_course("Stats 1", 4.0, gp(7));
        assert_eq!((first, second), (1, 2));
        assert!((calc.summary().semester_gpa - 8.0).abs() < 1e-12);

        calc.update_course(second, "Stats 1", 4.0, gp(9)).expect("exists");
        assert!((calc.summary().semester_gpa - 9.0).abs() < 1e-12);
        assert!(calc.update_course(99, "X", 1.0, gp(9)).is_err());

        calc.set_prior(PriorRecord {
            cgpa: 6.0,
            credits: 8.0,
            subjects: 2,
        });
        assert!((calc.summary().cumulative_cgpa - 7.5).abs() < 1e-12);

        assert!(calc.remove_course(first).is_some());
        assert!(calc.remove_course(first).is_none());
        assert_eq!(calc.courses().len(), 1);

        calc.clear_courses();
        assert_eq!(calc.summary().distribution.total(), 0);
        assert_eq!(calc.add_course("Next", 4.0, gp(8)), 3);
    }
}
