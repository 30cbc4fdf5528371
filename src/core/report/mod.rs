//! Report generation for CGPA summaries
//!
//! This module renders a calculator session (prior record, current courses,
//! summary and optional projection) as a Markdown or HTML document.

pub mod formats;

use crate::core::cgpa::{CgpaSummary, PriorRecord, Projection};
use crate::core::models::Course;
use std::error::Error;
use std::path::Path;

pub use formats::{HtmlReporter, MarkdownReporter, ReportFormat};

/// Data context for report generation
///
/// This struct aggregates all data needed to render a CGPA report,
/// providing a single source of truth for templates.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    /// Report heading
    pub title: String,
    /// Record before the current term
    pub prior: &'a PriorRecord,
    /// Courses of the current term
    pub courses: &'a [Course],
    /// Aggregated result
    pub summary: &'a CgpaSummary,
    /// Target projection, if one was requested
    pub projection: Option<&'a Projection>,
}

/// One course as shown in a report table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRow {
    /// Session-local id
    pub id: u32,
    /// Course name
    pub name: String,
    /// Credits, 1 decimal place
    pub credits: String,
    /// Grade point
    pub grade: u8,
    /// Credit-weighted points, 1 decimal place
    pub weighted: String,
}

/// One histogram bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketRow {
    /// Bucket label
    pub label: &'static str,
    /// Courses in the bucket
    pub count: usize,
    /// Share of all courses, whole percent
    pub percent: usize,
}

/// Projection as shown in a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionView {
    /// Target CGPA, 2 decimal places
    pub target: String,
    /// Future credits, 1 decimal place
    pub future_credits: String,
    /// Required GPA or "n/a"
    pub required: String,
    /// "Achievable" or "Not achievable"
    pub verdict: &'static str,
}

impl<'a> ReportContext<'a> {
    /// Create a new report context
    #[must_use]
    pub fn new(
        title: &str,
        prior: &'a PriorRecord,
        courses: &'a [Course],
        summary: &'a CgpaSummary,
        projection: Option<&'a Projection>,
    ) -> Self {
        Self {
            title: title.to_string(),
            prior,
            courses,
            summary,
            projection,
        }
    }

    /// Semester GPA, 2 decimal places
    #[must_use]
    pub fn semester_gpa(&self) -> String {
        format!("{:.2}", self.summary.semester_gpa)
    }

    /// Cumulative CGPA, 2 decimal places
    #[must_use]
    pub fn cumulative_cgpa(&self) -> String {
        format!("{:.2}", self.summary.cumulative_cgpa)
    }

    /// Prior CGPA, 2 decimal places
    #[must_use]
    pub fn prior_cgpa(&self) -> String {
        format!("{:.2}", self.prior.cgpa)
    }

    /// Prior credits, 1 decimal place
    #[must_use]
    pub fn prior_credits(&self) -> String {
        format!("{:.1}", self.prior.credits)
    }

    /// Credits of the current term, 1 decimal place
    #[must_use]
    pub fn current_credits(&self) -> String {
        format!("{:.1}", self.summary.current_credits)
    }

    /// Total credits, 1 decimal place
    #[must_use]
    pub fn total_credits(&self) -> String {
        format!("{:.1}", self.summary.total_credits)
    }

    /// Course table rows
    #[must_use]
    pub fn course_rows(&self) -> Vec<CourseRow> {
        self.courses
            .iter()
            .map(|c| CourseRow {
                id: c.id,
                name: c.name.clone(),
                credits: format!("{:.1}", c.credits),
                grade: c.grade.value(),
                weighted: format!("{:.1}", c.weighted_points()),
            })
            .collect()
    }

    /// Grade histogram rows, best bucket first
    #[must_use]
    pub fn distribution(&self) -> Vec<BucketRow> {
        let dist = &self.summary.distribution;
        let total = dist.total();
        [
            ("S (10)", dist.s),
            ("A (9)", dist.a),
            ("B (8)", dist.b),
            ("C (7)", dist.c),
            ("Others", dist.others),
        ]
        .into_iter()
        .map(|(label, count)| BucketRow {
            label,
            count,
            percent: if total == 0 { 0 } else { count * 100 / total },
        })
        .collect()
    }

    /// Projection summary, if a projection was requested
    #[must_use]
    pub fn projection_view(&self) -> Option<ProjectionView> {
        self.projection.map(|p| ProjectionView {
            target: format!("{:.2}", p.target_cgpa),
            future_credits: format!("{:.1}", p.future_credits),
            required: p
                .required_gpa
                .map_or_else(|| "n/a".to_string(), |gpa| format!("{gpa:.2}")),
            verdict: if p.possible {
                "Achievable"
            } else {
                "Not achievable"
            },
        })
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report to a file
    ///
    /// # Errors
    /// Returns an error if report generation or file writing fails
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>>;

    /// Generate report content as a string
    ///
    /// # Errors
    /// Returns an error if report generation fails
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>>;
}
