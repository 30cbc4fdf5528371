//! Markdown report generator
//!
//! Generates CGPA reports as Markdown tables. These reports render well in
//! GitHub, GitLab, and VS Code.

use crate::core::report::{BucketRow, CourseRow, ProjectionView, ReportContext, ReportGenerator};
use askama::Template;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Template)]
#[template(path = "cgpa_report.md", escape = "none")]
struct MarkdownTemplate<'a> {
    ctx: &'a ReportContext<'a>,
    rows: Vec<CourseRow>,
    buckets: Vec<BucketRow>,
    projection: Option<ProjectionView>,
}

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let report_content = self.render(ctx)?;
        fs::write(output_path, report_content)?;
        Ok(())
    }

    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        let template = MarkdownTemplate {
            ctx,
            rows: ctx.course_rows(),
            buckets: ctx.distribution(),
            projection: ctx.projection_view(),
        };
        Ok(template.render()?)
    }
}
