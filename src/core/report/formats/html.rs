//! HTML report generator
//!
//! Generates CGPA reports as a single self-contained HTML page with embedded
//! CSS. Course names are HTML-escaped by the template engine.

use crate::core::report::{BucketRow, CourseRow, ProjectionView, ReportContext, ReportGenerator};
use askama::Template;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Template)]
#[template(path = "cgpa_report.html")]
struct HtmlTemplate<'a> {
    ctx: &'a ReportContext<'a>,
    rows: Vec<CourseRow>,
    buckets: Vec<BucketRow>,
    projection: Option<ProjectionView>,
    standing_class: &'static str,
}

/// CSS class for a standing band
fn standing_class(ctx: &ReportContext) -> &'static str {
    use crate::core::cgpa::Standing;
    match ctx.summary.standing {
        Standing::Outstanding => "outstanding",
        Standing::VeryGood => "very-good",
        Standing::Good => "good",
        Standing::Satisfactory => "satisfactory",
        Standing::ActionRequired => "action-required",
    }
}

/// HTML report generator
pub struct HtmlReporter;

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for HtmlReporter {
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let report_content = self.render(ctx)?;
        fs::write(output_path, report_content)?;
        Ok(())
    }

    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        let template = HtmlTemplate {
            ctx,
            rows: ctx.course_rows(),
            buckets: ctx.distribution(),
            projection: ctx.projection_view(),
            standing_class: standing_class(ctx),
        };
        Ok(template.render()?)
    }
}
