//! CGPA command handler

use gradepoint::core::cgpa::{CgpaCalculator, CgpaSummary, PriorRecord, Projection};
use gradepoint::core::models::CourseSpec;
use gradepoint::core::report::{
    HtmlReporter, MarkdownReporter, ReportContext, ReportFormat, ReportGenerator,
};
use gradepoint::{error, info, verbose};
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

/// Prior record as typed on the command line; missing values read as blank
#[derive(Debug, Clone, Default)]
pub struct PriorArgs {
    /// CGPA before this term
    pub cgpa: Option<String>,
    /// Credits completed before this term
    pub credits: Option<String>,
    /// Subjects completed before this term
    pub subjects: Option<String>,
}

impl PriorArgs {
    fn record(&self) -> PriorRecord {
        PriorRecord::from_form(
            self.cgpa.as_deref().unwrap_or_default(),
            self.credits.as_deref().unwrap_or_default(),
            self.subjects.as_deref().unwrap_or_default(),
        )
    }
}

/// Requested report output
#[derive(Debug, Clone)]
pub struct ReportRequest<'a> {
    /// Format name (markdown, html)
    pub format: &'a str,
    /// Explicit output path
    pub output: Option<PathBuf>,
    /// Directory used when `output` is absent
    pub reports_dir: &'a str,
}

/// Run the cgpa command
pub fn run(
    prior: &PriorArgs,
    courses: &[CourseSpec],
    target: Option<(f64, f64)>,
    report: Option<ReportRequest<'_>>,
) {
    let calculator = build(prior, courses);
    let projection = target.map(|(cgpa, credits)| calculator.project(cgpa, credits));

    info!(
        "CGPA over {} courses: semester {:.2}, cumulative {:.2}",
        calculator.courses().len(),
        calculator.summary().semester_gpa,
        calculator.summary().cumulative_cgpa
    );
    print!("{}", render(calculator.summary(), projection.as_ref()));

    if let Some(request) = report {
        if let Err(err) = write_report(&calculator, projection.as_ref(), &request) {
            error!("Report generation failed: {err}");
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

/// Build a calculator session from the prior record and courses
pub fn build(prior: &PriorArgs, courses: &[CourseSpec]) -> CgpaCalculator {
    let mut calculator = CgpaCalculator::new();
    calculator.set_prior(prior.record());
    for spec in courses {
        let id = calculator.add_course(&spec.name, spec.credits, spec.grade);
        verbose!("Added course {id}: {} ({} credits, {})", spec.name, spec.credits, spec.grade);
    }
    calculator
}

/// Format the summary, histogram, standing and projection
pub fn render(summary: &CgpaSummary, projection: Option<&Projection>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== CGPA Summary ===\n");
    let _ = writeln!(out, "  Semester GPA:    {:.2}", summary.semester_gpa);
    let _ = writeln!(out, "  Cumulative CGPA: {:.2}", summary.cumulative_cgpa);
    let _ = writeln!(out, "  Total credits:   {:.1}", summary.total_credits);
    let _ = writeln!(out, "  Total subjects:  {}", summary.total_subjects);

    let dist = &summary.distribution;
    let _ = writeln!(out, "\n  Grade distribution ({} courses)", dist.total());
    for (label, count) in [
        ("S (10)", dist.s),
        ("A (9)", dist.a),
        ("B (8)", dist.b),
        ("C (7)", dist.c),
        ("Others", dist.others),
    ] {
        let _ = writeln!(out, "    {label:<7} {count:>3} {}", "#".repeat(count));
    }

    let _ = writeln!(
        out,
        "\n  Standing: {}\n  {}",
        summary.standing,
        summary.standing.message()
    );

    if let Some(p) = projection {
        let _ = writeln!(
            out,
            "\n  Target {:.2} over {:.1} more credits:",
            p.target_cgpa, p.future_credits
        );
        match p.required_gpa {
            Some(gpa) if p.possible => {
                let _ = writeln!(out, "    ✓ Required GPA {gpa:.2}");
            }
            Some(gpa) => {
                let _ = writeln!(out, "    ✗ Not achievable (would need {gpa:.2})");
            }
            None => {
                let _ = writeln!(out, "    ✗ Not achievable without future credits");
            }
        }
    }
    out
}

/// Default report path inside `reports_dir`
fn default_report_path(reports_dir: &str, format: ReportFormat) -> PathBuf {
    let dir = if reports_dir.is_empty() { "." } else { reports_dir };
    Path::new(dir).join(format!("cgpa_report.{}", format.extension()))
}

/// Render the session to a report file
///
/// # Errors
/// Returns a user-facing message if the format is unknown or the file cannot
/// be written.
pub fn write_report(
    calculator: &CgpaCalculator,
    projection: Option<&Projection>,
    request: &ReportRequest<'_>,
) -> Result<PathBuf, String> {
    let format: ReportFormat = request.format.parse().map_err(|e| format!("✗ {e}"))?;
    let path = request
        .output
        .clone()
        .unwrap_or_else(|| default_report_path(request.reports_dir, format));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| format!("✗ Cannot create {}: {e}", parent.display()))?;
    }

    let ctx = ReportContext::new(
        "CGPA Report",
        calculator.prior(),
        calculator.courses(),
        calculator.summary(),
        projection,
    );
    let result = match format {
        ReportFormat::Markdown => MarkdownReporter::new().generate(&ctx, &path),
        ReportFormat::Html => HtmlReporter::new().generate(&ctx, &path),
    };
    result.map_err(|e| format!("✗ Failed to write {}: {e}", path.display()))?;

    info!("Wrote {format} report to {}", path.display());
    println!("✓ Report generated: {}", path.display());
    Ok(path)
}
