//! Subjects command handler

use gradepoint::core::models::Subject;
use gradepoint::core::Catalog;
use gradepoint::verbose;
use std::fmt::Write;

/// Print the subjects offered at `level` for `branch`
pub fn run(catalog: &Catalog, level: &str, branch: &str, show_formulas: bool) {
    print!("{}", listing(catalog, level, branch, show_formulas));
}

/// Subjects for `level` and `branch`, or every bucket when no level is set
pub fn listing(catalog: &Catalog, level: &str, branch: &str, show_formulas: bool) -> String {
    if !level.trim().is_empty() {
        verbose!("Resolved bucket: {}", catalog.bucket_key(level, branch));
        return render(catalog.subjects(level, branch), level, branch, show_formulas);
    }

    verbose!("No level given, listing every bucket");
    let mut out = String::new();
    for (bucket, subjects) in catalog.buckets() {
        out.push_str(&render_titled(subjects, bucket, show_formulas));
    }
    let _ = writeln!(out, "\nPass --level to list a single level.");
    out
}

/// Format a subject listing; an empty listing is a normal result
pub fn render(subjects: &[Subject], level: &str, branch: &str, show_formulas: bool) -> String {
    if subjects.is_empty() {
        return format!("No subjects found for {level} ({branch})\n");
    }
    render_titled(subjects, &format!("{level} ({branch})"), show_formulas)
}

fn render_titled(subjects: &[Subject], title: &str, show_formulas: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== Subjects: {title} ===\n");
    for subject in subjects {
        let predictable = if subject.free_field.is_some() {
            ""
        } else {
            "  [no end term]"
        };
        let _ = writeln!(
            out,
            "{:<14} {} ({} credits){predictable}",
            subject.key, subject.name, subject.credits
        );

        let fields: Vec<String> = subject
            .fields
            .iter()
            .map(|f| {
                if (f.max - 100.0).abs() < f64::EPSILON && f.min.abs() < f64::EPSILON {
                    f.id.clone()
                } else {
                    format!("{}[{}-{}]", f.id, f.min, f.max)
                }
            })
            .collect();
        let _ = writeln!(out, "{:<14} fields: {}", "", fields.join(", "));
        if show_formulas {
            let _ = writeln!(out, "{:<14} score = {}", "", subject.formula);
        }
    }
    out
}
