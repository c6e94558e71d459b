use std::fmt::Write as _;

use crate::browse::{BrowseReport, CliError};

pub fn print_json(report: &BrowseReport) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(&report.month_groups)
        .map_err(|e| CliError::Server(format!("failed to render output: {e}")))?;
    println!("{out}");
    Ok(())
}

pub fn print_text(report: &BrowseReport) {
    print!("{}", render_text(report));
}

pub fn render_text(report: &BrowseReport) -> String {
    let mut out = String::new();
    let shown: usize = report.month_groups.iter().map(|g| g.posts.len()).sum();

    for group in &report.month_groups {
        let _ = writeln!(out, "{} ({})", group.month_year, group.posts.len());
        for post in &group.posts {
            let _ = writeln!(out, "  {:<12} {:<32} {}", post.date, post.slug, post.title);
        }
    }

    let _ = writeln!(out, "{shown} of {} posts", report.total_count);
    if report.has_more {
        let _ = writeln!(out, "Resume at: {}", report.resume);
    } else {
        let _ = writeln!(out, "End of archive: {}", report.resume);
    }
    out
}
