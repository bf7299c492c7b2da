//! Report rendering for the CLI: plain/colored text or JSON.

use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Local};
use clsclib::{CountResult, FileRecord, LineCounts, SkippedEntry};
use console::Style;
use serde::Serialize;

/// Width of the label column in the text report
const LABEL_WIDTH: usize = 22;
/// Width of the path column in the per-file table
const NAME_WIDTH: usize = 50;
/// Width of each count column in the per-file table
const CELL_WIDTH: usize = 9;

/// Report format selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "table" => Ok(OutputMode::Text),
            "json" => Ok(OutputMode::Json),
            _ => Err(format!("Unknown output mode: {}", s)),
        }
    }
}

/// Wall-clock window around a run
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub elapsed: Duration,
}

/// Everything the report shows, in serializable form
#[derive(Debug, Serialize)]
struct ReportView<'a> {
    path: String,
    extension: &'a str,
    files: u64,
    blank: u64,
    comment: u64,
    code: u64,
    total: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    by_file: Vec<FileRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skipped: Vec<&'a SkippedEntry>,
    time: TimeView,
}

#[derive(Debug, Serialize)]
struct FileRow {
    path: String,
    #[serde(flatten)]
    counts: LineCounts,
}

#[derive(Debug, Serialize)]
struct TimeView {
    start: String,
    end: String,
    duration_secs: f64,
}

/// Convert a path to a relative path from the base directory
fn make_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .ok()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Truncate a name to fit within max_len, adding ".." prefix if needed
fn truncate_name(name: &str, max_len: usize) -> String {
    let count = name.chars().count();
    if count > max_len {
        let tail: String = name.chars().skip(count - max_len + 2).collect();
        format!("..{}", tail)
    } else {
        name.to_string()
    }
}

fn build_view<'a>(
    root: &Path,
    extension: &'a str,
    result: &'a CountResult,
    timing: &Timing,
) -> ReportView<'a> {
    let totals = result.report.totals;

    ReportView {
        path: root.to_string_lossy().to_string(),
        extension,
        files: result.report.file_count,
        blank: totals.blank,
        comment: totals.comment,
        code: totals.code,
        total: totals.total(),
        by_file: result
            .files
            .iter()
            .map(|f: &FileRecord| FileRow {
                path: make_relative(&f.path, root),
                counts: f.counts,
            })
            .collect(),
        skipped: result.skipped.iter().collect(),
        time: TimeView {
            start: timing.start.format("%H:%M:%S").to_string(),
            end: timing.end.format("%H:%M:%S").to_string(),
            duration_secs: timing.elapsed.as_secs_f64(),
        },
    }
}

/// Render the report for `root` in the requested mode.
pub fn render(
    mode: OutputMode,
    root: &Path,
    extension: &str,
    result: &CountResult,
    timing: &Timing,
) -> Result<String, serde_json::Error> {
    let view = build_view(root, extension, result, timing);

    match mode {
        OutputMode::Json => {
            let mut out = serde_json::to_string_pretty(&view)?;
            out.push('\n');
            Ok(out)
        }
        OutputMode::Text => Ok(render_text(&view)),
    }
}

fn render_text(view: &ReportView<'_>) -> String {
    let header = Style::new().blue().bold();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "\n\t{}",
        header.apply_to(format!("- Source files (.{})", view.extension))
    );
    for (label, value) in [
        ("Files", view.files),
        ("Blank lines", view.blank),
        ("Comment lines", view.comment),
        ("Code lines", view.code),
    ] {
        let _ = writeln!(out, "{:>width$} = {}", label, value, width = LABEL_WIDTH);
    }

    if !view.by_file.is_empty() {
        let _ = writeln!(out, "\n\t{}", header.apply_to("- By file"));
        let _ = writeln!(
            out,
            "{:<name$} {:>cell$} {:>cell$} {:>cell$}",
            "File",
            "Blank",
            "Comment",
            "Code",
            name = NAME_WIDTH,
            cell = CELL_WIDTH
        );
        let _ = writeln!(out, "{}", "-".repeat(NAME_WIDTH + (CELL_WIDTH + 1) * 3));
        for row in &view.by_file {
            let _ = writeln!(
                out,
                "{:<name$} {:>cell$} {:>cell$} {:>cell$}",
                truncate_name(&row.path, NAME_WIDTH - 2),
                row.counts.blank,
                row.counts.comment,
                row.counts.code,
                name = NAME_WIDTH,
                cell = CELL_WIDTH
            );
        }
    }

    if !view.skipped.is_empty() {
        let _ = writeln!(
            out,
            "\n\t{}",
            header.apply_to(format!("- Skipped ({})", view.skipped.len()))
        );
        for entry in &view.skipped {
            let _ = writeln!(out, "  {}: {}", entry.path.display(), entry.reason);
        }
    }

    let _ = writeln!(out, "\n\t{}", header.apply_to("- Time"));
    let _ = writeln!(out, "{:>width$} : {}", "Start", view.time.start, width = LABEL_WIDTH);
    let _ = writeln!(out, "{:>width$} : {}", "End", view.time.end, width = LABEL_WIDTH);
    let _ = writeln!(
        out,
        "{:>width$} : {:.3} seconds\n",
        "Duration",
        view.time.duration_secs,
        width = LABEL_WIDTH
    );

    out
}
