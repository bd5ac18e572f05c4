//! Plain-text tables for the terminal.

use jkw_core::{BuildHistory, Job, ParameterDefinition, ParameterType, ResultStatus};
use std::fmt::Write as _;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const RESULT_WIDTH: usize = 9;
const PROGRESS_WIDTH: usize = 8;
const AGE_WIDTH: usize = 12;

pub fn status_icon(status: ResultStatus) -> &'static str {
    match status {
        ResultStatus::Success => "✓",
        ResultStatus::Failure => "✗",
        ResultStatus::Aborted => "⊘",
        ResultStatus::Unknown => "·",
    }
}

/// Unicode-width-aware truncation with ellipsis.
/// Returns `""` when `max_width` is 0.
pub fn truncate(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for c in s.chars() {
        let cw = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + cw + 1 > max_width {
            result.push('\u{2026}');
            break;
        }
        result.push(c);
        width += cw;
    }
    result
}

/// Truncates, then right-pads with spaces to exactly `width` columns.
pub fn pad(s: &str, width: usize) -> String {
    let mut cell = truncate(s, width);
    let used = UnicodeWidthStr::width(cell.as_str());
    cell.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    cell
}

fn progress_cell(progress: Option<u8>) -> String {
    progress.map(|p| format!("{p}%")).unwrap_or_default()
}

pub fn jobs_table(jobs: &[Job], name_width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {} {} {} {} {}",
        pad("JOB", name_width),
        pad("RESULT", RESULT_WIDTH),
        pad("BUILDING", PROGRESS_WIDTH),
        pad("LAST OK", AGE_WIDTH),
        "LAST FAIL"
    );
    for job in jobs {
        let status = job.status();
        let _ = writeln!(
            out,
            "{} {} {} {} {} {}",
            status_icon(status),
            pad(&job.name, name_width),
            pad(status.as_str(), RESULT_WIDTH),
            pad(&progress_cell(job.progress), PROGRESS_WIDTH),
            pad(job.last_success_age.as_deref().unwrap_or(""), AGE_WIDTH),
            job.last_failure_age.as_deref().unwrap_or("")
        );
    }
    trim_lines(out)
}

fn pointer(label: &str, number: Option<u64>) -> String {
    match number {
        Some(n) => format!("{label} #{n}"),
        None => format!("{label} -"),
    }
}

pub fn history_table(history: &BuildHistory, author_width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", history.job_name());
    if history.is_empty() {
        out.push_str("  no builds\n");
        return trim_lines(out);
    }
    let _ = writeln!(
        out,
        "  {} {} {} {}",
        pad("BUILD", 7),
        pad("RESULT", RESULT_WIDTH),
        pad("AUTHOR", author_width),
        "AGE"
    );
    for build in history.builds() {
        let (icon, result) = if build.building {
            ("⟳", "BUILDING")
        } else {
            let status = build.status();
            (status_icon(status), status.as_str())
        };
        let _ = writeln!(
            out,
            "{} {} {} {} {}",
            icon,
            pad(&format!("#{}", build.number), 7),
            pad(result, RESULT_WIDTH),
            pad(&build.author, author_width),
            build.age
        );
    }
    let _ = writeln!(
        out,
        "{}  {}  {}",
        pointer("last success", history.latest_successful()),
        pointer("last failure", history.latest_failed()),
        pointer("last finished", history.latest_finished())
    );
    trim_lines(out)
}

pub fn params_table(job: &str, definitions: &[ParameterDefinition]) -> String {
    if definitions.is_empty() {
        return format!("{job} takes no parameters");
    }
    let mut out = String::new();
    for def in definitions {
        let _ = write!(out, "{} ({})", def.name, def.kind.label());
        if let Some(default) = &def.default_value {
            let _ = write!(out, " = {default}");
        }
        out.push('\n');
        if def.kind == ParameterType::Choice {
            let _ = writeln!(out, "    choices: {}", def.choices.join(", "));
        }
        if !def.description.is_empty() {
            let _ = writeln!(out, "    {}", def.description);
        }
    }
    trim_lines(out)
}

fn trim_lines(out: String) -> String {
    out.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keeps the last `max_lines` lines. Returns the text and whether anything
/// was dropped.
pub fn process_log_output(raw: &str, max_lines: usize) -> (String, bool) {
    let lines: Vec<&str> = raw.lines().collect();
    if lines.len() > max_lines {
        let kept = &lines[lines.len() - max_lines..];
        (kept.join("\n"), true)
    } else {
        (raw.to_string(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jkw_core::{Build, ParameterDefinition};
    use pretty_assertions::assert_eq;

    fn job(name: &str, result: Option<ResultStatus>, progress: Option<u8>) -> Job {
        Job {
            name: name.to_string(),
            last_result: result,
            progress,
            last_success_age: Some("2h:5m".to_string()),
            last_failure_age: None,
        }
    }

    fn build(number: u64, building: bool, result: Option<ResultStatus>) -> Build {
        Build {
            number,
            author: "Ada".to_string(),
            url: String::new(),
            age: "3m".to_string(),
            building,
            result,
        }
    }

    #[test]
    fn icons() {
        assert_eq!(status_icon(ResultStatus::Success), "✓");
        assert_eq!(status_icon(ResultStatus::Failure), "✗");
        assert_eq!(status_icon(ResultStatus::Aborted), "⊘");
        assert_eq!(status_icon(ResultStatus::Unknown), "·");
    }

    #[test]
    fn truncate_short_and_long() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 6), "hello…");
        assert_eq!(truncate("anything", 0), "");
    }

    #[test]
    fn truncate_wide_chars() {
        assert_eq!(truncate("日本語テキスト", 5), "日本…");
    }

    #[test]
    fn pad_fills_to_width() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("日本", 5), "日本 ");
        assert_eq!(pad("abcdef", 4), "abc…");
    }

    #[test]
    fn jobs_table_rows() {
        let table = jobs_table(
            &[
                job("api", Some(ResultStatus::Success), None),
                job("web", Some(ResultStatus::Failure), Some(42)),
            ],
            6,
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("  JOB    RESULT"));
        assert_eq!(lines[1], "✓ api    SUCCESS            2h:5m");
        assert_eq!(lines[2], "✗ web    FAILURE   42%      2h:5m");
    }

    #[test]
    fn history_marks_building_and_pointers() {
        let history = BuildHistory::new(
            "app",
            vec![
                build(3, true, None),
                build(2, false, Some(ResultStatus::Failure)),
                build(1, false, Some(ResultStatus::Success)),
            ],
        );
        let table = history_table(&history, 4);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "app");
        assert_eq!(lines[2], "⟳ #3      BUILDING  Ada  3m");
        assert_eq!(lines[3], "✗ #2      FAILURE   Ada  3m");
        assert_eq!(
            lines[5],
            "last success #1  last failure #2  last finished #2"
        );
    }

    #[test]
    fn empty_history() {
        let table = history_table(&BuildHistory::new("app", vec![]), 10);
        assert_eq!(table, "app\n  no builds");
    }

    #[test]
    fn params_listing() {
        let defs = vec![
            ParameterDefinition {
                name: "ENV".to_string(),
                kind: ParameterType::Choice,
                description: "Target".to_string(),
                default_value: Some("dev".to_string()),
                choices: vec!["dev".to_string(), "prod".to_string()],
            },
            ParameterDefinition {
                name: "DRY_RUN".to_string(),
                kind: ParameterType::Boolean,
                description: String::new(),
                default_value: None,
                choices: vec![],
            },
        ];
        assert_eq!(
            params_table("app", &defs),
            "ENV (choice) = dev\n    choices: dev, prod\n    Target\nDRY_RUN (boolean)"
        );
        assert_eq!(params_table("app", &[]), "app takes no parameters");
    }

    #[test]
    fn log_output_tail() {
        let (text, truncated) = process_log_output("line 1\nline 2\nline 3", 10);
        assert_eq!(text, "line 1\nline 2\nline 3");
        assert!(!truncated);

        let raw: String = (1..=10).map(|i| format!("line {i}\n")).collect();
        let (text, truncated) = process_log_output(&raw, 3);
        assert_eq!(text, "line 8\nline 9\nline 10");
        assert!(truncated);
    }
}
