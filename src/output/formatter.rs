use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::report::{Method, Report, StudentScore};

use super::OutputFormat;

/// Response envelope wrapped around JSON output.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Render a report in the requested format.
pub fn render(report: &Report, format: OutputFormat, use_colors: bool) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(format_report_table(report, use_colors)),
        OutputFormat::Tsv => Ok(format_tsv(report)),
        OutputFormat::Json => format_json(report),
    }
}

/// Round to two decimal places for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a score with two decimals
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

/// Format a contribution with an explicit sign (+0.083, -0.120)
pub fn format_contribution(contribution: f64) -> String {
    format!("{:+.3}", contribution)
}

fn method_label(method: Method) -> &'static str {
    match method {
        Method::Qass => "QASS",
        Method::QassMultiComponent => "QASS (multi-component)",
        Method::Webavalia => "Webavalia",
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Third column of a row: contribution for QASS, rating for Webavalia
fn detail_column(student: &StudentScore) -> Option<String> {
    student
        .contribution
        .map(format_contribution)
        .or_else(|| student.rating.map(|r| format!("{:.2}", r)))
}

/// Format a report as a table: summary line, then one row per student.
/// Index column: 3 chars (fits "99."), right-aligned
/// Score column is right-aligned, 9 chars wide
pub fn format_report_table(report: &Report, use_colors: bool) -> String {
    let summary = format!(
        "{} | group score {} | mean {}",
        method_label(report.method),
        format_score(report.group_score),
        format_score(report.mean_score)
    );

    if report.students.is_empty() {
        return format!("{}\nNo students scored.", summary);
    }

    let score_width = 9;
    let separator = "  ";
    let longest = report
        .students
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0);

    // index + score + detail column + separators
    let fixed_width = 3 + 1 + score_width + separator.len() * 2 + 8;
    let name_width = match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => longest.min(width - fixed_width),
        Some(_) => longest.min(20),
        None => longest,
    };

    let rows = report.students.iter().enumerate().map(|(idx, student)| {
        let index_str = format!("{:>2}.", idx + 1);
        let name = format!(
            "{:<width$}",
            truncate_name(&student.name, name_width),
            width = name_width
        );
        let score_padded = format!(
            "{:>width$}",
            format_score(student.score),
            width = score_width
        );
        let detail = detail_column(student).unwrap_or_default();

        if use_colors {
            let detail = match student.contribution {
                Some(c) if c > 0.0 => detail.green().to_string(),
                Some(c) if c < 0.0 => detail.red().to_string(),
                _ => detail.dimmed().to_string(),
            };
            format!(
                "{} {}{}{}{}{}",
                index_str.dimmed(),
                name,
                separator,
                score_padded.bold(),
                separator,
                detail
            )
        } else {
            format!(
                "{} {}{}{}{}{}",
                index_str, name, separator, score_padded, separator, detail
            )
            .trim_end()
            .to_string()
        }
    });

    let header = if use_colors {
        summary.bold().to_string()
    } else {
        summary
    };

    std::iter::once(header)
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a report as tab-separated values for scripting
/// Columns: name, score, contribution or rating (no headers, no colors)
pub fn format_tsv(report: &Report) -> String {
    report
        .students
        .iter()
        .map(|student| {
            let mut line = format!("{}\t{:.2}", student.name, student.score);
            if let Some(detail) = detail_column(student) {
                line.push('\t');
                line.push_str(&detail);
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a report as a JSON envelope with two-decimal numbers
pub fn format_json(report: &Report) -> Result<String> {
    let rounded = Report {
        method: report.method,
        group_score: round2(report.group_score),
        mean_score: round2(report.mean_score),
        // Contributions live in (-1, 1) and need more precision than scores
        mean_contribution: report.mean_contribution,
        students: report
            .students
            .iter()
            .map(|s| StudentScore {
                name: s.name.clone(),
                score: round2(s.score),
                contribution: s.contribution,
                rating: s.rating.map(round2),
            })
            .collect(),
    };
    let envelope = Envelope {
        total: Some(rounded.students.len()),
        data: rounded,
    };
    serde_json::to_string_pretty(&envelope).context("Failed to serialize report")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> Report {
        Report {
            method: Method::Qass,
            group_score: 0.8,
            mean_score: 0.7999,
            mean_contribution: Some(0.0),
            students: vec![
                StudentScore {
                    name: "ana".to_string(),
                    score: 0.80067,
                    contribution: Some(-0.0054),
                    rating: None,
                },
                StudentScore {
                    name: "bruno".to_string(),
                    score: 0.7922,
                    contribution: Some(0.0621),
                    rating: None,
                },
            ],
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(97.33294), 97.33);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(100.0), 100.0);
    }

    #[test]
    fn test_format_contribution_sign() {
        assert_eq!(format_contribution(0.0621), "+0.062");
        assert_eq!(format_contribution(-0.0054), "-0.005");
    }

    #[test]
    fn test_table_plain() {
        let table = format_report_table(&sample_report(), false);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "QASS | group score 0.80 | mean 0.80");
        assert!(lines[1].starts_with(" 1. ana"));
        assert!(lines[1].contains("0.80"));
        assert!(lines[1].ends_with("-0.005"));
        assert!(lines[2].ends_with("+0.062"));
    }

    #[test]
    fn test_table_empty() {
        let mut report = sample_report();
        report.students.clear();
        let table = format_report_table(&report, false);
        assert!(table.ends_with("No students scored."));
    }

    #[test]
    fn test_tsv() {
        let tsv = format_tsv(&sample_report());
        assert_eq!(tsv, "ana\t0.80\t-0.005\nbruno\t0.79\t+0.062");
    }

    #[test]
    fn test_tsv_webavalia_rating_column() {
        let report = Report {
            method: Method::Webavalia,
            group_score: 100.0,
            mean_score: 98.67,
            mean_contribution: None,
            students: vec![StudentScore {
                name: "a".to_string(),
                score: 97.3329,
                contribution: None,
                rating: Some(9.0),
            }],
        };
        assert_eq!(format_tsv(&report), "a\t97.33\t9.00");
    }

    #[test]
    fn test_json_envelope() {
        let json = format_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total"], 2);
        assert_eq!(value["data"]["method"], "qass");
        assert_eq!(value["data"]["students"][0]["score"], 0.8);
        assert_eq!(value["data"]["students"][1]["score"], 0.79);
        assert!(value["data"]["students"][0].get("rating").is_none());
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("short", 10), "short");
        assert_eq!(truncate_name("a very long name", 8), "a ver...");
    }
}
