use crate::error::StatsError;
use crate::types::{PackageStatus, RunSummary};
use colored::*;
use serde_json::{json, Map, Value};
use std::fmt::Write;
use std::path::Path;

const TABLE_TITLE: &str = "PyPI Package Download Statistics";
const MAX_VERSIONS_SHOWN: usize = 5;
const COLUMN_GAP: &str = "  ";

/// Formats an integer with `,` thousands separators.
pub fn format_number(num: u64) -> String {
    let digits = num.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// First five versions, then a count of the rest.
pub fn format_versions(versions: &[String]) -> String {
    let shown = versions
        .iter()
        .take(MAX_VERSIONS_SHOWN)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if versions.len() > MAX_VERSIONS_SHOWN {
        format!("{} (+{} more)", shown, versions.len() - MAX_VERSIONS_SHOWN)
    } else {
        shown
    }
}

pub fn render_json(summary: &RunSummary, show_versions: bool) -> Result<String, StatsError> {
    let recent_key = format!("last_{}_days", summary.days);

    let packages: Vec<Value> = summary
        .reports
        .iter()
        .map(|report| {
            let mut entry = Map::new();
            entry.insert("package".into(), json!(report.package));
            match &report.status {
                PackageStatus::Success {
                    total_downloads,
                    recent_downloads,
                    versions,
                } => {
                    entry.insert("total_downloads".into(), json!(total_downloads));
                    entry.insert(recent_key.clone(), json!(recent_downloads));
                    if show_versions {
                        entry.insert("versions".into(), json!(versions));
                    }
                }
                PackageStatus::Failed(message) => {
                    entry.insert("error".into(), json!(message));
                    entry.insert("total_downloads".into(), Value::Null);
                    entry.insert(recent_key.clone(), Value::Null);
                }
            }
            Value::Object(entry)
        })
        .collect();

    let mut totals = Map::new();
    totals.insert("total_downloads_all_packages".into(), json!(summary.total_downloads));
    totals.insert(
        format!("total_{}_all_packages", recent_key),
        json!(summary.total_recent_downloads),
    );
    totals.insert("package_count".into(), json!(summary.package_count));

    let output = json!({
        "packages": packages,
        "summary": Value::Object(totals),
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Plain text plus colour; padding is applied before colouring so escape
/// codes never count toward the column width.
type Cell = (String, Option<Color>);

fn cell(text: impl Into<String>, color: Color) -> Cell {
    (text.into(), Some(color))
}

pub fn render_table<W: Write>(summary: &RunSummary, show_versions: bool, writer: &mut W) -> std::fmt::Result {
    let plain = |text: String| -> Cell { (text, None) };

    let mut header = vec![
        plain("Package".into()),
        plain("Total Downloads".into()),
        plain(format!("Last {} Days", summary.days)),
        plain("Status".into()),
    ];
    let mut totals = vec![
        plain(format!("TOTAL ({} packages)", summary.successful_packages)),
        cell(format_number(summary.total_downloads), Color::Green),
        cell(format_number(summary.total_recent_downloads), Color::Yellow),
        plain(String::new()),
    ];
    if show_versions {
        header.push(plain("Versions".into()));
        totals.push(plain(String::new()));
    }

    let rows: Vec<Vec<Cell>> = summary
        .reports
        .iter()
        .map(|report| {
            let mut row = vec![cell(report.package.as_str(), Color::Cyan)];
            match &report.status {
                PackageStatus::Success {
                    total_downloads,
                    recent_downloads,
                    versions,
                } => {
                    row.push(cell(format_number(*total_downloads), Color::Green));
                    row.push(cell(format_number(*recent_downloads), Color::Yellow));
                    row.push(cell("✓", Color::Green));
                    if show_versions {
                        row.push(cell(format_versions(versions), Color::Magenta));
                    }
                }
                PackageStatus::Failed(message) => {
                    row.push(cell("-", Color::BrightBlack));
                    row.push(cell("-", Color::BrightBlack));
                    row.push(cell(message.as_str(), Color::Red));
                    if show_versions {
                        row.push(cell("-", Color::BrightBlack));
                    }
                }
            }
            row
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            std::iter::once(&header)
                .chain(rows.iter())
                .chain(std::iter::once(&totals))
                .map(|row| row[col].0.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();
    let table_width = widths.iter().sum::<usize>() + COLUMN_GAP.len() * (widths.len() - 1);

    let write_row = |writer: &mut W, row: &[Cell], bold: bool| -> std::fmt::Result {
        let line = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(col, ((text, color), &width))| {
                // Download counts are right-aligned.
                let padded = if col == 1 || col == 2 {
                    format!("{text:>width$}")
                } else {
                    format!("{text:<width$}")
                };
                let styled = match color {
                    Some(color) => padded.color(*color),
                    None => padded.normal(),
                };
                let styled = if bold { styled.bold() } else { styled };
                styled.to_string()
            })
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        writeln!(writer, "{}", line.trim_end())
    };

    writeln!(writer, "{:^width$}", TABLE_TITLE, width = table_width)?;
    write_row(writer, &header, true)?;
    writeln!(writer, "{}", "─".repeat(table_width))?;
    for row in &rows {
        write_row(writer, row, false)?;
    }
    writeln!(writer, "{}", "─".repeat(table_width))?;
    write_row(writer, &totals, true)?;
    Ok(())
}

/// Per-package CSV report, one row per input line.
pub fn write_csv(summary: &RunSummary, path: &Path) -> Result<(), StatsError> {
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;

    wtr.write_record([
        "Package".to_string(),
        "Status".to_string(),
        "Total Downloads".to_string(),
        format!("Last {} Days", summary.days),
        "Error".to_string(),
    ])?;

    for report in &summary.reports {
        match &report.status {
            PackageStatus::Success {
                total_downloads,
                recent_downloads,
                ..
            } => {
                let total = total_downloads.to_string();
                let recent = recent_downloads.to_string();
                wtr.write_record([report.package.as_str(), "Success", total.as_str(), recent.as_str(), ""])?
            }
            PackageStatus::Failed(message) => {
                wtr.write_record([report.package.as_str(), "Failed", "", "", message.as_str()])?
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PackageReport;

    fn versions(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("1.{i}")).collect()
    }

    fn sample_summary() -> RunSummary {
        RunSummary {
            days: 7,
            total_downloads: 1000,
            total_recent_downloads: 70,
            successful_packages: 1,
            package_count: 2,
            reports: vec![
                PackageReport {
                    package: "alpha".into(),
                    status: PackageStatus::Success {
                        total_downloads: 1000,
                        recent_downloads: 70,
                        versions: versions(8),
                    },
                },
                PackageReport {
                    package: "beta".into(),
                    status: PackageStatus::Failed("Package 'beta' not found".into()),
                },
            ],
        }
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(123_456), "123,456");
        assert_eq!(format_number(1_234_567), "1,234,567");
        assert_eq!(format_number(u64::MAX), "18,446,744,073,709,551,615");
    }

    #[test]
    fn versions_truncate_after_five() {
        assert_eq!(format_versions(&versions(8)), "1.0, 1.1, 1.2, 1.3, 1.4 (+3 more)");
        assert_eq!(format_versions(&versions(5)), "1.0, 1.1, 1.2, 1.3, 1.4");
        assert_eq!(format_versions(&versions(2)), "1.0, 1.1");
        assert_eq!(format_versions(&[]), "");
    }

    #[test]
    fn json_shape() {
        let output = render_json(&sample_summary(), false).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        let packages = value["packages"].as_array().unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0]["package"], "alpha");
        assert_eq!(packages[0]["total_downloads"], 1000);
        assert_eq!(packages[0]["last_7_days"], 70);
        assert!(packages[0].get("versions").is_none());
        assert!(packages[0].get("error").is_none());

        assert_eq!(packages[1]["package"], "beta");
        assert!(packages[1]["total_downloads"].is_null());
        assert!(packages[1]["last_7_days"].is_null());
        assert!(packages[1]["error"].as_str().unwrap().contains("not found"));

        assert_eq!(value["summary"]["total_downloads_all_packages"], 1000);
        assert_eq!(value["summary"]["total_last_7_days_all_packages"], 70);
        assert_eq!(value["summary"]["package_count"], 2);
    }

    #[test]
    fn json_versions_only_for_successes() {
        let output = render_json(&sample_summary(), true).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["packages"][0]["versions"].as_array().unwrap().len(), 8);
        assert!(value["packages"][1].get("versions").is_none());
    }

    #[test]
    fn json_key_follows_window() {
        let mut summary = sample_summary();
        summary.days = 30;
        let value: Value = serde_json::from_str(&render_json(&summary, false).unwrap()).unwrap();

        assert_eq!(value["packages"][0]["last_30_days"], 70);
        assert_eq!(value["summary"]["total_last_30_days_all_packages"], 70);
    }

    #[test]
    fn table_rows_and_totals() {
        colored::control::set_override(false);
        let mut out = String::new();
        render_table(&sample_summary(), true, &mut out).unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("PyPI Package Download Statistics"));
        assert!(lines[1].contains("Last 7 Days"));
        assert!(lines[1].contains("Versions"));

        let alpha = lines.iter().find(|l| l.starts_with("alpha")).unwrap();
        // Right-aligned under the 15-wide "Total Downloads" header.
        assert!(alpha.contains(&format!("{}1,000", " ".repeat(10))));
        assert!(alpha.contains("✓"));
        assert!(alpha.contains("1.0, 1.1, 1.2, 1.3, 1.4 (+3 more)"));

        let beta = lines.iter().find(|l| l.starts_with("beta")).unwrap();
        assert!(beta.contains("Package 'beta' not found"));

        let total = lines.last().unwrap();
        assert!(total.contains("TOTAL (1 packages)"));
        assert!(total.contains("1,000"));
        assert!(total.contains("70"));
    }

    #[test]
    fn table_without_versions_column() {
        colored::control::set_override(false);
        let mut out = String::new();
        render_table(&sample_summary(), false, &mut out).unwrap();

        assert!(!out.contains("Versions"));
        assert!(!out.contains("(+3 more)"));
    }

    #[test]
    fn csv_report() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("stats.csv");
        write_csv(&sample_summary(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "Package,Status,Total Downloads,Last 7 Days,Error");
        assert_eq!(lines[1], "alpha,Success,1000,70,");
        assert_eq!(lines[2], "beta,Failed,,,Package 'beta' not found");
    }
}
