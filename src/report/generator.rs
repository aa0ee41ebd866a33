//! Report generation.
//!
//! Renders a [`StatsReport`] for a terminal, as Markdown, or as JSON.
//! Money columns are converted from cents to euros only here.

use crate::models::{RankEntry, RankUnit, Ranking, ReportMetadata, StatsReport};
use crate::money::format_euro;
use anyhow::Result;
use std::path::Path;

const EMPTY_LIST: &str = "Nothing to show for this period.";

/// Format a count for display according to its unit.
pub fn format_count(entry: &RankEntry, unit: RankUnit) -> String {
    match unit {
        RankUnit::Quantity => entry.count.to_string(),
        RankUnit::Money => format_euro(entry.count),
    }
}

fn since_label(metadata: &ReportMetadata) -> String {
    match metadata.since {
        Some(since) => since.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "the beginning".to_string(),
    }
}

/// Generate a plain text report for the terminal.
pub fn generate_text_report(report: &StatsReport) -> String {
    let mut output = String::new();
    let metadata = &report.metadata;

    output.push_str(&format!(
        "Statistics since {} ({})\n",
        since_label(metadata),
        metadata.window
    ));
    output.push_str(&format!(
        "{} of {} transactions in window\n\n",
        metadata.records_in_window, metadata.total_records
    ));

    for ranking in &report.rankings {
        output.push_str(&format!("{}\n", ranking.category.title()));
        output.push_str(&format!("{}\n", "-".repeat(ranking.category.title().len())));

        if ranking.entries.is_empty() {
            output.push_str(&format!("  {}\n\n", EMPTY_LIST));
            continue;
        }

        let width = ranking
            .entries
            .iter()
            .map(|entry| entry.name.chars().count())
            .max()
            .unwrap_or(0);

        for (i, entry) in ranking.entries.iter().enumerate() {
            output.push_str(&format!(
                "  #{:<3} {:<width$}  {:>12}\n",
                i + 1,
                entry.name,
                format_count(entry, ranking.unit),
                width = width
            ));
        }
        output.push('\n');
    }

    output
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &StatsReport) -> String {
    let mut output = String::new();

    output.push_str("# PayUTC Statistics\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));

    for ranking in &report.rankings {
        output.push_str(&generate_ranking_section(ranking));
    }

    output
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Overview\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Since:** {} ({})\n",
        since_label(metadata),
        metadata.window
    ));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Transactions:** {} in window, {} total\n\n",
        metadata.records_in_window, metadata.total_records
    ));

    section
}

fn generate_ranking_section(ranking: &Ranking) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", ranking.category.title()));

    if ranking.entries.is_empty() {
        section.push_str(&format!("*{}*\n\n", EMPTY_LIST));
        return section;
    }

    let column = match ranking.unit {
        RankUnit::Quantity => "Count",
        RankUnit::Money => "Amount",
    };

    section.push_str(&format!("| # | Name | {} |\n", column));
    section.push_str("|:---:|:---|---:|\n");

    for (i, entry) in ranking.entries.iter().enumerate() {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            i + 1,
            table_cell(&entry.name),
            format_count(entry, ranking.unit)
        ));
    }
    section.push('\n');

    section
}

/// Escape a name so it stays inside one Markdown table cell.
fn table_cell(name: &str) -> String {
    name.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// Generate a JSON report. Amounts stay in cents.
pub fn generate_json_report(report: &StatsReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write a rendered report to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RankingCategory;
    use chrono::{TimeZone, Utc};

    fn create_test_report() -> StatsReport {
        StatsReport {
            metadata: ReportMetadata {
                source: "history.json".to_string(),
                window: "week".to_string(),
                since: Some(Utc.with_ymd_and_hms(2024, 3, 24, 12, 0, 0).unwrap()),
                generated_at: Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap(),
                total_records: 12,
                records_in_window: 4,
            },
            rankings: vec![
                Ranking {
                    category: RankingCategory::MostPurchased,
                    unit: RankUnit::Quantity,
                    entries: vec![RankEntry::new("Coffee", 3), RankEntry::new("Tea", 1)],
                },
                Ranking {
                    category: RankingCategory::MostSpent,
                    unit: RankUnit::Money,
                    entries: vec![RankEntry::new("Coffee", 300), RankEntry::new("Tea", 150)],
                },
                Ranking {
                    category: RankingCategory::MostGivenTo,
                    unit: RankUnit::Money,
                    entries: vec![],
                },
            ],
        }
    }

    #[test]
    fn test_format_count() {
        let entry = RankEntry::new("Coffee", 1250);
        assert_eq!(format_count(&entry, RankUnit::Quantity), "1250");
        assert_eq!(format_count(&entry, RankUnit::Money), "12,50 €");
    }

    #[test]
    fn test_generate_text_report() {
        let text = generate_text_report(&create_test_report());

        assert!(text.contains("Statistics since 2024-03-24 12:00 UTC (week)"));
        assert!(text.contains("4 of 12 transactions"));
        assert!(text.contains("#1"));
        assert!(text.contains("3,00 €"));
        assert!(text.contains(EMPTY_LIST));
    }

    #[test]
    fn test_generate_markdown_report() {
        let markdown = generate_markdown_report(&create_test_report());

        assert!(markdown.contains("# PayUTC Statistics"));
        assert!(markdown.contains("## Most purchased items"));
        assert!(markdown.contains("| 1 | Coffee | 3 |"));
        assert!(markdown.contains("| 2 | Tea | 1,50 € |"));
        assert!(markdown.contains("| # | Name | Amount |"));
        assert!(markdown.contains(EMPTY_LIST));
    }

    #[test]
    fn test_markdown_names_stay_in_one_row() {
        let mut report = create_test_report();
        report.rankings[0].entries = vec![RankEntry::new("Hot\ndog | large", 2)];

        let markdown = generate_markdown_report(&report);
        assert!(markdown.contains("| 1 | Hot dog \\| large | 2 |\n"));
    }

    #[test]
    fn test_since_label_for_whole_history() {
        let mut report = create_test_report();
        report.metadata.since = None;
        report.metadata.window = "ever".to_string();

        assert!(generate_text_report(&report).contains("since the beginning (ever)"));
    }

    #[test]
    fn test_generate_json_report_keeps_cents() {
        let json = generate_json_report(&create_test_report()).unwrap();

        assert!(json.contains("\"most_purchased\""));
        assert!(json.contains("\"count\": 300"));
        assert!(json.contains("\"unit\": \"money\""));
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.md");
        write_report("# hi\n", &path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# hi\n");
    }
}
