//! Stats command - query-log monitoring report.

use std::path::Path;

use comfy_table::{Table, presets::UTF8_FULL};
use console::style;

use crate::error::Result;
use crate::monitor::LogReport;

pub fn run(log_file: &Path, json: bool) -> Result<()> {
    let report = LogReport::load(log_file)?;

    if json {
        let summary = serde_json::json!({
            "total_queries": report.total(),
            "mean_relevance": report.mean_relevance(),
            "mean_latency": report.mean_latency(),
            "median_tokens": report.median_tokens(),
            "skipped": report.skipped,
        });
        println!("{}", serde_json::to_string_pretty(&summary).unwrap_or_default());
        return Ok(());
    }

    if report.total() == 0 && report.skipped.is_empty() {
        println!("Log file contains no records.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Total Queries".to_string(), report.total().to_string()]);
    table.add_row(vec![
        "Avg Relevance".to_string(),
        format_stat(report.mean_relevance(), 2),
    ]);
    table.add_row(vec![
        "Avg Latency (s)".to_string(),
        format_stat(report.mean_latency(), 2),
    ]);
    table.add_row(vec![
        "Median Tokens".to_string(),
        format_stat(report.median_tokens(), 0),
    ]);
    println!("{table}");

    let series = report.relevance_series();
    if !series.is_empty() {
        println!("\n{}", style("Relevance over time").cyan().bold());
        for (timestamp, relevance) in &series {
            println!("  {timestamp}  {relevance:.2}");
        }
    }

    if !report.skipped.is_empty() {
        eprintln!(
            "\nSkipped {} malformed record(s):",
            report.skipped.len()
        );
        for skipped in &report.skipped {
            eprintln!("  [{}] {}", skipped.index, skipped.reason);
        }
    }

    Ok(())
}

fn format_stat(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "-".to_string(),
    }
}
