//! Shared table/JSON rendering for command output.

use anyhow::Result;
use colored::{ColoredString, Colorize};

use crate::alerts::model::{Alert, Severity};
use crate::domain::alert_report::AlertReport;

pub fn print_json<T: serde::Serialize>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    println!("{}", json);
    Ok(())
}

/// Generic fallback: recursive key-value rendering of any serializable value.
pub fn print_output<T: serde::Serialize>(format: &str, data: &T) -> Result<()> {
    match format {
        "json" => print_json(data),
        _ => {
            let value = serde_json::to_value(data)?;
            print_value(&value, 0);
            Ok(())
        }
    }
}

pub fn print_report(format: &str, report: &AlertReport) -> Result<()> {
    if format == "json" {
        return print_json(report);
    }

    println!("{}", "═══ System Alerts ═══".cyan().bold());
    for err in &report.fetch_errors {
        println!(
            "  {} could not load {}: {}",
            "!!".red().bold(),
            err.collection.bold(),
            err.message.dimmed()
        );
    }
    println!(
        "  {} drones, {} bases, {} routes",
        report.drone_count, report.base_count, report.route_count
    );
    println!();
    print_alert_table(&report.alerts);
    println!();
    println!(
        "  {} {}  {} {}  {} {}",
        "Critical:".dimmed(),
        report.counts.critical.to_string().red().bold(),
        "Warning:".dimmed(),
        report.counts.warning.to_string().yellow(),
        "Info:".dimmed(),
        report.counts.info.to_string().blue()
    );
    println!(
        "  {} {}  {} {}",
        "Checksum:".dimmed(),
        &report.checksum[..std::cmp::min(report.checksum.len(), 24)],
        "Age:".dimmed(),
        format!("{}s", report.age_secs())
    );
    if !report.verify() {
        println!(
            "  {} checksum does not match alert list",
            "!!".red().bold()
        );
    }
    Ok(())
}

pub fn print_alert_table(alerts: &[Alert]) {
    if alerts.is_empty() {
        println!("  {} no alerts", "ok".green().bold());
        return;
    }

    let id_width = column_width(alerts.iter().map(|a| a.subject_id.len()), "ID");
    let name_width = column_width(alerts.iter().map(|a| a.subject_name.len()), "Name");
    let status_width = column_width(alerts.iter().map(|a| a.status.len()), "Status");

    println!(
        "  {:<8}  {:<12}  {:<id_width$}  {:<name_width$}  {:<status_width$}  {}",
        "Severity".dimmed(),
        "Alert Type".dimmed(),
        "ID".dimmed(),
        "Name".dimmed(),
        "Status".dimmed(),
        "Reason".dimmed(),
    );

    for alert in alerts {
        println!(
            "  {:<8}  {:<12}  {:<id_width$}  {:<name_width$}  {:<status_width$}  {} {}",
            severity_label(alert.severity),
            alert.kind.label(),
            alert.subject_id,
            alert.subject_name,
            alert.status,
            alert.reason,
            format!("→ {}", alert.subject_kind.nav_path()).dimmed(),
        );
    }
}

fn column_width(lengths: impl Iterator<Item = usize>, header: &str) -> usize {
    lengths.max().unwrap_or(0).max(header.len())
}

fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Critical => severity.as_str().red().bold(),
        Severity::Warning => severity.as_str().yellow(),
        Severity::Info => severity.as_str().blue(),
    }
}

fn print_value(value: &serde_json::Value, indent: usize) {
    let pad = "  ".repeat(indent);
    match value {
        serde_json::Value::Object(map) => {
            for (key, val) in map {
                match val {
                    serde_json::Value::Object(_) => {
                        println!("{}{}:", pad, key);
                        print_value(val, indent + 1);
                    }
                    serde_json::Value::Array(arr) if arr.is_empty() => {
                        println!("{}{}: []", pad, key);
                    }
                    serde_json::Value::Array(_) => {
                        println!("{}{}:", pad, key);
                        print_value(val, indent + 1);
                    }
                    _ => println!("{}{}: {}", pad, key, format_scalar(val)),
                }
            }
        }
        serde_json::Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                if item.is_object() {
                    println!("{}[{}]:", pad, i);
                    print_value(item, indent + 1);
                } else {
                    println!("{}- {}", pad, format_scalar(item));
                }
            }
        }
        _ => println!("{}{}", pad, format_scalar(value)),
    }
}

fn format_scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}
