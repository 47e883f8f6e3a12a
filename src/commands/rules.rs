//! `aerowatch rules` — print the alert rule catalogue with active thresholds.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::alerts::rules::RuleId;
use crate::config;

pub fn list(config_path: Option<&Path>) -> Result<()> {
    let cfg = config::load(config_path)?;
    let t = &cfg.alerts.thresholds;

    println!("{}", "Alert Rules".bold());
    println!();

    for (i, rule) in RuleId::all().iter().enumerate() {
        let state = if cfg.alerts.is_enabled(*rule) {
            "on ".green().bold()
        } else {
            "off".dimmed()
        };
        println!(
            "  {}. {} {} {}",
            i + 1,
            state,
            rule.display_name().bold(),
            format!("({})", rule.key()).dimmed()
        );
        println!("        {}", rule.description());
    }

    println!();
    println!("{}", "Thresholds".bold());
    println!(
        "  battery:  warning <= {}%, critical <= {}%",
        t.battery_warning_pct, t.battery_critical_pct
    );
    println!(
        "  capacity: warning >= {}%, critical >= {}%",
        t.capacity_warning_pct, t.capacity_critical_pct
    );
    Ok(())
}
