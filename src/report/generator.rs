use crate::domain::calendar::group_thousands;
use crate::domain::{Goal, ProductiveLife, YearProgress};
use crate::persistence::{atomic_write, report_file};
use crate::report::stats::{calculate_goal_stats, calculate_portfolio_stats};
use anyhow::Result;
use chrono::{DateTime, TimeZone};
use std::path::{Path, PathBuf};

/// Format percentage with 1 decimal place
fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Build the Markdown countdown report
pub fn build_report<Tz: TimeZone>(goals: &[Goal], life: ProductiveLife, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let year = YearProgress::at(now);
    let portfolio = calculate_portfolio_stats(goals, now);
    let rows = calculate_goal_stats(goals, life, now);

    let mut report = String::new();

    // Header
    report.push_str(&format!("# Countdown Report - {}\n\n", now.format("%Y-%m-%d")));

    // Summary Section
    report.push_str("## Summary\n\n");
    report.push_str(&format!(
        "- **Goals:** {} ({} past deadline)\n",
        portfolio.total_goals, portfolio.expired_goals
    ));
    if let Some(days) = portfolio.nearest_days {
        report.push_str(&format!("- **Nearest Deadline:** {} days\n", group_thousands(days)));
    }
    report.push_str(&format!(
        "- **Urgency:** 🟢 {} · 🟡 {} · 🟠 {} · 🔴 {}\n",
        portfolio.by_urgency[0], portfolio.by_urgency[1], portfolio.by_urgency[2], portfolio.by_urgency[3]
    ));
    report.push_str(&format!(
        "- **Average Time Used:** {}\n",
        format_percent(portfolio.avg_percent_elapsed)
    ));
    report.push_str(&format!(
        "- **Productive Years Left:** {} (~{} days)\n\n",
        life.years,
        group_thousands(life.total_days())
    ));

    // Year Section
    report.push_str(&format!("## Year {}\n\n", year.year));
    report.push_str(&format!(
        "- **Progress:** {} gone, {} remaining\n",
        format_percent(year.percent_gone),
        format_percent(year.percent_remaining)
    ));
    report.push_str(&format!(
        "- **Days Left:** {} of {}\n\n",
        year.days_remaining, year.days_in_year
    ));

    // Goals Section
    report.push_str("## Goals\n\n");
    if rows.is_empty() {
        report.push_str("_No goals yet. Time is passing anyway._\n");
        return report;
    }

    report.push_str("| Goal | Deadline | Days Left | Hours Left | Urgency | Used | Of Year | Of Life |\n");
    report.push_str("|---|---|---:|---:|---|---:|---:|---:|\n");
    for row in &rows {
        report.push_str(&format!(
            "| {} | {} | {} | {} | {} {} | {} | {} | {:.2}% |\n",
            row.name.replace('|', "\\|"),
            row.deadline,
            group_thousands(row.days_remaining),
            group_thousands(row.total_hours),
            row.urgency.icon(),
            row.urgency.label(),
            format_percent(row.percent_elapsed),
            format_percent(row.percent_of_year),
            row.percent_of_life
        ));
    }
    report.push('\n');

    // Rationale, only for goals that have one
    let with_notes: Vec<&Goal> = goals
        .iter()
        .filter(|g| g.why_it_matters.is_some() || g.what_youll_regret.is_some())
        .collect();
    if !with_notes.is_empty() {
        report.push_str("## Why These Matter\n\n");
        for goal in with_notes {
            report.push_str(&format!("### {}\n\n", goal.name));
            if let Some(why) = &goal.why_it_matters {
                report.push_str(&format!("- **Why:** {}\n", why));
            }
            if let Some(regret) = &goal.what_youll_regret {
                report.push_str(&format!("- **Regret:** {}\n", regret));
            }
            report.push('\n');
        }
    }

    report
}

/// Generate a report and write it to `output_path`, or to the data directory
pub fn generate_report<Tz: TimeZone>(
    goals: &[Goal],
    life: ProductiveLife,
    now: &DateTime<Tz>,
    data_dir: &Path,
    output_path: Option<PathBuf>,
) -> Result<PathBuf>
where
    Tz::Offset: std::fmt::Display,
{
    let report = build_report(goals, life, now);

    // Determine output path
    let output = output_path.unwrap_or_else(|| report_file(data_dir, now.date_naive()));

    atomic_write(&output, &report)?;
    log::info!("Report written to {}", output.display());

    Ok(output)
}
