use crate::domain::{Goal, ProductiveLife, UrgencyLevel, YearProgress};
use chrono::{DateTime, TimeZone};

/// Per-goal numbers shown in the report table
#[derive(Debug, Clone, PartialEq)]
pub struct GoalStats {
    pub name: String,
    pub deadline: String,
    pub days_remaining: i64,
    pub total_hours: i64,
    pub urgency: UrgencyLevel,
    pub percent_elapsed: f64,
    pub percent_of_year: f64,
    pub percent_of_life: f64,
}

/// Totals across every goal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioStats {
    pub total_goals: usize,
    pub expired_goals: usize,
    /// Goal counts for Low, Medium, High and Critical
    pub by_urgency: [usize; 4],
    pub avg_percent_elapsed: f64,
    pub nearest_days: Option<i64>,
}

/// Calculate per-goal statistics
pub fn calculate_goal_stats<Tz: TimeZone>(
    goals: &[Goal],
    life: ProductiveLife,
    now: &DateTime<Tz>,
) -> Vec<GoalStats>
where
    Tz::Offset: std::fmt::Display,
{
    let year = YearProgress::at(now);

    goals
        .iter()
        .map(|goal| {
            let remaining = goal.time_remaining_at(now);
            let elapsed = goal.time_elapsed_at(now);
            GoalStats {
                name: goal.name.clone(),
                deadline: goal
                    .deadline
                    .with_timezone(&now.timezone())
                    .format("%Y-%m-%d")
                    .to_string(),
                days_remaining: remaining.days,
                total_hours: remaining.total_hours,
                urgency: goal.urgency_level_at(now),
                percent_elapsed: elapsed.percent_elapsed,
                percent_of_year: year.percent_of_year(remaining.days),
                percent_of_life: life.percent_of_life(remaining.days),
            }
        })
        .collect()
}

/// Calculate totals across goals
pub fn calculate_portfolio_stats<Tz: TimeZone>(goals: &[Goal], now: &DateTime<Tz>) -> PortfolioStats {
    if goals.is_empty() {
        return PortfolioStats::default();
    }

    let mut stats = PortfolioStats {
        total_goals: goals.len(),
        ..PortfolioStats::default()
    };
    let mut elapsed_sum = 0.0;

    for goal in goals {
        if goal.is_expired_at(now) {
            stats.expired_goals += 1;
        }
        stats.by_urgency[goal.urgency_level_at(now).severity() as usize] += 1;
        elapsed_sum += goal.time_elapsed_at(now).percent_elapsed;

        let days = goal.time_remaining_at(now).days;
        stats.nearest_days = Some(stats.nearest_days.map_or(days, |d| d.min(days)));
    }

    stats.avg_percent_elapsed = elapsed_sum / goals.len() as f64;
    stats
}
