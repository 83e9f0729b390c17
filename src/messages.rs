//! Notification copy built from live countdown numbers
use crate::domain::{Goal, MessageCategory, ProductiveLife, YearProgress};
use chrono::{DateTime, TimeZone};
use rand::seq::SliceRandom;
use rand::Rng;

/// Message used whenever there is no goal to talk about
pub const FALLBACK_MESSAGE: &str = "Time is passing. Set a goal to track.";

/// Build every candidate message for a category.
///
/// The primary goal is the first in `goals`, which callers keep sorted by
/// deadline. Without a goal the pool holds only the fallback message.
pub fn message_pool<Tz: TimeZone>(
    goals: &[Goal],
    life: ProductiveLife,
    category: MessageCategory,
    now: &DateTime<Tz>,
) -> Vec<String> {
    let Some(primary) = goals.first() else {
        return vec![FALLBACK_MESSAGE.to_string()];
    };

    let remaining = primary.time_remaining_at(now);
    let elapsed = primary.time_elapsed_at(now);
    let year = YearProgress::at(now);
    let whole_weeks = remaining.weeks as i64;

    match category {
        MessageCategory::TimeDecay => vec![
            format!("{} days left. Time's ticking.", remaining.days),
            format!("{} hours remaining. Make them count.", remaining.formatted_hours()),
            format!("You have {} weeks. That's it.", whole_weeks),
            format!("{} minutes left. Each one matters.", remaining.formatted_minutes()),
            format!("Another day gone. {} days left.", remaining.days),
            format!(
                "{}% of your year committed to \"{}\".",
                year.share_of_remaining_year(remaining.days) as i64,
                primary.name
            ),
            format!("{} Mondays remaining. How will you use them?", whole_weeks),
            format!(
                "{} weekends left. Will they be productive or wasted?",
                remaining.weekends
            ),
        ],
        MessageCategory::YearProgress => vec![
            format!(
                "{:.1}% of {} is already gone. {} days remain.",
                year.percent_gone, year.year, year.days_remaining
            ),
            format!("{} is slipping away. Time flies.", year.month_name()),
            format!(
                "You have {} days left in {}. What will you do with them?",
                year.days_remaining, year.year
            ),
            format!("Every day, {} becomes shorter. Make today count.", year.year),
        ],
        MessageCategory::SunkCost => vec![
            format!(
                "You've burned through {} days already. Don't waste more. {} left.",
                elapsed.days, remaining.days
            ),
            format!(
                "{:.1}% of your time is gone. Make the remaining {:.1}% count.",
                elapsed.percent_elapsed,
                elapsed.percent_left()
            ),
            format!(
                "{} days wasted. {} remaining. Choose wisely.",
                elapsed.days, remaining.days
            ),
            format!(
                "Time already lost: {} days. Time you still have: {}. Act.",
                elapsed.days, remaining.days
            ),
        ],
        MessageCategory::LifeContext => vec![
            format!(
                "This goal is {:.2}% of your remaining productive life.",
                life.percent_of_life(remaining.days)
            ),
            format!(
                "You have ~{} days left. {} are for this goal. Worth it?",
                crate::domain::calendar::group_thousands(life.total_days()),
                remaining.days
            ),
            format!(
                "This deadline = {} of your finite days. Make them matter.",
                remaining.days
            ),
            "Every day you delay is one less day in your productive life.".to_string(),
        ],
    }
}

/// Pick one message for a category uniformly at random
pub fn generate_message<Tz: TimeZone, R: Rng + ?Sized>(
    goals: &[Goal],
    life: ProductiveLife,
    category: MessageCategory,
    now: &DateTime<Tz>,
    rng: &mut R,
) -> String {
    message_pool(goals, life, category, now)
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
}
