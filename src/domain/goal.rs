use super::calendar::{days_between, TimeElapsed, TimeRemaining};
use super::urgency::UrgencyLevel;
use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Validation failures for goal edits
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GoalError {
    #[error("Goal name cannot be empty")]
    EmptyName,
}

/// A user-defined target with a deadline.
///
/// Deadline and creation time are independent: a deadline in the past is
/// allowed and simply reports zero time remaining.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub deadline: DateTime<Utc>,
    #[serde(default)]
    pub why_it_matters: Option<String>,
    #[serde(default)]
    pub what_youll_regret: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(user_id: Uuid, name: String, deadline: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            deadline,
            why_it_matters: None,
            what_youll_regret: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_why(mut self, why: impl Into<String>) -> Self {
        self.why_it_matters = non_blank(why.into());
        self
    }

    pub fn with_regret(mut self, regret: impl Into<String>) -> Self {
        self.what_youll_regret = non_blank(regret.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Reject goals without a usable name
    pub fn validate(&self) -> Result<(), GoalError> {
        if self.name.trim().is_empty() {
            return Err(GoalError::EmptyName);
        }
        Ok(())
    }

    pub fn rename(&mut self, name: String) -> Result<(), GoalError> {
        if name.trim().is_empty() {
            return Err(GoalError::EmptyName);
        }
        self.name = name;
        Ok(())
    }

    pub fn reschedule(&mut self, deadline: DateTime<Utc>) {
        self.deadline = deadline;
    }

    /// Time left until the deadline, as seen from `now`
    pub fn time_remaining_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> TimeRemaining {
        let deadline = self.deadline.with_timezone(&now.timezone());
        TimeRemaining::between(now, &deadline)
    }

    /// Time spent since creation, as seen from `now`
    pub fn time_elapsed_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> TimeElapsed {
        let tz = now.timezone();
        TimeElapsed::between(
            &self.created_at.with_timezone(&tz),
            now,
            &self.deadline.with_timezone(&tz),
        )
    }

    /// Calendar days from creation to deadline, never less than 1
    pub fn total_days<Tz: TimeZone>(&self, tz: &Tz) -> i64 {
        days_between(
            &self.created_at.with_timezone(tz),
            &self.deadline.with_timezone(tz),
        )
    }

    /// Share of the creation-to-deadline span still left, 0..=100
    pub fn percent_remaining_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> f64 {
        let total_days = self.total_days(&now.timezone());
        self.time_remaining_at(now)
            .percent_remaining(total_days)
            .clamp(0.0, 100.0)
    }

    pub fn urgency_level_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> UrgencyLevel {
        UrgencyLevel::from_percent_remaining(self.percent_remaining_at(now))
    }

    pub fn time_remaining(&self) -> TimeRemaining {
        self.time_remaining_at(&Local::now())
    }

    pub fn time_elapsed(&self) -> TimeElapsed {
        self.time_elapsed_at(&Local::now())
    }

    pub fn urgency_level(&self) -> UrgencyLevel {
        self.urgency_level_at(&Local::now())
    }

    pub fn is_expired_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.deadline <= now.with_timezone(&Utc)
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Sort goals so the nearest deadline comes first
pub fn sort_by_deadline(goals: &mut [Goal]) {
    goals.sort_by(|a, b| a.deadline.cmp(&b.deadline));
}

/// Deadline for a calendar date: the last second of that day in local time
pub fn deadline_from_date(date: NaiveDate) -> DateTime<Utc> {
    let end_of_day = date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN));
    Local
        .from_local_datetime(&end_of_day)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&end_of_day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn sample_goal() -> Goal {
        Goal::new(Uuid::new_v4(), "Ship the book".to_string(), utc(2024, 6, 10))
            .with_created_at(utc(2024, 1, 1))
    }

    #[test]
    fn test_goal_on_creation_day() {
        let goal = sample_goal();
        let now = utc(2024, 1, 1);

        let elapsed = goal.time_elapsed_at(&now);
        assert_eq!(elapsed.days, 0);
        assert_eq!(elapsed.percent_elapsed, 0.0);

        assert_eq!(goal.time_remaining_at(&now).days, 161);
        assert_eq!(goal.urgency_level_at(&now), UrgencyLevel::Low);
    }

    #[test]
    fn test_goal_at_deadline() {
        let goal = sample_goal();
        let now = goal.deadline;

        assert_eq!(goal.time_elapsed_at(&now).percent_elapsed, 100.0);
        assert!(goal.time_remaining_at(&now).is_zero());
        assert_eq!(goal.urgency_level_at(&now), UrgencyLevel::Critical);
        assert!(goal.is_expired_at(&now));
    }

    #[test]
    fn test_views_read_the_clock() {
        let goal = Goal::new(Uuid::new_v4(), "Next year".to_string(), Utc::now() + Duration::days(400));

        assert!(goal.time_remaining().days >= 399);
        assert!(goal.time_elapsed().percent_elapsed < 1.0);
        assert_eq!(goal.urgency_level(), UrgencyLevel::Low);

        let overdue = Goal::new(Uuid::new_v4(), "Yesterday".to_string(), Utc::now() - Duration::days(1));
        assert!(overdue.time_remaining().is_zero());
        assert_eq!(overdue.urgency_level(), UrgencyLevel::Critical);
    }

    #[test]
    fn test_goal_past_deadline_stays_clamped() {
        let goal = sample_goal();
        let now = utc(2030, 1, 1);

        let remaining = goal.time_remaining_at(&now);
        assert!(remaining.is_zero());
        assert_eq!(remaining.weekends, 0);
        assert_eq!(goal.percent_remaining_at(&now), 0.0);
        assert_eq!(goal.time_elapsed_at(&now).percent_elapsed, 100.0);
    }

    #[test]
    fn test_urgency_moves_through_bands() {
        // 100-day span: created Jan 1, due Apr 10
        let goal = Goal::new(Uuid::new_v4(), "Run".to_string(), utc(2024, 4, 10))
            .with_created_at(utc(2024, 1, 1));

        assert_eq!(goal.urgency_level_at(&utc(2024, 1, 11)), UrgencyLevel::Low);
        assert_eq!(goal.urgency_level_at(&utc(2024, 2, 10)), UrgencyLevel::Medium);
        assert_eq!(goal.urgency_level_at(&utc(2024, 3, 11)), UrgencyLevel::High);
        assert_eq!(goal.urgency_level_at(&utc(2024, 4, 1)), UrgencyLevel::Critical);
    }

    #[test]
    fn test_same_day_deadline_reads_zero_percent() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let goal = Goal::new(Uuid::new_v4(), "Today".to_string(), created + chrono::Duration::hours(10))
            .with_created_at(created);

        assert_eq!(goal.total_days(&Utc), 1);
        assert_eq!(goal.percent_remaining_at(&created), 0.0);
        assert_eq!(goal.urgency_level_at(&created), UrgencyLevel::Critical);
    }

    #[test]
    fn test_validate_and_rename() {
        let mut goal = sample_goal();
        assert!(goal.validate().is_ok());

        assert_eq!(goal.rename("   ".to_string()), Err(GoalError::EmptyName));
        assert_eq!(goal.name, "Ship the book");

        goal.rename("Ship the second book".to_string()).unwrap();
        assert_eq!(goal.name, "Ship the second book");

        let blank = Goal::new(Uuid::new_v4(), String::new(), utc(2024, 6, 10));
        assert_eq!(blank.validate(), Err(GoalError::EmptyName));
    }

    #[test]
    fn test_optional_fields_ignore_blank_input() {
        let goal = sample_goal().with_why("  ").with_regret("Never finishing");
        assert_eq!(goal.why_it_matters, None);
        assert_eq!(goal.what_youll_regret.as_deref(), Some("Never finishing"));
    }

    #[test]
    fn test_sort_by_deadline() {
        let user = Uuid::new_v4();
        let mut goals = vec![
            Goal::new(user, "Later".to_string(), utc(2025, 1, 1)),
            Goal::new(user, "Sooner".to_string(), utc(2024, 7, 1)),
        ];

        sort_by_deadline(&mut goals);
        assert_eq!(goals[0].name, "Sooner");
        assert_eq!(goals[1].name, "Later");
    }

    #[test]
    fn test_serialized_field_names() {
        let goal = sample_goal().with_why("Because");
        let json = serde_json::to_value(&goal).unwrap();

        assert!(json.get("user_id").is_some());
        assert!(json.get("why_it_matters").is_some());
        assert!(json.get("what_youll_regret").is_some());
        assert!(json.get("created_at").is_some());

        let back: Goal = serde_json::from_value(json).unwrap();
        assert_eq!(back, goal);
    }

    #[test]
    fn test_deadline_from_date_is_end_of_local_day() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let deadline = deadline_from_date(date).with_timezone(&Local);

        assert_eq!(deadline.date_naive(), date);
        assert_eq!(deadline.time(), NaiveTime::from_hms_opt(23, 59, 59).unwrap());
    }
}
