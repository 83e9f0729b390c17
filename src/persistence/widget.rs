use super::files::{atomic_write, read_file, remove_file};
use crate::domain::calendar::{calendar_components, calendar_days};
use crate::domain::{Goal, UrgencyLevel, YearProgress};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How often a widget timeline asks for a fresh entry
pub const WIDGET_REFRESH_MINUTES: i64 = 15;

/// Primary-goal fields shared with the widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetSnapshot {
    pub goal_name: String,
    pub deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl WidgetSnapshot {
    pub fn from_goal(goal: &Goal) -> Self {
        Self {
            goal_name: goal.name.clone(),
            deadline: goal.deadline,
            created_at: goal.created_at,
        }
    }
}

/// Writes the primary goal where the widget can pick it up
pub struct WidgetSync {
    path: PathBuf,
}

impl WidgetSync {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Share the first goal, or clear the widget when there is none
    pub fn sync_goals(&self, goals: &[Goal]) -> Result<()> {
        match goals.first() {
            Some(primary) => self.sync_goal(primary),
            None => self.clear(),
        }
    }

    pub fn sync_goal(&self, goal: &Goal) -> Result<()> {
        let json = serde_json::to_string_pretty(&WidgetSnapshot::from_goal(goal))?;
        atomic_write(&self.path, &json)?;
        self.reload();
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        remove_file(&self.path)?;
        self.reload();
        Ok(())
    }

    pub fn load(&self) -> Result<Option<WidgetSnapshot>> {
        let content = read_file(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        let snapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse widget data: {}", self.path.display()))?;
        Ok(Some(snapshot))
    }

    /// Signal that widget timelines should be rebuilt
    pub fn reload(&self) {
        log::debug!("Widget data refreshed at {}", self.path.display());
    }
}

/// Name shown when no goal has been shared
pub const NO_GOAL_NAME: &str = "Set a goal";

/// What the widget shows at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetEntry {
    pub goal_name: String,
    pub days_remaining: i64,
    pub hours_remaining: i64,
    pub percent_remaining: f64,
    pub percent_of_year: f64,
    pub urgency: UrgencyLevel,
    pub next_refresh: DateTime<Utc>,
}

impl WidgetEntry {
    /// Compute an entry from shared data. Without a snapshot the widget
    /// prompts for a goal, counting down 30 days.
    ///
    /// Percent remaining is not clamped, so a span that started after `now`
    /// reads over 100 and classifies as Critical.
    pub fn compute<Tz: TimeZone>(snapshot: Option<&WidgetSnapshot>, now: &DateTime<Tz>) -> Self {
        let now_utc = now.with_timezone(&Utc);
        let (goal_name, deadline, created) = match snapshot {
            Some(s) => (s.goal_name.clone(), s.deadline, s.created_at),
            None => (NO_GOAL_NAME.to_string(), now_utc + Duration::days(30), now_utc),
        };

        let tz = now.timezone();
        let deadline = deadline.with_timezone(&tz);
        let created = created.with_timezone(&tz);

        let (days_remaining, hours, _, _) = calendar_components(now, &deadline);
        let total_days = calendar_days(&created, &deadline);
        let percent_remaining = if total_days > 0 {
            days_remaining as f64 / total_days as f64 * 100.0
        } else {
            0.0
        };

        Self {
            goal_name,
            days_remaining,
            hours_remaining: days_remaining * 24 + hours,
            percent_remaining,
            percent_of_year: YearProgress::at(now).percent_of_year(days_remaining),
            urgency: UrgencyLevel::from_percent_remaining(percent_remaining),
            next_refresh: now_utc + Duration::minutes(WIDGET_REFRESH_MINUTES),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use uuid::Uuid;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_sync_and_clear() {
        let temp_dir = tempdir().unwrap();
        let sync = WidgetSync::new(temp_dir.path().join("widget.json"));
        let user = Uuid::new_v4();
        let goals = vec![
            Goal::new(user, "First".to_string(), utc(2024, 3, 1)),
            Goal::new(user, "Second".to_string(), utc(2024, 9, 1)),
        ];

        sync.sync_goals(&goals).unwrap();
        let snapshot = sync.load().unwrap().unwrap();
        assert_eq!(snapshot.goal_name, "First");
        assert_eq!(snapshot.deadline, utc(2024, 3, 1));

        sync.sync_goals(&[]).unwrap();
        assert!(sync.load().unwrap().is_none());
    }

    #[test]
    fn test_entry_from_snapshot() {
        let snapshot = WidgetSnapshot {
            goal_name: "Launch".to_string(),
            deadline: Utc.with_ymd_and_hms(2024, 6, 10, 6, 0, 0).unwrap(),
            created_at: utc(2024, 1, 1),
        };
        let now = utc(2024, 1, 1);

        let entry = WidgetEntry::compute(Some(&snapshot), &now);
        assert_eq!(entry.goal_name, "Launch");
        assert_eq!(entry.days_remaining, 161);
        assert_eq!(entry.hours_remaining, 161 * 24 + 6);
        assert_eq!(entry.percent_remaining, 100.0);
        assert_eq!(entry.urgency, UrgencyLevel::Low);
        assert!((entry.percent_of_year - 161.0 / 365.0 * 100.0).abs() < 1e-9);
        assert_eq!(entry.next_refresh, Utc.with_ymd_and_hms(2024, 1, 1, 0, 15, 0).unwrap());
    }

    #[test]
    fn test_entry_placeholder_without_snapshot() {
        let now = utc(2024, 2, 1);
        let entry = WidgetEntry::compute(None, &now);

        assert_eq!(entry.goal_name, "Set a goal");
        assert_eq!(entry.days_remaining, 30);
        assert_eq!(entry.percent_remaining, 100.0);
    }

    #[test]
    fn test_entry_created_after_now_is_critical() {
        let snapshot = WidgetSnapshot {
            goal_name: "Future start".to_string(),
            deadline: utc(2024, 3, 1),
            created_at: utc(2024, 2, 20),
        };
        let entry = WidgetEntry::compute(Some(&snapshot), &utc(2024, 2, 1));

        assert_eq!(entry.days_remaining, 29);
        assert!(entry.percent_remaining > 100.0);
        assert_eq!(entry.urgency, UrgencyLevel::Critical);
    }

    #[test]
    fn test_entry_for_degenerate_span() {
        let snapshot = WidgetSnapshot {
            goal_name: "Backdated".to_string(),
            deadline: utc(2024, 1, 1),
            created_at: utc(2024, 2, 1),
        };
        let entry = WidgetEntry::compute(Some(&snapshot), &utc(2024, 3, 1));

        assert_eq!(entry.days_remaining, 0);
        assert_eq!(entry.percent_remaining, 0.0);
        assert_eq!(entry.urgency, UrgencyLevel::Critical);
    }
}
