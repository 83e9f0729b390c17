//! Daily reminder scheduling plus desktop delivery
//! Delivery currently only implements macOS notifications
use crate::domain::{Goal, MessageCategory, ProductiveLife};
use crate::messages::generate_message;
use crate::persistence::{atomic_write, read_file};
use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[cfg(target_os = "macos")]
use std::process::Command;

/// Title shown on every reminder
pub const NOTIFICATION_TITLE: &str = "⏰ FINITE";

/// One fixed daily reminder slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySlot {
    pub identifier: &'static str,
    pub hour: u32,
    pub minute: u32,
    pub category: MessageCategory,
}

pub const DAILY_SLOTS: [DailySlot; 3] = [
    DailySlot {
        identifier: "morning",
        hour: 8,
        minute: 0,
        category: MessageCategory::TimeDecay,
    },
    DailySlot {
        identifier: "afternoon",
        hour: 14,
        minute: 0,
        category: MessageCategory::SunkCost,
    },
    DailySlot {
        identifier: "evening",
        hour: 19,
        minute: 0,
        category: MessageCategory::YearProgress,
    },
];

/// Something that can hold repeating daily reminders
pub trait NotificationScheduler {
    fn schedule_daily(&mut self, identifier: &str, hour: u32, minute: u32, body: String) -> Result<()>;
    fn cancel_all(&mut self) -> Result<()>;

    /// Deliver reminders that have come due. Schedulers backed by the OS deliver on their own.
    fn deliver_due(&mut self, _now: &DateTime<Local>) -> Result<usize> {
        Ok(0)
    }
}

/// Replace the whole schedule with fresh reminders for `goals`.
///
/// Bodies are generated now, so they describe the countdown as of the
/// moment of scheduling. With no goals nothing is scheduled.
pub fn schedule_all<S, Tz, R>(
    scheduler: &mut S,
    goals: &[Goal],
    life: ProductiveLife,
    now: &DateTime<Tz>,
    rng: &mut R,
) -> Result<()>
where
    S: NotificationScheduler + ?Sized,
    Tz: TimeZone,
    R: Rng + ?Sized,
{
    scheduler.cancel_all()?;

    if goals.is_empty() {
        return Ok(());
    }

    for slot in DAILY_SLOTS.iter() {
        let body = generate_message(goals, life, slot.category, now, rng);
        scheduler.schedule_daily(slot.identifier, slot.hour, slot.minute, body)?;
    }

    log::info!("Scheduled {} daily reminders", DAILY_SLOTS.len());
    Ok(())
}

/// A reminder as stored in schedule.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledNotification {
    pub identifier: String,
    pub hour: u32,
    pub minute: u32,
    pub body: String,
    /// Slots that had already passed when this was scheduled wait for the next day
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_fired: Option<NaiveDate>,
}

impl ScheduledNotification {
    fn fire_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0)
    }

    /// Whether the slot has passed today without having fired
    pub fn is_due<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        let today = now.date_naive();
        let Some(at) = self.fire_time() else {
            return false;
        };
        if now.time() < at || self.last_fired == Some(today) {
            return false;
        }

        match (self.scheduled_at, now.timezone().from_local_datetime(&today.and_time(at)).earliest()) {
            (Some(scheduled_at), Some(fire_at)) => fire_at.with_timezone(&Utc) >= scheduled_at,
            _ => true,
        }
    }
}

/// Scheduler backed by a JSON file, polled by the dashboard loop
pub struct LocalScheduler {
    path: PathBuf,
    entries: Vec<ScheduledNotification>,
}

impl LocalScheduler {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = read_file(&path)?;
        let entries = if content.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse schedule: {}", path.display()))?
        };
        Ok(Self { path, entries })
    }

    /// Like `load`, but an unreadable schedule starts out empty.
    /// The next reschedule rewrites the file.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable schedule: {:#}", e);
            Self {
                path: path.to_path_buf(),
                entries: Vec::new(),
            }
        })
    }

    pub fn entries(&self) -> &[ScheduledNotification] {
        &self.entries
    }

    /// Reminders whose time has come today
    pub fn due<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<ScheduledNotification> {
        self.entries.iter().filter(|e| e.is_due(now)).cloned().collect()
    }

    pub fn mark_fired(&mut self, identifier: &str, date: NaiveDate) -> Result<()> {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.identifier == identifier) {
            entry.last_fired = Some(date);
        }
        self.save()
    }

    /// Deliver everything due and record it
    pub fn fire_due<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Result<usize> {
        let due = self.due(now);
        for entry in &due {
            send_desktop_notification(NOTIFICATION_TITLE, &entry.body);
            self.mark_fired(&entry.identifier, now.date_naive())?;
        }
        Ok(due.len())
    }

    /// Add or replace a daily reminder as of `scheduled_at`
    pub fn schedule_daily_at(
        &mut self,
        identifier: &str,
        hour: u32,
        minute: u32,
        body: String,
        scheduled_at: DateTime<Utc>,
    ) -> Result<()> {
        self.entries.retain(|e| e.identifier != identifier);
        self.entries.push(ScheduledNotification {
            identifier: identifier.to_string(),
            hour,
            minute,
            body,
            scheduled_at: Some(scheduled_at),
            last_fired: None,
        });
        self.save()
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        atomic_write(&self.path, &json)
    }
}

impl NotificationScheduler for LocalScheduler {
    fn schedule_daily(&mut self, identifier: &str, hour: u32, minute: u32, body: String) -> Result<()> {
        self.schedule_daily_at(identifier, hour, minute, body, Utc::now())
    }

    fn cancel_all(&mut self) -> Result<()> {
        self.entries.clear();
        self.save()
    }

    fn deliver_due(&mut self, now: &DateTime<Local>) -> Result<usize> {
        self.fire_due(now)
    }
}

/// Show a desktop notification
pub fn send_desktop_notification(title: &str, body: &str) {
    #[cfg(target_os = "macos")]
    {
        let script = format!(
            r#"display notification "{}" with title "{}""#,
            body.replace('"', "\\\""),
            title.replace('"', "\\\"")
        );

        let _ = Command::new("osascript")
            .arg("-e")
            .arg(&script)
            .output();
    }

    #[cfg(not(target_os = "macos"))]
    {
        // No-op on other platforms
        log::debug!("{}: {}", title, body);
    }
}
