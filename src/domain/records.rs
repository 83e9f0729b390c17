use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Productive years assumed when none has been recorded
pub const DEFAULT_PRODUCTIVE_YEARS: u32 = 30;

/// Account record owning goals and blocked apps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub apple_id: String,
    pub productive_years_remaining: u32,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(apple_id: String, productive_years_remaining: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            apple_id,
            productive_years_remaining,
            created_at: Utc::now(),
        }
    }
}

/// An app the user wants kept out of reach while working on goals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedApp {
    pub id: Uuid,
    pub user_id: Uuid,
    pub app_bundle_id: String,
    pub app_name: String,
    pub is_enabled: bool,
}

impl BlockedApp {
    pub fn new(user_id: Uuid, app_bundle_id: String, app_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            app_bundle_id,
            app_name,
            is_enabled: true,
        }
    }

    pub fn toggle(&mut self) {
        self.is_enabled = !self.is_enabled;
    }
}

/// Well-known distracting apps offered when picking apps to block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonBlockableApp {
    pub name: &'static str,
    pub bundle_id: &'static str,
}

impl CommonBlockableApp {
    pub fn all() -> &'static [CommonBlockableApp] {
        &[
            CommonBlockableApp { name: "Instagram", bundle_id: "com.burbn.instagram" },
            CommonBlockableApp { name: "TikTok", bundle_id: "com.zhiliaoapp.musically" },
            CommonBlockableApp { name: "Twitter / X", bundle_id: "com.twitter.twitter" },
            CommonBlockableApp { name: "YouTube", bundle_id: "com.google.ios.youtube" },
            CommonBlockableApp { name: "Reddit", bundle_id: "com.reddit.Reddit" },
            CommonBlockableApp { name: "Netflix", bundle_id: "com.netflix.Netflix" },
            CommonBlockableApp { name: "Facebook", bundle_id: "com.facebook.Facebook" },
            CommonBlockableApp { name: "Snapchat", bundle_id: "com.toyopagroup.picaboo" },
            CommonBlockableApp { name: "Discord", bundle_id: "com.hammerandchisel.discord" },
            CommonBlockableApp { name: "Twitch", bundle_id: "tv.twitch" },
        ]
    }

    /// Look up a catalogue entry by display name (case-insensitive)
    pub fn find(name: &str) -> Option<&'static CommonBlockableApp> {
        Self::all()
            .iter()
            .find(|app| app.name.eq_ignore_ascii_case(name.trim()))
    }
}

/// The user's estimate of remaining productive lifespan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductiveLife {
    pub years: u32,
}

impl ProductiveLife {
    /// Zero is treated as "not set" and replaced by the default
    pub fn new(years: u32) -> Self {
        Self {
            years: if years == 0 { DEFAULT_PRODUCTIVE_YEARS } else { years },
        }
    }

    pub fn total_days(&self) -> i64 {
        self.years as i64 * 365
    }

    pub fn total_weeks(&self) -> i64 {
        self.years as i64 * 52
    }

    pub fn total_months(&self) -> i64 {
        self.years as i64 * 12
    }

    /// A day count as a percentage of the remaining productive days
    pub fn percent_of_life(&self, days: i64) -> f64 {
        days as f64 / self.total_days().max(1) as f64 * 100.0
    }
}

impl Default for ProductiveLife {
    fn default() -> Self {
        Self::new(DEFAULT_PRODUCTIVE_YEARS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_productive_life_totals() {
        let life = ProductiveLife::new(30);
        assert_eq!(life.total_days(), 10_950);
        assert_eq!(life.total_weeks(), 1_560);
        assert_eq!(life.total_months(), 360);
    }

    #[test]
    fn test_productive_life_zero_uses_default() {
        assert_eq!(ProductiveLife::new(0).years, DEFAULT_PRODUCTIVE_YEARS);
        assert_eq!(ProductiveLife::default().years, 30);
    }

    #[test]
    fn test_percent_of_life() {
        let life = ProductiveLife::new(1);
        assert!((life.percent_of_life(73) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_catalog() {
        assert_eq!(CommonBlockableApp::all().len(), 10);
        let tiktok = CommonBlockableApp::find("tiktok").unwrap();
        assert_eq!(tiktok.bundle_id, "com.zhiliaoapp.musically");
        assert!(CommonBlockableApp::find("Solitaire").is_none());
    }

    #[test]
    fn test_blocked_app_toggle() {
        let mut app = BlockedApp::new(Uuid::new_v4(), "tv.twitch".to_string(), "Twitch".to_string());
        assert!(app.is_enabled);
        app.toggle();
        assert!(!app.is_enabled);
    }
}
