use super::urgency::ColorToken;
use chrono::{DateTime, Datelike, Local, Month, NaiveDate, TimeZone};

/// Progress through the current calendar year, treated as a goal that
/// started on January 1st and ends on December 31st.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearProgress {
    pub year: i32,
    /// 1-based ordinal day
    pub day_of_year: u32,
    /// 365 or 366
    pub days_in_year: u32,
    pub days_remaining: u32,
    pub percent_gone: f64,
    pub percent_remaining: f64,
    month: u32,
}

impl YearProgress {
    pub fn for_date(date: NaiveDate) -> Self {
        let year = date.year();
        let day_of_year = date.ordinal();
        let days_in_year = days_in_year(year);
        let percent_gone = day_of_year as f64 / days_in_year as f64 * 100.0;

        Self {
            year,
            day_of_year,
            days_in_year,
            days_remaining: days_in_year.saturating_sub(day_of_year),
            percent_gone,
            percent_remaining: 100.0 - percent_gone,
            month: date.month(),
        }
    }

    /// Year progress for the local calendar date of `now`
    pub fn at<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        Self::for_date(now.date_naive())
    }

    pub fn current() -> Self {
        Self::at(&Local::now())
    }

    /// Colour by calendar quarter: green, yellow, orange, then red
    pub fn urgency_color(&self) -> ColorToken {
        match self.month {
            1..=3 => ColorToken::Green,
            4..=6 => ColorToken::Yellow,
            7..=9 => ColorToken::Orange,
            _ => ColorToken::Red,
        }
    }

    pub fn month_name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("This month")
    }

    /// A day count as a share of the days left this year, uncapped.
    /// Zero once no days are left.
    pub fn share_of_remaining_year(&self, days: i64) -> f64 {
        if self.days_remaining == 0 {
            return 0.0;
        }
        days as f64 / self.days_remaining as f64 * 100.0
    }

    /// Same as `share_of_remaining_year`, capped at 100
    pub fn percent_of_year(&self, days: i64) -> f64 {
        self.share_of_remaining_year(days).min(100.0)
    }
}

/// Number of days in a calendar year
pub fn days_in_year(year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, 12, 31)
        .map(|d| d.ordinal())
        .unwrap_or(365)
}
