use chrono::{DateTime, Datelike, Days, Duration, TimeZone};

/// Average month length used for the fractional month count
pub const AVERAGE_MONTH_DAYS: f64 = 30.44;

/// Shift a date-time by whole calendar days, keeping its local time of day
fn shift_days<Tz: TimeZone>(dt: &DateTime<Tz>, days: u64) -> DateTime<Tz> {
    dt.clone()
        .checked_add_days(Days::new(days))
        .unwrap_or_else(|| dt.clone() + Duration::days(days as i64))
}

/// Whole calendar days that fit between `start` and `end` (requires start <= end)
fn whole_days_forward<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> i64 {
    let end_local = end.with_timezone(&start.timezone());
    let mut days = (end_local.date_naive() - start.date_naive()).num_days().max(0);

    // The date difference over-counts by one when end's time of day is earlier than start's
    while days > 0 && shift_days(start, days as u64) > *end {
        days -= 1;
    }

    days
}

/// Signed whole-day difference from `start` to `end`, truncated toward zero
pub fn calendar_days<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> i64 {
    if end >= start {
        whole_days_forward(start, end)
    } else {
        -whole_days_forward(end, start)
    }
}

/// Calendar-day difference floored at 1, for use as a span denominator
pub fn days_between<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> i64 {
    calendar_days(start, end).max(1)
}

/// Raw duration in seconds, floored at zero
pub fn total_seconds<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> i64 {
    end.clone()
        .signed_duration_since(start.clone())
        .num_seconds()
        .max(0)
}

/// Days, hours, minutes and seconds as calendar components.
///
/// Days are whole calendar days; the other three are the residual after
/// stepping `days` forward from `start`. All zero when `end <= start`.
pub fn calendar_components<Tz: TimeZone>(
    start: &DateTime<Tz>,
    end: &DateTime<Tz>,
) -> (i64, i64, i64, i64) {
    if end <= start {
        return (0, 0, 0, 0);
    }

    let days = whole_days_forward(start, end);
    let anchor = shift_days(start, days as u64);
    let residual = end
        .clone()
        .signed_duration_since(anchor)
        .max(Duration::zero());

    (
        days,
        residual.num_hours(),
        residual.num_minutes() % 60,
        residual.num_seconds() % 60,
    )
}

/// Fractional weeks in a day count
pub fn weeks(days: i64) -> f64 {
    days as f64 / 7.0
}

/// Fractional (approximate) months in a day count
pub fn months(days: i64) -> f64 {
    days as f64 / AVERAGE_MONTH_DAYS
}

/// Count weekdays and weekend units between two instants.
///
/// Walks one calendar day at a time from `start` while still before `end`,
/// classifying each step by its local day of week. The second value is the
/// number of weekend days halved, i.e. weekend pairs.
pub fn weekday_weekend_counts<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> (i64, i64) {
    if end <= start {
        return (0, 0);
    }

    // Number of day steps that land strictly before `end`
    let days = whole_days_forward(start, end);
    let steps = if shift_days(start, days as u64) < *end {
        days + 1
    } else {
        days
    };

    let first = start.weekday().num_days_from_monday() as i64;
    let mut weekend_days = (steps / 7) * 2;
    for offset in 0..(steps % 7) {
        // Saturday = 5, Sunday = 6
        if (first + offset) % 7 >= 5 {
            weekend_days += 1;
        }
    }

    (steps - weekend_days, weekend_days / 2)
}

/// Group an integer with thousands separators ("12,345")
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Time left between "now" and a deadline. Every field is non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRemaining {
    /// Whole calendar days
    pub days: i64,
    /// Residual hours after whole days
    pub hours: i64,
    /// Residual minutes after whole hours
    pub minutes: i64,
    /// Residual seconds after whole minutes
    pub seconds: i64,
    pub total_hours: i64,
    pub total_minutes: i64,
    pub total_seconds: i64,
    pub weeks: f64,
    pub months: f64,
    pub weekdays: i64,
    /// Weekend pairs, not weekend days
    pub weekends: i64,
}

impl TimeRemaining {
    pub fn between<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> Self {
        let (days, hours, minutes, seconds) = calendar_components(start, end);
        let total = total_seconds(start, end);
        let (weekdays, weekends) = weekday_weekend_counts(start, end);

        Self {
            days,
            hours,
            minutes,
            seconds,
            total_hours: total / 3600,
            total_minutes: total / 60,
            total_seconds: total,
            weeks: weeks(days),
            months: months(days),
            weekdays,
            weekends,
        }
    }

    /// Check whether every component has run out
    pub fn is_zero(&self) -> bool {
        self.total_seconds == 0
            && self.days == 0
            && self.hours == 0
            && self.minutes == 0
            && self.seconds == 0
    }

    /// Remaining days as a percentage of a span, capped at 100
    pub fn percent_remaining(&self, total_days: i64) -> f64 {
        if total_days <= 0 {
            return 0.0;
        }
        (self.days as f64 / total_days as f64 * 100.0).min(100.0)
    }

    /// Format as "12 days 3h 4m 5s", dropping leading zero units
    pub fn formatted_countdown(&self) -> String {
        if self.days > 0 {
            format!(
                "{} days {}h {}m {}s",
                self.days, self.hours, self.minutes, self.seconds
            )
        } else if self.hours > 0 {
            format!("{}h {}m {}s", self.hours, self.minutes, self.seconds)
        } else if self.minutes > 0 {
            format!("{}m {}s", self.minutes, self.seconds)
        } else {
            format!("{}s", self.seconds)
        }
    }

    pub fn formatted_hours(&self) -> String {
        group_thousands(self.total_hours)
    }

    pub fn formatted_minutes(&self) -> String {
        group_thousands(self.total_minutes)
    }

    pub fn formatted_seconds(&self) -> String {
        group_thousands(self.total_seconds)
    }

    pub fn formatted_weeks(&self) -> String {
        format!("{:.1}", self.weeks)
    }

    pub fn formatted_months(&self) -> String {
        format!("{:.1}", self.months)
    }
}

/// Time already spent between a goal's creation and "now"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeElapsed {
    /// Whole calendar days since creation (never negative)
    pub days: i64,
    /// Share of the creation-to-deadline span already used, 0..=100
    pub percent_elapsed: f64,
}

impl TimeElapsed {
    pub fn between<Tz: TimeZone>(
        creation: &DateTime<Tz>,
        now: &DateTime<Tz>,
        deadline: &DateTime<Tz>,
    ) -> Self {
        let days = calendar_days(creation, now).max(0);
        let total_days = days_between(creation, deadline);
        let percent_elapsed = (days as f64 / total_days as f64 * 100.0).clamp(0.0, 100.0);

        Self {
            days,
            percent_elapsed,
        }
    }

    /// Complement of `percent_elapsed`
    pub fn percent_left(&self) -> f64 {
        100.0 - self.percent_elapsed
    }
}
