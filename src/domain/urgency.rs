use serde::{Deserialize, Serialize};

/// Qualitative colour used for urgency and year-progress hints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorToken {
    Green,
    Yellow,
    Orange,
    Red,
}

/// A colour at reduced opacity, drawn behind urgency badges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundTint {
    pub color: ColorToken,
    pub opacity: f32,
}

/// Severity band derived from the share of a goal's span still remaining.
/// Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UrgencyLevel {
    /// 75-100% remaining
    Low,
    /// 50-75% remaining
    Medium,
    /// 25-50% remaining
    High,
    /// Under 25% remaining, or anything out of range
    Critical,
}

impl UrgencyLevel {
    /// Classify a percent-remaining value. Lower bounds are inclusive; any
    /// value outside [25, 100] that is not Low/Medium/High is Critical.
    pub fn from_percent_remaining(percent: f64) -> Self {
        if (75.0..=100.0).contains(&percent) {
            UrgencyLevel::Low
        } else if (50.0..75.0).contains(&percent) {
            UrgencyLevel::Medium
        } else if (25.0..50.0).contains(&percent) {
            UrgencyLevel::High
        } else {
            UrgencyLevel::Critical
        }
    }

    /// Ordinal severity, 0 for Low through 3 for Critical
    pub fn severity(&self) -> u8 {
        match self {
            UrgencyLevel::Low => 0,
            UrgencyLevel::Medium => 1,
            UrgencyLevel::High => 2,
            UrgencyLevel::Critical => 3,
        }
    }

    pub fn color(&self) -> ColorToken {
        match self {
            UrgencyLevel::Low => ColorToken::Green,
            UrgencyLevel::Medium => ColorToken::Yellow,
            UrgencyLevel::High => ColorToken::Orange,
            UrgencyLevel::Critical => ColorToken::Red,
        }
    }

    pub fn background(&self) -> BackgroundTint {
        BackgroundTint {
            color: self.color(),
            opacity: 0.15,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            UrgencyLevel::Low => "🟢",
            UrgencyLevel::Medium => "🟡",
            UrgencyLevel::High => "🟠",
            UrgencyLevel::Critical => "🔴",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UrgencyLevel::Low => "LOW",
            UrgencyLevel::Medium => "MEDIUM",
            UrgencyLevel::High => "HIGH",
            UrgencyLevel::Critical => "CRITICAL",
        }
    }

    /// Whether the display should pulse for this level
    pub fn should_pulse(&self) -> bool {
        matches!(self, UrgencyLevel::High | UrgencyLevel::Critical)
    }
}
