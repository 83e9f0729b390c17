use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Theme of a notification message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageCategory {
    TimeDecay,
    YearProgress,
    SunkCost,
    LifeContext,
}

impl MessageCategory {
    /// Parse category from a tag like "time-decay"
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().replace('_', "-").as_str() {
            "time-decay" => Some(Self::TimeDecay),
            "year-progress" => Some(Self::YearProgress),
            "sunk-cost" => Some(Self::SunkCost),
            "life-context" => Some(Self::LifeContext),
            _ => None,
        }
    }

    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::TimeDecay => "time-decay",
            Self::YearProgress => "year-progress",
            Self::SunkCost => "sunk-cost",
            Self::LifeContext => "life-context",
        }
    }

    pub fn all() -> &'static [MessageCategory] {
        &[
            MessageCategory::TimeDecay,
            MessageCategory::YearProgress,
            MessageCategory::SunkCost,
            MessageCategory::LifeContext,
        ]
    }
}

/// UI mode for the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingGoal,
    EditingGoal,
    ConfirmDelete,
    EditingYears,
    Onboarding,
}

/// First-run walkthrough, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingStep {
    Welcome,
    YearContext,
    ProductiveYears,
    FirstGoal,
    CountdownBegins { goal_id: Uuid },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_category_from_tag() {
        assert_eq!(MessageCategory::from_tag("time-decay"), Some(MessageCategory::TimeDecay));
        assert_eq!(MessageCategory::from_tag("YEAR-PROGRESS"), Some(MessageCategory::YearProgress));
        assert_eq!(MessageCategory::from_tag("sunk_cost"), Some(MessageCategory::SunkCost));
        assert_eq!(MessageCategory::from_tag("life-context"), Some(MessageCategory::LifeContext));
        assert_eq!(MessageCategory::from_tag("weather"), None);
    }

    #[test]
    fn test_message_category_tag_round_trip() {
        for category in MessageCategory::all() {
            assert_eq!(MessageCategory::from_tag(category.to_tag()), Some(*category));
        }
    }
}
