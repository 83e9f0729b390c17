pub mod calendar;
pub mod enums;
pub mod goal;
pub mod records;
pub mod urgency;
pub mod year;

pub use enums::{MessageCategory, OnboardingStep, UiMode};
pub use goal::{deadline_from_date, sort_by_deadline, Goal};
pub use records::{BlockedApp, CommonBlockableApp, ProductiveLife, User, DEFAULT_PRODUCTIVE_YEARS};
pub use urgency::{BackgroundTint, ColorToken, UrgencyLevel};
pub use year::YearProgress;
