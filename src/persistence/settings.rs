use crate::domain::{ProductiveLife, DEFAULT_PRODUCTIVE_YEARS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Small scalar settings stored in settings.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub has_completed_onboarding: bool,
    /// Zero means "not set"
    #[serde(default)]
    pub productive_years_remaining: u32,
    /// Identity of the local user record
    #[serde(default)]
    pub user_apple_id: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            has_completed_onboarding: false,
            productive_years_remaining: DEFAULT_PRODUCTIVE_YEARS,
            user_apple_id: None,
        }
    }
}

impl Settings {
    /// Productive years with the default applied when unset
    pub fn productive_years(&self) -> u32 {
        self.productive_life().years
    }

    pub fn productive_life(&self) -> ProductiveLife {
        ProductiveLife::new(self.productive_years_remaining)
    }
}

/// Load settings from settings.json, falling back to defaults
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings: {}", path.display()))?;
    Ok(settings)
}

/// Save settings to settings.json
pub fn save_settings<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    crate::persistence::atomic_write(path, &json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_nonexistent_settings() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");

        let settings = load_settings(&path).unwrap();
        assert!(!settings.has_completed_onboarding);
        assert_eq!(settings.productive_years(), 30);
    }

    #[test]
    fn test_zero_or_missing_years_read_as_default() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");

        std::fs::write(&path, r#"{"has_completed_onboarding": true}"#).unwrap();
        let settings = load_settings(&path).unwrap();
        assert!(settings.has_completed_onboarding);
        assert_eq!(settings.productive_years(), 30);

        std::fs::write(&path, r#"{"productive_years_remaining": 0}"#).unwrap();
        assert_eq!(load_settings(&path).unwrap().productive_years(), 30);
    }

    #[test]
    fn test_save_and_load_settings() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");

        let settings = Settings {
            has_completed_onboarding: true,
            productive_years_remaining: 22,
            user_apple_id: Some("local-me".to_string()),
        };
        save_settings(&path, &settings).unwrap();

        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.productive_life().total_days(), 22 * 365);
    }
}
