use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::vedic::dashas::MAX_DEPTH;

/// Tunables of the chart engine. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub min_birth_year: i32,
    pub max_birth_year: i32,
    pub max_uncertainty_minutes: u32,
    /// Length of the upcoming-period window
    pub window_months: u32,
    pub max_window_months: u32,
    /// Deepest dasha level reported for the current instant (0-4)
    pub dasha_depth: u8,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            min_birth_year: 1900,
            max_birth_year: 2100,
            max_uncertainty_minutes: 10,
            window_months: 12,
            max_window_months: 120,
            dasha_depth: 2,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RootSettingsToml {
    #[serde(default)]
    engine: EngineSettings,
}

impl EngineSettings {
    /// Parse the `[engine]` table of a TOML document; a missing table means defaults.
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let root: RootSettingsToml =
            toml::from_str(text).context("Failed to parse [engine] settings")?;
        root.engine.validate()?;
        Ok(root.engine)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.min_birth_year > self.max_birth_year {
            anyhow::bail!(
                "engine.min_birth_year ({}) is after engine.max_birth_year ({})",
                self.min_birth_year,
                self.max_birth_year
            );
        }
        if self.window_months == 0 || self.window_months > self.max_window_months {
            anyhow::bail!(
                "engine.window_months must be within 1..={}, got {}",
                self.max_window_months,
                self.window_months
            );
        }
        if self.dasha_depth > MAX_DEPTH {
            anyhow::bail!("engine.dasha_depth must be at most {MAX_DEPTH}, got {}", self.dasha_depth);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_table_uses_defaults() {
        let settings = EngineSettings::from_toml_str("").unwrap();
        assert_eq!(settings, EngineSettings::default());
    }

    #[test]
    fn test_partial_table_keeps_other_defaults() {
        let settings = EngineSettings::from_toml_str("[engine]\nwindow_months = 24\n").unwrap();
        assert_eq!(settings.window_months, 24);
        assert_eq!(settings.max_birth_year, 2100);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(EngineSettings::from_toml_str("[engine]\nwindow_months = 0\n").is_err());
        assert!(EngineSettings::from_toml_str("[engine]\ndasha_depth = 9\n").is_err());
        assert!(EngineSettings::from_toml_str("[engine]\nmin_birth_year = 2200\n").is_err());
    }
}
