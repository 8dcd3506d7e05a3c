use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{ChartId, SizePolicy};
use crate::error::{MountError, MountResult};

/// Which host mechanism the size tracker may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationPreference {
    /// Native container observation, falling back to window resize events.
    #[default]
    Auto,
    /// Window resize events only.
    WindowOnly,
    /// Never track size; widgets keep their mount-time size.
    Disabled,
}

/// Lifecycle manager tuning.
///
/// Serializable so hosts can ship it next to their page configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default)]
    pub observation: ObservationPreference,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            observation: ObservationPreference::default(),
        }
    }
}

impl LifecycleConfig {
    pub fn from_json(input: &str) -> MountResult<Self> {
        serde_json::from_str(input).map_err(|err| MountError::InvalidConfig(err.to_string()))
    }

    pub fn to_json_pretty(&self) -> MountResult<String> {
        serde_json::to_string_pretty(self).map_err(|err| MountError::InvalidConfig(err.to_string()))
    }

    #[must_use]
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    #[must_use]
    pub fn with_observation(mut self, observation: ObservationPreference) -> Self {
        self.observation = observation;
        self
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn default_debounce_ms() -> u64 {
    120
}

/// Per-chart size policy replacements, keyed by chart id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistryOverrides {
    pub policies: IndexMap<ChartId, SizePolicy>,
}

impl RegistryOverrides {
    pub fn from_json(input: &str) -> MountResult<Self> {
        let overrides: Self =
            serde_json::from_str(input).map_err(|err| MountError::InvalidConfig(err.to_string()))?;
        for policy in overrides.policies.values() {
            policy.validate()?;
        }
        Ok(overrides)
    }

    #[must_use]
    pub fn with_policy(mut self, chart_id: ChartId, policy: SizePolicy) -> Self {
        self.policies.insert(chart_id, policy);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClampBounds;

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config = LifecycleConfig::from_json("{}").expect("config");
        assert_eq!(config, LifecycleConfig::default());
        assert_eq!(config.debounce(), Duration::from_millis(120));

        let config =
            LifecycleConfig::from_json(r#"{"observation":"window_only"}"#).expect("config");
        assert_eq!(config.observation, ObservationPreference::WindowOnly);
    }

    #[test]
    fn overrides_parse_tagged_policies() {
        let overrides = RegistryOverrides::from_json(
            r#"{
                "bar": {"mode": "responsive", "bounds": {"min_width": 200, "max_width": 400, "min_height": 100, "max_height": 200}},
                "pie": {"mode": "fixed", "width": 240, "height": 240}
            }"#,
        )
        .expect("overrides");
        assert_eq!(
            overrides.policies.get(&ChartId::BAR),
            Some(&SizePolicy::Responsive {
                bounds: ClampBounds::new(200, 400, 100, 200).expect("bounds"),
                height_from_width: None,
            })
        );
        assert_eq!(
            overrides.policies.get(&ChartId::PIE),
            Some(&SizePolicy::Fixed {
                width: 240,
                height: 240
            })
        );
    }

    #[test]
    fn overrides_reject_invalid_bounds() {
        let err = RegistryOverrides::from_json(
            r#"{"bar": {"mode": "responsive", "bounds": {"min_width": 500, "max_width": 400, "min_height": 100, "max_height": 200}}}"#,
        )
        .expect_err("inverted bounds");
        assert!(matches!(err, MountError::InvalidConfig(_)));
    }
}
