//! Operator-local control panel settings.
//!
//! The admin API has no settings endpoint, so the values live in a JSON file
//! next to the rest of the CLI state.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Unknown settings category '{0}' (expected notifications, rewards, pricing or system)")]
    UnknownCategory(String),

    #[error("Unknown setting '{category}.{key}'")]
    UnknownKey { category: String, key: String },

    #[error("Invalid value '{value}' for '{key}': expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("Invalid settings: {0}")]
    Invalid(String),

    #[error("Settings file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings format error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub email_alerts: bool,
    pub sms_alerts: bool,
    pub push_notifications: bool,
    pub maintenance_alerts: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RewardSettings {
    pub bronze_threshold: u32,
    pub silver_threshold: u32,
    pub gold_threshold: u32,
    pub eco_hero_threshold: u32,
    pub auto_reward_issue: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PricingSettings {
    /// Points paid per accepted container
    pub container_price: f64,
    pub bonus_multiplier: f64,
    pub premium_user_bonus: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemSettings {
    pub maintenance_mode: bool,
    pub auto_backup: bool,
    /// Days
    pub log_retention: u32,
    /// Requests per minute
    pub api_rate_limit: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    pub notifications: NotificationSettings,
    pub rewards: RewardSettings,
    pub pricing: PricingSettings,
    pub system: SystemSettings,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_alerts: true,
            sms_alerts: false,
            push_notifications: true,
            maintenance_alerts: true,
        }
    }
}

impl Default for RewardSettings {
    fn default() -> Self {
        Self {
            bronze_threshold: 50,
            silver_threshold: 150,
            gold_threshold: 500,
            eco_hero_threshold: 1000,
            auto_reward_issue: true,
        }
    }
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            container_price: 2.0,
            bonus_multiplier: 1.5,
            premium_user_bonus: 0.2,
        }
    }
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            maintenance_mode: false,
            auto_backup: true,
            log_retention: 90,
            api_rate_limit: 1000,
        }
    }
}

pub const CATEGORIES: [&str; 4] = ["notifications", "rewards", "pricing", "system"];

/// `ecoHeroThreshold`, `eco_hero_threshold` and `eco-hero-threshold` name the same key.
fn normalize(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

fn parse_like(current: &Value, key: &str, raw: &str) -> Result<Value, SettingsError> {
    let invalid = |expected| SettingsError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
        expected,
    };
    let raw_trimmed = raw.trim();

    match current {
        Value::Bool(_) => match raw_trimmed.to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Ok(Value::Bool(true)),
            "false" | "off" | "no" | "0" => Ok(Value::Bool(false)),
            _ => Err(invalid("true or false")),
        },
        Value::Number(n) if n.is_u64() => raw_trimmed
            .parse::<u32>()
            .map(Value::from)
            .map_err(|_| invalid("a non-negative integer")),
        Value::Number(_) => match raw_trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Value::from(v)),
            _ => Err(invalid("a number")),
        },
        _ => Ok(Value::String(raw.to_string())),
    }
}

impl ControlSettings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&content)?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Change one value from its textual form, keeping the field's type.
    pub fn set(&mut self, category: &str, key: &str, value: &str) -> Result<(), SettingsError> {
        let category_name = CATEGORIES
            .iter()
            .find(|c| c.eq_ignore_ascii_case(category.trim()))
            .ok_or_else(|| SettingsError::UnknownCategory(category.to_string()))?;

        let mut tree = serde_json::to_value(&*self)?;
        let section: &mut Map<String, Value> = tree
            .get_mut(*category_name)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| SettingsError::UnknownCategory(category.to_string()))?;

        let wanted = normalize(key);
        let field = section
            .keys()
            .find(|k| normalize(k) == wanted)
            .cloned()
            .ok_or_else(|| SettingsError::UnknownKey {
                category: category_name.to_string(),
                key: key.to_string(),
            })?;

        let parsed = parse_like(&section[&field], &field, value)?;
        section.insert(field, parsed);

        let updated: Self = serde_json::from_value(tree)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let r = &self.rewards;
        if !(r.bronze_threshold < r.silver_threshold
            && r.silver_threshold < r.gold_threshold
            && r.gold_threshold < r.eco_hero_threshold)
        {
            return Err(SettingsError::Invalid(
                "reward thresholds must increase from bronze to eco hero".to_string(),
            ));
        }

        let p = &self.pricing;
        if p.container_price < 0.0 || p.premium_user_bonus < 0.0 {
            return Err(SettingsError::Invalid("prices and bonuses must not be negative".to_string()));
        }
        if p.bonus_multiplier < 1.0 {
            return Err(SettingsError::Invalid("bonus multiplier must be at least 1".to_string()));
        }

        let s = &self.system;
        if s.log_retention == 0 || s.api_rate_limit == 0 {
            return Err(SettingsError::Invalid(
                "log retention and API rate limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Flattened `category.key = value` view for text output.
    pub fn entries(&self) -> Vec<(String, Value)> {
        let tree = serde_json::to_value(self).unwrap_or(Value::Null);
        let mut entries = Vec::new();
        for category in CATEGORIES {
            if let Some(section) = tree.get(category).and_then(Value::as_object) {
                for (key, value) in section {
                    entries.push((format!("{}.{}", category, key), value.clone()));
                }
            }
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_control_panel() {
        let s = ControlSettings::default();
        assert!(s.notifications.email_alerts);
        assert!(!s.notifications.sms_alerts);
        assert_eq!(s.rewards.eco_hero_threshold, 1000);
        assert_eq!(s.pricing.bonus_multiplier, 1.5);
        assert_eq!(s.system.log_retention, 90);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn set_accepts_camel_and_snake_keys() {
        let mut s = ControlSettings::default();
        s.set("rewards", "goldThreshold", "600").unwrap();
        s.set("Pricing", "container_price", "2.5").unwrap();
        s.set("system", "maintenance-mode", "on").unwrap();

        assert_eq!(s.rewards.gold_threshold, 600);
        assert_eq!(s.pricing.container_price, 2.5);
        assert!(s.system.maintenance_mode);
    }

    #[test]
    fn set_rejects_unknown_and_unparsable_values() {
        let mut s = ControlSettings::default();
        assert!(matches!(s.set("billing", "x", "1"), Err(SettingsError::UnknownCategory(_))));
        assert!(matches!(s.set("system", "colour", "1"), Err(SettingsError::UnknownKey { .. })));
        assert!(matches!(
            s.set("system", "apiRateLimit", "lots"),
            Err(SettingsError::InvalidValue { .. })
        ));
        assert_eq!(s, ControlSettings::default());
    }

    #[test]
    fn thresholds_must_stay_ascending() {
        let mut s = ControlSettings::default();
        let err = s.set("rewards", "silverThreshold", "40").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        assert_eq!(s.rewards.silver_threshold, 150);
    }

    #[test]
    fn save_and_load_round_trip_through_file() {
        let dir = std::env::temp_dir().join(format!("yaxshi-settings-{}", std::process::id()));
        let path = dir.join("control.json");
        let mut s = ControlSettings::default();
        s.set("notifications", "smsAlerts", "true").unwrap();

        s.save(&path).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"smsAlerts\": true"));
        assert_eq!(ControlSettings::load(&path).unwrap(), s);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_loads_defaults() {
        let path = std::env::temp_dir().join("yaxshi-settings-does-not-exist.json");
        assert_eq!(ControlSettings::load(&path).unwrap(), ControlSettings::default());
    }
}
