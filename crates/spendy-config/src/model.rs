use serde::{de::Deserializer, Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ConfigError;

pub const BUCKETING_YEAR_MONTH: &str = "year-month";
pub const BUCKETING_MONTH: &str = "month";

/// Keys accepted by [`Config::set`], in display order.
pub const SETTING_KEYS: [&str; 11] = [
    "locale",
    "currency",
    "page_size",
    "month_bucketing",
    "date_range",
    "sort_by",
    "sort_order",
    "fetch_retry_attempts",
    "fetch_retry_delay_ms",
    "data_root",
    "color",
];

/// Stores user-configurable reporting preferences and metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_page_size")]
    pub page_size: usize,
    #[serde(
        default = "Config::default_month_bucketing",
        deserialize_with = "deserialize_bucketing"
    )]
    pub month_bucketing: String,
    #[serde(default = "Config::default_date_range")]
    pub date_range: String,
    #[serde(default = "Config::default_sort_by")]
    pub sort_by: String,
    #[serde(default = "Config::default_sort_order")]
    pub sort_order: String,
    #[serde(default = "Config::default_fetch_retry_attempts")]
    pub fetch_retry_attempts: u32,
    #[serde(default = "Config::default_fetch_retry_delay_ms")]
    pub fetch_retry_delay_ms: u64,
    #[serde(default = "Config::default_color_enabled")]
    pub color_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for transaction documents. Defaults to `<base>/data`.
    pub data_root: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_user: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            page_size: Self::default_page_size(),
            month_bucketing: Self::default_month_bucketing(),
            date_range: Self::default_date_range(),
            sort_by: Self::default_sort_by(),
            sort_order: Self::default_sort_order(),
            fetch_retry_attempts: Self::default_fetch_retry_attempts(),
            fetch_retry_delay_ms: Self::default_fetch_retry_delay_ms(),
            color_enabled: Self::default_color_enabled(),
            data_root: None,
            last_user: None,
        }
    }
}

impl Config {
    pub fn default_page_size() -> usize {
        10
    }

    pub fn default_month_bucketing() -> String {
        BUCKETING_YEAR_MONTH.into()
    }

    pub fn default_date_range() -> String {
        "all".into()
    }

    pub fn default_sort_by() -> String {
        "date".into()
    }

    pub fn default_sort_order() -> String {
        "desc".into()
    }

    pub fn default_fetch_retry_attempts() -> u32 {
        3
    }

    pub fn default_fetch_retry_delay_ms() -> u64 {
        2000
    }

    pub fn default_color_enabled() -> bool {
        true
    }

    /// Where transaction documents live, relative to the shell's base directory.
    pub fn resolve_data_root(&self, base: &Path) -> PathBuf {
        match &self.data_root {
            Some(path) => path.clone(),
            None => base.join("data"),
        }
    }

    /// Current value of a setting as shown to the user.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "locale" => self.locale.clone(),
            "currency" => self.currency.clone(),
            "page_size" => self.page_size.to_string(),
            "month_bucketing" => self.month_bucketing.clone(),
            "date_range" => self.date_range.clone(),
            "sort_by" => self.sort_by.clone(),
            "sort_order" => self.sort_order.clone(),
            "fetch_retry_attempts" => self.fetch_retry_attempts.to_string(),
            "fetch_retry_delay_ms" => self.fetch_retry_delay_ms.to_string(),
            "data_root" => self
                .data_root
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "(default)".into()),
            "color" => self.color_enabled.to_string(),
            _ => return None,
        };
        Some(value)
    }

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        SETTING_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }

    /// Updates one setting from user text.
    ///
    /// Filter defaults are stored lowercased and interpreted leniently when used.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let trimmed = value.trim();
        match key {
            "locale" => self.locale = non_empty(key, trimmed)?.to_string(),
            "currency" => {
                let code = trimmed.to_ascii_uppercase();
                if code.len() != 3 || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
                    return Err(invalid(key, value, "expected a three-letter currency code"));
                }
                self.currency = code;
            }
            "page_size" => {
                self.page_size = match trimmed.parse::<usize>() {
                    Ok(size) if size > 0 => size,
                    _ => return Err(invalid(key, value, "expected a positive whole number")),
                }
            }
            "month_bucketing" => {
                let normalized = trimmed.to_ascii_lowercase();
                if normalized != BUCKETING_YEAR_MONTH && normalized != BUCKETING_MONTH {
                    return Err(invalid(key, value, "expected `year-month` or `month`"));
                }
                self.month_bucketing = normalized;
            }
            "date_range" => self.date_range = non_empty(key, trimmed)?.to_ascii_lowercase(),
            "sort_by" => self.sort_by = non_empty(key, trimmed)?.to_ascii_lowercase(),
            "sort_order" => self.sort_order = non_empty(key, trimmed)?.to_ascii_lowercase(),
            "fetch_retry_attempts" => {
                self.fetch_retry_attempts = match trimmed.parse::<u32>() {
                    Ok(attempts) if attempts > 0 => attempts,
                    _ => return Err(invalid(key, value, "expected at least one attempt")),
                }
            }
            "fetch_retry_delay_ms" => {
                self.fetch_retry_delay_ms = trimmed
                    .parse::<u64>()
                    .map_err(|_| invalid(key, value, "expected milliseconds"))?
            }
            "data_root" => {
                self.data_root = match trimmed {
                    "" | "default" => None,
                    path => Some(PathBuf::from(path)),
                }
            }
            "color" => {
                self.color_enabled = match trimmed.to_ascii_lowercase().as_str() {
                    "on" | "true" | "yes" => true,
                    "off" | "false" | "no" => false,
                    _ => return Err(invalid(key, value, "expected on or off")),
                }
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

fn non_empty<'a>(key: &str, value: &'a str) -> Result<&'a str, ConfigError> {
    if value.is_empty() {
        Err(invalid(key, value, "value must not be empty"))
    } else {
        Ok(value)
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn deserialize_bucketing<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(match value.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if v == BUCKETING_MONTH => BUCKETING_MONTH.into(),
        _ => BUCKETING_YEAR_MONTH.into(),
    })
}
