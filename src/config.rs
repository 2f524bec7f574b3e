//! Tunable parameters of the normalization pipeline.
//!
//! Stored as a JSON object on disk; every key is optional:
//! ```json
//! {
//!   "excursion_threshold": 40,
//!   "fuzzy_acceptance_threshold": 85,
//!   "signal_combination": { "mode": "any" }
//! }
//! ```

use serde::Deserialize;

use crate::error::ConfigError;

/// How the location and phone signals are merged into `is_foreign`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SignalCombination {
    /// Either signal is enough.
    #[default]
    Any,
    /// Both signals must agree.
    All,
    /// Weighted vote; foreign when the summed weights of the firing signals reach `threshold`.
    Weighted {
        location_weight: f64,
        phone_weight: f64,
        threshold: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Children counts above this are treated as group-excursion headcounts.
    pub excursion_threshold: u32,
    /// Minimum similarity (0–100) for a gazetteer match to be accepted.
    pub fuzzy_acceptance_threshold: u8,
    pub min_age: u8,
    pub max_age: u8,
    /// Minimum digit count before a phone number counts as evidence at all.
    pub phone_min_digits: usize,
    pub domestic_calling_code: String,
    pub signal_combination: SignalCombination,
    /// Upper bound on distinct entries held by the approximate-match cache.
    pub match_cache_capacity: usize,
    /// Read `01/02/2024` as 1 February rather than 2 January.
    pub day_first: bool,
    /// Treat 10/11 digit numbers shaped like a domestic area code + subscriber
    /// number as domestic even without the calling code.
    pub national_phone_as_domestic: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            excursion_threshold: 40,
            fuzzy_acceptance_threshold: 85,
            min_age: 1,
            max_age: 120,
            phone_min_digits: 10,
            domestic_calling_code: "55".to_string(),
            signal_combination: SignalCombination::Any,
            match_cache_capacity: 4096,
            day_first: true,
            national_phone_as_domestic: false,
        }
    }
}

impl PipelineConfig {
    /// Loads the config from a JSON file at `path` and validates it.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fuzzy_acceptance_threshold > 100 {
            return Err(ConfigError::Invalid(format!(
                "fuzzy_acceptance_threshold must be within 0..=100, got {}",
                self.fuzzy_acceptance_threshold
            )));
        }
        if self.min_age == 0 || self.min_age > self.max_age {
            return Err(ConfigError::Invalid(format!(
                "age range [{}, {}] is empty or includes zero",
                self.min_age, self.max_age
            )));
        }
        if self.domestic_calling_code.is_empty()
            || !self.domestic_calling_code.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ConfigError::Invalid(format!(
                "domestic_calling_code must be digits, got {:?}",
                self.domestic_calling_code
            )));
        }
        if let SignalCombination::Weighted { threshold, .. } = self.signal_combination {
            if !threshold.is_finite() || threshold <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "weighted combination threshold must be positive, got {threshold}"
                )));
            }
        }
        Ok(())
    }
}
