//! Runtime configuration
//!
//! Read once at start-up from `NUTRISCAN_*` environment variables. Every
//! setting has a default, so an empty environment is a valid configuration.

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

pub const ENV_DEFAULT_SERVING_SIZE: &str = "NUTRISCAN_DEFAULT_SERVING_SIZE";
pub const ENV_DEFAULT_SERVINGS: &str = "NUTRISCAN_DEFAULT_SERVINGS";
pub const ENV_DECIMALS: &str = "NUTRISCAN_DECIMALS";
pub const ENV_REGION_SUGAR_GUESS: &str = "NUTRISCAN_REGION_SUGAR_GUESS";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Extractor switches
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionConfig {
    /// When the sugar region yields no keyword match, take its largest
    /// plausible number before falling back to the global transcript
    pub region_sugar_guess: bool,
}

/// Caller-level substitution applied when presenting a record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationPolicy {
    /// Reported when no serving size was extracted
    pub default_serving_size: f64,
    /// Reported when servings per pack is absent or zero
    pub default_servings_per_pack: u32,
    /// Decimal places for gram values
    pub decimals: u32,
}

impl Default for PresentationPolicy {
    fn default() -> Self {
        Self {
            default_serving_size: 0.0,
            default_servings_per_pack: 1,
            decimals: 2,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppConfig {
    pub extraction: ExtractionConfig,
    pub presentation: PresentationPolicy,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = PresentationPolicy::default();

        let default_serving_size: f64 =
            parse_var(&lookup, ENV_DEFAULT_SERVING_SIZE)?.unwrap_or(defaults.default_serving_size);
        if !default_serving_size.is_finite() || default_serving_size < 0.0 {
            return Err(invalid(
                ENV_DEFAULT_SERVING_SIZE,
                default_serving_size.to_string(),
                "must be a non-negative number",
            ));
        }

        let default_servings_per_pack: u32 =
            parse_var(&lookup, ENV_DEFAULT_SERVINGS)?.unwrap_or(defaults.default_servings_per_pack);
        if default_servings_per_pack == 0 {
            return Err(invalid(ENV_DEFAULT_SERVINGS, "0".to_string(), "must be at least 1"));
        }

        let decimals: u32 = parse_var(&lookup, ENV_DECIMALS)?.unwrap_or(defaults.decimals);
        if decimals > 6 {
            return Err(invalid(ENV_DECIMALS, decimals.to_string(), "must be between 0 and 6"));
        }

        let region_sugar_guess = match lookup(ENV_REGION_SUGAR_GUESS) {
            Some(raw) => parse_flag(&raw)
                .ok_or_else(|| invalid(ENV_REGION_SUGAR_GUESS, raw, "expected true or false"))?,
            None => false,
        };

        Ok(Self {
            extraction: ExtractionConfig { region_sugar_guess },
            presentation: PresentationPolicy {
                default_serving_size,
                default_servings_per_pack,
                decimals,
            },
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| invalid(name, raw.clone(), &e.to_string())),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn invalid(name: &'static str, value: String, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        name,
        value,
        reason: reason.to_string(),
    }
}
