//! Environment variable helpers
//!
//! `Env` reads through a lookup function so configuration code can be tested
//! without touching the process environment.

use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EnvError {
    #[error("{0} environment variable is required")]
    Missing(String),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: String, value: String },
}

pub struct Env<F> {
    lookup: F,
}

fn process_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

impl Env<fn(&str) -> Option<String>> {
    /// Reads the process environment.
    pub fn process() -> Self {
        Self { lookup: process_lookup }
    }
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub fn from_lookup(lookup: F) -> Self {
        Self { lookup }
    }

    /// Raw value; empty strings count as unset.
    pub fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    pub fn or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Parsed value, or `default` when unset. A value that fails to parse is an error.
    pub fn parse_or<T: FromStr>(&self, key: &str, default: T) -> Result<T, EnvError> {
        match self.get(key) {
            Some(value) => value.trim().parse().map_err(|_| EnvError::Invalid {
                key: key.to_string(),
                value,
            }),
            None => Ok(default),
        }
    }

    pub fn required(&self, key: &str) -> Result<String, EnvError> {
        self.get(key).ok_or_else(|| EnvError::Missing(key.to_string()))
    }

    /// `true`/`1`/`yes` (any case) are truthy; anything else, or unset, is false.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).map(|v| parse_flag(&v)).unwrap_or(false)
    }
}

pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}
