// Tue Jan 13 2026 - Alex

use crate::layout::reader::DEFAULT_MAX_STRING_LENGTH;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: u64 = 0x1000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Granularity of the dynamic linker scan.
    pub page_size: u64,
    /// Address to try before scanning.
    pub dylinker_hint: Option<u64>,
    pub max_string_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            dylinker_hint: None,
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_dylinker_hint(mut self, hint: u64) -> Self {
        self.dylinker_hint = Some(hint);
        self
    }

    pub fn with_max_string_length(mut self, max_string_length: usize) -> Self {
        self.max_string_length = max_string_length;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.page_size == 0 || !self.page_size.is_power_of_two() {
            return Err(format!("page_size must be a power of two, got {}", self.page_size));
        }
        if self.max_string_length == 0 {
            return Err("max_string_length must be greater than 0".to_string());
        }
        Ok(())
    }
}
