//! Request input limits.

use serde::Deserialize;

/// Length bounds for the submitted requirement text, in characters.
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Minimum trimmed length. Defaults to 10.
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    /// Maximum raw length. Defaults to 5000.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            max_length: default_max_length(),
        }
    }
}

const fn default_min_length() -> usize {
    10
}

const fn default_max_length() -> usize {
    5000
}
