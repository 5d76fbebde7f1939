//! Validation policy configuration.
//!
//! Bounds for the signup validators, loadable from a TOML file. Absent
//! files and absent keys fall back to the defaults the product shipped
//! with.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    #[serde(default = "default_username_min")]
    pub username_min: usize,
    #[serde(default = "default_username_max")]
    pub username_max: usize,
    #[serde(default = "default_password_min")]
    pub password_min: usize,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            username_min: default_username_min(),
            username_max: default_username_max(),
            password_min: default_password_min(),
        }
    }
}

pub fn load_policy(path: &Path) -> Result<ValidationPolicy> {
    if !path.exists() {
        return Ok(ValidationPolicy::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ValidationPolicy>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

const fn default_username_min() -> usize {
    3
}

const fn default_username_max() -> usize {
    20
}

const fn default_password_min() -> usize {
    6
}
