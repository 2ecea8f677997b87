//! YAML preset parsing and structure definitions.
//!
//! Parses a single `<preset>.yaml` file into strongly-typed Rust structures.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Language whose presets always ask for a username (module paths need one)
const USERNAME_LANGUAGE: &str = "go";

/// A named template describing files to create and commands to run for one
/// language/framework combination
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub framework: String,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    #[serde(default)]
    pub post_install_commands: Vec<String>,
    #[serde(default)]
    pub files: Vec<FileSpec>,
    /// Ask the user for a `username` variable before bootstrapping
    #[serde(default)]
    pub prompt_username: bool,
}

/// One file to materialize, relative to the project root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSpec {
    pub path: String,
    #[serde(default)]
    pub content: String,
}

impl FileSpec {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

impl Preset {
    /// Parse a preset from a YAML string and check its required fields
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let preset: Preset = serde_yaml_ng::from_str(yaml)?;
        preset.validate()?;
        Ok(preset)
    }

    /// Check that the fields needed to list and select the preset are present
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::missing_preset_field("name"));
        }
        if self.language.trim().is_empty() {
            return Err(Error::missing_preset_field("language"));
        }
        if self.framework.trim().is_empty() {
            return Err(Error::missing_preset_field("framework"));
        }
        Ok(())
    }

    /// Whether a `username` must be collected before a run
    pub fn needs_username(&self) -> bool {
        self.prompt_username || self.language.eq_ignore_ascii_case(USERNAME_LANGUAGE)
    }
}
