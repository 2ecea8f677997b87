//! Error types for bootstrapme-core

use thiserror::Error;

/// Result type alias using bootstrapme-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Bootstrapping error types
#[derive(Error, Debug)]
pub enum Error {
    /// Preset is missing a required field
    #[error("Invalid preset: missing required field '{field}'")]
    MissingPresetField { field: String },

    /// Preset not found
    #[error("Preset '{name}' not found for language '{language}'")]
    PresetNotFound { language: String, name: String },

    /// Language not found
    #[error("No presets found for language: {language}")]
    LanguageNotFound { language: String },

    /// Project directory could not be created
    #[error("Error creating project dir {path}: {source}")]
    CreateProjectDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Parent directories of a template file could not be created
    #[error("Error creating dirs for {path}: {source}")]
    CreateParentDirs {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Template file could not be written
    #[error("Error writing file {path}: {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Template file path resolves outside of the project root
    #[error("Error writing file {path}: path escapes the project directory")]
    PathEscape { path: String },

    /// Shell could not be started
    #[error("Error starting command: {source}")]
    SpawnFailed {
        #[source]
        source: std::io::Error,
    },

    /// Command exited with a non-zero status
    #[error("Command failed with {status}: {command}")]
    CommandFailed { command: String, status: String },

    /// Run was cancelled before the command finished
    #[error("Command cancelled: {command}")]
    Cancelled { command: String },

    /// Could not determine the user's home directory
    #[error("Could not determine home directory")]
    HomeDirNotFound,

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a missing preset field error
    pub fn missing_preset_field(field: impl Into<String>) -> Self {
        Self::MissingPresetField {
            field: field.into(),
        }
    }

    /// Create a preset not found error
    pub fn preset_not_found(language: impl Into<String>, name: impl Into<String>) -> Self {
        Self::PresetNotFound {
            language: language.into(),
            name: name.into(),
        }
    }

    /// Create a language not found error
    pub fn language_not_found(language: impl Into<String>) -> Self {
        Self::LanguageNotFound {
            language: language.into(),
        }
    }

    /// Create a path escape error
    pub fn path_escape(path: impl Into<String>) -> Self {
        Self::PathEscape { path: path.into() }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, status: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            status: status.into(),
        }
    }

    /// Create a cancelled error
    pub fn cancelled(command: impl Into<String>) -> Self {
        Self::Cancelled {
            command: command.into(),
        }
    }

    /// Whether this error was caused by cancellation rather than a failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
