//! Preset discovery from the user's configuration directory.
//!
//! Presets live in one directory per language:
//!
//! ```text
//! ~/.config/bootstrapme/
//!   go/
//!     gin.yaml
//!   rust/
//!     axum.yaml
//! ```
//!
//! Files that fail to parse or lack required fields are skipped with a warning.

use super::parser::Preset;
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the presets directory
pub const CONFIG_DIR_ENV: &str = "BOOTSTRAPME_CONFIG_DIR";

const PRESET_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Get the user's home directory
///
/// Prefers the HOME environment variable over dirs::home_dir() so that
/// overridden homes (containers, tests) are respected.
pub fn get_home_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        if !home.is_empty() {
            return Ok(PathBuf::from(home));
        }
    }

    dirs::home_dir().ok_or(Error::HomeDirNotFound)
}

/// Default presets directory: `$BOOTSTRAPME_CONFIG_DIR`, else `~/.config/bootstrapme`
pub fn default_presets_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    Ok(get_home_dir()?.join(".config").join("bootstrapme"))
}

/// Presets grouped by language
#[derive(Debug, Clone, Default)]
pub struct PresetStore {
    root: PathBuf,
    by_language: BTreeMap<String, Vec<Preset>>,
}

impl PresetStore {
    /// Load every preset under `root`
    ///
    /// A missing root yields an empty store.
    pub fn load(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let mut by_language = BTreeMap::new();

        if !root.exists() {
            debug!("Presets directory {} does not exist", root.display());
            return Ok(Self { root, by_language });
        }

        for entry in fs::read_dir(&root)? {
            let entry = entry?;
            let lang_path = entry.path();
            if !lang_path.is_dir() {
                continue;
            }

            let language = entry.file_name().to_string_lossy().into_owned();
            let presets = load_language_dir(&lang_path);
            if !presets.is_empty() {
                by_language.insert(language, presets);
            }
        }

        Ok(Self { root, by_language })
    }

    /// Build a store from already-parsed presets, grouped by their `language` field
    pub fn from_presets(presets: impl IntoIterator<Item = Preset>) -> Self {
        let mut by_language: BTreeMap<String, Vec<Preset>> = BTreeMap::new();
        for preset in presets {
            by_language
                .entry(preset.language.clone())
                .or_default()
                .push(preset);
        }
        Self {
            root: PathBuf::new(),
            by_language,
        }
    }

    /// Directory the presets were loaded from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sorted language names
    pub fn languages(&self) -> Vec<&str> {
        self.by_language.keys().map(String::as_str).collect()
    }

    /// Presets for a language, in file-name order
    pub fn presets(&self, language: &str) -> &[Preset] {
        self.by_language
            .get(language)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Look up a preset by language and name
    pub fn find(&self, language: &str, name: &str) -> Result<&Preset> {
        let presets = self
            .by_language
            .get(language)
            .ok_or_else(|| Error::language_not_found(language))?;

        presets
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::preset_not_found(language, name))
    }

    pub fn is_empty(&self) -> bool {
        self.by_language.is_empty()
    }

    /// Total number of presets across all languages
    pub fn preset_count(&self) -> usize {
        self.by_language.values().map(Vec::len).sum()
    }
}

/// Load all valid presets in one language directory, skipping bad files
fn load_language_dir(lang_path: &Path) -> Vec<Preset> {
    let entries = match fs::read_dir(lang_path) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Error reading dir {}: {}", lang_path.display(), e);
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && has_preset_extension(path))
        .collect();
    files.sort();

    let mut presets = Vec::new();
    for path in files {
        match load_preset_file(&path) {
            Ok(preset) => {
                debug!("Loaded preset '{}' from {}", preset.name, path.display());
                presets.push(preset);
            }
            Err(e) => warn!("Error loading preset from {}: {}", path.display(), e),
        }
    }
    presets
}

/// Load a single preset from a YAML file
pub fn load_preset_file(path: &Path) -> Result<Preset> {
    let yaml = fs::read_to_string(path)?;
    Preset::from_yaml(&yaml)
}

fn has_preset_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| PRESET_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_load_groups_by_directory() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "rust/b-axum.yaml",
            "name: axum\nlanguage: rust\nframework: axum\n",
        );
        write(
            temp.path(),
            "rust/a-cli.yml",
            "name: cli\nlanguage: rust\nframework: clap\n",
        );
        write(
            temp.path(),
            "go/gin.yaml",
            "name: gin\nlanguage: go\nframework: gin\n",
        );

        let store = PresetStore::load(temp.path()).unwrap();
        assert_eq!(store.languages(), vec!["go", "rust"]);
        assert_eq!(store.preset_count(), 3);

        let names: Vec<&str> = store.presets("rust").iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["cli", "axum"]);
    }

    #[test]
    fn test_load_skips_invalid_files() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "python/ok.yaml",
            "name: flask\nlanguage: python\nframework: flask\n",
        );
        write(temp.path(), "python/broken.yaml", "name: [oops");
        write(temp.path(), "python/nolang.yaml", "name: x\nframework: y\n");
        write(temp.path(), "python/notes.txt", "not a preset");
        write(temp.path(), "stray.yaml", "name: stray\nlanguage: a\nframework: b\n");

        let store = PresetStore::load(temp.path()).unwrap();
        assert_eq!(store.languages(), vec!["python"]);
        assert_eq!(store.presets("python").len(), 1);
        assert_eq!(store.presets("python")[0].name, "flask");
    }

    #[test]
    fn test_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = PresetStore::load(temp.path().join("absent")).unwrap();
        assert!(store.is_empty());
        assert!(store.presets("rust").is_empty());
    }

    #[test]
    fn test_find() {
        let store = PresetStore::from_presets(vec![Preset {
            name: "gin".to_string(),
            language: "go".to_string(),
            framework: "gin".to_string(),
            ..Default::default()
        }]);

        assert!(store.find("go", "gin").is_ok());
        assert!(matches!(
            store.find("go", "echo"),
            Err(Error::PresetNotFound { .. })
        ));
        assert!(matches!(
            store.find("zig", "gin"),
            Err(Error::LanguageNotFound { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_default_presets_dir_env_override() {
        std::env::set_var(CONFIG_DIR_ENV, "/tmp/bootstrapme-presets");
        let dir = default_presets_dir().unwrap();
        std::env::remove_var(CONFIG_DIR_ENV);

        assert_eq!(dir, PathBuf::from("/tmp/bootstrapme-presets"));
    }

    #[test]
    #[serial]
    fn test_default_presets_dir_under_home() {
        std::env::remove_var(CONFIG_DIR_ENV);
        let dir = default_presets_dir().unwrap();
        assert!(dir.ends_with(".config/bootstrapme"));
    }
}
