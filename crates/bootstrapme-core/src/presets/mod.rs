//! Preset store.
//!
//! - `parser`: YAML preset structure and required-field checks
//! - `loader`: discovery of `<root>/<language>/*.yaml` files

pub mod loader;
pub mod parser;

pub use loader::{default_presets_dir, get_home_dir, load_preset_file, PresetStore, CONFIG_DIR_ENV};
pub use parser::{FileSpec, Preset};
