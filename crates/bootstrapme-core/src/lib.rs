//! # bootstrapme-core
//!
//! Library behind the BootstrapMe CLI providing:
//! - Preset discovery from `~/.config/bootstrapme/<language>/*.yaml`
//! - `{{ key }}` placeholder substitution
//! - The asynchronous bootstrapping engine: project directory and file
//!   creation followed by sequential post-install shell commands, with
//!   progress streamed line by line
//!
//! # Examples
//!
//! ```no_run
//! use bootstrapme_core::engine::{BootstrapJob, Bootstrapper, CancelToken};
//! use bootstrapme_core::presets::{default_presets_dir, PresetStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = PresetStore::load(default_presets_dir()?)?;
//! let preset = store.find("rust", "axum")?.clone();
//!
//! let job = BootstrapJob::new("my-service", preset)?;
//! let report = Bootstrapper::default().run(job, CancelToken::new()).await;
//! for line in &report.lines {
//!     println!("{}", line);
//! }
//! assert!(report.outcome.is_success());
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod presets;
pub mod substitute;

pub use error::{Error, Result};

pub use engine::{BootstrapJob, Bootstrapper, CancelToken, EngineConfig, LogLine, Outcome, RunEvent};
pub use presets::{FileSpec, Preset, PresetStore};
pub use substitute::substitute;
