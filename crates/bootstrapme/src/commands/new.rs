//! `bootstrapme new` command handler

use anyhow::{Context, Result};
use bootstrapme_core::engine::BootstrapJob;

use super::{load_presets, run_bootstrap, DEFAULT_USERNAME};
use crate::cli::{GlobalArgs, NewArgs};
use crate::output;

/// Create a project from the named preset without prompting
pub async fn run(args: NewArgs, global: &GlobalArgs) -> Result<()> {
    let store = load_presets(global)?;
    let preset = store.find(&args.language, &args.preset)?.clone();

    let username = match args.username {
        Some(username) => Some(username),
        None if preset.needs_username() => {
            output::warning(&format!(
                "Preset '{}' needs a username; using '{}'",
                preset.name, DEFAULT_USERNAME
            ));
            Some(DEFAULT_USERNAME.to_string())
        }
        None => None,
    };

    let mut job = BootstrapJob::new(&args.name, preset)
        .with_context(|| format!("Invalid project path: {}", args.name.display()))?;
    if let Some(username) = username {
        job = job.with_username(username);
    }

    run_bootstrap(job, global).await
}
