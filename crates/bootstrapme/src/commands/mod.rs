//! Command handlers
//!
//! - `wizard`: interactive preset selection (default when no subcommand is given)
//! - `new`: non-interactive project creation
//! - `list`: preset listing

pub mod list;
pub mod new;
pub mod wizard;

use anyhow::{anyhow, bail, Context, Result};
use bootstrapme_core::engine::{
    BootstrapJob, Bootstrapper, CancelToken, EngineConfig, Outcome, RunEvent,
};
use bootstrapme_core::presets::{default_presets_dir, PresetStore};

use crate::cli::GlobalArgs;
use crate::output;

/// Username used when a preset needs one and none was given
pub(crate) const DEFAULT_USERNAME: &str = "username";

/// Project name used when none was given
pub(crate) const DEFAULT_PROJECT_NAME: &str = "myproject";

/// Load presets from `--presets-dir` or the default location
pub(crate) fn load_presets(global: &GlobalArgs) -> Result<PresetStore> {
    let root = match &global.presets_dir {
        Some(dir) => dir.clone(),
        None => default_presets_dir().context("Failed to locate presets directory")?,
    };

    let store = PresetStore::load(&root)
        .with_context(|| format!("Failed to load presets from {}", root.display()))?;

    if store.is_empty() {
        bail!(
            "No presets found. Please add YAML configs in {}",
            root.display()
        );
    }

    tracing::info!(
        "Loaded {} presets for {} languages from {}",
        store.preset_count(),
        store.languages().len(),
        root.display()
    );
    Ok(store)
}

fn engine(global: &GlobalArgs) -> Bootstrapper {
    Bootstrapper::new(EngineConfig {
        shell: global.shell.clone(),
        ..EngineConfig::default()
    })
}

/// Run a job, streaming its log under a spinner until it finishes
///
/// Ctrl-C cancels the run and kills the active command.
pub(crate) async fn run_bootstrap(job: BootstrapJob, global: &GlobalArgs) -> Result<()> {
    output::header("Bootstrapping");
    output::kv("Preset", &job.preset().name);
    output::kv("Location", &job.project_root().display().to_string());
    println!();

    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let project_root = job.project_root().to_path_buf();
    let pb = output::spinner("Bootstrapping... (press ctrl+c to cancel)");
    let mut stream = engine(global).start(job, cancel);
    let mut outcome = None;

    while let Some(event) = stream.next().await {
        match event {
            RunEvent::Log(line) => pb.println(output::format_log_line(&line)),
            RunEvent::Finished(o) => outcome = Some(o),
        }
    }

    signal_task.abort();
    pb.finish_and_clear();
    println!();

    match outcome {
        Some(Outcome::Succeeded) => {
            output::success("Project created successfully!");
            output::kv("Location", &project_root.display().to_string());
            Ok(())
        }
        Some(Outcome::Failed { step, message }) => {
            if let Some(step) = step {
                output::error(&format!("Bootstrapping failed while {}", step));
            }
            output::warning(&format!(
                "Partially created files were left in {}",
                project_root.display()
            ));
            Err(anyhow!(message))
        }
        Some(Outcome::Cancelled) => {
            output::warning("Bootstrapping cancelled");
            Err(anyhow!("Bootstrapping cancelled"))
        }
        None => Err(anyhow!("Bootstrap ended without reporting an outcome")),
    }
}
