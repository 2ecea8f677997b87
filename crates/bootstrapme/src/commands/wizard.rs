//! Interactive preset selection
//!
//! Walks the user through language, preset, optional username and project
//! name, then runs the bootstrap. Esc in a menu, or `^` in a text prompt,
//! goes back one step.

use anyhow::{Context, Result};
use bootstrapme_core::engine::BootstrapJob;
use bootstrapme_core::presets::{Preset, PresetStore};
use dialoguer::{Input, Select};

use super::list::language_row;
use super::{load_presets, run_bootstrap, DEFAULT_PROJECT_NAME, DEFAULT_USERNAME};
use crate::cli::GlobalArgs;
use crate::output;

/// Text entered in a prompt to return to the previous step
const BACK_INPUT: &str = "^";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    SelectLanguage,
    SelectPreset,
    EnterUsername,
    EnterProjectName,
}

impl Step {
    /// Step reached by going back from `self`
    fn previous(self, needs_username: bool) -> Self {
        match self {
            Self::SelectLanguage | Self::SelectPreset => Self::SelectLanguage,
            Self::EnterUsername => Self::SelectPreset,
            Self::EnterProjectName if needs_username => Self::EnterUsername,
            Self::EnterProjectName => Self::SelectPreset,
        }
    }

    /// Step following a confirmed preset selection
    fn after_preset(needs_username: bool) -> Self {
        if needs_username {
            Self::EnterUsername
        } else {
            Self::EnterProjectName
        }
    }
}

/// What the user typed into a text prompt
#[derive(Debug, PartialEq, Eq)]
enum Entry {
    Back,
    Value(String),
}

fn parse_entry(input: &str, default: &str) -> Entry {
    let trimmed = input.trim();
    if trimmed == BACK_INPUT {
        Entry::Back
    } else if trimmed.is_empty() {
        Entry::Value(default.to_string())
    } else {
        Entry::Value(trimmed.to_string())
    }
}

/// Choices made so far
#[derive(Debug, Default)]
struct Selection {
    language: Option<String>,
    preset: Option<Preset>,
    username: Option<String>,
}

impl Selection {
    fn needs_username(&self) -> bool {
        self.preset.as_ref().is_some_and(Preset::needs_username)
    }
}

/// Run the interactive wizard
pub async fn run(global: &GlobalArgs) -> Result<()> {
    let store = load_presets(global)?;
    output::header("BootstrapMe");

    let mut selection = Selection::default();
    let mut step = Step::SelectLanguage;

    let project_name = loop {
        match step {
            Step::SelectLanguage => {
                let Some(language) = select_language(&store)? else {
                    output::info("No preset selected, exiting.");
                    return Ok(());
                };
                selection.language = Some(language);
                step = Step::SelectPreset;
            }
            Step::SelectPreset => {
                let language = selection.language.clone().unwrap_or_default();
                match select_preset(&store, &language)? {
                    Some(preset) => {
                        selection.preset = Some(preset);
                        step = Step::after_preset(selection.needs_username());
                    }
                    None => step = step.previous(selection.needs_username()),
                }
            }
            Step::EnterUsername => match prompt("Enter username", DEFAULT_USERNAME)? {
                Entry::Back => step = step.previous(true),
                Entry::Value(username) => {
                    selection.username = Some(username);
                    step = Step::EnterProjectName;
                }
            },
            Step::EnterProjectName => match prompt("Enter project name", DEFAULT_PROJECT_NAME)? {
                Entry::Back => step = step.previous(selection.needs_username()),
                Entry::Value(name) => break name,
            },
        }
    };

    let preset = selection.preset.context("No preset selected")?;
    let needs_username = preset.needs_username();

    let mut job = BootstrapJob::new(&project_name, preset)
        .with_context(|| format!("Invalid project name: {}", project_name))?;
    if needs_username {
        let username = selection
            .username
            .unwrap_or_else(|| DEFAULT_USERNAME.to_string());
        job = job.with_username(username);
    }

    run_bootstrap(job, global).await
}

fn select_language(store: &PresetStore) -> Result<Option<String>> {
    let languages = store.languages();
    let items: Vec<String> = languages
        .iter()
        .map(|language| language_row(store, language))
        .collect();

    let selection = Select::new()
        .with_prompt("Select a language (Esc to quit)")
        .items(&items)
        .default(0)
        .interact_opt()?;

    Ok(selection.map(|idx| languages[idx].to_string()))
}

fn select_preset(store: &PresetStore, language: &str) -> Result<Option<Preset>> {
    let presets = store.presets(language);
    let items: Vec<String> = presets
        .iter()
        .map(|p| format!("{:12} - {}", p.name, p.description))
        .collect();

    let selection = Select::new()
        .with_prompt(format!(
            "Select a framework/preset for {} (Esc to go back)",
            language
        ))
        .items(&items)
        .default(0)
        .interact_opt()?;

    Ok(selection.map(|idx| presets[idx].clone()))
}

fn prompt(label: &str, default: &str) -> Result<Entry> {
    let input = Input::<String>::new()
        .with_prompt(format!("{} ({} to go back)", label, BACK_INPUT))
        .default(default.to_string())
        .interact_text()?;

    Ok(parse_entry(&input, default))
}
