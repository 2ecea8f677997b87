//! `bootstrapme list` command handler

use anyhow::Result;
use bootstrapme_core::presets::PresetStore;

use super::load_presets;
use crate::cli::{GlobalArgs, ListArgs};
use crate::output;

pub fn run(args: ListArgs, global: &GlobalArgs) -> Result<()> {
    let store = load_presets(global)?;

    let languages: Vec<&str> = match &args.language {
        Some(language) => {
            if store.presets(language).is_empty() {
                output::warning(&format!("No presets found for language: {}", language));
                return Ok(());
            }
            vec![language.as_str()]
        }
        None => store.languages(),
    };

    for language in languages {
        output::header(&language_row(&store, language));
        for preset in store.presets(language) {
            let mut description = preset.description.clone();
            if preset.needs_username() {
                description.push_str(" (asks for a username)");
            }
            output::kv(&preset.name, &description);
        }
    }

    Ok(())
}

/// `<language> - N presets available`
pub(crate) fn language_row(store: &PresetStore, language: &str) -> String {
    format!(
        "{:12} - {} presets available",
        language,
        store.presets(language).len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bootstrapme_core::presets::Preset;

    #[test]
    fn test_language_row() {
        let preset = |name: &str| Preset {
            name: name.to_string(),
            language: "go".to_string(),
            framework: name.to_string(),
            ..Default::default()
        };
        let store = PresetStore::from_presets(vec![preset("gin"), preset("echo")]);

        assert_eq!(
            language_row(&store, "go"),
            "go           - 2 presets available"
        );
    }
}
