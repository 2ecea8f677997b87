//! `{{ key }}` placeholder substitution for file contents and command lines.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// `{{ key }}` with exactly one space of padding; keys cannot contain braces
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{ ([^{}]+?) \}\}").expect("placeholder regex is valid"));

/// Replace every known `{{ key }}` placeholder in `template` with its value.
///
/// Unknown placeholders are left verbatim. The template is scanned once from
/// left to right, so a value that itself looks like a placeholder is never
/// expanded again.
pub fn substitute(template: &str, variables: &BTreeMap<String, String>) -> String {
    if variables.is_empty() {
        return template.to_string();
    }

    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| match variables.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
