//! Reference-style plugin definitions.
//!
//! A definition binds a name to a plugin and its parameters:
//!
//! ```text
//! [note]: alert info, close
//!
//! [list]: cols
//! ----
//! - 4
//! - 8
//! ----
//! ```
//!
//! Definitions are collected before any invocation is scanned and removed
//! from the document. Names are case-insensitive. A line whose target is
//! not a known plugin stays in the document, where the base transformer
//! treats it as an ordinary link reference definition.

use std::collections::HashMap;

use crate::invocation::FenceTracker;
use crate::params::Params;
use crate::plugin::PluginRepository;
use crate::util::is_valid_plugin_name;

/// Plugin and parameters bound to a reference name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceDefinition {
    pub plugin_id: String,
    pub params: Params,
}

/// Definitions collected for the current document.
#[derive(Clone, Debug, Default)]
pub(crate) struct ReferenceTable {
    definitions: HashMap<String, ReferenceDefinition>,
}

impl ReferenceTable {
    /// Look up a name, ignoring case.
    pub(crate) fn get(&self, name: &str) -> Option<&ReferenceDefinition> {
        self.definitions.get(&name.trim().to_lowercase())
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Add a definition. The first definition of a name wins.
    pub(crate) fn insert(&mut self, name: &str, definition: ReferenceDefinition) {
        self.definitions
            .entry(name.trim().to_lowercase())
            .or_insert(definition);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.definitions.len()
    }
}

/// Move plugin reference definitions from `text` into `table`.
///
/// Returns the text with every collected definition removed. Definitions
/// inside fenced code blocks are ignored.
pub(crate) fn extract_definitions(
    text: &str,
    repository: &dyn PluginRepository,
    table: &mut ReferenceTable,
) -> String {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let mut output = String::with_capacity(text.len());
    let mut fence = FenceTracker::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let was_in_fence = fence.in_fence();
        if fence.update(line) || was_in_fence {
            output.push_str(line);
            i += 1;
            continue;
        }

        let Some((name, plugin_id, raw_params)) = parse_definition_line(line) else {
            output.push_str(line);
            i += 1;
            continue;
        };

        if !repository.exists(&plugin_id) {
            tracing::debug!(reference = name, plugin = %plugin_id, "Reference target is not a plugin");
            output.push_str(line);
            i += 1;
            continue;
        }

        let mut consumed = 1;
        let mut params = Params::parse(raw_params);

        if raw_params.is_empty()
            && let Some((section, used)) = parameter_section(&lines[i + 1..])
        {
            params = Params::parse(&section);
            consumed += used;
        }

        table.insert(name, ReferenceDefinition { plugin_id, params });
        i += consumed;
    }

    output
}

/// Parse `[name]: plugin params`, allowing up to three leading spaces.
///
/// Returns the raw name, the lower-cased plugin id and the trimmed
/// parameter text.
fn parse_definition_line(line: &str) -> Option<(&str, String, &str)> {
    let line = line.trim_end_matches(['\n', '\r']);
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }

    let rest = line[indent..].strip_prefix('[')?;
    let close = rest.find(']')?;
    let name = &rest[..close];
    if name.trim().is_empty() || name.contains('[') {
        return None;
    }

    let rest = rest[close + 1..].strip_prefix(':')?.trim_start();
    let id_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(rest.len());
    let id = &rest[..id_len];
    let after = &rest[id_len..];
    if !is_valid_plugin_name(id) || !(after.is_empty() || after.starts_with(char::is_whitespace))
    {
        return None;
    }

    Some((name, id.to_ascii_lowercase(), after.trim()))
}

/// A line made only of three or more hyphens.
fn is_hyphen_rule(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3 && trimmed.bytes().all(|b| b == b'-')
}

/// Parameter section framed by hyphen rules directly after a definition.
///
/// Returns the section text and the number of lines it spans, rules
/// included.
fn parameter_section(lines: &[&str]) -> Option<(String, usize)> {
    let (first, rest) = lines.split_first()?;
    if !is_hyphen_rule(first) {
        return None;
    }

    let close = rest.iter().position(|line| is_hyphen_rule(line))?;
    let section: String = rest[..close].concat();
    Some((section, close + 2))
}
