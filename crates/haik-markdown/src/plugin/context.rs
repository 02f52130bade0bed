//! Per-invocation dispatch context.

use std::collections::HashMap;

use crate::engine::{HaikMarkdown, RenderState};

/// Which syntax produced an invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvocationKind {
    /// `/(name)`, `/[body](name)` or a `/[text][ref]` reference.
    Inline,
    /// `:::name` fenced block.
    Block,
}

/// Document-scoped invocation counts keyed by plugin id.
///
/// The engine increments the entry for a plugin right before calling it,
/// so the first invocation of `section` in a document sees a count of 1.
/// Plugins may track their own keys through
/// [`PluginContext::counter_mut`].
#[derive(Clone, Debug, Default)]
pub struct InvocationCounter {
    counts: HashMap<String, usize>,
}

impl InvocationCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment `key` and return the new count.
    pub fn increment(&mut self, key: &str) -> usize {
        let count = self.counts.entry(key.to_owned()).or_insert(0);
        *count += 1;
        *count
    }

    /// Current count for `key` (0 if never incremented).
    pub fn get(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn reset(&mut self) {
        self.counts.clear();
    }
}

/// Context handed to a plugin for one invocation.
///
/// Gives access to the engine for rendering nested markdown and to the
/// state shared by every invocation in the current document.
pub struct PluginContext<'a> {
    engine: &'a HaikMarkdown,
    state: &'a mut RenderState,
    plugin_id: &'a str,
    kind: InvocationKind,
    line: usize,
}

impl<'a> PluginContext<'a> {
    pub(crate) fn new(
        engine: &'a HaikMarkdown,
        state: &'a mut RenderState,
        plugin_id: &'a str,
        kind: InvocationKind,
        line: usize,
    ) -> Self {
        Self {
            engine,
            state,
            plugin_id,
            kind,
            line,
        }
    }

    /// Lower-cased id of the plugin being called.
    pub fn plugin_id(&self) -> &str {
        self.plugin_id
    }

    pub fn kind(&self) -> InvocationKind {
        self.kind
    }

    /// Line of the invocation within the text being rendered (1-indexed).
    pub fn line(&self) -> usize {
        self.line
    }

    /// Nesting depth; 0 for invocations in the top-level document.
    pub fn depth(&self) -> usize {
        self.state.depth
    }

    /// Render markdown through the full pipeline, plugins included.
    ///
    /// Shares references, counters and warnings with the enclosing document.
    /// Past the configured nesting limit only the base transformer runs.
    pub fn transform(&mut self, markdown: &str) -> String {
        self.engine.render_nested(markdown, self.state)
    }

    /// Render markdown with the base transformer only.
    pub fn transform_base(&self, markdown: &str) -> String {
        self.engine.base().transform(markdown)
    }

    pub fn counter(&self) -> &InvocationCounter {
        &self.state.counter
    }

    pub fn counter_mut(&mut self) -> &mut InvocationCounter {
        &mut self.state.counter
    }

    /// Record a render warning. Warnings never abort the render.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(plugin = self.plugin_id, line = self.line, "{message}");
        self.state.warnings.push(message);
    }
}
