//! Plugin-aware markdown engine.
//!
//! Rendering runs in five passes over a document:
//!
//! 1. Reference definitions naming a known plugin are collected and removed.
//! 2. Block invocations are dispatched; each resolved block becomes a
//!    placeholder line.
//! 3. Inline invocations are dispatched innermost first; each resolved
//!    top-level call becomes an inline placeholder.
//! 4. The base transformer renders the remaining text.
//! 5. Placeholders are swapped for the plugin markup.
//!
//! Invocations that cannot be resolved stay in the text exactly as written.

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

use crate::invocation::block::{BlockInvocation, scan_blocks};
use crate::invocation::scanner::{SpanTree, scan_inline};
use crate::invocation::{InlineRegions, SpecialAttributes, Target};
use crate::params::Params;
use crate::plugin::{
    InvocationCounter, InvocationKind, Plugin, PluginContext, PluginError, PluginOutput,
    PluginRegistry, PluginRepository,
};
use crate::reference::{ReferenceTable, extract_definitions};
use crate::renderer::{BaseTransformer, MarkdownRenderer};
use crate::replacements::{Replacements, block_marker, inline_marker};
use crate::util::escape_html;

/// Engine settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HaikMarkdownConfig {
    param_separator: String,
    max_depth: usize,
}

impl Default for HaikMarkdownConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl HaikMarkdownConfig {
    /// Create a configuration with the `---` separator and a nesting limit of 10.
    #[must_use]
    pub fn new() -> Self {
        Self {
            param_separator: "---".to_owned(),
            max_depth: 10,
        }
    }

    /// Set the line dividing a block body from its parameter section.
    #[must_use]
    pub fn with_param_separator(mut self, separator: impl Into<String>) -> Self {
        self.param_separator = separator.into();
        self
    }

    /// Set how deep plugins may render nested markdown through the engine.
    ///
    /// Default: 10
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn param_separator(&self) -> &str {
        &self.param_separator
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

/// Rendered markup plus the problems noticed along the way.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderResult {
    pub html: String,
    /// Unclosed blocks, depth limit hits and plugin warnings.
    pub warnings: Vec<String>,
}

/// State shared by every invocation in one top-level render.
#[derive(Debug, Default)]
pub(crate) struct RenderState {
    pub(crate) counter: InvocationCounter,
    pub(crate) references: ReferenceTable,
    pub(crate) depth: usize,
    pub(crate) warnings: Vec<String>,
    next_placeholder: usize,
}

impl RenderState {
    fn next_placeholder(&mut self) -> usize {
        let id = self.next_placeholder;
        self.next_placeholder += 1;
        id
    }
}

/// A resolved invocation.
struct Invoked {
    markup: String,
    attrs_applied: bool,
}

/// Markdown transformer with plugin invocations.
///
/// # Example
///
/// ```
/// use haik_markdown::{FactoryRepository, HaikMarkdown, Params, Plugin, PluginContext, PluginOutput};
///
/// struct Kbd;
///
/// impl Plugin for Kbd {
///     fn inline(&mut self, _params: &Params, body: &str, _ctx: &mut PluginContext<'_>) -> PluginOutput {
///         PluginOutput::html(format!("<kbd>{body}</kbd>"))
///     }
/// }
///
/// let engine = HaikMarkdown::new()
///     .with_repository(FactoryRepository::new().with_plugin("kbd", || Box::new(Kbd)));
///
/// let html = engine.transform("Press /[Ctrl+C](kbd) to copy.");
/// assert_eq!(html, "<p>Press <kbd>Ctrl+C</kbd> to copy.</p>\n");
/// ```
pub struct HaikMarkdown {
    registry: PluginRegistry,
    base: Box<dyn BaseTransformer>,
    config: HaikMarkdownConfig,
}

impl Default for HaikMarkdown {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HaikMarkdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HaikMarkdown")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HaikMarkdown {
    /// Create an engine with the default renderer and no plugins.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: PluginRegistry::new(),
            base: Box::new(MarkdownRenderer::new()),
            config: HaikMarkdownConfig::new(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: HaikMarkdownConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the base transformer.
    #[must_use]
    pub fn with_base(mut self, base: impl BaseTransformer + 'static) -> Self {
        self.base = Box::new(base);
        self
    }

    /// Register a plugin repository ahead of those already registered.
    #[must_use]
    pub fn with_repository(mut self, repository: impl PluginRepository + 'static) -> Self {
        self.register_repository(repository);
        self
    }

    pub fn register_repository(&mut self, repository: impl PluginRepository + 'static) {
        self.registry.register(repository);
    }

    pub fn config(&self) -> &HaikMarkdownConfig {
        &self.config
    }

    pub fn base(&self) -> &dyn BaseTransformer {
        self.base.as_ref()
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Check whether any repository provides `id` (case-insensitive).
    pub fn has_plugin(&self, id: &str) -> bool {
        self.registry.exists(&id.to_ascii_lowercase())
    }

    /// Create a fresh instance of `id` (case-insensitive).
    pub fn load_plugin(&self, id: &str) -> Result<Box<dyn Plugin>, PluginError> {
        self.registry.load(&id.to_ascii_lowercase())
    }

    /// Every available plugin id, sorted.
    pub fn all_plugins(&self) -> Vec<String> {
        self.registry.get_all()
    }

    /// Render `text` to markup.
    pub fn transform(&self, text: &str) -> String {
        self.render(text).html
    }

    /// Render `text` to markup and collect warnings.
    pub fn render(&self, text: &str) -> RenderResult {
        let mut state = RenderState::default();
        let html = self.run(text, &mut state);
        RenderResult {
            html,
            warnings: state.warnings,
        }
    }

    /// Render markdown on behalf of a plugin, one level deeper.
    pub(crate) fn render_nested(&self, text: &str, state: &mut RenderState) -> String {
        if state.depth >= self.config.max_depth {
            tracing::warn!(
                depth = state.depth,
                "Plugin nesting limit reached, rendering without plugins"
            );
            state.warnings.push(format!(
                "plugin nesting limit of {} reached; nested content rendered without plugins",
                self.config.max_depth
            ));
            return self.base.transform(text);
        }

        state.depth += 1;
        let html = self.run(text, state);
        state.depth -= 1;
        html
    }

    fn run(&self, text: &str, state: &mut RenderState) -> String {
        let text = text.replace("\r\n", "\n");
        let text = extract_definitions(&text, &self.registry, &mut state.references);

        let mut replacements = Replacements::new();
        let text = self.expand_blocks(&text, state, &mut replacements);
        let text = self.expand_inline(&text, state, &mut replacements);

        let mut html = self.base.transform(&text);
        if !replacements.is_empty() {
            tracing::debug!(count = replacements.len(), "Substituting plugin output");
            replacements.apply(&mut html);
        }
        html
    }

    fn expand_blocks(
        &self,
        text: &str,
        state: &mut RenderState,
        replacements: &mut Replacements,
    ) -> String {
        let lines: Vec<&str> = text.split('\n').collect();
        let scan = scan_blocks(&lines, &self.config.param_separator);
        state.warnings.extend(scan.warnings);

        if scan.invocations.is_empty() {
            return text.to_owned();
        }

        let mut output: Vec<Cow<'_, str>> = Vec::with_capacity(lines.len());
        let mut next_line = 0;

        for block in &scan.invocations {
            output.extend(lines[next_line..block.lines.start].iter().map(|l| Cow::Borrowed(*l)));

            if let Some(markup) = self.dispatch_block(block, state) {
                let marker = block_marker(state.next_placeholder());
                output.push(Cow::Owned(format!("{}{marker}", block.indent)));
                replacements.add(marker, markup);
            } else {
                output.extend(lines[block.lines.clone()].iter().map(|l| Cow::Borrowed(*l)));
            }
            next_line = block.lines.end;
        }
        output.extend(lines[next_line..].iter().map(|l| Cow::Borrowed(*l)));

        output.join("\n")
    }

    fn dispatch_block(&self, block: &BlockInvocation, state: &mut RenderState) -> Option<String> {
        let (id, params) = match &block.target {
            Target::Plugin { id, params } => {
                // A parameter section overrides parameters on the fence line
                let raw = block.section.as_deref().unwrap_or(params);
                (id.clone(), Params::parse(raw))
            }
            Target::Reference { name } => self.lookup_reference(name, state)?,
        };

        self.invoke(
            &id,
            &params,
            &block.body,
            block.attrs.as_ref(),
            InvocationKind::Block,
            block.lines.start + 1,
            state,
        )
        .map(|invoked| invoked.markup)
    }

    fn expand_inline(
        &self,
        text: &str,
        state: &mut RenderState,
        replacements: &mut Replacements,
    ) -> String {
        let regions = InlineRegions::scan(text);
        let tree = scan_inline(text, regions.prose(), &state.references);

        if tree.is_empty() {
            return text.to_owned();
        }

        // A call inside an unresolvable call is never dispatched, nor is one
        // in image alt text. Parents precede their children in the arena.
        let mut live = vec![false; tree.nodes.len()];
        for index in 0..tree.nodes.len() {
            let node = &tree.nodes[index];
            let parent_live = tree.parents[index].is_none_or(|parent| live[parent]);
            live[index] = parent_live
                && !regions.in_image(&node.span)
                && self.is_resolvable(&node.target, state);
        }

        let line_starts: Vec<usize> = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();

        let mut outputs: Vec<Option<String>> = vec![None; tree.nodes.len()];
        for index in tree.resolution_order() {
            if live[index] {
                let offset = tree.nodes[index].span.start;
                let line = line_starts.partition_point(|&start| start <= offset);
                let output = self.resolve_inline(text, &tree, index, line, &outputs, state);
                outputs[index] = output;
            }
        }

        let mut result = String::with_capacity(text.len());
        let mut cursor = 0;
        for &root in &tree.roots {
            let Some(markup) = outputs[root].take() else {
                continue;
            };
            let span = &tree.nodes[root].span;
            let marker = inline_marker(state.next_placeholder());
            result.push_str(&text[cursor..span.start]);
            result.push_str(&marker);
            replacements.add(marker, markup);
            cursor = span.end;
        }
        result.push_str(&text[cursor..]);

        result
    }

    fn resolve_inline(
        &self,
        text: &str,
        tree: &SpanTree,
        index: usize,
        line: usize,
        outputs: &[Option<String>],
        state: &mut RenderState,
    ) -> Option<String> {
        let node = &tree.nodes[index];
        let (id, params) = match &node.target {
            Target::Plugin { id, params } => (id.clone(), Params::parse(params)),
            Target::Reference { name } => self.lookup_reference(name, state)?,
        };

        let body = node.body.as_ref().map_or_else(String::new, |range| {
            splice_children(text, range.clone(), &tree.children[index], tree, outputs)
        });

        let invoked = self.invoke(
            &id,
            &params,
            &body,
            node.attrs.as_ref(),
            InvocationKind::Inline,
            line,
            state,
        )?;

        let mut markup = invoked.markup;
        if node.attrs.is_some() && !invoked.attrs_applied {
            // The fragment was part of the span; keep it visible
            markup.push_str(&escape_html(&text[node.call_end..node.span.end]));
        }
        Some(markup)
    }

    fn is_resolvable(&self, target: &Target, state: &RenderState) -> bool {
        match target {
            Target::Plugin { id, .. } => self.registry.exists(id),
            Target::Reference { name } => state
                .references
                .get(name)
                .is_some_and(|definition| self.registry.exists(&definition.plugin_id)),
        }
    }

    fn lookup_reference(&self, name: &str, state: &RenderState) -> Option<(String, Params)> {
        let Some(definition) = state.references.get(name) else {
            tracing::debug!(reference = name, "Undefined plugin reference");
            return None;
        };
        Some((definition.plugin_id.clone(), definition.params.clone()))
    }

    #[allow(clippy::too_many_arguments)]
    fn invoke(
        &self,
        id: &str,
        params: &Params,
        body: &str,
        attrs: Option<&SpecialAttributes>,
        kind: InvocationKind,
        line: usize,
        state: &mut RenderState,
    ) -> Option<Invoked> {
        if !self.registry.exists(id) {
            tracing::debug!(plugin = id, line, "Unknown plugin, leaving invocation as written");
            return None;
        }

        let mut plugin = match self.registry.load(id) {
            Ok(plugin) => plugin,
            Err(e) => {
                tracing::warn!(error = %e, plugin = id, "Failed to load plugin");
                return None;
            }
        };

        let mut attrs_applied = false;
        if let Some(attrs) = attrs
            && let Some(target) = plugin.special_attributes()
        {
            attrs.apply_to(target);
            attrs_applied = true;
        }

        state.counter.increment(id);
        let mut ctx = PluginContext::new(self, state, id, kind, line);
        let output = match kind {
            InvocationKind::Inline => plugin.inline(params, body, &mut ctx),
            InvocationKind::Block => plugin.convert(params, body, &mut ctx),
        };

        match output {
            PluginOutput::Html(markup) => Some(Invoked {
                markup,
                attrs_applied,
            }),
            PluginOutput::Skip => {
                tracing::debug!(plugin = id, line, ?kind, "Plugin skipped invocation");
                None
            }
        }
    }
}

/// Body text with resolved child calls replaced by their markup.
fn splice_children(
    text: &str,
    range: Range<usize>,
    children: &[usize],
    tree: &SpanTree,
    outputs: &[Option<String>],
) -> String {
    let mut body = String::with_capacity(range.len());
    let mut cursor = range.start;

    for &child in children {
        if let Some(markup) = &outputs[child] {
            let span = &tree.nodes[child].span;
            body.push_str(&text[cursor..span.start]);
            body.push_str(markup);
            cursor = span.end;
        }
    }
    body.push_str(&text[cursor..range.end]);

    body
}
