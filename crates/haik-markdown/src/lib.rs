//! Markdown extension engine with pluggable inline and block plugins.
//!
//! Documents are ordinary markdown plus two invocation forms that hand a
//! region of text to a named plugin:
//!
//! ```text
//! Inline:  /(icon search)   /[Read more](alert info)   /[text][ref]
//! Block:   :::cols
//!          left
//!          ====
//!          right
//!          :::
//! ```
//!
//! Plugins are looked up through [`PluginRepository`] implementations
//! registered on the engine. Anything that does not name a known plugin is
//! left for the base transformer, so a plain markdown document renders the
//! same with or without the engine.
//!
//! # Example
//!
//! ```
//! use haik_markdown::{FactoryRepository, HaikMarkdown, Params, Plugin, PluginContext, PluginOutput};
//!
//! struct Badge;
//!
//! impl Plugin for Badge {
//!     fn inline(&mut self, params: &Params, _body: &str, _ctx: &mut PluginContext<'_>) -> PluginOutput {
//!         let label = params.values().first().copied().unwrap_or("new");
//!         PluginOutput::html(format!("<span class=\"badge\">{label}</span>"))
//!     }
//! }
//!
//! let engine = HaikMarkdown::new()
//!     .with_repository(FactoryRepository::new().with_plugin("badge", || Box::new(Badge)));
//!
//! let result = engine.render("Release /(badge beta)");
//! assert_eq!(result.html, "<p>Release <span class=\"badge\">beta</span></p>\n");
//! assert!(result.warnings.is_empty());
//! ```

mod engine;
pub mod grid;
mod invocation;
mod params;
mod plugin;
mod reference;
mod renderer;
mod replacements;
mod util;

pub use engine::{HaikMarkdown, HaikMarkdownConfig, RenderResult};
pub use invocation::SpecialAttributes;
pub use params::{KeyedParams, Params};
pub use plugin::{
    FactoryRepository, InvocationCounter, InvocationKind, Plugin, PluginContext, PluginError,
    PluginFactory, PluginOutput, PluginRegistry, PluginRepository, SpecialAttributeTarget,
};
pub use reference::ReferenceDefinition;
pub use renderer::{BaseTransformer, MarkdownRenderer};
pub use util::escape_html;
