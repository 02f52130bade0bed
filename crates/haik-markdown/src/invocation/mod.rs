//! Invocation syntax.
//!
//! Two surface forms call a plugin:
//!
//! ```text
//! Inline:  /(name params)   /[body](name params)   /[body][ref]   /[ref]
//! Block:   :::name params        ::: [ref]
//!          body                  body
//!          ---                   :::
//!          params
//!          :::
//! ```
//!
//! Both may carry a trailing `{#id .class}` fragment. The scanners here only
//! locate invocations; dispatch happens in the engine.

mod attrs;
pub(crate) mod block;
mod fence;
mod regions;
pub(crate) mod scanner;

pub use attrs::SpecialAttributes;
pub(crate) use fence::FenceTracker;
pub(crate) use regions::InlineRegions;

/// What an invocation calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Target {
    /// A plugin named at the call site, with its raw parameter text.
    Plugin { id: String, params: String },
    /// A reference name resolved through a definition.
    Reference { name: String },
}

/// Length of the plugin-name token at the start of `s`.
pub(crate) fn name_len(s: &str) -> usize {
    s.find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(s.len())
}
