//! Plugin contract, dispatch context and repositories.
//!
//! A plugin is created fresh for every invocation. The engine hands it the
//! parsed [`Params`] and the raw body, and splices whatever markup it returns
//! into the document verbatim.

mod context;
mod repository;

pub use context::{InvocationCounter, InvocationKind, PluginContext};
pub use repository::{FactoryRepository, PluginFactory, PluginRegistry, PluginRepository};

use crate::Params;

/// Errors raised by plugin repositories.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// No registered repository provides the requested plugin.
    #[error("plugin not found: {id}")]
    NotFound { id: String },
}

/// Result of a plugin call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PluginOutput {
    /// Markup substituted for the invocation.
    Html(String),
    /// Leave the invocation in the document as written.
    Skip,
}

impl PluginOutput {
    /// Create an HTML output.
    #[must_use]
    pub fn html(s: impl Into<String>) -> Self {
        Self::Html(s.into())
    }
}

/// Receiver for author-supplied `{#id .class}` fragments.
///
/// Plugins that expose this through [`Plugin::special_attributes`] receive
/// the id and classes before `inline` or `convert` is called.
pub trait SpecialAttributeTarget {
    fn set_special_id_attribute(&mut self, id: &str);

    /// Classes arrive space-joined in source order.
    fn set_special_class_attribute(&mut self, classes: &str);
}

/// Content-generating handler.
///
/// Implement `inline` for `/(name)` style invocations, `convert` for
/// `:::name` blocks, or both. The default implementations return
/// [`PluginOutput::Skip`], leaving the invocation untouched.
///
/// # Example
///
/// ```
/// use haik_markdown::{Params, Plugin, PluginContext, PluginOutput};
///
/// struct Kbd;
///
/// impl Plugin for Kbd {
///     fn inline(&mut self, _params: &Params, body: &str, _ctx: &mut PluginContext<'_>) -> PluginOutput {
///         PluginOutput::html(format!("<kbd>{body}</kbd>"))
///     }
/// }
/// ```
pub trait Plugin: Send {
    /// Handle an inline invocation.
    fn inline(
        &mut self,
        _params: &Params,
        _body: &str,
        _ctx: &mut PluginContext<'_>,
    ) -> PluginOutput {
        PluginOutput::Skip
    }

    /// Handle a block invocation.
    fn convert(
        &mut self,
        _params: &Params,
        _body: &str,
        _ctx: &mut PluginContext<'_>,
    ) -> PluginOutput {
        PluginOutput::Skip
    }

    /// Expose the special attribute setters, if this plugin accepts them.
    fn special_attributes(&mut self) -> Option<&mut dyn SpecialAttributeTarget> {
        None
    }
}
