//! `/(icon name)` inline glyph.

use haik_markdown::{
    Params, Plugin, PluginContext, PluginOutput, SpecialAttributeTarget, escape_html,
};

use crate::attributes::ElementAttributes;

const PREFIX_CLASS: &str = "haik-plugin-icon";

/// Glyphicon element for the first valid icon name in the parameters.
///
/// Renders nothing when no parameter is a valid name, so a mistyped icon
/// disappears instead of showing the invocation.
#[derive(Debug, Default)]
pub struct IconPlugin {
    attributes: ElementAttributes,
}

impl IconPlugin {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn icon_name(params: &Params) -> Option<&str> {
        match params {
            Params::Positional(values) => values
                .iter()
                .map(|value| value.trim())
                .find(|name| is_valid_icon_name(name)),
            Params::Keyed(keyed) => keyed
                .iter()
                .filter(|(key, _)| matches!(*key, "icon" | "name"))
                .map(|(_, value)| value.trim())
                .filter(|name| is_valid_icon_name(name))
                .last(),
        }
    }
}

fn is_valid_icon_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

impl Plugin for IconPlugin {
    fn inline(&mut self, params: &Params, _body: &str, _ctx: &mut PluginContext<'_>) -> PluginOutput {
        let Some(name) = Self::icon_name(params) else {
            tracing::debug!(params = %params, "No valid icon name");
            return PluginOutput::html("");
        };

        let mut class = format!("{PREFIX_CLASS} glyphicon glyphicon-{name}");
        if let Some(extra) = self.attributes.class() {
            class.push(' ');
            class.push_str(extra);
        }

        PluginOutput::html(format!(
            r#"<i class="{}"{}></i>"#,
            escape_html(&class),
            self.attributes.id_attribute()
        ))
    }

    fn special_attributes(&mut self) -> Option<&mut dyn SpecialAttributeTarget> {
        Some(&mut self.attributes)
    }
}
