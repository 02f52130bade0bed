//! `:::alert` block.

use haik_markdown::{
    Params, Plugin, PluginContext, PluginOutput, SpecialAttributeTarget, escape_html,
};

use crate::attributes::ElementAttributes;

const PREFIX_CLASS: &str = "haik-plugin-alert";
const DEFAULT_TYPE: &str = "warning";
const TYPES: [&str; 4] = ["success", "info", "warning", "danger"];
const CLOSE_BUTTON: &str =
    r#"<button type="button" class="close" data-dismiss="alert" aria-hidden="true">&times;</button>"#;

/// Bootstrap alert box around the rendered body.
///
/// Positional parameters: an alert type (`success`, `info`, `warning`,
/// `danger`), `close` for a dismiss button, anything else is an extra class.
/// Keyed parameters use `type`, `close` and `class`.
#[derive(Debug)]
pub struct AlertPlugin {
    kind: &'static str,
    dismissable: bool,
    custom_classes: Vec<String>,
    attributes: ElementAttributes,
}

impl Default for AlertPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertPlugin {
    #[must_use]
    pub fn new() -> Self {
        Self {
            kind: DEFAULT_TYPE,
            dismissable: false,
            custom_classes: Vec::new(),
            attributes: ElementAttributes::default(),
        }
    }

    fn parse_params(&mut self, params: &Params) {
        match params {
            Params::Keyed(keyed) => {
                for (key, value) in keyed.iter() {
                    match key {
                        "type" => self.set_type(value.trim()),
                        "close" => self.dismissable = true,
                        "class" => self.add_class(value),
                        _ => {}
                    }
                }
            }
            Params::Positional(values) => {
                for value in values {
                    match value.as_str() {
                        "close" => self.dismissable = true,
                        kind if TYPES.contains(&kind) => self.set_type(kind),
                        other => self.add_class(other),
                    }
                }
            }
        }
    }

    fn set_type(&mut self, kind: &str) {
        if let Some(known) = TYPES.into_iter().find(|t| *t == kind) {
            self.kind = known;
        }
    }

    fn add_class(&mut self, class: &str) {
        let class = class.trim();
        if !class.is_empty() {
            self.custom_classes.push(class.to_owned());
        }
    }

    fn class_attribute(&self) -> String {
        let mut classes = vec![
            PREFIX_CLASS.to_owned(),
            "alert".to_owned(),
            format!("alert-{}", self.kind),
        ];
        if self.dismissable {
            classes.push("alert-dismissable".to_owned());
        }
        classes.extend(self.custom_classes.iter().cloned());
        if let Some(class) = self.attributes.class() {
            classes.push(class.to_owned());
        }
        classes.join(" ")
    }
}

impl Plugin for AlertPlugin {
    fn convert(&mut self, params: &Params, body: &str, ctx: &mut PluginContext<'_>) -> PluginOutput {
        self.parse_params(params);

        let content = ctx.transform(body);
        let close = if self.dismissable { CLOSE_BUTTON } else { "" };

        PluginOutput::html(format!(
            r#"<div class="{}"{}>{close}{content}</div>"#,
            escape_html(&self.class_attribute()),
            self.attributes.id_attribute(),
        ))
    }

    fn special_attributes(&mut self) -> Option<&mut dyn SpecialAttributeTarget> {
        Some(&mut self.attributes)
    }
}

#[cfg(test)]
mod tests {
    use haik_markdown::HaikMarkdown;
    use pretty_assertions::assert_eq;

    use crate::bootstrap_repository;

    fn render(text: &str) -> String {
        HaikMarkdown::new()
            .with_repository(bootstrap_repository())
            .transform(text)
    }

    #[test]
    fn test_default_type_is_warning() {
        assert_eq!(
            render(":::alert\nHeads up\n:::"),
            "<div class=\"haik-plugin-alert alert alert-warning\"><p>Heads up</p>\n</div>\n"
        );
    }

    #[test]
    fn test_positional_params() {
        assert_eq!(
            render(":::alert info, close, shadow\nSaved\n:::"),
            concat!(
                "<div class=\"haik-plugin-alert alert alert-info alert-dismissable shadow\">",
                "<button type=\"button\" class=\"close\" data-dismiss=\"alert\" aria-hidden=\"true\">&times;</button>",
                "<p>Saved</p>\n</div>\n"
            )
        );
    }

    #[test]
    fn test_keyed_params() {
        let html = render(":::alert\nBoom\n---\ntype: danger\nclass: big\n:::");
        assert!(html.starts_with("<div class=\"haik-plugin-alert alert alert-danger big\">"), "{html}");
    }

    #[test]
    fn test_unknown_keyed_type_keeps_default() {
        let html = render(":::alert\nx\n---\ntype: purple\n:::");
        assert!(html.contains("alert-warning"), "{html}");
    }

    #[test]
    fn test_special_attributes() {
        let html = render(":::alert success {#saved .wide}\nDone\n:::");
        assert!(
            html.starts_with("<div class=\"haik-plugin-alert alert alert-success wide\" id=\"saved\">"),
            "{html}"
        );
    }

    #[test]
    fn test_body_is_rendered_with_plugins() {
        let html = render(":::alert\nSee /(icon info-sign)\n:::");
        assert!(html.contains("<i class=\"haik-plugin-icon glyphicon glyphicon-info-sign\"></i>"), "{html}");
    }
}
