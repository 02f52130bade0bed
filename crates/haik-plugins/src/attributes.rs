use std::fmt::Write;

use haik_markdown::{SpecialAttributeTarget, escape_html};

/// Id and classes received from a `{#id .class}` fragment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ElementAttributes {
    id: Option<String>,
    class: Option<String>,
}

impl ElementAttributes {
    pub(crate) fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    /// ` id="..."` or nothing.
    pub(crate) fn id_attribute(&self) -> String {
        let mut attr = String::new();
        if let Some(id) = &self.id {
            write!(attr, r#" id="{}""#, escape_html(id)).unwrap();
        }
        attr
    }
}

impl SpecialAttributeTarget for ElementAttributes {
    fn set_special_id_attribute(&mut self, id: &str) {
        self.id = Some(id.to_owned());
    }

    fn set_special_class_attribute(&mut self, classes: &str) {
        self.class = Some(classes.to_owned());
    }
}
