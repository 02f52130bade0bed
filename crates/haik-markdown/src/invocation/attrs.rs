//! Special attribute fragments.
//!
//! Parses the `{#id .class1 .class2}` fragment that may follow an inline
//! invocation or a block fence.

use crate::plugin::SpecialAttributeTarget;

/// Id and classes requested by the author for a plugin's root element.
///
/// # Example
///
/// ```
/// use haik_markdown::SpecialAttributes;
///
/// let attrs = SpecialAttributes::parse("#intro .lead.wide").unwrap();
/// assert_eq!(attrs.id(), Some("intro"));
/// assert_eq!(attrs.class_attribute(), "lead wide");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpecialAttributes {
    id: Option<String>,
    classes: Vec<String>,
}

impl SpecialAttributes {
    /// Parse the inside of a `{...}` fragment.
    ///
    /// Returns `None` unless every token is an `#id` or `.class` and at least
    /// one token is present. A fragment that fails to parse is left in the
    /// document as ordinary text.
    #[must_use]
    pub fn parse(inner: &str) -> Option<Self> {
        let mut attrs = Self::default();
        let mut remaining = inner.trim();

        if remaining.is_empty() {
            return None;
        }

        while !remaining.is_empty() {
            let marker = remaining.chars().next()?;
            if marker != '#' && marker != '.' {
                return None;
            }

            let rest = &remaining[1..];
            let end = rest.find(is_token_boundary).unwrap_or(rest.len());
            if end == 0 {
                return None;
            }

            let token = &rest[..end];
            if marker == '#' {
                attrs.id = Some(token.to_owned());
            } else {
                attrs.classes.push(token.to_owned());
            }
            remaining = rest[end..].trim_start();
        }

        Some(attrs)
    }

    /// Parse a fragment that starts at `from`, after optional spaces or tabs.
    ///
    /// Returns the attributes and the byte offset just past the closing brace.
    pub(crate) fn parse_at(src: &str, from: usize) -> Option<(Self, usize)> {
        let rest = &src[from..];
        let skipped = rest.len() - rest.trim_start_matches([' ', '\t']).len();
        let open = from + skipped;
        if !src[open..].starts_with('{') {
            return None;
        }

        let close = src[open..].find(['}', '\n']).map(|i| open + i)?;
        if !src[close..].starts_with('}') {
            return None;
        }

        Self::parse(&src[open + 1..close]).map(|attrs| (attrs, close + 1))
    }

    /// Strip a trailing `{...}` fragment from `text`.
    ///
    /// Returns the text before the fragment (right-trimmed) and the parsed
    /// attributes, or `None` when `text` does not end with a valid fragment.
    pub(crate) fn strip_suffix(text: &str) -> Option<(&str, Self)> {
        let trimmed = text.trim_end();
        let without_close = trimmed.strip_suffix('}')?;
        let open = without_close.rfind('{')?;
        let attrs = Self::parse(&without_close[open + 1..])?;
        Some((without_close[..open].trim_end(), attrs))
    }

    /// The requested id, if any.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Requested classes in source order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Classes joined by single spaces.
    pub fn class_attribute(&self) -> String {
        self.classes.join(" ")
    }

    /// Hand id and classes to a plugin.
    pub fn apply_to(&self, target: &mut dyn SpecialAttributeTarget) {
        if let Some(id) = &self.id {
            target.set_special_id_attribute(id);
        }
        if !self.classes.is_empty() {
            target.set_special_class_attribute(&self.class_attribute());
        }
    }
}

fn is_token_boundary(c: char) -> bool {
    c.is_whitespace() || matches!(c, '.' | '#' | '{' | '}')
}
