//! Placeholder substitution.
//!
//! Plugin markup must reach the final document verbatim, so it never goes
//! through the base transformer. Each resolved invocation is swapped for a
//! placeholder before the base pass and swapped back afterwards.

/// Placeholder standing in for a block invocation.
///
/// An HTML comment on its own line, which the base transformer passes
/// through as a raw HTML block.
pub(crate) fn block_marker(id: usize) -> String {
    format!("<!-- haik:block:{id} -->")
}

/// Placeholder standing in for an inline invocation.
///
/// Private-use code points survive inline formatting and HTML escaping.
pub(crate) fn inline_marker(id: usize) -> String {
    format!("\u{E000}{id}\u{E001}")
}

/// Collected placeholder/markup pairs for one render pass.
///
/// # Example
///
/// ```ignore
/// let mut replacements = Replacements::new();
/// replacements.add(inline_marker(0), "<i></i>");
/// let mut html = format!("<p>{}</p>", inline_marker(0));
/// replacements.apply(&mut html);
/// assert_eq!(html, "<p><i></i></p>");
/// ```
#[derive(Debug, Default)]
pub(crate) struct Replacements {
    items: Vec<(String, String)>,
}

impl Replacements {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register markup for a placeholder.
    pub(crate) fn add(&mut self, placeholder: impl Into<String>, markup: impl Into<String>) {
        self.items.push((placeholder.into(), markup.into()));
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    /// Substitute every registered placeholder.
    ///
    /// Consumes the collector; placeholders are unique per render, so each
    /// one is replaced at most once.
    pub(crate) fn apply(self, html: &mut String) {
        for (placeholder, markup) in self.items {
            if let Some(pos) = html.find(&placeholder) {
                html.replace_range(pos..pos + placeholder.len(), &markup);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_replacements() {
        let mut html = "unchanged".to_owned();
        Replacements::new().apply(&mut html);
        assert_eq!(html, "unchanged");
    }

    #[test]
    fn test_inline_marker_substitution() {
        let mut html = format!("<p>a{}b{}</p>", inline_marker(0), inline_marker(1));
        let mut replacements = Replacements::new();
        replacements.add(inline_marker(0), "<i></i>");
        replacements.add(inline_marker(1), "<b></b>");
        assert_eq!(replacements.len(), 2);
        replacements.apply(&mut html);
        assert_eq!(html, "<p>a<i></i>b<b></b></p>");
    }

    #[test]
    fn test_block_marker_substitution() {
        let mut html = format!("{}\n<p>x</p>\n", block_marker(3));
        let mut replacements = Replacements::new();
        replacements.add(block_marker(3), "<div>block</div>");
        replacements.apply(&mut html);
        assert_eq!(html, "<div>block</div>\n<p>x</p>\n");
    }

    #[test]
    fn test_markers_are_distinct() {
        assert_ne!(inline_marker(1), inline_marker(11));
        assert!(!inline_marker(11).contains(&inline_marker(1)));
        assert!(!block_marker(12).contains(&block_marker(1)));
    }

    #[test]
    fn test_missing_placeholder_is_ignored() {
        let mut html = "<p>text</p>".to_owned();
        let mut replacements = Replacements::new();
        replacements.add(inline_marker(9), "<i></i>");
        assert!(!replacements.is_empty());
        replacements.apply(&mut html);
        assert_eq!(html, "<p>text</p>");
    }
}
