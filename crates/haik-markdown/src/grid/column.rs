use std::fmt::Write;

use super::COLUMN_CAPACITY;
use super::attrs::{ClassList, StyleList};
use crate::util::escape_html;

/// One cell of a [`Row`](super::Row).
///
/// Columns are usually built from a column code such as `4`, `3+1` or
/// `6.lead.text-center`: width, optional `+offset`, optional `.class` list.
///
/// # Example
///
/// ```
/// use haik_markdown::grid::Column;
///
/// let column = Column::from_code("3+1.lead").unwrap();
/// assert_eq!(column.width(), 3);
/// assert_eq!(column.offset(), 1);
/// assert_eq!(column.classes().to_string(), "lead");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    width: u32,
    offset: u32,
    classes: ClassList,
    styles: StyleList,
    content: String,
}

impl Default for Column {
    fn default() -> Self {
        Self::new(COLUMN_CAPACITY)
    }
}

impl Column {
    /// Create an empty column of the given width.
    #[must_use]
    pub fn new(width: u32) -> Self {
        Self {
            width,
            offset: 0,
            classes: ClassList::new(),
            styles: StyleList::new(),
            content: String::new(),
        }
    }

    /// Check whether `code` looks like a column code (starts with a digit).
    pub fn is_parsable(code: &str) -> bool {
        code.trim_start().starts_with(|c: char| c.is_ascii_digit())
    }

    /// Parse a column code.
    ///
    /// Returns `None` when the code has no leading width. Text after the
    /// width and offset that is not a `.class` list is ignored.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        let (width, rest) = leading_number(code)?;
        let mut column = Self::new(width);

        let rest = match rest.strip_prefix('+').and_then(leading_number) {
            Some((offset, after)) => {
                column.offset = offset;
                after
            }
            None => rest,
        };

        if let Some(dot) = rest.find('.') {
            for class in rest[dot + 1..].split('.') {
                column.classes.add(class);
            }
        }

        Some(column)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn set_width(&mut self, width: u32) {
        self.width = width;
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: u32) {
        self.offset = offset;
    }

    /// Width plus offset.
    pub fn span(&self) -> u32 {
        self.width.saturating_add(self.offset)
    }

    pub fn classes(&self) -> &ClassList {
        &self.classes
    }

    pub fn classes_mut(&mut self) -> &mut ClassList {
        &mut self.classes
    }

    /// Add space-separated class names.
    pub fn add_class(&mut self, classes: &str) {
        self.classes.add(classes);
    }

    /// Add `;`-separated style declarations.
    pub fn add_style(&mut self, declarations: &str) {
        self.styles.add(declarations);
    }

    pub fn style_attribute(&self) -> String {
        self.styles.to_string()
    }

    /// Full class attribute value including the grid classes.
    pub fn class_attribute(&self) -> String {
        let mut attr = format!("col-sm-{}", self.width);
        if self.offset > 0 {
            write!(attr, " col-sm-offset-{}", self.offset).unwrap();
        }
        if !self.classes.is_empty() {
            attr.push(' ');
            attr.push_str(&self.classes.to_string());
        }
        attr
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Render the column element. Content is inserted as markup.
    pub fn render(&self) -> String {
        let mut html = format!(r#"<div class="{}""#, escape_html(&self.class_attribute()));
        if !self.styles.is_empty() {
            write!(html, r#" style="{}""#, escape_html(&self.style_attribute())).unwrap();
        }
        html.push('>');
        html.push_str(&self.content);
        html.push_str("</div>");
        html
    }
}

fn leading_number(s: &str) -> Option<(u32, &str)> {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let value = s[..digits].parse().ok()?;
    Some((value, &s[digits..]))
}
