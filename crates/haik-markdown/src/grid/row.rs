use std::fmt::Write;
use std::ops::{Index, IndexMut};

use super::COLUMN_CAPACITY;
use super::attrs::{ClassList, StyleList};
use super::column::Column;
use crate::util::escape_html;

/// Ordered columns rendered inside a `row` container.
///
/// # Example
///
/// ```
/// use haik_markdown::grid::{Column, Row};
///
/// let mut row = Row::new();
/// row.add_column(Column::from_code("8").unwrap());
/// row.add_column(Column::from_code("3+2").unwrap());
/// assert_eq!(row.total_width(), 13);
/// assert!(row.exceeds_capacity());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    columns: Vec<Column>,
    classes: ClassList,
    styles: StyleList,
}

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_columns(columns: Vec<Column>) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Add space-separated classes after existing ones.
    pub fn add_class(&mut self, classes: &str) {
        self.classes.add(classes);
    }

    /// Add space-separated classes before existing ones.
    pub fn prepend_class(&mut self, classes: &str) {
        self.classes.prepend(classes);
    }

    pub fn add_style(&mut self, declarations: &str) {
        self.styles.add(declarations);
    }

    /// Sum of every column's width and offset.
    pub fn total_width(&self) -> u32 {
        self.columns
            .iter()
            .fold(0, |total, column| total.saturating_add(column.span()))
    }

    /// Whether the columns need more than [`COLUMN_CAPACITY`] units.
    ///
    /// Advisory only: an overflowing row still renders every column.
    pub fn exceeds_capacity(&self) -> bool {
        self.total_width() > COLUMN_CAPACITY
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Column> {
        self.columns.iter_mut()
    }

    pub fn class_attribute(&self) -> String {
        if self.classes.is_empty() {
            "row".to_owned()
        } else {
            format!("row {}", self.classes)
        }
    }

    pub fn style_attribute(&self) -> String {
        self.styles.to_string()
    }

    /// Render the row container and its columns.
    pub fn render(&self) -> String {
        let mut html = format!(r#"<div class="{}""#, escape_html(&self.class_attribute()));
        if !self.styles.is_empty() {
            write!(html, r#" style="{}""#, escape_html(&self.style_attribute())).unwrap();
        }
        html.push_str(">\n");
        for column in &self.columns {
            html.push_str(&column.render());
            html.push('\n');
        }
        html.push_str("</div>");
        html
    }
}

impl Index<usize> for Row {
    type Output = Column;

    fn index(&self, index: usize) -> &Column {
        &self.columns[index]
    }
}

impl IndexMut<usize> for Row {
    fn index_mut(&mut self, index: usize) -> &mut Column {
        &mut self.columns[index]
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

impl<'a> IntoIterator for &'a mut Row {
    type Item = &'a mut Column;
    type IntoIter = std::slice::IterMut<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_columns() -> Vec<Column> {
        ["4", "2+1", "5.class-name"]
            .iter()
            .filter_map(|code| Column::from_code(code))
            .collect()
    }

    #[test]
    fn test_iteration_preserves_order() {
        let columns = sample_columns();
        let row = Row::from_columns(columns.clone());
        for (i, column) in row.iter().enumerate() {
            assert_eq!(&columns[i], column);
            assert_eq!(&columns[i], &row[i]);
        }
        assert_eq!(row.len(), columns.len());
    }

    #[test]
    fn test_total_width_counts_offsets() {
        let row = Row::from_columns(sample_columns());
        assert_eq!(row.total_width(), 12);
        assert!(!row.exceeds_capacity());
    }

    #[test]
    fn test_exceeds_capacity() {
        let mut row = Row::from_columns(sample_columns());
        row.add_column(Column::from_code("1").unwrap());
        assert_eq!(row.total_width(), 13);
        assert!(row.exceeds_capacity());
    }

    #[test]
    fn test_total_width_saturates_on_huge_columns() {
        let row = Row::from_columns(vec![
            Column::from_code("4000000000").unwrap(),
            Column::from_code("4000000000+4000000000").unwrap(),
        ]);
        assert_eq!(row.total_width(), u32::MAX);
        assert!(row.exceeds_capacity());
    }

    #[test]
    fn test_render_with_only_class() {
        let mut row = Row::new();
        row.add_class("class-name");
        assert_eq!(row.render(), "<div class=\"row class-name\">\n</div>");
    }

    #[test]
    fn test_render_with_style() {
        let mut row = Row::new();
        row.add_style("color:red");
        assert_eq!(
            row.render(),
            "<div class=\"row\" style=\"color:red\">\n</div>"
        );
    }

    #[test]
    fn test_render_with_columns() {
        let row = Row::from_columns(vec![
            Column::from_code("6").unwrap(),
            Column::from_code("6").unwrap(),
        ]);
        assert_eq!(
            row.render(),
            "<div class=\"row\">\n<div class=\"col-sm-6\"></div>\n<div class=\"col-sm-6\"></div>\n</div>"
        );
    }

    #[test]
    fn test_overflowing_row_still_renders_all_columns() {
        let row = Row::from_columns(vec![
            Column::from_code("8").unwrap(),
            Column::from_code("8").unwrap(),
        ]);
        assert!(row.exceeds_capacity());
        assert_eq!(row.render().matches("col-sm-8").count(), 2);
    }

    #[test]
    fn test_prepend_class() {
        let mut row = Row::new();
        row.add_class("custom");
        row.prepend_class("haik-plugin-cols");
        assert_eq!(row.class_attribute(), "row haik-plugin-cols custom");
    }

    #[test]
    fn test_index_mut() {
        let mut row = Row::from_columns(sample_columns());
        row[1].set_content("x");
        assert_eq!(row[1].content(), "x");
        for column in &mut row {
            column.add_class("c");
        }
        assert!(row.iter().all(|c| c.classes().contains("c")));
    }
}
