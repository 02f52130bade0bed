//! `:::cols` grid block and the column layout shared with `tile`.

use haik_markdown::grid::{COLUMN_CAPACITY, Column, Row};
use haik_markdown::{Params, Plugin, PluginContext, PluginOutput};

const PREFIX_CLASS: &str = "haik-plugin-cols";
pub(crate) const DEFAULT_DELIMITER: &str = "====";

/// Columns built from parameters and a delimited body.
///
/// Parameters are column codes (`4`, `3+1`, `6.lead`), `class=NAME` for the
/// row, or any other token, which becomes the column delimiter line for this
/// block. Without column codes the body is split on the delimiter and the
/// grid is shared equally between the parts.
#[derive(Debug)]
pub(crate) struct ColumnLayout {
    pub(crate) row: Row,
    delimiter: String,
}

impl ColumnLayout {
    pub(crate) fn new(prefix_class: &str) -> Self {
        let mut row = Row::new();
        row.prepend_class(prefix_class);
        Self {
            row,
            delimiter: DEFAULT_DELIMITER.to_owned(),
        }
    }

    /// Read parameters. `make_column` turns a column code into a column.
    pub(crate) fn apply_params(
        &mut self,
        params: &Params,
        mut make_column: impl FnMut(&str) -> Option<Column>,
    ) {
        let tokens: Vec<(Option<&str>, &str)> = match params {
            Params::Positional(values) => values.iter().map(|v| (None, v.as_str())).collect(),
            Params::Keyed(keyed) => keyed.iter().map(|(k, v)| (Some(k), v)).collect(),
        };

        for (key, token) in tokens {
            if key == Some("class") {
                self.row.add_class(token.trim());
            } else if Column::is_parsable(token) {
                if let Some(column) = make_column(token) {
                    self.row.add_column(column);
                }
            } else if let Some(class) = token.strip_prefix("class=") {
                self.row.add_class(class.trim());
            } else if !token.trim().is_empty() {
                self.delimiter = token.trim().to_owned();
            }
        }
    }

    /// Distribute `body` over the columns.
    ///
    /// Extra parts beyond the declared columns stay in the last column;
    /// missing parts leave columns empty. A `STYLE:` or `CLASS:` line in a
    /// part is moved onto its column.
    pub(crate) fn distribute(&mut self, body: &str) {
        if self.row.is_empty() {
            let parts = split_parts(body, &self.delimiter, None);
            let width = COLUMN_CAPACITY / u32::try_from(parts.len()).unwrap_or(COLUMN_CAPACITY);
            for _ in &parts {
                self.row.add_column(Column::new(width));
            }
        }

        let mut parts = split_parts(body, &self.delimiter, Some(self.row.len()));
        parts.resize(self.row.len(), String::new());

        for (column, part) in self.row.iter_mut().zip(parts) {
            let (part, style) = take_directive(&part, "STYLE:");
            if let Some(style) = style {
                column.add_style(&style);
            }
            let (part, class) = take_directive(&part, "CLASS:");
            if let Some(class) = class {
                column.add_class(&class);
            }
            column.set_content(part);
        }
    }

    /// Report a row wider than the grid. The row still renders.
    pub(crate) fn check_capacity(&self, ctx: &mut PluginContext<'_>) {
        if self.row.exceeds_capacity() {
            let message = format!(
                "`{}` columns at line {} span {} units, more than the grid's {COLUMN_CAPACITY}",
                ctx.plugin_id(),
                ctx.line(),
                self.row.total_width()
            );
            ctx.warn(message);
        }
    }
}

/// Split `body` on lines equal to `delimiter`, into at most `limit` parts.
fn split_parts(body: &str, delimiter: &str, limit: Option<usize>) -> Vec<String> {
    let mut parts = vec![String::new()];
    for line in body.split_inclusive('\n') {
        let room = limit.is_none_or(|limit| parts.len() < limit);
        if room && line.trim() == delimiter {
            parts.push(String::new());
        } else if let Some(last) = parts.last_mut() {
            last.push_str(line);
        }
    }
    parts
}

/// Remove the first `PREFIX value` line from `part`, returning the value.
fn take_directive(part: &str, prefix: &str) -> (String, Option<String>) {
    let mut value = None;
    let mut rest = String::with_capacity(part.len());
    for line in part.split_inclusive('\n') {
        if value.is_none()
            && let Some(found) = line.strip_prefix(prefix)
            && !found.trim().is_empty()
        {
            value = Some(found.trim().to_owned());
            continue;
        }
        rest.push_str(line);
    }
    (rest, value)
}

/// Bootstrap grid row. Each part of the body becomes one column.
///
/// ```text
/// :::cols 4, 8, class=features
/// left
/// ====
/// right
/// :::
/// ```
#[derive(Debug)]
pub struct ColsPlugin {
    layout: ColumnLayout,
}

impl Default for ColsPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl ColsPlugin {
    #[must_use]
    pub fn new() -> Self {
        Self {
            layout: ColumnLayout::new(PREFIX_CLASS),
        }
    }
}

impl Plugin for ColsPlugin {
    fn convert(&mut self, params: &Params, body: &str, ctx: &mut PluginContext<'_>) -> PluginOutput {
        self.layout.apply_params(params, Column::from_code);
        self.layout.distribute(body);
        self.layout.check_capacity(ctx);

        for column in self.layout.row.iter_mut() {
            let html = ctx.transform(column.content());
            column.set_content(html.trim());
        }

        PluginOutput::html(self.layout.row.render())
    }
}
