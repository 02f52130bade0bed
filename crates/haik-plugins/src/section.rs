//! `:::section` full-width band.

use std::fmt::Write;

use haik_markdown::grid::{COLUMN_CAPACITY, Column, Row};
use haik_markdown::{Params, Plugin, PluginContext, PluginOutput, escape_html};

use crate::cols::DEFAULT_DELIMITER;

const PREFIX_CLASS: &str = "haik-plugin-section";
const CONFIG_DELIMITER: &str = "****";

/// Style keys accepted in the config part of the body.
const CONFIG_STYLES: [(&str, &str); 3] = [
    ("BG_IMAGE:", "background-image"),
    ("BG_COLOR:", "background-color"),
    ("COLOR:", "color"),
];

const STYLESHEET: &str = "<style>
  .haik-plugin-section > div {
    display: table;
    width: 100%;
  }

  .haik-plugin-section .jumbotron {
    margin-bottom: 0px;
    background-color: #fff;
  }

  .haik-plugin-section > div > div.container {
    display: table-cell;
    width: 100%;
  }
</style>
";

/// Jumbotron band with optional columns and background styling.
///
/// Parameters: `left`, `right` or `center` alignment, `nojumbotron` (also
/// `nojumbo`, `no-jumbotron`, `no-jumbo`), `top`, `middle` or `bottom`
/// vertical alignment and `height=N` (pixels unless a unit is given).
///
/// The body may end with a `****` line followed by `BG_IMAGE:`, `BG_COLOR:`
/// and `COLOR:` lines. Content split by `====` lines is laid out in equal
/// columns. The shared stylesheet is emitted with the first section of a
/// document only.
#[derive(Debug, Default)]
pub struct SectionPlugin {
    color: Option<String>,
    background_image: Option<String>,
    background_color: Option<String>,
    min_height: Option<String>,
    vertical_align: Option<String>,
    align: Option<&'static str>,
    no_jumbotron: bool,
}

impl SectionPlugin {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn parse_params(&mut self, params: &Params) {
        for param in params.values() {
            match param {
                "left" => self.align = Some("text-left"),
                "right" => self.align = Some("text-right"),
                "center" => self.align = Some("text-center"),
                "nojumbotron" | "nojumbo" | "no-jumbotron" | "no-jumbo" => {
                    self.no_jumbotron = true;
                }
                "top" | "middle" | "bottom" => self.vertical_align = Some(param.to_owned()),
                _ => {
                    if let Some(height) = param.strip_prefix("height=") {
                        let height = height.trim();
                        let numeric = !height.is_empty()
                            && height.bytes().all(|b| b.is_ascii_digit() || b == b'.');
                        self.min_height = Some(if numeric {
                            format!("{height}px")
                        } else {
                            height.to_owned()
                        });
                    }
                }
            }
        }
    }

    fn apply_config(&mut self, config: &str) {
        for line in config.lines() {
            for (prefix, property) in CONFIG_STYLES {
                let Some(value) = line.strip_prefix(prefix) else {
                    continue;
                };
                let value = value.trim().to_owned();
                match property {
                    "background-image" => self.background_image = Some(format!("url({value})")),
                    "background-color" => self.background_color = Some(value),
                    _ => self.color = Some(value),
                }
            }
        }
    }

    fn render_content(body: &str, ctx: &mut PluginContext<'_>) -> String {
        let parts = split_on_line(body, DEFAULT_DELIMITER);
        if parts.len() < 2 {
            return ctx.transform(body);
        }

        let width = COLUMN_CAPACITY / u32::try_from(parts.len()).unwrap_or(COLUMN_CAPACITY);
        let mut row = Row::new();
        for part in parts {
            let mut column = Column::new(width);
            column.set_content(ctx.transform(&part).trim());
            row.add_column(column);
        }
        row.render()
    }

    fn section_style(&self) -> String {
        join_styles([
            ("color", self.color.as_deref()),
            ("background-image", self.background_image.as_deref()),
            ("background-color", self.background_color.as_deref()),
            ("min-height", self.min_height.as_deref()),
        ])
    }

    fn container_style(&self) -> String {
        join_styles([("vertical-align", self.vertical_align.as_deref())])
    }

    fn class_attribute(&self) -> String {
        let mut classes = Vec::new();
        if !self.no_jumbotron {
            classes.push("jumbotron");
        }
        if let Some(align) = self.align {
            classes.push(align);
        }
        classes.join(" ")
    }
}

/// Split on lines equal to `delimiter`.
fn split_on_line(text: &str, delimiter: &str) -> Vec<String> {
    let mut parts = vec![String::new()];
    for line in text.split_inclusive('\n') {
        if line.trim() == delimiter {
            parts.push(String::new());
        } else if let Some(last) = parts.last_mut() {
            last.push_str(line);
        }
    }
    parts
}

fn join_styles<const N: usize>(styles: [(&str, Option<&str>); N]) -> String {
    let mut out = String::new();
    for (property, value) in styles {
        let Some(value) = value.map(|v| v.trim_end_matches(';')) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(';');
        }
        write!(out, "{property}:{value}").unwrap();
    }
    out
}

impl Plugin for SectionPlugin {
    fn convert(&mut self, params: &Params, body: &str, ctx: &mut PluginContext<'_>) -> PluginOutput {
        self.parse_params(params);

        let mut parts = split_on_line(body, CONFIG_DELIMITER).into_iter();
        let content_source = parts.next().unwrap_or_default();
        if let Some(config) = parts.next() {
            self.apply_config(&config);
        }

        let content = Self::render_content(&content_source, ctx);

        let mut html = String::new();
        if ctx.counter().get(ctx.plugin_id()) <= 1 {
            html.push_str(STYLESHEET);
        }
        write!(
            html,
            concat!(
                "<div class=\"{prefix}\">\n",
                "  <div class=\"{class}\" style=\"{section_style}\">\n",
                "    <div class=\"container\" style=\"{container_style}\">\n",
                "      {content}\n",
                "    </div>\n",
                "  </div>\n",
                "</div>\n",
            ),
            prefix = PREFIX_CLASS,
            class = self.class_attribute(),
            section_style = escape_html(&self.section_style()),
            container_style = escape_html(&self.container_style()),
            content = content,
        )
        .unwrap();

        PluginOutput::html(html)
    }
}
