//! `:::tile` block, a Flat UI take on `cols`.

use std::sync::LazyLock;

use haik_markdown::grid::Column;
use haik_markdown::{Params, Plugin, PluginContext, PluginOutput};
use regex::Regex;

use crate::cols::ColumnLayout;

const PREFIX_CLASS: &str = "haik-plugin-tile";

static HOT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(hot|popular|tile-hot)\b").unwrap());
static IMAGE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<img\b[^>]*>").unwrap());
static CLASSED_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<h[1-6][^>]*?class=""#).unwrap());
static HEADING_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<h([1-6])").unwrap());

/// Grid of tiles.
///
/// Takes the same parameters as `cols`. A `.hot`, `.popular` or `.tile-hot`
/// suffix on a column code highlights that tile. When the first line of a
/// tile renders to an image, the image becomes the tile thumbnail.
#[derive(Debug)]
pub struct TilePlugin {
    layout: ColumnLayout,
    hot: Vec<bool>,
}

impl Default for TilePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl TilePlugin {
    #[must_use]
    pub fn new() -> Self {
        Self {
            layout: ColumnLayout::new(PREFIX_CLASS),
            hot: Vec::new(),
        }
    }

    fn render_tile(content: &str, hot: bool, ctx: &mut PluginContext<'_>) -> String {
        let mut lines: Vec<&str> = content
            .trim()
            .split('\n')
            .filter(|line| !line.is_empty())
            .collect();

        // Plugins on the first line run once: the image check uses the
        // base transform only.
        let mut thumbnail = String::new();
        if let Some(first) = lines.first()
            && IMAGE_TAG.is_match(&ctx.transform_base(first))
        {
            let top = ctx.transform(first);
            if let Some(image) = IMAGE_TAG.find(&top) {
                thumbnail = image
                    .as_str()
                    .replacen("<img", r#"<img class="tile-image big-illustration""#, 1);
            }
            lines.remove(0);
        }

        let mut body = ctx.transform(&lines.join("\n"));
        if !CLASSED_HEADING.is_match(&body) {
            body = HEADING_OPEN
                .replace_all(&body, r#"<h$1 class="tile-title""#)
                .into_owned();
        }

        let class = if hot { "tile tile-hot" } else { "tile" };
        format!(r#"<div class="{class}">{thumbnail}{body}</div>"#)
    }
}

impl Plugin for TilePlugin {
    fn convert(&mut self, params: &Params, body: &str, ctx: &mut PluginContext<'_>) -> PluginOutput {
        let hot = &mut self.hot;
        self.layout.apply_params(params, |code| {
            let stripped = HOT_MARKER.replace_all(code, "");
            let column = Column::from_code(&stripped)?;
            hot.push(stripped.len() != code.len());
            Some(column)
        });
        self.layout.distribute(body);
        self.layout.check_capacity(ctx);

        for (index, column) in self.layout.row.iter_mut().enumerate() {
            let is_hot = self.hot.get(index).copied().unwrap_or(false);
            let html = Self::render_tile(column.content(), is_hot, ctx);
            column.set_content(html);
        }

        PluginOutput::html(self.layout.row.render())
    }
}

#[cfg(test)]
mod tests {
    use haik_markdown::{FactoryRepository, HaikMarkdown, Params, Plugin, PluginContext, PluginOutput};
    use pretty_assertions::assert_eq;

    use crate::{bootstrap_repository, flat_ui_repository};

    fn engine() -> HaikMarkdown {
        HaikMarkdown::new()
            .with_repository(bootstrap_repository())
            .with_repository(flat_ui_repository())
    }

    struct Count;

    impl Plugin for Count {
        fn inline(&mut self, _params: &Params, _body: &str, ctx: &mut PluginContext<'_>) -> PluginOutput {
            PluginOutput::html(format!("#{}", ctx.counter().get(ctx.plugin_id())))
        }
    }

    #[test]
    fn test_tiles_with_titles() {
        assert_eq!(
            engine().transform(":::tile\n### One\ntext\n====\n### Two\n:::"),
            concat!(
                "<div class=\"row haik-plugin-tile\">\n",
                "<div class=\"col-sm-6\"><div class=\"tile\"><h3 class=\"tile-title\">One</h3>\n<p>text</p>\n</div></div>\n",
                "<div class=\"col-sm-6\"><div class=\"tile\"><h3 class=\"tile-title\">Two</h3>\n</div></div>\n",
                "</div>\n"
            )
        );
    }

    #[test]
    fn test_hot_marker() {
        let html = engine().transform(":::tile 6.hot, 6.popular.lead\na\n====\nb\n:::");
        assert_eq!(html.matches("<div class=\"tile tile-hot\">").count(), 2, "{html}");
        assert!(html.contains("<div class=\"col-sm-6 lead\">"), "{html}");
    }

    #[test]
    fn test_leading_image_becomes_thumbnail() {
        let html = engine().transform(":::tile\n![Logo](logo.png)\n\nCaption\n:::");
        assert!(
            html.contains(concat!(
                "<div class=\"tile\">",
                "<img class=\"tile-image big-illustration\" src=\"logo.png\" alt=\"Logo\">",
                "<p>Caption</p>\n</div>"
            )),
            "{html}"
        );
    }

    #[test]
    fn test_classed_heading_is_left_alone() {
        let html = engine().transform(":::tile\nIntro\n<h2 class=\"big\">Hi</h2>\n:::");
        assert!(html.contains("<p>Intro</p>\n<h2 class=\"big\">Hi</h2>"), "{html}");
        assert!(!html.contains("tile-title"), "{html}");
    }

    #[test]
    fn test_first_line_plugins_run_once() {
        let engine = engine()
            .with_repository(FactoryRepository::new().with_plugin("count", || Box::new(Count)));
        let html = engine.transform(":::tile\nFirst /(count)\n====\nSecond /(count)\n:::");
        assert!(html.contains("<p>First #1</p>"), "{html}");
        assert!(html.contains("<p>Second #2</p>"), "{html}");
    }
}
