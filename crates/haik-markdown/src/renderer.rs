//! Base markdown transformer.
//!
//! The plugin engine hands every piece of ordinary document text to a
//! [`BaseTransformer`]. [`MarkdownRenderer`] is the default implementation,
//! producing HTML from `pulldown-cmark` events.

use std::fmt::Write;

use pulldown_cmark::{Alignment, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::util::{escape_html, heading_level_to_num};

/// Converts markdown text to markup.
///
/// Implementations must be usable from plugin handlers while a document is
/// being rendered, so `transform` takes `&self`.
pub trait BaseTransformer: Send + Sync {
    /// Transform markdown text to markup.
    fn transform(&self, markdown: &str) -> String;
}

/// HTML renderer backed by pulldown-cmark.
///
/// # Example
///
/// ```
/// use haik_markdown::{BaseTransformer, MarkdownRenderer};
///
/// let renderer = MarkdownRenderer::new().with_hard_wrap(true);
/// let html = renderer.transform("one\ntwo");
/// assert_eq!(html, "<p>one<br>\ntwo</p>\n");
/// ```
#[derive(Clone, Debug)]
pub struct MarkdownRenderer {
    hard_wrap: bool,
    code_class_prefix: String,
    gfm: bool,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Create a renderer with GFM enabled, hard wrap disabled and no code class prefix.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hard_wrap: false,
            code_class_prefix: String::new(),
            gfm: true,
        }
    }

    /// Render single newlines inside paragraphs as `<br>` line breaks.
    #[must_use]
    pub fn with_hard_wrap(mut self, enabled: bool) -> Self {
        self.hard_wrap = enabled;
        self
    }

    /// Prefix prepended to the language name in fenced code block classes.
    #[must_use]
    pub fn with_code_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.code_class_prefix = prefix.into();
        self
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Whether soft breaks are rendered as `<br>`.
    pub fn hard_wrap(&self) -> bool {
        self.hard_wrap
    }

    /// Prefix used for fenced code block classes.
    pub fn code_class_prefix(&self) -> &str {
        &self.code_class_prefix
    }

    /// Get parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }
}

impl BaseTransformer for MarkdownRenderer {
    fn transform(&self, markdown: &str) -> String {
        let mut writer = HtmlWriter::new(self);
        for event in Parser::new_ext(markdown, self.parser_options()) {
            writer.process_event(event);
        }
        writer.output
    }
}

/// Image being collected; alt text arrives as events before the end tag.
struct PendingImage {
    src: String,
    title: String,
    alt: String,
}

/// Per-call event writer.
struct HtmlWriter<'r> {
    options: &'r MarkdownRenderer,
    output: String,
    table_alignments: Vec<Alignment>,
    table_cell: usize,
    in_table_head: bool,
    image: Option<PendingImage>,
}

impl<'r> HtmlWriter<'r> {
    fn new(options: &'r MarkdownRenderer) -> Self {
        Self {
            options,
            output: String::with_capacity(1024),
            table_alignments: Vec::new(),
            table_cell: 0,
            in_table_head: false,
            image: None,
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        if self.image.is_some() {
            self.image_event(event);
            return;
        }

        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.output.push_str(&escape_html(&text)),
            Event::Code(code) => {
                write!(self.output, "<code>{}</code>", escape_html(&code)).unwrap();
            }
            Event::Html(html) | Event::InlineHtml(html) => self.output.push_str(&html),
            Event::SoftBreak => {
                if self.options.hard_wrap {
                    self.output.push_str("<br>\n");
                } else {
                    self.output.push('\n');
                }
            }
            Event::HardBreak => self.output.push_str("<br>\n"),
            Event::Rule => self.output.push_str("<hr>\n"),
            Event::TaskListMarker(checked) => {
                if checked {
                    self.output
                        .push_str(r#"<input type="checkbox" checked disabled> "#);
                } else {
                    self.output.push_str(r#"<input type="checkbox" disabled> "#);
                }
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not enabled in parser options
            }
        }
    }

    fn image_event(&mut self, event: Event<'_>) {
        let Some(image) = self.image.as_mut() else {
            return;
        };
        match event {
            Event::End(TagEnd::Image) => {
                if let Some(image) = self.image.take() {
                    let title_attr = if image.title.is_empty() {
                        String::new()
                    } else {
                        format!(r#" title="{}""#, escape_html(&image.title))
                    };
                    write!(
                        self.output,
                        r#"<img src="{}" alt="{}"{title_attr}>"#,
                        escape_html(&image.src),
                        escape_html(&image.alt)
                    )
                    .unwrap();
                }
            }
            Event::Text(text) | Event::Code(text) => image.alt.push_str(&text),
            Event::SoftBreak | Event::HardBreak => image.alt.push(' '),
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                write!(self.output, "<h{}>", heading_level_to_num(level)).unwrap();
            }
            Tag::BlockQuote(_) => self.output.push_str("<blockquote>\n"),
            Tag::CodeBlock(kind) => {
                let lang = match &kind {
                    CodeBlockKind::Fenced(info) => info.split_whitespace().next().unwrap_or(""),
                    CodeBlockKind::Indented => "",
                };
                if lang.is_empty() {
                    self.output.push_str("<pre><code>");
                } else {
                    write!(
                        self.output,
                        r#"<pre><code class="{}{}">"#,
                        escape_html(&self.options.code_class_prefix),
                        escape_html(lang)
                    )
                    .unwrap();
                }
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>\n"),
                Some(n) => writeln!(self.output, r#"<ol start="{n}">"#).unwrap(),
                None => self.output.push_str("<ul>\n"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.output.push_str("<dl>\n"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table_alignments = alignments;
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.table_cell = 0;
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table_cell = 0;
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let tag = if self.in_table_head { "th" } else { "td" };
                let align = match self.table_alignments.get(self.table_cell) {
                    Some(Alignment::Left) => r#" style="text-align: left""#,
                    Some(Alignment::Center) => r#" style="text-align: center""#,
                    Some(Alignment::Right) => r#" style="text-align: right""#,
                    Some(Alignment::None) | None => "",
                };
                write!(self.output, "<{tag}{align}>").unwrap();
            }
            Tag::Emphasis => self.output.push_str("<em>"),
            Tag::Strong => self.output.push_str("<strong>"),
            Tag::Strikethrough => self.output.push_str("<del>"),
            Tag::Superscript => self.output.push_str("<sup>"),
            Tag::Subscript => self.output.push_str("<sub>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                write!(self.output, r#"<a href="{}""#, escape_html(&dest_url)).unwrap();
                if !title.is_empty() {
                    write!(self.output, r#" title="{}""#, escape_html(&title)).unwrap();
                }
                self.output.push('>');
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.image = Some(PendingImage {
                    src: dest_url.to_string(),
                    title: title.to_string(),
                    alt: String::new(),
                });
            }
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>\n"),
            TagEnd::Heading(level) => {
                writeln!(self.output, "</h{}>", heading_level_to_num(level)).unwrap();
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>\n"),
            TagEnd::CodeBlock => self.output.push_str("</code></pre>\n"),
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>\n" } else { "</ul>\n" });
            }
            TagEnd::Item => self.output.push_str("</li>\n"),
            TagEnd::FootnoteDefinition
            | TagEnd::HtmlBlock
            | TagEnd::MetadataBlock(_)
            | TagEnd::Image => {}
            TagEnd::DefinitionList => self.output.push_str("</dl>\n"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>\n"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>\n"),
            TagEnd::Table => self.output.push_str("</tbody></table>\n"),
            TagEnd::TableHead => {
                self.in_table_head = false;
                self.output.push_str("</tr></thead><tbody>\n");
            }
            TagEnd::TableRow => self.output.push_str("</tr>\n"),
            TagEnd::TableCell => {
                self.output
                    .push_str(if self.in_table_head { "</th>" } else { "</td>" });
                self.table_cell += 1;
            }
            TagEnd::Emphasis => self.output.push_str("</em>"),
            TagEnd::Strong => self.output.push_str("</strong>"),
            TagEnd::Strikethrough => self.output.push_str("</del>"),
            TagEnd::Superscript => self.output.push_str("</sup>"),
            TagEnd::Subscript => self.output.push_str("</sub>"),
            TagEnd::Link => self.output.push_str("</a>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(markdown: &str) -> String {
        MarkdownRenderer::new().transform(markdown)
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn test_paragraph_with_inline_formatting() {
        assert_eq!(
            render("Hello **bold** and *em*"),
            "<p>Hello <strong>bold</strong> and <em>em</em></p>\n"
        );
    }

    #[test]
    fn test_soft_break_without_hard_wrap() {
        assert_eq!(render("1\n2\n3"), "<p>1\n2\n3</p>\n");
    }

    #[test]
    fn test_hard_wrap_turns_newlines_into_breaks() {
        let html = MarkdownRenderer::new().with_hard_wrap(true).transform("1\n2\n3");
        assert_eq!(html, "<p>1<br>\n2<br>\n3</p>\n");
        assert_eq!(html.matches("<br>").count(), 2);
    }

    #[test]
    fn test_heading() {
        assert_eq!(render("## Title"), "<h2>Title</h2>\n");
    }

    #[test]
    fn test_code_block_without_prefix() {
        assert_eq!(
            render("```rust\nfn main() {}\n```"),
            "<pre><code class=\"rust\">fn main() {}\n</code></pre>\n"
        );
    }

    #[test]
    fn test_code_block_with_prefix() {
        let html = MarkdownRenderer::new()
            .with_code_class_prefix("language-")
            .transform("```rust\nlet x = 1;\n```");
        assert_eq!(
            html,
            "<pre><code class=\"language-rust\">let x = 1;\n</code></pre>\n"
        );
    }

    #[test]
    fn test_code_block_escapes_content() {
        assert_eq!(
            render("```\n<div>\n```"),
            "<pre><code>&lt;div&gt;\n</code></pre>\n"
        );
    }

    #[test]
    fn test_inline_html_passthrough() {
        assert_eq!(
            render("<span>inline plugin</span>"),
            "<p><span>inline plugin</span></p>\n"
        );
    }

    #[test]
    fn test_html_block_passthrough() {
        assert_eq!(render("<div>block</div>"), "<div>block</div>\n");
    }

    #[test]
    fn test_lists() {
        assert_eq!(render("- a\n- b"), "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n");
        assert_eq!(
            render("3. a\n4. b"),
            "<ol start=\"3\">\n<li>a</li>\n<li>b</li>\n</ol>\n"
        );
    }

    #[test]
    fn test_link_and_image() {
        assert_eq!(
            render("[site](https://example.com \"Home\")"),
            "<p><a href=\"https://example.com\" title=\"Home\">site</a></p>\n"
        );
        assert_eq!(
            render("![alt *text*](img.png)"),
            "<p><img src=\"img.png\" alt=\"alt text\"></p>\n"
        );
    }

    #[test]
    fn test_table_with_alignment() {
        let html = render("| a | b |\n|:--|--:|\n| 1 | 2 |");
        assert_eq!(
            html,
            "<table><thead><tr><th style=\"text-align: left\">a</th><th style=\"text-align: right\">b</th></tr></thead><tbody>\n<tr><td style=\"text-align: left\">1</td><td style=\"text-align: right\">2</td></tr>\n</tbody></table>\n"
        );
    }

    #[test]
    fn test_gfm_disabled_keeps_tilde_text() {
        let html = MarkdownRenderer::new().with_gfm(false).transform("~~x~~");
        assert_eq!(html, "<p>~~x~~</p>\n");
    }

    #[test]
    fn test_strikethrough() {
        assert_eq!(render("~~gone~~"), "<p><del>gone</del></p>\n");
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(render("a & b"), "<p>a &amp; b</p>\n");
    }
}
