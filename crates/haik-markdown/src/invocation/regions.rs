//! Where inline calls may be expanded.
//!
//! Inline calls are span-level syntax. Code blocks of either kind keep them
//! literal, and so does image alt text, which is rendered into an attribute.

use std::ops::Range;

use pulldown_cmark::{Event, Options, Parser, Tag};

use super::fence::segments;

/// Prose ranges and image extents of a document.
#[derive(Debug, Default)]
pub(crate) struct InlineRegions {
    prose: Vec<Range<usize>>,
    images: Vec<Range<usize>>,
}

impl InlineRegions {
    pub(crate) fn scan(text: &str) -> Self {
        let mut code: Vec<Range<usize>> = segments(text)
            .into_iter()
            .filter_map(|(range, is_code)| is_code.then_some(range))
            .collect();
        let mut images = Vec::new();

        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_GFM;
        for (event, range) in Parser::new_ext(text, options).into_offset_iter() {
            match event {
                Event::Start(Tag::CodeBlock(_)) => code.push(range),
                Event::Start(Tag::Image { .. }) => images.push(range),
                _ => {}
            }
        }

        Self {
            prose: complement(code, text.len()),
            images,
        }
    }

    pub(crate) fn prose(&self) -> &[Range<usize>] {
        &self.prose
    }

    /// Whether `span` lies inside an image element.
    pub(crate) fn in_image(&self, span: &Range<usize>) -> bool {
        self.images
            .iter()
            .any(|image| image.start <= span.start && span.end <= image.end)
    }
}

/// Gaps between possibly overlapping `holes` within `0..len`.
fn complement(mut holes: Vec<Range<usize>>, len: usize) -> Vec<Range<usize>> {
    holes.sort_by_key(|hole| hole.start);

    let mut gaps = Vec::new();
    let mut cursor = 0;
    for hole in holes {
        if hole.start > cursor {
            gaps.push(cursor..hole.start);
        }
        cursor = cursor.max(hole.end);
    }
    if cursor < len {
        gaps.push(cursor..len);
    }
    gaps
}
