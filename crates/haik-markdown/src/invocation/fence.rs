//! Code fence tracking.
//!
//! Invocation syntax inside fenced code blocks is never expanded, so every
//! line-oriented pass runs its lines through a [`FenceTracker`] first.

/// Tracks whether the current line is inside a fenced code block.
///
/// A fence opens with three or more backticks or tildes and closes with a
/// run of the same character that is at least as long.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<(char, usize)>,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed the next line. Returns `true` if the line opened or closed a fence.
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();

        match self.open {
            Some((ch, len)) => {
                let Some((found, count)) = fence_run(trimmed) else {
                    return false;
                };
                if found == ch && count >= len && trimmed[count..].trim().is_empty() {
                    self.open = None;
                    return true;
                }
                false
            }
            None => {
                let Some((ch, count)) = fence_run(trimmed) else {
                    return false;
                };
                // Backtick info strings cannot contain backticks
                if ch == '`' && trimmed[count..].contains('`') {
                    return false;
                }
                self.open = Some((ch, count));
                true
            }
        }
    }
}

/// Leading run of three or more fence characters.
fn fence_run(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let count = trimmed.chars().take_while(|&c| c == first).count();
    (count >= 3).then_some((first, count))
}

/// Split text into alternating prose and fenced-code segments.
///
/// Each segment is a byte range of `text`; the flag is `true` for code.
/// Segment boundaries fall on line starts so the ranges cover `text`
/// exactly once.
pub(crate) fn segments(text: &str) -> Vec<(std::ops::Range<usize>, bool)> {
    let mut tracker = FenceTracker::new();
    let mut result: Vec<(std::ops::Range<usize>, bool)> = Vec::new();
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let was_in_fence = tracker.in_fence();
        let is_marker = tracker.update(line);
        let is_code = was_in_fence || is_marker;
        let range = offset..offset + line.len();
        offset = range.end;

        match result.last_mut() {
            Some((last, code)) if *code == is_code => last.end = range.end,
            _ => result.push((range, is_code)),
        }
    }

    result
}
