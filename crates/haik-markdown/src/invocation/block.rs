//! Block invocation scanning.
//!
//! Finds the outermost `:::name` blocks in a document. Blocks nested in a
//! body are left for the outer plugin, which renders its body through the
//! engine again.

use std::ops::Range;

use super::{FenceTracker, SpecialAttributes, Target, name_len};

/// A block invocation located in the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BlockInvocation {
    /// Source lines covered, fences included.
    pub lines: Range<usize>,
    /// Leading spaces of the opening fence.
    pub indent: String,
    pub target: Target,
    /// Body lines, each terminated by `\n`.
    pub body: String,
    /// Text after the last separator line, if the body had one.
    pub section: Option<String>,
    pub attrs: Option<SpecialAttributes>,
}

/// Result of scanning a document for blocks.
#[derive(Debug, Default)]
pub(crate) struct BlockScan {
    pub invocations: Vec<BlockInvocation>,
    pub warnings: Vec<String>,
}

/// An opening fence line.
#[derive(Debug)]
struct Opening<'a> {
    indent: &'a str,
    head: &'a str,
    attrs: Option<SpecialAttributes>,
    single_line: bool,
}

enum Closing<'a> {
    /// Equal colon counts on both sides.
    Matched(&'a str, Option<SpecialAttributes>),
    /// Trailing colons that do not match the opening fence.
    Mismatched,
    /// No trailing fence; a multi-line block starts here.
    Open,
}

/// Scan `lines` for block invocations.
///
/// `separator` is the line dividing a body from its parameter section.
pub(crate) fn scan_blocks(lines: &[&str], separator: &str) -> BlockScan {
    let mut scan = BlockScan::default();
    let mut fence = FenceTracker::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let was_in_fence = fence.in_fence();
        if fence.update(line) || was_in_fence {
            i += 1;
            continue;
        }

        let Some(opening) = parse_opening(line) else {
            i += 1;
            continue;
        };
        let Some(target) = parse_head(opening.head) else {
            i += 1;
            continue;
        };

        if opening.single_line {
            scan.invocations.push(BlockInvocation {
                lines: i..i + 1,
                indent: opening.indent.to_owned(),
                target,
                body: String::new(),
                section: None,
                attrs: opening.attrs,
            });
            i += 1;
            continue;
        }

        let Some((close, separator_line)) = find_close(lines, i + 1, separator) else {
            tracing::debug!(line = i + 1, head = opening.head, "Unclosed block");
            scan.warnings
                .push(format!("unclosed block `{}` at line {}", opening.head, i + 1));
            i += 1;
            continue;
        };

        // Reference blocks take their parameters from the definition
        let split = match target {
            Target::Plugin { .. } => separator_line,
            Target::Reference { .. } => None,
        };
        let body_end = split.unwrap_or(close);

        scan.invocations.push(BlockInvocation {
            lines: i..close + 1,
            indent: opening.indent.to_owned(),
            target,
            body: join_lines(&lines[i + 1..body_end]),
            section: split.map(|s| join_lines(&lines[s + 1..close])),
            attrs: opening.attrs,
        });
        i = close + 1;
    }

    scan
}

/// Check whether `line` is a closing fence: three or more colons only.
fn is_close_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3 && trimmed.bytes().all(|b| b == b':')
}

/// Find the closing fence for a block whose body starts at `from`.
///
/// Nested multi-line blocks are balanced by depth counting. Returns the
/// closing line index and the last separator line seen at depth zero.
fn find_close(lines: &[&str], from: usize, separator: &str) -> Option<(usize, Option<usize>)> {
    let mut depth = 0usize;
    let mut fence = FenceTracker::new();
    let mut separator_line = None;
    let separator = separator.trim();

    for (j, line) in lines.iter().enumerate().skip(from) {
        let was_in_fence = fence.in_fence();
        if fence.update(line) || was_in_fence {
            continue;
        }

        if is_close_line(line) {
            if depth == 0 {
                return Some((j, separator_line));
            }
            depth -= 1;
        } else if parse_opening(line).is_some_and(|o| !o.single_line) {
            depth += 1;
        } else if depth == 0 && line.trim() == separator {
            separator_line = Some(j);
        }
    }

    None
}

fn parse_opening(line: &str) -> Option<Opening<'_>> {
    let indent_len = line.len() - line.trim_start_matches(' ').len();
    if indent_len > 3 {
        return None;
    }

    let (indent, rest) = line.split_at(indent_len);
    let colons = rest.bytes().take_while(|&b| b == b':').count();
    if colons < 3 {
        return None;
    }

    let text = rest[colons..].trim_end();
    if text.trim().is_empty() {
        return None;
    }

    match split_closing(text, colons) {
        Closing::Mismatched => None,
        Closing::Matched(inner, trailing) => {
            let (head, inner_attrs) = split_attrs(inner);
            (!head.is_empty()).then_some(Opening {
                indent,
                head,
                attrs: trailing.or(inner_attrs),
                single_line: true,
            })
        }
        Closing::Open => {
            let (head, attrs) = split_attrs(text);
            (!head.is_empty()).then_some(Opening {
                indent,
                head,
                attrs,
                single_line: false,
            })
        }
    }
}

fn split_closing(text: &str, colons: usize) -> Closing<'_> {
    let (core, attrs) = match SpecialAttributes::strip_suffix(text) {
        Some((before, attrs)) if before.ends_with(':') => (before, Some(attrs)),
        _ => (text, None),
    };

    let closing = core.bytes().rev().take_while(|&b| b == b':').count();
    if closing < 3 {
        Closing::Open
    } else if closing != colons {
        Closing::Mismatched
    } else {
        Closing::Matched(&core[..core.len() - closing], attrs)
    }
}

fn split_attrs(text: &str) -> (&str, Option<SpecialAttributes>) {
    match SpecialAttributes::strip_suffix(text) {
        Some((head, attrs)) => (head.trim(), Some(attrs)),
        None => (text.trim(), None),
    }
}

/// Parse `name params` or `[refname]`.
fn parse_head(head: &str) -> Option<Target> {
    if let Some(inner) = head.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        let name = inner.trim();
        if name.is_empty() || name.contains(['[', ']']) {
            return None;
        }
        return Some(Target::Reference {
            name: name.to_owned(),
        });
    }

    let len = name_len(head);
    let rest = &head[len..];
    if len == 0 || !(rest.is_empty() || rest.starts_with(char::is_whitespace)) {
        return None;
    }

    Some(Target::Plugin {
        id: head[..len].to_ascii_lowercase(),
        params: rest.trim().to_owned(),
    })
}

fn join_lines(lines: &[&str]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}
