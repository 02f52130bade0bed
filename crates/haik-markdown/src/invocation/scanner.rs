//! Inline invocation scanning.
//!
//! Builds a tree of inline calls. A call with a `[body]` may contain further
//! calls; those become its children. The tree lives in a flat arena where
//! every child has a higher index than its parent.

use std::ops::Range;

use super::{SpecialAttributes, Target, name_len};
use crate::reference::ReferenceTable;

/// One inline call located in the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct InlineCall {
    /// Full span, trailing attribute fragment included.
    pub span: Range<usize>,
    /// End of the call without the attribute fragment.
    pub call_end: usize,
    pub target: Target,
    pub body: Option<Range<usize>>,
    pub attrs: Option<SpecialAttributes>,
}

/// Arena of inline calls.
#[derive(Debug, Default)]
pub(crate) struct SpanTree {
    pub nodes: Vec<InlineCall>,
    /// Parent index per node.
    pub parents: Vec<Option<usize>>,
    /// Child indices per node, in source order.
    pub children: Vec<Vec<usize>>,
    /// Top-level node indices, in source order.
    pub roots: Vec<usize>,
}

impl SpanTree {
    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node indices with every child before its parent and siblings in
    /// source order.
    pub(crate) fn resolution_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(usize, bool)> = self.roots.iter().rev().map(|&r| (r, false)).collect();

        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                order.push(node);
                continue;
            }
            stack.push((node, true));
            stack.extend(self.children[node].iter().rev().map(|&c| (c, false)));
        }

        order
    }

    fn push(&mut self, call: InlineCall, parent: Option<usize>) -> usize {
        let index = self.nodes.len();
        self.nodes.push(call);
        self.parents.push(parent);
        self.children.push(Vec::new());
        match parent {
            Some(parent) => self.children[parent].push(index),
            None => self.roots.push(index),
        }
        index
    }
}

/// Scan the given prose ranges of `src` for inline calls.
///
/// `references` decides which `[name]` tokens are reference usages.
pub(crate) fn scan_inline(
    src: &str,
    ranges: &[Range<usize>],
    references: &ReferenceTable,
) -> SpanTree {
    let mut tree = SpanTree::default();
    let mut pending: Vec<(Option<usize>, Range<usize>)> =
        ranges.iter().rev().map(|r| (None, r.clone())).collect();

    while let Some((parent, range)) = pending.pop() {
        let bytes = src.as_bytes();
        let mut i = range.start;
        let mut bodies = Vec::new();

        while i < range.end {
            match bytes[i] {
                b'\\' => i += escape_len(bytes, i, range.end),
                b'`' => i = skip_code_span(bytes, i, range.end),
                b'/' => match parse_call(src, i, range.end, references) {
                    Some(call) => {
                        i = call.span.end;
                        let body = call.body.clone();
                        let index = tree.push(call, parent);
                        if let Some(body) = body {
                            bodies.push((Some(index), body));
                        }
                    }
                    None => i += 1,
                },
                _ => i += 1,
            }
        }

        // Keep bodies in source order on the stack
        pending.extend(bodies.into_iter().rev());
    }

    tree.roots.sort_by_key(|&index| tree.nodes[index].span.start);
    tree
}

/// Bytes taken by a backslash escape starting at `i`.
fn escape_len(bytes: &[u8], i: usize, end: usize) -> usize {
    if i + 1 < end && bytes[i + 1].is_ascii_punctuation() {
        2
    } else {
        1
    }
}

/// Skip an inline code span starting at `i`; returns the index after it.
///
/// A backtick run without a matching closing run is skipped on its own.
fn skip_code_span(bytes: &[u8], i: usize, end: usize) -> usize {
    let run = bytes[i..end].iter().take_while(|&&b| b == b'`').count();
    let mut j = i + run;

    while j < end {
        if bytes[j] == b'`' {
            let close = bytes[j..end].iter().take_while(|&&b| b == b'`').count();
            if close == run {
                return j + close;
            }
            j += close;
        } else {
            j += 1;
        }
    }

    i + run
}

fn parse_call(
    src: &str,
    start: usize,
    end: usize,
    references: &ReferenceTable,
) -> Option<InlineCall> {
    let rest = &src[start..end];

    let (target, body, call_end) = if rest.starts_with("/(") {
        let (target, close) = parse_paren(src, start + 1, end)?;
        (target, None, close + 1)
    } else if rest.starts_with("/[") {
        let body_close = matching_bracket(src.as_bytes(), start + 1, end)?;
        let body = start + 2..body_close;
        let after = body_close + 1;
        let paren = skip_blanks(src.as_bytes(), after, end);

        if src[paren..end].starts_with('(') {
            let (target, close) = parse_paren(src, paren, end)?;
            (target, Some(body), close + 1)
        } else if let Some((name, close)) = reference_after(src, after, end)
            .filter(|(name, _)| references.contains(name))
        {
            let target = Target::Reference {
                name: name.to_owned(),
            };
            (target, Some(body), close + 1)
        } else if references.contains(&src[body.clone()]) {
            let target = Target::Reference {
                name: src[body].to_owned(),
            };
            (target, None, after)
        } else {
            return None;
        }
    } else {
        return None;
    };

    let (attrs, span_end) = match SpecialAttributes::parse_at(src, call_end) {
        Some((attrs, attrs_end)) if attrs_end <= end => (Some(attrs), attrs_end),
        _ => (None, call_end),
    };

    Some(InlineCall {
        span: start..span_end,
        call_end,
        target,
        body,
        attrs,
    })
}

/// Parse `(name params)` with the opening paren at `open`.
///
/// Returns the target and the index of the closing paren.
fn parse_paren(src: &str, open: usize, end: usize) -> Option<(Target, usize)> {
    let bytes = src.as_bytes();
    let name_start = open + 1;
    let len = name_len(&src[name_start..end]);
    if len == 0 {
        return None;
    }

    let id = src[name_start..name_start + len].to_ascii_lowercase();
    let params_start = name_start + len;

    match bytes.get(params_start) {
        Some(b')') if params_start < end => {
            return Some((
                Target::Plugin {
                    id,
                    params: String::new(),
                },
                params_start,
            ));
        }
        Some(b) if params_start < end && b.is_ascii_whitespace() => {}
        _ => return None,
    }

    let close = find_close_paren(bytes, params_start, end, true)
        .or_else(|| find_close_paren(bytes, params_start, end, false))?;

    Some((
        Target::Plugin {
            id,
            params: src[params_start..close].trim().to_owned(),
        },
        close,
    ))
}

/// Index of the `)` closing a parameter list, balancing nested parens.
///
/// With `quote_aware`, parens between double quotes are ignored.
fn find_close_paren(bytes: &[u8], from: usize, end: usize, quote_aware: bool) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_quotes = false;

    for (k, &b) in bytes.iter().enumerate().take(end).skip(from) {
        match b {
            b'"' if quote_aware => in_quotes = !in_quotes,
            b'(' if !in_quotes => depth += 1,
            b')' if !in_quotes => {
                if depth == 0 {
                    return Some(k);
                }
                depth -= 1;
            }
            _ => {}
        }
    }

    None
}

/// Index of the `]` matching the `[` at `open`.
fn matching_bracket(bytes: &[u8], open: usize, end: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut k = open + 1;

    while k < end {
        match bytes[k] {
            b'\\' => {
                k += escape_len(bytes, k, end);
                continue;
            }
            b'`' => {
                k = skip_code_span(bytes, k, end);
                continue;
            }
            b'[' => depth += 1,
            b']' => {
                if depth == 0 {
                    return Some(k);
                }
                depth -= 1;
            }
            _ => {}
        }
        k += 1;
    }

    None
}

fn skip_blanks(bytes: &[u8], from: usize, end: usize) -> usize {
    let mut k = from;
    while k < end && matches!(bytes[k], b' ' | b'\t') {
        k += 1;
    }
    k
}

/// A `[name]` after optional blanks and at most one line break.
///
/// Returns the name and the index of its closing bracket.
fn reference_after(src: &str, from: usize, end: usize) -> Option<(&str, usize)> {
    let bytes = src.as_bytes();
    let mut k = skip_blanks(bytes, from, end);
    if k < end && bytes[k] == b'\n' {
        k = skip_blanks(bytes, k + 1, end);
    }
    if k >= end || bytes[k] != b'[' {
        return None;
    }

    let close = k + 1 + src[k + 1..end].find([']', '[', '\n'])?;
    if bytes[close] != b']' {
        return None;
    }

    let name = &src[k + 1..close];
    (!name.trim().is_empty()).then_some((name, close))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Params;
    use crate::reference::ReferenceDefinition;
    use pretty_assertions::assert_eq;

    fn refs(names: &[&str]) -> ReferenceTable {
        let mut table = ReferenceTable::default();
        for name in names {
            table.insert(
                name,
                ReferenceDefinition {
                    plugin_id: "plugin".to_owned(),
                    params: Params::default(),
                },
            );
        }
        table
    }

    fn scan_with(src: &str, names: &[&str]) -> SpanTree {
        scan_inline(src, &[0..src.len()], &refs(names))
    }

    fn scan(src: &str) -> SpanTree {
        scan_with(src, &[])
    }

    fn plugin(id: &str, params: &str) -> Target {
        Target::Plugin {
            id: id.to_owned(),
            params: params.to_owned(),
        }
    }

    fn reference(name: &str) -> Target {
        Target::Reference {
            name: name.to_owned(),
        }
    }

    fn only(src: &str) -> InlineCall {
        let tree = scan(src);
        assert_eq!(tree.nodes.len(), 1, "expected one call in {src:?}");
        tree.nodes[0].clone()
    }

    #[test]
    fn test_plain_text() {
        assert!(scan("no calls here / at all (really)").is_empty());
    }

    #[test]
    fn test_call_without_params() {
        let call = only("a /(plugin) b");
        assert_eq!(call.target, plugin("plugin", ""));
        assert_eq!(call.span, 2..11);
        assert_eq!(call.body, None);
    }

    #[test]
    fn test_call_with_params() {
        let call = only("/(plugin p1,p2)");
        assert_eq!(call.target, plugin("plugin", "p1,p2"));
    }

    #[test]
    fn test_quoted_paren_in_params() {
        let call = only(r#"/(plugin "a)b", c)"#);
        assert_eq!(call.target, plugin("plugin", r#""a)b", c"#));
    }

    #[test]
    fn test_unbalanced_quote_falls_back() {
        let call = only(r#"/(plugin a"b) tail"#);
        assert_eq!(call.target, plugin("plugin", r#"a"b"#));
    }

    #[test]
    fn test_call_with_body() {
        let src = "/[body](plugin p1,p2)";
        let call = only(src);
        assert_eq!(call.target, plugin("plugin", "p1,p2"));
        assert_eq!(&src[call.body.unwrap()], "body");
        assert_eq!(call.span, 0..src.len());
    }

    #[test]
    fn test_call_with_body_and_space() {
        let call = only("/[body] (plugin)");
        assert_eq!(call.target, plugin("plugin", ""));
    }

    #[test]
    fn test_link_is_not_a_call() {
        assert!(scan("/[text](https://example.com)").is_empty());
        assert!(scan("/[text]").is_empty());
    }

    #[test]
    fn test_name_is_lowercased() {
        assert_eq!(only("/(Icon)").target, plugin("icon", ""));
    }

    #[test]
    fn test_attrs_directly_after() {
        let src = "/(plugin){#id}";
        let call = only(src);
        assert_eq!(call.attrs.unwrap().id(), Some("id"));
        assert_eq!(call.call_end, 9);
        assert_eq!(call.span.end, src.len());
    }

    #[test]
    fn test_attrs_after_space() {
        let call = only("/(plugin) {.class1 .class2}");
        assert_eq!(call.attrs.unwrap().class_attribute(), "class1 class2");
    }

    #[test]
    fn test_invalid_attrs_are_not_consumed() {
        let call = only("/(plugin) {not attrs}");
        assert_eq!(call.attrs, None);
        assert_eq!(call.span.end, 9);
    }

    #[test]
    fn test_two_calls_in_order() {
        let tree = scan("/(plugin param)foo/(plugin param)");
        assert_eq!(tree.roots, vec![0, 1]);
        assert_eq!(tree.nodes[0].span, 0..15);
        assert_eq!(tree.nodes[1].span, 18..33);
    }

    #[test]
    fn test_nested_call_is_a_child() {
        let src = "/[/(icon)](inline)";
        let tree = scan(src);
        assert_eq!(tree.nodes.len(), 2);
        assert_eq!(tree.roots, vec![0]);
        assert_eq!(tree.nodes[0].target, plugin("inline", ""));
        assert_eq!(tree.children[0], vec![1]);
        assert_eq!(tree.nodes[1].target, plugin("icon", ""));
        assert_eq!(tree.nodes[1].span, 2..9);
    }

    #[test]
    fn test_deep_nesting_indices_grow_inward() {
        let tree = scan("/[a /[b /(c)](y)](x)");
        assert_eq!(tree.nodes.len(), 3);
        assert_eq!(tree.children[0], vec![1]);
        assert_eq!(tree.children[1], vec![2]);
    }

    #[test]
    fn test_resolution_order() {
        let tree = scan("/[/(a) /(b)](outer) /(c)");
        let targets: Vec<&Target> = tree
            .resolution_order()
            .into_iter()
            .map(|i| &tree.nodes[i].target)
            .collect();
        assert_eq!(
            targets,
            vec![&plugin("a", ""), &plugin("b", ""), &plugin("outer", ""), &plugin("c", "")]
        );
        assert_eq!(tree.parents, vec![None, None, Some(0), Some(0)]);
    }

    #[test]
    fn test_sibling_children_in_source_order() {
        let tree = scan("/[/(a) and /(b)](outer)");
        let ids: Vec<&Target> = tree.children[0].iter().map(|&i| &tree.nodes[i].target).collect();
        assert_eq!(ids, vec![&plugin("a", ""), &plugin("b", "")]);
    }

    #[test]
    fn test_escaped_call_is_skipped() {
        assert!(scan(r"\/(plugin)").is_empty());
    }

    #[test]
    fn test_code_span_is_skipped() {
        assert!(scan("`/(plugin)`").is_empty());
        assert_eq!(scan("`` ` `` /(plugin)").nodes.len(), 1);
    }

    #[test]
    fn test_reference_forms() {
        for src in ["/[text][refname]", "/[text] [refname]", "/[text]\n[refname]"] {
            let tree = scan_with(src, &["refname"]);
            assert_eq!(tree.nodes.len(), 1, "{src:?}");
            let call = &tree.nodes[0];
            assert_eq!(call.target, reference("refname"));
            assert_eq!(&src[call.body.clone().unwrap()], "text");
            assert_eq!(call.span.end, src.len());
        }
    }

    #[test]
    fn test_reference_across_two_line_breaks_is_not_joined() {
        let tree = scan_with("/[text]\n\n[refname]", &["refname"]);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_bare_reference() {
        let call = scan_with("/[refname]", &["refname"]).nodes[0].clone();
        assert_eq!(call.target, reference("refname"));
        assert_eq!(call.body, None);
    }

    #[test]
    fn test_reference_is_case_insensitive() {
        let tree = scan_with("/[text][REF-ID]", &["ref-id"]);
        assert_eq!(tree.nodes[0].target, reference("REF-ID"));
    }

    #[test]
    fn test_unknown_reference_is_not_a_call() {
        assert!(scan_with("/[text][other]", &["refname"]).is_empty());
    }

    #[test]
    fn test_ranges_limit_scanning() {
        let src = "/(a)\n```\n/(b)\n```\n/(c)";
        let tree = scan_inline(src, &[0..5, 18..src.len()], &refs(&[]));
        let targets: Vec<&Target> = tree.roots.iter().map(|&i| &tree.nodes[i].target).collect();
        assert_eq!(targets, vec![&plugin("a", ""), &plugin("c", "")]);
    }
}
