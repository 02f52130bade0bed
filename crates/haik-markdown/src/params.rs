//! Plugin parameter parsing.
//!
//! Parameters reach a plugin either as an ordered list or as an ordered
//! `key: value` map. Three source forms are accepted:
//!
//! - a single comma-separated line: `foo, "bar, baz", qux`
//! - hyphen-bulleted lines: `- foo` / `- bar`
//! - `key: value` lines (or comma-separated `key: value` items on one line)
//!
//! The map form is chosen only when every item is a `key: value` pair.

use std::fmt;

/// Parameters passed to a plugin.
///
/// # Example
///
/// ```
/// use haik_markdown::Params;
///
/// let params = Params::parse(r#"foo, "bar, baz""#);
/// assert_eq!(params, Params::Positional(vec!["foo".into(), "bar, baz".into()]));
///
/// let params = Params::parse("type: info, close: yes");
/// assert_eq!(params.keyed().and_then(|k| k.get("type")), Some("info"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Params {
    /// Ordered list of values.
    Positional(Vec<String>),
    /// Ordered `key: value` pairs.
    Keyed(KeyedParams),
}

impl Default for Params {
    fn default() -> Self {
        Self::Positional(Vec::new())
    }
}

impl Params {
    /// Parse a raw parameter string.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let lines: Vec<&str> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        match lines.as_slice() {
            [] => Self::default(),
            [line] if bullet_item(line).is_none() => {
                let items = split_csv(line);
                keyed_from(items.iter().map(String::as_str))
                    .map_or(Self::Positional(items), Self::Keyed)
            }
            _ => keyed_from(lines.iter().copied()).map_or_else(
                || {
                    let mut values = Vec::new();
                    for line in &lines {
                        match bullet_item(line) {
                            Some(item) => values.push(unquote(item)),
                            None => values.extend(split_csv(line)),
                        }
                    }
                    Self::Positional(values)
                },
                Self::Keyed,
            ),
        }
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        match self {
            Self::Positional(values) => values.len(),
            Self::Keyed(keyed) => keyed.len(),
        }
    }

    /// Check if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The list form, if this is one.
    pub fn positional(&self) -> Option<&[String]> {
        match self {
            Self::Positional(values) => Some(values),
            Self::Keyed(_) => None,
        }
    }

    /// The map form, if this is one.
    pub fn keyed(&self) -> Option<&KeyedParams> {
        match self {
            Self::Positional(_) => None,
            Self::Keyed(keyed) => Some(keyed),
        }
    }

    /// Every value in order, ignoring keys.
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Positional(values) => values.iter().map(String::as_str).collect(),
            Self::Keyed(keyed) => keyed.values().collect(),
        }
    }
}

/// Ordered `key: value` parameters.
///
/// Keys keep the position of their first occurrence; a repeated key
/// overwrites the earlier value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyedParams {
    entries: Vec<(String, String)>,
}

impl KeyedParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeyedParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut keyed = Self::new();
        for (key, value) in iter {
            keyed.insert(key, value);
        }
        keyed
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positional(values) => write!(f, "[{}]", values.join(", ")),
            Self::Keyed(keyed) => {
                f.write_str("{")?;
                for (i, (key, value)) in keyed.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Build a map if every item is a `key: value` pair.
fn keyed_from<'a>(items: impl Iterator<Item = &'a str>) -> Option<KeyedParams> {
    let mut keyed = KeyedParams::new();
    let mut any = false;
    for item in items {
        let (key, value) = split_key_value(item)?;
        keyed.insert(key, unquote(value));
        any = true;
    }
    any.then_some(keyed)
}

/// Split `key: value`. The key is `[A-Za-z0-9_-]+` and the colon must be
/// followed by whitespace or the end of the item.
fn split_key_value(item: &str) -> Option<(&str, &str)> {
    let colon = item.find(':')?;
    let key = &item[..colon];
    if !crate::util::is_valid_plugin_name(key) {
        return None;
    }
    let rest = &item[colon + 1..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((key, rest.trim()))
}

/// Content of a `- item` line.
fn bullet_item(line: &str) -> Option<&str> {
    if line == "-" {
        return Some("");
    }
    line.strip_prefix("- ")
        .or_else(|| line.strip_prefix("-\t"))
        .map(str::trim)
}

/// Remove surrounding double quotes from a whole value.
fn unquote(value: &str) -> String {
    let value = value.trim();
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        let fields = split_csv(value);
        if let [single] = fields.as_slice() {
            return single.clone();
        }
    }
    value.to_owned()
}

/// Split a comma-separated line.
///
/// A field that starts with a double quote runs until the next lone quote,
/// with `""` standing for a literal quote, and may contain commas. Quotes in
/// an unquoted field are kept as written. Fields are trimmed.
fn split_csv(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    if line.trim().is_empty() {
        return fields;
    }

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let mut field = String::new();
        if chars.next_if_eq(&'"').is_some() {
            while let Some(c) = chars.next() {
                if c == '"' {
                    if chars.next_if_eq(&'"').is_some() {
                        field.push('"');
                    } else {
                        break;
                    }
                } else {
                    field.push(c);
                }
            }
            // Text after the closing quote is kept literally
            while let Some(c) = chars.next_if(|&c| c != ',') {
                field.push(c);
            }
            fields.push(field.trim_end().to_owned());
        } else {
            while let Some(c) = chars.next_if(|&c| c != ',') {
                field.push(c);
            }
            fields.push(field.trim().to_owned());
        }

        if chars.next().is_none() {
            break;
        }
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn positional(values: &[&str]) -> Params {
        Params::Positional(values.iter().map(|v| (*v).to_owned()).collect())
    }

    #[test]
    fn test_empty() {
        assert_eq!(Params::parse(""), positional(&[]));
        assert_eq!(Params::parse("  \n \n"), positional(&[]));
        assert!(Params::parse("").is_empty());
    }

    #[test]
    fn test_single_line_csv() {
        assert_eq!(Params::parse("foo, bar, buzz"), positional(&["foo", "bar", "buzz"]));
    }

    #[test]
    fn test_quoted_field_with_escaped_quotes() {
        assert_eq!(
            Params::parse(r#""param""1""","param2""#),
            positional(&[r#"param"1""#, "param2"])
        );
    }

    #[test]
    fn test_unquoted_field_keeps_quotes() {
        assert_eq!(
            Params::parse(r#"param"1",param2"#),
            positional(&[r#"param"1""#, "param2"])
        );
    }

    #[test]
    fn test_quoted_field_protects_commas() {
        assert_eq!(
            Params::parse(r#"a, "b, c", d"#),
            positional(&["a", "b, c", "d"])
        );
    }

    #[test]
    fn test_empty_fields_are_kept() {
        assert_eq!(Params::parse("a,,b"), positional(&["a", "", "b"]));
    }

    #[test]
    fn test_single_line_keyed() {
        let params = Params::parse("param1: foo, param2: bar");
        let expected: KeyedParams = [("param1", "foo"), ("param2", "bar")].into_iter().collect();
        assert_eq!(params, Params::Keyed(expected));
    }

    #[test]
    fn test_mixed_items_are_positional() {
        assert_eq!(
            Params::parse("param1: foo, bar"),
            positional(&["param1: foo", "bar"])
        );
    }

    #[test]
    fn test_colon_without_space_is_not_a_key() {
        assert_eq!(
            Params::parse("http://example.com"),
            positional(&["http://example.com"])
        );
    }

    #[test]
    fn test_bullet_lines() {
        assert_eq!(
            Params::parse("\n- foo\n- bar\n- buzz\n\n"),
            positional(&["foo", "bar", "buzz"])
        );
    }

    #[test]
    fn test_bullet_item_keeps_commas() {
        assert_eq!(
            Params::parse("- a, b\n- \"c\""),
            positional(&["a, b", "c"])
        );
    }

    #[test]
    fn test_keyed_lines_in_order() {
        let params = Params::parse("type: info\nclose: yes\nclass: \"wide\"");
        let keyed = params.keyed().unwrap();
        let pairs: Vec<(&str, &str)> = keyed.iter().collect();
        assert_eq!(pairs, vec![("type", "info"), ("close", "yes"), ("class", "wide")]);
    }

    #[test]
    fn test_duplicate_key_last_write_wins() {
        let params = Params::parse("a: 1\nb: 2\na: 3");
        let keyed = params.keyed().unwrap();
        let pairs: Vec<(&str, &str)> = keyed.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_multi_line_csv() {
        assert_eq!(Params::parse("a, b\nc"), positional(&["a", "b", "c"]));
    }

    #[test]
    fn test_values_and_accessors() {
        let params = Params::parse("x: 1, y: 2");
        assert_eq!(params.values(), vec!["1", "2"]);
        assert_eq!(params.len(), 2);
        assert!(params.positional().is_none());
        assert!(params.keyed().unwrap().contains_key("y"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Params::parse("a, b").to_string(), "[a, b]");
        assert_eq!(Params::parse("k: v").to_string(), "{k: v}");
    }
}
