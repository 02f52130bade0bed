//! De-duplicating class and style lists.

use std::fmt;

/// Order-preserving set of CSS class names.
///
/// Input is split on whitespace; names already present are skipped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassList {
    names: Vec<String>,
}

impl ClassList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one or more space-separated class names.
    pub fn add(&mut self, classes: &str) {
        for name in classes.split_whitespace() {
            if !self.contains(name) {
                self.names.push(name.to_owned());
            }
        }
    }

    /// Insert space-separated class names before the existing ones.
    pub fn prepend(&mut self, classes: &str) {
        let mut merged = Self::new();
        merged.add(classes);
        for name in self.names.drain(..) {
            if !merged.contains(&name) {
                merged.names.push(name);
            }
        }
        *self = merged;
    }

    /// Remove a class name. Returns `true` if it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|n| n != name);
        self.names.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names.join(" "))
    }
}

/// Order-preserving set of CSS declarations.
///
/// Input is split on `;`; blank and repeated declarations are skipped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleList {
    declarations: Vec<String>,
}

impl StyleList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one or more `;`-separated declarations.
    pub fn add(&mut self, declarations: &str) {
        for decl in declarations.split(';').map(str::trim) {
            if !decl.is_empty() && !self.declarations.iter().any(|d| d == decl) {
                self.declarations.push(decl.to_owned());
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl fmt::Display for StyleList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.declarations.join(";"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_list_dedup() {
        let mut classes = ClassList::new();
        classes.add("a b");
        classes.add(" b  c ");
        assert_eq!(classes.to_string(), "a b c");
    }

    #[test]
    fn test_class_list_prepend() {
        let mut classes = ClassList::new();
        classes.add("custom shared");
        classes.prepend("prefix shared");
        assert_eq!(classes.to_string(), "prefix shared custom");
    }

    #[test]
    fn test_class_list_remove() {
        let mut classes = ClassList::new();
        classes.add("hot wide");
        assert!(classes.remove("hot"));
        assert!(!classes.remove("hot"));
        assert_eq!(classes.to_string(), "wide");
    }

    #[test]
    fn test_style_list_normalizes_separators() {
        let mut styles = StyleList::new();
        styles.add("color:white;");
        assert_eq!(styles.to_string(), "color:white");

        styles.add(";background-color:black;");
        assert_eq!(styles.to_string(), "color:white;background-color:black");

        styles.add("position:fixed;top:0;left:50px");
        assert_eq!(
            styles.to_string(),
            "color:white;background-color:black;position:fixed;top:0;left:50px"
        );
    }

    #[test]
    fn test_style_list_dedup() {
        let mut styles = StyleList::new();
        styles.add("color:red; color:red");
        assert_eq!(styles.to_string(), "color:red");
        assert!(!styles.is_empty());
    }
}
