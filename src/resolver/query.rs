//! Lookup details and store query patterns.
//!
//! A lookup narrows a template by three optional qualifiers, always applied
//! in the same order: locale, format, handler. For `posts/show` with locales
//! `[en]`, formats `[html]` and handlers `[erb, builder]` the query is
//!
//! ```text
//! posts/show{.en,}{.html,}{.erb,.builder,}
//! ```
//!
//! Every group keeps an empty alternative, so each qualifier may be absent
//! from the filename. The store expands the groups left to right, which
//! fixes the order candidates come back in.

use std::fmt;

/// One qualifier axis of a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Locale,
    Formats,
    Handlers,
}

impl Dimension {
    /// The order qualifier groups are appended to a query.
    pub const ORDER: [Dimension; 3] = [Dimension::Locale, Dimension::Formats, Dimension::Handlers];

    /// Name used in logs and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Locale => "locale",
            Dimension::Formats => "formats",
            Dimension::Handlers => "handlers",
        }
    }

    fn index(self) -> usize {
        match self {
            Dimension::Locale => 0,
            Dimension::Formats => 1,
            Dimension::Handlers => 2,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Qualifier values requested by a caller.
///
/// Empty strings are treated as missing values and never reach a query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Details {
    /// Locale candidates (`en`, `fr`)
    pub locale: Vec<String>,
    /// Format candidates (`html`, `json`)
    pub formats: Vec<String>,
    /// Handler candidates (`erb`, `builder`)
    pub handlers: Vec<String>,
    /// Formats assigned to templates whose file and handler name none.
    /// Falls back to `formats` when unset.
    pub default_formats: Option<Vec<String>>,
}

impl Details {
    /// Create empty details.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set locale candidates.
    pub fn with_locale<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locale = values.into_iter().map(Into::into).collect();
        self
    }

    /// Set format candidates.
    pub fn with_formats<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.formats = values.into_iter().map(Into::into).collect();
        self
    }

    /// Set handler candidates.
    pub fn with_handlers<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.handlers = values.into_iter().map(Into::into).collect();
        self
    }

    /// Set the fallback formats.
    pub fn with_default_formats<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_formats = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Values for one dimension.
    pub fn values(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Locale => &self.locale,
            Dimension::Formats => &self.formats,
            Dimension::Handlers => &self.handlers,
        }
    }

    /// Formats handed to the matcher as the last-resort fallback.
    pub fn format_hint(&self) -> &[String] {
        self.default_formats.as_deref().unwrap_or(&self.formats)
    }
}

/// Borrowed qualifier values, one slice per [`Dimension`] in
/// [`Dimension::ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Qualifiers<'a> {
    values: [&'a [String]; 3],
}

impl<'a> Qualifiers<'a> {
    /// Create qualifiers from per-dimension values.
    pub fn new(locale: &'a [String], formats: &'a [String], handlers: &'a [String]) -> Self {
        Self {
            values: [locale, formats, handlers],
        }
    }

    /// Values for one dimension.
    pub fn get(&self, dimension: Dimension) -> &'a [String] {
        self.values[dimension.index()]
    }

    /// Dimensions and their values, in query order.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, &'a [String])> + '_ {
        Dimension::ORDER.iter().map(move |d| (*d, self.get(*d)))
    }
}

impl<'a> From<&'a Details> for Qualifiers<'a> {
    fn from(details: &'a Details) -> Self {
        Self::new(
            details.values(Dimension::Locale),
            details.values(Dimension::Formats),
            details.values(Dimension::Handlers),
        )
    }
}

/// Append one optional group per qualifier dimension to `base`.
pub fn build_query(base: &str, qualifiers: &Qualifiers<'_>) -> String {
    let mut query = String::from(base);
    for (_, values) in qualifiers.iter() {
        let alternatives: Vec<String> = values
            .iter()
            .filter(|v| !v.is_empty())
            .map(|v| format!(".{v}"))
            .collect();
        query.push('{');
        query.push_str(&alternatives.join(","));
        query.push_str(",}");
    }
    query
}

/// Expand `{a,b}` groups into every concrete alternative.
///
/// The leftmost group varies slowest. Nested groups are expanded too. An
/// unbalanced `{` is left as a literal. Duplicate expansions are dropped,
/// keeping the first.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let mut expanded = Vec::new();
    expand_into(pattern, &mut expanded);
    let mut seen = std::collections::HashSet::new();
    expanded.retain(|p| seen.insert(p.clone()));
    expanded
}

fn expand_into(pattern: &str, out: &mut Vec<String>) {
    let Some((open, close)) = first_group(pattern) else {
        out.push(pattern.to_string());
        return;
    };

    let head = &pattern[..open];
    let tail = &pattern[close + 1..];
    for alternative in split_alternatives(&pattern[open + 1..close]) {
        expand_into(&format!("{head}{alternative}{tail}"), out);
    }
}

/// Byte offsets of the first balanced `{...}` group.
///
/// Braces inside `[...]` character classes are literal.
fn first_group(pattern: &str) -> Option<(usize, usize)> {
    let mut open = None;
    let mut depth = 0usize;
    let mut index = 0;
    while let Some(c) = pattern[index..].chars().next() {
        match c {
            '[' => {
                if let Some(end) = class_end(pattern, index) {
                    index = end + 1;
                    continue;
                }
            }
            '{' => {
                if depth == 0 {
                    open = Some(index);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return open.map(|open| (open, index));
                }
            }
            _ => {}
        }
        index += c.len_utf8();
    }
    None
}

/// Split group content on commas that are not inside a nested group or a
/// character class.
fn split_alternatives(content: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut index = 0;
    while let Some(c) = content[index..].chars().next() {
        match c {
            '[' => {
                if let Some(end) = class_end(content, index) {
                    index = end + 1;
                    continue;
                }
            }
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&content[start..index]);
                start = index + 1;
            }
            _ => {}
        }
        index += c.len_utf8();
    }
    parts.push(&content[start..]);
    parts
}

/// Offset of the `]` closing the character class opened at `open`.
///
/// A `]` right after `[` or `[!` belongs to the class, as in `glob`.
fn class_end(pattern: &str, open: usize) -> Option<usize> {
    let bytes = pattern.as_bytes();
    let mut index = open + 1;
    if bytes.get(index) == Some(&b'!') {
        index += 1;
    }
    if bytes.get(index) == Some(&b']') {
        index += 1;
    }
    pattern.get(index..)?.find(']').map(|offset| index + offset)
}

/// Escape `text` so every character in it matches literally, braces
/// included.
pub fn escape_literal(text: &str) -> String {
    glob::Pattern::escape(text)
        .replace('{', "[{]")
        .replace('}', "[}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn query_groups_follow_dimension_order() {
        let details = Details::new()
            .with_locale(["en"])
            .with_formats(["html"])
            .with_handlers(["erb", "builder"]);
        let query = build_query("posts/show", &Qualifiers::from(&details));
        assert_eq!(query, "posts/show{.en,}{.html,}{.erb,.builder,}");
    }

    #[test]
    fn empty_dimensions_only_allow_absence() {
        let query = build_query("show", &Qualifiers::from(&Details::new()));
        assert_eq!(query, "show{,}{,}{,}");
        assert_eq!(expand_braces(&query), vec!["show"]);
    }

    #[test]
    fn blank_values_are_skipped() {
        let details = Details::new().with_locale(["", "fr"]);
        let query = build_query("show", &Qualifiers::from(&details));
        assert!(query.starts_with("show{.fr,}"));
    }

    #[test]
    fn expansion_varies_leftmost_group_slowest() {
        assert_eq!(
            expand_braces("show{.en,}{.erb,}"),
            vec!["show.en.erb", "show.en", "show.erb", "show"]
        );
    }

    #[test]
    fn expansion_handles_nested_groups() {
        assert_eq!(expand_braces("a{b,c{d,e}}"), vec!["ab", "acd", "ace"]);
    }

    #[test]
    fn unbalanced_brace_is_literal() {
        assert_eq!(expand_braces("show{.en"), vec!["show{.en"]);
    }

    #[test]
    fn format_hint_prefers_default_formats() {
        let details = Details::new().with_formats(["html"]);
        assert_eq!(details.format_hint(), strings(&["html"]).as_slice());

        let details = details.with_default_formats(["text"]);
        assert_eq!(details.format_hint(), strings(&["text"]).as_slice());
    }

    #[test]
    fn qualifiers_iterate_in_order() {
        let details = Details::new().with_handlers(["erb"]);
        let dims: Vec<Dimension> = Qualifiers::from(&details).iter().map(|(d, _)| d).collect();
        assert_eq!(dims, Dimension::ORDER.to_vec());
        assert_eq!(Qualifiers::from(&details).get(Dimension::Handlers), ["erb"]);
    }

    #[test]
    fn braces_inside_classes_stay_literal() {
        assert_eq!(
            expand_braces("a[{]b{.x,}"),
            vec!["a[{]b.x", "a[{]b"]
        );
        assert_eq!(expand_braces("{[,],.y}"), vec!["[,]", ".y"]);
        assert_eq!(expand_braces("[]]{.x,}"), vec!["[]].x", "[]]"]);
    }

    #[test]
    fn escape_literal_neutralizes_every_metacharacter() {
        let escaped = escape_literal("views/a{b}*?[c]");
        assert_eq!(escaped, "views/a[{]b[}][*][?][[]c[]]");
        assert_eq!(expand_braces(&format!("{escaped}{{.en,}}")).len(), 2);
        assert!(glob::Pattern::new(&escaped)
            .unwrap()
            .matches("views/a{b}*?[c]"));
    }
}
