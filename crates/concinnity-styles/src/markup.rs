//! Class references in rendered markup.

use std::collections::HashSet;

use crate::key::{CacheId, RuleKey};

/// Set of class tokens referenced by a piece of markup.
///
/// Only `class` attributes of start tags count. Text content, comments and
/// the bodies of `script` and `style` elements are skipped.
#[derive(Debug, Clone, Default)]
pub struct ClassReferences {
    classes: HashSet<String>,
}

impl ClassReferences {
    /// Scan markup for class references.
    pub fn scan(markup: &str) -> Self {
        let bytes = markup.as_bytes();
        let mut classes = HashSet::new();
        let mut pos = 0;

        while let Some(offset) = bytes[pos..].iter().position(|&b| b == b'<') {
            let start = pos + offset;
            let rest = &markup[start..];

            if rest.starts_with("<!--") {
                pos = rest
                    .find("-->")
                    .map(|end| start + end + 3)
                    .unwrap_or(bytes.len());
                continue;
            }

            match bytes.get(start + 1) {
                Some(c) if c.is_ascii_alphabetic() => {
                    let (end, name) = scan_start_tag(markup, start + 1, &mut classes);
                    pos = end;
                    if name.eq_ignore_ascii_case("script") || name.eq_ignore_ascii_case("style") {
                        pos = skip_raw_text(markup, pos, name);
                    }
                }
                _ => pos = start + 1,
            }
        }

        Self { classes }
    }

    /// Whether a class token is referenced.
    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Whether the markup references the rule `key` of `cache`, either by
    /// its namespaced class `{cache}-{key}` or by the bare key.
    pub fn references(&self, cache: &CacheId, key: &RuleKey) -> bool {
        self.classes.contains(key.as_str()) || self.classes.contains(&key.class_name(cache))
    }

    /// The rule key each class token names in `cache`: the token without
    /// its `{cache}-` prefix, or the token itself when it has none.
    pub fn rule_keys<'a>(&'a self, cache: &'a CacheId) -> impl Iterator<Item = &'a str> + 'a {
        self.classes.iter().map(move |class| {
            class
                .strip_prefix(cache.as_str())
                .and_then(|rest| rest.strip_prefix('-'))
                .unwrap_or(class.as_str())
        })
    }

    /// Number of distinct class tokens.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the markup references no class.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterate referenced class tokens (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|s| s.as_str())
    }
}

/// Scan one start tag beginning at its name. Returns the position after the
/// tag and the tag name.
fn scan_start_tag<'a>(
    markup: &'a str,
    mut i: usize,
    classes: &mut HashSet<String>,
) -> (usize, &'a str) {
    let bytes = markup.as_bytes();

    let name_start = i;
    while i < bytes.len() && !(bytes[i].is_ascii_whitespace() || matches!(bytes[i], b'/' | b'>')) {
        i += 1;
    }
    let name = &markup[name_start..i];

    loop {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        if i >= bytes.len() {
            return (i, name);
        }
        if bytes[i] == b'>' {
            return (i + 1, name);
        }

        let attr_start = i;
        while i < bytes.len()
            && !(bytes[i].is_ascii_whitespace() || matches!(bytes[i], b'=' | b'>' | b'/'))
        {
            i += 1;
        }
        let attr = &markup[attr_start..i];

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            let (value, next) = read_attribute_value(markup, i);
            i = next;

            if attr.eq_ignore_ascii_case("class") {
                classes.extend(value.split_ascii_whitespace().map(str::to_string));
            }
        }
    }
}

fn read_attribute_value(markup: &str, i: usize) -> (&str, usize) {
    let bytes = markup.as_bytes();

    match bytes.get(i) {
        Some(&quote) if quote == b'"' || quote == b'\'' => {
            match bytes[i + 1..].iter().position(|&b| b == quote) {
                Some(len) => (&markup[i + 1..i + 1 + len], i + len + 2),
                None => (&markup[i + 1..], bytes.len()),
            }
        }
        _ => {
            let end = bytes[i..]
                .iter()
                .position(|&b| b.is_ascii_whitespace() || b == b'>')
                .map(|len| i + len)
                .unwrap_or(bytes.len());
            (&markup[i..end], end)
        }
    }
}

/// Position of the closing tag of a raw-text element, or the end of input.
fn skip_raw_text(markup: &str, from: usize, name: &str) -> usize {
    let bytes = markup.as_bytes();
    let mut pos = from;

    while let Some(offset) = markup[pos..].find("</") {
        let start = pos + offset;
        let name_end = start + 2 + name.len();
        if name_end <= bytes.len() && bytes[start + 2..name_end].eq_ignore_ascii_case(name.as_bytes())
        {
            return start;
        }
        pos = start + 2;
    }

    bytes.len()
}
