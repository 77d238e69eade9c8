//! Critical CSS extraction.

use crate::cache::StyleSnapshot;
use crate::key::{CacheId, RuleKey};
use crate::markup::ClassReferences;

/// One extracted unit of style output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriticalStyleFragment {
    /// Cache the rules came from.
    pub cache_id: CacheId,
    /// Rule keys in cache insertion order.
    pub keys: Vec<RuleKey>,
    /// Concatenated rule text, in the same order as `keys`.
    pub css: String,
}

impl CriticalStyleFragment {
    fn new(cache_id: CacheId) -> Self {
        Self {
            cache_id,
            keys: Vec::new(),
            css: String::new(),
        }
    }

    fn push(&mut self, key: &RuleKey, text: &str) {
        self.keys.push(key.clone());
        self.css.push_str(text);
    }

    /// Marker the client runtime reads to recognize rules already present:
    /// `{cacheIdentifier} {ruleKey1} {ruleKey2} ...`.
    pub fn marker(&self) -> String {
        let mut marker = self.cache_id.as_str().to_string();
        for key in &self.keys {
            marker.push(' ');
            marker.push_str(key.as_str());
        }
        marker
    }
}

/// Reduces a render's style cache to the rules its markup references.
#[derive(Debug, Clone, Copy, Default)]
pub struct CriticalCssExtractor;

impl CriticalCssExtractor {
    /// Create an extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract the critical fragments for `markup`.
    ///
    /// Rules referenced by a class token, either `{cache}-{key}` or the
    /// bare key, are kept and every other rule is dropped. Runs of consecutive kept rules form one fragment, and
    /// fragments follow cache insertion order so cascade order is unchanged.
    pub fn extract(&self, markup: &str, snapshot: &StyleSnapshot) -> Vec<CriticalStyleFragment> {
        if snapshot.is_empty() {
            return Vec::new();
        }

        let references = ClassReferences::scan(markup);
        let mut fragments = Vec::new();
        let mut current: Option<CriticalStyleFragment> = None;

        let cache_id = snapshot.cache_id();

        for (key, text) in snapshot.iter() {
            if references.references(cache_id, key) {
                current
                    .get_or_insert_with(|| CriticalStyleFragment::new(cache_id.clone()))
                    .push(key, text);
            } else if let Some(fragment) = current.take() {
                fragments.push(fragment);
            }
        }
        fragments.extend(current);

        fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::StyleCollectionCache;

    fn snapshot(rules: &[(&str, &str)]) -> StyleSnapshot {
        let mut cache = StyleCollectionCache::create(CacheId::new("css").unwrap());
        for (key, text) in rules {
            cache.record(key, *text).unwrap();
        }
        cache.into_snapshot()
    }

    fn keys(fragment: &CriticalStyleFragment) -> Vec<&str> {
        fragment.keys.iter().map(|k| k.as_str()).collect()
    }

    #[test]
    fn test_empty_snapshot_yields_no_fragments() {
        let fragments = CriticalCssExtractor::new().extract(r#"<div class="x"></div>"#, &snapshot(&[]));
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_empty_markup_yields_no_fragments() {
        let fragments = CriticalCssExtractor::new().extract("", &snapshot(&[("x", ".x{}")]));
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_single_rule_scenario() {
        let fragments = CriticalCssExtractor::new().extract(
            r#"<div class="x">hi</div>"#,
            &snapshot(&[(".x", ".x{color:red}")]),
        );

        assert_eq!(fragments.len(), 1);
        assert_eq!(keys(&fragments[0]), vec!["x"]);
        assert_eq!(fragments[0].css, ".x{color:red}");
        assert_eq!(fragments[0].marker(), "css x");
    }

    #[test]
    fn test_keeps_insertion_order_not_markup_order() {
        let snapshot = snapshot(&[("a", ".a{}"), ("b", ".b{}"), ("c", ".c{}")]);
        let markup = r#"<p class="c"></p><p class="b"></p>"#;

        let fragments = CriticalCssExtractor::new().extract(markup, &snapshot);

        assert_eq!(fragments.len(), 1);
        assert_eq!(keys(&fragments[0]), vec!["b", "c"]);
        assert_eq!(fragments[0].css, ".b{}.c{}");
        assert_eq!(fragments[0].marker(), "css b c");
    }

    #[test]
    fn test_dead_rules_split_fragments() {
        let snapshot = snapshot(&[("a", ".a{}"), ("b", ".b{}"), ("c", ".c{}"), ("d", ".d{}")]);
        let markup = r#"<p class="a d"></p>"#;

        let fragments = CriticalCssExtractor::new().extract(markup, &snapshot);

        assert_eq!(fragments.len(), 2);
        assert_eq!(keys(&fragments[0]), vec!["a"]);
        assert_eq!(keys(&fragments[1]), vec!["d"]);
    }

    #[test]
    fn test_unreferenced_rules_are_dropped() {
        let snapshot = snapshot(&[("open", ".open{}"), ("closed", ".closed{}")]);

        let fragments = CriticalCssExtractor::new().extract(r#"<nav class="closed"></nav>"#, &snapshot);

        let emitted: Vec<&str> = fragments.iter().flat_map(keys).collect();
        assert_eq!(emitted, vec!["closed"]);
    }

    #[test]
    fn test_emitted_keys_equal_referenced_keys() {
        let snapshot = snapshot(&[
            ("a", ".a{}"),
            ("b", ".b{}"),
            ("c", ".c{}"),
            ("d", ".d{}"),
            ("e", ".e{}"),
        ]);
        let markup = r#"<div class="e b"><span class="a unknown"></span></div>"#;

        let fragments = CriticalCssExtractor::new().extract(markup, &snapshot);

        let mut emitted: Vec<&str> = fragments.iter().flat_map(keys).collect();
        emitted.sort();
        assert_eq!(emitted, vec!["a", "b", "e"]);
    }

    #[test]
    fn test_derived_rules_marker_lists_bare_keys() {
        let mut cache = StyleCollectionCache::create(CacheId::new("css").unwrap());
        let red = cache.css("color:red");
        let bold = cache.css("font-weight:700");
        let markup = format!(r#"<div class="{} {}">hi</div>"#, red, bold);

        let fragments = CriticalCssExtractor::new().extract(&markup, &cache.into_snapshot());

        let red_key = red.strip_prefix("css-").unwrap();
        let bold_key = bold.strip_prefix("css-").unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].marker(), format!("css {} {}", red_key, bold_key));
        assert_eq!(
            fragments[0].css,
            format!(".{}{{color:red}}.{}{{font-weight:700}}", red, bold)
        );
    }

    #[test]
    fn test_text_mentions_are_not_references() {
        let snapshot = snapshot(&[("x", ".x{}")]);

        let fragments = CriticalCssExtractor::new().extract("<p>x</p>", &snapshot);

        assert!(fragments.is_empty());
    }
}
