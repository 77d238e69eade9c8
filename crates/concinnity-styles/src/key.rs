//! Cache identifiers, rule keys and content-derived key hashing.

use std::fmt;

/// Errors raised while naming caches or rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StyleError {
    /// Cache identifiers are lowercase ASCII letters and `-`.
    #[error("invalid cache identifier {0:?}")]
    InvalidCacheId(String),

    /// Rule keys must be usable as a single class token.
    #[error("invalid rule key {0:?}")]
    InvalidRuleKey(String),

    /// A rule was emitted by a component rendered without a cache.
    #[error("style rule emitted outside a cache-injected render")]
    Detached,
}

/// Short opaque identifier of one style cache (e.g. `css`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheId(String);

impl CacheId {
    /// Validate and wrap a cache identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, StyleError> {
        let id = id.into();
        let valid = !id.is_empty()
            && !id.starts_with('-')
            && id.chars().all(|c| c.is_ascii_lowercase() || c == '-');

        if valid {
            Ok(Self(id))
        } else {
            Err(StyleError::InvalidCacheId(id))
        }
    }

    /// Get the identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of one style rule.
///
/// Markup references a rule either by the key itself (explicitly keyed
/// rules) or by the cache-namespaced class `{cache}-{key}` (content-derived
/// rules). Style tag markers always list the bare key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleKey(String);

impl RuleKey {
    /// Validate a rule key. A single leading `.` is stripped, so selector
    /// form (`.x`) and class form (`x`) name the same rule.
    ///
    /// Keys must appear verbatim in a class attribute, so whitespace, quotes,
    /// angle brackets and `&` are rejected.
    pub fn new(key: impl AsRef<str>) -> Result<Self, StyleError> {
        let raw = key.as_ref();
        let key = raw.strip_prefix('.').unwrap_or(raw);

        let valid = !key.is_empty()
            && !key
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>' | '&'));

        if valid {
            Ok(Self(key.to_string()))
        } else {
            Err(StyleError::InvalidRuleKey(raw.to_string()))
        }
    }

    /// Derive the key for a block of declarations: the base-36 MurmurHash2
    /// of the text.
    ///
    /// Identical declarations always derive the identical key, so the client
    /// runtime computes the same name for rules it already finds in the page.
    pub fn derive(declarations: &str) -> Self {
        Self(to_base36(murmur2(declarations.as_bytes())))
    }

    /// Class name referencing this rule in the namespace of `cache`:
    /// `{cache}-{key}`.
    pub fn class_name(&self, cache: &CacheId) -> String {
        format!("{}-{}", cache.as_str(), self.0)
    }

    /// Get the key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RuleKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 32-bit MurmurHash2 with a zero seed and no length mixing.
pub fn murmur2(input: &[u8]) -> u32 {
    const M: u32 = 0x5bd1_e995;

    let mut h: u32 = 0;
    let mut chunks = input.chunks_exact(4);

    for chunk in &mut chunks {
        let mut k = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        k = k.wrapping_mul(M);
        k ^= k >> 24;
        k = k.wrapping_mul(M);
        h = h.wrapping_mul(M) ^ k;
    }

    let tail = chunks.remainder();
    if tail.len() >= 3 {
        h ^= u32::from(tail[2]) << 16;
    }
    if tail.len() >= 2 {
        h ^= u32::from(tail[1]) << 8;
    }
    if !tail.is_empty() {
        h ^= u32::from(tail[0]);
        h = h.wrapping_mul(M);
    }

    h ^= h >> 13;
    h = h.wrapping_mul(M);
    h ^ (h >> 15)
}

fn to_base36(mut n: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if n == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();

    String::from_utf8(out).unwrap_or_default()
}
