use smallvec::SmallVec;
use std::sync::Arc;

/// Maximum number of inline header entries before heap allocation.
/// Most requests and responses carry well under 16 headers.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Ordered, case-insensitive, multi-value header map.
///
/// Entries keep insertion order and a key may appear more than once
/// (`Set-Cookie` semantics). Names are stored as `Arc<str>` since the same
/// handful of header names repeats across every request; values are
/// per-message data and stay owned `String`s.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    entries: SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First value for `name`, matched case-insensitively per RFC 7230.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All values for `name`, in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    /// Set `name` to a single value, replacing any existing values.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.entries.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.entries.push((Arc::from(name), value.into()));
    }

    /// Add a value for `name` without touching existing ones.
    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        self.entries.push((Arc::from(name), value.into()));
    }

    /// Remove all values for `name`.
    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    }

    /// Iterate `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_ref(), v.as_str()))
    }

    /// Fold `later` into `self`, later values winning per key.
    ///
    /// Keys present only in `self` keep their position; every key taken from
    /// `later` replaces all earlier values for that key and is appended in
    /// `later`'s order. Multi-value keys from `later` survive intact.
    pub fn merge_from(&mut self, later: Headers) {
        let mut taken: SmallVec<[Arc<str>; MAX_INLINE_HEADERS]> = SmallVec::new();
        for (name, value) in later.entries {
            if !taken.iter().any(|k| k.eq_ignore_ascii_case(&name)) {
                self.entries.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
                taken.push(name.clone());
            }
            self.entries.push((name, value));
        }
    }
}
