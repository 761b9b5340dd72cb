// File: src/cache.rs
// Purpose: Per-field cache of parsed rule/filter sets

use std::collections::BTreeMap;
use std::sync::Arc;

/// Parsed attribute results keyed by field name
///
/// An entry is created the first time a field with a non-empty attribute is
/// parsed and is returned unchanged afterwards, even if the attribute is
/// edited later. Call [`invalidate`](Self::invalidate) or
/// [`clear`](Self::clear) after changing a field's attribute.
///
/// Fields without the attribute are never cached, so adding the attribute
/// later is picked up.
#[derive(Debug)]
pub struct ParseCache<T> {
    entries: BTreeMap<String, Arc<T>>,
}

impl<T> Default for ParseCache<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> ParseCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached entry for `name`, parsing `source` on first use.
    pub fn get_or_parse<F>(&mut self, name: &str, source: Option<&str>, parse: F) -> Option<Arc<T>>
    where
        F: FnOnce(&str) -> T,
    {
        if let Some(entry) = self.entries.get(name) {
            return Some(Arc::clone(entry));
        }

        let source = source.filter(|s| !s.is_empty())?;
        let parsed = Arc::new(parse(source));
        self.entries.insert(name.to_string(), Arc::clone(&parsed));
        Some(parsed)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<T>> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<T>)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Drop the entry for `name`. Returns whether one existed.
    pub fn invalidate(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
