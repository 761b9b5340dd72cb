//! Registration of custom rules and filters
//!
//! Built-in clause names always resolve to their typed variants, so a custom
//! entry can add names but never shadow `length`, `trim` and friends.

use crate::args::Arg;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Custom rule: `(value, args) -> valid`
pub type RuleFn = Arc<dyn Fn(&str, &[Arg]) -> bool + Send + Sync>;

/// Custom filter: `(value, args) -> new value`
pub type FilterFn = Arc<dyn Fn(&str, &[Arg]) -> String + Send + Sync>;

#[derive(Clone, Default)]
pub struct Registry {
    rules: HashMap<String, RuleFn>,
    filters: HashMap<String, FilterFn>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule under `name`, replacing any previous registration.
    pub fn register_rule<F>(&mut self, name: impl Into<String>, rule: F) -> &mut Self
    where
        F: Fn(&str, &[Arg]) -> bool + Send + Sync + 'static,
    {
        self.rules.insert(name.into(), Arc::new(rule));
        self
    }

    /// Register a filter under `name`, replacing any previous registration.
    pub fn register_filter<F>(&mut self, name: impl Into<String>, filter: F) -> &mut Self
    where
        F: Fn(&str, &[Arg]) -> String + Send + Sync + 'static,
    {
        self.filters.insert(name.into(), Arc::new(filter));
        self
    }

    pub fn rule(&self, name: &str) -> Option<&RuleFn> {
        self.rules.get(name)
    }

    pub fn filter(&self, name: &str) -> Option<&FilterFn> {
        self.filters.get(name)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rules: Vec<_> = self.rules.keys().collect();
        let mut filters: Vec<_> = self.filters.keys().collect();
        rules.sort();
        filters.sort();
        f.debug_struct("Registry")
            .field("rules", &rules)
            .field("filters", &filters)
            .finish()
    }
}
