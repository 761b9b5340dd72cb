// File: src/engine.rs
// Purpose: Validation engine attached to a form

use crate::cache::ParseCache;
use crate::config::Options;
use crate::dom::{Control, DispatchOutcome, Event, EventTarget, Form, NodeId, NotificationKind, FILTERS_ATTR, RULES_ATTR};
use crate::message;
use anyhow::Result;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use validation_form_core::{apply_filters, evaluate, ClauseGrammar, FilterSet, MessageKey, Registry, RuleSet};

/// Validator state for one form: options, grammar, custom registrations and
/// the per-field parse caches.
#[derive(Debug)]
pub struct ValidationForm {
    options: Options,
    grammar: ClauseGrammar,
    registry: Registry,
    rules: ParseCache<RuleSet>,
    filters: ParseCache<FilterSet>,
}

impl ValidationForm {
    pub fn new(options: Options) -> Result<Self> {
        let grammar = options.grammar()?;
        Ok(Self {
            options,
            grammar,
            registry: Registry::new(),
            rules: ParseCache::new(),
            filters: ParseCache::new(),
        })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Deep-merge new option values. Cached parse results are kept.
    pub fn configure(&mut self, overrides: Value) -> Result<()> {
        let mut options = self.options.clone();
        options.merge(overrides)?;
        self.grammar = options.grammar()?;
        self.options = options;
        Ok(())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Register custom rules and filters here.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Parsed rules of a control, cached by field name
    pub fn parse_rules(&mut self, control: &Control) -> Option<Arc<RuleSet>> {
        let grammar = &self.grammar;
        self.rules.get_or_parse(
            control.name().unwrap_or_default(),
            control.attr(RULES_ATTR),
            |source| grammar.parse_rules(source),
        )
    }

    /// Parsed filters of a control, cached by field name
    pub fn parse_filters(&mut self, control: &Control) -> Option<Arc<FilterSet>> {
        let grammar = &self.grammar;
        self.filters.get_or_parse(
            control.name().unwrap_or_default(),
            control.attr(FILTERS_ATTR),
            |source| grammar.parse_filters(source),
        )
    }

    /// Forget the cached rules and filters of one field, e.g. after its
    /// attributes were changed.
    pub fn invalidate_field(&mut self, name: &str) {
        self.rules.invalidate(name);
        self.filters.invalidate(name);
    }

    pub fn clear_cache(&mut self) {
        self.rules.clear();
        self.filters.clear();
    }

    /// Validate a single field, update its message and return its validity.
    pub fn validate(&mut self, form: &mut Form, id: NodeId) -> bool {
        let mut visited = HashSet::new();
        self.validate_field(form, id, &mut visited)
    }

    fn validate_field(&mut self, form: &mut Form, id: NodeId, visited: &mut HashSet<String>) -> bool {
        let Some(control) = form.control(id) else {
            tracing::debug!("No control {:?} in form, skipping validation", id);
            return true;
        };
        let Some(name) = control.name().map(str::to_string) else {
            return true;
        };
        visited.insert(name.clone());

        let values = form.serialize_object();
        let rules = self.parse_rules(control);
        let filters = self.parse_filters(control);

        if let Some(filters) = filters {
            let current = control.value.clone();
            let filtered = apply_filters(&filters, &current, &self.registry);
            if filtered != current {
                form.set_value(id, filtered);
            }
        }

        // Fields declaring `equals(<this field>)` are revalidated first so a
        // matching pair stays in sync.
        let dependents: Vec<String> = self
            .rules
            .iter()
            .filter(|(other, set)| {
                *other != name
                    && set.equals.as_deref() == Some(name.as_str())
                    && !visited.contains(*other)
            })
            .map(|(other, _)| other.to_string())
            .collect();

        for dependent in dependents {
            if let Some(dependent_id) = form.control_by_name(&dependent).map(Control::id) {
                self.validate_field(form, dependent_id, visited);
            }
        }

        let key = rules.and_then(|rules| self.resolve_key(form, id, &name, &rules, values.contains(&name)));
        self.message(form, id, key.as_ref())
    }

    fn resolve_key(
        &self,
        form: &Form,
        id: NodeId,
        name: &str,
        rules: &RuleSet,
        submitted: bool,
    ) -> Option<MessageKey> {
        let value = if submitted {
            form.value(id).unwrap_or_default()
        } else {
            ""
        };
        let equals_value = rules
            .equals
            .as_deref()
            .and_then(|target| form.control_by_name(target))
            .map(|target| target.value.as_str());

        let key = evaluate(rules, value, equals_value, &self.registry);
        if let Some(key) = &key {
            tracing::trace!("Field `{}` failed with key `{}`", name, key);
        }
        key
    }

    /// Present a resolved key for a field and return its validity
    pub fn message(&self, form: &mut Form, id: NodeId, key: Option<&MessageKey>) -> bool {
        message::present(form, &self.options, id, key)
    }

    /// Validate every named control in document order.
    pub fn validate_all(&mut self, form: &mut Form) -> bool {
        form.named_controls()
            .into_iter()
            .fold(true, |valid, id| self.validate(form, id) && valid)
    }

    /// React to a host event.
    pub fn handle(&mut self, form: &mut Form, event: &Event) -> DispatchOutcome {
        match event.target {
            EventTarget::Form if event.kind == "submit" => self.on_submit(form),
            EventTarget::Control(id) if self.options.triggers(&event.kind) => {
                let named = form.control(id).is_some_and(|c| c.name.is_some());
                if !named {
                    return DispatchOutcome::default();
                }
                self.validate(form, id);
                DispatchOutcome {
                    handled: true,
                    default_prevented: false,
                }
            }
            _ => DispatchOutcome::default(),
        }
    }

    fn on_submit(&mut self, form: &mut Form) -> DispatchOutcome {
        let valid = self.validate_all(form);
        let default_prevented = !valid || !self.options.submit;

        tracing::debug!(valid, default_prevented, "Form submitted");
        form.notify(
            if valid {
                NotificationKind::Validated
            } else {
                NotificationKind::Error
            },
            EventTarget::Form,
        );

        DispatchOutcome {
            handled: true,
            default_prevented,
        }
    }
}
