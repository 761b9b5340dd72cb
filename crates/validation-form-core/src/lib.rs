//! Validation Form Core
//!
//! DOM-free half of validation-form: the clause grammar that turns
//! `data-validation` / `data-filter` attribute strings into typed rule and
//! filter sets, the built-in predicates and transforms, and the pure
//! per-field evaluation used by both the form engine and the WASM bindings.

pub mod args;
pub mod clause;
pub mod error;
pub mod evaluate;
pub mod filter;
pub mod number;
pub mod registry;
pub mod rule;
pub mod zenhan;

pub use args::{parse_args, Arg};
pub use clause::{Clause, ClauseGrammar, DEFAULT_DELIMITER, DEFAULT_FORMAT};
pub use error::{Error, Result};
pub use evaluate::{apply_filters, evaluate, MessageKey};
pub use filter::{Filter, FilterSet, Pattern};
pub use registry::Registry;
pub use rule::{Rule, RuleSet};
