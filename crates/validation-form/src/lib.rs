// Validation Form - declarative form validation
// Attach to a form, parse per-field rule/filter attributes, validate on
// change/blur/submit and show inline messages.

pub mod cache;
pub mod config;
pub mod dom;
pub mod engine;
pub mod message;
pub mod serialize;

pub use cache::ParseCache;
pub use config::{MessageCatalog, MessagePosition, Options};
pub use dom::{
    Control, ControlKind, DispatchOutcome, Event, EventTarget, Form, InputType, MessageNode,
    Node, NodeId, Notification, NotificationKind, Transition, TransitionKind, Visibility,
};
pub use engine::ValidationForm;
pub use serialize::{submit_async, FieldValue, FormValues, SubmitRequest, SubmitResponse, Transport};

// Re-export the DOM-free core
pub use validation_form_core::{
    Arg, ClauseGrammar, Filter, FilterSet, MessageKey, Registry, Rule, RuleSet,
};
