// File: src/dom.rs
// Purpose: In-memory form document driven by a host (browser binding, renderer or test)

use crate::config::{MessagePosition, Options};
use crate::engine::ValidationForm;
use anyhow::Result;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// Attribute holding a field's rule clauses
pub const RULES_ATTR: &str = "data-validation";

/// Attribute holding a field's filter clauses
pub const FILTERS_ATTR: &str = "data-filter";

/// Stable identifier of a node within its form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// `type` attribute of an `<input>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    #[default]
    Text,
    Password,
    Email,
    Number,
    Tel,
    Url,
    Search,
    Hidden,
    Checkbox,
    Radio,
    File,
    Submit,
    Reset,
    Button,
    Image,
}

impl InputType {
    /// Parse a `type` attribute; unknown types behave like text.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "password" => InputType::Password,
            "email" => InputType::Email,
            "number" => InputType::Number,
            "tel" => InputType::Tel,
            "url" => InputType::Url,
            "search" => InputType::Search,
            "hidden" => InputType::Hidden,
            "checkbox" => InputType::Checkbox,
            "radio" => InputType::Radio,
            "file" => InputType::File,
            "submit" => InputType::Submit,
            "reset" => InputType::Reset,
            "button" => InputType::Button,
            "image" => InputType::Image,
            _ => InputType::Text,
        }
    }

    /// Checkable inputs only submit their value when checked.
    pub fn is_checkable(self) -> bool {
        matches!(self, InputType::Checkbox | InputType::Radio)
    }

    /// Buttons and file inputs never take part in form serialization.
    pub fn is_serializable(self) -> bool {
        !matches!(
            self,
            InputType::File
                | InputType::Submit
                | InputType::Reset
                | InputType::Button
                | InputType::Image
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Input(InputType),
    Textarea,
    Select,
}

/// A form control (`input`, `textarea` or `select`)
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    id: NodeId,
    pub kind: ControlKind,
    pub name: Option<String>,
    pub value: String,
    pub checked: bool,
    pub disabled: bool,
    attributes: BTreeMap<String, String>,
    classes: BTreeSet<String>,
}

impl Control {
    pub fn new(kind: ControlKind) -> Self {
        Self {
            id: NodeId(0),
            kind,
            name: None,
            value: String::new(),
            checked: false,
            disabled: false,
            attributes: BTreeMap::new(),
            classes: BTreeSet::new(),
        }
    }

    /// `<input type="text" name="...">`
    pub fn text(name: &str) -> Self {
        Self::new(ControlKind::Input(InputType::Text)).with_name(name)
    }

    pub fn input(input_type: InputType, name: &str) -> Self {
        Self::new(ControlKind::Input(input_type)).with_name(name)
    }

    pub fn textarea(name: &str) -> Self {
        Self::new(ControlKind::Textarea).with_name(name)
    }

    pub fn select(name: &str) -> Self {
        Self::new(ControlKind::Select).with_name(name)
    }

    /// Checkbox submitting `value` when checked
    pub fn checkbox(name: &str, value: &str) -> Self {
        Self::input(InputType::Checkbox, name).with_value(value)
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Shorthand for the `data-validation` attribute
    pub fn with_rules(self, rules: &str) -> Self {
        self.with_attr(RULES_ATTR, rules)
    }

    /// Shorthand for the `data-filter` attribute
    pub fn with_filters(self, filters: &str) -> Self {
        self.with_attr(FILTERS_ATTR, filters)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn toggle_class(&mut self, class: &str, on: bool) {
        if on {
            self.classes.insert(class.to_string());
        } else {
            self.classes.remove(class);
        }
    }

    /// Whether this control contributes a value when the form is serialized
    pub fn is_successful(&self) -> bool {
        if self.name.is_none() || self.disabled {
            return false;
        }
        match self.kind {
            ControlKind::Input(t) if !t.is_serializable() => false,
            ControlKind::Input(t) if t.is_checkable() => self.checked,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Shown,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Fade,
    Instant,
}

/// Requested show/hide animation. The host plays it; validation never waits for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub kind: TransitionKind,
    pub duration: Duration,
}

/// Inline message attached to a field through `data-for`
#[derive(Debug, Clone, PartialEq)]
pub struct MessageNode {
    id: NodeId,
    pub class_name: String,
    pub data_for: String,
    pub text: String,
    pub visibility: Visibility,
    /// Last requested transition, `None` until first shown or hidden
    pub transition: Option<Transition>,
}

impl MessageNode {
    /// A new, hidden message node
    pub fn new(class_name: &str, data_for: &str) -> Self {
        Self {
            id: NodeId(0),
            class_name: class_name.to_string(),
            data_for: data_for.to_string(),
            text: String::new(),
            visibility: Visibility::Hidden,
            transition: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Shown
    }

    pub fn show(&mut self, text: String, transition: Transition) {
        self.text = text;
        self.visibility = Visibility::Shown;
        self.transition = Some(transition);
    }

    pub fn hide(&mut self, transition: Transition) {
        self.visibility = Visibility::Hidden;
        self.transition = Some(transition);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Control(Control),
    Message(MessageNode),
}

impl Node {
    pub fn id(&self) -> NodeId {
        match self {
            Node::Control(c) => c.id,
            Node::Message(m) => m.id,
        }
    }

    fn set_id(&mut self, id: NodeId) {
        match self {
            Node::Control(c) => c.id = id,
            Node::Message(m) => m.id = id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    Form,
    Control(NodeId),
}

/// An event dispatched by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event type, e.g. `change`, `blur`, `submit`
    pub kind: String,
    pub target: EventTarget,
}

impl Event {
    pub fn new(kind: &str, target: EventTarget) -> Self {
        Self {
            kind: kind.to_string(),
            target,
        }
    }

    pub fn change(id: NodeId) -> Self {
        Self::new("change", EventTarget::Control(id))
    }

    pub fn blur(id: NodeId) -> Self {
        Self::new("blur", EventTarget::Control(id))
    }

    pub fn input(id: NodeId) -> Self {
        Self::new("input", EventTarget::Control(id))
    }

    pub fn submit() -> Self {
        Self::new("submit", EventTarget::Form)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// A field failed validation
    Invalid,
    /// Submit found every field valid
    Validated,
    /// Submit found at least one invalid field
    Error,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Invalid => "invalid",
            NotificationKind::Validated => "validated",
            NotificationKind::Error => "error",
        }
    }
}

/// Event emitted by validation, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub target: EventTarget,
}

/// Result of dispatching an event to a form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOutcome {
    /// A validation handler ran for the event
    pub handled: bool,
    /// The host must cancel the event's default action (form submission)
    pub default_prevented: bool,
}

/// A form and its nodes in document order
#[derive(Debug, Default)]
pub struct Form {
    pub action: String,
    pub method: String,
    nodes: Vec<Node>,
    next_id: usize,
    notifications: Vec<Notification>,
    instance: Option<Box<ValidationForm>>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_action(mut self, action: &str) -> Self {
        self.action = action.to_string();
        self
    }

    pub fn with_method(mut self, method: &str) -> Self {
        self.method = method.to_string();
        self
    }

    fn allocate(&mut self, mut node: Node) -> Node {
        self.next_id += 1;
        node.set_id(NodeId(self.next_id));
        node
    }

    /// Append a control at the end of the form
    pub fn push(&mut self, control: Control) -> NodeId {
        let node = self.allocate(Node::Control(control));
        let id = node.id();
        self.nodes.push(node);
        id
    }

    fn position(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|node| node.id() == id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Controls in document order
    pub fn controls(&self) -> impl Iterator<Item = &Control> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Control(c) => Some(c),
            Node::Message(_) => None,
        })
    }

    /// Message nodes in document order
    pub fn messages(&self) -> impl Iterator<Item = &MessageNode> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Message(m) => Some(m),
            Node::Control(_) => None,
        })
    }

    pub fn control(&self, id: NodeId) -> Option<&Control> {
        self.controls().find(|c| c.id == id)
    }

    pub fn control_mut(&mut self, id: NodeId) -> Option<&mut Control> {
        self.nodes.iter_mut().find_map(|node| match node {
            Node::Control(c) if c.id == id => Some(c),
            _ => None,
        })
    }

    /// First control carrying `name`
    pub fn control_by_name(&self, name: &str) -> Option<&Control> {
        self.controls().find(|c| c.name() == Some(name))
    }

    /// Ids of every named control, in document order
    pub fn named_controls(&self) -> Vec<NodeId> {
        self.controls()
            .filter(|c| c.name.is_some())
            .map(|c| c.id)
            .collect()
    }

    pub fn value(&self, id: NodeId) -> Option<&str> {
        self.control(id).map(|c| c.value.as_str())
    }

    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) {
        if let Some(control) = self.control_mut(id) {
            control.value = value.into();
        }
    }

    /// Message node for `data_for` with the given class
    pub fn find_message(&self, class_name: &str, data_for: &str) -> Option<&MessageNode> {
        self.messages()
            .find(|m| m.class_name == class_name && m.data_for == data_for)
    }

    pub fn find_message_mut(&mut self, class_name: &str, data_for: &str) -> Option<&mut MessageNode> {
        self.nodes.iter_mut().find_map(|node| match node {
            Node::Message(m) if m.class_name == class_name && m.data_for == data_for => Some(m),
            _ => None,
        })
    }

    /// Insert a message node next to `anchor` and return it.
    ///
    /// Falls back to appending when `anchor` is not in this form.
    pub fn insert_message(
        &mut self,
        anchor: NodeId,
        position: MessagePosition,
        message: MessageNode,
    ) -> &mut MessageNode {
        let node = self.allocate(Node::Message(message));
        let index = match (self.position(anchor), position) {
            (Some(i), MessagePosition::Before) => i,
            (Some(i), MessagePosition::After) => i + 1,
            (None, _) => self.nodes.len(),
        };
        self.nodes.insert(index, node);
        match &mut self.nodes[index] {
            Node::Message(m) => m,
            Node::Control(_) => unreachable!("a message node was just inserted here"),
        }
    }

    pub(crate) fn notify(&mut self, kind: NotificationKind, target: EventTarget) {
        tracing::debug!("Emitting {} on {:?}", kind.as_str(), target);
        self.notifications.push(Notification { kind, target });
    }

    /// Drain the notifications emitted since the last call
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Attach validation to this form.
    ///
    /// Attaching twice is a no-op; the first instance and its options stay.
    pub fn validation_form(&mut self, options: Options) -> Result<&mut Self> {
        if self.instance.is_some() {
            tracing::debug!("Validation already attached, ignoring");
            return Ok(self);
        }
        self.instance = Some(Box::new(ValidationForm::new(options)?));
        Ok(self)
    }

    pub fn is_attached(&self) -> bool {
        self.instance.is_some()
    }

    pub fn validator(&self) -> Option<&ValidationForm> {
        self.instance.as_deref()
    }

    pub fn validator_mut(&mut self) -> Option<&mut ValidationForm> {
        self.instance.as_deref_mut()
    }

    // The instance is detached for the duration of `f` so it can borrow the form mutably.
    fn with_instance<R>(&mut self, f: impl FnOnce(&mut ValidationForm, &mut Form) -> R) -> Option<R> {
        let mut instance = self.instance.take()?;
        let result = f(&mut *instance, self);
        self.instance = Some(instance);
        Some(result)
    }

    /// Dispatch a host event to the attached validator.
    pub fn dispatch(&mut self, event: &Event) -> DispatchOutcome {
        self.with_instance(|instance, form| instance.handle(form, event))
            .unwrap_or_default()
    }

    /// Validate one field with the attached validator. `None` when nothing is attached.
    pub fn validate(&mut self, id: NodeId) -> Option<bool> {
        self.with_instance(|instance, form| instance.validate(form, id))
    }
}
