// File: src/message.rs
// Purpose: Show/hide a field's inline message and toggle its state classes

use crate::config::Options;
use crate::dom::{EventTarget, Form, MessageNode, NodeId, NotificationKind};
use validation_form_core::MessageKey;

/// Class set on a field whose last validation failed
pub const INVALID_CLASS: &str = "invalid";

/// Class set on a field whose last validation passed
pub const VALID_CLASS: &str = "valid";

/// Display text for a field's failure, `None` when there is no failure
pub fn resolve_message(options: &Options, field: &str, key: Option<&MessageKey>) -> Option<String> {
    key.map(|key| options.message_for(field, key.as_str()).to_string())
}

/// Present the outcome of validating `id` and return its validity.
///
/// On failure the field's message node is created if needed (hidden, then
/// shown), its text set and an `invalid` notification queued for the field.
/// On success an existing message node is hidden.
pub fn present(form: &mut Form, options: &Options, id: NodeId, key: Option<&MessageKey>) -> bool {
    let Some(name) = form.control(id).and_then(|c| c.name.clone()) else {
        return key.is_none();
    };

    let message = resolve_message(options, &name, key);
    let transition = options.transition();

    if let Some(control) = form.control_mut(id) {
        control.toggle_class(INVALID_CLASS, message.is_some());
        control.toggle_class(VALID_CLASS, message.is_none());
    }

    match message {
        Some(text) => {
            let class_name = options.message_class_name.as_str();
            let node = if form.find_message(class_name, &name).is_some() {
                form.find_message_mut(class_name, &name)
            } else {
                Some(form.insert_message(
                    id,
                    options.message_position,
                    MessageNode::new(class_name, &name),
                ))
            };
            if let Some(node) = node {
                node.show(text, transition);
            }
            form.notify(NotificationKind::Invalid, EventTarget::Control(id));
            false
        }
        None => {
            if let Some(node) = form.find_message_mut(&options.message_class_name, &name) {
                node.hide(transition);
            }
            true
        }
    }
}
