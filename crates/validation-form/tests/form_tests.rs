//! Integration tests for validation-form
//!
//! Drive a form the way a host would: build controls, attach validation,
//! dispatch change/blur/submit events and inspect classes, message nodes and
//! notifications.

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use validation_form::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn signup_form() -> (Form, NodeId, NodeId, NodeId) {
    init_tracing();
    let mut form = Form::new().with_action("/signup").with_method("post");
    let email = form.push(Control::input(InputType::Email, "email").with_rules("required;email()"));
    let password = form.push(Control::input(InputType::Password, "password").with_rules("required;length(8,64)"));
    let confirm = form.push(
        Control::input(InputType::Password, "confirm").with_rules("required;equals(password)"),
    );
    form.validation_form(Options::default()).unwrap();
    (form, email, password, confirm)
}

fn kinds(form: &mut Form) -> Vec<(NotificationKind, EventTarget)> {
    form.take_notifications()
        .into_iter()
        .map(|n| (n.kind, n.target))
        .collect()
}

#[test]
fn test_submit_with_empty_required_field_is_cancelled() {
    let (mut form, email, password, confirm) = signup_form();
    form.set_value(password, "correct horse");
    form.set_value(confirm, "correct horse");

    let outcome = form.dispatch(&Event::submit());
    assert!(outcome.handled);
    assert!(outcome.default_prevented);

    assert_eq!(
        kinds(&mut form),
        vec![
            (NotificationKind::Invalid, EventTarget::Control(email)),
            (NotificationKind::Error, EventTarget::Form),
        ]
    );
    assert!(form.control(email).unwrap().has_class("invalid"));
    assert!(form.control(password).unwrap().has_class("valid"));

    // Fix the field and submit again
    form.set_value(email, "taro@example.com");
    let outcome = form.dispatch(&Event::submit());
    assert!(!outcome.default_prevented);
    assert_eq!(kinds(&mut form), vec![(NotificationKind::Validated, EventTarget::Form)]);

    let message = form.find_message("validation-message", "email").unwrap();
    assert_eq!(message.visibility, Visibility::Hidden);
}

#[test]
fn test_submit_option_false_always_prevents_default() {
    let mut form = Form::new();
    form.push(Control::text("name").with_value("ok"));
    form.validation_form(Options::with_overrides(json!({ "submit": false })).unwrap())
        .unwrap();

    let outcome = form.dispatch(&Event::submit());
    assert!(outcome.default_prevented);
    assert_eq!(kinds(&mut form), vec![(NotificationKind::Validated, EventTarget::Form)]);
}

#[test]
fn test_change_validates_single_field() {
    let (mut form, email, password, _) = signup_form();
    form.set_value(email, "not-an-email");

    let outcome = form.dispatch(&Event::change(email));
    assert!(outcome.handled);
    assert!(!outcome.default_prevented);

    assert!(form.control(email).unwrap().has_class("invalid"));
    assert!(form.control(password).unwrap().classes().next().is_none());
    assert_eq!(form.messages().count(), 1);
}

#[test]
fn test_untriggered_events_are_ignored() {
    let (mut form, email, _, _) = signup_form();
    let outcome = form.dispatch(&Event::input(email));
    assert_eq!(outcome, DispatchOutcome::default());
    assert_eq!(form.messages().count(), 0);
}

#[rstest]
#[case("change blur", "change", true)]
#[case("change blur", "blur", true)]
#[case("change blur", "input", false)]
#[case("input", "input", true)]
#[case("input", "blur", false)]
#[case("  keyup   change ", "keyup", true)]
fn test_validate_event_option(#[case] validate_event: &str, #[case] event: &str, #[case] handled: bool) {
    let mut form = Form::new();
    let id = form.push(Control::text("zip").with_rules("integer()").with_value("12a"));
    form.validation_form(Options::with_overrides(json!({ "validateEvent": validate_event })).unwrap())
        .unwrap();

    let outcome = form.dispatch(&Event::new(event, EventTarget::Control(id)));
    assert_eq!(outcome.handled, handled);
    assert_eq!(form.control(id).unwrap().has_class("invalid"), handled);
}

#[test]
fn test_unnamed_controls_are_not_validated() {
    let mut form = Form::new();
    let id = form.push(Control::new(ControlKind::Textarea).with_rules("required"));
    form.validation_form(Options::default()).unwrap();

    assert!(!form.dispatch(&Event::change(id)).handled);
    assert!(!form.dispatch(&Event::submit()).default_prevented);
}

#[test]
fn test_equals_pair() {
    let (mut form, _, password, confirm) = signup_form();
    form.set_value(password, "x".repeat(8));
    form.set_value(confirm, "y".repeat(8));

    assert_eq!(form.validate(confirm), Some(false));
    let message = form.find_message("validation-message", "confirm").unwrap();
    assert!(message.is_visible());

    form.set_value(confirm, "x".repeat(8));
    assert_eq!(form.validate(confirm), Some(true));
}

#[test]
fn test_changing_equals_target_revalidates_dependent() {
    let (mut form, _, password, confirm) = signup_form();
    form.set_value(password, "secret-one");
    form.set_value(confirm, "secret-one");
    assert_eq!(form.validate(confirm), Some(true));

    // confirm's rules are cached now, so editing password revalidates it
    form.set_value(password, "secret-two");
    assert_eq!(form.validate(password), Some(true));
    assert!(form.control(confirm).unwrap().has_class("invalid"));
    assert!(form.find_message("validation-message", "confirm").unwrap().is_visible());
}

#[test]
fn test_mutual_equals_terminates() {
    let mut form = Form::new();
    let a = form.push(Control::text("a").with_rules("equals(b)").with_value("1"));
    let b = form.push(Control::text("b").with_rules("equals(a)").with_value("2"));
    form.validation_form(Options::default()).unwrap();

    assert_eq!(form.validate(a), Some(false));
    assert_eq!(form.validate(b), Some(false));

    form.set_value(b, "1");
    assert_eq!(form.validate(a), Some(true));
    assert!(form.control(b).unwrap().has_class("valid"));
}

#[test]
fn test_filters_run_before_rules() {
    let mut form = Form::new();
    let id = form.push(
        Control::text("code")
            .with_filters("zenhan();trim()")
            .with_rules("required;integer()")
            .with_value("  １２３  "),
    );
    form.validation_form(Options::default()).unwrap();

    assert_eq!(form.validate(id), Some(true));
    assert_eq!(form.value(id), Some("123"));
}

#[test]
fn test_whitespace_only_required_field_fails_after_trim() {
    let mut form = Form::new();
    let id = form.push(Control::text("name").with_filters("trim()").with_rules("required").with_value("   "));
    form.validation_form(Options::default()).unwrap();

    assert_eq!(form.validate(id), Some(false));
    assert_eq!(form.value(id), Some(""));
}

#[test]
fn test_replace_filter() {
    let mut form = Form::new();
    let id = form.push(
        Control::text("tel")
            .with_filters("replace(/-/, '')")
            .with_value("03-1234-5678"),
    );
    form.validation_form(Options::default()).unwrap();

    assert_eq!(form.validate(id), Some(true));
    assert_eq!(form.value(id), Some("031234-5678"));
}

#[test]
fn test_first_failing_rule_sets_message() {
    let mut form = Form::new();
    let id = form.push(Control::text("age").with_rules("integer();range(18,120)").with_value("abc"));
    form.validation_form(
        Options::with_overrides(json!({
            "messages": { "age": { "integer": "Digits only", "range": "18 to 120" } }
        }))
        .unwrap(),
    )
    .unwrap();

    assert_eq!(form.validate(id), Some(false));
    assert_eq!(form.find_message("validation-message", "age").unwrap().text, "Digits only");

    form.set_value(id, "12");
    form.validate(id);
    assert_eq!(form.find_message("validation-message", "age").unwrap().text, "18 to 120");
}

#[test]
fn test_optional_empty_field_is_valid() {
    let mut form = Form::new();
    let id = form.push(Control::text("site").with_rules("url()"));
    form.validation_form(Options::default()).unwrap();

    assert_eq!(form.validate(id), Some(true));
    assert!(form.control(id).unwrap().has_class("valid"));
}

#[test]
fn test_required_checkbox() {
    let mut form = Form::new();
    let id = form.push(Control::checkbox("terms", "yes").with_rules("required"));
    form.validation_form(Options::default()).unwrap();

    assert_eq!(form.validate(id), Some(false));
    form.control_mut(id).unwrap().checked = true;
    assert_eq!(form.validate(id), Some(true));
}

#[test]
fn test_attach_is_idempotent() {
    let mut form = Form::new();
    let id = form.push(Control::text("a").with_rules("required"));
    form.validation_form(Options::with_overrides(json!({ "defaultMessage": "first" })).unwrap())
        .unwrap();
    form.validation_form(Options::with_overrides(json!({ "defaultMessage": "second" })).unwrap())
        .unwrap();

    assert_eq!(form.validator().unwrap().options().default_message, "first");
    form.validate(id);
    assert_eq!(form.find_message("validation-message", "a").unwrap().text, "first");
}

#[test]
fn test_attribute_changes_need_explicit_invalidation() {
    let mut form = Form::new();
    let id = form.push(Control::text("a").with_rules("required"));
    form.validation_form(Options::default()).unwrap();

    assert_eq!(form.validate(id), Some(false));

    form.control_mut(id).unwrap().set_attr("data-validation", "integer()");
    assert_eq!(form.validate(id), Some(false));

    form.validator_mut().unwrap().invalidate_field("a");
    assert_eq!(form.validate(id), Some(true));
}

#[test]
fn test_custom_rule_registration() {
    let mut form = Form::new();
    let id = form.push(Control::text("n").with_rules("even()").with_value("3"));
    form.validation_form(Options::default()).unwrap();
    form.validator_mut()
        .unwrap()
        .registry_mut()
        .register_rule("even", |value: &str, _: &[Arg]| {
            value.parse::<i64>().map(|n| n % 2 == 0).unwrap_or(false)
        });

    assert_eq!(form.validate(id), Some(false));
    form.set_value(id, "4");
    assert_eq!(form.validate(id), Some(true));
}

#[test]
fn test_message_without_fade() {
    let mut form = Form::new();
    let id = form.push(Control::text("a").with_rules("required"));
    form.validation_form(
        Options::with_overrides(json!({
            "messageFade": false,
            "messageDuration": 0,
            "messageClassName": "error-text",
            "messagePosition": "before"
        }))
        .unwrap(),
    )
    .unwrap();

    form.validate(id);
    let message = form.find_message("error-text", "a").unwrap();
    assert_eq!(
        message.transition,
        Some(Transition {
            kind: TransitionKind::Instant,
            duration: std::time::Duration::ZERO,
        })
    );
    assert!(matches!(form.nodes()[0], Node::Message(_)));
}
