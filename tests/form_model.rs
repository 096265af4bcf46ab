use std::fs;

use termform::form::{FormModel, QuestionnaireForm};
use termform::model::Marker;

fn intake() -> QuestionnaireForm {
    let content = fs::read_to_string("fixtures/intake.yaml").expect("Cannot read fixture");
    let q = termform::parser::parse_questionnaire(&content, "intake.yaml", "sha256:test").unwrap();
    QuestionnaireForm::new(q)
}

#[test]
fn test_item_flags() {
    let form = intake();

    let intro = form.item_at(0).unwrap();
    assert!(intro.is_read_only);
    assert!(!intro.is_unanswered);

    let clinic = form.item_at(1).unwrap();
    assert!(clinic.is_read_only);
    assert!(!clinic.is_invalid);

    let phq1 = form.item_at(2).unwrap();
    assert!(phq1.is_unanswered);
    // required but not flagged until validation runs
    assert!(!phq1.is_invalid);
    assert!(!phq1.is_read_only);
}

#[test]
fn test_index_of() {
    let form = intake();
    assert_eq!(form.index_of(&|i| i.link_id == "naps"), Some(5));
    assert_eq!(form.index_of(&|i| i.link_id == "missing"), None);
    assert_eq!(form.index_of(&|i| i.is_unanswered || i.is_invalid), Some(2));
    assert_eq!(form.index_of(&|i| !i.is_read_only), Some(2));
}

#[test]
fn test_constraint_violations_are_invalid() {
    let mut form = intake();
    form.set_answer(4, "30").unwrap();
    assert!(form.item_at(4).unwrap().is_invalid);
    assert_eq!(form.problem(4).as_deref(), Some("Must be at most 24"));

    form.set_answer(4, "7").unwrap();
    assert!(!form.item_at(4).unwrap().is_invalid);
    assert!(!form.item_at(4).unwrap().is_unanswered);

    form.set_answer(8, "0123456789012345678901").unwrap();
    assert_eq!(form.problem(8).as_deref(), Some("At most 20 characters"));
}

#[test]
fn test_read_only_items_reject_edits() {
    let mut form = intake();
    assert!(form.set_answer(1, "elsewhere").is_err());
    assert!(form.clear_answer(0).is_err());
    assert_eq!(form.answer("clinic"), Some("North Valley Family Practice"));
}

#[test]
fn test_typed_editing() {
    let mut form = intake();
    for c in "1x2".chars() {
        form.push_char(6, c).unwrap();
    }
    // integers ignore non-digits
    assert_eq!(form.answer("caffeine"), Some("12"));
    form.pop_char(6).unwrap();
    form.pop_char(6).unwrap();
    assert_eq!(form.answer("caffeine"), None);

    form.push_char(7, 'a').unwrap();
    form.push_char(7, '\n').unwrap();
    form.push_char(7, 'b').unwrap();
    assert_eq!(form.answer("medications"), Some("a\nb"));

    assert!(form.push_char(5, 'y').is_err());
}

#[test]
fn test_toggle_and_cycle() {
    let mut form = intake();
    form.toggle_boolean(5).unwrap();
    assert_eq!(form.answer("naps"), Some("yes"));
    form.toggle_boolean(5).unwrap();
    assert_eq!(form.answer("naps"), Some("no"));
    assert!(form.toggle_boolean(2).is_err());

    form.cycle_choice(2, -1).unwrap();
    assert_eq!(form.answer("phq-1"), Some("3"));
    form.cycle_choice(2, 1).unwrap();
    assert_eq!(form.answer("phq-1"), Some("0"));
    form.cycle_choice(2, 1).unwrap();
    assert_eq!(form.answer("phq-1"), Some("1"));
}

#[test]
fn test_validate_raises_markers_in_form_order() {
    let mut form = intake();
    let sub = form.markers().subscribe();
    form.set_answer(3, "2").unwrap();

    let invalid = form.validate();
    assert_eq!(invalid, vec!["phq-1".to_string(), "sleep-hours".to_string()]);
    assert!(form.is_validated());
    assert!(form.item_at(2).unwrap().is_invalid);
    assert_eq!(form.problem(2).as_deref(), Some("An answer is required"));

    let batch = form.markers().take_next(sub).unwrap();
    assert_eq!(batch[0], Marker::new("phq-1"));
    assert_eq!(batch.len(), 2);
}

#[test]
fn test_validate_without_problems_raises_nothing() {
    let mut form = intake();
    let sub = form.markers().subscribe();
    form.set_answer(2, "0").unwrap();
    form.set_answer(3, "0").unwrap();
    form.set_answer(4, "8").unwrap();
    assert!(form.validate().is_empty());
    assert_eq!(form.markers().take_next(sub), None);
}

#[test]
fn test_status_counts() {
    let mut form = intake();
    form.set_answer(4, "99").unwrap();
    let counts = form.status_counts();
    assert_eq!(counts.read_only, 2);
    assert_eq!(counts.answered, 1);
    assert_eq!(counts.unanswered, 6);
    assert_eq!(counts.invalid, 1);
}

#[test]
fn test_next_editable_skips_read_only() {
    let form = intake();
    assert_eq!(form.next_editable(None, 1), Some(2));
    assert_eq!(form.next_editable(Some(2), -1), None);
    assert_eq!(form.next_editable(None, -1), Some(8));
    assert_eq!(form.next_editable(Some(8), 1), None);
}
