use std::fs;
use std::path::PathBuf;

use termform::form::QuestionnaireForm;
use termform::persist;

fn intake(hash: &str) -> QuestionnaireForm {
    let content = fs::read_to_string("fixtures/intake.yaml").expect("Cannot read fixture");
    let q = termform::parser::parse_questionnaire(&content, "intake.yaml", hash).unwrap();
    QuestionnaireForm::new(q)
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn test_save_and_restore_answers() {
    let dir = temp_dir("termform_test_roundtrip");
    let hash = persist::compute_file_hash(std::path::Path::new("fixtures/intake.yaml")).unwrap();
    assert!(hash.starts_with("sha256:"));

    let mut form = intake(&hash);
    form.set_answer(2, "3").unwrap();
    form.set_answer(7, "melatonin\n5mg").unwrap();
    persist::save_answers(&form, &dir).unwrap();

    let yaml = fs::read_to_string(dir.join("answers.yaml")).unwrap();
    assert!(yaml.contains("questionnaire: intake.yaml"));
    assert!(yaml.contains("saved_at:"));
    assert!(yaml.contains("phq-1"));

    let mut restored = intake(&hash);
    assert!(persist::load_answers(&mut restored, &dir).unwrap());
    assert_eq!(restored.answer("phq-1"), Some("3"));
    assert_eq!(restored.answer("medications"), Some("melatonin\n5mg"));
    assert_eq!(restored.answer("clinic"), Some("North Valley Family Practice"));

    persist::clear_state(&dir).unwrap();
    assert!(!dir.exists());
}

#[test]
fn test_missing_state_is_not_an_error() {
    let dir = temp_dir("termform_test_missing");
    let mut form = intake("sha256:a");
    assert!(!persist::load_answers(&mut form, &dir).unwrap());
}

#[test]
fn test_changed_questionnaire_is_rejected() {
    let dir = temp_dir("termform_test_changed");
    let form = intake("sha256:old");
    persist::save_answers(&form, &dir).unwrap();

    let mut changed = intake("sha256:new");
    let err = persist::load_answers(&mut changed, &dir).unwrap_err();
    assert!(err.contains("--clear"));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_state_dir_is_stable_per_path() {
    let a = persist::state_dir_for(std::path::Path::new("/tmp/a.yaml"));
    let b = persist::state_dir_for(std::path::Path::new("/tmp/a.yaml"));
    let c = persist::state_dir_for(std::path::Path::new("/tmp/c.yaml"));
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a.to_string_lossy().contains("forms"));
}
