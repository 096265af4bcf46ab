use std::cell::RefCell;
use std::fs;
use std::sync::Once;

use log::{Level, Log, Metadata, Record};

use termform::controller::{ScrollFocusController, ScrollOutcome};
use termform::form::{FormModel, QuestionnaireForm};
use termform::list::ListComposition;
use termform::model::Marker;
use termform::scroll::ScrollView;

thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        RECORDS.with(|r| r.borrow_mut().push((record.level(), record.args().to_string())));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

fn capture() {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).expect("logger already set");
        log::set_max_level(log::LevelFilter::Trace);
    });
    RECORDS.with(|r| r.borrow_mut().clear());
}

fn records_at(level: Level) -> Vec<String> {
    RECORDS.with(|r| {
        r.borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    })
}

fn setup() -> (QuestionnaireForm, ScrollView, ScrollFocusController) {
    let content = fs::read_to_string("fixtures/intake.yaml").expect("Cannot read fixture");
    let q = termform::parser::parse_questionnaire(&content, "intake.yaml", "sha256:test").unwrap();
    let composition = ListComposition::new(q.front_matter.len(), q.items.len(), q.back_matter.len());
    let form = QuestionnaireForm::new(q);
    let mut view = ScrollView::new();
    view.layout(20, vec![3; composition.total()]);
    (form, view, ScrollFocusController::new(composition))
}

#[test]
fn test_unknown_link_id_logs_warning() {
    capture();
    let (form, mut view, mut c) = setup();
    c.on_data_available(&form, &view);

    let outcome = c.scroll_to_marker(&Marker::new("not-there"), &form, &mut view);
    assert_eq!(outcome, ScrollOutcome::UnknownLinkId);
    assert!(!view.is_animating());

    let warnings = records_at(Level::Warn);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("not-there"));
}

#[test]
fn test_marker_before_load_logs_info() {
    capture();
    let (form, mut view, mut c) = setup();

    let outcome = c.scroll_to_marker(&Marker::new("naps"), &form, &mut view);
    assert_eq!(outcome, ScrollOutcome::NotLoaded);
    assert!(!view.is_animating());
    assert!(records_at(Level::Warn).is_empty());
    assert!(records_at(Level::Info)
        .iter()
        .any(|m| m.contains("not loaded")));
}

#[test]
fn test_marker_stream_with_unknown_id_is_ignored() {
    capture();
    let (form, mut view, mut c) = setup();
    c.on_data_available(&form, &view);

    form.raise_marker("ghost");
    c.pump(&form, &mut view);
    assert!(!view.is_animating());
    assert_eq!(records_at(Level::Warn).len(), 1);

    form.raise_marker("contact");
    c.pump(&form, &mut view);
    assert!(view.is_animating());
    assert!(form.markers().latest().is_some());
}
