use std::path::PathBuf;

use ratatui::layout::Rect;

use crate::controller::{ListEntry, ScrollFocusController};
use crate::form::{FormModel, QuestionnaireForm, StatusCounts};
use crate::list::ListComposition;
use crate::model::ItemKind;
use crate::scroll::ScrollView;

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Navigation,
    TextInput,
}

#[derive(Debug)]
pub struct AppState {
    pub form: QuestionnaireForm,
    pub controller: ScrollFocusController,
    pub view: ScrollView,
    /// Entries built for the current frame with the viewport row of their
    /// first line.
    pub entries: Vec<(ListEntry, i32)>,
    /// Main-segment index of the item receiving input.
    pub focused: Option<usize>,
    pub input_mode: InputMode,
    pub message: Option<String>,
    pub dirty: bool,
    pub should_quit: bool,
    pub state_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(form: QuestionnaireForm, state_dir: Option<PathBuf>) -> Self {
        let q = &form.questionnaire;
        let composition =
            ListComposition::new(q.front_matter.len(), q.items.len(), q.back_matter.len());
        Self {
            controller: ScrollFocusController::new(composition),
            form,
            view: ScrollView::new(),
            entries: Vec::new(),
            focused: None,
            input_mode: InputMode::Navigation,
            message: None,
            dirty: false,
            should_quit: false,
            state_dir,
        }
    }

    /// Lay out the list for `list_area` and build the visible entries.
    /// Must run before drawing each frame.
    pub fn prepare_frame(&mut self, list_area: Rect) {
        self.controller.on_data_available(&self.form, &self.view);

        let width = list_area.width.saturating_sub(1);
        let composition = self.controller.composition();
        let extents: Vec<u16> = (0..composition.total())
            .map(|i| crate::ui::form::entry_height(self, composition.locate(i), width))
            .collect();
        self.view.layout(list_area.height, extents);

        self.entries = self
            .view
            .visible_items()
            .into_iter()
            .map(|(index, row)| (self.controller.build_item(index), row))
            .collect();
    }

    /// Dispatch list and marker events, then run work deferred past the
    /// frame that was just drawn.
    pub fn finish_frame(&mut self) {
        self.controller.pump(&self.form, &mut self.view);
        if let Some(index) = self.controller.run_post_frame(&mut self.view) {
            if self.focused.is_none() {
                self.set_focus(index);
            }
        }
    }

    pub fn set_focus(&mut self, index: usize) {
        if index >= self.form.len() {
            return;
        }
        self.focused = Some(index);
        self.controller.claim_focus();
        self.input_mode = match self.form.item(index).map(|i| i.kind) {
            Some(ItemKind::String | ItemKind::Text | ItemKind::Integer) => InputMode::TextInput,
            _ => InputMode::Navigation,
        };
    }

    /// Move focus to the next editable item in `step`'s direction and keep
    /// it on screen.
    pub fn move_focus(&mut self, step: i32) {
        if let Some(next) = self.form.next_editable(self.focused, step) {
            self.set_focus(next);
            let global = self.controller.composition().main_to_global(next);
            self.view.ensure_visible(global);
        }
    }

    pub fn validate(&mut self) {
        let invalid = self.form.validate();
        if invalid.is_empty() {
            self.message = Some("All answers are valid".to_string());
            return;
        }
        self.message = Some(format!("{} item(s) need attention", invalid.len()));
        if let Some(first) = invalid.first() {
            if let Some(index) = self.form.index_of(&|item| item.link_id == *first) {
                self.set_focus(index);
            }
        }
    }

    pub fn status_counts(&self) -> StatusCounts {
        self.form.status_counts()
    }

    pub fn is_focused(&self, index: usize) -> bool {
        self.focused == Some(index)
    }

    pub fn dispose(&mut self) {
        self.controller.dispose(&self.form, &self.view);
    }
}
