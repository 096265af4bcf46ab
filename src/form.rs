use std::collections::HashMap;

use crate::model::*;
use crate::observe::Observable;

/// What the scroll/focus controller needs from a form.
pub trait FormModel {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the first item matching `predicate`.
    fn index_of(&self, predicate: &dyn Fn(&ItemView) -> bool) -> Option<usize>;

    fn item_at(&self, index: usize) -> Option<ItemView>;

    /// Scroll requests raised by validation or the command line.
    fn markers(&self) -> &Observable<Vec<Marker>>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusCounts {
    pub answered: usize,
    pub unanswered: usize,
    pub invalid: usize,
    pub read_only: usize,
}

/// A parsed questionnaire plus the answers entered so far.
#[derive(Debug)]
pub struct QuestionnaireForm {
    pub questionnaire: Questionnaire,
    answers: HashMap<String, String>,
    validated: bool,
    markers: Observable<Vec<Marker>>,
}

impl QuestionnaireForm {
    pub fn new(questionnaire: Questionnaire) -> Self {
        let answers = questionnaire
            .items
            .iter()
            .filter_map(|item| {
                item.initial
                    .as_ref()
                    .map(|v| (item.link_id.clone(), v.clone()))
            })
            .collect();
        Self {
            questionnaire,
            answers,
            validated: false,
            markers: Observable::new(),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.questionnaire.items
    }

    pub fn item(&self, index: usize) -> Option<&Item> {
        self.questionnaire.items.get(index)
    }

    pub fn answer(&self, link_id: &str) -> Option<&str> {
        self.answers.get(link_id).map(|s| s.as_str())
    }

    pub fn answers(&self) -> &HashMap<String, String> {
        &self.answers
    }

    pub fn is_validated(&self) -> bool {
        self.validated
    }

    pub fn view_of(&self, item: &Item) -> ItemView {
        let read_only = is_read_only(item);
        let answer = self.answer(&item.link_id).filter(|a| !a.trim().is_empty());
        let unanswered = !read_only && answer.is_none();
        let invalid = !read_only
            && match answer {
                Some(a) => constraint_error(item, a).is_some(),
                None => self.validated && item.required,
            };
        ItemView {
            link_id: item.link_id.clone(),
            is_unanswered: unanswered,
            is_invalid: invalid,
            is_read_only: read_only,
        }
    }

    /// Human-readable reason the item is invalid, if it is.
    pub fn problem(&self, index: usize) -> Option<String> {
        let item = self.item(index)?;
        if is_read_only(item) {
            return None;
        }
        match self.answer(&item.link_id).filter(|a| !a.trim().is_empty()) {
            Some(a) => constraint_error(item, a),
            None if self.validated && item.required => Some("An answer is required".to_string()),
            None => None,
        }
    }

    pub fn set_answer(&mut self, index: usize, value: &str) -> Result<(), String> {
        let link_id = self.editable_link_id(index)?;
        if value.is_empty() {
            self.answers.remove(&link_id);
        } else {
            self.answers.insert(link_id, value.to_string());
        }
        Ok(())
    }

    pub fn clear_answer(&mut self, index: usize) -> Result<(), String> {
        let link_id = self.editable_link_id(index)?;
        self.answers.remove(&link_id);
        Ok(())
    }

    pub fn push_char(&mut self, index: usize, c: char) -> Result<(), String> {
        let item = self.text_item(index)?;
        if item.kind == ItemKind::Integer && !(c.is_ascii_digit() || c == '-') {
            return Ok(());
        }
        if c == '\n' && item.kind != ItemKind::Text {
            return Ok(());
        }
        let link_id = item.link_id.clone();
        self.answers.entry(link_id).or_default().push(c);
        Ok(())
    }

    pub fn pop_char(&mut self, index: usize) -> Result<(), String> {
        let link_id = self.text_item(index)?.link_id.clone();
        if let Some(text) = self.answers.get_mut(&link_id) {
            text.pop();
            if text.is_empty() {
                self.answers.remove(&link_id);
            }
        }
        Ok(())
    }

    pub fn toggle_boolean(&mut self, index: usize) -> Result<(), String> {
        let link_id = self.editable_link_id(index)?;
        if self.items()[index].kind != ItemKind::Boolean {
            return Err(format!("Item '{}' is not a yes/no item", link_id));
        }
        let next = match self.answer(&link_id) {
            Some(BOOLEAN_YES) => BOOLEAN_NO,
            _ => BOOLEAN_YES,
        };
        self.answers.insert(link_id, next.to_string());
        Ok(())
    }

    /// Move the selected option by `delta`, wrapping around. With nothing
    /// selected, a forward step picks the first option and a backward step
    /// the last.
    pub fn cycle_choice(&mut self, index: usize, delta: i32) -> Result<(), String> {
        let link_id = self.editable_link_id(index)?;
        let item = &self.questionnaire.items[index];
        if item.kind != ItemKind::Choice || item.options.is_empty() {
            return Err(format!("Item '{}' is not a choice item", link_id));
        }
        let n = item.options.len() as i32;
        let current = self
            .answer(&link_id)
            .and_then(|a| item.options.iter().position(|o| o.code == a));
        let next = match current {
            Some(pos) => (pos as i32 + delta).rem_euclid(n),
            None if delta < 0 => n - 1,
            None => 0,
        };
        let code = item.options[next as usize].code.clone();
        self.answers.insert(link_id, code);
        Ok(())
    }

    /// Run validation. Invalid items are returned in form order and raised
    /// as markers so the screen can bring the first one into view.
    pub fn validate(&mut self) -> Vec<String> {
        self.validated = true;
        let invalid: Vec<String> = self
            .items()
            .iter()
            .map(|item| self.view_of(item))
            .filter(|v| v.is_invalid)
            .map(|v| v.link_id)
            .collect();
        if !invalid.is_empty() {
            log::info!("validation found {} invalid item(s)", invalid.len());
            self.markers
                .emit(invalid.iter().map(|id| Marker::new(id.clone())).collect());
        }
        invalid
    }

    pub fn raise_marker(&self, link_id: &str) {
        self.markers.emit(vec![Marker::new(link_id)]);
    }

    /// Replace all answers, e.g. from a saved session. Unknown ids are dropped.
    pub fn restore_answers(&mut self, answers: HashMap<String, String>) {
        let known: Vec<&str> = self
            .questionnaire
            .items
            .iter()
            .map(|i| i.link_id.as_str())
            .collect();
        self.answers = answers
            .into_iter()
            .filter(|(k, _)| {
                let keep = known.contains(&k.as_str());
                if !keep {
                    log::warn!("dropping saved answer for unknown item '{}'", k);
                }
                keep
            })
            .collect();
    }

    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for item in self.items() {
            let view = self.view_of(item);
            if view.is_read_only {
                counts.read_only += 1;
                continue;
            }
            if view.is_invalid {
                counts.invalid += 1;
            }
            if view.is_unanswered {
                counts.unanswered += 1;
            } else {
                counts.answered += 1;
            }
        }
        counts
    }

    /// Next editable item after (or before, with `step < 0`) `from`.
    pub fn next_editable(&self, from: Option<usize>, step: i32) -> Option<usize> {
        let n = self.len() as i64;
        let mut i = match from {
            Some(f) => f as i64 + step as i64,
            None if step < 0 => n - 1,
            None => 0,
        };
        while (0..n).contains(&i) {
            if !is_read_only(&self.questionnaire.items[i as usize]) {
                return Some(i as usize);
            }
            i += step.signum() as i64;
        }
        None
    }

    fn editable_link_id(&self, index: usize) -> Result<String, String> {
        let item = self
            .item(index)
            .ok_or_else(|| format!("No item at index {}", index))?;
        if is_read_only(item) {
            return Err(format!("Item '{}' is read-only", item.link_id));
        }
        Ok(item.link_id.clone())
    }

    fn text_item(&self, index: usize) -> Result<&Item, String> {
        self.editable_link_id(index)?;
        let item = &self.questionnaire.items[index];
        match item.kind {
            ItemKind::String | ItemKind::Text | ItemKind::Integer => Ok(item),
            _ => Err(format!("Item '{}' does not take typed input", item.link_id)),
        }
    }
}

impl FormModel for QuestionnaireForm {
    fn len(&self) -> usize {
        self.questionnaire.items.len()
    }

    fn index_of(&self, predicate: &dyn Fn(&ItemView) -> bool) -> Option<usize> {
        self.items()
            .iter()
            .position(|item| predicate(&self.view_of(item)))
    }

    fn item_at(&self, index: usize) -> Option<ItemView> {
        self.item(index).map(|item| self.view_of(item))
    }

    fn markers(&self) -> &Observable<Vec<Marker>> {
        &self.markers
    }
}

pub fn is_read_only(item: &Item) -> bool {
    item.read_only || item.kind == ItemKind::Display
}

fn constraint_error(item: &Item, answer: &str) -> Option<String> {
    match item.kind {
        ItemKind::Display => None,
        ItemKind::Boolean => {
            if answer == BOOLEAN_YES || answer == BOOLEAN_NO {
                None
            } else {
                Some("Answer yes or no".to_string())
            }
        }
        ItemKind::String | ItemKind::Text => match item.max_length {
            Some(max) if answer.chars().count() > max => {
                Some(format!("At most {} characters", max))
            }
            _ => None,
        },
        ItemKind::Integer => match answer.trim().parse::<i64>() {
            Err(_) => Some("Enter a whole number".to_string()),
            Ok(v) => match (item.min, item.max) {
                (Some(min), _) if v < min => Some(format!("Must be at least {}", min)),
                (_, Some(max)) if v > max => Some(format!("Must be at most {}", max)),
                _ => None,
            },
        },
        ItemKind::Choice => {
            if item.options.iter().any(|o| o.code == answer) {
                None
            } else {
                Some(format!("'{}' is not one of the options", answer))
            }
        }
    }
}
