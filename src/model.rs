use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Questionnaire {
    pub title: String,
    #[serde(default)]
    pub front_matter: Vec<String>,
    #[serde(default)]
    pub back_matter: Vec<String>,
    pub items: Vec<Item>,
    #[serde(skip)]
    pub source_file: String,
    #[serde(skip)]
    pub source_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub link_id: String,
    pub text: String,
    #[serde(default)]
    pub kind: ItemKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub min: Option<i64>,
    #[serde(default)]
    pub max: Option<i64>,
    #[serde(default)]
    pub initial: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Display,
    Boolean,
    #[default]
    String,
    Text,
    Integer,
    Choice,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerOption {
    pub code: String,
    pub display: String,
}

/// A request to bring a specific item into view, identified by its stable id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub link_id: String,
}

impl Marker {
    pub fn new(link_id: impl Into<String>) -> Self {
        Self {
            link_id: link_id.into(),
        }
    }
}

/// Per-item flags the form-filling screen works from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub link_id: String,
    pub is_unanswered: bool,
    pub is_invalid: bool,
    pub is_read_only: bool,
}

pub const BOOLEAN_YES: &str = "yes";
pub const BOOLEAN_NO: &str = "no";
