use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::form::QuestionnaireForm;

const ANSWERS_FILE: &str = "answers.yaml";

#[derive(Debug, Serialize, Deserialize)]
pub struct SavedAnswers {
    pub questionnaire: String,
    pub questionnaire_hash: String,
    pub saved_at: DateTime<Local>,
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
}

/// Per-questionnaire directory for saved sessions.
pub fn state_dir_for(canonical_path: &Path) -> PathBuf {
    let key = compute_str_hash(&canonical_path.to_string_lossy());
    let short = key.trim_start_matches("sha256:").chars().take(16).collect::<String>();
    let base = ProjectDirs::from("", "", "termform")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("termform"));
    base.join("forms").join(short)
}

pub fn build_answers_yaml(form: &QuestionnaireForm) -> Result<String, String> {
    let saved = SavedAnswers {
        questionnaire: form.questionnaire.source_file.clone(),
        questionnaire_hash: form.questionnaire.source_hash.clone(),
        saved_at: Local::now(),
        answers: form
            .answers()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    };
    serde_yaml::to_string(&saved).map_err(|e| format!("Cannot encode answers: {}", e))
}

pub fn save_answers(form: &QuestionnaireForm, state_dir: &Path) -> Result<(), String> {
    fs::create_dir_all(state_dir)
        .map_err(|e| format!("Cannot create state dir: {}", e))?;
    let yaml = build_answers_yaml(form)?;
    atomic_write(&state_dir.join(ANSWERS_FILE), &yaml)?;
    log::debug!("saved {} answer(s) to {}", form.answers().len(), state_dir.display());
    Ok(())
}

/// Restore saved answers. Returns false when nothing was saved yet.
pub fn load_answers(form: &mut QuestionnaireForm, state_dir: &Path) -> Result<bool, String> {
    let path = state_dir.join(ANSWERS_FILE);
    if !path.exists() {
        return Ok(false);
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| format!("Cannot read {}: {}", ANSWERS_FILE, e))?;
    let saved: SavedAnswers = serde_yaml::from_str(&content)
        .map_err(|e| format!("Corrupt {}: {} (use --clear to reset)", ANSWERS_FILE, e))?;

    if saved.questionnaire_hash != form.questionnaire.source_hash {
        return Err(
            "Questionnaire has changed since last session. Use --clear to reset.".to_string(),
        );
    }

    let answers: HashMap<String, String> = saved.answers.into_iter().collect();
    form.restore_answers(answers);
    Ok(true)
}

pub fn clear_state(state_dir: &Path) -> Result<(), String> {
    if state_dir.exists() {
        fs::remove_dir_all(state_dir).map_err(|e| format!("Cannot clear state: {}", e))?;
    }
    Ok(())
}

fn atomic_write(path: &Path, content: &str) -> Result<(), String> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content).map_err(|e| format!("Cannot write {}: {}", tmp.display(), e))?;
    fs::rename(&tmp, path).map_err(|e| format!("Cannot rename: {}", e))?;
    Ok(())
}

pub fn export_answers(form: &QuestionnaireForm, path: &str) -> Result<(), String> {
    let yaml = build_answers_yaml(form)?;
    fs::write(path, &yaml).map_err(|e| format!("Cannot export: {}", e))?;
    Ok(())
}

pub fn print_status(form: &QuestionnaireForm) {
    let counts = form.status_counts();
    println!("Questionnaire: {}", form.questionnaire.title);
    println!("Items: {}", form.questionnaire.items.len());
    println!(
        "  Answered: {}, Unanswered: {}, Invalid: {}, Read-only: {}",
        counts.answered, counts.unanswered, counts.invalid, counts.read_only
    );
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn compute_file_hash(path: &Path) -> Result<String, String> {
    let content =
        fs::read(path).map_err(|e| format!("Cannot read file {}: {}", path.display(), e))?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    let result = hasher.finalize();
    Ok(format!("sha256:{}", hex_encode(&result)))
}

pub fn compute_str_hash(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    let result = hasher.finalize();
    format!("sha256:{}", hex_encode(&result))
}
