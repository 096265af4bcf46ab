use std::fs::File;
use std::path::Path;

use clap::Parser;

use termform::cli::Cli;
use termform::form::QuestionnaireForm;
use termform::persist::{self, compute_file_hash, state_dir_for};
use termform::state::AppState;
use termform::{parser, tui};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();

    if let Some(ref log_file) = cli.log_file {
        init_logging(log_file)?;
    }

    let path = Path::new(&cli.path);
    let hash = compute_file_hash(path)?;
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read questionnaire: {}", e))?;
    let file_name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let questionnaire = parser::parse_questionnaire(&content, &file_name, &hash)?;
    let mut form = QuestionnaireForm::new(questionnaire);

    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let state_dir = state_dir_for(&canonical);

    if cli.clear {
        persist::clear_state(&state_dir)?;
        eprintln!("State cleared.");
    } else {
        match persist::load_answers(&mut form, &state_dir) {
            Ok(true) => log::info!("restored answers from {}", state_dir.display()),
            Ok(false) => {}
            Err(e) => eprintln!("Warning: {}", e),
        }
    }

    if cli.status {
        persist::print_status(&form);
        return Ok(());
    }

    if let Some(ref export_path) = cli.export {
        persist::export_answers(&form, export_path)?;
        eprintln!("Answers exported to {}", export_path);
        return Ok(());
    }

    let state = AppState::new(form, Some(state_dir));
    tui::run_tui(state, cli.jump)?;

    Ok(())
}

/// Logs go to a file only; the TUI owns the terminal.
fn init_logging(path: &str) -> Result<(), String> {
    let file = File::create(path).map_err(|e| format!("Cannot open log file: {}", e))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(|e| format!("Cannot initialise logging: {}", e))
}
