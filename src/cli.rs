use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "termform", version, about = "Terminal questionnaire form filler")]
pub struct Cli {
    /// Questionnaire definition (YAML)
    pub path: String,

    /// Clear saved answers and start fresh
    #[arg(long)]
    pub clear: bool,

    /// Show current progress without entering TUI
    #[arg(long)]
    pub status: bool,

    /// Export current answers to file (for backup)
    #[arg(long, value_name = "path")]
    pub export: Option<String>,

    /// Scroll to this item once the form is on screen
    #[arg(long, value_name = "linkId")]
    pub jump: Option<String>,

    /// Write log output here (filtered by RUST_LOG, default info)
    #[arg(long, value_name = "path")]
    pub log_file: Option<String>,
}
