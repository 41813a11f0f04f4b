use crate::protocol::{MAX_COMMENTS, MIN_COMMENTS};
use clap::Parser;

#[derive(Parser)]
#[command(name = "toxilens")]
#[command(version = "0.3.0")]
#[command(about = "YouTube comment toxicity analysis from the terminal")]
pub struct Args {
    /// Video URL to analyze (or comment text with --comment)
    pub target: Option<String>,

    /// Analyze a single comment instead of a full video
    #[arg(long, short)]
    pub comment: bool,

    /// List prior analyses instead of launching a new one
    #[arg(long)]
    pub history: bool,

    /// Probe the classifier's health endpoint and exit
    #[arg(long)]
    pub health: bool,

    /// How many comments to analyze (clamped to the backend's 5..=1000 range)
    #[arg(long, default_value = "50")]
    pub max_comments: u32,

    /// Backend base URL; falls back to $TOXILENS_BASE_URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Emit raw JSON instead of formatted output
    #[arg(long)]
    pub json: bool,
}

/// Resolve the backend base URL: explicit flag, then environment, then the
/// local default.
pub fn resolve_base_url(flag: Option<&str>) -> String {
    flag.map(String::from)
        .or_else(|| std::env::var("TOXILENS_BASE_URL").ok())
        .unwrap_or_else(|| "http://localhost:8000".to_string())
}

/// Clamp the requested comment count into the backend's accepted range.
/// This is the front-end's concern — the client re-validates before sending.
pub fn clamp_max_comments(value: u32) -> u32 {
    value.clamp(MIN_COMMENTS, MAX_COMMENTS)
}
