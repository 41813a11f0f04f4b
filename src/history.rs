//! Normalization of stored analyses for display, plus dashboard-style
//! rollup statistics over the whole history.

use crate::categories::{map_categories, ToxicCategory};
use crate::protocol::PredictionRow;
use serde::Serialize;

/// Toxicity-rate percentage below which a video counts as safe.
const SAFE_RATE_THRESHOLD: f64 = 15.0;

/// One prior analysis with backend column quirks smoothed over.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: Option<i64>,
    pub video_title: String,
    pub video_url: String,
    pub author: String,
    pub date: Option<String>,
    pub total_comments: u64,
    pub total_replies: u64,
    pub toxicity_rate: f64,
    pub likes: u64,
    /// Category flags resolved through the severity table.
    pub categories: Vec<ToxicCategory>,
}

impl HistoryEntry {
    pub fn from_row(row: &PredictionRow) -> Self {
        HistoryEntry {
            id: row.id,
            video_title: row
                .video_title
                .clone()
                .unwrap_or_else(|| "Video sin título".to_string()),
            video_url: row.video_url.clone().unwrap_or_default(),
            author: row
                .video_author
                .clone()
                .unwrap_or_else(|| "Desconocido".to_string()),
            // created_at superseded inserted_at; older rows only have the latter.
            date: row.created_at.clone().or_else(|| row.inserted_at.clone()),
            total_comments: row.total_comments.unwrap_or(0),
            total_replies: row.total_replies.unwrap_or(0),
            toxicity_rate: row.toxicity_rate.unwrap_or(0.0),
            likes: row.total_likes.unwrap_or(0),
            categories: map_categories(&row.categories_summary),
        }
    }
}

/// Rollup over the full history listing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HistoryStats {
    pub total_videos: usize,
    pub total_comments: u64,
    /// Mean toxicity rate across videos, rounded to two decimals; 0 when
    /// the history is empty.
    pub average_toxicity: f64,
    /// Videos with a rate under the safe threshold.
    pub safe_videos: usize,
}

impl HistoryStats {
    pub fn from_entries(entries: &[HistoryEntry]) -> Self {
        if entries.is_empty() {
            return HistoryStats::default();
        }
        let total_videos = entries.len();
        let total_comments = entries.iter().map(|e| e.total_comments).sum();
        let average_toxicity =
            entries.iter().map(|e| e.toxicity_rate).sum::<f64>() / total_videos as f64;
        let safe_videos = entries
            .iter()
            .filter(|e| e.toxicity_rate < SAFE_RATE_THRESHOLD)
            .count();
        HistoryStats {
            total_videos,
            total_comments,
            average_toxicity: (average_toxicity * 100.0).round() / 100.0,
            safe_videos,
        }
    }
}
