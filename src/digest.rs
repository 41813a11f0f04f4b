//! Aggregation of a completed analysis into a ranked toxic-item digest.

use crate::protocol::{AnalysisResult, CommentRecord};
use serde::{Deserialize, Serialize};

/// Confidence at or above which an item counts as highly toxic.
pub const HIGH_TOXICITY_THRESHOLD: f64 = 0.8;

/// Where a toxic item came from in the thread structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Main,
    Reply,
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Main => write!(f, "main"),
            Origin::Reply => write!(f, "reply"),
        }
    }
}

/// One toxic record tagged with its origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToxicItem {
    pub origin: Origin,
    #[serde(flatten)]
    pub record: CommentRecord,
}

/// The merged, ranked view of every toxic item in an analysis, plus summary
/// counts. An all-zero digest with an empty list is a valid "clean" result,
/// not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToxicDigest {
    /// Toxic items sorted by descending confidence.
    pub items: Vec<ToxicItem>,
    pub main_toxic_count: usize,
    pub reply_toxic_count: usize,
    /// Items with confidence ≥ [`HIGH_TOXICITY_THRESHOLD`].
    pub high_toxicity_count: usize,
    /// Arithmetic mean of confidence over `items`; 0.0 when empty.
    pub average_confidence: f64,
}

/// Build the digest from a completed analysis.
///
/// Main comments and replies are filtered for toxic records independently,
/// concatenated main-first, then stable-sorted by descending confidence.
/// At equal confidence main items therefore precede replies — that ordering
/// is an artifact of the concatenation, kept for compatibility with what
/// the backend's consumers have always displayed.
pub fn aggregate(result: &AnalysisResult) -> ToxicDigest {
    let mut items: Vec<ToxicItem> = Vec::new();

    for record in result.main_comments_analysis.iter().filter(|r| r.is_toxic) {
        items.push(ToxicItem {
            origin: Origin::Main,
            record: record.clone(),
        });
    }
    let main_toxic_count = items.len();

    for record in result.replies_analysis.iter().filter(|r| r.is_toxic) {
        items.push(ToxicItem {
            origin: Origin::Reply,
            record: record.clone(),
        });
    }
    let reply_toxic_count = items.len() - main_toxic_count;

    // sort_by is stable; NaN confidences compare as equal and keep their slot.
    items.sort_by(|a, b| {
        b.record
            .toxicity_confidence
            .partial_cmp(&a.record.toxicity_confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let high_toxicity_count = items
        .iter()
        .filter(|i| i.record.toxicity_confidence >= HIGH_TOXICITY_THRESHOLD)
        .count();

    let average_confidence = if items.is_empty() {
        0.0
    } else {
        items
            .iter()
            .map(|i| i.record.toxicity_confidence)
            .sum::<f64>()
            / items.len() as f64
    };

    ToxicDigest {
        items,
        main_toxic_count,
        reply_toxic_count,
        high_toxicity_count,
        average_confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str, is_toxic: bool, confidence: f64) -> CommentRecord {
        CommentRecord {
            text: text.to_string(),
            is_toxic,
            toxicity_confidence: confidence,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_result_yields_empty_digest() {
        let digest = aggregate(&AnalysisResult::default());
        assert!(digest.items.is_empty());
        assert_eq!(digest.main_toxic_count, 0);
        assert_eq!(digest.reply_toxic_count, 0);
        assert_eq!(digest.high_toxicity_count, 0);
        assert_eq!(digest.average_confidence, 0.0);
    }

    #[test]
    fn test_non_toxic_records_are_filtered_out() {
        let result = AnalysisResult {
            main_comments_analysis: vec![record("ok", false, 0.1), record("bad", true, 0.7)],
            replies_analysis: vec![record("fine", false, 0.05)],
            ..Default::default()
        };
        let digest = aggregate(&result);
        assert_eq!(digest.items.len(), 1);
        assert_eq!(digest.items[0].record.text, "bad");
    }

    #[test]
    fn test_sorted_descending_with_origin_tags() {
        let result = AnalysisResult {
            main_comments_analysis: vec![record("main", true, 0.9)],
            replies_analysis: vec![record("reply", true, 0.95)],
            ..Default::default()
        };
        let digest = aggregate(&result);
        assert_eq!(digest.items[0].origin, Origin::Reply);
        assert_eq!(digest.items[1].origin, Origin::Main);
        assert_eq!(digest.high_toxicity_count, 2);
        assert!((digest.average_confidence - 0.925).abs() < 1e-9);
    }

    #[test]
    fn test_equal_confidence_keeps_main_before_reply() {
        let result = AnalysisResult {
            main_comments_analysis: vec![record("main", true, 0.6)],
            replies_analysis: vec![record("reply", true, 0.6)],
            ..Default::default()
        };
        let digest = aggregate(&result);
        assert_eq!(digest.items[0].origin, Origin::Main);
        assert_eq!(digest.items[1].origin, Origin::Reply);
    }

    #[test]
    fn test_high_toxicity_threshold_is_inclusive() {
        let result = AnalysisResult {
            main_comments_analysis: vec![record("edge", true, 0.8), record("low", true, 0.79)],
            ..Default::default()
        };
        let digest = aggregate(&result);
        assert_eq!(digest.high_toxicity_count, 1);
    }
}
