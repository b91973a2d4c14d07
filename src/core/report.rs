//! Session report aggregation
//!
//! Folds every assessed sentence of a practice session into the summary
//! shown on the report step: mean scores across four dimensions and a
//! worst-first list of problem words. Recomputed fresh each time the report
//! is viewed; nothing here is persisted.

use std::collections::HashMap;

use super::normalizer::normalize_token;
use crate::config::ScoringConfig;
use crate::recognizer::WordErrorType;
use crate::session::SentenceAttempt;

/// A recognized word that scored poorly or carried an error tag, aggregated
/// across the whole session
#[derive(Debug, Clone, PartialEq)]
pub struct WordIssue {
    pub word: String,
    /// Worst accuracy observed across occurrences; `None` when the worst
    /// occurrence was unscored
    pub min_score: Option<f64>,
    pub error_type: WordErrorType,
    pub occurrences: usize,
}

/// Aggregated scores for a finished practice session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub total_sentences: usize,
    pub avg_pronunciation: f64,
    pub avg_accuracy: f64,
    pub avg_fluency: f64,
    pub avg_completeness: f64,
    /// Worst-first, deduplicated, capped at `max_word_issues`
    pub word_issues: Vec<WordIssue>,
    /// True when the canned demo dataset was substituted because the user
    /// had not practiced yet
    pub is_demo: bool,
}

impl SessionSummary {
    /// Unweighted mean of the four dimension averages
    pub fn overall_score(&self) -> f64 {
        (self.avg_pronunciation + self.avg_accuracy + self.avg_fluency + self.avg_completeness)
            / 4.0
    }

    /// Whether the report step plays the celebration animation
    pub fn deserves_celebration(&self, config: &ScoringConfig) -> bool {
        self.overall_score() >= config.celebration_threshold
    }
}

/// Summarize a session's attempts.
///
/// Attempts without a result are skipped; with no qualifying attempt at all
/// the fixed demo dataset is returned verbatim so the report screen always
/// has something to show.
pub fn summarize(attempts: &[SentenceAttempt], config: &ScoringConfig) -> SessionSummary {
    let results: Vec<_> = attempts.iter().filter_map(|a| a.result.as_ref()).collect();

    if results.is_empty() {
        return demo_summary();
    }

    let count = results.len() as f64;
    let avg_pronunciation = results.iter().map(|r| r.pronunciation_score).sum::<f64>() / count;
    let avg_accuracy = results.iter().map(|r| r.accuracy_score).sum::<f64>() / count;
    let avg_fluency = results.iter().map(|r| r.fluency_score).sum::<f64>() / count;
    let avg_completeness = results.iter().map(|r| r.completeness_score).sum::<f64>() / count;

    // Collect problem words: low accuracy or any error tag. An unscored
    // word counts only when it also carries an error tag.
    let mut issues: HashMap<String, WordIssue> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for result in &results {
        for word in &result.words {
            let low_score = word
                .accuracy_score
                .is_some_and(|s| s < config.issue_threshold);
            if !low_score && word.error_type == WordErrorType::None {
                continue;
            }

            let key = normalize_token(&word.text);
            if key.is_empty() {
                continue;
            }

            match issues.get_mut(&key) {
                Some(issue) => {
                    issue.occurrences += 1;
                    if worse_than(word.accuracy_score, issue.min_score) {
                        issue.min_score = word.accuracy_score;
                        issue.error_type = word.error_type;
                    }
                }
                None => {
                    order.push(key.clone());
                    issues.insert(
                        key,
                        WordIssue {
                            word: word.text.clone(),
                            min_score: word.accuracy_score,
                            error_type: word.error_type,
                            occurrences: 1,
                        },
                    );
                }
            }
        }
    }

    let mut word_issues: Vec<WordIssue> = order
        .into_iter()
        .filter_map(|key| issues.remove(&key))
        .collect();
    // Worst first; unscored sorts ahead of any scored word
    word_issues.sort_by(|a, b| {
        let a_key = a.min_score.unwrap_or(f64::NEG_INFINITY);
        let b_key = b.min_score.unwrap_or(f64::NEG_INFINITY);
        a_key.partial_cmp(&b_key).unwrap_or(std::cmp::Ordering::Equal)
    });
    word_issues.truncate(config.max_word_issues);

    SessionSummary {
        total_sentences: results.len(),
        avg_pronunciation,
        avg_accuracy,
        avg_fluency,
        avg_completeness,
        word_issues,
        is_demo: false,
    }
}

/// True when `candidate` is a worse accuracy than `current`
fn worse_than(candidate: Option<f64>, current: Option<f64>) -> bool {
    match (candidate, current) {
        (None, None) => false,
        (None, Some(_)) => true,
        (Some(_), None) => false,
        (Some(c), Some(cur)) => c < cur,
    }
}

/// The canned dataset shown before the user has practiced anything.
/// Fixed numbers, not an estimate.
fn demo_summary() -> SessionSummary {
    let sample_issues = [
        ("thoroughly", 48.0, WordErrorType::None, 2),
        ("comfortable", 55.0, WordErrorType::None, 1),
        ("world", 61.0, WordErrorType::UnexpectedBreak, 1),
        ("through", 64.0, WordErrorType::None, 3),
        ("refine", 68.0, WordErrorType::None, 1),
    ];

    SessionSummary {
        total_sentences: 8,
        avg_pronunciation: 82.0,
        avg_accuracy: 85.0,
        avg_fluency: 78.0,
        avg_completeness: 83.0,
        word_issues: sample_issues
            .into_iter()
            .map(|(word, score, error_type, occurrences)| WordIssue {
                word: word.to_string(),
                min_score: Some(score),
                error_type,
                occurrences,
            })
            .collect(),
        is_demo: true,
    }
}
