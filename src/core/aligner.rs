//! Reference/recognized word alignment
//!
//! Walks the reference sentence and the recognizer's word list in lockstep
//! and classifies every reference word as matched, matched-but-flagged, or
//! omitted, with recognizer insertions spliced in at their original
//! positions. The walk is strictly positional and greedy: the first
//! unconsumed recognized word is tested against the current reference word,
//! with no lookahead and no backtracking. A recognizer misalignment can
//! therefore cascade into omissions for the rest of the sentence; that
//! matches the recognizer-facing product behavior and is left as-is.
//!
//! Both the render path and the sentence gate go through [`align`], so a
//! word can never be colored as matched yet gated as omitted.

use super::normalizer::normalize_token;
use super::scoring::ScoreTier;
use crate::config::ScoringConfig;
use crate::recognizer::{RecognizedWord, WordErrorType};

/// How one reference word (or one extra recognized word) aligned
#[derive(Debug, Clone, PartialEq)]
pub enum AlignmentOutcome {
    /// Reference word spoken and recognized
    Matched {
        reference: String,
        word: RecognizedWord,
    },
    /// Normalized forms match but the recognizer still flagged an omission
    MatchedOmission {
        reference: String,
        word: RecognizedWord,
    },
    /// No recognized word aligned to this reference word
    ImplicitOmission { reference: String },
    /// Recognized word with no reference counterpart (extra speech)
    Inserted { word: RecognizedWord },
}

impl AlignmentOutcome {
    /// True for the outcomes that occupy a reference-word slot
    pub fn is_reference_slot(&self) -> bool {
        !matches!(self, Self::Inserted { .. })
    }
}

/// Result of aligning one recognizer utterance against a reference sentence
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// One outcome per reference word, in order, with `Inserted` outcomes
    /// spliced at their recognizer-sequence positions
    pub outcomes: Vec<AlignmentOutcome>,
    /// Recognized words left unconsumed after the last reference word and
    /// not tagged as insertions. The product currently ignores these; the
    /// gate can be configured to fail on them.
    pub trailing_words: Vec<RecognizedWord>,
}

/// Render data for one word of a sentence transcript
#[derive(Debug, Clone, PartialEq)]
pub struct WordRender {
    pub display_text: String,
    pub tier: ScoreTier,
    pub is_omitted: bool,
    pub is_inserted: bool,
    pub has_unexpected_break: bool,
    pub has_missing_break: bool,
    pub accuracy_score: Option<f64>,
}

/// Align the recognizer's word list against the reference words.
///
/// Produces exactly one reference-slot outcome per reference word, plus
/// inline insertions. Total: an empty recognized list degrades to all
/// implicit omissions.
pub fn align(reference_words: &[&str], recognized: &[RecognizedWord]) -> Alignment {
    let mut outcomes = Vec::with_capacity(reference_words.len());
    let mut j = 0;

    // False starts: speech recognized before the first reference word
    drain_insertions(recognized, &mut j, &mut outcomes);

    for reference in reference_words {
        let candidate = recognized.get(j);
        let matched = candidate.is_some_and(|word| {
            word.error_type != WordErrorType::Insertion
                && normalize_token(&word.text) == normalize_token(reference)
        });

        if matched {
            let word = recognized[j].clone();
            j += 1;
            if word.error_type == WordErrorType::Omission {
                outcomes.push(AlignmentOutcome::MatchedOmission {
                    reference: reference.to_string(),
                    word,
                });
            } else {
                outcomes.push(AlignmentOutcome::Matched {
                    reference: reference.to_string(),
                    word,
                });
            }
        } else {
            // Do not consume: the recognized word stays available for the
            // next reference word or ends up as a trailing leftover
            outcomes.push(AlignmentOutcome::ImplicitOmission {
                reference: reference.to_string(),
            });
        }

        drain_insertions(recognized, &mut j, &mut outcomes);
    }

    let trailing_words = recognized[j..]
        .iter()
        .filter(|w| w.error_type != WordErrorType::Insertion)
        .cloned()
        .collect();

    Alignment {
        outcomes,
        trailing_words,
    }
}

fn drain_insertions(
    recognized: &[RecognizedWord],
    j: &mut usize,
    outcomes: &mut Vec<AlignmentOutcome>,
) {
    while let Some(word) = recognized.get(*j) {
        if word.error_type != WordErrorType::Insertion {
            break;
        }
        outcomes.push(AlignmentOutcome::Inserted { word: word.clone() });
        *j += 1;
    }
}

impl Alignment {
    /// Percentage of reference words actually spoken.
    ///
    /// Only `Matched` counts as spoken; omissions of either kind do not,
    /// and insertions count toward neither side.
    pub fn completeness_percent(&self) -> f64 {
        let reference_count = self
            .outcomes
            .iter()
            .filter(|o| o.is_reference_slot())
            .count();
        if reference_count == 0 {
            return 0.0;
        }
        let spoken = self
            .outcomes
            .iter()
            .filter(|o| matches!(o, AlignmentOutcome::Matched { .. }))
            .count();
        spoken as f64 / reference_count as f64 * 100.0
    }

    /// Per-word render sequence for the transcript view
    pub fn render(&self, config: &ScoringConfig) -> Vec<WordRender> {
        self.outcomes
            .iter()
            .map(|outcome| match outcome {
                AlignmentOutcome::Matched { reference, word } => WordRender {
                    display_text: reference.clone(),
                    tier: ScoreTier::classify(word.accuracy_score, config),
                    is_omitted: false,
                    is_inserted: false,
                    has_unexpected_break: word.error_type == WordErrorType::UnexpectedBreak,
                    has_missing_break: word.error_type == WordErrorType::MissingBreak,
                    accuracy_score: word.accuracy_score,
                },
                AlignmentOutcome::MatchedOmission { reference, word } => WordRender {
                    display_text: format!("[{}]", reference),
                    tier: ScoreTier::classify(word.accuracy_score, config),
                    is_omitted: true,
                    is_inserted: false,
                    has_unexpected_break: false,
                    has_missing_break: false,
                    accuracy_score: word.accuracy_score,
                },
                AlignmentOutcome::ImplicitOmission { reference } => WordRender {
                    display_text: format!("[{}]", reference),
                    tier: ScoreTier::Unscored,
                    is_omitted: true,
                    is_inserted: false,
                    has_unexpected_break: false,
                    has_missing_break: false,
                    accuracy_score: None,
                },
                AlignmentOutcome::Inserted { word } => WordRender {
                    display_text: word.text.clone(),
                    tier: ScoreTier::classify(word.accuracy_score, config),
                    is_omitted: false,
                    is_inserted: true,
                    has_unexpected_break: false,
                    has_missing_break: false,
                    accuracy_score: word.accuracy_score,
                },
            })
            .collect()
    }
}
