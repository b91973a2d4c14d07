//! Sentence progression gate
//!
//! Decides whether a sentence attempt is good enough to unlock the next
//! sentence. Recomputed on every call; there is no caching to go stale.

use super::aligner::{align, AlignmentOutcome};
use super::normalizer::reference_words;
use crate::config::ScoringConfig;
use crate::recognizer::UtteranceAssessment;

/// Whether the attempt's recognized performance unlocks navigation.
///
/// Fails when there is no result yet, when any reference word is omitted
/// (explicitly or implicitly), or when a matched word is unscored or scores
/// strictly below the gate threshold. Exactly the threshold passes.
/// Insertions never fail the gate; leftover non-insertion words after the
/// last reference word fail it only when `fail_on_trailing_words` is set.
pub fn passes_gate(
    reference_text: &str,
    result: Option<&UtteranceAssessment>,
    config: &ScoringConfig,
) -> bool {
    let Some(result) = result else {
        return false;
    };

    let reference = reference_words(reference_text);
    let alignment = align(&reference, &result.words);

    for outcome in &alignment.outcomes {
        match outcome {
            AlignmentOutcome::Matched { word, .. } => {
                let ok = word
                    .accuracy_score
                    .is_some_and(|score| score >= config.gate_threshold);
                if !ok {
                    return false;
                }
            }
            AlignmentOutcome::MatchedOmission { .. } | AlignmentOutcome::ImplicitOmission { .. } => {
                return false;
            }
            AlignmentOutcome::Inserted { .. } => {}
        }
    }

    if config.fail_on_trailing_words && !alignment.trailing_words.is_empty() {
        return false;
    }

    true
}
