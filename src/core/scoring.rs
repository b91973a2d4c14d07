//! Per-word score classification
//!
//! Maps the recognizer's accuracy score to the three display tiers used by
//! the practice UI. The same tiers feed the session report's issue ranking.

use crate::config::ScoringConfig;

/// Display tier for a word's accuracy score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    Good,
    Fair,
    Poor,
    /// The recognizer produced no score for this word
    Unscored,
}

impl ScoreTier {
    /// Classify an accuracy score: >= 80 good, >= 60 fair, below poor
    pub fn classify(accuracy_score: Option<f64>, config: &ScoringConfig) -> Self {
        match accuracy_score {
            Some(score) if score >= config.good_threshold => Self::Good,
            Some(score) if score >= config.fair_threshold => Self::Fair,
            Some(_) => Self::Poor,
            None => Self::Unscored,
        }
    }

    /// Class name the UI layer keys its colors on
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Unscored => "unscored",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_tiers() {
        let config = ScoringConfig::default();
        assert_eq!(ScoreTier::classify(Some(95.0), &config), ScoreTier::Good);
        assert_eq!(ScoreTier::classify(Some(80.0), &config), ScoreTier::Good);
        assert_eq!(ScoreTier::classify(Some(79.9), &config), ScoreTier::Fair);
        assert_eq!(ScoreTier::classify(Some(60.0), &config), ScoreTier::Fair);
        assert_eq!(ScoreTier::classify(Some(59.9), &config), ScoreTier::Poor);
        assert_eq!(ScoreTier::classify(Some(0.0), &config), ScoreTier::Poor);
        assert_eq!(ScoreTier::classify(None, &config), ScoreTier::Unscored);
    }

    #[test]
    fn test_class_names() {
        assert_eq!(ScoreTier::Good.class_name(), "good");
        assert_eq!(ScoreTier::Fair.class_name(), "fair");
        assert_eq!(ScoreTier::Poor.class_name(), "poor");
        assert_eq!(ScoreTier::Unscored.class_name(), "unscored");
    }
}
