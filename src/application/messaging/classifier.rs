//! Intent classifier - Fuzzy matching of user text against the question catalog

use strsim::sorensen_dice;
use tracing::debug;

use super::catalog::QUESTIONS;
use crate::domain::entities::{CatalogEntry, MatchResult};

/// A match must score strictly above this to count
pub const MATCH_THRESHOLD: f64 = 0.5;

/// Guesses which known question a message asks
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    catalog: &'static [CatalogEntry],
}

impl IntentClassifier {
    pub fn new(catalog: &'static [CatalogEntry]) -> Self {
        Self { catalog }
    }

    /// Highest-scoring catalog entry, whatever its score
    ///
    /// Ties go to the entry that comes first in the catalog.
    pub fn best_match(&self, text: &str) -> Option<MatchResult> {
        let text = text.to_lowercase();
        let mut best: Option<MatchResult> = None;

        for entry in self.catalog {
            let score = sorensen_dice(&text, &entry.question.to_lowercase());
            let is_better = best.as_ref().map_or(true, |b| score > b.score);
            if is_better {
                best = Some(MatchResult {
                    label: entry.label,
                    intent: entry.intent,
                    score,
                });
            }
        }

        best
    }

    /// Best match if it clears the threshold, `None` for unmatched text
    pub fn classify(&self, text: &str) -> Option<MatchResult> {
        let best = self.best_match(text)?;
        debug!("Best match for {:?}: {} (score: {:.3})", text, best.label, best.score);

        if best.score > MATCH_THRESHOLD {
            Some(best)
        } else {
            None
        }
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(QUESTIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Intent;

    fn intent_of(text: &str) -> Option<Intent> {
        IntentClassifier::default().classify(text).map(|m| m.intent)
    }

    #[test]
    fn greetings_and_farewells() {
        assert_eq!(intent_of("hello"), Some(Intent::Greeting));
        assert_eq!(intent_of("Hi"), Some(Intent::Greeting));
        assert_eq!(intent_of("Hello!"), Some(Intent::Greeting));
        assert_eq!(intent_of("Bye"), Some(Intent::Farewell));
        assert_eq!(intent_of("Goodbye"), Some(Intent::Farewell));
    }

    #[test]
    fn time_questions_tolerate_case_and_punctuation() {
        assert_eq!(intent_of("time"), Some(Intent::Time));
        assert_eq!(intent_of("What time is it?"), Some(Intent::Time));
        assert_eq!(intent_of("what time is it"), Some(Intent::Time));
    }

    #[test]
    fn order_questions() {
        assert_eq!(intent_of("Where are my orders?"), Some(Intent::Order));
        assert_eq!(intent_of("where is my order"), Some(Intent::Order));
    }

    #[test]
    fn numbers_and_noise_are_unmatched() {
        assert_eq!(intent_of("5"), None);
        assert_eq!(intent_of("10"), None);
        assert_eq!(intent_of("qwertyuiop"), None);
        assert_eq!(intent_of(""), None);
    }

    #[test]
    fn scores_at_or_below_threshold_are_rejected() {
        const CATALOG: &[CatalogEntry] = &[CatalogEntry::new("t", Intent::Time, "a bc")];
        let classifier = IntentClassifier::new(CATALOG);

        // "abd" shares one of two bigrams with "abc": 2 * 1 / (2 + 2)
        let best = classifier.best_match("abd").unwrap();
        assert_eq!(best.score, MATCH_THRESHOLD);
        assert!(classifier.classify("abd").is_none());
        assert!(classifier.classify("abc").is_some());
    }

    #[test]
    fn ties_go_to_the_first_entry() {
        const CATALOG: &[CatalogEntry] = &[
            CatalogEntry::new("first", Intent::Greeting, "same"),
            CatalogEntry::new("second", Intent::Farewell, "same"),
        ];
        let best = IntentClassifier::new(CATALOG).classify("same").unwrap();
        assert_eq!(best.label, "first");
        assert_eq!(best.score, 1.0);
    }
}
