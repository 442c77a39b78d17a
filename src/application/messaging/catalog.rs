//! Question catalog - Known questions and the canned quick replies

use once_cell::sync::Lazy;

use crate::domain::entities::{CardAction, CatalogEntry, Intent, SuggestedActions};

/// Canonical questions the classifier matches against, in priority order
pub const QUESTIONS: &[CatalogEntry] = &[
    CatalogEntry::new("hello1", Intent::Greeting, "hello"),
    CatalogEntry::new("hello2", Intent::Greeting, "hi"),
    CatalogEntry::new("hello3", Intent::Greeting, "hey"),
    CatalogEntry::new("hello4", Intent::Greeting, "good morning"),
    CatalogEntry::new("hello5", Intent::Greeting, "good afternoon"),
    CatalogEntry::new("bye1", Intent::Farewell, "bye"),
    CatalogEntry::new("bye2", Intent::Farewell, "goodbye"),
    CatalogEntry::new("bye3", Intent::Farewell, "see you later"),
    CatalogEntry::new("bye4", Intent::Farewell, "sign out"),
    CatalogEntry::new("time", Intent::Time, "what time is it"),
    CatalogEntry::new("time2", Intent::Time, "time"),
    CatalogEntry::new("order", Intent::Order, "where are my orders"),
    CatalogEntry::new("order2", Intent::Order, "order status"),
];

/// Quick replies offered after most answers
pub static SUGGESTED_ACTIONS: Lazy<SuggestedActions> = Lazy::new(|| SuggestedActions {
    actions: vec![
        CardAction::im_back("What time is it?"),
        CardAction::im_back("Where are my orders?"),
        CardAction::im_back("Bye"),
    ],
    to: Vec::new(),
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn labels_are_unique() {
        let labels: HashSet<_> = QUESTIONS.iter().map(|q| q.label).collect();
        assert_eq!(labels.len(), QUESTIONS.len());
    }

    #[test]
    fn every_intent_has_a_question() {
        for intent in [Intent::Greeting, Intent::Farewell, Intent::Time, Intent::Order] {
            assert!(QUESTIONS.iter().any(|q| q.intent == intent), "no question for {intent}");
        }
    }
}
