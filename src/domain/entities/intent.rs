use std::fmt;

/// Purpose of a user message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Greeting,
    Farewell,
    Time,
    Order,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Farewell => "farewell",
            Intent::Time => "time",
            Intent::Order => "order",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One known question and the intent it expresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub label: &'static str,
    pub intent: Intent,
    pub question: &'static str,
}

impl CatalogEntry {
    pub const fn new(label: &'static str, intent: Intent, question: &'static str) -> Self {
        Self {
            label,
            intent,
            question,
        }
    }
}

/// Best catalog entry for a message and its similarity score
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub label: &'static str,
    pub intent: Intent,
    pub score: f64,
}
