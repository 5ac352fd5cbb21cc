use std::collections::HashMap;

/// Incident scores per iso3 country code, for boundary features that carry
/// no score of their own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreTable {
    scores: HashMap<String, i64>,
}

/// Country scores shipped with the reference layer.
const REFERENCE_SCORES: &[(&str, i64)] = &[
    ("IND", 4),
    ("PAK", 3),
    ("ARG", 4),
    ("AFG", 2),
    ("BGD", 2),
    ("CHN", 3),
    ("DNK", 4),
    ("EST", 1),
    ("FRA", 5),
    ("DEU", 5),
];

impl ScoreTable {
    pub fn reference() -> Self {
        Self::from_entries(
            REFERENCE_SCORES
                .iter()
                .map(|&(code, score)| (code.to_string(), score)),
        )
    }

    /// Later entries win on duplicate codes.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, i64)>) -> Self {
        Self {
            scores: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, iso3: &str) -> Option<i64> {
        self.scores.get(iso3).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
