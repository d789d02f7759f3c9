//! Fuzzy name resolution
//!
//! Operators rarely type asset names exactly as the master data spells
//! them. Resolution ranks candidates by a simple lexical score: exact
//! match, then prefix, then substring, then word overlap. Anything below
//! the threshold is discarded; an empty ranking is an honest "no match".

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Minimum score for a candidate to be considered at all
pub const MATCH_THRESHOLD: f64 = 0.35;

/// Ranked alternates returned alongside the best match
const MAX_ALTERNATES: usize = 3;

/// One scored candidate record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedName {
    pub name: String,
    pub score: f64,
    pub record: Value,
}

/// Outcome of a name resolution.
///
/// "No match" is `best: None` with an empty alternates list - distinct
/// from a weak match, and never filled in with a fabricated best guess.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameMatch {
    pub best: Option<ResolvedName>,
    pub alternates: Vec<ResolvedName>,
}

impl NameMatch {
    pub fn no_match() -> Self {
        Self {
            best: None,
            alternates: Vec::new(),
        }
    }

    pub fn is_match(&self) -> bool {
        self.best.is_some()
    }
}

/// Rank candidate (name, record) pairs against a query.
pub fn rank_candidates<'a, I>(query: &str, candidates: I) -> NameMatch
where
    I: IntoIterator<Item = (&'a str, &'a Value)>,
{
    let mut scored: Vec<ResolvedName> = candidates
        .into_iter()
        .filter_map(|(name, record)| {
            let score = similarity(query, name);
            (score >= MATCH_THRESHOLD).then(|| ResolvedName {
                name: name.to_string(),
                score,
                record: record.clone(),
            })
        })
        .collect();

    // Ties break alphabetically so ranking stays deterministic
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut ranked = scored.into_iter();
    match ranked.next() {
        Some(best) => NameMatch {
            best: Some(best),
            alternates: ranked.take(MAX_ALTERNATES).collect(),
        },
        None => NameMatch::no_match(),
    }
}

/// Lexical similarity in [0, 1]
pub fn similarity(query: &str, candidate: &str) -> f64 {
    let q = normalize(query);
    let c = normalize(candidate);

    if q.is_empty() || c.is_empty() {
        return 0.0;
    }
    if q == c {
        return 1.0;
    }
    if c.starts_with(&q) || q.starts_with(&c) {
        return 0.9;
    }
    if c.contains(&q) || q.contains(&c) {
        return 0.75;
    }

    // Word overlap: how much of the query shows up in the candidate
    let q_words: Vec<&str> = q.split_whitespace().collect();
    let c_words: Vec<&str> = c.split_whitespace().collect();
    if q_words.is_empty() {
        return 0.0;
    }
    let shared = q_words.iter().filter(|w| c_words.contains(w)).count();
    shared as f64 / q_words.len() as f64 * 0.7
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
