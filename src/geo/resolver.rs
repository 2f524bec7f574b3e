//! Three-stage origin cascade.
//!
//! 1. Foreign alias table. Exact gazetteer names veto it; so does the
//!    domestic deny-list when the alias is a city rather than a country.
//! 2. Noise/state-code stripping and short-form expansion.
//! 3. Approximate match against the gazetteer, memoized per cleaned text.
//!
//! The first stage that produces an answer wins.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use super::gazetteer::Gazetteer;
use super::similarity::{SimilarityScorer, TokenSortRatio};
use super::tables::{
    deny_listed_outside_aliases, expand_short_form, foreign_match, is_placeholder, ForeignMatch,
    NOISE_PATTERN, PUNCTUATION, WHITESPACE,
};
use super::{match_key, title_case};
use crate::config::PipelineConfig;
use crate::record::NOT_INFORMED;

/// Which cascade step produced a [`Resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStage {
    NotInformed,
    ForeignAlias,
    ShortForm,
    Gazetteer { score: u8 },
    Unmatched,
}

impl ResolutionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionStage::NotInformed => "not_informed",
            ResolutionStage::ForeignAlias => "foreign_alias",
            ResolutionStage::ShortForm => "short_form",
            ResolutionStage::Gazetteer { .. } => "gazetteer",
            ResolutionStage::Unmatched => "unmatched",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub name: String,
    pub foreign_by_location: bool,
    pub stage: ResolutionStage,
}

impl Resolution {
    fn not_informed() -> Self {
        Resolution {
            name: NOT_INFORMED.to_string(),
            foreign_by_location: false,
            stage: ResolutionStage::NotInformed,
        }
    }

    fn domestic(name: impl Into<String>, stage: ResolutionStage) -> Self {
        Resolution {
            name: name.into(),
            foreign_by_location: false,
            stage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BestMatch {
    index: usize,
    score: u8,
}

/// Best gazetteer match per match key. Stops accepting new keys once full.
struct MatchCache {
    capacity: usize,
    entries: Mutex<HashMap<String, Option<BestMatch>>>,
}

impl MatchCache {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn get(&self, key: &str) -> Option<Option<BestMatch>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).copied()
    }

    fn insert(&self, key: String, value: Option<BestMatch>) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.len() < self.capacity {
            entries.insert(key, value);
        }
    }

    fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Maps free-text origins to canonical place names.
///
/// Safe to share across threads and across pipeline runs; the match cache
/// only ever speeds up repeat lookups.
pub struct GeoResolver {
    gazetteer: Gazetteer,
    scorer: Box<dyn SimilarityScorer>,
    acceptance_threshold: u8,
    cache: MatchCache,
}

impl GeoResolver {
    pub fn new(acceptance_threshold: u8, cache_capacity: usize) -> Self {
        Self {
            gazetteer: Gazetteer::default(),
            scorer: Box::new(TokenSortRatio),
            acceptance_threshold,
            cache: MatchCache::new(cache_capacity),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.fuzzy_acceptance_threshold, config.match_cache_capacity)
    }

    /// Swaps the similarity scorer. Clears the cache, since cached scores came from the old one.
    pub fn with_scorer(mut self, scorer: impl SimilarityScorer + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self.cache = MatchCache::new(self.cache.capacity);
        self
    }

    /// Swaps the reference gazetteer, e.g. for another state's municipalities.
    pub fn with_gazetteer(mut self, gazetteer: Gazetteer) -> Self {
        self.gazetteer = gazetteer;
        self.cache = MatchCache::new(self.cache.capacity);
        self
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    pub fn resolve(&self, raw: &str) -> Resolution {
        let raw = raw.trim();
        if raw.is_empty() || is_placeholder(raw) {
            return Resolution::not_informed();
        }

        if let Some(hit) = foreign_match(raw) {
            if !self.vetoes(raw, hit) {
                return Resolution {
                    name: hit.country.to_string(),
                    foreign_by_location: true,
                    stage: ResolutionStage::ForeignAlias,
                };
            }
            debug!(origin = raw, country = hit.country, "Foreign alias vetoed by domestic term");
        }

        let cleaned = clean_origin(raw);
        if cleaned.is_empty() || cleaned.chars().all(|c| c.is_ascii_digit() || c == ' ') {
            return Resolution::not_informed();
        }

        if let Some(city) = expand_short_form(&cleaned) {
            return Resolution::domestic(city, ResolutionStage::ShortForm);
        }

        let key = match_key(&cleaned);
        match self.best_match(&key) {
            Some(best) if best.score >= self.acceptance_threshold => {
                match self.gazetteer.get(best.index) {
                    Some(entry) => Resolution::domestic(
                        entry.name,
                        ResolutionStage::Gazetteer { score: best.score },
                    ),
                    None => Resolution::domestic(title_case(&cleaned), ResolutionStage::Unmatched),
                }
            }
            _ => Resolution::domestic(title_case(&cleaned), ResolutionStage::Unmatched),
        }
    }

    /// A domestic place spelled out in full always wins. Otherwise only city
    /// aliases give way to a deny-listed term left in the text.
    fn vetoes(&self, raw: &str, hit: ForeignMatch) -> bool {
        if self.gazetteer.find(&match_key(&clean_origin(raw))).is_some() {
            return true;
        }
        !hit.by_country_name && deny_listed_outside_aliases(raw)
    }

    fn best_match(&self, key: &str) -> Option<BestMatch> {
        if let Some(hit) = self.cache.get(key) {
            return hit;
        }

        let mut best: Option<BestMatch> = None;
        for (index, entry) in self.gazetteer.entries().iter().enumerate() {
            let score = self.scorer.score(key, &entry.key);
            if best.is_none_or(|b| score > b.score) {
                best = Some(BestMatch { index, score });
            }
            if score == 100 {
                break;
            }
        }

        self.cache.insert(key.to_string(), best);
        best
    }
}

/// Stage-2 cleanup: punctuation, state codes and generic noise words removed,
/// whitespace collapsed. Accents are kept.
pub fn clean_origin(raw: &str) -> String {
    let no_punctuation = PUNCTUATION.replace_all(raw, " ");
    let no_noise = NOISE_PATTERN.replace_all(&no_punctuation, " ");
    WHITESPACE.replace_all(&no_noise, " ").trim().to_string()
}
