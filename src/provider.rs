//! Word pair providers.
//!
//! The controller only needs something that, given an optional topic,
//! eventually answers with a `{civilian, spy}` pair or an error. Remote
//! generators, the offline [`WordBank`], and the [`WithFallback`] decorator
//! all sit behind [`WordPairProvider`].
//!
//! Fallback words are a provider concern. The controller never substitutes
//! a pair on its own; wrap a provider in [`WithFallback`] for that.

use std::fmt;
use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::state::WordPair;

/// Errors a provider can report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Backend unreachable, rate limited, or otherwise failed
    Unavailable(String),
    /// Backend answered with something that is not a usable pair
    Malformed(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "Word provider unavailable: {}", msg),
            Self::Malformed(msg) => write!(f, "Malformed word pair: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Source of word pairs.
#[async_trait]
pub trait WordPairProvider: Send + Sync {
    /// Produce a pair, optionally themed on `topic`.
    async fn generate(&self, topic: Option<&str>) -> Result<WordPair, ProviderError>;
}

/// Decode a provider's JSON answer: `{"civilian": "...", "spy": "..."}`.
///
/// Both words must be non-blank and different.
pub fn parse_word_pair(payload: &str) -> Result<WordPair, ProviderError> {
    if payload.trim().is_empty() {
        return Err(ProviderError::Malformed("empty response".to_string()));
    }

    let pair: WordPair =
        serde_json::from_str(payload).map_err(|e| ProviderError::Malformed(e.to_string()))?;

    if !pair.is_playable() {
        return Err(ProviderError::Malformed(format!(
            "unusable words {:?} / {:?}",
            pair.civilian, pair.spy
        )));
    }
    Ok(pair.trimmed())
}

/// A themed group of pairs in a [`WordBank`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCategory {
    pub name: String,
    pub pairs: Vec<WordPair>,
}

impl WordCategory {
    pub fn new(name: impl Into<String>, pairs: &[(&str, &str)]) -> Self {
        Self {
            name: name.into(),
            pairs: pairs
                .iter()
                .map(|(civilian, spy)| WordPair::new(*civilian, *spy))
                .collect(),
        }
    }
}

/// Offline provider drawing from a fixed list.
///
/// A topic naming one of the categories (case-insensitive) restricts the
/// draw to it. Any other topic, or none, draws from everything.
#[derive(Debug)]
pub struct WordBank {
    categories: Vec<WordCategory>,
    rng: Mutex<StdRng>,
}

impl WordBank {
    /// Bank with the built-in categories.
    ///
    /// `Some(seed)` makes the draws reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_categories(builtin_categories(), seed)
    }

    pub fn with_categories(categories: Vec<WordCategory>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            categories,
            rng: Mutex::new(rng),
        }
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// Pairs eligible for `topic`.
    fn candidates(&self, topic: Option<&str>) -> Vec<&WordPair> {
        let matching: Vec<&WordPair> = match topic.map(str::trim) {
            Some(t) if !t.is_empty() => self
                .categories
                .iter()
                .filter(|c| c.name.eq_ignore_ascii_case(t))
                .flat_map(|c| c.pairs.iter())
                .collect(),
            _ => Vec::new(),
        };

        if matching.is_empty() {
            self.categories.iter().flat_map(|c| c.pairs.iter()).collect()
        } else {
            matching
        }
    }

    /// Synchronous draw.
    pub fn draw(&self, topic: Option<&str>) -> Result<WordPair, ProviderError> {
        let candidates = self.candidates(topic);
        if candidates.is_empty() {
            return Err(ProviderError::Unavailable("word bank is empty".to_string()));
        }

        let mut rng = self
            .rng
            .lock()
            .map_err(|e| ProviderError::Unavailable(format!("RNG lock poisoned: {}", e)))?;
        let index = rng.random_range(0..candidates.len());
        Ok(candidates[index].clone())
    }
}

impl Default for WordBank {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl WordPairProvider for WordBank {
    async fn generate(&self, topic: Option<&str>) -> Result<WordPair, ProviderError> {
        self.draw(topic)
    }
}

fn builtin_categories() -> Vec<WordCategory> {
    vec![
        WordCategory::new(
            "food",
            &[
                ("Apple", "Pear"),
                ("Dumpling", "Wonton"),
                ("Butter", "Margarine"),
                ("Noodles", "Spaghetti"),
                ("Honey", "Syrup"),
                ("Muffin", "Cupcake"),
            ],
        ),
        WordCategory::new(
            "animals",
            &[
                ("Butterfly", "Moth"),
                ("Crocodile", "Alligator"),
                ("Rabbit", "Hare"),
                ("Dolphin", "Shark"),
                ("Wolf", "Fox"),
            ],
        ),
        WordCategory::new(
            "places",
            &[
                ("Library", "Bookstore"),
                ("Beach", "Lake"),
                ("Hospital", "Clinic"),
                ("Cinema", "Theatre"),
            ],
        ),
        WordCategory::new(
            "objects",
            &[
                ("Pillow", "Cushion"),
                ("Lipstick", "Lip balm"),
                ("Glasses", "Sunglasses"),
                ("Candle", "Lantern"),
                ("Umbrella", "Raincoat"),
            ],
        ),
    ]
}

/// Pair used by [`WithFallback`] unless another is given.
pub fn default_fallback_pair() -> WordPair {
    WordPair::new("Apple", "Pear")
}

/// Provider decorator that never fails.
///
/// When the inner provider errors, the fallback pair is returned instead
/// and a warning is logged.
#[derive(Debug)]
pub struct WithFallback<P> {
    inner: P,
    fallback: WordPair,
}

impl<P> WithFallback<P> {
    pub fn new(inner: P) -> Self {
        Self::with_pair(inner, default_fallback_pair())
    }

    pub fn with_pair(inner: P, fallback: WordPair) -> Self {
        Self { inner, fallback }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

#[async_trait]
impl<P: WordPairProvider> WordPairProvider for WithFallback<P> {
    async fn generate(&self, topic: Option<&str>) -> Result<WordPair, ProviderError> {
        match self.inner.generate(topic).await {
            Ok(pair) => Ok(pair),
            Err(e) => {
                warn!(error = %e, topic = ?topic, "Word provider failed, using fallback pair");
                Ok(self.fallback.clone())
            }
        }
    }
}
