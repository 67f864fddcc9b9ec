use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::pipeline::rank::Match;
use crate::sentiment::SentimentScorer;

/// Build-time palette settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Keep only the `topn` closest matches
    pub topn: usize,
    /// Drop repeated emotion words, keeping the first occurrence
    pub unique_words: bool,
}

impl PaletteConfig {
    pub const DEFAULT_TOPN: usize = 100;

    pub fn new(topn: usize, unique_words: bool) -> Result<Self> {
        let config = Self { topn, unique_words };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.topn == 0 {
            return Err(Error::InvalidTopN(self.topn));
        }
        Ok(())
    }

    /// Load configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
            path: path.to_path_buf(),
            message: "cannot read file".to_string(),
            source: Box::new(e),
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| Error::ConfigLoad {
            path: path.to_path_buf(),
            message: "not a valid palette config".to_string(),
            source: Box::new(e),
        })?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            topn: Self::DEFAULT_TOPN,
            unique_words: false,
        }
    }
}

/// A ranked set of color/emotion matches.
///
/// Closest match first. Read-only once built; [`WordView`] and [`ColorView`]
/// borrow from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    matches: Vec<Match>,
    config: PaletteConfig,
}

impl Palette {
    /// `matches` must already be ranked and capped at `config.topn`.
    pub(crate) fn new(matches: Vec<Match>, config: PaletteConfig) -> Self {
        debug_assert!(matches.len() <= config.topn);
        Self { matches, config }
    }

    pub fn info(&self) -> &[Match] {
        &self.matches
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Match> {
        self.matches.iter()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn config(&self) -> PaletteConfig {
        self.config
    }

    pub fn words(&self) -> WordView<'_> {
        WordView {
            matches: &self.matches,
            unique: self.config.unique_words,
        }
    }

    pub fn colors(&self) -> ColorView<'_> {
        ColorView {
            matches: &self.matches,
        }
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a Match;
    type IntoIter = std::slice::Iter<'a, Match>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The emotion-word side of a palette.
#[derive(Debug, Clone, Copy)]
pub struct WordView<'a> {
    matches: &'a [Match],
    unique: bool,
}

impl<'a> WordView<'a> {
    /// Emotion labels in palette order, de-duplicated if the palette was built
    /// with `unique_words`.
    pub fn words(&self) -> Vec<&'a str> {
        let labels = self.matches.iter().map(|m| m.emotion.as_str());
        if !self.unique {
            return labels.collect();
        }
        let mut seen = HashSet::new();
        labels.filter(|label| seen.insert(*label)).collect()
    }

    /// The words joined by single spaces.
    pub fn text(&self) -> String {
        self.words().join(" ")
    }

    /// Aggregate sentiment of [`text`](Self::text), recomputed on every call.
    pub fn sentiment<S: SentimentScorer + ?Sized>(&self, scorer: &S) -> f64 {
        scorer.score(&self.text())
    }
}

/// The color side of a palette.
#[derive(Debug, Clone, Copy)]
pub struct ColorView<'a> {
    matches: &'a [Match],
}

impl ColorView<'_> {
    pub fn as_rgb(&self) -> Vec<Color> {
        self.matches.iter().map(|m| m.color).collect()
    }

    pub fn as_hex(&self) -> Vec<String> {
        self.matches.iter().map(|m| m.color.to_hex()).collect()
    }
}
