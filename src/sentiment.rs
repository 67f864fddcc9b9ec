//! Sentiment scoring for emotion word lists.
//!
//! The palette only needs "text in, number out"; [`SentimentScorer`] is that
//! seam. [`Lexicon`] is the bundled implementation: an AFINN-style table of
//! word valences in `[-5, 5]`, summed over every token of the input.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::{Error, Result};

const BUNDLED_LEXICON: &str = include_str!("../data/lexicon.tsv");

static BUNDLED: OnceLock<Lexicon> = OnceLock::new();

/// Maps a piece of text to an aggregate sentiment score.
pub trait SentimentScorer {
    fn score(&self, text: &str) -> f64;
}

impl<F> SentimentScorer for F
where
    F: Fn(&str) -> f64,
{
    fn score(&self, text: &str) -> f64 {
        self(text)
    }
}

/// Word → valence table.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    valences: HashMap<String, i32>,
}

impl Lexicon {
    /// Parse `word<TAB>score` lines. Blank lines and `#` comments are skipped.
    pub fn parse(tsv: &str) -> Result<Self> {
        let mut valences = HashMap::new();
        for (lineno, line) in tsv.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((word, score)) = line.rsplit_once('\t') else {
                return Err(Error::lexicon_load(format!(
                    "line {}: expected word<TAB>score",
                    lineno + 1
                )));
            };
            let score: i32 = score.trim().parse().map_err(|e| {
                Error::lexicon_load_with(format!("line {}: bad score {score:?}", lineno + 1), e)
            })?;
            valences.insert(word.trim().to_lowercase(), score);
        }
        Ok(Self { valences })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let tsv = std::fs::read_to_string(path)
            .map_err(|e| Error::lexicon_load_with(format!("cannot read {}", path.display()), e))?;
        Self::parse(&tsv)
    }

    /// The lexicon shipped with the crate, parsed on first use and shared for
    /// the rest of the process.
    pub fn bundled() -> Result<&'static Self> {
        if let Some(lexicon) = BUNDLED.get() {
            return Ok(lexicon);
        }
        let lexicon = Self::parse(BUNDLED_LEXICON)?;
        Ok(BUNDLED.get_or_init(|| lexicon))
    }

    pub fn valence(&self, word: &str) -> Option<i32> {
        self.valences.get(&word.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }
}

impl SentimentScorer for Lexicon {
    fn score(&self, text: &str) -> f64 {
        text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|token| !token.is_empty())
            .filter_map(|token| self.valence(token))
            .map(f64::from)
            .sum()
    }
}
