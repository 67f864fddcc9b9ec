use std::path::{Path, PathBuf};

use crate::color::{normalize, Color, RawColor};
use crate::emotion_palette::{Palette, PaletteConfig};
use crate::error::{Error, Result};
use crate::pipeline::classify::EmotionClassifier;
use crate::pipeline::extract::{dominant_color, palette_colors};
use crate::pipeline::rank::{rank, Match};

/// Result of building from many images, some of which may not load.
#[derive(Debug)]
pub struct BulkOutcome {
    pub palette: Palette,
    /// Images that were skipped, with the reason.
    pub skipped: Vec<(PathBuf, Error)>,
}

/// Turns colors into a [`Palette`] using a shared, already-loaded classifier.
#[derive(Debug, Clone, Copy)]
pub struct PaletteBuilder<'a> {
    classifier: &'a EmotionClassifier,
    config: PaletteConfig,
}

impl<'a> PaletteBuilder<'a> {
    pub fn new(classifier: &'a EmotionClassifier) -> Self {
        Self {
            classifier,
            config: PaletteConfig::default(),
        }
    }

    pub fn with_config(classifier: &'a EmotionClassifier, config: PaletteConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { classifier, config })
    }

    pub fn topn(mut self, topn: usize) -> Result<Self> {
        self.config = PaletteConfig::new(topn, self.config.unique_words)?;
        Ok(self)
    }

    pub fn unique_words(mut self, unique_words: bool) -> Self {
        self.config.unique_words = unique_words;
        self
    }

    pub fn config(&self) -> PaletteConfig {
        self.config
    }

    /// Normalize, classify and rank `colors`.
    ///
    /// The first color that fails to normalize aborts the build with its error.
    pub fn build_from_colors<I>(&self, colors: I) -> Result<Palette>
    where
        I: IntoIterator,
        I::Item: Into<RawColor>,
    {
        let normalized = colors
            .into_iter()
            .map(|raw| normalize(&raw.into()))
            .collect::<Result<Vec<Color>>>()?;
        if normalized.is_empty() {
            return Err(Error::NoValidColors);
        }
        self.build_from_normalized(normalized)
    }

    pub fn build_from_single_color(&self, color: impl Into<RawColor>) -> Result<Palette> {
        self.build_from_colors([color.into()])
    }

    /// Palette of one image: its dominant color when `ncolors == 1`, otherwise
    /// up to `ncolors` extracted colors.
    pub fn build_from_image(&self, path: &Path, ncolors: usize) -> Result<Palette> {
        let colors = match ncolors {
            0 => return Err(Error::NoValidColors),
            1 => vec![dominant_color(path)?],
            n => palette_colors(path, n)?,
        };
        self.build_from_normalized(colors)
    }

    /// Palette of the dominant color of each image.
    ///
    /// Images that cannot be read are skipped and reported in
    /// [`BulkOutcome::skipped`]; the build fails only if none can be read.
    pub fn build_from_images<P: AsRef<Path>>(&self, paths: &[P]) -> Result<BulkOutcome> {
        let mut colors = Vec::with_capacity(paths.len());
        let mut skipped = Vec::new();
        for path in paths {
            let path = path.as_ref();
            match dominant_color(path) {
                Ok(color) => colors.push(color),
                Err(err) => skipped.push((path.to_path_buf(), err)),
            }
        }
        if colors.is_empty() {
            return Err(Error::NoValidColors);
        }
        let palette = self.build_from_normalized(colors)?;
        Ok(BulkOutcome { palette, skipped })
    }

    fn build_from_normalized(&self, colors: Vec<Color>) -> Result<Palette> {
        let matches: Vec<Match> = colors
            .into_iter()
            .map(|color| self.classifier.classify(color))
            .collect();
        let ranked = rank(matches, self.config.topn)?;
        Ok(Palette::new(ranked, self.config))
    }
}
