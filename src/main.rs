mod cli;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use cli::Args;
use emotapal::{
    Color, EmotionClassifier, Lexicon, Match, Palette, PaletteBuilder, PaletteConfig, RawColor,
};

#[derive(Serialize)]
struct Report<'a> {
    matches: &'a [Match],
    words: Vec<&'a str>,
    colors: Vec<String>,
    sentiment: f64,
    skipped: Vec<Skipped>,
}

#[derive(Serialize)]
struct Skipped {
    path: PathBuf,
    reason: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let owned_model;
    let classifier = match &args.model {
        Some(path) => {
            owned_model = EmotionClassifier::from_path(path)
                .with_context(|| format!("cannot use model {}", path.display()))?;
            &owned_model
        }
        None => EmotionClassifier::bundled()?,
    };
    if args.verbose {
        eprintln!(
            "Model: {} ({} exemplars, {} emotions)",
            args.model
                .as_ref()
                .map_or_else(|| "bundled".to_string(), |p| p.display().to_string()),
            classifier.len(),
            classifier.labels().len()
        );
    }

    let owned_lexicon;
    let lexicon = match &args.lexicon {
        Some(path) => {
            owned_lexicon = Lexicon::from_path(path)?;
            &owned_lexicon
        }
        None => Lexicon::bundled()?,
    };

    let mut config = match &args.config {
        Some(path) => PaletteConfig::from_json_file(path)?,
        None => PaletteConfig::default(),
    };
    if let Some(topn) = args.topn {
        config.topn = topn;
    }
    config.unique_words |= args.unique_words;
    let builder = PaletteBuilder::with_config(classifier, config)?;
    if args.verbose {
        eprintln!("Config: topn={} unique_words={}", config.topn, config.unique_words);
    }

    let mut skipped = Vec::new();
    let palette = if let Some(image) = &args.image {
        if args.verbose {
            eprintln!("Loading: {} ({} colors)", image.display(), args.ncolors);
        }
        builder.build_from_image(image, args.ncolors)?
    } else if !args.images.is_empty() {
        let outcome = builder
            .build_from_images(&args.images)
            .context("none of the images could be read")?;
        for (path, err) in outcome.skipped {
            if args.verbose {
                eprintln!("Skipped: {err}");
            }
            skipped.push(Skipped {
                path,
                reason: err.to_string(),
            });
        }
        outcome.palette
    } else {
        let raw = match &args.colors_file {
            Some(path) => read_colors_file(path)?,
            None => args.colors.iter().map(|c| RawColor::parse(c)).collect(),
        };
        if args.verbose {
            eprintln!("Matching {} colors", raw.len());
        }
        builder.build_from_colors(raw)?
    };

    if args.json {
        let report = Report {
            matches: palette.info(),
            words: palette.words().words(),
            colors: palette.colors().as_hex(),
            sentiment: palette.words().sentiment(lexicon),
            skipped,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&palette, lexicon));
    }

    if args.preview {
        println!("{}", render_preview(&palette));
    }

    Ok(())
}

fn read_colors_file(path: &std::path::Path) -> Result<Vec<RawColor>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read colors file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("colors file {} is not a JSON array of colors", path.display()))
}

/// One `#rrggbb  emotion  distance` line per match, then words and sentiment.
fn render_text(palette: &Palette, lexicon: &Lexicon) -> String {
    let width = palette
        .iter()
        .map(|m| m.emotion.len())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for m in palette {
        out.push_str(&format!(
            "{}  {:<width$}  {:>7.2}\n",
            m.color.to_hex(),
            m.emotion,
            m.distance
        ));
    }
    let words = palette.words();
    out.push_str(&format!("words: {}\n", words.text()));
    out.push_str(&format!("sentiment: {}\n", words.sentiment(lexicon)));
    out
}

/// ANSI truecolor swatches labeled with their hex code.
fn render_preview(palette: &Palette) -> String {
    palette
        .colors()
        .as_rgb()
        .into_iter()
        .map(|c| {
            let (fr, fg, fb) = contrast_fg(c);
            format!(
                "\x1b[48;2;{};{};{}m\x1b[38;2;{fr};{fg};{fb}m {} \x1b[0m",
                c.r, c.g, c.b, c
            )
        })
        .collect()
}

/// Choose black or white text for a readable label on the given background.
fn contrast_fg(c: Color) -> (u8, u8, u8) {
    if c.relative_luminance() > 0.4 {
        (0, 0, 0)
    } else {
        (255, 255, 255)
    }
}
