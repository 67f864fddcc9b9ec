use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::{ArgGroup, Parser};

/// Match colors to the emotions people associate with them.
#[derive(Parser, Debug)]
#[command(name = "emotapal", version, about)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(["colors", "image", "images", "colors_file"]),
))]
pub struct Args {
    /// Colors to match: `#rrggbb`, `rrggbb` or `r,g,b`
    pub colors: Vec<String>,

    /// Build the palette from one image file
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Colors to extract from --image (1 = dominant color only)
    #[arg(
        short = 'n',
        long,
        default_value_t = 1,
        requires = "image",
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub ncolors: usize,

    /// Build the palette from the dominant color of each image; unreadable images are skipped
    #[arg(long, num_args = 1..)]
    pub images: Vec<PathBuf>,

    /// Read colors from a JSON array (hex strings or [r, g, b] arrays)
    #[arg(long)]
    pub colors_file: Option<PathBuf>,

    /// Keep only the N closest matches [default: 100]
    #[arg(short, long)]
    pub topn: Option<usize>,

    /// Drop repeated emotion words
    #[arg(short, long)]
    pub unique_words: bool,

    /// Palette settings as JSON (`topn`, `unique_words`); flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Emotion model to use instead of the bundled one
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Sentiment lexicon (word<TAB>score) to use instead of the bundled one
    #[arg(long)]
    pub lexicon: Option<PathBuf>,

    /// Print the palette as JSON
    #[arg(long)]
    pub json: bool,

    /// Print a colored terminal preview of the palette
    #[arg(long)]
    pub preview: bool,

    /// Report progress on stderr
    #[arg(short, long)]
    pub verbose: bool,
}
