//! # emotapal
//!
//! Match colors to the emotions people most associate with them.
//!
//! Each input color is labeled with the emotion of its nearest exemplar in a
//! pre-trained color/emotion model, the matches are ranked by distance, and
//! the result is exposed as a [`Palette`]: a color side ([`ColorView`]) and a
//! word side ([`WordView`]) with an aggregate sentiment score.
//!
//! ```no_run
//! use emotapal::{EmotionClassifier, Lexicon, PaletteBuilder};
//!
//! let classifier = EmotionClassifier::bundled()?;
//! let palette = PaletteBuilder::new(classifier)
//!     .unique_words(true)
//!     .build_from_colors(["#ffdd33", "#283c9f"])?;
//!
//! println!("{:?}", palette.colors().as_hex());
//! println!("{:?}", palette.words().words());
//! println!("{}", palette.words().sentiment(Lexicon::bundled()?));
//! # Ok::<(), emotapal::Error>(())
//! ```

pub mod builder;
pub mod color;
pub mod emotion_palette;
pub mod error;
pub mod pipeline;
pub mod sentiment;

pub use builder::{BulkOutcome, PaletteBuilder};
pub use color::{hex_to_rgb, normalize, rgb_to_hex, Color, RawColor};
pub use emotion_palette::{ColorView, Palette, PaletteConfig, WordView};
pub use error::{Error, Result};
pub use pipeline::classify::{rgb_distance, DistanceMetric, EmotionClassifier, Exemplar, Neighbor};
pub use pipeline::rank::{rank, Match};
pub use sentiment::{Lexicon, SentimentScorer};
