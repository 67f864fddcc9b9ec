use serde::Serialize;

use crate::color::Color;
use crate::error::{Error, Result};

/// A color paired with its nearest emotion and the distance to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    #[serde(serialize_with = "serialize_hex")]
    pub color: Color,
    pub emotion: String,
    pub distance: f64,
}

fn serialize_hex<S: serde::Serializer>(color: &Color, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&color.to_hex())
}

/// Keep the `topn` closest matches, nearest first.
///
/// The sort is stable, so matches at equal distance stay in input order.
pub fn rank(mut matches: Vec<Match>, topn: usize) -> Result<Vec<Match>> {
    if matches.is_empty() {
        return Err(Error::EmptyInput);
    }
    if topn == 0 {
        return Err(Error::InvalidTopN(topn));
    }
    matches.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    matches.truncate(topn);
    Ok(matches)
}
