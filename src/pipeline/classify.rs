use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::pipeline::rank::Match;

/// Model compiled into the binary.
const BUNDLED_MODEL: &str = include_str!("../../data/model.json");

static BUNDLED: OnceLock<EmotionClassifier> = OnceLock::new();

/// Distance metric a model was trained under.
///
/// Distances are only comparable between models that share a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum DistanceMetric {
    /// Euclidean distance over 8-bit RGB components, in `[0, MAX_RGB_DISTANCE]`.
    #[serde(rename = "euclidean-rgb")]
    EuclideanRgb,
}

/// Largest possible distance between two colors (black to white).
pub const MAX_RGB_DISTANCE: f64 = 441.672_955_930_063_7;

/// Euclidean distance between two colors in RGB space.
pub fn rgb_distance(a: Color, b: Color) -> f64 {
    let dr = f64::from(a.r) - f64::from(b.r);
    let dg = f64::from(a.g) - f64::from(b.g);
    let db = f64::from(a.b) - f64::from(b.b);
    (dr * dr + dg * dg + db * db).sqrt()
}

/// One labeled training point.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Exemplar {
    #[serde(deserialize_with = "deserialize_rgb")]
    pub color: Color,
    pub emotion: String,
}

fn deserialize_rgb<'de, D>(deserializer: D) -> std::result::Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    <[u8; 3]>::deserialize(deserializer).map(Color::from)
}

#[derive(Debug, Deserialize)]
struct ModelFile {
    metric: DistanceMetric,
    k: usize,
    exemplars: Vec<Exemplar>,
}

/// A neighbor returned by [`EmotionClassifier::kneighbors`].
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor<'a> {
    pub exemplar: &'a Exemplar,
    pub distance: f64,
}

/// Nearest-neighbor classifier over labeled RGB exemplars.
///
/// Immutable once loaded; share it by reference across threads.
#[derive(Debug, Clone)]
pub struct EmotionClassifier {
    metric: DistanceMetric,
    k: usize,
    exemplars: Vec<Exemplar>,
}

impl EmotionClassifier {
    /// Parse a model from its JSON form.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: ModelFile = serde_json::from_str(json)
            .map_err(|e| Error::model_load_with("model is not valid JSON", e))?;
        Self::from_parts(file.metric, file.k, file.exemplars)
    }

    /// Load a model file from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::model_load_with(format!("cannot read {}", path.display()), e)
        })?;
        Self::from_json_str(&json)
    }

    /// The model shipped with the crate, parsed on first use and shared for the
    /// rest of the process.
    pub fn bundled() -> Result<&'static Self> {
        if let Some(classifier) = BUNDLED.get() {
            return Ok(classifier);
        }
        let classifier = Self::from_json_str(BUNDLED_MODEL)?;
        Ok(BUNDLED.get_or_init(|| classifier))
    }

    fn from_parts(metric: DistanceMetric, k: usize, exemplars: Vec<Exemplar>) -> Result<Self> {
        if k == 0 {
            return Err(Error::model_load("k must be at least 1"));
        }
        if exemplars.is_empty() {
            return Err(Error::model_load("model has no exemplars"));
        }
        if let Some(i) = exemplars.iter().position(|e| e.emotion.trim().is_empty()) {
            return Err(Error::model_load(format!("exemplar {i} has an empty label")));
        }
        Ok(Self {
            metric,
            k,
            exemplars,
        })
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Neighbor count the model was trained with. Classification always uses
    /// the single nearest exemplar.
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn len(&self) -> usize {
        self.exemplars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exemplars.is_empty()
    }

    pub fn exemplars(&self) -> &[Exemplar] {
        &self.exemplars
    }

    /// Distinct emotion labels, in the order they first appear in the model.
    pub fn labels(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.exemplars
            .iter()
            .map(|e| e.emotion.as_str())
            .filter(|label| seen.insert(*label))
            .collect()
    }

    /// The `k` exemplars closest to `color`, nearest first.
    ///
    /// Equal distances keep model order.
    pub fn kneighbors(&self, color: Color, k: usize) -> Vec<Neighbor<'_>> {
        let mut neighbors: Vec<Neighbor<'_>> = self
            .exemplars
            .iter()
            .map(|exemplar| Neighbor {
                exemplar,
                distance: rgb_distance(color, exemplar.color),
            })
            .collect();
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(k);
        neighbors
    }

    /// Label `color` with the emotion of its nearest exemplar.
    pub fn classify(&self, color: Color) -> Match {
        let ds = self
            .exemplars
            .iter()
            .map(|exemplar| rgb_distance(color, exemplar.color));

        // strict `<` keeps the first of equally distant exemplars
        let mut min = f64::INFINITY;
        let mut min_idx = 0;
        for (idx, d) in ds.enumerate() {
            if d < min {
                min = d;
                min_idx = idx;
            }
        }

        Match {
            color,
            emotion: self.exemplars[min_idx].emotion.clone(),
            distance: min,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY_MODEL: &str = r#"{
        "metric": "euclidean-rgb",
        "k": 3,
        "exemplars": [
            { "color": [255, 255, 0], "emotion": "happy" },
            { "color": [0, 0, 255], "emotion": "sad" },
            { "color": [255, 0, 0], "emotion": "anger" },
            { "color": [0, 0, 255], "emotion": "calm" },
            { "color": [250, 250, 10], "emotion": "happy" }
        ]
    }"#;

    fn tiny() -> EmotionClassifier {
        EmotionClassifier::from_json_str(TINY_MODEL).unwrap()
    }

    #[test]
    fn exemplar_matches_itself_at_zero_distance() {
        let m = tiny().classify(Color::new(255, 0, 0));
        assert_eq!(m.emotion, "anger");
        assert_eq!(m.distance, 0.0);
        assert_eq!(m.color, Color::new(255, 0, 0));
    }

    #[test]
    fn nearest_label_wins() {
        let m = tiny().classify(Color::new(240, 240, 30));
        assert_eq!(m.emotion, "happy");
        let expected = rgb_distance(Color::new(240, 240, 30), Color::new(250, 250, 10));
        assert!((m.distance - expected).abs() < 1e-9);
    }

    #[test]
    fn ties_resolve_to_first_exemplar() {
        // "sad" and "calm" share a color; "sad" comes first
        let clf = tiny();
        let m = clf.classify(Color::new(0, 0, 250));
        assert_eq!(m.emotion, "sad");
        let neighbors = clf.kneighbors(Color::new(0, 0, 250), 2);
        assert_eq!(neighbors[0].exemplar.emotion, "sad");
        assert_eq!(neighbors[1].exemplar.emotion, "calm");
    }

    #[test]
    fn kneighbors_sorted_and_truncated() {
        let clf = tiny();
        let neighbors = clf.kneighbors(Color::new(128, 128, 128), 3);
        assert_eq!(neighbors.len(), 3);
        for pair in neighbors.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
        assert_eq!(clf.kneighbors(Color::new(0, 0, 0), 50).len(), clf.len());
    }

    #[test]
    fn classify_agrees_with_first_neighbor() {
        let clf = tiny();
        for color in [Color::new(10, 200, 90), Color::new(200, 10, 90), Color::new(0, 0, 0)] {
            let m = clf.classify(color);
            let first = &clf.kneighbors(color, 1)[0];
            assert_eq!(m.emotion, first.exemplar.emotion);
            assert_eq!(m.distance, first.distance);
        }
    }

    #[test]
    fn labels_are_distinct_in_model_order() {
        assert_eq!(tiny().labels(), vec!["happy", "sad", "anger", "calm"]);
    }

    #[test]
    fn model_metadata() {
        let clf = tiny();
        assert_eq!(clf.k(), 3);
        assert_eq!(clf.metric(), DistanceMetric::EuclideanRgb);
        assert_eq!(clf.len(), 5);
    }

    #[test]
    fn distance_bounds() {
        let black = Color::new(0, 0, 0);
        let white = Color::new(255, 255, 255);
        assert!((rgb_distance(black, white) - MAX_RGB_DISTANCE).abs() < 1e-9);
        assert_eq!(rgb_distance(white, white), 0.0);
    }

    #[test]
    fn corrupt_json_fails_to_load() {
        let err = EmotionClassifier::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, Error::ModelLoad { .. }));
    }

    #[test]
    fn unknown_metric_fails_to_load() {
        let json = r#"{ "metric": "cosine", "k": 1, "exemplars": [
            { "color": [1, 2, 3], "emotion": "x" } ] }"#;
        assert!(matches!(
            EmotionClassifier::from_json_str(json),
            Err(Error::ModelLoad { .. })
        ));
    }

    #[test]
    fn empty_model_fails_to_load() {
        let json = r#"{ "metric": "euclidean-rgb", "k": 1, "exemplars": [] }"#;
        assert!(matches!(
            EmotionClassifier::from_json_str(json),
            Err(Error::ModelLoad { .. })
        ));
    }

    #[test]
    fn zero_k_and_blank_label_fail_to_load() {
        let zero_k = r#"{ "metric": "euclidean-rgb", "k": 0, "exemplars": [
            { "color": [1, 2, 3], "emotion": "x" } ] }"#;
        assert!(EmotionClassifier::from_json_str(zero_k).is_err());
        let blank = r#"{ "metric": "euclidean-rgb", "k": 1, "exemplars": [
            { "color": [1, 2, 3], "emotion": "  " } ] }"#;
        assert!(EmotionClassifier::from_json_str(blank).is_err());
    }

    #[test]
    fn out_of_range_exemplar_fails_to_load() {
        let json = r#"{ "metric": "euclidean-rgb", "k": 1, "exemplars": [
            { "color": [300, 2, 3], "emotion": "x" } ] }"#;
        assert!(EmotionClassifier::from_json_str(json).is_err());
    }

    #[test]
    fn missing_file_fails_to_load() {
        let err = EmotionClassifier::from_path(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn bundled_model_loads_once() {
        let a = EmotionClassifier::bundled().unwrap();
        let b = EmotionClassifier::bundled().unwrap();
        assert!(std::ptr::eq(a, b));
        assert!(!a.is_empty());
        assert_eq!(a.metric(), DistanceMetric::EuclideanRgb);
    }

    #[test]
    fn bundled_exemplars_classify_to_themselves() {
        let clf = EmotionClassifier::bundled().unwrap();
        for exemplar in clf.exemplars() {
            let m = clf.classify(exemplar.color);
            assert_eq!(m.distance, 0.0);
            assert_eq!(m.emotion, exemplar.emotion);
        }
    }

    #[test]
    fn classifier_is_shareable_across_threads() {
        let clf = tiny();
        let colors = [Color::new(250, 0, 0), Color::new(0, 0, 240), Color::new(255, 250, 0)];
        let labels: Vec<String> = std::thread::scope(|s| {
            let handles: Vec<_> = colors
                .iter()
                .map(|&c| {
                    let clf = &clf;
                    s.spawn(move || clf.classify(c).emotion)
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(labels, vec!["anger", "sad", "happy"]);
    }
}
