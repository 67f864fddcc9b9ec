use std::path::Path;

use image::imageops::FilterType;
use kmeans_colors::get_kmeans_hamerly;
use palette::Lab;

use crate::color::Color;
use crate::error::{Error, Result};

/// A color extracted from the image with its cluster weight.
#[derive(Debug, Clone)]
pub struct ExtractedColor {
    pub color: Color,
    pub weight: f32,
}

const MAX_DIM: u32 = 256;
const MAX_ITER: usize = 20;
const CONVERGE: f32 = 5.0;
const DEDUP_THRESHOLD: f32 = 25.0; // ΔE² < 25 means ΔE < 5
const SEED: u64 = 42;

/// Clusters used to pick a single dominant color.
pub const DOMINANT_CLUSTERS: usize = 5;

/// Load an image, resize to fit within 256x256 (preserving aspect ratio),
/// and convert all pixels to CIELAB space.
pub fn load_and_prepare(path: &Path) -> Result<Vec<Lab>> {
    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        message: if !path.exists() {
            "file not found".to_string()
        } else {
            "unsupported or corrupt image (supported: PNG, JPEG, WebP, BMP, TIFF, GIF)"
                .to_string()
        },
        source,
    })?;

    let img = if img.width() > MAX_DIM || img.height() > MAX_DIM {
        img.resize(MAX_DIM, MAX_DIM, FilterType::Lanczos3)
    } else {
        img
    };
    let rgb_img = img.to_rgb8();

    let pixels: Vec<Lab> = rgb_img
        .pixels()
        .map(|p| Color::new(p[0], p[1], p[2]).to_lab())
        .collect();

    Ok(pixels)
}

/// Run K-means on LAB pixels to extract dominant colors.
///
/// Returns deduplicated colors sorted by weight (descending).
/// Uses Hamerly's algorithm with K-means++ initialization and a fixed seed,
/// so the same image always yields the same colors.
pub fn extract_colors(pixels: &[Lab], k: usize) -> Vec<ExtractedColor> {
    let k = k.min(pixels.len());
    if k == 0 {
        return Vec::new();
    }
    let result = get_kmeans_hamerly(k, MAX_ITER, CONVERGE, false, pixels, SEED);

    let total = pixels.len() as f32;

    // Count pixels per centroid to compute weights
    let mut counts = vec![0u32; result.centroids.len()];
    for &idx in &result.indices {
        counts[idx as usize] += 1;
    }

    let mut colors: Vec<ExtractedColor> = result
        .centroids
        .iter()
        .enumerate()
        .filter(|(i, _)| counts[*i] > 0)
        .map(|(i, lab)| ExtractedColor {
            color: Color::from_lab(*lab),
            weight: counts[i] as f32 / total,
        })
        .collect();

    deduplicate(&mut colors);

    colors.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    colors
}

/// Merge colors that are too similar (ΔE < 5 in LAB space).
/// Keeps the first color and accumulates the weight.
fn deduplicate(colors: &mut Vec<ExtractedColor>) {
    let mut i = 0;
    while i < colors.len() {
        let mut j = i + 1;
        while j < colors.len() {
            let lab_i = colors[i].color.to_lab();
            let lab_j = colors[j].color.to_lab();
            let delta_e_sq = (lab_i.l - lab_j.l).powi(2)
                + (lab_i.a - lab_j.a).powi(2)
                + (lab_i.b - lab_j.b).powi(2);
            if delta_e_sq < DEDUP_THRESHOLD {
                colors[i].weight += colors[j].weight;
                colors.remove(j);
            } else {
                j += 1;
            }
        }
        i += 1;
    }
}

/// The most heavily weighted color of an image.
pub fn dominant_color(path: &Path) -> Result<Color> {
    let pixels = load_and_prepare(path)?;
    extract_colors(&pixels, DOMINANT_CLUSTERS)
        .first()
        .map(|c| c.color)
        .ok_or(Error::NoValidColors)
}

/// Up to `ncolors` representative colors of an image, heaviest first.
///
/// Near-duplicate clusters are merged, so fewer colors may come back.
pub fn palette_colors(path: &Path, ncolors: usize) -> Result<Vec<Color>> {
    let pixels = load_and_prepare(path)?;
    let colors: Vec<Color> = extract_colors(&pixels, ncolors)
        .into_iter()
        .map(|c| c.color)
        .collect();
    if colors.is_empty() {
        return Err(Error::NoValidColors);
    }
    Ok(colors)
}
