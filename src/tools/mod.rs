use crate::config::BinarizeConfig;
use crate::error::{BinarizeError, Result};
use crate::models::{Grid, Sample};
use crate::pipeline::Binarization;
use crate::pyramid::Layer;
use image::{GenericImageView, RgbImage};
use log::debug;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn max_dim_from_env() -> Option<u32> {
    match env::var("PYRBIN_MAX_DIM") {
        Ok(value) => match value.trim().parse::<u32>() {
            Ok(0) => None,
            Ok(v) => Some(v),
            Err(_) => None,
        },
        Err(_) => None,
    }
}

/// Load an image file as a sample grid.
///
/// When `PYRBIN_MAX_DIM` is set (and non-zero), larger images are
/// downscaled so their longest side fits.
pub fn load_samples<P: AsRef<Path>>(path: P) -> Result<Grid<Sample>> {
    let img = image::open(path)?;
    let rgb = if let Some(max_dim) = max_dim_from_env() {
        let (orig_w, orig_h) = img.dimensions();
        if orig_w.max(orig_h) > max_dim {
            img.resize(max_dim, max_dim, image::imageops::FilterType::Triangle)
                .to_rgb8()
        } else {
            img.to_rgb8()
        }
    } else {
        img.to_rgb8()
    };
    image_to_samples(&rgb)
}

/// Convert a decoded RGB image into a sample grid.
pub fn image_to_samples(rgb: &RgbImage) -> Result<Grid<Sample>> {
    let (width, height) = rgb.dimensions();
    crate::utils::pixels::rgb_to_samples(rgb.as_raw(), width as usize, height as usize)
}

/// Convert a sample grid into an RGB image buffer.
pub fn samples_to_image(samples: &Grid<Sample>) -> Result<RgbImage> {
    let (width, height) = samples.shape();
    RgbImage::from_raw(
        width as u32,
        height as u32,
        crate::utils::pixels::samples_to_rgb(samples),
    )
    .ok_or(BinarizeError::DimensionMismatch {
        expected: (width, height),
        actual: (0, 0),
    })
}

/// Save a sample grid; the format follows the file extension.
pub fn save_samples<P: AsRef<Path>>(samples: &Grid<Sample>, path: P) -> Result<()> {
    samples_to_image(samples)?.save(path)?;
    Ok(())
}

/// Render a pyramid layer as an RGB image.
pub fn layer_to_image(layer: &Layer) -> Result<RgbImage> {
    samples_to_image(layer.grid())
}

/// Render a threshold map as a gray image.
///
/// Values are scaled so the largest one maps to 255. A map whose maximum is
/// zero renders black.
pub fn threshold_map_to_image(map: &Grid<f64>) -> Result<RgbImage> {
    let max = map.as_slice().iter().fold(0.0f64, |a, &b| a.max(b));
    let gray = Grid::from_fn(map.width(), map.height(), |x, y| {
        if max == 0.0 {
            Sample::BLACK
        } else {
            Sample::gray(((map.get(x, y) / max) * 255.0).clamp(0.0, 255.0) as u8)
        }
    });
    samples_to_image(&gray)
}

/// Write every pyramid layer and threshold map of a run into `dir`.
///
/// Files are named `MIN_<k>.png`, `MAX_<k>.png`, `AVERAGE_<k>.png` and
/// `thresholds_<k>.png`.
///
/// # Returns
/// Number of files written
pub fn dump_intermediates<P: AsRef<Path>>(dir: P, binarization: &Binarization) -> Result<usize> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut written = 0usize;
    for pyramid in binarization.pyramids().iter() {
        for layer in pyramid.layers() {
            let path = dir.join(format!("{}_{}.png", pyramid.kind().name(), layer.index()));
            layer_to_image(layer)?.save(&path)?;
            written += 1;
        }
    }
    for (level, map) in binarization.surface().maps().iter().enumerate() {
        let path = dir.join(format!("thresholds_{level}.png"));
        threshold_map_to_image(map)?.save(&path)?;
        written += 1;
    }

    debug!("dumped {} intermediate images to {}", written, dir.display());
    Ok(written)
}

/// Summary statistics for a binarized image.
#[derive(Debug, Clone, Copy)]
pub struct BinaryStats {
    /// Count of black pixels.
    pub black_pixels: usize,
    /// Total pixels in the image.
    pub total_pixels: usize,
    /// Ratio of black pixels to total pixels.
    pub black_ratio: f64,
}

/// Compute black pixel stats for a binarized image.
pub fn binary_stats(binary: &Grid<Sample>) -> BinaryStats {
    let black = binary
        .as_slice()
        .iter()
        .filter(|s| **s == Sample::BLACK)
        .count();
    let total = binary.width() * binary.height();
    let ratio = if total == 0 {
        0.0
    } else {
        black as f64 / total as f64
    };
    BinaryStats {
        black_pixels: black,
        total_pixels: total,
        black_ratio: ratio,
    }
}

/// Default config with `PYRBIN_*` environment overrides applied.
///
/// Recognized variables: `PYRBIN_NOISE_THRESHOLD`, `PYRBIN_HYPOTHESIS`,
/// `PYRBIN_GAIN`, `PYRBIN_CUTOFF`, `PYRBIN_LEVEL`. Values that fail to
/// parse are ignored.
pub fn config_from_env() -> BinarizeConfig {
    config_from_vars(|key| env::var(key).ok())
}

/// Default config with overrides read through `lookup`.
pub fn config_from_vars<F>(lookup: F) -> BinarizeConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = BinarizeConfig::default();
    if let Some(v) = lookup("PYRBIN_NOISE_THRESHOLD").and_then(|v| v.trim().parse().ok()) {
        config.noise_threshold = v;
    }
    if let Some(v) = lookup("PYRBIN_HYPOTHESIS").and_then(|v| v.parse().ok()) {
        config.hypothesis = v;
    }
    if let Some(v) = lookup("PYRBIN_GAIN").and_then(|v| v.trim().parse().ok()) {
        config.gain = v;
    }
    if let Some(v) = lookup("PYRBIN_CUTOFF").and_then(|v| v.trim().parse().ok()) {
        config.cutoff = v;
    }
    if let Some(v) = lookup("PYRBIN_LEVEL").and_then(|v| v.trim().parse().ok()) {
        config.level = v;
    }
    config
}

/// Output file name for one parameter combination.
pub fn sweep_output_name(stem: &str, config: &BinarizeConfig) -> String {
    format!(
        "{}_out_{}_{}_{}.png",
        stem, config.noise_threshold, config.gain, config.cutoff
    )
}

/// Recursively collect image files under `root`, sorted.
pub fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy().to_lowercase();
                if matches!(
                    ext.as_str(),
                    "png" | "jpg" | "jpeg" | "gif" | "bmp" | "tif" | "tiff"
                ) {
                    images.push(path);
                }
            }
        }
    }

    images.sort();
    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threshold::Hypothesis;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEMP_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_dir() -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before UNIX epoch")
            .as_nanos();
        let sequence = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        path.push(format!("pyrbin_tools_{nanos}_{sequence}"));
        fs::create_dir_all(&path).expect("failed to create temp dir");
        path
    }

    fn stripes(width: usize, height: usize) -> Grid<Sample> {
        Grid::from_fn(width, height, |x, _| {
            if (x / 3) % 2 == 0 {
                Sample::new(20, 30, 40)
            } else {
                Sample::new(200, 210, 220)
            }
        })
    }

    #[test]
    fn test_config_from_vars_applies_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PYRBIN_NOISE_THRESHOLD", "12.5"),
            ("PYRBIN_HYPOTHESIS", "average-min-max"),
            ("PYRBIN_GAIN", " 3 "),
            ("PYRBIN_CUTOFF", "not-a-number"),
        ]
        .into_iter()
        .collect();
        let config = config_from_vars(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.noise_threshold, 12.5);
        assert_eq!(config.hypothesis, Hypothesis::AverageMinMax);
        assert_eq!(config.gain, 3.0);
        // Unparsable and missing values keep defaults
        assert_eq!(config.cutoff, BinarizeConfig::default().cutoff);
        assert_eq!(config.level, BinarizeConfig::default().level);
    }

    #[test]
    fn test_threshold_map_normalizes_to_max() {
        let mut map = Grid::filled(2, 1, 100.0);
        map.set(1, 0, 400.0);
        let img = threshold_map_to_image(&map).unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [63, 63, 63]);
        assert_eq!(img.get_pixel(1, 0).0, [255, 255, 255]);

        let zero = threshold_map_to_image(&Grid::filled(3, 3, 0.0)).unwrap();
        assert!(zero.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_save_and_load_roundtrip_png() {
        let dir = temp_dir();
        let path = dir.join("stripes.png");
        let samples = stripes(12, 8);
        save_samples(&samples, &path).unwrap();
        assert_eq!(load_samples(&path).unwrap(), samples);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_dump_writes_every_level() {
        let dir = temp_dir();
        let image = stripes(32, 16);
        let binarization = Binarization::analyze(&image, Hypothesis::LocalAverage, 5.0).unwrap();
        let depth = binarization.depth();

        let written = dump_intermediates(&dir, &binarization).unwrap();
        assert_eq!(written, depth * 4);
        assert!(dir.join("MIN_0.png").exists());
        assert!(dir.join(format!("thresholds_{}.png", depth - 1)).exists());
        assert_eq!(collect_images(&dir).len(), written);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_binary_stats_counts_black() {
        let mut grid = Grid::filled(4, 4, Sample::WHITE);
        grid.set(0, 0, Sample::BLACK);
        grid.set(3, 3, Sample::BLACK);
        let stats = binary_stats(&grid);
        assert_eq!(stats.black_pixels, 2);
        assert_eq!(stats.total_pixels, 16);
        assert!((stats.black_ratio - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_sweep_names_include_parameters() {
        let config = BinarizeConfig::default()
            .with_noise_threshold(5.0)
            .with_gain(9.0)
            .with_cutoff(240);
        assert_eq!(sweep_output_name("3", &config), "3_out_5_9_240.png");
    }
}
