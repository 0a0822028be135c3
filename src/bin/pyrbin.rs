use clap::{Parser, Subcommand};
use log::{info, warn};
use pyramid_binarize::tools::{
    binary_stats, collect_images, config_from_env, dump_intermediates, load_samples, save_samples,
    sweep_output_name,
};
use pyramid_binarize::{Binarization, BinarizeConfig, Hypothesis};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "pyrbin", version, about = "Pyramid binarization CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Binarize a single image
    Binarize {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[arg(long)]
        noise: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        gain: Option<f64>,
        #[arg(long)]
        cutoff: Option<u8>,
        #[arg(long)]
        level: Option<usize>,
        #[arg(long)]
        hypothesis: Option<Hypothesis>,
        /// Also write every pyramid layer and threshold map here
        #[arg(long)]
        dump_dir: Option<PathBuf>,
    },
    /// Print pyramid depth, layer shapes and threshold ranges for an image
    Inspect {
        #[arg(long)]
        input: PathBuf,
    },
    /// Binarize every image under a directory with each parameter combination
    Sweep {
        #[arg(long)]
        root: PathBuf,
        #[arg(long)]
        out_dir: PathBuf,
        #[arg(long, value_delimiter = ',', num_args = 1.., default_value = "5")]
        noise: Vec<f64>,
        #[arg(long, value_delimiter = ',', num_args = 1.., default_value = "9")]
        gain: Vec<f64>,
        #[arg(long, value_delimiter = ',', num_args = 1.., default_value = "240")]
        cutoff: Vec<u8>,
        #[arg(long)]
        level: Option<usize>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Binarize {
            input,
            output,
            noise,
            gain,
            cutoff,
            level,
            hypothesis,
            dump_dir,
        } => {
            let mut config = config_from_env();
            if let Some(v) = noise {
                config.noise_threshold = v;
            }
            if let Some(v) = gain {
                config.gain = v;
            }
            if let Some(v) = cutoff {
                config.cutoff = v;
            }
            if let Some(v) = level {
                config.level = v;
            }
            if let Some(v) = hypothesis {
                config.hypothesis = v;
            }
            binarize_cmd(&input, &output, &config, dump_dir.as_deref())
        }
        Command::Inspect { input } => inspect_cmd(&input),
        Command::Sweep {
            root,
            out_dir,
            noise,
            gain,
            cutoff,
            level,
        } => sweep_cmd(&root, &out_dir, &noise, &gain, &cutoff, level),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn binarize_cmd(
    input: &Path,
    output: &Path,
    config: &BinarizeConfig,
    dump_dir: Option<&Path>,
) -> pyramid_binarize::Result<()> {
    let image = load_samples(input)?;
    println!("Image: {} ({}x{})", input.display(), image.width(), image.height());

    let start = Instant::now();
    let binarization = Binarization::from_config(&image, config)?;
    let binary = binarization.render(&image, config.level, config.gain, config.cutoff)?;
    let elapsed = start.elapsed();

    if let Some(dir) = dump_dir {
        let written = dump_intermediates(dir, &binarization)?;
        println!("Wrote {} debug images to {}", written, dir.display());
    }

    save_samples(&binary, output)?;
    let stats = binary_stats(&binary);
    println!(
        "Binary: black_pixels={} total={} black_ratio={:.2}% ({:.2?})",
        stats.black_pixels,
        stats.total_pixels,
        stats.black_ratio * 100.0,
        elapsed
    );
    Ok(())
}

fn inspect_cmd(input: &Path) -> pyramid_binarize::Result<()> {
    let image = load_samples(input)?;
    let config = config_from_env();
    println!("Image: {} ({}x{})", input.display(), image.width(), image.height());

    let binarization = Binarization::from_config(&image, &config)?;
    println!(
        "Pyramid depth: {} (hypothesis {}, noise {})",
        binarization.depth(),
        config.hypothesis,
        config.noise_threshold
    );

    let surface = binarization.surface();
    let stats = surface.stats();
    for (level, layer) in binarization.pyramids().min().layers().iter().enumerate() {
        let (lo, hi) = surface.range(level)?;
        println!(
            "  Level {}: {}x{} thresholds={:.1}-{:.1} blended={} gated={}",
            level,
            layer.width(),
            layer.height(),
            lo,
            hi,
            stats.blended[level],
            stats.gated[level]
        );
    }
    Ok(())
}

fn sweep_cmd(
    root: &Path,
    out_dir: &Path,
    noises: &[f64],
    gains: &[f64],
    cutoffs: &[u8],
    level: Option<usize>,
) -> pyramid_binarize::Result<()> {
    let images = collect_images(root);
    if images.is_empty() {
        println!("No images found under {}", root.display());
        return Ok(());
    }
    std::fs::create_dir_all(out_dir)?;

    let base = config_from_env();
    let level = level.unwrap_or(base.level);
    let start = Instant::now();

    let written: usize = images
        .par_iter()
        .map(|path| match sweep_image(path, out_dir, &base, noises, gains, cutoffs, level) {
            Ok(count) => count,
            Err(err) => {
                warn!("skipping {}: {}", path.display(), err);
                0
            }
        })
        .sum();

    println!(
        "Processed {} images, wrote {} outputs to {} in {:.2?}",
        images.len(),
        written,
        out_dir.display(),
        start.elapsed()
    );
    Ok(())
}

fn sweep_image(
    path: &Path,
    out_dir: &Path,
    base: &BinarizeConfig,
    noises: &[f64],
    gains: &[f64],
    cutoffs: &[u8],
    level: usize,
) -> pyramid_binarize::Result<usize> {
    let image = load_samples(path)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    let mut written = 0usize;
    for &noise in noises {
        let config = base.with_noise_threshold(noise);
        // The surface depends only on noise and hypothesis
        let binarization = Binarization::from_config(&image, &config)?;
        for &gain in gains {
            for &cutoff in cutoffs {
                let config = config.with_gain(gain).with_cutoff(cutoff).with_level(level);
                let binary =
                    binarization.render(&image, config.level, config.gain, config.cutoff)?;
                let out = out_dir.join(sweep_output_name(&stem, &config));
                save_samples(&binary, &out)?;
                written += 1;
            }
        }
    }
    info!("{}: {} outputs", path.display(), written);
    Ok(written)
}
