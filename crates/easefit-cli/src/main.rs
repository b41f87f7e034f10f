mod input;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use easefit_core::{CubicBezier, FitConfig};
use easefit_solver::{fit_tracks, summarize};

use crate::input::{validate_frame_rate, FitInput, DEFAULT_FRAME_RATE};

#[derive(Parser)]
#[command(
    name = "easefit",
    version,
    about = "easefit: fit cubic-bezier easing curves to baked keyframes",
    long_about = "Fits a single CSS-style cubic-bezier(x1, y1, x2, y2) timing curve to\nbaked keyframe samples and reports the fit error and the matching keyframe ease."
)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Fit options shared by the commands that read a configuration.
#[derive(clap::Args, Debug, Default)]
struct ConfigArgs {
    /// TOML file with fit options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Constrain y1 and y2 to [0, 1] (no anticipation or overshoot)
    #[arg(long)]
    clamp_y: bool,

    /// Penalize solutions where x1 > x2
    #[arg(long)]
    enforce_x_order: bool,

    /// Fit from a single seed instead of the restart grid
    #[arg(long)]
    no_restart_grid: bool,

    /// Nelder-Mead iterations per seed (clamped to 40..=2000)
    #[arg(long)]
    iterations: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit every track in a JSON input file
    Fit {
        /// Path to the JSON file with the tracks to fit
        #[arg()]
        file: PathBuf,

        #[command(flatten)]
        options: ConfigArgs,

        /// Frame rate for reporting the worst frame (overrides the input file)
        #[arg(long)]
        frame_rate: Option<f64>,

        /// Print reports as JSON
        #[arg(long)]
        json: bool,

        /// Print the full report for every track
        #[arg(long, conflicts_with = "json")]
        detail: bool,
    },

    /// Sample a cubic-bezier curve at evenly spaced times
    Eval {
        /// Curve as `cubic-bezier(x1, y1, x2, y2)` or `x1,y1,x2,y2`
        #[arg()]
        curve: String,

        /// Number of intervals between t=0 and t=1
        #[arg(long, default_value_t = 10)]
        steps: usize,
    },

    /// Print the effective fit configuration as TOML
    Config {
        #[command(flatten)]
        options: ConfigArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Fit {
            file,
            options,
            frame_rate,
            json,
            detail,
        } => cmd_fit(&file, &options, frame_rate, json, detail),
        Commands::Eval { curve, steps } => cmd_eval(&curve, steps),
        Commands::Config { options } => cmd_config(&options),
    }
}

/// Merge the config file (if any) with command-line overrides.
fn build_config(options: &ConfigArgs) -> Result<FitConfig> {
    let mut config = match &options.config {
        Some(path) => FitConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => FitConfig::default(),
    };

    if options.clamp_y {
        config.clamp_y_to_unit = true;
    }
    if options.enforce_x_order {
        config.enforce_x_order = true;
    }
    if options.no_restart_grid {
        config.use_restart_grid = false;
    }
    if let Some(iterations) = options.iterations {
        config.max_iterations_per_seed = iterations;
    }

    config.normalized().context("Invalid fit configuration")
}

fn cmd_fit(
    file: &Path,
    options: &ConfigArgs,
    frame_rate: Option<f64>,
    json: bool,
    detail: bool,
) -> Result<()> {
    let config = build_config(options)?;
    let input = FitInput::load(file)?;
    let frame_rate = match frame_rate.or(input.frame_rate) {
        Some(rate) => validate_frame_rate(rate)?,
        None => DEFAULT_FRAME_RATE,
    };

    tracing::debug!(
        tracks = input.tracks.len(),
        frame_rate,
        "fitting {}",
        file.display()
    );

    let reports = fit_tracks(&input.tracks, &config, frame_rate);

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else if detail {
        let blocks: Vec<String> = reports.iter().map(|r| r.detail()).collect();
        println!("{}", blocks.join("\n\n"));
    } else {
        for report in &reports {
            println!("{}", report);
        }
    }

    let summary = summarize(&reports);
    if summary.skipped > 0 {
        tracing::warn!("{} of {} track(s) skipped", summary.skipped, reports.len());
    }
    Ok(())
}

fn cmd_eval(curve: &str, steps: usize) -> Result<()> {
    let rows = eval_rows(curve, steps)?;
    for (t, progress) in rows {
        println!("{:.6}\t{:.6}", t, progress);
    }
    Ok(())
}

fn eval_rows(curve: &str, steps: usize) -> Result<Vec<(f64, f64)>> {
    if steps == 0 {
        bail!("--steps must be at least 1");
    }
    let curve: CubicBezier = curve
        .parse()
        .with_context(|| format!("Invalid curve '{}'", curve))?;
    if !curve.is_monotonic_in_time() {
        tracing::warn!("x1 or x2 outside [0, 1]; {} is not a valid timing function", curve);
    }
    Ok((0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            (t, curve.ease(t))
        })
        .collect())
}

fn cmd_config(options: &ConfigArgs) -> Result<()> {
    let config = build_config(options)?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_fit_flags() {
        let cli = Cli::try_parse_from([
            "easefit",
            "fit",
            "tracks.json",
            "--clamp-y",
            "--no-restart-grid",
            "--iterations",
            "500",
            "--frame-rate",
            "24",
        ])
        .unwrap();
        match cli.command {
            Commands::Fit {
                file,
                options,
                frame_rate,
                json,
                detail,
            } => {
                assert_eq!(file, PathBuf::from("tracks.json"));
                assert!(options.clamp_y);
                assert!(options.no_restart_grid);
                assert!(!options.enforce_x_order);
                assert_eq!(options.iterations, Some(500));
                assert_eq!(frame_rate, Some(24.0));
                assert!(!json && !detail);
            }
            _ => panic!("expected fit command"),
        }
    }

    #[test]
    fn test_json_and_detail_conflict() {
        assert!(Cli::try_parse_from(["easefit", "fit", "a.json", "--json", "--detail"]).is_err());
    }

    #[test]
    fn test_build_config_applies_overrides() {
        let options = ConfigArgs {
            clamp_y: true,
            enforce_x_order: true,
            no_restart_grid: true,
            iterations: Some(10),
            ..Default::default()
        };
        let config = build_config(&options).unwrap();
        assert!(config.clamp_y_to_unit);
        assert!(config.enforce_x_order);
        assert!(!config.use_restart_grid);
        assert_eq!(config.max_iterations_per_seed, 40);
    }

    #[test]
    fn test_build_config_reports_missing_file() {
        let options = ConfigArgs {
            config: Some(PathBuf::from("/nonexistent/easefit.toml")),
            ..Default::default()
        };
        assert!(build_config(&options).is_err());
    }

    #[test]
    fn test_eval_rows() {
        let rows = eval_rows("cubic-bezier(0.42, 0, 0.58, 1)", 4).unwrap();
        assert_eq!(rows.len(), 5);
        assert!(rows[0].1.abs() < 1e-6);
        assert!((rows[2].1 - 0.5).abs() < 1e-6);
        assert!((rows[4].1 - 1.0).abs() < 1e-6);
        assert!(eval_rows("0.42, 0, 0.58, 1", 0).is_err());
        assert!(eval_rows("ease", 4).is_err());
    }
}
