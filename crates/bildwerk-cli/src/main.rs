// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildwerk — command-line shell around bildwerk-filter.
//
// Entry point. Initialises logging, resolves the processing config, then
// decodes, downscales, filters, adjusts, and writes the result as PNG.

mod args;

use std::process::ExitCode;

use bildwerk_core::{Adjustments, FilterKind, ProcessingConfig, Result};
use bildwerk_filter::FilterPipeline;
use clap::Parser;
use tracing::{error, info, warn};

use args::Cli;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "bildwerk failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.list_filters {
        for kind in FilterKind::ALL {
            println!("{kind}");
        }
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    if let Some(path) = &cli.save_config {
        config.save(path)?;
        info!(path = %path.display(), "Config written");
    }

    let Some(input) = &cli.input else {
        return Ok(());
    };

    let bytes = std::fs::read(input)?;
    let pipeline = FilterPipeline::decode(&bytes, &config)?;
    info!(
        input = %input.display(),
        width = pipeline.width(),
        height = pipeline.height(),
        filter = %config.filter,
        "Processing image"
    );

    let png = pipeline
        .process(config.filter, &config.adjustments)
        .to_png_bytes()?;
    std::fs::write(&cli.output, png)?;
    info!(output = %cli.output.display(), "Filtered image written");
    Ok(())
}

/// Config file (or defaults) with command-line overrides applied on top.
fn resolve_config(cli: &Cli) -> Result<ProcessingConfig> {
    let mut config = match &cli.config {
        Some(path) => ProcessingConfig::load(path)?,
        None => ProcessingConfig::default(),
    };

    if let Some(name) = &cli.filter {
        config.filter = normalize_filter_name(name).parse()?;
    }
    if let Some(size) = cli.max_size {
        config.max_width = size;
        config.max_height = size;
    }
    if cli.no_resize {
        config.resize_preview = false;
    }
    if cli.sequential {
        config.parallel = false;
    }

    let requested = Adjustments {
        intensity: cli.intensity.unwrap_or(config.adjustments.intensity),
        brightness: cli.brightness.unwrap_or(config.adjustments.brightness),
        contrast: cli.contrast.unwrap_or(config.adjustments.contrast),
    };
    let clamped = requested.clamped();
    if clamped != requested {
        warn!(?requested, ?clamped, "Adjustments outside slider range, clamping");
    }
    config.adjustments = clamped;

    config.validate()?;
    Ok(config)
}

/// Forgiving spelling for typed names: case, surrounding blanks, and the
/// "smoothen"/"greyscale" labels all map onto the canonical filter names.
fn normalize_filter_name(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase();
    match lower.as_str() {
        "smoothen" => "smooth".to_string(),
        "greyscale" => "grayscale".to_string(),
        _ => lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("bildwerk").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_without_overrides() {
        let config = resolve_config(&parse(&["in.png"])).unwrap();
        assert_eq!(config, ProcessingConfig::default());
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let cli = parse(&[
            "in.png",
            "--filter",
            "Sharpen",
            "--brightness",
            "-40",
            "--max-size",
            "300",
            "--sequential",
        ]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.filter, FilterKind::Sharpen);
        assert_eq!(config.adjustments, Adjustments::new(1.0, -40.0, 1.0));
        assert_eq!((config.max_width, config.max_height), (300, 300));
        assert!(!config.parallel);
    }

    #[test]
    fn out_of_range_adjustments_are_clamped() {
        let cli = parse(&["in.png", "--intensity", "5", "--contrast", "-1"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.adjustments, Adjustments::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn filter_spellings_are_normalized_by_the_shell() {
        for (typed, kind) in [
            ("greyscale", FilterKind::Grayscale),
            ("Smoothen", FilterKind::Smooth),
            (" INVERT ", FilterKind::Invert),
        ] {
            let config = resolve_config(&parse(&["in.png", "--filter", typed])).unwrap();
            assert_eq!(config.filter, kind, "{typed:?}");
        }
    }

    #[test]
    fn misspelt_filter_is_reported() {
        let cli = parse(&["in.png", "--filter", "blurr"]);
        assert!(resolve_config(&cli).is_err());
    }

    #[test]
    fn list_filters_needs_no_input() {
        let cli = parse(&["--list-filters"]);
        assert!(cli.input.is_none());
        assert!(run(cli).is_ok());
    }
}
