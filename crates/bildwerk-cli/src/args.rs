// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments for the `bildwerk` binary.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "bildwerk")]
#[command(version, about = "Apply a filter and tone adjustments to an image", long_about = None)]
pub struct Cli {
    /// Input image (any format the `image` crate decodes)
    #[arg(value_name = "INPUT", required_unless_present = "list_filters")]
    pub input: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long, value_name = "FILE", default_value = "filtered_image.png")]
    pub output: PathBuf,

    /// Filter: none, blur, smooth, sharpen, invert, grayscale
    #[arg(short, long, value_name = "NAME")]
    pub filter: Option<String>,

    /// Intensity multiplier (0.0-2.0, 1.0 = no change)
    #[arg(long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub intensity: Option<f32>,

    /// Brightness offset (-100 to 100, 0 = no change)
    #[arg(long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub brightness: Option<f32>,

    /// Contrast factor around mid-gray (0.0-2.0, 1.0 = no change)
    #[arg(long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub contrast: Option<f32>,

    /// Longest side of the preview box (overrides both config bounds)
    #[arg(long, value_name = "PIXELS")]
    pub max_size: Option<u32>,

    /// Process at full resolution
    #[arg(long)]
    pub no_resize: bool,

    /// Convolve on the calling thread only
    #[arg(long)]
    pub sequential: bool,

    /// JSON config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the effective config to FILE
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,

    /// Print the available filters and exit
    #[arg(long)]
    pub list_filters: bool,
}
