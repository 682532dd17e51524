// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-filter — Image filtering for Bildwerk.
//
// Provides the RGB raster type, a square-kernel convolution engine, the filter
// selector (blur, smooth, sharpen, invert, grayscale), the brightness/contrast/
// intensity tone stage, and codec glue for decoding, preview downscaling, and
// PNG export.

pub mod codec;
pub mod convolution;
pub mod filters;
pub mod pipeline;
pub mod raster;
pub mod tone;

// Re-export the primary entry points so callers can use `bildwerk_filter::process` etc.
pub use convolution::{ConvolveMode, Kernel, convolve, convolve_parallel, convolve_weights};
pub use filters::{apply, apply_filter};
pub use pipeline::{FilterPipeline, process, process_with};
pub use raster::Raster;
pub use tone::adjust;
