// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filter selector — maps a named filter to a kernel convolution, a pointwise
// transform (invert, grayscale), or identity. New filters are added here.

use bildwerk_core::FilterKind;
use tracing::{debug, info, instrument};

use crate::convolution::{ConvolveMode, Kernel, convolve_with_mode};
use crate::raster::{MAX_CHANNEL, Raster, snap};

/// Apply the filter called `name`. Unrecognised names are treated as `none`.
pub fn apply_filter(raster: &Raster, name: &str) -> Raster {
    let kind = name.parse::<FilterKind>().unwrap_or_else(|_| {
        debug!(name, "Unrecognised filter name, passing raster through");
        FilterKind::None
    });
    apply(raster, kind)
}

/// Apply a filter, convolving on the rayon pool.
pub fn apply(raster: &Raster, kind: FilterKind) -> Raster {
    apply_with_mode(raster, kind, ConvolveMode::default())
}

#[instrument(skip(raster), fields(width = raster.width(), height = raster.height()))]
pub fn apply_with_mode(raster: &Raster, kind: FilterKind, mode: ConvolveMode) -> Raster {
    info!(filter = %kind, "Applying filter");
    match kind {
        FilterKind::None => raster.clone(),
        FilterKind::Invert => invert(raster),
        FilterKind::Grayscale => grayscale(raster),
        FilterKind::Blur | FilterKind::Smooth => {
            convolve_with_mode(raster, &Kernel::box_blur(), mode)
        }
        FilterKind::Sharpen => convolve_with_mode(raster, &Kernel::sharpen(), mode),
    }
}

/// `255 - v` on every channel.
pub fn invert(raster: &Raster) -> Raster {
    raster.map_samples(|v| MAX_CHANNEL - v)
}

/// Replace each pixel with the unweighted mean of its channels.
///
/// The mean is not quantized to an integer level, only snapped to the
/// sample grid, so later stages see the fractional average.
pub fn grayscale(raster: &Raster) -> Raster {
    raster.map_pixels(|[r, g, b]| {
        // f64 keeps the sum exact, so an already-gray pixel maps to itself.
        let avg = snap((f64::from(r) + f64::from(g) + f64::from(b)) / 3.0);
        [avg, avg, avg]
    })
}
