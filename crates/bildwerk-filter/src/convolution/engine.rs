// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spatial convolution engine.
//
// Border policy: kernel taps that fall outside the raster contribute nothing
// and the remaining weights are NOT renormalized, so blur kernels darken the
// outermost rows and columns. Each output channel is accumulated in f64,
// then clamped to [0, 255] and rounded once. Rounding is to nearest; the
// Streamlit app truncates through `np.uint8`, so a sum such as 127.6 lands
// on 128 here and on 127 there.

use bildwerk_core::error::Result;
use rayon::prelude::*;
use tracing::{debug, instrument};

use super::kernel::Kernel;
use crate::raster::{CHANNELS, MAX_CHANNEL, Raster};

/// How the engine walks the output rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConvolveMode {
    /// One row after another on the calling thread.
    Sequential,
    /// Rows distributed across the rayon thread pool.
    #[default]
    Parallel,
}

impl ConvolveMode {
    /// `Parallel` when `parallel` is set, otherwise `Sequential`.
    pub fn from_flag(parallel: bool) -> Self {
        if parallel {
            Self::Parallel
        } else {
            Self::Sequential
        }
    }
}

/// Convolve `raster` with `kernel` on the calling thread.
pub fn convolve(raster: &Raster, kernel: &Kernel) -> Raster {
    convolve_with_mode(raster, kernel, ConvolveMode::Sequential)
}

/// Convolve with rows partitioned across rayon workers. Bit-identical to
/// [`convolve`].
pub fn convolve_parallel(raster: &Raster, kernel: &Kernel) -> Raster {
    convolve_with_mode(raster, kernel, ConvolveMode::Parallel)
}

/// Validate raw flattened weights, then convolve sequentially.
pub fn convolve_weights(raster: &Raster, weights: &[f32]) -> Result<Raster> {
    let kernel = Kernel::new(weights.to_vec())?;
    Ok(convolve(raster, &kernel))
}

#[instrument(skip(raster, kernel), fields(width = raster.width(), height = raster.height(), side = kernel.side()))]
pub fn convolve_with_mode(raster: &Raster, kernel: &Kernel, mode: ConvolveMode) -> Raster {
    let (width, height) = raster.dimensions();
    if raster.is_empty() {
        debug!("Empty raster, nothing to convolve");
        return Raster::new(width, height);
    }

    let row_len = width as usize * CHANNELS;
    let mut out = vec![0.0f32; row_len * height as usize];

    match mode {
        ConvolveMode::Sequential => {
            for (y, row) in out.chunks_exact_mut(row_len).enumerate() {
                convolve_row(raster, kernel, y, row);
            }
        }
        ConvolveMode::Parallel => {
            out.par_chunks_exact_mut(row_len)
                .enumerate()
                .for_each(|(y, row)| convolve_row(raster, kernel, y, row));
        }
    }

    debug!(?mode, "Convolution complete");
    Raster::from_samples(width, height, out)
}

/// Fill one output row. Reads only from `src`, so rows are independent.
fn convolve_row(src: &Raster, kernel: &Kernel, y: usize, row: &mut [f32]) {
    let width = src.width() as usize;
    let height = src.height() as usize;
    let side = kernel.side();
    let half = kernel.half_side();
    let samples = src.samples();

    for x in 0..width {
        let mut acc = [0.0f64; CHANNELS];

        for cy in 0..side {
            // scy = y + cy - half, skipped when outside [0, height)
            let Some(scy) = (y + cy).checked_sub(half).filter(|&s| s < height) else {
                continue;
            };
            for cx in 0..side {
                let Some(scx) = (x + cx).checked_sub(half).filter(|&s| s < width) else {
                    continue;
                };
                let wt = f64::from(kernel.weight(cx, cy));
                let base = src.index(scx, scy);
                for (c, sum) in acc.iter_mut().enumerate() {
                    *sum += f64::from(samples[base + c]) * wt;
                }
            }
        }

        let px = &mut row[x * CHANNELS..(x + 1) * CHANNELS];
        for (dst, sum) in px.iter_mut().zip(acc) {
            *dst = settle(sum);
        }
    }
}

/// Clamp to [0, 255] and round. NaN settles at 0.
#[inline]
fn settle(sum: f64) -> f32 {
    if sum.is_nan() {
        return 0.0;
    }
    sum.clamp(0.0, f64::from(MAX_CHANNEL)).round() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use bildwerk_core::error::BildwerkError;

    /// Deterministic 8-bit-valued test pattern.
    fn pattern(width: u32, height: u32) -> Raster {
        Raster::from_fn(width, height, |x, y| {
            [
                ((x * 37 + y * 11) % 256) as f32,
                ((x * 5 + y * 71 + 13) % 256) as f32,
                ((x * y * 3 + 101) % 256) as f32,
            ]
        })
    }

    #[test]
    fn identity_kernel_returns_input() {
        let src = pattern(7, 5);
        let out = convolve(&src, &Kernel::identity(3).unwrap());
        assert_eq!(out, src);

        let out5 = convolve(&src, &Kernel::identity(5).unwrap());
        assert_eq!(out5, src);
    }

    #[test]
    fn output_dimensions_match_input() {
        let src = pattern(9, 4);
        let out = convolve(&src, &Kernel::box_blur());
        assert_eq!(out.dimensions(), (9, 4));
    }

    #[test]
    fn uniform_interior_survives_box_blur() {
        let src = Raster::filled(5, 5, [90.0, 90.0, 90.0]);
        let out = convolve(&src, &Kernel::box_blur());
        assert_eq!(out.get(2, 2), Some([90.0, 90.0, 90.0]));
    }

    #[test]
    fn border_taps_are_dropped_without_renormalizing() {
        let src = Raster::filled(4, 4, [180.0, 180.0, 180.0]);
        let out = convolve(&src, &Kernel::box_blur());
        // Corner sees 4 of 9 taps: 180 * 4/9 = 80.
        assert_eq!(out.get(0, 0), Some([80.0, 80.0, 80.0]));
        // Edge sees 6 of 9 taps: 180 * 6/9 = 120.
        assert_eq!(out.get(1, 0), Some([120.0, 120.0, 120.0]));
        // Interior sees all 9.
        assert_eq!(out.get(1, 1), Some([180.0, 180.0, 180.0]));
    }

    #[test]
    fn box_blur_interior_stays_within_neighbourhood() {
        let src = pattern(12, 10);
        let out = convolve(&src, &Kernel::box_blur());

        for y in 1..9 {
            for x in 1..11 {
                let blurred = out.get(x, y).unwrap();
                for c in 0..CHANNELS {
                    let mut lo = f32::MAX;
                    let mut hi = f32::MIN;
                    for ny in y - 1..=y + 1 {
                        for nx in x - 1..=x + 1 {
                            let v = src.get(nx, ny).unwrap()[c];
                            lo = lo.min(v);
                            hi = hi.max(v);
                        }
                    }
                    assert!(
                        (lo..=hi).contains(&blurred[c]),
                        "({x},{y}) channel {c}: {} outside [{lo}, {hi}]",
                        blurred[c]
                    );
                }
            }
        }
    }

    #[test]
    fn sharpen_clamps_overshoot() {
        // Bright centre on dark surround: 5*200 = 1000 -> 255.
        let mut src = Raster::filled(3, 3, [0.0, 0.0, 0.0]);
        src.set(1, 1, [200.0, 10.0, 0.0]);
        let out = convolve(&src, &Kernel::sharpen());
        assert_eq!(out.get(1, 1), Some([255.0, 50.0, 0.0]));
        // Neighbour of the bright centre: 0*5 - 200 -> clamped to 0.
        assert_eq!(out.get(1, 0), Some([0.0, 0.0, 0.0]));
    }

    #[test]
    fn channels_do_not_mix() {
        let src = Raster::filled(3, 3, [255.0, 0.0, 0.0]);
        let out = convolve(&src, &Kernel::box_blur());
        for px in out.pixels() {
            assert_eq!(px[1], 0.0);
            assert_eq!(px[2], 0.0);
        }
    }

    #[test]
    fn parallel_matches_sequential() {
        let src = pattern(33, 21);
        for kernel in [
            Kernel::box_blur(),
            Kernel::sharpen(),
            Kernel::new((0..25).map(|i| (i as f32 - 12.0) / 40.0).collect()).unwrap(),
        ] {
            assert_eq!(convolve(&src, &kernel), convolve_parallel(&src, &kernel));
        }
    }

    #[test]
    fn empty_raster_yields_empty_result() {
        let src = Raster::new(0, 3);
        let out = convolve_parallel(&src, &Kernel::sharpen());
        assert_eq!(out.dimensions(), (0, 3));
        assert!(out.samples().is_empty());
    }

    #[test]
    fn kernel_larger_than_raster() {
        let src = Raster::filled(2, 1, [10.0, 20.0, 30.0]);
        let out = convolve(&src, &Kernel::identity(7).unwrap());
        assert_eq!(out, src);
    }

    #[test]
    fn raw_weights_must_form_a_square() {
        let src = pattern(3, 3);
        let err = convolve_weights(&src, &[1.0; 7]).unwrap_err();
        assert!(matches!(err, BildwerkError::InvalidKernel { len: 7, .. }));
        assert!(convolve_weights(&src, &[0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]).is_ok());
    }
}
