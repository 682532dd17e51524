// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tone adjustment stage — brightness, contrast, intensity.
//
// The three steps always run in that order and each clamps to [0, 255]
// before the next reads the value. The stage runs even for the default
// parameters, so out-of-range samples never leave it unclamped.

use bildwerk_core::Adjustments;
use tracing::instrument;

use crate::raster::{Raster, clamp_channel};

/// Contrast scales distances from this fixed mid-gray value.
pub const CONTRAST_PIVOT: f32 = 128.0;

/// Run brightness, contrast, then intensity over every sample.
#[instrument(skip(raster), fields(width = raster.width(), height = raster.height()))]
pub fn adjust(raster: &Raster, adjustments: &Adjustments) -> Raster {
    let Adjustments {
        intensity,
        brightness,
        contrast,
    } = *adjustments;
    raster.map_samples(|v| {
        let v = shift(v, brightness);
        let v = stretch(v, contrast);
        scale(v, intensity)
    })
}

/// Add `amount` to every sample.
pub fn brightness(raster: &Raster, amount: f32) -> Raster {
    raster.map_samples(|v| shift(v, amount))
}

/// Scale every sample's distance from [`CONTRAST_PIVOT`] by `factor`.
pub fn contrast(raster: &Raster, factor: f32) -> Raster {
    raster.map_samples(|v| stretch(v, factor))
}

/// Multiply every sample by `factor`.
pub fn intensity(raster: &Raster, factor: f32) -> Raster {
    raster.map_samples(|v| scale(v, factor))
}

#[inline]
fn shift(v: f32, amount: f32) -> f32 {
    clamp_channel(v + amount)
}

#[inline]
fn stretch(v: f32, factor: f32) -> f32 {
    clamp_channel((v - CONTRAST_PIVOT) * factor + CONTRAST_PIVOT)
}

#[inline]
fn scale(v: f32, factor: f32) -> f32 {
    clamp_channel(v * factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(v: f32) -> Raster {
        Raster::filled(1, 1, [v, v, v])
    }

    fn value(r: &Raster) -> f32 {
        r.get(0, 0).unwrap()[0]
    }

    #[test]
    fn defaults_are_identity() {
        let src = Raster::from_fn(4, 4, |x, y| [(x * 60) as f32, (y * 80) as f32, 255.0]);
        assert_eq!(adjust(&src, &Adjustments::default()), src);
    }

    #[test]
    fn brightness_saturates_before_contrast() {
        // 200 + 80 saturates to 255, then (255 - 128) * 0.5 + 128 = 191.5.
        // Deferring the clamp would give (280 - 128) * 0.5 + 128 = 204.
        let out = adjust(&single(200.0), &Adjustments::new(1.0, 80.0, 0.5));
        assert_eq!(value(&out), 191.5);
    }

    #[test]
    fn brightness_plus_100_clamps_at_255() {
        assert_eq!(value(&brightness(&single(200.0), 100.0)), 255.0);
        assert_eq!(value(&brightness(&single(30.0), -100.0)), 0.0);
    }

    #[test]
    fn contrast_pivots_on_mid_gray() {
        assert_eq!(value(&contrast(&single(128.0), 2.0)), 128.0);
        assert_eq!(value(&contrast(&single(150.0), 2.0)), 172.0);
        assert_eq!(value(&contrast(&single(100.0), 0.0)), 128.0);
    }

    #[test]
    fn steps_compose_in_order() {
        // 50 + 100 = 150; (150 - 128) * 2 + 128 = 172; 172 * 0.5 = 86.
        let out = adjust(&single(50.0), &Adjustments::new(0.5, 100.0, 2.0));
        assert_eq!(value(&out), 86.0);
    }

    #[test]
    fn contrast_saturates_before_intensity() {
        // (250 - 128) * 2 + 128 = 372 saturates to 255, then 255 * 0.5 = 127.5.
        // Deferring the clamp would give 372 * 0.5 = 186.
        let out = adjust(&single(250.0), &Adjustments::new(0.5, 0.0, 2.0));
        assert_eq!(value(&out), 127.5);
    }

    #[test]
    fn default_parameters_still_clamp() {
        let src = Raster::from_raw(1, 1, vec![300.0, -20.0, 100.0]).unwrap();
        let out = adjust(&src, &Adjustments::default());
        assert_eq!(out.get(0, 0), Some([255.0, 0.0, 100.0]));
    }

    #[test]
    fn intensity_scales_and_clamps() {
        assert_eq!(value(&intensity(&single(100.0), 1.5)), 150.0);
        assert_eq!(value(&intensity(&single(200.0), 2.0)), 255.0);
        assert_eq!(value(&intensity(&single(200.0), -1.0)), 0.0);
    }

    #[test]
    fn out_of_range_parameters_are_computed_through() {
        let out = adjust(&single(10.0), &Adjustments::new(10.0, 1000.0, -3.0));
        // 10 + 1000 -> 255; (255 - 128) * -3 + 128 -> 0; 0 * 10 = 0.
        assert_eq!(value(&out), 0.0);
    }

    #[test]
    fn nan_parameters_settle_at_zero() {
        let out = adjust(&single(90.0), &Adjustments::new(f32::NAN, 0.0, 1.0));
        assert_eq!(value(&out), 0.0);
    }
}
