//! Minimum zoom and pan limits derived from the map container size.
//!
//! The fitted minimum zoom keeps the map from zooming out past one full
//! world tile grid. It is resolved once when the map surface is created;
//! window resizes do not recompute it.

use crate::geo::{GeoBounds, WORLD_BOUNDS};

pub const DEFAULT_TILE_SIZE: f64 = 512.0;
/// Subtracted from the tile-grid zoom so the world fills the container with a small margin.
const ZOOM_BIAS: f64 = 0.7;
const FITTED_MIN_ZOOM_FLOOR: f64 = 2.0;
/// Minimum zoom used when fitting is disabled.
pub const FIXED_MIN_ZOOM: f64 = 1.0;
/// Deepest zoom the basemap tiles are published for.
pub const BASEMAP_MAX_ZOOM: f64 = 13.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportFit {
    pub min_zoom: f64,
    pub bounds: GeoBounds,
}

/// Compute the fitted minimum zoom for a `width` x `height` pixel container.
///
/// Non-positive or non-finite dimensions and tile sizes are treated as a
/// single tile, which yields the floor zoom of 2.
pub fn compute_fit(width_px: f64, height_px: f64, tile_size_px: f64) -> ViewportFit {
    let max_dimension = width_px.max(height_px);
    let mut max_tiles = (max_dimension / tile_size_px).floor();
    // NaN from NaN inputs, +inf from a zero tile size or an infinite side.
    if !(max_tiles.is_finite() && max_tiles >= 1.0) {
        max_tiles = 1.0;
    }

    let raw_zoom = max_tiles.log2().ceil();
    let min_zoom = (raw_zoom - ZOOM_BIAS).max(FITTED_MIN_ZOOM_FLOOR);

    ViewportFit {
        min_zoom,
        bounds: WORLD_BOUNDS,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportFitMode {
    /// Derive the minimum zoom from the container and lock panning to the world extent.
    Fitted,
    /// Fixed minimum zoom of 1 with unrestricted panning.
    Fixed,
}

/// Zoom and pan constraints handed to the map surface at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportConstraints {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub max_bounds: Option<GeoBounds>,
}

impl ViewportConstraints {
    pub fn resolve(mode: ViewportFitMode, width_px: f64, height_px: f64, tile_size_px: f64) -> Self {
        match mode {
            ViewportFitMode::Fitted => {
                let fit = compute_fit(width_px, height_px, tile_size_px);
                tracing::debug!(
                    width_px,
                    height_px,
                    min_zoom = fit.min_zoom,
                    "resolved fitted viewport"
                );
                Self {
                    min_zoom: fit.min_zoom,
                    max_zoom: BASEMAP_MAX_ZOOM,
                    max_bounds: Some(fit.bounds),
                }
            }
            ViewportFitMode::Fixed => Self {
                min_zoom: FIXED_MIN_ZOOM,
                max_zoom: BASEMAP_MAX_ZOOM,
                max_bounds: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff < 1e-9,
            "expected {expected}, got {actual} (diff: {diff})"
        );
    }

    #[test]
    fn full_hd_landscape_uses_floor_zoom() {
        // max dimension 1920 -> 3 tiles -> ceil(log2 3) = 2 -> 1.3 -> floored to 2
        let fit = compute_fit(1920.0, 1080.0, DEFAULT_TILE_SIZE);
        assert_close(fit.min_zoom, 2.0);
        assert_eq!(fit.bounds, WORLD_BOUNDS);
    }

    #[test]
    fn portrait_uses_the_taller_side() {
        assert_eq!(
            compute_fit(1080.0, 1920.0, DEFAULT_TILE_SIZE),
            compute_fit(1920.0, 1080.0, DEFAULT_TILE_SIZE)
        );
    }

    #[test]
    fn large_displays_raise_the_minimum_zoom() {
        // 4096 -> 8 tiles -> zoom 3 -> 2.3
        assert_close(compute_fit(4096.0, 2160.0, DEFAULT_TILE_SIZE).min_zoom, 2.3);
        // 10000 -> 19 tiles -> ceil(4.25) = 5 -> 4.3
        assert_close(compute_fit(10000.0, 100.0, DEFAULT_TILE_SIZE).min_zoom, 4.3);
    }

    #[test]
    fn containers_smaller_than_a_tile_clamp_to_one_tile() {
        let fit = compute_fit(300.0, 200.0, DEFAULT_TILE_SIZE);
        assert_close(fit.min_zoom, 2.0);
        assert_eq!(fit, compute_fit(300.0, 200.0, DEFAULT_TILE_SIZE));
    }

    #[test]
    fn degenerate_inputs_never_escape_the_floor() {
        for (w, h, tile) in [
            (0.0, 0.0, DEFAULT_TILE_SIZE),
            (-100.0, -5.0, DEFAULT_TILE_SIZE),
            (f64::NAN, f64::NAN, DEFAULT_TILE_SIZE),
            (800.0, 600.0, 0.0),
            (800.0, 600.0, -512.0),
            (800.0, 600.0, f64::NAN),
            (f64::INFINITY, 600.0, DEFAULT_TILE_SIZE),
        ] {
            let fit = compute_fit(w, h, tile);
            assert!(fit.min_zoom.is_finite(), "{w}x{h}@{tile}");
            assert_close(fit.min_zoom, 2.0);
        }
    }

    #[test]
    fn min_zoom_never_drops_below_two_for_positive_sizes() {
        let mut w = 1.0;
        while w < 50_000.0 {
            let fit = compute_fit(w, w / 2.0, DEFAULT_TILE_SIZE);
            assert!(fit.min_zoom >= 2.0, "width {w}");
            w *= 1.7;
        }
    }

    #[test]
    fn fixed_mode_skips_fitting() {
        let constraints = ViewportConstraints::resolve(
            ViewportFitMode::Fixed,
            4096.0,
            2160.0,
            DEFAULT_TILE_SIZE,
        );
        assert_close(constraints.min_zoom, FIXED_MIN_ZOOM);
        assert_eq!(constraints.max_bounds, None);
        assert_close(constraints.max_zoom, BASEMAP_MAX_ZOOM);
    }

    #[test]
    fn fitted_mode_installs_world_pan_limit() {
        let constraints = ViewportConstraints::resolve(
            ViewportFitMode::Fitted,
            4096.0,
            2160.0,
            DEFAULT_TILE_SIZE,
        );
        assert_close(constraints.min_zoom, 2.3);
        assert_eq!(constraints.max_bounds, Some(WORLD_BOUNDS));
    }
}
