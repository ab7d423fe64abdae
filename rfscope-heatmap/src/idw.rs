//! Inverse distance weighting over sparse measurements.

use std::thread;

use log::debug;
use rfscope_messages::MeasurementPoint;

use crate::error::HeatmapError;
use crate::grid::Heatmap;

/// Grid points closer than this to a measurement take its value verbatim.
const SNAP_DISTANCE: f64 = 0.1;

/// IDW settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdwInterpolator {
    /// Distance exponent
    power: f64,
    /// Grid spacing in measurement units
    resolution: u32,
}

impl Default for IdwInterpolator {
    fn default() -> Self {
        Self {
            power: 2.0,
            resolution: 5,
        }
    }
}

impl IdwInterpolator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_power(mut self, power: f64) -> Self {
        self.power = power;
        self
    }

    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sample `[0, width) x [0, height)` every `resolution` units.
    pub fn interpolate(
        &self,
        measurements: &[MeasurementPoint],
        width: u32,
        height: u32,
    ) -> Result<Heatmap, HeatmapError> {
        self.interpolate_sharded(measurements, width, height, 1)
    }

    /// Same as [`interpolate`](Self::interpolate), with rows split across
    /// `shards` scoped threads. Cells are independent, so the result does not
    /// depend on the shard count.
    pub fn interpolate_sharded(
        &self,
        measurements: &[MeasurementPoint],
        width: u32,
        height: u32,
        shards: usize,
    ) -> Result<Heatmap, HeatmapError> {
        if self.resolution == 0 {
            return Err(HeatmapError::InvalidResolution);
        }
        if !self.power.is_finite() || self.power <= 0.0 {
            return Err(HeatmapError::InvalidPower(self.power));
        }

        let cols = width.div_ceil(self.resolution) as usize;
        let rows = height.div_ceil(self.resolution) as usize;
        if measurements.is_empty() || cols == 0 || rows == 0 {
            return Ok(Heatmap::empty(self.resolution));
        }

        debug!(
            "IDW over {} measurements into {}x{} cells ({} shards)",
            measurements.len(),
            cols,
            rows,
            shards
        );

        let mut values = vec![0.0; cols * rows];
        let rows_per_shard = rows.div_ceil(shards.clamp(1, rows));
        let step = f64::from(self.resolution);

        if rows_per_shard == rows {
            self.fill_rows(measurements, &mut values, 0, cols, step);
        } else {
            thread::scope(|scope| {
                for (shard, chunk) in values.chunks_mut(rows_per_shard * cols).enumerate() {
                    scope.spawn(move || {
                        self.fill_rows(measurements, chunk, shard * rows_per_shard, cols, step)
                    });
                }
            });
        }

        Ok(Heatmap::from_values(cols, rows, self.resolution, values))
    }

    fn fill_rows(
        &self,
        measurements: &[MeasurementPoint],
        cells: &mut [f64],
        first_row: usize,
        cols: usize,
        step: f64,
    ) {
        for (i, cell) in cells.iter_mut().enumerate() {
            let x = (i % cols) as f64 * step;
            let y = (first_row + i / cols) as f64 * step;
            *cell = self.value_at(measurements, x, y);
        }
    }

    /// Interpolated value at `(x, y)`. `measurements` must not be empty.
    ///
    /// The weighted mean is taken as an offset from the first measurement, so
    /// identical inputs reproduce their value exactly. When the weights
    /// underflow or overflow for a large power, the nearest measurement wins.
    fn value_at(&self, measurements: &[MeasurementPoint], x: f64, y: f64) -> f64 {
        let reference = measurements[0].value;
        let mut weighted = 0.0;
        let mut total_weight = 0.0;
        let mut nearest = (f64::INFINITY, reference);

        for m in measurements {
            let distance = (m.x - x).hypot(m.y - y);
            if distance < SNAP_DISTANCE {
                return m.value;
            }
            if distance < nearest.0 {
                nearest = (distance, m.value);
            }
            let weight = 1.0 / distance.powf(self.power);
            weighted += weight * (m.value - reference);
            total_weight += weight;
        }

        let value = reference + weighted / total_weight;
        if value.is_finite() { value } else { nearest.1 }
    }
}

/// Interpolate with an explicit power and resolution.
pub fn interpolate(
    measurements: &[MeasurementPoint],
    width: u32,
    height: u32,
    power: f64,
    resolution: u32,
) -> Result<Heatmap, HeatmapError> {
    IdwInterpolator::new()
        .with_power(power)
        .with_resolution(resolution)
        .interpolate(measurements, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn survey() -> Vec<MeasurementPoint> {
        vec![
            MeasurementPoint::new(0.0, 0.0, -40.0),
            MeasurementPoint::new(45.0, 5.0, -80.0),
            MeasurementPoint::new(20.0, 30.0, -65.0),
            MeasurementPoint::new(37.5, 37.5, -55.0),
        ]
    }

    #[test]
    fn test_single_measurement_fills_grid() {
        let heatmap = interpolate(&[MeasurementPoint::new(0.0, 0.0, -70.0)], 10, 10, 2.0, 5)
            .unwrap();

        assert_eq!((heatmap.cols(), heatmap.rows()), (2, 2));
        assert!(heatmap.values().iter().all(|&v| v == -70.0));
    }

    #[test]
    fn test_empty_input_gives_empty_heatmap() {
        let heatmap = interpolate(&[], 100, 100, 2.0, 5).unwrap();
        assert!(heatmap.is_empty());

        let degenerate = interpolate(&survey(), 0, 100, 2.0, 5).unwrap();
        assert!(degenerate.is_empty());
    }

    #[test]
    fn test_zero_resolution_is_rejected() {
        assert!(matches!(
            interpolate(&survey(), 10, 10, 2.0, 0),
            Err(HeatmapError::InvalidResolution)
        ));
        assert!(matches!(
            IdwInterpolator::new()
                .with_power(f64::NAN)
                .interpolate(&survey(), 10, 10),
            Err(HeatmapError::InvalidPower(_))
        ));
    }

    #[test]
    fn test_non_positive_power_is_rejected() {
        for power in [0.0, -1.0, -0.5] {
            assert!(matches!(
                interpolate(&survey(), 10, 10, power, 5),
                Err(HeatmapError::InvalidPower(p)) if p == power
            ));
        }
        assert!(interpolate(&survey(), 10, 10, 0.5, 5).is_ok());
    }

    #[test]
    fn test_large_power_single_measurement_fills_grid() {
        let heatmap = interpolate(&[MeasurementPoint::new(0.0, 0.0, -70.0)], 10, 10, 400.0, 5)
            .unwrap();

        assert_eq!(heatmap.values().len(), 4);
        assert!(heatmap.values().iter().all(|&v| v == -70.0));
    }

    #[test]
    fn test_large_power_tends_to_nearest_measurement() {
        let pair = [
            MeasurementPoint::new(0.0, 0.0, -80.0),
            MeasurementPoint::new(50.0, 0.0, -40.0),
        ];
        let heatmap = interpolate(&pair, 55, 5, 400.0, 5).unwrap();

        assert!(heatmap.values().iter().all(|v| v.is_finite()));
        for col in 0..heatmap.cols() {
            let x = col as f64 * 5.0;
            let expected = if x < 25.0 {
                -80.0
            } else if x > 25.0 {
                -40.0
            } else {
                continue;
            };
            let value = heatmap.get(col, 0).unwrap();
            assert!((value - expected).abs() < 1e-9, "x = {}: {}", x, value);
        }
    }

    #[test]
    fn test_measurements_are_reproduced_exactly() {
        let heatmap = interpolate(&survey(), 50, 50, 2.0, 5).unwrap();

        assert_eq!(heatmap.get(0, 0), Some(-40.0));
        assert_eq!(heatmap.get(9, 1), Some(-80.0));
        assert_eq!(heatmap.get(4, 6), Some(-65.0));
    }

    #[test]
    fn test_snap_radius() {
        let near = [
            MeasurementPoint::new(5.05, 0.0, -30.0),
            MeasurementPoint::new(50.0, 50.0, -90.0),
        ];
        let heatmap = interpolate(&near, 10, 5, 2.0, 5).unwrap();
        assert_eq!(heatmap.get(1, 0), Some(-30.0));
        assert_ne!(heatmap.get(0, 0), Some(-30.0));
    }

    #[test]
    fn test_values_stay_within_measurement_range() {
        let heatmap = interpolate(&survey(), 50, 50, 2.0, 5).unwrap();
        let (lo, hi) = heatmap.range().unwrap();
        assert!(lo >= -80.0 && hi <= -40.0);
        assert_eq!(heatmap.cols(), 10);
        assert_eq!(heatmap.rows(), 10);
    }

    #[test]
    fn test_midpoint_of_two_equal_weights() {
        let pair = [
            MeasurementPoint::new(0.0, 0.0, -80.0),
            MeasurementPoint::new(10.0, 0.0, -60.0),
        ];
        let heatmap = interpolate(&pair, 10, 1, 2.0, 5).unwrap();
        assert!((heatmap.get(1, 0).unwrap() - -70.0).abs() < 1e-12);
    }

    #[test]
    fn test_sharding_matches_sequential() {
        let idw = IdwInterpolator::new().with_resolution(3);
        let sequential = idw.interpolate(&survey(), 50, 47).unwrap();

        for shards in [0, 2, 3, 7, 64] {
            let sharded = idw.interpolate_sharded(&survey(), 50, 47, shards).unwrap();
            assert_eq!(sharded, sequential, "{} shards", shards);
        }
    }
}
