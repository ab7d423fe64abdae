use std::time::Duration;

use log::debug;
use rfscope_messages::{DeltaUpdate, SpectrumPoint, SweepData, SweepEncoding};

/// Rough wire cost of one full spectrum point, in bytes.
const POINT_BYTES: f64 = 16.0;
/// Rough wire cost of one delta entry, in bytes.
const DELTA_BYTES: f64 = 20.0;

/// Bandwidth saved by sending `delta_count` deltas instead of `points` bins, in percent.
///
/// Negative when the deltas cost more than the full sweep would have.
pub fn compression_ratio(delta_count: usize, points: usize) -> f64 {
    if points == 0 {
        return 0.0;
    }
    let full = points as f64 * POINT_BYTES;
    let delta = delta_count as f64 * DELTA_BYTES;
    (1.0 - delta / full) * 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncoderConfig {
    /// Smallest amplitude change that is worth sending, in dB
    pub threshold_db: f64,
    /// Send a fresh full sweep once the baseline is older than this
    pub refresh_interval: Duration,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            threshold_db: 1.0,
            refresh_interval: Duration::from_secs(60),
        }
    }
}

/// Delta encoder for one consumer.
#[derive(Debug, Default)]
pub struct DeltaEncoder {
    config: EncoderConfig,
    baseline: Option<Vec<SpectrumPoint>>,
    baseline_timestamp: u64,
}

impl DeltaEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self {
            config,
            baseline: None,
            baseline_timestamp: 0,
        }
    }

    /// Forget the baseline so that the next sweep goes out in full.
    pub fn request_baseline(&mut self) {
        self.baseline = None;
    }

    /// Encode a full sweep taken at `timestamp` (milliseconds).
    ///
    /// A full sweep flagged as a baseline is emitted when there is no baseline,
    /// when it has expired, or when the bin count changed. Otherwise every bin
    /// that moved by at least the threshold is sent as a delta. The baseline is
    /// kept as sent so that it matches what the decoder holds.
    pub fn encode(&mut self, data: &[SpectrumPoint], timestamp: u64) -> SweepData {
        let age = Duration::from_millis(timestamp.saturating_sub(self.baseline_timestamp));

        let expired = age > self.config.refresh_interval;
        let baseline = match &self.baseline {
            Some(baseline) if !expired && baseline.len() == data.len() => baseline,
            _ => return self.full(data, timestamp),
        };

        let deltas: Vec<DeltaUpdate> = data
            .iter()
            .zip(baseline)
            .enumerate()
            .filter(|(_, (point, base))| {
                (point.amplitude - base.amplitude).abs() >= self.config.threshold_db
            })
            .map(|(i, (point, _))| DeltaUpdate {
                index: i as i64,
                amplitude: point.amplitude,
                frequency: Some(point.frequency),
            })
            .collect();

        let ratio = compression_ratio(deltas.len(), data.len());
        debug!(
            "Delta sweep: {}/{} points changed ({:.1}% compression)",
            deltas.len(),
            data.len(),
            ratio
        );

        SweepData {
            data: Vec::new(),
            timestamp,
            encoding: SweepEncoding::Delta,
            deltas: Some(deltas),
            baseline: None,
            baseline_age: Some(age.as_secs_f64()),
            compression_ratio: Some(ratio),
        }
    }

    fn full(&mut self, data: &[SpectrumPoint], timestamp: u64) -> SweepData {
        self.baseline = Some(data.to_vec());
        self.baseline_timestamp = timestamp;
        SweepData {
            baseline: Some(true),
            ..SweepData::full(data.to_vec(), timestamp)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweep(amplitudes: &[f64]) -> Vec<SpectrumPoint> {
        amplitudes
            .iter()
            .enumerate()
            .map(|(i, &a)| SpectrumPoint::new(1990.0 + i as f64, a))
            .collect()
    }

    #[test]
    fn test_compression_ratio() {
        assert_eq!(compression_ratio(0, 0), 0.0);
        assert_eq!(compression_ratio(0, 112), 100.0);
        assert!((compression_ratio(4, 10) - 50.0).abs() < 1e-12);
        assert!(compression_ratio(10, 10) < 0.0);
    }

    #[test]
    fn test_first_sweep_is_full_baseline() {
        let mut encoder = DeltaEncoder::default();
        let out = encoder.encode(&sweep(&[-80.0, -75.0]), 0);

        assert_eq!(out.encoding, SweepEncoding::Full);
        assert_eq!(out.baseline, Some(true));
        assert_eq!(out.data, sweep(&[-80.0, -75.0]));
    }

    #[test]
    fn test_only_significant_changes_are_sent() {
        let mut encoder = DeltaEncoder::default();
        encoder.encode(&sweep(&[-80.0, -75.0, -70.0]), 0);

        let out = encoder.encode(&sweep(&[-80.5, -60.0, -71.0]), 2_000);

        assert_eq!(out.encoding, SweepEncoding::Delta);
        let deltas = out.deltas.unwrap();
        assert_eq!(deltas.len(), 2);
        assert_eq!(deltas[0].index, 1);
        assert_eq!(deltas[0].amplitude, -60.0);
        assert_eq!(deltas[0].frequency, Some(1991.0));
        assert_eq!(deltas[1].index, 2);
        assert_eq!(out.baseline_age, Some(2.0));
        assert!(out.data.is_empty());
    }

    #[test]
    fn test_baseline_refresh_and_resize() {
        let config = EncoderConfig {
            refresh_interval: Duration::from_secs(1),
            ..Default::default()
        };
        let mut encoder = DeltaEncoder::new(config);
        encoder.encode(&sweep(&[-80.0]), 0);
        assert_eq!(encoder.encode(&sweep(&[-80.0]), 1_000).encoding, SweepEncoding::Delta);
        assert_eq!(encoder.encode(&sweep(&[-80.0]), 1_001).encoding, SweepEncoding::Full);
        assert_eq!(
            encoder.encode(&sweep(&[-80.0, -80.0]), 1_002).encoding,
            SweepEncoding::Full
        );

        encoder.request_baseline();
        assert_eq!(
            encoder.encode(&sweep(&[-80.0, -80.0]), 1_003).encoding,
            SweepEncoding::Full
        );
    }
}
