use serde::{Deserialize, Serialize};

use crate::{Dbm, Megahertz};

/// One frequency bin of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumPoint {
    /// Frequency in MHz
    pub frequency: f64,
    /// Amplitude in dBm
    pub amplitude: f64,
}

impl SpectrumPoint {
    pub const fn new(frequency: f64, amplitude: f64) -> Self {
        Self {
            frequency,
            amplitude,
        }
    }

    pub fn frequency(&self) -> Megahertz {
        Megahertz(self.frequency)
    }

    pub fn level(&self) -> Dbm {
        Dbm(self.amplitude)
    }
}

/// Sparse override of a single baseline bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaUpdate {
    /// Bin index. Signed so that corrupt negative indices survive decoding and get skipped.
    pub index: i64,
    pub amplitude: f64,
    /// Frequency echoed by the producer for validation. Never applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
}

impl DeltaUpdate {
    pub const fn new(index: i64, amplitude: f64) -> Self {
        Self {
            index,
            amplitude,
            frequency: None,
        }
    }
}

/// How a sweep payload is encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepEncoding {
    #[default]
    Full,
    Delta,
}

/// A sweep as delivered by the producer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SweepData {
    /// Full spectrum. Empty for most delta sweeps.
    #[serde(default)]
    pub data: Vec<SpectrumPoint>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    #[serde(default)]
    pub encoding: SweepEncoding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deltas: Option<Vec<DeltaUpdate>>,
    /// Set by the producer on a full sweep that starts a new delta baseline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<bool>,
    /// Seconds since the producer last sent a baseline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_age: Option<f64>,
    /// Bandwidth saved by delta encoding, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_ratio: Option<f64>,
}

impl SweepData {
    pub fn full(data: Vec<SpectrumPoint>, timestamp: u64) -> Self {
        Self {
            data,
            timestamp,
            ..Default::default()
        }
    }

    pub fn delta(deltas: Vec<DeltaUpdate>, timestamp: u64) -> Self {
        Self {
            timestamp,
            encoding: SweepEncoding::Delta,
            deltas: Some(deltas),
            ..Default::default()
        }
    }
}

/// Alert thresholds supplied with every sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorSettings {
    /// When false no events are raised at all.
    pub auto_log: bool,
    /// dBm above which every bin raises a critical event.
    pub critical_threshold: f64,
    /// dBm above which a bin may raise a sampled warning event.
    pub warning_threshold: f64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            auto_log: true,
            critical_threshold: -50.0,
            warning_threshold: -60.0,
        }
    }
}

/// A local maximum of the spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakMarker {
    pub frequency: f64,
    pub amplitude: f64,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Critical,
    Warning,
}

/// A threshold crossing raised while processing a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub id: String,
    pub timestamp: u64,
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Frequency in MHz
    pub frequency: f64,
    /// Amplitude in dBm
    pub strength: f64,
    pub message: String,
}

/// Delta decoding statistics for a reconstructed sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaStats {
    pub compression_ratio: f64,
    pub delta_count: usize,
    pub baseline_age: f64,
}

/// Everything derived from one sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepResult {
    pub spectrum_data: Vec<SpectrumPoint>,
    pub max_hold_data: Vec<SpectrumPoint>,
    pub avg_data: Vec<SpectrumPoint>,
    pub peak_markers: Vec<PeakMarker>,
    pub events: Vec<SignalEvent>,
    pub delta_stats: Option<DeltaStats>,
    pub baseline_spectrum: Option<Vec<SpectrumPoint>>,
    pub timestamp: u64,
    pub encoding: SweepEncoding,
}

/// A spatial signal-strength reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

impl MeasurementPoint {
    pub const fn new(x: f64, y: f64, value: f64) -> Self {
        Self { x, y, value }
    }
}
