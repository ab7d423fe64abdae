use log::debug;
use rfscope_messages::{
    DeltaStats, MonitorSettings, SpectrumPoint, SweepData, SweepEncoding, SweepResult,
};

use crate::decoder::reconstruct;
use crate::encoder::compression_ratio;
use crate::error::SweepError;
use crate::events::{EventDetector, RandomSampler, WarningSampler};
use crate::peaks::PeakDetector;
use crate::rolling::{update_average, update_max_hold};

/// Tunables for a [`SpectrumPipeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Minimum amplitude for a peak marker, in dBm
    pub peak_threshold: f64,
    /// Maximum number of peak markers per sweep
    pub max_peaks: usize,
    /// Share of warning-level bins that become events
    pub warning_acceptance: f64,
    /// Seed for the warning sampler. `None` seeds from entropy.
    pub rng_seed: Option<u64>,
    /// Clear max-hold and average whenever a full sweep replaces the baseline
    pub reset_rolling_on_full_sweep: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            peak_threshold: -70.0,
            max_peaks: 5,
            warning_acceptance: RandomSampler::DEFAULT_ACCEPTANCE,
            rng_seed: None,
            reset_rolling_on_full_sweep: true,
        }
    }
}

/// Whether delta sweeps can currently be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    NoBaseline,
    HasBaseline,
}

/// Held traces, saved so that a failed request can be undone.
pub(crate) struct PipelineSnapshot {
    baseline: Option<Vec<SpectrumPoint>>,
    baseline_timestamp: u64,
    max_hold: Option<Vec<SpectrumPoint>>,
    average: Option<Vec<SpectrumPoint>>,
}

/// Per-sweep processing with the baseline and rolling traces it owns.
pub struct SpectrumPipeline {
    baseline: Option<Vec<SpectrumPoint>>,
    baseline_timestamp: u64,
    max_hold: Option<Vec<SpectrumPoint>>,
    average: Option<Vec<SpectrumPoint>>,
    peaks: PeakDetector,
    events: EventDetector,
    reset_rolling_on_full_sweep: bool,
}

impl SpectrumPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let sampler = match config.rng_seed {
            Some(seed) => RandomSampler::seeded(config.warning_acceptance, seed),
            None => RandomSampler::new(config.warning_acceptance),
        };
        Self::with_sampler(config, sampler)
    }

    /// Build a pipeline that gates warnings through `sampler` instead of an RNG.
    pub fn with_sampler(config: PipelineConfig, sampler: impl WarningSampler + 'static) -> Self {
        Self {
            baseline: None,
            baseline_timestamp: 0,
            max_hold: None,
            average: None,
            peaks: PeakDetector::new()
                .with_threshold(config.peak_threshold)
                .with_max_peaks(config.max_peaks),
            events: EventDetector::new(sampler),
            reset_rolling_on_full_sweep: config.reset_rolling_on_full_sweep,
        }
    }

    pub fn state(&self) -> PipelineState {
        if self.baseline.is_some() {
            PipelineState::HasBaseline
        } else {
            PipelineState::NoBaseline
        }
    }

    pub fn baseline(&self) -> Option<&[SpectrumPoint]> {
        self.baseline.as_deref()
    }

    pub fn max_hold(&self) -> Option<&[SpectrumPoint]> {
        self.max_hold.as_deref()
    }

    pub fn average(&self) -> Option<&[SpectrumPoint]> {
        self.average.as_deref()
    }

    /// Replace held state with caller-supplied traces. `None` keeps what is held.
    pub fn restore(
        &mut self,
        baseline: Option<Vec<SpectrumPoint>>,
        max_hold: Option<Vec<SpectrumPoint>>,
        average: Option<Vec<SpectrumPoint>>,
    ) {
        if let Some(baseline) = baseline {
            self.baseline = Some(baseline);
        }
        if let Some(max_hold) = max_hold {
            self.max_hold = Some(max_hold);
        }
        if let Some(average) = average {
            self.average = Some(average);
        }
    }

    pub(crate) fn snapshot(&self) -> PipelineSnapshot {
        PipelineSnapshot {
            baseline: self.baseline.clone(),
            baseline_timestamp: self.baseline_timestamp,
            max_hold: self.max_hold.clone(),
            average: self.average.clone(),
        }
    }

    pub(crate) fn rollback(&mut self, snapshot: PipelineSnapshot) {
        self.baseline = snapshot.baseline;
        self.baseline_timestamp = snapshot.baseline_timestamp;
        self.max_hold = snapshot.max_hold;
        self.average = snapshot.average;
    }

    /// Decode one sweep and derive everything the display needs from it.
    ///
    /// Held state is only updated once the sweep has been accepted, so an
    /// error leaves the pipeline exactly as it was.
    pub fn process_sweep(
        &mut self,
        sweep: &SweepData,
        settings: &MonitorSettings,
    ) -> Result<SweepResult, SweepError> {
        let (spectrum, delta_stats) = match sweep.encoding {
            SweepEncoding::Delta => match (&self.baseline, &sweep.deltas) {
                (Some(baseline), Some(deltas)) => {
                    let spectrum = reconstruct(baseline, deltas);
                    let stats = self.delta_stats(sweep, deltas.len(), spectrum.len());
                    (spectrum, Some(stats))
                }
                (Some(_), None) => {
                    return Err(SweepError::MalformedSweep(
                        "delta sweep carries no deltas".into(),
                    ));
                }
                (None, _) if !sweep.data.is_empty() => (sweep.data.clone(), None),
                (None, _) => return Err(SweepError::MissingBaseline),
            },
            SweepEncoding::Full => {
                if sweep.data.is_empty() {
                    return Err(SweepError::MalformedSweep(
                        "full sweep carries no data".into(),
                    ));
                }
                (sweep.data.clone(), None)
            }
        };

        let new_baseline = delta_stats.is_none();
        let restart_rolling = new_baseline && self.reset_rolling_on_full_sweep;
        let (max_hold, average) = if restart_rolling {
            (spectrum.clone(), spectrum.clone())
        } else {
            (
                update_max_hold(&spectrum, self.max_hold.as_deref()),
                update_average(&spectrum, self.average.as_deref()),
            )
        };

        let peak_markers = self.peaks.find_peaks(&spectrum);
        let events = self
            .events
            .detect_events(&spectrum, sweep.timestamp, settings);

        if new_baseline {
            debug!(
                "New baseline of {} bins at {} ms",
                spectrum.len(),
                sweep.timestamp
            );
            self.baseline = Some(spectrum.clone());
            self.baseline_timestamp = sweep.timestamp;
        }
        self.max_hold = Some(max_hold.clone());
        self.average = Some(average.clone());

        Ok(SweepResult {
            spectrum_data: spectrum,
            max_hold_data: max_hold,
            avg_data: average,
            peak_markers,
            events,
            delta_stats,
            baseline_spectrum: self.baseline.clone(),
            timestamp: sweep.timestamp,
            encoding: sweep.encoding,
        })
    }

    pub fn reset_baseline(&mut self) {
        self.baseline = None;
        self.baseline_timestamp = 0;
    }

    pub fn reset_max_hold(&mut self) {
        self.max_hold = None;
    }

    pub fn reset_all(&mut self) {
        self.reset_baseline();
        self.max_hold = None;
        self.average = None;
    }

    fn delta_stats(&self, sweep: &SweepData, delta_count: usize, bins: usize) -> DeltaStats {
        let age = sweep.timestamp.saturating_sub(self.baseline_timestamp) as f64 / 1000.0;
        DeltaStats {
            compression_ratio: sweep
                .compression_ratio
                .unwrap_or_else(|| compression_ratio(delta_count, bins)),
            delta_count,
            baseline_age: sweep.baseline_age.unwrap_or(age),
        }
    }
}

impl Default for SpectrumPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
