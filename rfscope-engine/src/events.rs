use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rfscope_messages::{EventKind, MonitorSettings, SignalEvent, SpectrumPoint};

/// Decides whether an individual warning-level bin is reported.
///
/// Elevated bins tend to come in bursts on a noisy band, so warnings are
/// sampled rather than reported one by one. Critical events bypass this.
pub trait WarningSampler: Send {
    fn accept(&mut self) -> bool;
}

impl<F> WarningSampler for F
where
    F: FnMut() -> bool + Send,
{
    fn accept(&mut self) -> bool {
        self()
    }
}

/// Accepts each warning with a fixed probability.
pub struct RandomSampler {
    rng: StdRng,
    acceptance: f64,
}

impl RandomSampler {
    /// Share of warnings reported when no rate is configured.
    pub const DEFAULT_ACCEPTANCE: f64 = 0.05;

    pub fn new(acceptance: f64) -> Self {
        Self::with_rng(acceptance, StdRng::from_entropy())
    }

    /// Deterministic sampler for tests and reproducible replays.
    pub fn seeded(acceptance: f64, seed: u64) -> Self {
        Self::with_rng(acceptance, StdRng::seed_from_u64(seed))
    }

    fn with_rng(acceptance: f64, rng: StdRng) -> Self {
        let acceptance = if acceptance.is_nan() {
            0.0
        } else {
            acceptance.clamp(0.0, 1.0)
        };
        Self { rng, acceptance }
    }
}

impl Default for RandomSampler {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ACCEPTANCE)
    }
}

impl WarningSampler for RandomSampler {
    fn accept(&mut self) -> bool {
        self.rng.gen_bool(self.acceptance)
    }
}

/// Classifies bins into critical and warning events.
pub struct EventDetector {
    sampler: Box<dyn WarningSampler>,
    sequence: u64,
}

impl EventDetector {
    pub fn new(sampler: impl WarningSampler + 'static) -> Self {
        Self {
            sampler: Box::new(sampler),
            sequence: 0,
        }
    }

    /// Scan `spectrum` against the thresholds in `settings`.
    ///
    /// Returns nothing when `auto_log` is off. Ids are unique for the lifetime
    /// of the detector.
    pub fn detect_events(
        &mut self,
        spectrum: &[SpectrumPoint],
        timestamp: u64,
        settings: &MonitorSettings,
    ) -> Vec<SignalEvent> {
        if !settings.auto_log {
            return Vec::new();
        }

        let mut events = Vec::new();
        for point in spectrum {
            let kind = if point.amplitude > settings.critical_threshold {
                EventKind::Critical
            } else if point.amplitude > settings.warning_threshold && self.sampler.accept() {
                EventKind::Warning
            } else {
                continue;
            };
            events.push(self.event(kind, point, timestamp));
        }
        events
    }

    fn event(&mut self, kind: EventKind, point: &SpectrumPoint, timestamp: u64) -> SignalEvent {
        let label = match kind {
            EventKind::Critical => "Critical signal",
            EventKind::Warning => "Elevated signal",
        };
        let id = format!("{}-{}", timestamp, self.sequence);
        self.sequence += 1;

        SignalEvent {
            id,
            timestamp,
            kind,
            frequency: point.frequency,
            strength: point.amplitude,
            message: format!("{} at {}: {}", label, point.frequency(), point.level()),
        }
    }
}

impl Default for EventDetector {
    fn default() -> Self {
        Self::new(RandomSampler::default())
    }
}
