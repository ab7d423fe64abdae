use std::cmp::Ordering;

use rfscope_messages::{PeakMarker, SpectrumPoint};

/// Peak detection settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakDetector {
    /// Absolute amplitude a peak must exceed, in dBm
    threshold: f64,
    /// Maximum number of peaks to report
    max_peaks: usize,
}

impl Default for PeakDetector {
    fn default() -> Self {
        Self {
            threshold: -70.0,
            max_peaks: 5,
        }
    }
}

impl PeakDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_max_peaks(mut self, max_peaks: usize) -> Self {
        self.max_peaks = max_peaks;
        self
    }

    /// Find the strongest interior local maxima, strongest first.
    ///
    /// A bin qualifies when it is strictly above both neighbours and above the
    /// threshold. The first and last bins never qualify.
    pub fn find_peaks(&self, spectrum: &[SpectrumPoint]) -> Vec<PeakMarker> {
        let mut peaks: Vec<PeakMarker> = spectrum
            .windows(3)
            .enumerate()
            .filter_map(|(i, w)| {
                let (left, mid, right) = (w[0].amplitude, w[1].amplitude, w[2].amplitude);
                (mid > left && mid > right && mid > self.threshold).then_some(PeakMarker {
                    frequency: w[1].frequency,
                    amplitude: mid,
                    index: i + 1,
                })
            })
            .collect();

        peaks.sort_by(|a, b| {
            b.amplitude
                .partial_cmp(&a.amplitude)
                .unwrap_or(Ordering::Equal)
        });
        peaks.truncate(self.max_peaks);
        peaks
    }
}

/// Peaks above `threshold` with the default limit of five.
pub fn find_peaks(spectrum: &[SpectrumPoint], threshold: f64) -> Vec<PeakMarker> {
    PeakDetector::new()
        .with_threshold(threshold)
        .find_peaks(spectrum)
}
