use log::trace;
use rfscope_messages::{DeltaUpdate, SpectrumPoint};

/// Rebuild a full spectrum by applying `deltas` on top of a copy of `baseline`.
///
/// Only amplitudes are overridden. Deltas pointing outside the baseline are
/// skipped so that a partially corrupt update still yields a usable sweep.
pub fn reconstruct(baseline: &[SpectrumPoint], deltas: &[DeltaUpdate]) -> Vec<SpectrumPoint> {
    let mut spectrum = baseline.to_vec();

    for delta in deltas {
        match usize::try_from(delta.index)
            .ok()
            .and_then(|i| spectrum.get_mut(i))
        {
            Some(point) => point.amplitude = delta.amplitude,
            None => trace!(
                "Skipping delta index {} outside baseline of {} bins",
                delta.index,
                baseline.len()
            ),
        }
    }

    spectrum
}
