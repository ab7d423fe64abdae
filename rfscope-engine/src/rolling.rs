use rfscope_messages::{Dbm, SpectrumPoint};

/// Weight of the previous average in the EMA, out of [`AVERAGE_SPAN`].
const AVERAGE_HISTORY_WEIGHT: f64 = 9.0;
const AVERAGE_SPAN: f64 = 10.0;

fn aligned<'a>(
    current: &[SpectrumPoint],
    previous: Option<&'a [SpectrumPoint]>,
) -> Option<&'a [SpectrumPoint]> {
    previous.filter(|prev| prev.len() == current.len())
}

/// Per-bin maximum of `current` and `previous`.
///
/// A missing or differently sized `previous` restarts from `current`.
pub fn update_max_hold(
    current: &[SpectrumPoint],
    previous: Option<&[SpectrumPoint]>,
) -> Vec<SpectrumPoint> {
    let Some(previous) = aligned(current, previous) else {
        return current.to_vec();
    };

    current
        .iter()
        .zip(previous)
        .map(|(cur, prev)| {
            let held = if prev.amplitude.is_nan() {
                Dbm::FLOOR.as_dbm()
            } else {
                prev.amplitude
            };
            SpectrumPoint::new(cur.frequency, cur.amplitude.max(held))
        })
        .collect()
}

/// Exponential moving average with a 0.1 weight on the new sample.
pub fn update_average(
    current: &[SpectrumPoint],
    previous: Option<&[SpectrumPoint]>,
) -> Vec<SpectrumPoint> {
    let Some(previous) = aligned(current, previous) else {
        return current.to_vec();
    };

    current
        .iter()
        .zip(previous)
        .map(|(cur, prev)| {
            let history = if prev.amplitude.is_nan() {
                cur.amplitude
            } else {
                prev.amplitude
            };
            SpectrumPoint::new(
                cur.frequency,
                (cur.amplitude + history * AVERAGE_HISTORY_WEIGHT) / AVERAGE_SPAN,
            )
        })
        .collect()
}
