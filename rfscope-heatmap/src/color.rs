//! dBm color ramp shared by heatmaps and spectrum traces.

/// Below this everything is green.
const GREEN_BELOW: f64 = -70.0;
/// Green reaches yellow here.
const YELLOW_AT: f64 = -60.0;
/// Yellow reaches orange here.
const ORANGE_AT: f64 = -50.0;
/// Orange reaches red here and stays red above.
const RED_AT: f64 = -40.0;

const ORANGE_GREEN: f64 = 165.0;
const ALPHA: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `0.0..=1.0`
    pub a: f32,
}

impl Rgba {
    const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: ALPHA }
    }

    /// `[r, g, b, a]` with alpha scaled to a byte.
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, (self.a * 255.0).round() as u8]
    }

    pub fn to_css(self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

fn channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn progress(value: f64, from: f64, to: f64) -> f64 {
    ((value - from) / (to - from)).clamp(0.0, 1.0)
}

/// Map an amplitude in dBm to a color.
///
/// Green below -70, then green to yellow, yellow to orange, orange to red,
/// saturating at -40. Each segment is linear so the ramp is continuous.
/// NaN maps to green.
pub fn value_to_color(value: f64) -> Rgba {
    if value.is_nan() || value < GREEN_BELOW {
        Rgba::rgb(0, 255, 0)
    } else if value < YELLOW_AT {
        let t = progress(value, GREEN_BELOW, YELLOW_AT);
        Rgba::rgb(channel(255.0 * t), 255, 0)
    } else if value < ORANGE_AT {
        let t = progress(value, YELLOW_AT, ORANGE_AT);
        Rgba::rgb(255, channel(255.0 - (255.0 - ORANGE_GREEN) * t), 0)
    } else {
        let t = progress(value, ORANGE_AT, RED_AT);
        Rgba::rgb(255, channel(ORANGE_GREEN * (1.0 - t)), 0)
    }
}
