/// Frequency in Megahertz.
///
/// Displays as GHz with two decimals from 1000 MHz upwards, otherwise as MHz
/// with one decimal.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Megahertz(pub f64);

impl std::fmt::Display for Megahertz {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 >= 1000.0 {
            write!(f, "{:.2} GHz", self.0 / 1000.0)
        } else {
            write!(f, "{:.1} MHz", self.0)
        }
    }
}

impl Megahertz {
    pub fn from_khz(khz: f64) -> Self {
        Self(khz / 1_000.0)
    }

    pub const fn as_mhz(self) -> f64 {
        self.0
    }
}

/// Power level in dBm.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Dbm(pub f64);

impl std::fmt::Display for Dbm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1} dBm", self.0)
    }
}

impl Dbm {
    /// Noise floor used when a previous reading is missing.
    pub const FLOOR: Dbm = Dbm(-120.0);

    pub const fn as_dbm(self) -> f64 {
        self.0
    }
}
