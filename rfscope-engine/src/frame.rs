use log::{debug, warn};
use rfscope_messages::{Megahertz, SpectrumPoint};

use crate::error::FrameError;

/// Longest config line searched for an end-of-line marker.
const CONFIG_SCAN_LIMIT: usize = 100;
/// Where an unterminated config line is cut.
const CONFIG_FALLBACK_EOL: usize = 50;

/// Frequency range the analyzer is sweeping.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    pub start_freq_mhz: f64,
    pub end_freq_mhz: f64,
    pub steps: usize,
    pub rbw_khz: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start_freq_mhz: 1990.0,
            end_freq_mhz: 6000.0,
            steps: 112,
            rbw_khz: 600.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Sweep(Vec<SpectrumPoint>),
    Config(SweepConfig),
}

/// Incremental decoder for RF Explorer serial frames.
///
/// Handles `$S<n><n amplitude bytes><EOL>` sweeps, where each byte is
/// `-dBm * 2`, and `$C<start kHz, 7 digits><span kHz, 7 digits>...<CR|LF>`
/// configuration lines. Incomplete frames stay buffered until the rest arrives.
#[derive(Debug, Default)]
pub struct SweepFrameParser {
    config: SweepConfig,
    buffer: Vec<u8>,
}

impl SweepFrameParser {
    pub fn new(config: SweepConfig) -> Self {
        Self {
            config,
            buffer: Vec::new(),
        }
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Feed raw bytes and return every frame completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<Frame> {
        self.buffer.extend_from_slice(bytes);
        let mut frames = Vec::new();

        while !self.buffer.is_empty() {
            let Some(start) = self.buffer.iter().position(|&b| b == b'$') else {
                self.buffer.clear();
                break;
            };
            self.buffer.drain(..start);

            if self.buffer.len() < 3 {
                break;
            }

            let frame = match self.buffer[1] {
                b'S' => self.parse_sweep().map(Frame::Sweep),
                b'C' => self.parse_config().map(Frame::Config),
                _ => {
                    self.buffer.drain(..1);
                    continue;
                }
            };

            match frame {
                Some(frame) => frames.push(frame),
                None => break,
            }
        }

        frames
    }

    fn parse_sweep(&mut self) -> Option<Vec<SpectrumPoint>> {
        if self.buffer.len() < 4 {
            return None;
        }

        let steps = self.buffer[2] as usize;
        let frame_len = 3 + steps + 1;
        if self.buffer.len() < frame_len {
            return None;
        }

        let start = self.config.start_freq_mhz;
        let freq_step = if steps > 1 {
            (self.config.end_freq_mhz - start) / (steps - 1) as f64
        } else {
            0.0
        };

        let points = self.buffer[3..3 + steps]
            .iter()
            .enumerate()
            .map(|(i, &raw)| {
                let frequency = start + i as f64 * freq_step;
                SpectrumPoint::new((frequency * 1000.0).round() / 1000.0, -(raw as f64) / 2.0)
            })
            .collect();

        self.buffer.drain(..frame_len);
        Some(points)
    }

    fn parse_config(&mut self) -> Option<SweepConfig> {
        let scan = self.buffer.len().min(CONFIG_SCAN_LIMIT);
        let eol = match self.buffer[..scan]
            .iter()
            .position(|&b| b == b'\r' || b == b'\n')
        {
            Some(eol) => eol,
            None if self.buffer.len() < CONFIG_SCAN_LIMIT => return None,
            None => CONFIG_FALLBACK_EOL,
        };

        let line = self.buffer[2..eol].to_vec();
        self.buffer.drain(..=eol);

        match self.apply_config(&line) {
            Ok(()) => debug!(
                "Config updated: {} - {}",
                Megahertz(self.config.start_freq_mhz),
                Megahertz(self.config.end_freq_mhz)
            ),
            Err(e) => warn!("Config parse error: {}", e),
        }

        Some(self.config.clone())
    }

    fn apply_config(&mut self, line: &[u8]) -> Result<(), FrameError> {
        if !line.is_ascii() {
            return Err(FrameError::NotAscii);
        }
        if line.len() < 14 {
            return Err(FrameError::ShortConfig(line.len()));
        }

        let start_khz = parse_khz(&line[0..7])?;
        let span_khz = parse_khz(&line[7..14])?;

        self.config.start_freq_mhz = Megahertz::from_khz(start_khz as f64).as_mhz();
        self.config.end_freq_mhz =
            self.config.start_freq_mhz + Megahertz::from_khz(span_khz as f64).as_mhz();
        Ok(())
    }
}

fn parse_khz(field: &[u8]) -> Result<u64, FrameError> {
    // Caller has checked the line is ASCII.
    let text = String::from_utf8_lossy(field);
    text.trim()
        .parse()
        .map_err(|source| FrameError::InvalidFrequency {
            field: text.to_string(),
            source,
        })
}
