use serde::{Deserialize, Serialize};

use crate::{MonitorSettings, SpectrumPoint, SweepData};

/// Commands sent from the caller to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    /// Run one sweep through the pipeline.
    ///
    /// The `current_*` fields are optional state restores: when present they
    /// replace whatever the engine holds before the sweep is processed.
    #[serde(rename_all = "camelCase")]
    ProcessSweep {
        sweep_data: SweepData,
        #[serde(default)]
        monitor_settings: MonitorSettings,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current_baseline_spectrum: Option<Vec<SpectrumPoint>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current_max_hold_data: Option<Vec<SpectrumPoint>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current_avg_data: Option<Vec<SpectrumPoint>>,
    },
    /// Clear the max-hold trace.
    ResetMaxHold,
    /// Drop the delta baseline; the next sweep must carry full data.
    ResetBaseline,
    /// Clear baseline, max-hold and average.
    ResetAll,
    /// Stop the engine. No reply is sent.
    Stop,
}

impl Command {
    /// Shorthand for a sweep command without state restores.
    pub fn process(sweep_data: SweepData, monitor_settings: MonitorSettings) -> Self {
        Command::ProcessSweep {
            sweep_data,
            monitor_settings,
            current_baseline_spectrum: None,
            current_max_hold_data: None,
            current_avg_data: None,
        }
    }
}
