mod command;
mod event;
mod state;
mod units;

pub use command::Command;
pub use event::Event;
pub use state::{
    DeltaStats, DeltaUpdate, EventKind, MeasurementPoint, MonitorSettings, PeakMarker,
    SignalEvent, SpectrumPoint, SweepData, SweepEncoding, SweepResult,
};
pub use units::{Dbm, Megahertz};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_wire_format() {
        let json = r#"{
            "type": "PROCESS_SWEEP",
            "sweepData": {
                "timestamp": 1700000000000,
                "encoding": "delta",
                "deltas": [{"index": 1, "amplitude": -60.0, "frequency": 5010.0}],
                "baseline_age": 2.5,
                "compression_ratio": 87.5
            },
            "monitorSettings": {"autoLog": true, "criticalThreshold": -45.0, "warningThreshold": -55.0}
        }"#;

        let cmd: Command = serde_json::from_str(json).unwrap();
        match cmd {
            Command::ProcessSweep {
                sweep_data,
                monitor_settings,
                current_baseline_spectrum,
                ..
            } => {
                assert_eq!(sweep_data.encoding, SweepEncoding::Delta);
                assert!(sweep_data.data.is_empty());
                assert_eq!(sweep_data.deltas.unwrap()[0].index, 1);
                assert_eq!(sweep_data.baseline_age, Some(2.5));
                assert_eq!(monitor_settings.critical_threshold, -45.0);
                assert!(current_baseline_spectrum.is_none());
            }
            other => panic!("Expected ProcessSweep, got {:?}", other),
        }

        let reset: Command = serde_json::from_str(r#"{"type": "RESET_ALL"}"#).unwrap();
        assert_eq!(reset, Command::ResetAll);
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        let result = serde_json::from_str::<Command>(r#"{"type": "RESET_EVERYTHING"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_event_wire_format() {
        let ready = serde_json::to_value(Event::WorkerReady { timestamp: 42 }).unwrap();
        assert_eq!(ready["type"], "WORKER_READY");
        assert_eq!(ready["timestamp"], 42);

        let reset = serde_json::to_value(Event::MaxHoldReset { success: true }).unwrap();
        assert_eq!(reset["type"], "MAX_HOLD_RESET");

        let event = SignalEvent {
            id: "1-0".into(),
            timestamp: 1,
            kind: EventKind::Critical,
            frequency: 5010.0,
            strength: -40.0,
            message: "Critical signal at 5.01 GHz: -40.0 dBm".into(),
        };
        let processed = Event::SweepProcessed(SweepResult {
            spectrum_data: vec![SpectrumPoint::new(5010.0, -40.0)],
            max_hold_data: vec![],
            avg_data: vec![],
            peak_markers: vec![],
            events: vec![event],
            delta_stats: None,
            baseline_spectrum: None,
            timestamp: 1,
            encoding: SweepEncoding::Full,
        });
        let value = serde_json::to_value(&processed).unwrap();
        assert_eq!(value["type"], "SWEEP_PROCESSED");
        assert_eq!(value["spectrumData"][0]["amplitude"], -40.0);
        assert_eq!(value["events"][0]["type"], "critical");
        assert_eq!(value["encoding"], "full");

        let back: Event = serde_json::from_value(value).unwrap();
        assert_eq!(back, processed);
    }
}
