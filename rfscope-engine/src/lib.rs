mod decoder;
mod encoder;
mod error;
mod events;
mod frame;
mod peaks;
mod pipeline;
mod rolling;

use std::panic::{self, AssertUnwindSafe};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use flume::{Receiver, Sender};
use log::{debug, info, warn};
use rfscope_messages::{Command, Event, MonitorSettings, SweepData, SweepResult};

pub use decoder::reconstruct;
pub use encoder::{DeltaEncoder, EncoderConfig, compression_ratio};
pub use error::{FrameError, SweepError};
pub use events::{EventDetector, RandomSampler, WarningSampler};
pub use frame::{Frame, SweepConfig, SweepFrameParser};
pub use peaks::{PeakDetector, find_peaks};
pub use pipeline::{PipelineConfig, PipelineState, SpectrumPipeline};
pub use rolling::{update_average, update_max_hold};

/// The spectrum worker.
/// Owns one pipeline and answers commands from the caller, one at a time.
pub struct Engine {
    cmd_rx: Receiver<Command>,
    event_tx: Sender<Event>,
    pipeline: SpectrumPipeline,
}

impl Engine {
    /// Create a new Engine instance.
    pub fn new(cmd_rx: Receiver<Command>, event_tx: Sender<Event>, config: PipelineConfig) -> Self {
        Self::with_pipeline(cmd_rx, event_tx, SpectrumPipeline::new(config))
    }

    /// Create an Engine around an already configured pipeline.
    pub fn with_pipeline(
        cmd_rx: Receiver<Command>,
        event_tx: Sender<Event>,
        pipeline: SpectrumPipeline,
    ) -> Self {
        debug!("Constructing a new engine");
        Self {
            cmd_rx,
            event_tx,
            pipeline,
        }
    }

    /// Run the engine (blocking).
    /// Announces itself with `WorkerReady`, then serves commands until `Stop`
    /// arrives or either channel is closed.
    pub fn run(mut self) -> Result<()> {
        self.event_tx.send(Event::WorkerReady {
            timestamp: now_millis(),
        })?;
        info!("Engine ready");

        while let Ok(cmd) = self.cmd_rx.recv() {
            debug!("Engine received command: {}", command_name(&cmd));

            let Some(event) = self.handle(cmd) else {
                break;
            };
            if self.event_tx.send(event).is_err() {
                debug!("Event receiver dropped, stopping engine");
                break;
            }
        }

        info!("Engine stopped");
        Ok(())
    }

    /// Execute a single command. Returns `None` for `Stop`.
    pub fn handle(&mut self, cmd: Command) -> Option<Event> {
        let event = match cmd {
            Command::ProcessSweep {
                sweep_data,
                monitor_settings,
                current_baseline_spectrum,
                current_max_hold_data,
                current_avg_data,
            } => {
                // A restore only sticks if its sweep goes through.
                let restoring = current_baseline_spectrum.is_some()
                    || current_max_hold_data.is_some()
                    || current_avg_data.is_some();
                let saved = restoring.then(|| self.pipeline.snapshot());
                self.pipeline.restore(
                    current_baseline_spectrum,
                    current_max_hold_data,
                    current_avg_data,
                );
                match self.process(&sweep_data, &monitor_settings) {
                    Ok(result) => Event::SweepProcessed(result),
                    Err(e) => {
                        warn!("Dropping sweep at {} ms: {}", sweep_data.timestamp, e);
                        if let Some(saved) = saved {
                            self.pipeline.rollback(saved);
                        }
                        error_event(&e)
                    }
                }
            }
            Command::ResetMaxHold => {
                self.pipeline.reset_max_hold();
                Event::MaxHoldReset { success: true }
            }
            Command::ResetBaseline => {
                self.pipeline.reset_baseline();
                Event::BaselineReset { success: true }
            }
            Command::ResetAll => {
                self.pipeline.reset_all();
                Event::AllReset { success: true }
            }
            Command::Stop => return None,
        };
        Some(event)
    }

    pub fn pipeline(&self) -> &SpectrumPipeline {
        &self.pipeline
    }

    /// Process a sweep, turning a panic inside the pipeline into an error.
    fn process(
        &mut self,
        sweep: &SweepData,
        settings: &MonitorSettings,
    ) -> std::result::Result<SweepResult, SweepError> {
        let pipeline = &mut self.pipeline;
        panic::catch_unwind(AssertUnwindSafe(|| pipeline.process_sweep(sweep, settings)))
            .unwrap_or_else(|payload| Err(SweepError::Panicked(panic_message(payload.as_ref()))))
    }
}

fn error_event(err: &dyn std::error::Error) -> Event {
    let mut stack = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        stack.push(cause.to_string());
        source = cause.source();
    }
    Event::error(err.to_string(), stack.join("\n"))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn command_name(cmd: &Command) -> &'static str {
    match cmd {
        Command::ProcessSweep { .. } => "PROCESS_SWEEP",
        Command::ResetMaxHold => "RESET_MAX_HOLD",
        Command::ResetBaseline => "RESET_BASELINE",
        Command::ResetAll => "RESET_ALL",
        Command::Stop => "STOP",
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
