use rfscope_engine::{Engine, PipelineConfig};
use rfscope_messages::{Command, Event};

use anyhow::{Context, anyhow};
use log::{LevelFilter, debug, info, warn};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

/// Seeds the warning sampler when set, for reproducible runs.
const SEED_VAR: &str = "RFSCOPE_SEED";

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .format(|buf, record| {
            writeln!(
                buf,
                "{:<5} - mod path |{}| - target | {} | args: |{}|",
                record.level(),
                record.module_path().unwrap_or(""),
                record.target(),
                record.args()
            )
        })
        .filter_level(LevelFilter::Info)
        .filter_module("rfscope_engine", LevelFilter::Info)
        .filter_module("rfscope_heatmap", LevelFilter::Warn)
        .filter_module("rfscope", LevelFilter::Debug)
        .init();

    let config = PipelineConfig {
        rng_seed: seed_from_env()?,
        ..Default::default()
    };

    let stdout = io::stdout();
    let output = stdout.lock();

    // Commands come from the file given as first argument, or from stdin
    let events = match std::env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("opening {}", path))?;
            replay(BufReader::new(file), output, config)?
        }
        None => replay(io::stdin().lock(), output, config)?,
    };

    info!("Wrote {} events", events);
    Ok(())
}

fn seed_from_env() -> anyhow::Result<Option<u64>> {
    match std::env::var(SEED_VAR) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be an unsigned integer, got {:?}", SEED_VAR, raw)),
        Err(_) => Ok(None),
    }
}

/// Feed JSON-lines commands from `input` to an engine thread and write every
/// event it answers with to `output`, one JSON object per line.
///
/// Lines that do not parse as a command are answered with an `ERROR` event.
/// A `STOP` command ends the replay early. Returns the number of events written.
fn replay<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    config: PipelineConfig,
) -> anyhow::Result<usize> {
    let (cmd_tx, cmd_rx) = flume::unbounded();
    let (event_tx, event_rx) = flume::unbounded();

    // Spawn engine thread
    let engine_handle = std::thread::spawn(move || {
        let engine = Engine::new(cmd_rx, event_tx, config);
        engine.run()
    });

    let mut written = 0;
    let ready = event_rx
        .recv()
        .map_err(|_| anyhow!("Engine exited before it was ready"))?;
    write_event(&mut output, &ready)?;
    written += 1;

    for (number, line) in input.lines().enumerate() {
        let line = line.context("reading commands")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = match serde_json::from_str::<Command>(line) {
            Ok(Command::Stop) => {
                debug!("Stop requested on line {}", number + 1);
                break;
            }
            Ok(cmd) => {
                cmd_tx
                    .send(cmd)
                    .map_err(|_| anyhow!("Engine stopped accepting commands"))?;
                event_rx
                    .recv()
                    .map_err(|_| anyhow!("Engine exited without answering"))?
            }
            Err(e) => {
                warn!("Skipping line {}: {}", number + 1, e);
                Event::error(format!("invalid command on line {}: {}", number + 1, e), "")
            }
        };

        write_event(&mut output, &event)?;
        written += 1;
    }
    output.flush()?;

    // Input is exhausted - send stop command to engine
    let _ = cmd_tx.send(Command::Stop);

    // Wait for engine thread to finish
    engine_handle
        .join()
        .map_err(|_| anyhow!("Engine thread panicked"))??;

    Ok(written)
}

fn write_event<W: Write>(output: &mut W, event: &Event) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *output, event)?;
    output.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfscope_messages::{EventKind, SweepEncoding};
    use std::io::{Seek, SeekFrom};

    const FULL_SWEEP: &str = r#"{"type":"PROCESS_SWEEP","sweepData":{"data":[{"frequency":5000.0,"amplitude":-80.0},{"frequency":5010.0,"amplitude":-45.0},{"frequency":5020.0,"amplitude":-82.0}],"timestamp":1000,"encoding":"full"},"monitorSettings":{"autoLog":true,"criticalThreshold":-50.0,"warningThreshold":-60.0}}"#;
    const DELTA_SWEEP: &str = r#"{"type":"PROCESS_SWEEP","sweepData":{"timestamp":2000,"encoding":"delta","deltas":[{"index":0,"amplitude":-70.0},{"index":9,"amplitude":-10.0}]},"monitorSettings":{"autoLog":false,"criticalThreshold":-50.0,"warningThreshold":-60.0}}"#;

    fn seeded() -> PipelineConfig {
        PipelineConfig {
            rng_seed: Some(7),
            ..Default::default()
        }
    }

    fn parse_events(output: &[u8]) -> Vec<Event> {
        output
            .split(|&b| b == b'\n')
            .filter(|line| !line.is_empty())
            .map(|line| serde_json::from_slice(line).expect("every output line is an event"))
            .collect()
    }

    fn replay_file(contents: &str) -> (usize, Vec<Event>) {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();

        let mut output = Vec::new();
        let written = replay(BufReader::new(file), &mut output, seeded()).unwrap();
        (written, parse_events(&output))
    }

    #[test]
    fn test_replay_full_then_delta() {
        let (written, events) = replay_file(&format!("{}\n\n{}\n", FULL_SWEEP, DELTA_SWEEP));

        assert_eq!(written, 3);
        assert!(matches!(events[0], Event::WorkerReady { .. }));

        let Event::SweepProcessed(full) = &events[1] else {
            panic!("expected SWEEP_PROCESSED, got {:?}", events[1]);
        };
        assert_eq!(full.encoding, SweepEncoding::Full);
        assert_eq!(full.peak_markers.len(), 1);
        assert_eq!(full.peak_markers[0].index, 1);
        assert_eq!(full.events.len(), 1);
        assert_eq!(full.events[0].kind, EventKind::Critical);
        assert_eq!(full.events[0].frequency, 5010.0);

        let Event::SweepProcessed(delta) = &events[2] else {
            panic!("expected SWEEP_PROCESSED, got {:?}", events[2]);
        };
        let amplitudes: Vec<f64> = delta.spectrum_data.iter().map(|p| p.amplitude).collect();
        assert_eq!(amplitudes, vec![-70.0, -45.0, -82.0]);
        assert!(delta.events.is_empty());
    }

    #[test]
    fn test_invalid_lines_become_errors() {
        let input = "not json\n{\"type\":\"RESET_EVERYTHING\"}\n{\"type\":\"RESET_ALL\"}\n";
        let (written, events) = replay_file(input);

        assert_eq!(written, 4);
        match &events[1] {
            Event::Error { message, .. } => assert!(message.contains("line 1")),
            other => panic!("expected ERROR, got {:?}", other),
        }
        assert!(matches!(events[2], Event::Error { .. }));
        assert_eq!(events[3], Event::AllReset { success: true });
    }

    #[test]
    fn test_stop_ends_replay() {
        let input = "{\"type\":\"RESET_MAX_HOLD\"}\n{\"type\":\"STOP\"}\n{\"type\":\"RESET_ALL\"}\n";
        let (written, events) = replay_file(input);

        assert_eq!(written, 2);
        assert_eq!(events[1], Event::MaxHoldReset { success: true });
    }

    #[test]
    fn test_sweep_errors_are_reported() {
        let (_, events) = replay_file(&format!("{}\n", DELTA_SWEEP));

        match &events[1] {
            Event::Error { message, .. } => assert!(message.contains("baseline")),
            other => panic!("expected ERROR, got {:?}", other),
        }
    }
}
