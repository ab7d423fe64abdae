use thiserror::Error;

/// Reasons a single sweep can be dropped. None of them stop the engine.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("malformed sweep: {0}")]
    MalformedSweep(String),
    #[error("delta sweep received without a baseline; send a full sweep first")]
    MissingBaseline,
    #[error("sweep processing panicked: {0}")]
    Panicked(String),
}

/// Configuration text from the analyzer that could not be parsed.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("config line is not ASCII")]
    NotAscii,
    #[error("config line too short: expected at least 14 digits, got {0} bytes")]
    ShortConfig(usize),
    #[error("invalid frequency field {field:?}")]
    InvalidFrequency {
        field: String,
        #[source]
        source: std::num::ParseIntError,
    },
}
