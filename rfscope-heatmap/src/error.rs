use thiserror::Error;

#[derive(Debug, Error)]
pub enum HeatmapError {
    #[error("grid resolution must be greater than zero")]
    InvalidResolution,
    #[error("distance power must be positive and finite, got {0}")]
    InvalidPower(f64),
}
