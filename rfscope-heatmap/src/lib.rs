//! Spatial heatmaps from sparse signal-strength measurements.
//!
//! [`interpolate`] spreads the measurements over a regular grid by inverse
//! distance weighting, [`blur`] smooths the result and [`value_to_color`]
//! turns cell values into display colors.
//!
//! ```
//! use rfscope_heatmap::{blur, interpolate};
//! use rfscope_messages::MeasurementPoint;
//!
//! let survey = [
//!     MeasurementPoint::new(10.0, 10.0, -45.0),
//!     MeasurementPoint::new(80.0, 60.0, -75.0),
//! ];
//! let heatmap = interpolate(&survey, 100, 80, 2.0, 5).unwrap();
//! let smooth = blur(&heatmap, 2);
//! assert_eq!((smooth.cols(), smooth.rows()), (20, 16));
//! ```

mod blur;
mod color;
mod error;
mod grid;
mod idw;

pub use blur::{blur, gaussian_kernel};
pub use color::{Rgba, value_to_color};
pub use error::HeatmapError;
pub use grid::Heatmap;
pub use idw::{IdwInterpolator, interpolate};
