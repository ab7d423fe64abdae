use crate::color::value_to_color;

/// Values sampled on a regular grid, row-major.
///
/// Cell `(col, row)` sits at `(col * resolution, row * resolution)` in
/// measurement coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    cols: usize,
    rows: usize,
    resolution: u32,
    values: Vec<f64>,
}

impl Heatmap {
    /// A grid with no cells.
    pub fn empty(resolution: u32) -> Self {
        Self {
            cols: 0,
            rows: 0,
            resolution,
            values: Vec::new(),
        }
    }

    pub(crate) fn from_values(cols: usize, rows: usize, resolution: u32, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), cols * rows);
        Self {
            cols,
            rows,
            resolution,
            values,
        }
    }

    /// Build a grid from equally long rows. Returns `None` for ragged input.
    pub fn from_rows(rows: Vec<Vec<f64>>, resolution: u32) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return None;
        }
        let n_rows = if cols == 0 { 0 } else { rows.len() };
        Some(Self::from_values(
            cols,
            n_rows,
            resolution,
            rows.into_iter().flatten().collect(),
        ))
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Spacing between cells in measurement units.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, col: usize, row: usize) -> Option<f64> {
        if col < self.cols && row < self.rows {
            Some(self.values[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        (row < self.rows).then(|| &self.values[row * self.cols..(row + 1) * self.cols])
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Minimum and maximum cell values.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.values.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// RGBA bytes, four per cell, row-major, through the dBm color ramp.
    pub fn to_rgba_pixels(&self) -> Vec<u8> {
        self.values
            .iter()
            .flat_map(|&v| value_to_color(v).to_bytes())
            .collect()
    }
}
