use crate::grid::Heatmap;

/// Normalized `(2r+1)²` Gaussian kernel with `sigma = r / 2`, row-major.
pub fn gaussian_kernel(radius: usize) -> Vec<f64> {
    if radius == 0 {
        return vec![1.0];
    }

    let sigma = radius as f64 / 2.0;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let r = radius as isize;

    let mut kernel: Vec<f64> = (-r..=r)
        .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
        .map(|(dx, dy)| (-((dx * dx + dy * dy) as f64) / two_sigma_sq).exp())
        .collect();

    let sum: f64 = kernel.iter().sum();
    kernel.iter_mut().for_each(|w| *w /= sum);
    kernel
}

/// Convolve `grid` with a Gaussian of the given radius.
///
/// Cells outside the grid take the value of the nearest edge cell.
/// A radius of zero returns the grid unchanged.
pub fn blur(grid: &Heatmap, radius: usize) -> Heatmap {
    if radius == 0 || grid.is_empty() {
        return grid.clone();
    }

    let kernel = gaussian_kernel(radius);
    let size = 2 * radius + 1;
    let (cols, rows) = (grid.cols(), grid.rows());
    let source = grid.values();
    let clamp = |v: isize, len: usize| v.clamp(0, len as isize - 1) as usize;

    let mut values = Vec::with_capacity(source.len());
    for row in 0..rows {
        for col in 0..cols {
            let mut acc = 0.0;
            for ky in 0..size {
                let sy = clamp(row as isize + ky as isize - radius as isize, rows);
                for kx in 0..size {
                    let sx = clamp(col as isize + kx as isize - radius as isize, cols);
                    acc += source[sy * cols + sx] * kernel[ky * size + kx];
                }
            }
            values.push(acc);
        }
    }

    Heatmap::from_values(cols, rows, grid.resolution(), values)
}
