//! Fixed-size trailing window.

use std::collections::VecDeque;

/// Sliding sum over the last `size` pushed values.
///
/// The sum is updated incrementally: each push adds the new value and
/// subtracts the one that falls out of the window.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    size: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl RollingWindow {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        RollingWindow {
            size,
            values: VecDeque::with_capacity(size + 1),
            sum: 0.0,
        }
    }

    /// Pushes a value and returns the updated window sum.
    pub fn push(&mut self, value: f64) -> f64 {
        self.values.push_back(value);
        self.sum += value;
        if self.values.len() > self.size {
            if let Some(oldest) = self.values.pop_front() {
                self.sum -= oldest;
            }
        }
        self.sum
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

/// Trailing average: `floor(10 * windowSum / window) / 10` at every index.
///
/// The divisor is always `window`, also while the window is still filling.
/// Returns `None` for empty input.
pub fn trailing_average(values: &[f64], window: usize) -> Option<Vec<f64>> {
    if values.is_empty() {
        return None;
    }

    let mut rolling = RollingWindow::new(window);
    let divisor = rolling.size() as f64;

    Some(
        values
            .iter()
            .map(|&v| (10.0 * rolling.push(v) / divisor).floor() / 10.0)
            .collect(),
    )
}

// -- Tests -------------------------------------------------------------------
