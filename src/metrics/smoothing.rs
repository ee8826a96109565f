//! Three-point symmetric smoothing and the rate of change derived from it.

/// Smoothed values: interior points average with both neighbours, the end
/// points keep their raw value. Zeros become `1` so they can divide.
fn smooth(values: &[f64]) -> Vec<f64> {
    let last = values.len() - 1;
    (0..values.len())
        .map(|i| {
            let y = if i == 0 || i == last {
                values[i]
            } else {
                (values[i - 1] + values[i] + values[i + 1]) / 3.0
            };
            if y == 0.0 {
                1.0
            } else {
                y
            }
        })
        .collect()
}

/// Percentage change of the smoothed series, floored to one decimal:
/// `c[i] = floor(1000 * (s[i] - s[i-1]) / s[i-1]) / 10`, with `c[0] = 0`.
///
/// Returns `None` for empty input.
pub fn symmetric_rate_of_change(values: &[f64]) -> Option<Vec<f64>> {
    if values.is_empty() {
        return None;
    }

    let smoothed = smooth(values);
    let mut rates = Vec::with_capacity(values.len());
    rates.push(0.0);
    for w in smoothed.windows(2) {
        let change = w[1] - w[0];
        rates.push((1000.0 * change / w[0]).floor() / 10.0);
    }

    Some(rates)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn should_return_none_for_empty_input() {
        assert_eq!(symmetric_rate_of_change(&[]), None);
    }

    #[test]
    fn should_give_zero_for_single_point() {
        assert_eq!(symmetric_rate_of_change(&[1.0]), Some(vec![0.0]));
    }

    #[test]
    fn should_give_zero_for_flat_series() {
        assert_eq!(
            symmetric_rate_of_change(&[1.0, 1.0, 1.0]),
            Some(vec![0.0, 0.0, 0.0])
        );
    }

    #[test]
    fn should_smooth_interior_points() {
        assert_eq!(smooth(&[3.0, 6.0, 9.0, 30.0]), vec![3.0, 6.0, 15.0, 30.0]);
    }

    #[test]
    fn should_guard_against_zero() {
        assert_eq!(smooth(&[0.0, 0.0]), vec![1.0, 1.0]);
        assert_eq!(symmetric_rate_of_change(&[0.0, 2.0]), Some(vec![0.0, 100.0]));
    }

    #[test]
    fn should_compute_percentage_change() {
        // smoothed: 100, 110, 120 -> +10%, +9.09%
        let rates = symmetric_rate_of_change(&[100.0, 110.0, 120.0]).unwrap();
        assert_eq!(rates, vec![0.0, 10.0, 9.0]);
    }
}
