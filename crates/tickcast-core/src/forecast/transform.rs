//! Maps between unconstrained optimiser parameters and AR polynomials whose
//! roots lie outside the unit circle.
//!
//! Each unconstrained value becomes a partial autocorrelation in (-1, 1)
//! via `u / sqrt(1 + u^2)`; the Durbin-Levinson recursion then turns the
//! partial autocorrelations into AR coefficients. Any real input therefore
//! yields a stationary AR (or, with the sign flipped, an invertible MA)
//! polynomial.

/// AR coefficients of a stationary process.
pub(crate) fn constrain_stationary(unconstrained: &[f64]) -> Vec<f64> {
    let partials: Vec<f64> = unconstrained
        .iter()
        .map(|u| u / (1.0 + u * u).sqrt())
        .collect();
    partials_to_coefficients(&partials)
}

/// Inverse of [`constrain_stationary`]; `None` when `coefficients` are not
/// stationary.
pub(crate) fn unconstrain_stationary(coefficients: &[f64]) -> Option<Vec<f64>> {
    let n = coefficients.len();
    let mut current = coefficients.to_vec();
    let mut partials = vec![0.0; n];

    for k in (0..n).rev() {
        let reflection = current[k];
        if !reflection.is_finite() || reflection.abs() >= 1.0 {
            return None;
        }
        partials[k] = reflection;

        let denominator = 1.0 - reflection * reflection;
        let previous = current.clone();
        for j in 0..k {
            current[j] = (previous[j] + reflection * previous[k - 1 - j]) / denominator;
        }
        current.truncate(k);
    }

    Some(
        partials
            .iter()
            .map(|r| r / (1.0 - r * r).sqrt())
            .collect(),
    )
}

/// MA coefficients of an invertible process (`1 + theta_1 B + ...`).
pub(crate) fn constrain_invertible(unconstrained: &[f64]) -> Vec<f64> {
    constrain_stationary(unconstrained)
        .into_iter()
        .map(|value| -value)
        .collect()
}

pub(crate) fn unconstrain_invertible(coefficients: &[f64]) -> Option<Vec<f64>> {
    let negated: Vec<f64> = coefficients.iter().map(|value| -value).collect();
    unconstrain_stationary(&negated)
}

pub(crate) fn partials_to_coefficients(partials: &[f64]) -> Vec<f64> {
    let mut coefficients: Vec<f64> = Vec::with_capacity(partials.len());
    for (k, &reflection) in partials.iter().enumerate() {
        let previous = coefficients.clone();
        for j in 0..k {
            coefficients[j] = previous[j] - reflection * previous[k - 1 - j];
        }
        coefficients.push(reflection);
    }
    coefficients
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(left: &[f64], right: &[f64]) {
        assert_eq!(left.len(), right.len());
        for (a, b) in left.iter().zip(right) {
            assert!((a - b).abs() < 1e-9, "{left:?} != {right:?}");
        }
    }

    #[test]
    fn round_trips_stationary_coefficients() {
        for unconstrained in [vec![0.3], vec![-1.2, 0.4], vec![0.5, -0.2, 2.0, 0.1, -0.7]] {
            let coefficients = constrain_stationary(&unconstrained);
            let back = unconstrain_stationary(&coefficients).expect("stationary");
            assert_close(&back, &unconstrained);
        }
    }

    #[test]
    fn single_lag_is_bounded_by_one() {
        let coefficients = constrain_stationary(&[1e6]);
        assert!(coefficients[0] < 1.0 && coefficients[0] > 0.99);
    }

    #[test]
    fn explosive_ar_is_rejected() {
        assert!(unconstrain_stationary(&[1.5]).is_none());
        // 1 - 0.5B - 0.6B^2 has a root inside the unit circle.
        assert!(unconstrain_stationary(&[0.5, 0.6]).is_none());
    }

    #[test]
    fn invertible_ma_uses_opposite_sign() {
        let theta = constrain_invertible(&[0.5]);
        assert!(theta[0] < 0.0);
        let back = unconstrain_invertible(&theta).expect("invertible");
        assert_close(&back, &[0.5]);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(constrain_stationary(&[]).is_empty());
        assert_eq!(unconstrain_stationary(&[]), Some(Vec::new()));
    }
}
