use super::linalg::least_squares;
use super::transform::{unconstrain_invertible, unconstrain_stationary};

const VARIANCE_FLOOR: f64 = 1e-12;

/// Biased sample autocovariances for lags `0..=max_lag` of a zero-mean
/// series.
pub(crate) fn autocovariances(data: &[f64], max_lag: usize) -> Vec<f64> {
    let n = data.len();
    if n == 0 {
        return vec![0.0; max_lag + 1];
    }
    (0..=max_lag)
        .map(|lag| {
            if lag >= n {
                return 0.0;
            }
            let sum: f64 = data[lag..]
                .iter()
                .zip(data)
                .map(|(later, earlier)| later * earlier)
                .sum();
            sum / n as f64
        })
        .collect()
}

/// Yule-Walker AR coefficients via the Levinson-Durbin recursion.
///
/// Stops early (leaving higher lags at zero) once the series is perfectly
/// predictable.
pub(crate) fn levinson_durbin(acov: &[f64], order: usize) -> Vec<f64> {
    let mut phi = vec![0.0; order];
    if order == 0 || acov.len() <= order || acov[0] <= VARIANCE_FLOOR {
        return phi;
    }

    let mut error = acov[0];
    for k in 0..order {
        let mut numerator = acov[k + 1];
        for j in 0..k {
            numerator -= phi[j] * acov[k - j];
        }
        let reflection = numerator / error;

        let previous = phi.clone();
        phi[k] = reflection;
        for j in 0..k {
            phi[j] = previous[j] - reflection * previous[k - 1 - j];
        }

        error *= 1.0 - reflection * reflection;
        if error <= VARIANCE_FLOOR * acov[0] {
            break;
        }
    }
    phi
}

/// Starting AR and MA coefficients for the CSS search, returned in the
/// optimiser's unconstrained parameterisation.
///
/// With an MA part the Hannan-Rissanen two-stage regression is tried first:
/// a long autoregression supplies residual estimates, then the series is
/// regressed on its own lags and the lagged residuals. If that system is
/// too short, singular, or yields a non-stationary/non-invertible pair,
/// Yule-Walker AR values with a zero MA part are used instead.
pub(crate) fn starting_values(data: &[f64], p: usize, q: usize) -> Vec<f64> {
    if q > 0 {
        if let Some(params) = hannan_rissanen(data, p, q).and_then(|(ar, ma)| {
            let mut params = unconstrain_stationary(&ar)?;
            params.extend(unconstrain_invertible(&ma)?);
            Some(params)
        }) {
            return params;
        }
    }

    let ar = levinson_durbin(&autocovariances(data, p), p);
    let mut params = unconstrain_stationary(&ar).unwrap_or_else(|| vec![0.0; p]);
    params.extend(std::iter::repeat(0.0).take(q));
    params
}

fn hannan_rissanen(data: &[f64], p: usize, q: usize) -> Option<(Vec<f64>, Vec<f64>)> {
    let n = data.len();
    let long_order = (p + q + 5).min(n / 4);
    if long_order == 0 {
        return None;
    }

    let long_ar = levinson_durbin(&autocovariances(data, long_order), long_order);
    let mut residuals = vec![0.0; n];
    for t in long_order..n {
        let predicted: f64 = long_ar
            .iter()
            .enumerate()
            .map(|(i, phi)| phi * data[t - 1 - i])
            .sum();
        residuals[t] = data[t] - predicted;
    }

    let start = (long_order + q).max(p);
    if start >= n {
        return None;
    }
    let rows: Vec<Vec<f64>> = (start..n)
        .map(|t| {
            (1..=p)
                .map(|i| data[t - i])
                .chain((1..=q).map(|j| residuals[t - j]))
                .collect()
        })
        .collect();
    let targets = &data[start..];

    let beta = least_squares(&rows, targets)?;
    let (ar, ma) = beta.split_at(p);
    Some((ar.to_vec(), ma.to_vec()))
}
