/// Solve the dense `n x n` system `a * x = b` (row-major `a`) by
/// Gauss-Jordan elimination with partial pivoting.
///
/// Returns `None` when a pivot vanishes relative to the matrix scale.
pub(crate) fn solve(mut a: Vec<f64>, mut b: Vec<f64>, n: usize) -> Option<Vec<f64>> {
    if a.len() != n * n || b.len() != n {
        return None;
    }

    let scale = a.iter().fold(0.0_f64, |acc, value| acc.max(value.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return None;
    }
    let threshold = scale * 1e-12;

    for i in 0..n {
        let mut max_row = i;
        for k in (i + 1)..n {
            if a[k * n + i].abs() > a[max_row * n + i].abs() {
                max_row = k;
            }
        }
        if max_row != i {
            for j in 0..n {
                a.swap(i * n + j, max_row * n + j);
            }
            b.swap(i, max_row);
        }

        let pivot = a[i * n + i];
        if pivot.abs() < threshold {
            return None;
        }

        for j in 0..n {
            a[i * n + j] /= pivot;
        }
        b[i] /= pivot;

        for k in 0..n {
            if k != i {
                let factor = a[k * n + i];
                if factor != 0.0 {
                    for j in 0..n {
                        a[k * n + j] -= factor * a[i * n + j];
                    }
                    b[k] -= factor * b[i];
                }
            }
        }
    }

    b.iter().all(|value| value.is_finite()).then_some(b)
}

/// Ordinary least squares via the normal equations. `rows` holds the
/// regressors of each observation.
pub(crate) fn least_squares(rows: &[Vec<f64>], targets: &[f64]) -> Option<Vec<f64>> {
    let k = rows.first()?.len();
    if k == 0 || rows.len() != targets.len() || rows.len() <= k {
        return None;
    }

    let mut xtx = vec![0.0; k * k];
    let mut xty = vec![0.0; k];
    for (row, &target) in rows.iter().zip(targets) {
        for i in 0..k {
            xty[i] += row[i] * target;
            for j in 0..k {
                xtx[i * k + j] += row[i] * row[j];
            }
        }
    }

    solve(xtx, xty, k)
}
