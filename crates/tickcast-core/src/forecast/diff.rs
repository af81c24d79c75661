/// Difference `data` `order` times.
///
/// Returns the differenced series together with the last value of every
/// intermediate level (level 0 is `data` itself), which [`integrate`] needs
/// to undo the transformation.
pub fn difference(data: &[f64], order: usize) -> (Vec<f64>, Vec<f64>) {
    let mut current = data.to_vec();
    let mut tails = Vec::with_capacity(order);
    for _ in 0..order {
        tails.push(current.last().copied().unwrap_or(0.0));
        current = current.windows(2).map(|pair| pair[1] - pair[0]).collect();
    }
    (current, tails)
}

/// Accumulate differenced-scale values back onto the original scale,
/// continuing from the recorded `tails`.
pub fn integrate(increments: &[f64], tails: &[f64]) -> Vec<f64> {
    let mut values = increments.to_vec();
    for &tail in tails.iter().rev() {
        let mut level = tail;
        for value in &mut values {
            level += *value;
            *value = level;
        }
    }
    values
}
