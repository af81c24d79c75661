/// Derivative-free simplex minimiser.
///
/// Deterministic for a given objective and start point: no random restarts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NelderMead {
    pub max_iterations: usize,
    pub tolerance: f64,
}

/// Best point found by [`NelderMead::minimize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub point: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;
const NONZERO_STEP: f64 = 0.05;
const ZERO_STEP: f64 = 0.00025;

impl NelderMead {
    pub fn new(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
        }
    }

    /// Minimise `objective` starting from `start`. Non-finite objective
    /// values are treated as `+inf`.
    pub fn minimize<F>(&self, objective: F, start: &[f64]) -> Minimum
    where
        F: Fn(&[f64]) -> f64,
    {
        let evaluate = |point: &[f64]| {
            let value = objective(point);
            if value.is_finite() {
                value
            } else {
                f64::INFINITY
            }
        };

        let n = start.len();
        if n == 0 {
            return Minimum {
                point: Vec::new(),
                value: evaluate(start),
                iterations: 0,
                converged: true,
            };
        }

        let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
        simplex.push(start.to_vec());
        for i in 0..n {
            let mut vertex = start.to_vec();
            vertex[i] = if vertex[i].abs() > 1e-8 {
                vertex[i] * (1.0 + NONZERO_STEP)
            } else {
                ZERO_STEP
            };
            simplex.push(vertex);
        }
        let mut values: Vec<f64> = simplex.iter().map(|vertex| evaluate(vertex)).collect();

        let mut iterations = 0;
        let mut converged = false;
        while iterations < self.max_iterations {
            sort_simplex(&mut simplex, &mut values);
            if self.has_converged(&simplex, &values) {
                converged = true;
                break;
            }
            iterations += 1;

            let worst = n;
            let centroid = centroid(&simplex[..n]);
            let reflected = along(&centroid, &simplex[worst], -REFLECT);
            let reflected_value = evaluate(&reflected);

            if reflected_value < values[0] {
                let expanded = along(&centroid, &simplex[worst], -EXPAND);
                let expanded_value = evaluate(&expanded);
                if expanded_value < reflected_value {
                    simplex[worst] = expanded;
                    values[worst] = expanded_value;
                } else {
                    simplex[worst] = reflected;
                    values[worst] = reflected_value;
                }
                continue;
            }

            if reflected_value < values[n - 1] {
                simplex[worst] = reflected;
                values[worst] = reflected_value;
                continue;
            }

            let (contracted, contracted_value) = if reflected_value < values[worst] {
                let outside = along(&centroid, &simplex[worst], -CONTRACT);
                let value = evaluate(&outside);
                (outside, value)
            } else {
                let inside = along(&centroid, &simplex[worst], CONTRACT);
                let value = evaluate(&inside);
                (inside, value)
            };

            if contracted_value < values[worst].min(reflected_value) {
                simplex[worst] = contracted;
                values[worst] = contracted_value;
                continue;
            }

            let best = simplex[0].clone();
            for i in 1..=n {
                simplex[i] = along(&best, &simplex[i], SHRINK);
                values[i] = evaluate(&simplex[i]);
            }
        }

        sort_simplex(&mut simplex, &mut values);
        Minimum {
            point: simplex.swap_remove(0),
            value: values[0],
            iterations,
            converged,
        }
    }

    fn has_converged(&self, simplex: &[Vec<f64>], values: &[f64]) -> bool {
        let best = values[0];
        let worst = values[values.len() - 1];
        if !worst.is_finite() {
            return false;
        }
        let value_spread = worst - best;
        let point_spread = simplex[1..]
            .iter()
            .flat_map(|vertex| vertex.iter().zip(&simplex[0]).map(|(a, b)| (a - b).abs()))
            .fold(0.0_f64, f64::max);

        value_spread <= self.tolerance * (best.abs() + self.tolerance)
            && point_spread <= self.tolerance.sqrt()
    }
}

fn sort_simplex(simplex: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    *simplex = order.iter().map(|&i| simplex[i].clone()).collect();
    *values = order.iter().map(|&i| values[i]).collect();
}

fn centroid(vertices: &[Vec<f64>]) -> Vec<f64> {
    let n = vertices.len() as f64;
    let mut center = vec![0.0; vertices[0].len()];
    for vertex in vertices {
        for (acc, value) in center.iter_mut().zip(vertex) {
            *acc += value / n;
        }
    }
    center
}

/// `origin + factor * (target - origin)`.
fn along(origin: &[f64], target: &[f64], factor: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(target)
        .map(|(o, t)| o + factor * (t - o))
        .collect()
}
