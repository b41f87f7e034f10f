//! Derivative-free Nelder–Mead minimizer over `n`-dimensional points.
//!
//! The optimizer runs a fixed iteration budget and returns the best vertex it
//! has seen. Restarts from several seeds are the caller's job.

use easefit_core::{EaseFitError, EaseFitResult};

/// Reflection coefficient.
pub const ALPHA: f64 = 1.0;
/// Expansion coefficient.
pub const GAMMA: f64 = 2.0;
/// Contraction coefficient.
pub const RHO: f64 = 0.5;
/// Shrink coefficient.
pub const SIGMA: f64 = 0.5;

/// Best point found by one optimizer run.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub point: Vec<f64>,
    pub value: f64,
    /// Iterations actually performed.
    pub iterations: usize,
    /// Objective evaluations, including the initial simplex.
    pub evaluations: usize,
}

/// Nelder–Mead settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NelderMead {
    alpha: f64,
    gamma: f64,
    rho: f64,
    sigma: f64,
    max_iterations: usize,
    tolerance: Option<f64>,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self::new(easefit_core::config::DEFAULT_ITERATIONS)
    }
}

impl NelderMead {
    /// Standard coefficients with a fixed iteration budget.
    pub fn new(max_iterations: usize) -> Self {
        Self {
            alpha: ALPHA,
            gamma: GAMMA,
            rho: RHO,
            sigma: SIGMA,
            max_iterations,
            tolerance: None,
        }
    }

    /// Stop early once `worst - best` drops to `tolerance` or below.
    pub fn with_tolerance(mut self, tolerance: Option<f64>) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Minimize `objective` starting from `initial`, with the initial simplex
    /// spread by `steps` along each axis.
    pub fn minimize<F>(&self, objective: F, initial: &[f64], steps: &[f64]) -> EaseFitResult<Minimum>
    where
        F: FnMut(&[f64]) -> f64,
    {
        self.minimize_observed(objective, initial, steps, |_, _| {})
    }

    /// Like [`NelderMead::minimize`], calling `observer(iteration, best_value)`
    /// after every completed iteration. `iteration` counts from 1.
    pub fn minimize_observed<F, O>(
        &self,
        objective: F,
        initial: &[f64],
        steps: &[f64],
        mut observer: O,
    ) -> EaseFitResult<Minimum>
    where
        F: FnMut(&[f64]) -> f64,
        O: FnMut(usize, f64),
    {
        let n = initial.len();
        if n == 0 {
            return Err(EaseFitError::invalid("initial point must not be empty"));
        }
        if steps.len() != n {
            return Err(EaseFitError::invalid(format!(
                "expected {} step sizes, got {}",
                n,
                steps.len()
            )));
        }

        let mut objective = Counted::new(objective);
        let mut simplex = Simplex::new(initial, steps, &mut objective);
        let mut iterations = 0;

        simplex.sort();
        while iterations < self.max_iterations {
            if let Some(tol) = self.tolerance {
                if simplex.spread() <= tol {
                    break;
                }
            }

            self.step(&mut simplex, &mut objective);
            iterations += 1;
            simplex.sort();

            observer(iterations, simplex.best().value);
            tracing::trace!(
                iteration = iterations,
                best = simplex.best().value,
                "nelder-mead step"
            );
        }

        let best = simplex.vertices.swap_remove(0);
        Ok(Minimum {
            point: best.point,
            value: best.value,
            iterations,
            evaluations: objective.count,
        })
    }

    /// One reflect / expand / contract / shrink step on a sorted simplex.
    fn step<F>(&self, simplex: &mut Simplex, objective: &mut Counted<F>)
    where
        F: FnMut(&[f64]) -> f64,
    {
        let n = simplex.vertices.len() - 1;
        let best_value = simplex.vertices[0].value;
        let second_worst_value = simplex.vertices[n - 1].value;
        let worst_value = simplex.vertices[n].value;

        let centroid = simplex.centroid();
        let worst = &simplex.vertices[n].point;

        let reflected = towards(&centroid, worst, -self.alpha);
        let reflected_value = objective.eval(&reflected);

        if reflected_value < best_value {
            let expanded = towards(&centroid, &reflected, self.gamma);
            let expanded_value = objective.eval(&expanded);
            if expanded_value < reflected_value {
                simplex.replace_worst(expanded, expanded_value);
            } else {
                simplex.replace_worst(reflected, reflected_value);
            }
        } else if reflected_value < second_worst_value {
            simplex.replace_worst(reflected, reflected_value);
        } else {
            let contracted = if reflected_value < worst_value {
                towards(&centroid, &reflected, self.rho)
            } else {
                towards(&centroid, worst, self.rho)
            };
            let contracted_value = objective.eval(&contracted);

            if contracted_value < worst_value {
                simplex.replace_worst(contracted, contracted_value);
            } else {
                simplex.shrink(self.sigma, objective);
            }
        }
    }
}

/// Minimize with standard coefficients and a fixed iteration budget.
pub fn minimize<F>(
    objective: F,
    initial: &[f64],
    steps: &[f64],
    max_iterations: usize,
) -> EaseFitResult<Minimum>
where
    F: FnMut(&[f64]) -> f64,
{
    NelderMead::new(max_iterations).minimize(objective, initial, steps)
}

/// `origin + scale * (target - origin)`
fn towards(origin: &[f64], target: &[f64], scale: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(target)
        .map(|(o, t)| o + scale * (t - o))
        .collect()
}

struct Counted<F> {
    f: F,
    count: usize,
}

impl<F: FnMut(&[f64]) -> f64> Counted<F> {
    fn new(f: F) -> Self {
        Self { f, count: 0 }
    }

    /// NaN counts as infinitely bad so it can never become the best vertex.
    fn eval(&mut self, point: &[f64]) -> f64 {
        self.count += 1;
        let value = (self.f)(point);
        if value.is_nan() {
            f64::INFINITY
        } else {
            value
        }
    }
}

struct Vertex {
    point: Vec<f64>,
    value: f64,
}

/// The optimizer's working set of `n + 1` vertices. Owned by one run.
struct Simplex {
    vertices: Vec<Vertex>,
}

impl Simplex {
    fn new<F>(initial: &[f64], steps: &[f64], objective: &mut Counted<F>) -> Self
    where
        F: FnMut(&[f64]) -> f64,
    {
        let mut points = Vec::with_capacity(initial.len() + 1);
        points.push(initial.to_vec());
        for (axis, step) in steps.iter().enumerate() {
            let mut point = initial.to_vec();
            point[axis] += step;
            points.push(point);
        }

        let vertices = points
            .into_iter()
            .map(|point| {
                let value = objective.eval(&point);
                Vertex { point, value }
            })
            .collect();
        Self { vertices }
    }

    /// Ascending by objective value. Values are never NaN here.
    fn sort(&mut self) {
        self.vertices.sort_by(|a, b| a.value.total_cmp(&b.value));
    }

    fn best(&self) -> &Vertex {
        &self.vertices[0]
    }

    fn spread(&self) -> f64 {
        let worst = &self.vertices[self.vertices.len() - 1];
        worst.value - self.best().value
    }

    /// Mean of every vertex except the last (worst).
    fn centroid(&self) -> Vec<f64> {
        let n = self.vertices.len() - 1;
        let mut centroid = vec![0.0; self.vertices[0].point.len()];
        for vertex in &self.vertices[..n] {
            for (c, x) in centroid.iter_mut().zip(&vertex.point) {
                *c += x;
            }
        }
        for c in &mut centroid {
            *c /= n as f64;
        }
        centroid
    }

    fn replace_worst(&mut self, point: Vec<f64>, value: f64) {
        let last = self.vertices.len() - 1;
        self.vertices[last] = Vertex { point, value };
    }

    /// Pull every vertex except the best toward the best.
    fn shrink<F>(&mut self, sigma: f64, objective: &mut Counted<F>)
    where
        F: FnMut(&[f64]) -> f64,
    {
        let (best, rest) = self.vertices.split_at_mut(1);
        let best = &best[0].point;
        for vertex in rest {
            vertex.point = towards(best, &vertex.point, sigma);
            vertex.value = objective.eval(&vertex.point);
        }
    }
}
