//! Nelder-Mead downhill simplex.

use std::collections::VecDeque;

use trialforge_core::{Result, Trial, TrialPoint, Variable};

use super::{current_best_point, AlgorithmRun, SearchAlgorithm};

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINKAGE: f64 = 0.5;

/// Shrinks after which the simplex is considered collapsed.
const MAX_SHRINKS: u32 = 20;

/// Initial step, as a fraction of each variable's range.
const INITIAL_STEP: f64 = 1.0 / 20.0;

#[derive(Debug, Clone)]
struct Vertex {
    coordinates: Vec<f64>,
    /// Value minimised by the simplex: `1 / satisfaction`.
    cost: f64,
}

/// Nelder-Mead simplex minimising the inverse of the overall satisfaction.
///
/// The initial simplex is built around the best point of the solve with a
/// step of one twentieth of each variable's range. The simplex gives up
/// when a vertex leaves the variable limits, when a vertex is vetoed, or
/// after twenty shrinks; it then reports itself exhausted until another
/// algorithm finds a new optimal solution, around which it restarts.
///
/// Vertex evaluations survive run boundaries: a step started near the end
/// of one run is finished before the budget check, and the next run picks
/// up where the last one stopped.
#[derive(Debug, Clone)]
pub struct SimplexSearch {
    label: String,
    vertices: Vec<Vertex>,
    pending: VecDeque<Vec<f64>>,
    restart_from: Option<Vec<f64>>,
    shrinks: u32,
    want_to_stop: bool,
}

impl SimplexSearch {
    pub const LABEL: &'static str = "simplex";

    pub fn new() -> Self {
        Self {
            label: Self::LABEL.to_string(),
            vertices: Vec::new(),
            pending: VecDeque::new(),
            restart_from: None,
            shrinks: 0,
            want_to_stop: false,
        }
    }

    fn restart(&mut self, center: Option<Vec<f64>>) {
        self.vertices.clear();
        self.pending.clear();
        self.restart_from = center;
        self.shrinks = 0;
        self.want_to_stop = false;
    }

    /// Queues the vertices of a fresh simplex around `center`.
    ///
    /// Vertex `i` is the mean of the vertices before it plus one step along
    /// axis `i - 1`, stepping inwards when the outward step would leave the
    /// limits.
    fn queue_initial_simplex(&mut self, variables: &[Variable], center: Vec<f64>) {
        let mut queued: Vec<Vec<f64>> = vec![center];
        for (axis, variable) in variables.iter().enumerate() {
            let count = queued.len() as f64;
            let mut vertex = vec![0.0; variables.len()];
            for previous in &queued {
                for (sum, value) in vertex.iter_mut().zip(previous) {
                    *sum += value / count;
                }
            }
            let step = variable.range() * INITIAL_STEP;
            if vertex[axis] + step > variable.upper_limit() {
                vertex[axis] -= step;
            } else {
                vertex[axis] += step;
            }
            queued.push(vertex);
        }
        self.pending = queued.into();
    }

    /// Evaluates one vertex; `None` ends the current simplex.
    fn evaluate(
        &mut self,
        run: &mut AlgorithmRun<'_>,
        variables: &[Variable],
        coordinates: Vec<f64>,
    ) -> Result<Option<Vertex>> {
        let inside = variables
            .iter()
            .zip(&coordinates)
            .all(|(variable, &value)| variable.contains(value));
        if !inside {
            self.want_to_stop = true;
            return Ok(None);
        }

        let trial = run.evaluate_trial_point(TrialPoint::from_coordinates(variables, &coordinates))?;
        if trial.is_vetoed() {
            self.want_to_stop = true;
            return Ok(None);
        }
        Ok(Some(Vertex {
            coordinates,
            cost: cost(trial.satisfaction()),
        }))
    }

    /// `(1 + coefficient) * centroid - coefficient * worst`, the centroid
    /// taken over every vertex but the worst.
    fn reflect(&self, coefficient: f64) -> Vec<f64> {
        let worst = self.vertices.len() - 1;
        let weight = (1.0 + coefficient) / worst as f64;
        let mut result: Vec<f64> = self.vertices[worst]
            .coordinates
            .iter()
            .map(|value| -coefficient * value)
            .collect();
        for vertex in &self.vertices[..worst] {
            for (sum, value) in result.iter_mut().zip(&vertex.coordinates) {
                *sum += weight * value;
            }
        }
        result
    }

    fn replace_worst(&mut self, vertex: Vertex) {
        if let Some(worst) = self.vertices.last_mut() {
            *worst = vertex;
        }
    }

    /// Performs one Nelder-Mead step; false once the simplex gave up.
    fn make_step(&mut self, run: &mut AlgorithmRun<'_>, variables: &[Variable]) -> Result<bool> {
        self.vertices.sort_by(|a, b| a.cost.total_cmp(&b.cost));
        let n = self.vertices.len() - 1;
        let best = self.vertices[0].cost;
        let second_worst = self.vertices[n.saturating_sub(1)].cost;
        let worst = self.vertices[n].cost;

        let reflected = self.reflect(REFLECTION);
        let Some(reflected) = self.evaluate(run, variables, reflected)? else {
            return Ok(false);
        };

        if reflected.cost < best {
            let expanded = self.reflect(REFLECTION * EXPANSION);
            let Some(expanded) = self.evaluate(run, variables, expanded)? else {
                return Ok(false);
            };
            if expanded.cost < reflected.cost {
                self.replace_worst(expanded);
            } else {
                self.replace_worst(reflected);
            }
            return Ok(true);
        }

        if reflected.cost < second_worst {
            self.replace_worst(reflected);
            return Ok(true);
        }

        if reflected.cost < worst {
            let outside = self.reflect(REFLECTION * CONTRACTION);
            let Some(contracted) = self.evaluate(run, variables, outside)? else {
                return Ok(false);
            };
            if contracted.cost <= reflected.cost {
                self.replace_worst(contracted);
                return Ok(true);
            }
        } else {
            let inside = self.reflect(-CONTRACTION);
            let Some(contracted) = self.evaluate(run, variables, inside)? else {
                return Ok(false);
            };
            if contracted.cost < worst {
                self.replace_worst(contracted);
                return Ok(true);
            }
        }

        self.shrink(run, variables)
    }

    fn shrink(&mut self, run: &mut AlgorithmRun<'_>, variables: &[Variable]) -> Result<bool> {
        self.shrinks += 1;
        if self.shrinks > MAX_SHRINKS {
            self.want_to_stop = true;
            return Ok(false);
        }

        let anchor = self.vertices[0].coordinates.clone();
        for index in 1..self.vertices.len() {
            let coordinates = self.vertices[index]
                .coordinates
                .iter()
                .zip(&anchor)
                .map(|(value, origin)| origin + SHRINKAGE * (value - origin))
                .collect();
            let Some(vertex) = self.evaluate(run, variables, coordinates)? else {
                return Ok(false);
            };
            self.vertices[index] = vertex;
        }
        Ok(true)
    }
}

fn cost(satisfaction: f64) -> f64 {
    if satisfaction > 0.0 {
        1.0 / satisfaction
    } else {
        f64::MAX
    }
}

impl Default for SimplexSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchAlgorithm for SimplexSearch {
    fn label(&self) -> &str {
        &self.label
    }

    fn reset(&mut self) {
        self.restart(None);
    }

    fn perform_run(&mut self, run: &mut AlgorithmRun<'_>) -> Result<()> {
        let problem = std::sync::Arc::clone(run.problem());
        let variables = problem.variables();

        if self.vertices.is_empty() && self.pending.is_empty() && !self.want_to_stop {
            let center = match self.restart_from.take() {
                Some(center) => center,
                None => current_best_point(run).to_coordinates(variables)?,
            };
            self.queue_initial_simplex(variables, center);
        }

        while run.has_next() && !self.want_to_stop {
            if let Some(coordinates) = self.pending.pop_front() {
                match self.evaluate(run, variables, coordinates)? {
                    Some(vertex) => self.vertices.push(vertex),
                    None => break,
                }
                continue;
            }
            if self.vertices.len() < 2 || !self.make_step(run, variables)? {
                break;
            }
        }
        Ok(())
    }

    fn found_new_optimal_solution(&mut self, trial: &Trial) {
        if trial.algorithm() == Some(self.label.as_str()) {
            return;
        }
        let variables = trial.problem().variables();
        if let Ok(center) = trial.trial_point().to_coordinates(variables) {
            self.restart(Some(center));
        }
    }

    fn is_exhausted(&self) -> bool {
        self.want_to_stop
    }

    fn global_rating(&self) -> u8 {
        3
    }

    fn local_rating(&self) -> u8 {
        9
    }
}
