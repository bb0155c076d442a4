use super::{CoordOperator, apply, finish, gaps, pack_left, project};
use crate::error::Result;
use crate::model::{LayerGraph, Layers};
use crate::util::invalid;
use nalgebra::{DMatrix, DVector};

/// Minimizes link length and link curvature together.
///
/// The objective is
/// `weight * sum (x_parent - x_child)^2 + (1 - weight) * sum (x_a - 2 x_b + x_c)^2`
/// over links and over paths `a -> b -> c`, plus a tiny pull towards the tight packing so the
/// optimum is unique, subject to the spacing constraints inside each layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinCurve {
    weight: f64,
}

impl Default for MinCurve {
    fn default() -> Self {
        Self { weight: 0.5 }
    }
}

impl MinCurve {
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// `weight` must lie in `[0, 1]`.
    pub fn with_weight(self, weight: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&weight) {
            return Err(invalid("min-curve", &weight.to_string()));
        }
        Ok(Self { weight })
    }
}

const ANCHOR: f64 = 1e-6;
const TOLERANCE: f64 = 1e-9;
const MAX_SWEEPS: usize = 200;
const POLISH_LIMIT: usize = 300;

/// `weight * (sum coef * x - target)^2`
#[derive(Debug, Clone)]
struct Term {
    vars: Vec<(usize, f64)>,
    weight: f64,
    target: f64,
}

#[derive(Debug, Clone)]
struct Objective {
    terms: Vec<Term>,
    /// `(term, coefficient)` per node.
    by_node: Vec<Vec<(usize, f64)>>,
}

impl Objective {
    fn build(graph: &LayerGraph, weight: f64, anchor: &[f64]) -> Self {
        let mut terms: Vec<Term> = Vec::new();
        for (v, &x0) in anchor.iter().enumerate() {
            terms.push(Term {
                vars: vec![(v, 1.0)],
                weight: ANCHOR,
                target: x0,
            });
        }
        for b in 0..graph.len() {
            for &c in graph.children(b) {
                if weight > 0.0 {
                    terms.push(Term {
                        vars: vec![(b, 1.0), (c, -1.0)],
                        weight,
                        target: 0.0,
                    });
                }
                if weight < 1.0 {
                    for &a in graph.parents(b) {
                        terms.push(Term {
                            vars: vec![(a, 1.0), (b, -2.0), (c, 1.0)],
                            weight: 1.0 - weight,
                            target: 0.0,
                        });
                    }
                }
            }
        }

        let mut by_node: Vec<Vec<(usize, f64)>> = vec![Vec::new(); graph.len()];
        for (t, term) in terms.iter().enumerate() {
            for &(v, coef) in &term.vars {
                by_node[v].push((t, coef));
            }
        }
        Self { terms, by_node }
    }

    fn value(&self, x: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|term| {
                let lhs: f64 = term.vars.iter().map(|&(v, coef)| coef * x[v]).sum();
                term.weight * (lhs - term.target).powi(2)
            })
            .sum()
    }

    /// Exact minimization over one layer with every other layer fixed. Every term holds at most
    /// one node per layer, so the layer problem separates into weighted targets.
    fn relax(&self, graph: &LayerGraph, layer: &[usize], x: &mut [f64]) -> f64 {
        if layer.is_empty() {
            return 0.0;
        }
        let mut targets: Vec<f64> = Vec::with_capacity(layer.len());
        let mut weights: Vec<f64> = Vec::with_capacity(layer.len());
        for &v in layer {
            let mut q = 0.0;
            let mut r = 0.0;
            for &(t, coef) in &self.by_node[v] {
                let term = &self.terms[t];
                let rest: f64 = term
                    .vars
                    .iter()
                    .filter(|&&(u, _)| u != v)
                    .map(|&(u, c)| c * x[u])
                    .sum();
                q += term.weight * coef * coef;
                r += term.weight * coef * (term.target - rest);
            }
            targets.push(r / q);
            weights.push(q);
        }

        let projected = project(&targets, &weights, &gaps(graph, layer));
        let mut moved: f64 = 0.0;
        for (&v, new_x) in layer.iter().zip(projected) {
            moved = moved.max((new_x - x[v]).abs());
            x[v] = new_x;
        }
        moved
    }

    /// Solves the equality-constrained problem on the constraints active at `x` and returns the
    /// result if it is feasible with non-negative multipliers.
    fn polish(&self, graph: &LayerGraph, layers: &Layers, x: &[f64]) -> Option<Vec<f64>> {
        let n = x.len();
        let mut active: Vec<(usize, usize, f64)> = Vec::new();
        let mut all: Vec<(usize, usize, f64)> = Vec::new();
        for layer in layers {
            for (pair, gap) in layer.windows(2).zip(gaps(graph, layer)) {
                let (i, j) = (pair[0], pair[1]);
                all.push((i, j, gap));
                if x[j] - x[i] - gap <= 1e-6 {
                    active.push((i, j, gap));
                }
            }
        }

        let m = n + active.len();
        let mut kkt = DMatrix::<f64>::zeros(m, m);
        let mut rhs = DVector::<f64>::zeros(m);
        for term in &self.terms {
            for &(i, ci) in &term.vars {
                rhs[i] += 2.0 * term.weight * ci * term.target;
                for &(j, cj) in &term.vars {
                    kkt[(i, j)] += 2.0 * term.weight * ci * cj;
                }
            }
        }
        for (k, &(i, j, gap)) in active.iter().enumerate() {
            let row = n + k;
            kkt[(row, j)] = 1.0;
            kkt[(row, i)] = -1.0;
            kkt[(j, row)] = -1.0;
            kkt[(i, row)] = 1.0;
            rhs[row] = gap;
        }

        let solution = kkt.lu().solve(&rhs)?;
        let polished: Vec<f64> = (0..n).map(|i| solution[i]).collect();

        let primal = all
            .iter()
            .all(|&(i, j, gap)| polished[j] - polished[i] >= gap - 1e-7);
        let dual = (n..m).all(|k| solution[k] >= -1e-9);
        if primal && dual && self.value(&polished) <= self.value(x) + 1e-12 {
            Some(polished)
        } else {
            None
        }
    }
}

impl CoordOperator for MinCurve {
    fn coord(&self, graph: &mut LayerGraph, layers: &Layers) -> f64 {
        let mut x: Vec<f64> = vec![0.0; graph.len()];
        for layer in layers {
            for (&v, px) in layer.iter().zip(pack_left(graph, layer)) {
                x[v] = px;
            }
        }
        let objective = Objective::build(graph, self.weight, &x);

        for sweep in 0..MAX_SWEEPS {
            let mut moved: f64 = 0.0;
            if sweep % 2 == 0 {
                for layer in layers {
                    moved = moved.max(objective.relax(graph, layer, &mut x));
                }
            } else {
                for layer in layers.iter().rev() {
                    moved = moved.max(objective.relax(graph, layer, &mut x));
                }
            }
            if moved < TOLERANCE {
                break;
            }
        }

        if graph.len() <= POLISH_LIMIT {
            if let Some(polished) = objective.polish(graph, layers, &x) {
                x = polished;
            }
        }

        let xs: Vec<Vec<f64>> = layers
            .iter()
            .map(|layer| layer.iter().map(|&v| x[v]).collect())
            .collect();
        apply(graph, layers, &xs);
        finish(graph, layers)
    }
}
