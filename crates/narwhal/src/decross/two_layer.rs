use super::{DecrossOperator, cross_count};
use crate::model::{LayerGraph, Layers};
use crate::util::{mean, median};

/// How a node's key is aggregated from the positions of its neighbours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TwoLayerOrder {
    #[default]
    Median,
    Mean,
}

/// Layer-by-layer sweeps, reordering each layer against the one processed right before it.
///
/// Passes alternate downward (keys from parents) and upward (keys from children). Sweeping runs
/// twice from the given ordering, once starting downward and once upward, and keeps the ordering
/// with the fewest crossings. Each run stops once a pass in each direction fails to improve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoLayer {
    order: TwoLayerOrder,
    passes: usize,
}

impl Default for TwoLayer {
    fn default() -> Self {
        Self {
            order: TwoLayerOrder::Median,
            passes: 24,
        }
    }
}

impl TwoLayer {
    pub fn order(&self) -> TwoLayerOrder {
        self.order
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn with_order(self, order: TwoLayerOrder) -> Self {
        Self { order, ..self }
    }

    pub fn with_passes(self, passes: usize) -> Self {
        Self { passes, ..self }
    }

    fn reorder(
        &self,
        graph: &LayerGraph,
        layers: &mut Layers,
        ix: usize,
        reference: usize,
        down: bool,
    ) {
        let mut pos: Vec<f64> = vec![f64::NAN; graph.len()];
        for (i, &v) in layers[reference].iter().enumerate() {
            pos[v] = i as f64;
        }

        let mut keyed: Vec<(f64, usize)> = layers[ix]
            .iter()
            .enumerate()
            .map(|(current, &v)| {
                let neighbours = if down {
                    graph.parents(v)
                } else {
                    graph.children(v)
                };
                let mut values: Vec<f64> = neighbours
                    .iter()
                    .map(|&u| pos[u])
                    .filter(|p| !p.is_nan())
                    .collect();
                let key = match self.order {
                    TwoLayerOrder::Median => median(&mut values),
                    TwoLayerOrder::Mean => mean(&values),
                };
                (key.unwrap_or(current as f64), v)
            })
            .collect();

        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        layers[ix] = keyed.into_iter().map(|(_, v)| v).collect();
    }

    fn sweep(&self, graph: &LayerGraph, layers: &mut Layers, down: bool) {
        let n = layers.len();
        if down {
            for ix in 1..n {
                self.reorder(graph, layers, ix, ix - 1, true);
            }
        } else {
            for ix in (0..n.saturating_sub(1)).rev() {
                self.reorder(graph, layers, ix, ix + 1, false);
            }
        }
    }

    /// Sweeps from `initial`, alternating direction and starting downward when `first_down`.
    ///
    /// A pass that does not improve on the best ordering is undone; two such passes in a row
    /// (one in each direction) end the run.
    fn run(&self, graph: &LayerGraph, initial: &Layers, first_down: bool) -> (Layers, u64) {
        let mut layers = initial.clone();
        let mut best = initial.clone();
        let mut best_cc = cross_count(graph, &best);
        let mut stale = 0;

        for pass in 0..self.passes {
            if best_cc == 0 {
                break;
            }
            let down = (pass % 2 == 0) == first_down;
            self.sweep(graph, &mut layers, down);
            let cc = cross_count(graph, &layers);
            tracing::debug!(pass, down, crossings = cc, "two-layer sweep");
            if cc < best_cc {
                best_cc = cc;
                best.clone_from(&layers);
                stale = 0;
            } else {
                stale += 1;
                if stale >= 2 {
                    break;
                }
                layers.clone_from(&best);
            }
        }

        (best, best_cc)
    }
}

impl DecrossOperator for TwoLayer {
    fn decross(&self, graph: &LayerGraph, layers: &mut Layers) {
        if layers.len() < 2 {
            return;
        }

        let (down_first, down_cc) = self.run(graph, layers, true);
        if down_cc == 0 {
            *layers = down_first;
            return;
        }
        let (up_first, up_cc) = self.run(graph, layers, false);
        *layers = if up_cc < down_cc { up_first } else { down_first };
    }
}
