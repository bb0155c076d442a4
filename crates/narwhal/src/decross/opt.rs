use super::{DecrossOperator, TwoLayer, cross_count};
use crate::model::{LayerGraph, Layers};

/// Exact crossing minimization by branch and bound.
///
/// Layers are filled top-down one node at a time, so every placement only needs the already
/// fixed layer above it. The search is seeded with the [`TwoLayer`] ordering and stops after
/// `max_steps` placements, keeping the best ordering found by then.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opt {
    max_steps: usize,
}

impl Default for Opt {
    fn default() -> Self {
        Self {
            max_steps: 1_000_000,
        }
    }
}

impl Opt {
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn with_max_steps(self, max_steps: usize) -> Self {
        Self { max_steps }
    }
}

#[derive(Debug, Clone)]
struct Frame {
    layer: usize,
    remaining: Vec<usize>,
    next: usize,
    base: u64,
    placed: bool,
}

/// `c[i][j]`: crossings between the parent edges of `layer[i]` and `layer[j]` when `layer[i]` is
/// left of `layer[j]`. Indices are positions in `layer` as given.
fn pair_costs(graph: &LayerGraph, prev: &[usize], layer: &[usize]) -> Vec<Vec<u64>> {
    let mut pos: Vec<Option<usize>> = vec![None; graph.len()];
    for (i, &u) in prev.iter().enumerate() {
        pos[u] = Some(i);
    }
    let parent_pos: Vec<Vec<usize>> = layer
        .iter()
        .map(|&v| graph.parents(v).iter().filter_map(|&p| pos[p]).collect())
        .collect();

    let k = layer.len();
    let mut c = vec![vec![0u64; k]; k];
    for i in 0..k {
        for j in 0..k {
            if i == j {
                continue;
            }
            c[i][j] = parent_pos[i]
                .iter()
                .map(|&a| parent_pos[j].iter().filter(|&&b| a > b).count() as u64)
                .sum();
        }
    }
    c
}

impl DecrossOperator for Opt {
    fn decross(&self, graph: &LayerGraph, layers: &mut Layers) {
        let mut best = layers.clone();
        TwoLayer::default().decross(graph, &mut best);
        let mut best_cost = cross_count(graph, &best);

        let n_layers = layers.len();
        let Some(first) = (0..n_layers).find(|&l| !layers[l].is_empty()) else {
            return;
        };
        if best_cost == 0 {
            *layers = best;
            return;
        }

        let mut local: Vec<usize> = vec![0; graph.len()];
        for layer in layers.iter() {
            for (i, &v) in layer.iter().enumerate() {
                local[v] = i;
            }
        }

        let mut costs: Vec<Vec<Vec<u64>>> = vec![Vec::new(); n_layers];
        costs[first] = pair_costs(graph, &[], &layers[first]);
        let mut order: Layers = vec![Vec::new(); n_layers];
        let mut stack: Vec<Frame> = vec![Frame {
            layer: first,
            remaining: layers[first].clone(),
            next: 0,
            base: 0,
            placed: false,
        }];

        let mut steps = 0usize;
        while let Some(frame) = stack.last_mut() {
            let layer = frame.layer;
            if frame.placed {
                order[layer].pop();
                frame.placed = false;
            }
            if frame.next >= frame.remaining.len() {
                stack.pop();
                continue;
            }
            if steps >= self.max_steps {
                tracing::warn!(
                    steps,
                    crossings = best_cost,
                    "optimal decrossing hit its step budget; keeping the best ordering so far"
                );
                break;
            }
            steps += 1;

            let v = frame.remaining[frame.next];
            let rest: Vec<usize> = frame
                .remaining
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != frame.next)
                .map(|(_, &w)| w)
                .collect();
            frame.next += 1;
            let base = frame.base;

            let c = &costs[layer];
            let added: u64 = order[layer].iter().map(|&u| c[local[u]][local[v]]).sum();
            let cost = base + added;
            order[layer].push(v);
            frame.placed = true;

            let forced: u64 = rest
                .iter()
                .map(|&w| {
                    order[layer]
                        .iter()
                        .map(|&u| c[local[u]][local[w]])
                        .sum::<u64>()
                })
                .sum();
            let mut free: u64 = 0;
            for (i, &a) in rest.iter().enumerate() {
                for &b in &rest[i + 1..] {
                    free += c[local[a]][local[b]].min(c[local[b]][local[a]]);
                }
            }
            if cost + forced + free >= best_cost {
                continue;
            }

            if !rest.is_empty() {
                stack.push(Frame {
                    layer,
                    remaining: rest,
                    next: 0,
                    base: cost,
                    placed: false,
                });
                continue;
            }

            match (layer + 1..n_layers).find(|&l| !layers[l].is_empty()) {
                None => {
                    best_cost = cost;
                    best = order.clone();
                }
                Some(next_layer) => {
                    costs[next_layer] =
                        pair_costs(graph, &order[next_layer - 1], &layers[next_layer]);
                    stack.push(Frame {
                        layer: next_layer,
                        remaining: layers[next_layer].clone(),
                        next: 0,
                        base: cost,
                        placed: false,
                    });
                }
            }
        }

        tracing::debug!(steps, crossings = best_cost, "optimal decrossing finished");
        *layers = best;
    }
}
