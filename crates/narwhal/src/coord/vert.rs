use super::{CoordOperator, apply, finish, gaps, pack_left, project};
use crate::model::{LayerGraph, Layers};
use crate::util::median;

/// Straightens links by pulling every node towards the median of its neighbours.
///
/// Starts from a tight packing and alternates downward and upward sweeps. In each sweep a layer
/// moves its nodes to the median `x` of their parents and children, then is projected back onto
/// its spacing constraints. Stops once no node moves by more than `1e-9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vert {
    passes: usize,
}

impl Default for Vert {
    fn default() -> Self {
        Self { passes: 32 }
    }
}

impl Vert {
    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn with_passes(self, passes: usize) -> Self {
        Self { passes }
    }
}

const TOLERANCE: f64 = 1e-9;

fn relax(graph: &LayerGraph, layer: &[usize], x: &mut [f64]) -> f64 {
    if layer.is_empty() {
        return 0.0;
    }
    let targets: Vec<f64> = layer
        .iter()
        .map(|&v| {
            let mut around: Vec<f64> = graph
                .parents(v)
                .iter()
                .chain(graph.children(v))
                .map(|&u| x[u])
                .collect();
            median(&mut around).unwrap_or(x[v])
        })
        .collect();
    let weights = vec![1.0; layer.len()];
    let projected = project(&targets, &weights, &gaps(graph, layer));

    let mut moved: f64 = 0.0;
    for (&v, new_x) in layer.iter().zip(projected) {
        moved = moved.max((new_x - x[v]).abs());
        x[v] = new_x;
    }
    moved
}

impl CoordOperator for Vert {
    fn coord(&self, graph: &mut LayerGraph, layers: &Layers) -> f64 {
        let mut x: Vec<f64> = vec![0.0; graph.len()];
        for layer in layers {
            for (&v, px) in layer.iter().zip(pack_left(graph, layer)) {
                x[v] = px;
            }
        }

        for pass in 0..self.passes {
            let mut moved: f64 = 0.0;
            if pass % 2 == 0 {
                for layer in layers {
                    moved = moved.max(relax(graph, layer, &mut x));
                }
            } else {
                for layer in layers.iter().rev() {
                    moved = moved.max(relax(graph, layer, &mut x));
                }
            }
            if moved < TOLERANCE {
                break;
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
