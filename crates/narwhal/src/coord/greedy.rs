use super::{CoordOperator, apply, finish, pack_left, separation};
use crate::model::{LayerGraph, Layers};
use crate::util::mean;

/// A single top-down pass.
///
/// The first non-empty layer is packed tightly. Every later node, left to right, sits at the
/// mean `x` of its parents, or as far left as its left neighbour allows when that is further
/// right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Greedy;

impl CoordOperator for Greedy {
    fn coord(&self, graph: &mut LayerGraph, layers: &Layers) -> f64 {
        let mut placed: Vec<Option<f64>> = vec![None; graph.len()];
        let mut xs: Vec<Vec<f64>> = Vec::with_capacity(layers.len());
        let mut seeded = false;

        for layer in layers {
            let row = if !seeded && !layer.is_empty() {
                seeded = true;
                pack_left(graph, layer)
            } else {
                let mut row: Vec<f64> = Vec::with_capacity(layer.len());
                for (i, &v) in layer.iter().enumerate() {
                    let parents: Vec<f64> =
                        graph.parents(v).iter().filter_map(|&p| placed[p]).collect();
                    let lower = match i {
                        0 => None,
                        _ => Some(row[i - 1] + separation(graph, layer[i - 1], v)),
                    };
                    let x = match (mean(&parents), lower) {
                        (Some(target), Some(lower)) => target.max(lower),
                        (Some(target), None) => target,
                        (None, Some(lower)) => lower,
                        (None, None) => graph.width(v) / 2.0,
                    };
                    row.push(x);
                }
                row
            };
            for (&v, &x) in layer.iter().zip(&row) {
                placed[v] = Some(x);
            }
            xs.push(row);
        }

        apply(graph, layers, &xs);
        finish(graph, layers)
    }
}
