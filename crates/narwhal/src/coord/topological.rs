use super::{CoordOperator, finish};
use crate::model::{LayerGraph, Layers};

/// Gives every node its own column, in layer order and then position order.
///
/// Meant for layerings that put each node on its own layer, where long links then run down
/// their own columns without overlapping any node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Topological;

impl CoordOperator for Topological {
    fn coord(&self, graph: &mut LayerGraph, layers: &Layers) -> f64 {
        let mut right = 0.0;
        for &v in layers.iter().flatten() {
            let width = graph.width(v);
            graph.set_x(v, right + width / 2.0);
            right += width;
        }
        finish(graph, layers)
    }
}
