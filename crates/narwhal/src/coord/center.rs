use super::{CoordOperator, apply, finish, pack_left};
use crate::model::{LayerGraph, Layers};

/// Packs every layer tightly and centres it under the widest one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Center;

impl CoordOperator for Center {
    fn coord(&self, graph: &mut LayerGraph, layers: &Layers) -> f64 {
        let mut xs: Vec<Vec<f64>> = layers.iter().map(|layer| pack_left(graph, layer)).collect();
        let spans: Vec<f64> = layers
            .iter()
            .zip(&xs)
            .map(|(layer, row)| match (layer.last(), row.last()) {
                (Some(&v), Some(&x)) => x + graph.width(v) / 2.0,
                _ => 0.0,
            })
            .collect();
        let widest = spans.iter().copied().fold(0.0, f64::max);

        for (row, span) in xs.iter_mut().zip(spans) {
            let offset = (widest - span) / 2.0;
            for x in row {
                *x += offset;
            }
        }

        apply(graph, layers, &xs);
        finish(graph, layers)
    }
}
