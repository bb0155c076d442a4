//! Split long links into chains of dummy nodes, and fold them back into waypoints.
//!
//! `run` expects a dag whose layers already passed validation: every node has a non-negative
//! layer and every link points to a strictly greater layer. Layers holding no node, real or
//! dummy, are dropped from the layered graph; the dag keeps its own layer numbers.

use crate::dag::{Dag, Point};
use crate::model::{LayerGraph, NodeKind};

/// Builds the layered graph. `sizes` is indexed by `NodeId::index`.
pub fn run<T>(dag: &Dag<T>, sizes: &[(f64, f64)], dummy_size: (f64, f64)) -> LayerGraph {
    let mut g = LayerGraph::with_links(dag.link_count());

    for (v, node) in dag.iter() {
        let layer = node.layer.unwrap_or(0).max(0) as usize;
        let size = sizes.get(v.index()).copied().unwrap_or((0.0, 0.0));
        let ix = g.push_node(node.id().to_string(), NodeKind::Real(v), layer, size);
        debug_assert_eq!(ix, v.index());
    }

    for (e, link) in dag.links() {
        let source = link.source();
        let target = link.target();
        let source_layer = g.node(source.index()).layer;
        let target_layer = g.node(target.index()).layer;

        let mut prev = source.index();
        for (step, layer) in (source_layer + 1..target_layer).enumerate() {
            let id = format!(
                "{}->{}#{}",
                dag[source].id(),
                dag[target].id(),
                step + 1
            );
            let dummy = g.push_node(
                id,
                NodeKind::Dummy {
                    link: e,
                    step: step + 1,
                },
                layer,
                dummy_size,
            );
            g.connect(prev, dummy);
            prev = dummy;
        }
        g.connect(prev, target.index());
    }

    g.compact_layers();
    g
}

/// Copies coordinates of real nodes back into the dag and turns every link into the polyline
/// `source, dummy_1, ..., dummy_k, target`.
pub fn undo<T>(g: &LayerGraph, dag: &mut Dag<T>) {
    for node in g.nodes() {
        if let NodeKind::Real(v) = node.kind {
            let target = &mut dag[v];
            target.x = node.x;
            target.y = node.y;
        }
    }

    let link_ids: Vec<_> = dag.links().map(|(e, _)| e).collect();
    for e in link_ids {
        let link = dag.link(e);
        let mut path: Vec<usize> = Vec::with_capacity(g.chain(e).len() + 2);
        path.push(link.source().index());
        path.extend_from_slice(g.chain(e));
        path.push(link.target().index());

        let points: Vec<Point> = path
            .into_iter()
            .filter_map(|ix| {
                let node = g.node(ix);
                Some(Point::new(node.x?, node.y?))
            })
            .collect();
        dag.link_mut(e).points = points;
    }
}
