//! Whole-graph helpers.

use super::{Dag, IterOrder, NodeId};
use std::collections::VecDeque;

/// Weakly connected components, each listed in discovery order; components are ordered by
/// their first node in arena order.
pub fn components<T>(dag: &Dag<T>) -> Vec<Vec<NodeId>> {
    let mut seen = vec![false; dag.len()];
    let mut out: Vec<Vec<NodeId>> = Vec::new();

    for start in dag.node_ids() {
        if std::mem::replace(&mut seen[start.index()], true) {
            continue;
        }
        let mut comp: Vec<NodeId> = Vec::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        queue.push_back(start);
        while let Some(v) = queue.pop_front() {
            comp.push(v);
            for w in dag.children(v).chain(dag.parents(v)) {
                if !std::mem::replace(&mut seen[w.index()], true) {
                    queue.push_back(w);
                }
            }
        }
        out.push(comp);
    }

    out
}

/// Nodes in parents-before-children order. Nodes on a cycle are left out.
pub fn topological_sort<T>(dag: &Dag<T>) -> Vec<NodeId> {
    dag.descendants(IterOrder::Before)
}

pub fn is_acyclic<T>(dag: &Dag<T>) -> bool {
    topological_sort(dag).len() == dag.len()
}
