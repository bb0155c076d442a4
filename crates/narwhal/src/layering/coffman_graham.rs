use super::LayeringOperator;
use crate::dag::{Dag, NodeId};

/// Coffman–Graham layering: list scheduling with at most `width` nodes per layer.
///
/// Nodes are first labelled bottom-up, a node becoming eligible once all of its children carry
/// a label and ties going to the smallest decreasing sequence of child labels. Layers are then
/// filled top-down, always taking the eligible node with the highest label. A `width` of `0`
/// uses `floor(sqrt(n) + 0.5)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoffmanGraham {
    width: usize,
}

impl CoffmanGraham {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn with_width(self, width: usize) -> Self {
        Self { width }
    }

    fn effective_width(&self, n: usize) -> usize {
        if self.width > 0 {
            self.width
        } else {
            ((n as f64).sqrt() + 0.5).floor().max(1.0) as usize
        }
    }
}

fn labels<T>(dag: &Dag<T>) -> Vec<Option<usize>> {
    let n = dag.len();
    let mut label: Vec<Option<usize>> = vec![None; n];
    let mut waiting: Vec<usize> = dag.node_ids().map(|v| dag.child_links(v).len()).collect();
    let mut ready: Vec<NodeId> = dag.leaves();

    for next in 0..n {
        // Candidate whose children's labels, sorted decreasingly, are lexicographically smallest.
        let mut best: Option<(usize, Vec<usize>)> = None;
        for (pos, &v) in ready.iter().enumerate() {
            let mut key: Vec<usize> = dag.children(v).filter_map(|c| label[c.index()]).collect();
            key.sort_unstable_by(|a, b| b.cmp(a));
            let better = match &best {
                None => true,
                Some((_, best_key)) => key < *best_key,
            };
            if better {
                best = Some((pos, key));
            }
        }
        let Some((pos, _)) = best else {
            break;
        };

        let v = ready.remove(pos);
        label[v.index()] = Some(next);
        for p in dag.parents(v) {
            waiting[p.index()] -= 1;
            if waiting[p.index()] == 0 {
                ready.push(p);
            }
        }
    }

    label
}

impl<T> LayeringOperator<T> for CoffmanGraham {
    fn layer(&self, dag: &mut Dag<T>) {
        let n = dag.len();
        let width = self.effective_width(n);
        let label = labels(dag);

        let mut layer_of: Vec<Option<usize>> = vec![None; n];
        let mut placed = 0usize;
        let mut current = 0usize;
        let mut current_size = 0usize;

        while placed < n {
            // Nodes whose parents all sit in earlier layers.
            let candidate = dag
                .node_ids()
                .filter(|v| layer_of[v.index()].is_none() && label[v.index()].is_some())
                .filter(|&v| {
                    dag.parents(v)
                        .all(|p| layer_of[p.index()].is_some_and(|l| l < current))
                })
                .max_by_key(|v| label[v.index()]);

            match candidate {
                Some(v) if current_size < width => {
                    layer_of[v.index()] = Some(current);
                    placed += 1;
                    current_size += 1;
                }
                _ if current_size == 0 => {
                    // Nothing can ever be placed; only unlabelled (cyclic) nodes remain.
                    break;
                }
                _ => {
                    current += 1;
                    current_size = 0;
                }
            }
        }

        for v in dag.node_ids() {
            if let Some(layer) = layer_of[v.index()] {
                dag[v].layer = Some(layer as i32);
            }
        }
    }
}
