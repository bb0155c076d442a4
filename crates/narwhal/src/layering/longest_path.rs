use super::LayeringOperator;
use crate::dag::{Dag, IterOrder};

/// Layers by longest path.
///
/// Top-down, a node sits as deep as its longest chain of ancestors. Bottom-up, nodes are pushed
/// down as far as their descendants allow, so every sink lands on the last layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongestPath {
    top_down: bool,
}

impl Default for LongestPath {
    fn default() -> Self {
        Self { top_down: true }
    }
}

impl LongestPath {
    pub fn top_down(&self) -> bool {
        self.top_down
    }

    pub fn with_top_down(self, top_down: bool) -> Self {
        Self { top_down }
    }
}

impl<T> LayeringOperator<T> for LongestPath {
    fn layer(&self, dag: &mut Dag<T>) {
        let order = dag.descendants(IterOrder::Before);
        let mut depth: Vec<i32> = vec![0; dag.len()];

        if self.top_down {
            for &v in &order {
                depth[v.index()] = dag
                    .parents(v)
                    .map(|p| depth[p.index()] + 1)
                    .max()
                    .unwrap_or(0);
            }
            for &v in &order {
                dag[v].layer = Some(depth[v.index()]);
            }
            return;
        }

        for &v in order.iter().rev() {
            depth[v.index()] = dag
                .children(v)
                .map(|c| depth[c.index()] + 1)
                .max()
                .unwrap_or(0);
        }
        let max_height = order.iter().map(|v| depth[v.index()]).max().unwrap_or(0);
        for &v in &order {
            dag[v].layer = Some(max_height - depth[v.index()]);
        }
    }
}
