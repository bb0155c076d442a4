use super::LayeringOperator;
use crate::dag::{Dag, IterOrder};

/// One node per layer, following a parents-before-children traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Topological;

impl<T> LayeringOperator<T> for Topological {
    fn layer(&self, dag: &mut Dag<T>) {
        for (i, v) in dag.descendants(IterOrder::Before).into_iter().enumerate() {
            dag[v].layer = Some(i as i32);
        }
    }
}
