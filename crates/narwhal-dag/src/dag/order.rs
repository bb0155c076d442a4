//! Traversal orders over a [`Dag`].

use super::{Dag, NodeId};
use std::collections::VecDeque;

/// Order in which [`Dag::descendants`] yields nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IterOrder {
    /// Depth-first preorder starting from the roots.
    #[default]
    Depth,
    /// Breadth-first starting from the roots.
    Breadth,
    /// Topological: every node comes after all of its parents.
    Before,
    /// Reverse topological: every node comes after all of its children.
    After,
}

impl<T> Dag<T> {
    /// All nodes reachable from the roots, each once, in the requested order.
    ///
    /// Roots are visited in arena order and children in link order, so the result is stable
    /// for a given dag.
    pub fn descendants(&self, order: IterOrder) -> Vec<NodeId> {
        match order {
            IterOrder::Depth => self.depth_first(),
            IterOrder::Breadth => self.breadth_first(),
            IterOrder::Before => self.parents_first(),
            IterOrder::After => self.children_first(),
        }
    }

    fn depth_first(&self) -> Vec<NodeId> {
        let mut seen = vec![false; self.len()];
        let mut out: Vec<NodeId> = Vec::with_capacity(self.len());
        let mut stack: Vec<NodeId> = self.roots();
        stack.reverse();
        while let Some(v) = stack.pop() {
            if std::mem::replace(&mut seen[v.index()], true) {
                continue;
            }
            out.push(v);
            let children: Vec<NodeId> = self.children(v).collect();
            stack.extend(children.into_iter().rev().filter(|w| !seen[w.index()]));
        }
        out
    }

    fn breadth_first(&self) -> Vec<NodeId> {
        let mut seen = vec![false; self.len()];
        let mut out: Vec<NodeId> = Vec::with_capacity(self.len());
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        for root in self.roots() {
            seen[root.index()] = true;
            queue.push_back(root);
        }
        while let Some(v) = queue.pop_front() {
            out.push(v);
            for w in self.children(v) {
                if !std::mem::replace(&mut seen[w.index()], true) {
                    queue.push_back(w);
                }
            }
        }
        out
    }

    fn parents_first(&self) -> Vec<NodeId> {
        let mut waiting: Vec<usize> = self
            .node_ids()
            .map(|v| self.parent_links(v).len())
            .collect();
        let mut out: Vec<NodeId> = Vec::with_capacity(self.len());
        let mut stack: Vec<NodeId> = self.roots();
        stack.reverse();
        while let Some(v) = stack.pop() {
            out.push(v);
            let children: Vec<NodeId> = self.children(v).collect();
            for w in children.into_iter().rev() {
                waiting[w.index()] -= 1;
                if waiting[w.index()] == 0 {
                    stack.push(w);
                }
            }
        }
        out
    }

    fn children_first(&self) -> Vec<NodeId> {
        let mut seen = vec![false; self.len()];
        let mut out: Vec<NodeId> = Vec::with_capacity(self.len());
        let mut stack: Vec<(NodeId, usize)> = Vec::new();
        for root in self.roots() {
            seen[root.index()] = true;
            stack.push((root, 0));
            while let Some((v, next)) = stack.last_mut() {
                let v = *v;
                let Some(&e) = self.child_links(v).get(*next) else {
                    stack.pop();
                    out.push(v);
                    continue;
                };
                *next += 1;
                let w = self.link(e).target();
                if !std::mem::replace(&mut seen[w.index()], true) {
                    stack.push((w, 0));
                }
            }
        }
        out
    }
}
