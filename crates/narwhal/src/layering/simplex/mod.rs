//! Network simplex layering.
//!
//! Minimizes the total span `sum(layer(child) - layer(parent))` over all links subject to
//! `layer(child) - layer(parent) >= 1`, following Gansner et al., "A Technique for Drawing
//! Directed Graphs": a feasible tight spanning tree is improved by pivoting out tree edges with
//! a negative cut value until none is left. Each weakly connected component is solved on its
//! own and starts at layer 0.

use super::LayeringOperator;
use crate::dag::{Dag, NodeId, alg};

mod feasible_tree;

const ROOT: usize = 0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Simplex {
    max_iterations: Option<usize>,
}

impl Simplex {
    /// Pivot budget per component; `None` derives one from the component's link count.
    pub fn max_iterations(&self) -> Option<usize> {
        self.max_iterations
    }

    pub fn with_max_iterations(self, max_iterations: usize) -> Self {
        Self {
            max_iterations: Some(max_iterations),
        }
    }
}

impl<T> LayeringOperator<T> for Simplex {
    fn layer(&self, dag: &mut Dag<T>) {
        for comp in alg::components(dag) {
            let problem = Problem::from_component(dag, &comp);
            let budget = self
                .max_iterations
                .unwrap_or(1_000 + 10 * problem.edges.len());
            let rank = problem.solve(budget);
            for (local, v) in comp.into_iter().enumerate() {
                dag[v].layer = Some(rank[local]);
            }
        }
    }
}

/// A connected layering problem over local node indices `0..n`.
#[derive(Debug, Clone)]
pub(crate) struct Problem {
    n: usize,
    /// `(tail, head)` pairs; every edge asks for `rank[head] - rank[tail] >= 1`.
    edges: Vec<(usize, usize)>,
    incident: Vec<Vec<usize>>,
}

impl Problem {
    pub(crate) fn new(n: usize, edges: Vec<(usize, usize)>) -> Self {
        let mut incident: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (e, &(tail, head)) in edges.iter().enumerate() {
            incident[tail].push(e);
            incident[head].push(e);
        }
        Self { n, edges, incident }
    }

    fn from_component<T>(dag: &Dag<T>, comp: &[NodeId]) -> Self {
        let mut local: Vec<Option<usize>> = vec![None; dag.len()];
        for (ix, v) in comp.iter().enumerate() {
            local[v.index()] = Some(ix);
        }
        let mut edges: Vec<(usize, usize)> = Vec::new();
        for &v in comp {
            for &e in dag.child_links(v) {
                let w = dag.link(e).target();
                if let (Some(tail), Some(head)) = (local[v.index()], local[w.index()]) {
                    edges.push((tail, head));
                }
            }
        }
        Self::new(comp.len(), edges)
    }

    fn slack(&self, rank: &[i32], e: usize) -> i32 {
        let (tail, head) = self.edges[e];
        rank[head] - rank[tail] - 1
    }

    /// Feasible start: every node one below its deepest parent.
    fn longest_path(&self) -> Vec<i32> {
        let mut waiting: Vec<usize> = vec![0; self.n];
        for &(_, head) in &self.edges {
            waiting[head] += 1;
        }
        let mut rank: Vec<i32> = vec![0; self.n];
        let mut stack: Vec<usize> = (0..self.n).filter(|&v| waiting[v] == 0).collect();
        while let Some(v) = stack.pop() {
            for &e in &self.incident[v] {
                let (tail, head) = self.edges[e];
                if tail != v {
                    continue;
                }
                rank[head] = rank[head].max(rank[v] + 1);
                waiting[head] -= 1;
                if waiting[head] == 0 {
                    stack.push(head);
                }
            }
        }
        rank
    }

    pub(crate) fn solve(&self, max_iterations: usize) -> Vec<i32> {
        if self.n == 0 {
            return Vec::new();
        }

        let mut rank = self.longest_path();
        let tree_edge = feasible_tree::feasible_tree(self, &mut rank);
        let mut tree = Tree::new(self.n, tree_edge);
        tree.rebuild(self);

        let mut iterations = 0usize;
        while let Some(leave) = tree.leave_edge() {
            if iterations >= max_iterations {
                tracing::warn!(
                    iterations,
                    "network simplex stopped at its pivot budget; keeping a feasible layering"
                );
                break;
            }
            let Some(enter) = tree.enter_edge(self, &rank, leave) else {
                break;
            };
            tree.in_tree[leave] = false;
            tree.in_tree[enter] = true;
            tree.rebuild(self);
            tree.update_ranks(self, &mut rank);
            iterations += 1;
        }

        let min = rank.iter().copied().min().unwrap_or(0);
        for r in &mut rank {
            *r -= min;
        }
        rank
    }

    #[cfg(test)]
    /// Sum of `rank[head] - rank[tail]` over all edges.
    pub(crate) fn span(&self, rank: &[i32]) -> i64 {
        self.edges
            .iter()
            .map(|&(tail, head)| i64::from(rank[head] - rank[tail]))
            .sum()
    }
}

#[derive(Debug, Clone, Copy)]
struct DfsFrame {
    v: usize,
    next: usize,
    low: usize,
}

/// Spanning tree state: orientation from `ROOT`, low/lim postorder numbering and the cut value
/// of each node's edge to its parent.
#[derive(Debug, Clone)]
struct Tree {
    in_tree: Vec<bool>,
    adj: Vec<Vec<usize>>,
    parent: Vec<Option<usize>>,
    parent_edge: Vec<Option<usize>>,
    low: Vec<usize>,
    lim: Vec<usize>,
    cut: Vec<i64>,
    postorder: Vec<usize>,
}

impl Tree {
    fn new(n: usize, in_tree: Vec<bool>) -> Self {
        Self {
            in_tree,
            adj: vec![Vec::new(); n],
            parent: vec![None; n],
            parent_edge: vec![None; n],
            low: vec![0; n],
            lim: vec![0; n],
            cut: vec![0; n],
            postorder: Vec::with_capacity(n),
        }
    }

    fn rebuild(&mut self, p: &Problem) {
        for adj in &mut self.adj {
            adj.clear();
        }
        for (e, &(tail, head)) in p.edges.iter().enumerate() {
            if self.in_tree[e] {
                self.adj[tail].push(e);
                self.adj[head].push(e);
            }
        }

        self.parent.fill(None);
        self.parent_edge.fill(None);
        self.postorder.clear();
        let mut visited = vec![false; p.n];
        visited[ROOT] = true;
        let mut next_lim = 1usize;
        let mut stack: Vec<DfsFrame> = vec![DfsFrame {
            v: ROOT,
            next: 0,
            low: next_lim,
        }];

        while let Some(frame) = stack.last_mut() {
            let v = frame.v;
            let Some(&e) = self.adj[v].get(frame.next) else {
                self.low[v] = frame.low;
                self.lim[v] = next_lim;
                next_lim += 1;
                self.postorder.push(v);
                stack.pop();
                continue;
            };
            frame.next += 1;
            let (tail, head) = p.edges[e];
            let w = if tail == v { head } else { tail };
            if visited[w] {
                continue;
            }
            visited[w] = true;
            self.parent[w] = Some(v);
            self.parent_edge[w] = Some(e);
            stack.push(DfsFrame {
                v: w,
                next: 0,
                low: next_lim,
            });
        }

        for ix in 0..self.postorder.len() {
            let v = self.postorder[ix];
            if let Some(cut) = self.cut_value(p, v) {
                self.cut[v] = cut;
            }
        }
    }

    /// Cut value of the tree edge between `child` and its parent, assuming the cut values of
    /// the edges below `child` are already known.
    fn cut_value(&self, p: &Problem, child: usize) -> Option<i64> {
        let parent = self.parent[child]?;
        let parent_edge = self.parent_edge[child]?;
        let child_is_tail = p.edges[parent_edge].0 == child;

        let mut cut: i64 = 1;
        for &e in &p.incident[child] {
            let (tail, head) = p.edges[e];
            let is_out = tail == child;
            let other = if is_out { head } else { tail };
            if other == parent {
                continue;
            }
            let points_to_head = is_out == child_is_tail;
            cut += if points_to_head { 1 } else { -1 };
            if self.in_tree[e] {
                let other_cut = self.cut[other];
                cut += if points_to_head { -other_cut } else { other_cut };
            }
        }
        Some(cut)
    }

    fn leave_edge(&self) -> Option<usize> {
        (0..self.parent_edge.len())
            .find(|&v| self.parent_edge[v].is_some() && self.cut[v] < 0)
            .and_then(|v| self.parent_edge[v])
    }

    /// The non-tree edge crossing the cut of `leave` in the opposite direction with the least
    /// slack.
    fn enter_edge(&self, p: &Problem, rank: &[i32], leave: usize) -> Option<usize> {
        let (tail, head) = p.edges[leave];
        let (sub, flip) = if self.lim[tail] > self.lim[head] {
            (head, true)
        } else {
            (tail, false)
        };
        let below = |x: usize| self.low[sub] <= self.lim[x] && self.lim[x] <= self.lim[sub];

        p.edges
            .iter()
            .enumerate()
            .filter(|&(_, &(a, b))| flip == below(a) && flip != below(b))
            .map(|(e, _)| e)
            .min_by_key(|&e| p.slack(rank, e))
    }

    /// Re-derives ranks from the (tight) tree edges, keeping the root's rank.
    fn update_ranks(&self, p: &Problem, rank: &mut [i32]) {
        for &v in self.postorder.iter().rev() {
            let (Some(parent), Some(e)) = (self.parent[v], self.parent_edge[v]) else {
                continue;
            };
            rank[v] = if p.edges[e].0 == parent {
                rank[parent] + 1
            } else {
                rank[parent] - 1
            };
        }
    }
}

/// Total span of the dag's links under the current layers; `None` when a node has no layer.
pub fn total_span<T>(dag: &Dag<T>) -> Option<i64> {
    let mut span = 0i64;
    for (_, link) in dag.links() {
        let parent = dag[link.source()].layer?;
        let child = dag[link.target()].layer?;
        span += i64::from(child - parent);
    }
    Some(span)
}
