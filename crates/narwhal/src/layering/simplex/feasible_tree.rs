//! Feasible tree construction used by the network simplex layering.

use super::Problem;

/// Grows a spanning tree of tight edges (slack 0), shifting the ranks of the partial tree
/// whenever no tight edge leaves it. Returns the tree-edge flags, indexed like `p.edges`.
///
/// The problem must be connected; a disconnected problem yields a tree covering only the
/// component of node 0.
pub(super) fn feasible_tree(p: &Problem, rank: &mut [i32]) -> Vec<bool> {
    let mut tree_edge = vec![false; p.edges.len()];
    if p.n == 0 {
        return tree_edge;
    }

    let mut in_tree = vec![false; p.n];
    let mut members: Vec<usize> = vec![0];
    in_tree[0] = true;

    loop {
        tight_tree(p, rank, &mut in_tree, &mut members, &mut tree_edge);
        if members.len() >= p.n {
            break;
        }
        let Some((e, slack)) = find_min_slack_edge(p, rank, &in_tree) else {
            break;
        };
        let (tail, _) = p.edges[e];
        let delta = if in_tree[tail] { slack } else { -slack };
        for &v in &members {
            rank[v] += delta;
        }
    }

    tree_edge
}

fn tight_tree(
    p: &Problem,
    rank: &[i32],
    in_tree: &mut [bool],
    members: &mut Vec<usize>,
    tree_edge: &mut [bool],
) {
    let mut stack: Vec<usize> = members.clone();
    while let Some(v) = stack.pop() {
        for &e in &p.incident[v] {
            let (tail, head) = p.edges[e];
            let w = if tail == v { head } else { tail };
            if in_tree[w] || p.slack(rank, e) != 0 {
                continue;
            }
            in_tree[w] = true;
            tree_edge[e] = true;
            members.push(w);
            stack.push(w);
        }
    }
}

/// The edge with exactly one endpoint in the tree and the smallest slack (first on ties).
fn find_min_slack_edge(p: &Problem, rank: &[i32], in_tree: &[bool]) -> Option<(usize, i32)> {
    p.edges
        .iter()
        .enumerate()
        .filter(|&(_, &(tail, head))| in_tree[tail] != in_tree[head])
        .map(|(e, _)| (e, p.slack(rank, e)))
        .min_by_key(|&(_, slack)| slack)
}
