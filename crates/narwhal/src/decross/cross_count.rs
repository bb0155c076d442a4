use crate::model::{LayerGraph, Layers};

/// Number of pairwise edge crossings between every two adjacent layers.
pub fn cross_count(graph: &LayerGraph, layers: &Layers) -> u64 {
    let mut pos: Vec<usize> = vec![usize::MAX; graph.len()];
    let mut cc: u64 = 0;
    for i in 1..layers.len() {
        cc += two_layer_cross_count(graph, &layers[i - 1], &layers[i], &mut pos);
    }
    cc
}

/// Accumulator-tree count (Barth, Jünger and Mutzel) of crossings between `north` and `south`.
fn two_layer_cross_count(
    graph: &LayerGraph,
    north: &[usize],
    south: &[usize],
    pos: &mut [usize],
) -> u64 {
    if south.is_empty() {
        return 0;
    }
    for (i, &v) in south.iter().enumerate() {
        pos[v] = i;
    }

    let mut south_entries: Vec<usize> = Vec::new();
    for &v in north {
        let start = south_entries.len();
        south_entries.extend(
            graph
                .children(v)
                .iter()
                .filter_map(|&c| south.get(pos[c]).filter(|&&s| s == c).map(|_| pos[c])),
        );
        south_entries[start..].sort_unstable();
    }

    let mut first_index: usize = 1;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree: Vec<u64> = vec![0; tree_size];

    let mut cc: u64 = 0;
    for entry in south_entries {
        let mut index = entry + first_index;
        tree[index] += 1;
        let mut weight_sum: u64 = 0;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += 1;
        }
        cc += weight_sum;
    }

    cc
}
