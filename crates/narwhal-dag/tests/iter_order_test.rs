use narwhal_dag::{Dag, IterOrder, NodeId};

fn order(dag: &Dag<()>, order: IterOrder) -> Vec<String> {
    dag.descendants(order)
        .into_iter()
        .map(|v| dag[v].id().to_string())
        .collect()
}

fn position(dag: &Dag<()>, seq: &[NodeId], id: &str) -> usize {
    seq.iter().position(|&v| dag[v].id() == id).unwrap()
}

// a -> b -> d, a -> c -> d, c -> e
fn graph() -> Dag<()> {
    Dag::from_links([("a", "b"), ("a", "c"), ("b", "d"), ("c", "d"), ("c", "e")]).unwrap()
}

#[test]
fn depth_first_visits_children_in_link_order() {
    assert_eq!(order(&graph(), IterOrder::Depth), vec!["a", "b", "d", "c", "e"]);
}

#[test]
fn breadth_first_visits_level_by_level() {
    assert_eq!(order(&graph(), IterOrder::Breadth), vec!["a", "b", "c", "d", "e"]);
}

#[test]
fn before_puts_parents_first() {
    let dag = graph();
    let seq = dag.descendants(IterOrder::Before);
    assert_eq!(seq.len(), dag.len());
    for (_, link) in dag.links() {
        let parent = dag[link.source()].id().to_string();
        let child = dag[link.target()].id().to_string();
        assert!(position(&dag, &seq, &parent) < position(&dag, &seq, &child));
    }
}

#[test]
fn after_puts_children_first() {
    let dag = graph();
    let seq = dag.descendants(IterOrder::After);
    assert_eq!(seq.len(), dag.len());
    for (_, link) in dag.links() {
        let parent = dag[link.source()].id().to_string();
        let child = dag[link.target()].id().to_string();
        assert!(position(&dag, &seq, &child) < position(&dag, &seq, &parent));
    }
}

#[test]
fn before_covers_disconnected_roots_in_arena_order() {
    let mut dag: Dag<()> = Dag::new();
    dag.add_node("0", ()).unwrap();
    dag.add_node("1", ()).unwrap();
    assert_eq!(order(&dag, IterOrder::Before), vec!["0", "1"]);
}
