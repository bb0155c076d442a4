use narwhal_dag::{Dag, DagError, Point, alg};

fn diamond() -> Dag<()> {
    Dag::from_links([("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]).unwrap()
}

fn ids(dag: &Dag<()>, vs: &[narwhal_dag::NodeId]) -> Vec<String> {
    vs.iter().map(|&v| dag[v].id().to_string()).collect()
}

#[test]
fn dag_from_links_creates_each_node_once() {
    let dag = diamond();
    assert_eq!(dag.len(), 4);
    assert_eq!(dag.link_count(), 4);
    assert!(dag.contains("d"));
    assert!(!dag.contains("e"));
}

#[test]
fn dag_children_and_parents_follow_link_order() {
    let dag = diamond();
    let a = dag.node_id("a").unwrap();
    let d = dag.node_id("d").unwrap();
    let children: Vec<_> = dag.children(a).collect();
    assert_eq!(ids(&dag, &children), vec!["b", "c"]);
    let parents: Vec<_> = dag.parents(d).collect();
    assert_eq!(ids(&dag, &parents), vec!["b", "c"]);
}

#[test]
fn dag_roots_and_leaves() {
    let dag = diamond();
    assert_eq!(ids(&dag, &dag.roots()), vec!["a"]);
    assert_eq!(ids(&dag, &dag.leaves()), vec!["d"]);
}

#[test]
fn dag_stratify_accepts_parents_listed_after_children() {
    let dag: Dag<u32> = Dag::stratify([
        ("1", 10, vec!["0"]),
        ("0", 20, vec![]),
        ("2", 30, vec!["0", "1"]),
    ])
    .unwrap();
    assert_eq!(dag.len(), 3);
    assert_eq!(dag.link_count(), 3);
    assert_eq!(dag.find("0").unwrap().data, 20);
    let two = dag.node_id("2").unwrap();
    assert_eq!(dag.parents(two).count(), 2);
}

#[test]
fn dag_stratify_rejects_unknown_parent() {
    let err = Dag::stratify([("0", (), vec!["missing"])]).unwrap_err();
    assert_eq!(
        err,
        DagError::UnknownNode {
            id: "missing".to_string()
        }
    );
}

#[test]
fn dag_rejects_duplicates_and_self_loops() {
    let mut dag: Dag<()> = Dag::new();
    let a = dag.add_node("a", ()).unwrap();
    let b = dag.add_node("b", ()).unwrap();
    assert_eq!(
        dag.add_node("a", ()).unwrap_err(),
        DagError::DuplicateNode { id: "a".to_string() }
    );
    assert_eq!(
        dag.add_link(a, a).unwrap_err(),
        DagError::SelfLoop { id: "a".to_string() }
    );
    dag.add_link(a, b).unwrap();
    assert_eq!(
        dag.add_link(a, b).unwrap_err().to_string(),
        "link from 'a' to 'b' already exists"
    );
}

#[test]
fn dag_link_between_finds_the_link() {
    let dag = diamond();
    let a = dag.node_id("a").unwrap();
    let c = dag.node_id("c").unwrap();
    let d = dag.node_id("d").unwrap();
    let e = dag.link_between(a, c).unwrap();
    assert_eq!(dag.link(e).source(), a);
    assert_eq!(dag.link(e).target(), c);
    assert!(dag.link_between(a, d).is_none());
}

#[test]
fn dag_clear_layout_resets_nodes_and_links() {
    let mut dag = diamond();
    for node in dag.nodes_mut() {
        node.layer = Some(1);
        node.x = Some(2.0);
        node.y = Some(3.0);
    }
    for link in dag.links_mut() {
        link.points.push(Point::new(1.0, 1.0));
    }
    dag.clear_layout();
    assert!(
        dag.nodes()
            .all(|n| n.layer.is_none() && n.x.is_none() && n.y.is_none())
    );
    assert!(dag.links().all(|(_, l)| l.points.is_empty()));
}

#[test]
fn components_splits_disconnected_parts() {
    let mut dag = diamond();
    dag.add_node("x", ()).unwrap();
    dag.connect("y", "z").unwrap_err();
    let y = dag.add_node("y", ()).unwrap();
    let z = dag.add_node("z", ()).unwrap();
    dag.add_link(z, y).unwrap();

    let comps = alg::components(&dag);
    assert_eq!(comps.len(), 3);
    assert_eq!(comps[0].len(), 4);
    assert_eq!(ids(&dag, &comps[1]), vec!["x"]);
    assert_eq!(ids(&dag, &comps[2]), vec!["y", "z"]);
}

#[test]
fn is_acyclic_holds_for_a_dag() {
    assert!(alg::is_acyclic(&diamond()));
}
