use narwhal::coord::{Center, Greedy, MinCurve, Topological as TopologicalCoord, Vert};
use narwhal::dag::{Dag, IterOrder, Node};
use narwhal::decross::{Opt, TwoLayer};
use narwhal::layering::{CoffmanGraham, LongestPath, Simplex, Topological};
use narwhal::{
    Coord, Decross, LayerGraph, Layering, Layers, LayoutError, LayoutOptions, Sugiyama,
};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

fn single() -> Dag<()> {
    let mut dag = Dag::new();
    dag.add_node("0", ()).unwrap();
    dag
}

fn doub() -> Dag<()> {
    let mut dag = Dag::new();
    dag.add_node("0", ()).unwrap();
    dag.add_node("1", ()).unwrap();
    dag
}

fn trip() -> Dag<()> {
    let mut dag = Dag::new();
    for id in ["0", "1", "2"] {
        dag.add_node(id, ()).unwrap();
    }
    dag
}

fn dummy() -> Dag<()> {
    Dag::from_links([("0", "1"), ("1", "2"), ("0", "2")]).unwrap()
}

fn three() -> Dag<()> {
    Dag::from_links([
        ("0", "1"),
        ("0", "2"),
        ("0", "3"),
        ("1", "4"),
        ("2", "4"),
        ("3", "4"),
    ])
    .unwrap()
}

fn xy(node: &Node<()>) -> (f64, f64) {
    (node.x.unwrap(), node.y.unwrap())
}

#[test]
fn sugiyama_lays_out_a_single_node() {
    let mut dag = single();
    let layout = Sugiyama::new().layout(&mut dag).unwrap();
    let (x, y) = xy(layout.dag.find("0").unwrap());
    assert_close(x, 0.5);
    assert_close(y, 0.5);
    assert_close(layout.width, 1.0);
    assert_close(layout.height, 1.0);
}

#[test]
fn sugiyama_stacks_two_nodes_with_topological_layering() {
    let mut dag = doub();
    let layout = Sugiyama::new()
        .with_layering(Topological)
        .layout(&mut dag)
        .unwrap();
    let order = layout.dag.descendants(IterOrder::Before);
    let (x0, y0) = xy(&layout.dag[order[0]]);
    let (x1, y1) = xy(&layout.dag[order[1]]);
    assert_close(x0, 0.5);
    assert_close(y0, 0.5);
    assert_close(x1, 0.5);
    assert_close(y1, 1.5);
}

#[test]
fn sugiyama_places_isolated_nodes_side_by_side() {
    let mut dag = trip();
    let layout = Sugiyama::new().layout(&mut dag).unwrap();
    for (id, expected) in [("0", 0.5), ("1", 1.5), ("2", 2.5)] {
        let (x, y) = xy(layout.dag.find(id).unwrap());
        assert_close(x, expected);
        assert_close(y, 0.5);
    }
}

#[test]
fn sugiyama_rescales_to_a_fixed_size() {
    let mut dag = trip();
    let layout = Sugiyama::new()
        .with_size((6.0, 2.0))
        .layout(&mut dag)
        .unwrap();
    assert_eq!((layout.width, layout.height), (6.0, 2.0));
    for (id, expected) in [("0", 1.0), ("1", 3.0), ("2", 5.0)] {
        let (x, y) = xy(layout.dag.find(id).unwrap());
        assert_close(x, expected);
        assert_close(y, 1.0);
    }
}

#[test]
fn sugiyama_routes_a_long_link_through_a_dummy() {
    let mut dag = dummy();
    let layout = Sugiyama::new().layout(&mut dag).unwrap();
    let order = layout.dag.descendants(IterOrder::Before);
    let (first_x, first_y) = xy(&layout.dag[order[0]]);
    let (second_x, second_y) = xy(&layout.dag[order[1]]);
    let (third_x, third_y) = xy(&layout.dag[order[2]]);

    assert_close(first_y, 0.5);
    assert_close(second_y, 1.5);
    assert_close(third_y, 2.5);

    assert!((0.5..1.0).contains(&first_x), "first x {first_x}");
    assert!((0.5..1.0).contains(&third_x), "third x {third_x}");
    assert_close(first_x, third_x);
    assert!((first_x - second_x).abs() > 0.005);
    assert!((first_x - second_x).abs() < 0.5);

    // 0 -> 2 skips a layer: source, dummy, target.
    let long = layout
        .dag
        .link_between(
            layout.dag.node_id("0").unwrap(),
            layout.dag.node_id("2").unwrap(),
        )
        .unwrap();
    let points = &layout.dag.link(long).points;
    assert_eq!(points.len(), 3);
    assert_close(points[1].y, 1.5);
    assert_close(points[0].x, first_x);
    assert_close(points[2].x, third_x);
}

#[test]
fn sugiyama_honours_node_sizes() {
    let mut dag = three();
    let sugiyama = Sugiyama::new().with_node_size(|node: &Node<()>| {
        let size = node.id().parse::<f64>().unwrap() + 1.0;
        (size, size)
    });
    assert_eq!((sugiyama.node_size())(dag.find("3").unwrap()), (4.0, 4.0));

    let layout = sugiyama.layout(&mut dag).unwrap();
    assert_close(layout.width, 9.0);
    assert_close(layout.height, 10.0);

    for node in layout.dag.nodes() {
        let x = node.x.unwrap();
        assert!((1.0..=8.0).contains(&x), "node {} at {x}", node.id());
    }
    assert_close(layout.dag.find("0").unwrap().y.unwrap(), 0.5);
    for id in ["1", "2", "3"] {
        assert_close(layout.dag.find(id).unwrap().y.unwrap(), 3.0);
    }
    assert_close(layout.dag.find("4").unwrap().y.unwrap(), 7.5);
}

#[test]
fn sugiyama_accepts_custom_operators() {
    let mut dag = dummy();
    let layering = Layering::custom(|dag: &mut Dag<()>| {
        for (i, v) in dag.descendants(IterOrder::Before).into_iter().enumerate() {
            dag[v].layer = Some(i as i32);
        }
    });
    let decross = Decross::custom(|_: &LayerGraph, _: &mut Layers| {});
    let coord = Coord::custom(|graph: &mut LayerGraph, layers: &Layers| {
        for layer in layers {
            let div = layer.len().max(1) as f64;
            for (i, &v) in layer.iter().enumerate() {
                graph.set_x(v, i as f64 / div);
            }
        }
        1.0
    });

    let sugiyama = Sugiyama::new()
        .with_layering(layering)
        .with_decross(decross)
        .with_coord(coord)
        .with_node_size(|_: &Node<()>| (2.0, 2.0))
        .with_size((1.0, 2.0))
        .with_debug(true);
    assert!(matches!(sugiyama.layering(), Layering::Custom(_)));
    assert!(matches!(sugiyama.decross(), Decross::Custom(_)));
    assert!(matches!(sugiyama.coord(), Coord::Custom(_)));
    assert_eq!(sugiyama.size(), Some((1.0, 2.0)));
    assert!(sugiyama.debug());

    let layout = sugiyama.layout(&mut dag).unwrap();
    assert_eq!((layout.width, layout.height), (1.0, 2.0));
    assert_close(layout.dag.find("2").unwrap().y.unwrap(), 2.0 * 5.0 / 6.0);
}

#[test]
fn sugiyama_runs_with_every_builtin_operator() {
    let layerings: Vec<Layering<()>> = vec![
        Topological.into(),
        Simplex::default().into(),
        LongestPath::default().into(),
        CoffmanGraham::default().into(),
    ];
    let decrosses: Vec<Decross> = vec![TwoLayer::default().into(), Opt::default().into()];
    let coords: Vec<Coord> = vec![
        Center.into(),
        Vert::default().into(),
        MinCurve::default().into(),
        Greedy.into(),
        TopologicalCoord.into(),
    ];

    for layering in &layerings {
        for decross in &decrosses {
            for coord in &coords {
                let sugiyama = Sugiyama::new()
                    .with_layering(layering.clone())
                    .with_decross(decross.clone())
                    .with_coord(coord.clone())
                    .with_debug(true);

                let mut dag = single();
                let layout = sugiyama.layout(&mut dag).unwrap();
                let (x, y) = xy(layout.dag.find("0").unwrap());
                assert_close(x, 0.5);
                assert_close(y, 0.5);

                let mut dag = three();
                let layout = sugiyama.layout(&mut dag).unwrap();
                for node in layout.dag.nodes() {
                    let x = node.x.unwrap();
                    assert!(
                        (0.0..=layout.width).contains(&x),
                        "{:?}/{:?}/{:?}: {} at {x}",
                        layering,
                        decross,
                        coord,
                        node.id()
                    );
                }
            }
        }
    }
}

#[test]
fn sugiyama_fails_with_noop_layering() {
    let mut dag = dummy();
    let err = Sugiyama::new()
        .with_layering(Layering::custom(|_: &mut Dag<()>| {}))
        .layout(&mut dag)
        .unwrap_err();
    assert_eq!(err.to_string(), "layering did not assign layer to node '0'");
}

#[test]
fn sugiyama_fails_with_negative_layers() {
    let mut dag = dummy();
    let err = Sugiyama::new()
        .with_layering(Layering::custom(|dag: &mut Dag<()>| {
            for node in dag.nodes_mut() {
                node.layer = Some(-1);
            }
        }))
        .layout(&mut dag)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "layering assigned a negative layer (-1) to node '0'"
    );
}

#[test]
fn sugiyama_fails_with_flat_layering() {
    let mut dag = dummy();
    let err = Sugiyama::new()
        .with_layering(Layering::custom(|dag: &mut Dag<()>| {
            for node in dag.nodes_mut() {
                node.layer = Some(0);
            }
        }))
        .layout(&mut dag)
        .unwrap_err();
    assert_eq!(
        err,
        LayoutError::NonIncreasingLayer {
            parent: "0".to_string(),
            parent_layer: 0,
            child: "1".to_string(),
            child_layer: 0,
        }
    );
}

#[test]
fn sugiyama_fails_with_noop_coord() {
    let mut dag = dummy();
    let err = Sugiyama::new()
        .with_coord(Coord::custom(|_: &mut LayerGraph, _: &Layers| 1.0))
        .layout(&mut dag)
        .unwrap_err();
    assert_eq!(err.to_string(), "coord didn't assign an x to node '0'");
}

#[test]
fn sugiyama_fails_with_coordinates_outside_the_width() {
    let mut dag = dummy();
    let err = Sugiyama::new()
        .with_coord(Coord::custom(|graph: &mut LayerGraph, layers: &Layers| {
            for &v in layers.iter().flatten() {
                graph.set_x(v, 2.0);
            }
            1.0
        }))
        .layout(&mut dag)
        .unwrap_err();
    assert_eq!(err.to_string(), "coord assgined an x (2) outside of [0, 1]");
}

#[test]
fn sugiyama_fails_with_negative_width() {
    let mut dag = dummy();
    let err = Sugiyama::new()
        .with_node_size(|_: &Node<()>| (-1.0, 1.0))
        .layout(&mut dag)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "all node sizes must be non-negative, but got width -1 and height 1 for node id: 0"
    );
}

#[test]
fn sugiyama_fails_with_negative_height() {
    let mut dag = dummy();
    let err = Sugiyama::new()
        .with_node_size(|_: &Node<()>| (1.0, -1.0))
        .layout(&mut dag)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "all node sizes must be non-negative, but got width 1 and height -1 for node id: 0"
    );
}

#[test]
fn sugiyama_fails_with_nan_sizes() {
    let mut dag = dummy();
    let err = Sugiyama::new()
        .with_node_size(|_: &Node<()>| (f64::NAN, 1.0))
        .layout(&mut dag)
        .unwrap_err();
    assert!(matches!(err, LayoutError::NegativeSize { .. }));
}

#[test]
fn sugiyama_fails_with_zero_height() {
    let mut dag = dummy();
    let err = Sugiyama::new()
        .with_node_size(|_: &Node<()>| (1.0, 0.0))
        .layout(&mut dag)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "at least one node must have positive height, but total height was zero"
    );
}

#[test]
fn sugiyama_catches_decross_moving_nodes_between_layers() {
    for debug in [false, true] {
        let mut dag = dummy();
        let err = Sugiyama::new()
            .with_decross(Decross::custom(|_: &LayerGraph, layers: &mut Layers| {
                if let Some(moved) = layers[1].pop() {
                    layers[0].push(moved);
                }
            }))
            .with_debug(debug)
            .layout(&mut dag)
            .unwrap_err();
        assert_eq!(err, LayoutError::DecrossMembership { layer: 0 });
    }
}

#[test]
fn sugiyama_fails_with_decross_adding_unknown_nodes() {
    let mut dag = dummy();
    let err = Sugiyama::new()
        .with_decross(Decross::custom(|_: &LayerGraph, layers: &mut Layers| {
            layers[0].push(99);
        }))
        .layout(&mut dag)
        .unwrap_err();
    assert_eq!(err.to_string(), "decross changed the nodes of layer 0");
}

#[test]
fn sugiyama_fails_with_decross_duplicating_nodes() {
    let mut dag = three();
    let err = Sugiyama::new()
        .with_decross(Decross::custom(|_: &LayerGraph, layers: &mut Layers| {
            let first = layers[1][0];
            layers[1][1] = first;
        }))
        .layout(&mut dag)
        .unwrap_err();
    assert_eq!(err, LayoutError::DecrossMembership { layer: 1 });
}

#[test]
fn sugiyama_skips_empty_layers() {
    let mut dag = trip();
    let layout = Sugiyama::new()
        .with_layering(Layering::custom(|dag: &mut Dag<()>| {
            for (i, v) in dag.node_ids().enumerate() {
                dag[v].layer = Some(i as i32 * 50_000_000);
            }
        }))
        .with_coord(Coord::from(Center))
        .layout(&mut dag)
        .unwrap();

    assert_close(layout.height, 3.0);
    let ys: Vec<f64> = layout.dag.nodes().map(|n| n.y.unwrap()).collect();
    assert_eq!(ys, vec![0.5, 1.5, 2.5]);
    for node in layout.dag.nodes() {
        assert_eq!(node.layer.unwrap() % 50_000_000, 0);
    }
}

#[test]
fn sugiyama_centres_everything_when_width_is_zero() {
    let mut dag = dummy();
    let layout = Sugiyama::new()
        .with_node_size(|_: &Node<()>| (0.0, 1.0))
        .with_size((4.0, 3.0))
        .layout(&mut dag)
        .unwrap();
    for node in layout.dag.nodes() {
        assert_close(node.x.unwrap(), 2.0);
    }
}

#[test]
fn sugiyama_applies_dummy_size() {
    let mut dag = dummy();
    let sugiyama = Sugiyama::new().with_dummy_size((1.0, 0.0));
    assert_eq!(sugiyama.dummy_size(), (1.0, 0.0));
    let layout = sugiyama.layout(&mut dag).unwrap();
    // The dummy now needs room next to node 1.
    assert!(layout.width >= 2.0);
}

#[test]
fn sugiyama_clears_a_previous_layout() {
    let mut dag = dummy();
    let sugiyama: Sugiyama<()> = Sugiyama::new();
    sugiyama.layout(&mut dag).unwrap();
    let first: Vec<(f64, f64)> = dag.nodes().map(xy).collect();
    let first_points = dag.links().map(|(_, l)| l.points.len()).sum::<usize>();

    sugiyama.layout(&mut dag).unwrap();
    let second: Vec<(f64, f64)> = dag.nodes().map(xy).collect();
    let second_points = dag.links().map(|(_, l)| l.points.len()).sum::<usize>();
    assert_eq!(first, second);
    assert_eq!(first_points, second_points);
}

#[test]
fn sugiyama_is_deterministic() {
    let sugiyama: Sugiyama<()> = Sugiyama::new().with_coord(MinCurve::default());
    let mut a = three();
    let mut b = three();
    sugiyama.layout(&mut a).unwrap();
    sugiyama.clone().layout(&mut b).unwrap();
    let xa: Vec<(f64, f64)> = a.nodes().map(xy).collect();
    let xb: Vec<(f64, f64)> = b.nodes().map(xy).collect();
    assert_eq!(xa, xb);
}

#[test]
fn sugiyama_parses_by_name() {
    assert!("sugiyama".parse::<Sugiyama<()>>().is_ok());
    assert!("sugiyama()".parse::<Sugiyama<()>>().is_ok());
    let err = "sugiyama(null)".parse::<Sugiyama<()>>().unwrap_err();
    assert_eq!(err.to_string(), "got arguments to sugiyama");
}

#[test]
fn sugiyama_builds_from_json_options() {
    let options: LayoutOptions = serde_json::from_str(
        r#"{
            "layering": "longest-path(bottom-up)",
            "decross": "opt",
            "coord": "min-curve(0.25)",
            "size": [10.0, 5.0],
            "debug": true
        }"#,
    )
    .unwrap();
    let sugiyama: Sugiyama<()> = Sugiyama::from_options(&options).unwrap();
    assert!(matches!(sugiyama.layering(), Layering::LongestPath(op) if !op.top_down()));
    assert!(matches!(sugiyama.decross(), Decross::Opt(_)));
    assert!(matches!(sugiyama.coord(), Coord::MinCurve(op) if op.weight() == 0.25));
    assert_eq!(sugiyama.size(), Some((10.0, 5.0)));
    assert!(sugiyama.debug());

    let mut dag = three();
    let layout = sugiyama.layout(&mut dag).unwrap();
    assert_eq!((layout.width, layout.height), (10.0, 5.0));
}

#[test]
fn layout_options_default_to_the_default_pipeline() {
    let options: LayoutOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(options, LayoutOptions::default());
    let sugiyama: Sugiyama<()> = Sugiyama::from_options(&options).unwrap();
    assert!(matches!(sugiyama.layering(), Layering::Simplex(_)));
    assert!(matches!(sugiyama.decross(), Decross::TwoLayer(_)));
    assert!(matches!(sugiyama.coord(), Coord::Vert(_)));
    assert_eq!(sugiyama.size(), None);
}

#[test]
fn layout_options_reject_bad_names() {
    let options = LayoutOptions {
        coord: "center(1)".to_string(),
        ..LayoutOptions::default()
    };
    let err = Sugiyama::<()>::from_options(&options).unwrap_err();
    assert_eq!(err.to_string(), "got arguments to center");
}
