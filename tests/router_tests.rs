use std::sync::Arc;

use tripgraph::{
    calendar::Calendar,
    graph::Graph,
    payload::{Link, Street, TripHopSchedule},
    router::{self, Allocator, Direction, EdgeType, Query, SearchOptions, State},
    shared::time::Timestamp,
};

fn seattle_portland() -> Graph {
    let mut calendar = Calendar::new();
    calendar.append_day(0, 86_400, [1], 0).unwrap();
    let schedule = TripHopSchedule::new(
        1,
        [(10, 20, "A"), (15, 30, "B"), (400, 430, "C")],
        Arc::new(calendar),
        0,
    )
    .unwrap();

    let mut graph = Graph::new();
    for label in ["Seattle", "Portland", "Seattle-busstop", "Portland-busstop"] {
        graph.add_vertex(label);
    }
    graph.add_edge("Seattle", "Seattle-busstop", Link::new()).unwrap();
    graph.add_edge("Seattle-busstop", "Seattle", Link::new()).unwrap();
    graph.add_edge("Portland", "Portland-busstop", Link::new()).unwrap();
    graph.add_edge("Portland-busstop", "Portland", Link::new()).unwrap();
    graph
        .add_edge("Seattle-busstop", "Portland-busstop", schedule)
        .unwrap();
    graph
}

/// Two-way streets between consecutive labels.
fn streets(segments: &[(&str, &str, f64)]) -> Graph {
    let mut graph = Graph::new();
    for (from, to, length) in segments {
        graph.add_vertex(from);
        graph.add_vertex(to);
        let name = format!("{from}-{to}");
        graph.add_edge(from, to, Street::new(&name, *length)).unwrap();
        graph.add_edge(to, from, Street::new(&name, *length)).unwrap();
    }
    graph
}

fn chain(n: usize) -> Graph {
    let labels: Vec<String> = (0..n).map(|i| format!("v{i}")).collect();
    let segments: Vec<_> = labels
        .windows(2)
        .map(|pair| (pair[0].as_str(), pair[1].as_str(), 1.0))
        .collect();
    streets(&segments)
}

#[test]
fn seattle_to_portland_test() {
    let graph = seattle_portland();
    let path = graph
        .shortest_path("Seattle", "Portland", State::new(0))
        .unwrap();
    assert_eq!(
        path.labels(),
        vec!["Seattle", "Seattle-busstop", "Portland-busstop", "Portland"]
    );
    assert_eq!(
        path.edge_types(),
        vec![EdgeType::Link, EdgeType::TripHop, EdgeType::Link]
    );
    assert_eq!(path.weight(), 10.0);
    assert_eq!(path.departure(), Some(Timestamp::from_seconds(0)));
    assert_eq!(path.arrival(), Some(Timestamp::from_seconds(20)));

    let last = &path.destination().unwrap().state;
    assert_eq!(last.num_transfers, 1);
    assert_eq!(last.prev_edge_type, EdgeType::Link);
    let bus = &path.vertices[2].state;
    assert_eq!(bus.prev_edge_name.as_deref(), Some("A"));
}

#[test]
fn seattle_to_portland_later_test() {
    let graph = seattle_portland();
    let path = graph
        .shortest_path("Seattle", "Portland", State::new(12))
        .unwrap();
    assert_eq!(path.arrival(), Some(Timestamp::from_seconds(30)));
    assert_eq!(path.weight(), 15.0);
}

#[test]
fn seattle_to_portland_retro_test() {
    let graph = seattle_portland();
    let path = graph
        .shortest_path_retro("Seattle", "Portland", State::new(100))
        .unwrap();
    assert_eq!(path.direction, Direction::Retrograde);
    assert_eq!(
        path.labels(),
        vec!["Seattle", "Seattle-busstop", "Portland-busstop", "Portland"]
    );
    assert_eq!(
        path.edge_types(),
        vec![EdgeType::Link, EdgeType::TripHop, EdgeType::Link]
    );
    // B is the last trip arriving by 100.
    assert_eq!(path.departure(), Some(Timestamp::from_seconds(15)));
    assert_eq!(path.arrival(), Some(Timestamp::from_seconds(100)));
    assert_eq!(path.weight(), 15.0);

    // Edges read in the direction of travel.
    let hops: Vec<_> = path
        .edges
        .iter()
        .map(|edge| (edge.from.as_ref(), edge.to.as_ref()))
        .collect();
    assert_eq!(
        hops,
        vec![
            ("Seattle", "Seattle-busstop"),
            ("Seattle-busstop", "Portland-busstop"),
            ("Portland-busstop", "Portland"),
        ]
    );
}

#[test]
fn no_service_test() {
    let graph = seattle_portland();
    let err = graph
        .shortest_path("Seattle", "Portland", State::new(500))
        .unwrap_err();
    assert_eq!(
        err,
        router::Error::PathNotFound {
            from: "Seattle".to_string(),
            to: "Portland".to_string(),
        }
    );
    // The way back has no trip hops at all.
    assert!(
        graph
            .shortest_path("Portland", "Seattle", State::new(0))
            .is_err()
    );
}

#[test]
fn street_path_test() {
    let graph = streets(&[("a", "b", 1.0), ("b", "c", 1.5), ("a", "c", 5.0)]);
    let path = graph.shortest_path("a", "c", State::new(0)).unwrap();
    assert_eq!(path.labels(), vec!["a", "b", "c"]);
    assert_eq!(path.weight(), 2.5);
    let last = &path.destination().unwrap().state;
    assert_eq!(last.dist_walked, 2.5);
    // ceil(1.0) + ceil(1.5)
    assert_eq!(last.time, Timestamp::from_seconds(3));
    assert_eq!(last.prev_edge_name.as_deref(), Some("b-c"));
}

#[test]
fn same_vertex_test() {
    let graph = streets(&[("a", "b", 1.0)]);
    for direction in [Direction::Forward, Direction::Retrograde] {
        let path = graph
            .router("a", "a")
            .with_state(State::new(42))
            .with_direction(direction)
            .solve()
            .unwrap();
        assert_eq!(path.labels(), vec!["a"]);
        assert!(path.is_empty());
        assert_eq!(path.weight(), 0.0);
        assert_eq!(path.vertices[0].state, State::new(42));
    }
}

#[test]
fn unknown_vertex_test() {
    let graph = streets(&[("a", "b", 1.0)]);
    let err = graph.shortest_path("a", "nowhere", State::new(0)).unwrap_err();
    assert_eq!(err, router::Error::UnknownVertex("nowhere".to_string()));
    let err = graph
        .shortest_path_retro("nowhere", "a", State::new(0))
        .unwrap_err();
    assert_eq!(err, router::Error::UnknownVertex("nowhere".to_string()));
}

#[test]
fn disconnected_test() {
    let mut graph = streets(&[("a", "b", 1.0)]);
    graph.add_vertex("island");
    let err = graph.shortest_path("a", "island", State::new(0)).unwrap_err();
    assert!(matches!(err, router::Error::PathNotFound { .. }));
}

#[test]
fn links_are_free_test() {
    let mut graph: Graph = Graph::new();
    for label in ["a", "b", "c"] {
        graph.add_vertex(label);
    }
    graph.add_edge("a", "b", Link::new()).unwrap();
    graph.add_edge("b", "c", Link::new()).unwrap();
    let path = graph.shortest_path("a", "c", State::new(10)).unwrap();
    assert_eq!(path.weight(), 0.0);
    assert_eq!(path.arrival(), Some(Timestamp::from_seconds(10)));
}

#[test]
fn max_settled_test() {
    let graph = chain(10);
    let err = graph
        .router("v0", "v9")
        .departure_at(0)
        .with_options(SearchOptions::new().with_max_settled(3))
        .solve()
        .unwrap_err();
    assert_eq!(err, router::Error::SearchAborted { settled: 3 });

    // Enough budget to reach the target.
    let path = graph
        .router("v0", "v9")
        .departure_at(0)
        .with_options(SearchOptions::new().with_max_settled(10))
        .solve()
        .unwrap();
    assert_eq!(path.vertices.len(), 10);
}

#[test]
fn exhaust_with_budget_test() {
    let graph = chain(5);
    // v1 settles second, so running out of budget on the third settle is not a failure.
    let path = graph
        .router("v0", "v1")
        .departure_at(0)
        .with_options(SearchOptions::new().exhaust().with_max_settled(3))
        .solve()
        .unwrap();
    assert_eq!(path.labels(), vec!["v0", "v1"]);
    assert_eq!(path.weight(), 1.0);

    let tree = graph
        .router("v0", "v1")
        .departure_at(0)
        .with_options(SearchOptions::new().exhaust().with_max_settled(3))
        .tree()
        .unwrap();
    assert!(tree.contains("v1"));

    // Target further than the budget reaches.
    let err = graph
        .router("v0", "v4")
        .departure_at(0)
        .with_options(SearchOptions::new().exhaust().with_max_settled(3))
        .solve()
        .unwrap_err();
    assert_eq!(err, router::Error::SearchAborted { settled: 3 });
}

#[test]
fn tie_break_test() {
    let mut graph: Graph = Graph::new();
    for label in ["a", "b", "c", "d"] {
        graph.add_vertex(label);
    }
    graph.add_edge("a", "b", Street::new("ab", 1.0)).unwrap();
    graph.add_edge("a", "c", Street::new("ac", 1.0)).unwrap();
    graph.add_edge("b", "d", Street::new("bd", 1.0)).unwrap();
    graph.add_edge("c", "d", Street::new("cd", 1.0)).unwrap();
    for _ in 0..5 {
        let path = graph.shortest_path("a", "d", State::new(0)).unwrap();
        assert_eq!(path.labels(), vec!["a", "b", "d"]);
    }
}

#[test]
fn tree_test() {
    let graph = streets(&[("a", "b", 1.0), ("b", "c", 1.0), ("a", "d", 4.0)]);
    let tree = graph
        .router("a", "a")
        .departure_at(0)
        .with_options(SearchOptions::new().exhaust())
        .tree()
        .unwrap();
    assert_eq!(tree.len(), 4);
    assert_eq!(tree.root().label.as_ref(), "a");
    assert!(tree.parent("a").is_none());
    assert_eq!(tree.state("d").unwrap().weight, 4.0);

    for vertex in tree.graph().vertices() {
        let Some(edge) = tree.parent(&vertex.label) else {
            continue;
        };
        let parent = tree.graph().vertex(edge.from).payload().unwrap();
        let child = vertex.payload().unwrap();
        assert!(parent.weight <= child.weight);
        assert_eq!(vertex.degree_in(), 1);
    }
    // n - 1 edges
    assert_eq!(tree.graph().edge_count(), 3);
}

#[test]
fn tree_stops_at_target_test() {
    let graph = chain(6);
    let tree = graph
        .shortest_path_tree("v0", "v2", State::new(0), Direction::Forward)
        .unwrap();
    assert!(tree.contains("v2"));
    assert!(!tree.contains("v5"));
}

#[test]
fn retro_tree_test() {
    let graph = seattle_portland();
    let tree = graph
        .shortest_path_tree("Seattle", "Portland", State::new(100), Direction::Retrograde)
        .unwrap();
    assert_eq!(tree.direction(), Direction::Retrograde);
    assert_eq!(tree.root().label.as_ref(), "Portland");
    // Retrograde tree edges point from successor to predecessor.
    let edge = tree.parent("Seattle").unwrap();
    assert_eq!(tree.graph().label(edge.from).as_ref(), "Seattle-busstop");
    assert_eq!(tree.graph().label(edge.to).as_ref(), "Seattle");
}

#[test]
fn tree_shares_payloads_test() {
    let graph = streets(&[("a", "b", 1.0)]);
    let tree = graph
        .shortest_path_tree("a", "b", State::new(0), Direction::Forward)
        .unwrap();
    let tree_edge = tree.parent("b").unwrap();
    let source_edge = graph.edge_out(graph.index_of("a").unwrap(), 0).unwrap();
    assert!(Arc::ptr_eq(&tree_edge.payload, &source_edge.payload));
}

#[test]
fn round_trip_test() {
    let graph = streets(&[("a", "b", 2.0), ("b", "c", 3.0), ("c", "d", 1.0)]);
    let there = graph.shortest_path("a", "d", State::new(0)).unwrap();
    let back = graph.shortest_path("d", "a", State::new(0)).unwrap();
    assert_eq!(there.weight(), back.weight());
    let mut reversed = back.labels();
    reversed.reverse();
    assert_eq!(there.labels(), reversed);
}

#[test]
fn forward_retro_agree_on_streets_test() {
    let graph = streets(&[("a", "b", 2.0), ("b", "c", 3.0), ("a", "c", 9.0)]);
    let forward = graph.shortest_path("a", "c", State::new(0)).unwrap();
    let retro = graph
        .shortest_path_retro("a", "c", State::new(5))
        .unwrap();
    assert_eq!(forward.labels(), retro.labels());
    assert_eq!(forward.weight(), retro.weight());
    assert_eq!(retro.departure(), Some(Timestamp::from_seconds(0)));
}

#[test]
fn allocator_reuse_test() {
    let small = chain(3);
    let large = chain(8);
    let mut allocator = Allocator::new(&small);
    let first = small
        .router("v0", "v2")
        .departure_at(0)
        .solve_with_allocator(&mut allocator)
        .unwrap();
    let second = large
        .router("v0", "v7")
        .departure_at(0)
        .solve_with_allocator(&mut allocator)
        .unwrap();
    let third = small
        .router("v0", "v2")
        .departure_at(0)
        .solve_with_allocator(&mut allocator)
        .unwrap();
    assert_eq!(first.weight(), 2.0);
    assert_eq!(second.weight(), 7.0);
    assert_eq!(first.labels(), third.labels());
}

#[test]
fn batch_test() {
    let graph = seattle_portland();
    let queries = vec![
        Query::depart_at("Seattle", "Portland", 0),
        Query::depart_at("Seattle", "Portland", 12),
        Query::arrive_by("Seattle", "Portland", 100),
        Query::depart_at("Seattle", "nowhere", 0),
    ];
    let results = graph.shortest_paths(&queries);
    assert_eq!(results.len(), 4);
    assert_eq!(results[0].as_ref().unwrap().weight(), 10.0);
    assert_eq!(
        results[1].as_ref().unwrap().arrival(),
        Some(Timestamp::from_seconds(30))
    );
    assert_eq!(
        results[2].as_ref().unwrap().departure(),
        Some(Timestamp::from_seconds(15))
    );
    assert_eq!(
        results[3].as_ref().unwrap_err(),
        &router::Error::UnknownVertex("nowhere".to_string())
    );

    let single = graph
        .shortest_path("Seattle", "Portland", State::new(0))
        .unwrap();
    assert_eq!(results[0].as_ref().unwrap().labels(), single.labels());
}

#[test]
fn hello_world_test() {
    let mut calendar = Calendar::new();
    calendar.append_day(0, 86_400, [1], 0).unwrap();
    let schedule =
        TripHopSchedule::new(1, [(10, 20, "hello")], Arc::new(calendar), 0).unwrap();

    let mut graph: Graph = Graph::new();
    for label in ["Seattle", "Portland", "Seattle-busstop", "Portland-busstop"] {
        graph.add_vertex(label);
    }
    graph
        .add_edge("Seattle", "Portland", Street::new("I-5 south", 5000.0))
        .unwrap();
    graph.add_edge("Seattle", "Seattle-busstop", Link::new()).unwrap();
    graph.add_edge("Seattle-busstop", "Seattle", Link::new()).unwrap();
    graph.add_edge("Portland", "Portland-busstop", Link::new()).unwrap();
    graph.add_edge("Portland-busstop", "Portland", Link::new()).unwrap();
    graph
        .add_edge("Seattle-busstop", "Portland-busstop", schedule)
        .unwrap();

    let path = graph
        .shortest_path("Seattle", "Portland", State::new(0))
        .unwrap();
    assert_eq!(
        path.labels(),
        vec!["Seattle", "Seattle-busstop", "Portland-busstop", "Portland"]
    );
    assert_eq!(
        path.edge_types(),
        vec![EdgeType::Link, EdgeType::TripHop, EdgeType::Link]
    );
    assert_eq!(path.weight(), 10.0);

    // Once the bus has left only the highway remains.
    let path = graph
        .shortest_path("Seattle", "Portland", State::new(11))
        .unwrap();
    assert_eq!(path.labels(), vec!["Seattle", "Portland"]);
    assert_eq!(path.weight(), 5000.0);
    assert_eq!(path.arrival(), Some(Timestamp::from_seconds(5011)));
}

#[test]
fn reachability_test() {
    let graph = streets(&[("a", "b", 1.0), ("b", "c", 1.0), ("c", "d", 1.0)]);
    let path = graph.shortest_path("a", "d", State::new(0)).unwrap();
    let tree = graph
        .shortest_path_tree("a", "d", State::new(0), Direction::Forward)
        .unwrap();
    assert!(tree.contains("d"));
    assert_eq!(path.origin().unwrap().label.as_ref(), "a");
    assert_eq!(path.destination().unwrap().label.as_ref(), "d");
    assert_eq!(path.edges.len(), path.vertices.len() - 1);
    assert_eq!(path.weight(), tree.state("d").unwrap().weight);
}
