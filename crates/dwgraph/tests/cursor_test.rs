use dwgraph::{Edge, Error, Graph};

fn sample() -> Graph<i32, i32> {
    let mut g = Graph::from([1, 3, 4, 2]);
    for (src, dst, weight) in [(1, 4, 3), (2, 4, 2), (1, 1, 2)] {
        g.insert_edge(&src, &dst, weight).unwrap();
    }
    g
}

fn triples(g: &Graph<i32, i32>) -> Vec<(i32, i32, i32)> {
    g.iter().map(|e| (*e.from, *e.to, *e.weight)).collect()
}

#[test]
fn begin_on_single_self_loop() {
    let mut g: Graph<i32, i32> = Graph::from([1]);
    g.insert_edge(&1, &1, 1).unwrap();
    let begin = g.begin();
    assert_eq!(begin.value(), Some(Edge::new(1, 1, 1)));
    assert!(begin != g.end());
}

#[test]
fn begin_equals_end_without_edges() {
    let g: Graph<i32, i32> = Graph::from([1, 2, 3]);
    assert!(g.begin() == g.end());
    assert!(g.begin().get().is_none());
    assert_eq!(g.iter().count(), 0);
}

#[test]
fn forward_walk_is_ascending() {
    let g = sample();
    let mut cursor = g.begin();
    assert!(cursor.get().unwrap() == (1, 1, 2));
    cursor.move_next();
    assert!(cursor.get().unwrap() == (1, 4, 3));
    cursor.move_next();
    assert!(cursor.get().unwrap() == (2, 4, 2));
    cursor.move_next();
    assert!(cursor == g.end());
    assert!(cursor.get().is_none());

    // Stepping past the end stays at the end.
    cursor.move_next();
    assert!(cursor == g.end());
}

#[test]
fn backward_walk_from_end() {
    let g = sample();
    let mut cursor = g.end();
    assert!(cursor.move_prev());
    assert!(cursor.get().unwrap() == (2, 4, 2));
    assert!(cursor.move_prev());
    assert!(cursor.get().unwrap() == (1, 4, 3));
    assert!(cursor.move_prev());
    assert!(cursor.get().unwrap() == (1, 1, 2));
    assert!(cursor == g.begin());

    assert!(!cursor.move_prev());
    assert!(cursor == g.begin());
}

#[test]
fn next_then_prev_returns_to_same_edge() {
    let g = sample();
    let mut cursor = g.begin();
    cursor.move_next();
    cursor.move_next();
    cursor.move_prev();
    assert!(cursor.get().unwrap() == (1, 4, 3));
    assert!(cursor == g.find(&1, &4, &3));
}

#[test]
fn move_prev_on_edgeless_graph_stays_at_end() {
    let g: Graph<i32, i32> = Graph::from([1]);
    let mut cursor = g.end();
    assert!(!cursor.move_prev());
    assert!(cursor.is_end());
}

#[test]
fn end_cursors_compare_equal_however_reached() {
    let g = sample();
    let mut walked = g.begin();
    for _ in 0..3 {
        walked.move_next();
    }
    assert!(walked == g.end());
    assert!(g.find(&3, &3, &3) == g.end());
}

#[test]
fn cursors_from_different_graphs_are_unequal() {
    let g = sample();
    let h = g.clone();
    assert!(g.begin() != h.begin());
}

#[test]
fn forward_traversal_is_reverse_of_backward() {
    let mut g: Graph<i32, i32> = Graph::from([1, 2, 3, 4, 5]);
    for (src, dst, weight) in [
        (5, 1, 0),
        (1, 2, 4),
        (1, 2, 1),
        (3, 3, 3),
        (1, 5, 2),
        (4, 1, -1),
        (1, 2, 9),
    ] {
        g.insert_edge(&src, &dst, weight).unwrap();
    }

    let forward = triples(&g);
    let mut backward: Vec<_> = g.iter().rev().map(|e| (*e.from, *e.to, *e.weight)).collect();
    backward.reverse();
    assert_eq!(forward, backward);

    let mut by_cursor = Vec::new();
    let mut cursor = g.end();
    while cursor.move_prev() {
        let e = cursor.get().unwrap();
        by_cursor.push((*e.from, *e.to, *e.weight));
    }
    by_cursor.reverse();
    assert_eq!(forward, by_cursor);

    let mut sorted = forward.clone();
    sorted.sort();
    assert_eq!(forward, sorted);
}

#[test]
fn edges_iterator_meets_in_the_middle() {
    let g = sample();
    let mut it = g.iter();
    assert_eq!(it.len(), 3);
    assert!(it.next().unwrap() == (1, 1, 2));
    assert!(it.next_back().unwrap() == (2, 4, 2));
    assert_eq!(it.len(), 1);
    assert!(it.next_back().unwrap() == (1, 4, 3));
    assert!(it.next().is_none());
    assert!(it.next_back().is_none());
}

#[test]
fn for_loop_over_graph_reference() {
    let g = sample();
    let mut seen = Vec::new();
    for edge in &g {
        seen.push(edge.to_edge());
    }
    assert_eq!(
        seen,
        vec![Edge::new(1, 1, 2), Edge::new(1, 4, 3), Edge::new(2, 4, 2)]
    );
}

#[test]
fn position_round_trips_through_cursor_at() {
    let g = sample();
    let mut cursor = g.begin();
    cursor.move_next();
    let position = cursor.position();
    let again = g.cursor_at(position).unwrap();
    assert!(again == cursor);
    assert!(g.cursor_at(g.end().position()).unwrap().is_end());
}

#[test]
fn position_is_stale_after_any_mutation() {
    let mut g = sample();
    let position = g.find(&1, &4, &3).position();
    g.insert_node(99);
    assert_eq!(
        g.cursor_at(position).unwrap_err(),
        Error::StalePosition {
            operation: "cursor_at"
        }
    );
    assert!(g.erase_edge_at(position).is_err());
    assert_eq!(triples(&g), vec![(1, 1, 2), (1, 4, 3), (2, 4, 2)]);
}

#[test]
fn position_into_erased_node_edges_no_longer_resolves() {
    let mut g = sample();
    let position = g.find(&1, &1, &2).position();
    assert!(g.erase_node(&1));
    assert!(g.cursor_at(position).is_err());
    assert!(g.find(&1, &1, &2) == g.end());
    assert!(g.begin().get().unwrap() == (2, 4, 2));
}

#[test]
fn position_from_a_clone_is_rejected() {
    let g = sample();
    let mut h = g.clone();
    let position = g.find(&1, &4, &3).position();
    assert_eq!(
        h.erase_edge_at(position).unwrap_err(),
        Error::StalePosition {
            operation: "erase_edge_at"
        }
    );
    assert!(h.cursor_at(position).is_err());
    assert_eq!(triples(&h), vec![(1, 1, 2), (1, 4, 3), (2, 4, 2)]);
    assert!(g.cursor_at(position).is_ok());
}

#[test]
fn identically_built_graphs_reject_each_others_positions() {
    let mut g = sample();
    let mut h = sample();
    let from_g = g.begin().position();
    let from_h = h.begin().position();
    assert!(h.erase_edge_range(from_g, h.end().position()).is_err());
    assert!(g.erase_edge_at(from_h).is_err());
    assert_eq!(g.edge_count(), 3);
    assert_eq!(h.edge_count(), 3);
}

#[test]
fn positions_follow_their_graph_through_take() {
    let mut g = sample();
    let position = g.find(&2, &4, &2).position();
    let mut moved = g.take();
    assert!(g.cursor_at(position).is_err());
    let next = moved.erase_edge_at(position).unwrap();
    assert!(next.is_end());
    assert_eq!(triples(&moved), vec![(1, 1, 2), (1, 4, 3)]);
}
