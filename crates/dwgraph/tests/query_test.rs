use dwgraph::{Error, Graph};

fn sample() -> Graph<i32, i32> {
    let mut g = Graph::from([1, 3, 4, 2]);
    for (src, dst, weight) in [(1, 4, 3), (2, 4, 2), (1, 1, 2)] {
        g.insert_edge(&src, &dst, weight).unwrap();
    }
    g
}

#[test]
fn is_node_reports_membership() {
    let g = sample();
    assert!(g.is_node(&1));
    assert!(g.is_node(&2));
    assert!(g.is_node(&3));
    assert!(!g.is_node(&5));
    assert!(!g.is_empty());
}

#[test]
fn is_connected_follows_direction() {
    let g = sample();
    assert!(g.is_connected(&1, &4).unwrap());
    assert!(g.is_connected(&2, &4).unwrap());
    assert!(g.is_connected(&1, &1).unwrap());
    assert!(!g.is_connected(&2, &1).unwrap());
    assert!(!g.is_connected(&4, &1).unwrap());
}

#[test]
fn is_connected_requires_both_nodes() {
    let g = sample();
    let err = g.is_connected(&1, &7).unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot call Graph::is_connected if src or dst node don't exist in the graph"
    );
    assert!(matches!(
        g.is_connected(&7, &1),
        Err(Error::MissingNode {
            operation: "is_connected",
            ..
        })
    ));
}

#[test]
fn nodes_snapshot_is_detached() {
    let mut g = sample();
    let before = g.nodes();
    g.insert_node(0);
    g.erase_node(&4);
    assert_eq!(before, vec![1, 2, 3, 4]);
    assert_eq!(g.nodes(), vec![0, 1, 2, 3]);
}

#[test]
fn weights_are_sorted_per_pair() {
    let mut g = sample();
    assert_eq!(g.weights(&1, &4).unwrap(), vec![3]);
    g.insert_edge(&1, &4, 5).unwrap();
    g.insert_edge(&1, &4, -1).unwrap();
    assert_eq!(g.weights(&1, &4).unwrap(), vec![-1, 3, 5]);
    assert_eq!(g.weights(&2, &4).unwrap(), vec![2]);
    assert!(g.weights(&1, &2).unwrap().is_empty());
}

#[test]
fn weights_requires_both_nodes() {
    let g = sample();
    assert_eq!(
        g.weights(&6, &9).unwrap_err().to_string(),
        "cannot call Graph::weights if src or dst node don't exist in the graph"
    );
}

#[test]
fn connections_lists_distinct_destinations() {
    let mut g = sample();
    g.insert_edge(&1, &4, 9).unwrap();
    assert_eq!(g.connections(&1).unwrap(), vec![1, 4]);
    assert_eq!(g.connections(&2).unwrap(), vec![4]);
    assert!(g.connections(&3).unwrap().is_empty());
    assert_eq!(
        g.connections(&11).unwrap_err().to_string(),
        "cannot call Graph::connections if src doesn't exist in the graph"
    );
}

#[test]
fn find_returns_end_iff_edge_is_absent() {
    let g = sample();
    let mut cursor = g.begin();
    assert!(g.find(&1, &1, &2) == cursor);
    cursor.move_next();
    assert!(g.find(&1, &4, &3) == cursor);
    cursor.move_next();
    assert!(g.find(&2, &4, &2) == cursor);
    cursor.move_next();
    assert!(cursor == g.end());

    assert!(g.find(&1, &1, &7) == g.end());
    assert!(g.find(&4, &1, &3) == g.end());
    // Missing nodes are not an error here.
    assert!(g.find(&42, &1, &2) == g.end());
}

#[test]
fn string_nodes_accept_borrowed_lookups() {
    let mut g: Graph<String, String> = ["b", "a", "c"].iter().map(|s| s.to_string()).collect();
    g.insert_edge("a", "c", "x".to_string()).unwrap();
    assert!(g.is_node("a"));
    assert!(g.is_connected("a", "c").unwrap());
    assert_eq!(g.weights("a", "c").unwrap(), vec!["x".to_string()]);
    assert!(!g.find("a", "c", "x").is_end());
    assert!(g.erase_edge("a", "c", "x").unwrap());
}

#[test]
fn equality_compares_nodes_and_edges() {
    let g = sample();
    let mut other = sample();
    assert_eq!(g, other);

    other.insert_edge(&1, &4, 5).unwrap();
    assert_ne!(g, other);

    other.erase_edge(&1, &4, &5).unwrap();
    assert_eq!(g, other);

    other.insert_node(10);
    assert_ne!(g, other);
}

#[test]
fn equality_with_same_lengths_but_different_edges() {
    let mut a: Graph<i32, i32> = Graph::from([1, 2]);
    let mut b: Graph<i32, i32> = Graph::from([1, 2]);
    a.insert_edge(&1, &2, 1).unwrap();
    b.insert_edge(&2, &1, 1).unwrap();
    assert_ne!(a, b);
}

#[test]
fn cleared_graphs_are_equal() {
    let mut a = sample();
    let mut b = sample();
    b.insert_edge(&1, &4, 5).unwrap();
    a.clear();
    b.clear();
    assert!(a.is_empty() && b.is_empty());
    assert_eq!(a, b);
}
