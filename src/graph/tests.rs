#[cfg(test)]
mod tests {
    use crate::error::TimingError;
    use crate::graph::{constant, weight_fn, Graph};
    use std::io::Cursor;

    fn s(name: &str) -> String {
        name.to_string()
    }

    fn triangle() -> Graph<String> {
        Graph::with_connections(
            vec![
                (s("A"), s("B"), constant(1.0)),
                (s("B"), s("C"), constant(1.0)),
                (s("A"), s("C"), constant(5.0)),
            ],
            false,
        )
    }

    #[test]
    fn test_undirected_mirrors_edges() {
        let g = triangle();
        assert!(!g.is_directed());
        assert!(g.is_connected(&s("A"), &s("B")));
        assert!(g.is_connected(&s("B"), &s("A")));
        assert_eq!(g.get_weight(&s("C"), &s("A")), 5.0);
        assert_eq!(g.node_list(), vec![s("A"), s("B"), s("C")]);
        assert_eq!(g.edge_list().len(), 6);
    }

    #[test]
    fn test_directed_is_one_way() {
        let g = Graph::with_connections(vec![(s("A"), s("B"), constant(2.0))], true);
        assert!(g.is_connected(&s("A"), &s("B")));
        assert!(!g.is_connected(&s("B"), &s("A")));
        assert_eq!(g.get_weight(&s("B"), &s("A")), 0.0);
        assert_eq!(g.weighted_best_first_path(&s("A"), &s("B")), (2.0, vec![s("A"), s("B")]));
        let (cost, path) = g.weighted_best_first_path(&s("B"), &s("A"));
        assert!(cost.is_infinite());
        assert!(path.is_empty());
        // Target-only nodes still show up.
        assert_eq!(g.node_list(), vec![s("A"), s("B")]);
    }

    #[test]
    fn test_best_first_prefers_cheaper_detour() {
        let g = triangle();
        assert_eq!(g.weighted_best_first_path(&s("A"), &s("C")), (2.0, vec![s("A"), s("B"), s("C")]));
    }

    #[test]
    fn test_bfs_prefers_fewer_hops() {
        let g = triangle();
        assert_eq!(g.unweighted_bfs_path(&s("A"), &s("C")), (5.0, vec![s("A"), s("C")]));
    }

    #[test]
    fn test_path_to_self() {
        let g = triangle();
        assert_eq!(g.weighted_best_first_path(&s("B"), &s("B")), (0.0, vec![s("B")]));
        assert_eq!(g.unweighted_bfs_path(&s("B"), &s("B")), (0.0, vec![s("B")]));
    }

    #[test]
    fn test_unreachable_target() {
        let mut g = triangle();
        g.add_connection(s("X"), s("Y"), constant(1.0));
        let (cost, path) = g.weighted_best_first_path(&s("A"), &s("Y"));
        assert_eq!(cost, f64::INFINITY);
        assert!(path.is_empty());
        let (cost, path) = g.unweighted_bfs_path(&s("A"), &s("Y"));
        assert_eq!(cost, f64::INFINITY);
        assert!(path.is_empty());

        match g.communication_delay(&s("A"), &s("Y")) {
            Err(TimingError::Unreachable { from, to }) => {
                assert_eq!(from, "A");
                assert_eq!(to, "Y");
            }
            other => panic!("Expected Unreachable, got {:?}", other),
        }
        assert_eq!(g.communication_delay(&s("A"), &s("C")).unwrap(), 2.0);
    }

    #[test]
    fn test_equal_costs_follow_insertion_order() {
        let g = Graph::with_connections(
            vec![
                (s("A"), s("B"), constant(1.0)),
                (s("A"), s("C"), constant(1.0)),
                (s("B"), s("D"), constant(1.0)),
                (s("C"), s("D"), constant(1.0)),
            ],
            false,
        );
        assert_eq!(g.weighted_best_first_path(&s("A"), &s("D")), (2.0, vec![s("A"), s("B"), s("D")]));
        assert_eq!(g.unweighted_bfs_path(&s("A"), &s("D")), (2.0, vec![s("A"), s("B"), s("D")]));
    }

    #[test]
    fn test_weight_functions_see_the_graph() {
        // Each hop costs as much as the target's degree.
        let degree = weight_fn(|g: &Graph<u32>, _: &u32, target: &u32| g.neighbours(target).count() as f64);
        let g = Graph::with_connections(
            vec![(1, 2, degree.clone()), (2, 3, degree.clone()), (2, 4, degree.clone()), (1, 4, degree)],
            false,
        );
        assert_eq!(g.get_weight(&1, &2), 3.0);
        assert_eq!(g.get_weight(&2, &1), 2.0);
        assert_eq!(g.weighted_best_first_path(&1, &4), (2.0, vec![1, 4]));
    }

    #[test]
    fn test_remove_node() {
        let mut g = triangle();
        g.remove(&s("B"));
        assert!(!g.is_connected(&s("A"), &s("B")));
        assert_eq!(g.neighbours(&s("A")).cloned().collect::<Vec<_>>(), vec![s("C")]);
        assert_eq!(g.weighted_best_first_path(&s("A"), &s("C")), (5.0, vec![s("A"), s("C")]));
    }

    #[test]
    fn test_display() {
        let g = Graph::with_connections(vec![(s("A"), s("B"), constant(1.5))], true);
        assert_eq!(g.to_string(), "[(A, B, 1.5)]");
    }

    #[test]
    fn test_edge_list_round_trip() {
        let g = triangle();
        let mut buffer = Vec::new();
        g.write_edge_list(&mut buffer).unwrap();

        let restored = Graph::read_edge_list(Cursor::new(buffer)).unwrap();
        assert_eq!(restored.node_list(), g.node_list());
        for (source, target) in g.edge_list() {
            assert_eq!(restored.get_weight(&source, &target), g.get_weight(&source, &target));
        }
        // Each read line keeps its own weight.
        assert_eq!(restored.get_weight(&s("A"), &s("B")), 1.0);
        assert_eq!(restored.get_weight(&s("A"), &s("C")), 5.0);
    }

    #[test]
    fn test_edge_list_quotes_names_with_spaces() {
        let g = Graph::with_connections(vec![(s("front door"), s("gateway"), constant(1.5))], false);
        let mut buffer = Vec::new();
        g.write_edge_list(&mut buffer).unwrap();
        let written = String::from_utf8(buffer.clone()).unwrap();
        assert_eq!(written, "|front door| gateway 1.5\ngateway |front door| 1.5\n");

        let restored = Graph::read_edge_list(Cursor::new(buffer)).unwrap();
        assert_eq!(restored.node_list(), vec![s("front door"), s("gateway")]);
        assert_eq!(restored.get_weight(&s("gateway"), &s("front door")), 1.5);
        assert_eq!(
            restored.weighted_best_first_path(&s("front door"), &s("gateway")),
            (1.5, vec![s("front door"), s("gateway")])
        );
    }

    #[test]
    fn test_read_edge_list_rejects_malformed_lines() {
        let text = "A B 1\n\nB C\n";
        assert!(matches!(
            Graph::read_edge_list(Cursor::new(text)),
            Err(TimingError::InvalidParameter { .. })
        ));
        let text = "A B one\n";
        match Graph::read_edge_list(Cursor::new(text)) {
            Err(TimingError::InvalidParameter { reason, .. }) => assert!(reason.contains("line 1")),
            other => panic!("Expected InvalidParameter, got {:?}", other),
        }
    }
}
