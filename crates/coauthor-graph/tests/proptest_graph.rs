//! Property-based tests for graph construction and queries.

use proptest::prelude::*;

use coauthor_core::Row;
use coauthor_graph::{build, shortest_path, shortest_paths_from, summarize, Category};

/// Small author pool so random rows collide often.
fn author() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Ann", "bob", "Cy", "DEE", "ed", "Flo", "'gus'", "Hal "])
        .prop_map(str::to_string)
}

fn row() -> impl Strategy<Value = Row> {
    (author(), prop::collection::vec(author(), 0..4)).prop_map(|(main, coauthors)| {
        Row::new(main, coauthors.join(", "), "paper")
    })
}

fn rows() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec(row(), 0..20)
}

// --- Construction invariants ---

proptest! {
    #[test]
    fn weights_are_symmetric_and_loop_free(rows in rows()) {
        let (graph, _) = build(&rows);
        prop_assert!(graph.invariants_hold());

        let keys: Vec<String> = graph.authors().map(|(k, _)| k.to_string()).collect();
        for u in &keys {
            prop_assert_eq!(graph.weight(u, u), 0);
            for v in &keys {
                prop_assert_eq!(graph.weight(u, v), graph.weight(v, u));
            }
        }
    }

    #[test]
    fn total_weight_counts_row_links(rows in rows()) {
        let (graph, _) = build(&rows);

        let total: u64 = graph.authors().map(|(_, id)| graph.total_weight(id)).sum();
        let edge_sum: u64 = graph.export_edges().iter().map(|e| u64::from(e.weight)).sum();
        prop_assert_eq!(total, 2 * edge_sum);
    }

    #[test]
    fn every_named_author_is_a_node(rows in rows()) {
        let (graph, papers) = build(&rows);
        for row in &rows {
            prop_assert!(graph.contains(&row.author_name));
            prop_assert!(!papers.lookup(&row.author_name).is_empty());
        }
    }
}

// --- Query properties ---

proptest! {
    #[test]
    fn triangle_inequality_holds(rows in rows()) {
        let (graph, _) = build(&rows);
        let keys: Vec<String> = graph.authors().map(|(k, _)| k.to_string()).collect();

        for a in &keys {
            let from_a = shortest_paths_from(&graph, a).unwrap();
            for b in &keys {
                let from_b = shortest_paths_from(&graph, b).unwrap();
                for c in &keys {
                    let (ac, ab, bc) = (
                        from_a[c].distance.value(),
                        from_a[b].distance.value(),
                        from_b[c].distance.value(),
                    );
                    if let (Some(ac), Some(ab), Some(bc)) = (ac, ab, bc) {
                        prop_assert!(ac <= ab + bc);
                    }
                }
            }
        }
    }

    #[test]
    fn single_pair_matches_all_paths(rows in rows()) {
        let (graph, _) = build(&rows);
        let keys: Vec<String> = graph.authors().map(|(k, _)| k.to_string()).collect();

        if let Some(source) = keys.first() {
            let all = shortest_paths_from(&graph, source).unwrap();
            for target in &keys {
                match shortest_path(&graph, source, target) {
                    Ok(route) => prop_assert_eq!(&route, &all[target]),
                    Err(_) => prop_assert!(all[target].path.is_empty()),
                }
            }
        }
    }

    #[test]
    fn uniform_rows_classify_low(n in 3usize..8) {
        // A ring where every author has total weight 2.
        let names: Vec<String> = (0..n).map(|i| format!("author {}", i)).collect();
        let rows: Vec<Row> = (0..n)
            .map(|i| Row::new(names[i].clone(), names[(i + 1) % n].clone(), "p"))
            .collect();
        let (graph, papers) = build(&rows);

        let summary = summarize(&graph, &papers);
        prop_assert!(summary.nodes.iter().all(|node| node.category == Category::Low));
    }
}
