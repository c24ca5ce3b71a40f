//! Property tests for graph and workspace invariants.

use kurbo::Point;
use pinboard_core::*;
use proptest::prelude::*;

fn kind_strategy() -> impl Strategy<Value = ShapeKind> {
    prop::sample::select(ShapeKind::ALL.to_vec())
}

fn point_strategy() -> impl Strategy<Value = Point> {
    (0.0..800.0f64, 0.0..600.0f64).prop_map(|(x, y)| Point::new(x, y))
}

#[derive(Debug, Clone)]
enum GraphOp {
    Add(ShapeKind, Point),
    /// Remove the n-th live shape (modulo count).
    Remove(usize),
    /// Connect the n-th and m-th live shapes.
    Connect(usize, usize),
}

fn op_strategy() -> impl Strategy<Value = GraphOp> {
    prop_oneof![
        (kind_strategy(), point_strategy()).prop_map(|(k, p)| GraphOp::Add(k, p)),
        any::<usize>().prop_map(GraphOp::Remove),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| GraphOp::Connect(a, b)),
    ]
}

fn nth_live(graph: &Graph, n: usize) -> Option<ShapeId> {
    let ids = graph.shape_ids();
    (!ids.is_empty()).then(|| ids[n % ids.len()])
}

/// Apply `ops`, returning every id handed out by `add_shape`.
fn apply(graph: &mut Graph, ids: &mut IdAllocator, ops: &[GraphOp]) -> Vec<ShapeId> {
    let mut issued = Vec::new();
    for op in ops {
        match *op {
            GraphOp::Add(kind, position) => issued.push(graph.add_shape(ids, kind, position)),
            GraphOp::Remove(n) => {
                if let Some(id) = nth_live(graph, n) {
                    graph.remove_shape(id);
                }
            }
            GraphOp::Connect(a, b) => {
                if let (Some(from), Some(to)) = (nth_live(graph, a), nth_live(graph, b)) {
                    graph.add_connection(from, to, None);
                }
            }
        }
    }
    issued
}

proptest! {
    #[test]
    fn issued_ids_strictly_increase(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut graph = Graph::new();
        let mut ids = IdAllocator::new();
        let issued = apply(&mut graph, &mut ids, &ops);
        prop_assert!(issued.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn connections_only_join_live_shapes(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut graph = Graph::new();
        let mut ids = IdAllocator::new();
        apply(&mut graph, &mut ids, &ops);
        for connection in graph.connections() {
            prop_assert!(connection.from != connection.to);
            prop_assert!(graph.contains(connection.from));
            prop_assert!(graph.contains(connection.to));
        }
    }

    #[test]
    fn remove_is_idempotent(ops in prop::collection::vec(op_strategy(), 1..40), pick in any::<usize>()) {
        let mut graph = Graph::new();
        let mut ids = IdAllocator::new();
        apply(&mut graph, &mut ids, &ops);
        if let Some(id) = nth_live(&graph, pick) {
            graph.remove_shape(id);
            let after_first = graph.clone();
            prop_assert!(graph.remove_shape(id).is_none());
            prop_assert_eq!(graph, after_first);
        }
    }

    #[test]
    fn self_loops_never_mutate(ops in prop::collection::vec(op_strategy(), 1..40), pick in any::<usize>()) {
        let mut graph = Graph::new();
        let mut ids = IdAllocator::new();
        apply(&mut graph, &mut ids, &ops);
        if let Some(id) = nth_live(&graph, pick) {
            let before = graph.connections().to_vec();
            prop_assert!(!graph.add_connection(id, id, None));
            prop_assert_eq!(graph.connections(), before.as_slice());
        }
    }

    #[test]
    fn duplicate_is_structural_copy(
        ops in prop::collection::vec(op_strategy(), 0..30),
        extra_tabs in 0usize..4,
        pick in any::<usize>(),
    ) {
        let mut ws = Workspace::new(&EditorConfig::default());
        for _ in 0..extra_tabs {
            ws.add_canvas();
        }
        let target = ws.ids()[pick % ws.len()];
        ws.set_active(target);
        for op in &ops {
            match *op {
                GraphOp::Add(kind, position) => {
                    ws.add_shape(target, kind, position);
                }
                GraphOp::Remove(n) => {
                    let graph = &mut ws.active_mut().graph;
                    if let Some(id) = nth_live(graph, n) {
                        graph.remove_shape(id);
                    }
                }
                GraphOp::Connect(a, b) => {
                    let graph = &mut ws.active_mut().graph;
                    if let (Some(from), Some(to)) = (nth_live(graph, a), nth_live(graph, b)) {
                        graph.add_connection(from, to, None);
                    }
                }
            }
        }

        let existing_canvases = ws.ids();
        let existing_shapes: Vec<ShapeId> = ws
            .canvases()
            .iter()
            .flat_map(|doc| doc.graph.shape_ids().to_vec())
            .collect();
        let index = ws.index_of(target).unwrap();

        let copy = ws.duplicate_canvas(target).unwrap();
        prop_assert!(!existing_canvases.contains(&copy));
        prop_assert_eq!(ws.index_of(copy), Some(index + 1));

        let original = ws.canvas(target).unwrap();
        let duplicate = ws.canvas(copy).unwrap();
        prop_assert_eq!(&duplicate.code, &original.code);
        prop_assert_eq!(duplicate.name.clone(), format!("{} copy", original.name));
        for id in duplicate.graph.shape_ids() {
            prop_assert!(!existing_shapes.contains(id));
        }
        let mapping = original
            .graph
            .shape_ids()
            .iter()
            .copied()
            .zip(duplicate.graph.shape_ids().iter().copied())
            .collect();
        prop_assert!(original.graph.structurally_eq(&duplicate.graph, &mapping));
    }

    #[test]
    fn reorder_then_inverse_restores(tabs in 1usize..8, from in any::<usize>(), to in any::<usize>()) {
        let mut ws = Workspace::new(&EditorConfig::default());
        for _ in 1..tabs {
            ws.add_canvas();
        }
        let active = ws.active_id();
        let original = ws.ids();
        let (from, to) = (from % tabs, to % tabs);

        ws.reorder_canvases(from, to);
        let mut sorted = ws.ids();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, original.clone());
        prop_assert_eq!(ws.active_id(), active);

        ws.reorder_canvases(to, from);
        prop_assert_eq!(ws.ids(), original);
    }
}
