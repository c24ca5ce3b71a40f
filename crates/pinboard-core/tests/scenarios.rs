//! End-to-end editing scenarios across graph, workspace and interaction.

use kurbo::Point;
use pinboard_core::*;

fn starter_workspace() -> Workspace {
    Workspace::new(&EditorConfig::default())
}

#[test]
fn graph_edit_sequence() {
    let mut ws = starter_workspace();
    let canvas = ws.active_id();

    // Starters: sensor 1 at (150,120), output 2 at (350,200)
    let graph = &ws.active().graph;
    assert_eq!(graph.shape(1).unwrap().kind, ShapeKind::Sensor);
    assert_eq!(graph.shape(1).unwrap().position, Point::new(150.0, 120.0));
    assert_eq!(graph.shape(2).unwrap().kind, ShapeKind::Output);
    assert!(graph.connections().is_empty());

    assert!(ws.active_mut().graph.add_connection(1, 2, None));
    assert_eq!(ws.active().graph.connections(), &[Connection::new(1, 2, None)]);

    let id = ws.add_shape(canvas, ShapeKind::Conditional, Point::new(400.0, 250.0));
    assert_eq!(id, Some(3));

    let graph = &mut ws.active_mut().graph;
    assert!(graph.remove_shape(2).is_some());
    assert!(!graph.contains(2));
    assert!(graph.connections().is_empty());
    assert!(graph.contains(1));
    assert!(graph.contains(3));
}

#[test]
fn lane_capacity_scenario() {
    assert_eq!(
        try_add_lane(&[4, 6], 8),
        Err(CapacityError::Exceeded {
            current: 10,
            requested: 8
        })
    );
    assert_eq!(try_add_lane(&[4, 6], 6), Ok(vec![4, 6, 6]));
}

#[test]
fn lane_capacity_on_port_interface() {
    let mut ws = starter_workspace();
    let port = ws.add_shape_to_active(ShapeKind::PortInterface, Point::new(500.0, 100.0));
    let graph = &mut ws.active_mut().graph;

    assert_eq!(graph.try_add_lane(port, 4), Ok(true));
    assert_eq!(graph.try_add_lane(port, 6), Ok(true));
    assert!(graph.try_add_lane(port, 8).is_err());
    assert_eq!(graph.try_add_lane(port, 6), Ok(true));

    let config = graph.shape(port).unwrap().config.as_port_interface().unwrap();
    assert_eq!(config.lanes(), &[4, 6, 6]);

    // Not a port interface
    assert_eq!(graph.try_add_lane(1, 2), Ok(false));
}

#[test]
fn workspace_tab_scenario() {
    let mut ws = starter_workspace();
    assert_eq!(ws.ids(), vec![1]);

    assert_eq!(ws.duplicate_canvas(1), Some(2));
    assert_eq!(ws.index_of(2), Some(1));

    assert!(ws.reorder_canvases(1, 0));
    assert_eq!(ws.ids(), vec![2, 1]);

    assert!(ws.remove_canvas(2));
    assert_eq!(ws.ids(), vec![1]);
    assert_eq!(ws.active_id(), 1);
}

#[test]
fn pointer_session_on_active_canvas() {
    let config = EditorConfig::default();
    let mut ws = Workspace::new(&config);
    let mut machine = InteractionMachine::new(&config);
    let camera = Camera::new();

    let events = [
        // Wire sensor -> output
        PointerEvent::down(270.0, 150.0),
        PointerEvent::moved(380.0, 220.0),
        PointerEvent::up(400.0, 230.0),
        // Drag the output into the trash
        PointerEvent::down(360.0, 210.0),
        PointerEvent::moved(40.0, 530.0),
        PointerEvent::up(40.0, 530.0),
    ];
    let edits: Vec<EditEvent> = events
        .into_iter()
        .filter_map(|event| machine.handle(event, &mut ws.active_mut().graph, &camera))
        .collect();

    assert_eq!(edits.first(), Some(&EditEvent::Connected(Connection::new(1, 2, None))));
    assert_eq!(edits.last(), Some(&EditEvent::ShapeDeleted { shape: 2 }));
    let graph = &ws.active().graph;
    assert_eq!(graph.shape_ids(), &[1]);
    assert!(graph.connections().is_empty());
}

#[test]
fn snapshot_is_detached() {
    let mut ws = starter_workspace();
    let snapshot = ws.snapshot();
    ws.active_mut().graph.remove_shape(1);
    ws.rename_canvas(1, "Changed");

    assert_eq!(snapshot.active, 1);
    assert_eq!(snapshot.canvases[0].name, "Canvas 1");
    assert!(snapshot.canvases[0].graph.contains(1));
}

#[test]
fn snapshot_serializes() {
    let ws = starter_workspace();
    let json = serde_json::to_string(&ws.snapshot()).unwrap();
    let back: WorkspaceSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ws.snapshot());
}
