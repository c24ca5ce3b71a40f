//! Pointer interaction: dragging shapes, drawing connections, context menu.

use crate::camera::CoordinateTransform;
use crate::config::EditorConfig;
use crate::graph::{Connection, Graph, HitTarget};
use crate::ids::ShapeId;
use crate::input::{MouseButton, PointerEvent};
use crate::shapes::PortId;
use kurbo::{Point, Rect, Size, Vec2};

/// Size of one context menu row in screen pixels.
pub const MENU_ITEM_SIZE: Size = Size::new(120.0, 28.0);

/// Entries of the shape context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuItem {
    Delete,
}

impl MenuItem {
    /// Menu entries in display order.
    pub const ALL: [MenuItem; 1] = [MenuItem::Delete];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Delete => "Delete",
        }
    }

    /// Screen rectangle of this entry for a menu opened at `origin`.
    pub fn rect(self, origin: Point) -> Rect {
        let index = Self::ALL.iter().position(|&item| item == self).unwrap_or(0);
        let top_left = origin + Vec2::new(0.0, MENU_ITEM_SIZE.height * index as f64);
        Rect::from_origin_size(top_left, MENU_ITEM_SIZE)
    }

    /// Entry under `point` for a menu opened at `origin`.
    pub fn at(origin: Point, point: Point) -> Option<MenuItem> {
        Self::ALL
            .into_iter()
            .find(|item| item.rect(origin).contains(point))
    }
}

/// State of the pointer gesture in progress.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    /// Waiting for a gesture.
    #[default]
    Idle,
    /// A shape follows the pointer.
    DraggingShape {
        shape: ShapeId,
        /// Pointer position minus shape position at grab time (model units).
        grab_offset: Vec2,
    },
    /// A connection is being drawn from an output handle.
    ConnectingFrom { shape: ShapeId, port: Option<PortId> },
    /// The context menu for a shape is showing.
    ContextMenuOpen { shape: ShapeId, screen_position: Point },
}

/// What a handled event did, for the shell and for logging.
#[derive(Debug, Clone, PartialEq)]
pub enum EditEvent {
    ShapeMoved { shape: ShapeId, position: Point },
    ShapeDeleted { shape: ShapeId },
    Connected(Connection),
    /// Released on a body but the graph refused the edge.
    ConnectionRejected { from: ShapeId, to: ShapeId },
    MenuOpened { shape: ShapeId, screen_position: Point },
    MenuClosed { shape: ShapeId },
}

/// Transient feedback for the renderer. Never part of the model.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionView {
    /// The dragged shape overlaps the trash region.
    pub trash_hover: bool,
    /// Line from the source handle to the pointer (model coordinates).
    pub connect_preview: Option<(Point, Point)>,
    /// Shape under the pointer while idle.
    pub hovered: Option<ShapeId>,
    /// Shape and screen position of the open context menu.
    pub context_menu: Option<(ShapeId, Point)>,
}

/// Turns pointer events into graph edits.
#[derive(Debug, Clone)]
pub struct InteractionMachine {
    state: InteractionState,
    trash_region: Rect,
    handle_radius: f64,
    trash_hover: bool,
    /// Last pointer position in model coordinates.
    pointer: Option<Point>,
    hovered: Option<ShapeId>,
}

impl InteractionMachine {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            state: InteractionState::Idle,
            trash_region: config.trash_region,
            handle_radius: config.handle_radius,
            trash_hover: false,
            pointer: None,
            hovered: None,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == InteractionState::Idle
    }

    pub fn trash_region(&self) -> Rect {
        self.trash_region
    }

    /// Feed one pointer event. `graph` is the active canvas's graph.
    pub fn handle<T>(&mut self, event: PointerEvent, graph: &mut Graph, transform: &T) -> Option<EditEvent>
    where
        T: CoordinateTransform + ?Sized,
    {
        match event {
            PointerEvent::Down { position, button } => self.pointer_down(position, button, graph, transform),
            PointerEvent::Move { position } => self.pointer_move(position, graph, transform),
            PointerEvent::Up { position, .. } => self.pointer_up(position, graph, transform),
            PointerEvent::Scroll { .. } => None,
        }
    }

    /// Recompute the trash highlight after the view changed under a drag.
    pub fn refresh_trash_hover<T>(&mut self, graph: &Graph, transform: &T)
    where
        T: CoordinateTransform + ?Sized,
    {
        self.trash_hover = match self.state {
            InteractionState::DraggingShape { shape, .. } => graph
                .shape(shape)
                .is_some_and(|s| self.overlaps_trash(s.bounds(), transform)),
            _ => false,
        };
    }

    /// Screen-space overlap of model bounds with the trash. Touching edges do not count.
    fn overlaps_trash<T>(&self, bounds: Rect, transform: &T) -> bool
    where
        T: CoordinateTransform + ?Sized,
    {
        transform.rect_to_screen(bounds).intersect(self.trash_region).area() > 0.0
    }

    fn pointer_down<T>(
        &mut self,
        position: Point,
        button: MouseButton,
        graph: &mut Graph,
        transform: &T,
    ) -> Option<EditEvent>
    where
        T: CoordinateTransform + ?Sized,
    {
        // Any click while the menu is up closes it; a click on an entry runs it first.
        if let InteractionState::ContextMenuOpen { shape, screen_position } = self.state {
            if button == MouseButton::Left {
                if let Some(item) = MenuItem::at(screen_position, position) {
                    return self.select_menu_item(item, graph);
                }
            }
            self.state = InteractionState::Idle;
            log::debug!("Context menu for shape {shape} dismissed");
            return Some(EditEvent::MenuClosed { shape });
        }

        self.finish_gesture();
        let model = transform.to_model_space(position);
        self.pointer = Some(model);

        match (button, graph.hit_test(model, self.handle_radius)) {
            (MouseButton::Right, HitTarget::Body(shape) | HitTarget::Port { shape, .. }) => {
                self.state = InteractionState::ContextMenuOpen {
                    shape,
                    screen_position: position,
                };
                Some(EditEvent::MenuOpened {
                    shape,
                    screen_position: position,
                })
            }
            (MouseButton::Left, HitTarget::Port { shape, port }) => {
                log::debug!("Connecting from shape {shape} port {port:?}");
                self.state = InteractionState::ConnectingFrom { shape, port };
                None
            }
            (MouseButton::Left, HitTarget::Body(shape)) => {
                let origin = graph.shape(shape)?.position;
                self.state = InteractionState::DraggingShape {
                    shape,
                    grab_offset: model - origin,
                };
                None
            }
            _ => None,
        }
    }

    fn pointer_move<T>(&mut self, position: Point, graph: &mut Graph, transform: &T) -> Option<EditEvent>
    where
        T: CoordinateTransform + ?Sized,
    {
        let model = transform.to_model_space(position);
        self.pointer = Some(model);

        match self.state {
            InteractionState::DraggingShape { shape, grab_offset } => {
                let Some(bounds) = graph.shape(shape).map(|s| s.bounds()) else {
                    // Deleted underneath us
                    self.state = InteractionState::Idle;
                    self.trash_hover = false;
                    return None;
                };
                let target = model - grab_offset;
                graph.move_shape(shape, target);

                self.trash_hover = self.overlaps_trash(bounds.with_origin(target), transform);
                Some(EditEvent::ShapeMoved {
                    shape,
                    position: target,
                })
            }
            InteractionState::Idle => {
                self.hovered = match graph.hit_test(model, self.handle_radius) {
                    HitTarget::Body(shape) | HitTarget::Port { shape, .. } => Some(shape),
                    HitTarget::Empty => None,
                };
                None
            }
            InteractionState::ConnectingFrom { .. } | InteractionState::ContextMenuOpen { .. } => None,
        }
    }

    fn pointer_up<T>(&mut self, position: Point, graph: &mut Graph, transform: &T) -> Option<EditEvent>
    where
        T: CoordinateTransform + ?Sized,
    {
        self.refresh_trash_hover(graph, transform);
        let state = std::mem::take(&mut self.state);
        let trash_hover = self.trash_hover;
        self.finish_gesture();

        match state {
            InteractionState::DraggingShape { shape, .. } if trash_hover => {
                graph.remove_shape(shape)?;
                log::info!("Shape {shape} dropped on trash");
                Some(EditEvent::ShapeDeleted { shape })
            }
            InteractionState::DraggingShape { .. } | InteractionState::Idle => None,
            InteractionState::ConnectingFrom { shape: from, port } => {
                let model = transform.to_model_space(position);
                let HitTarget::Body(to) = graph.hit_test(model, self.handle_radius) else {
                    return None;
                };
                if graph.add_connection(from, to, port.clone()) {
                    Some(EditEvent::Connected(Connection::new(from, to, port)))
                } else {
                    Some(EditEvent::ConnectionRejected { from, to })
                }
            }
            // The release of the click that opened the menu keeps it open.
            menu @ InteractionState::ContextMenuOpen { .. } => {
                self.state = menu;
                None
            }
        }
    }

    /// Run a context menu entry, then close the menu.
    pub fn select_menu_item(&mut self, item: MenuItem, graph: &mut Graph) -> Option<EditEvent> {
        let InteractionState::ContextMenuOpen { shape, .. } = self.state else {
            return None;
        };
        self.state = InteractionState::Idle;
        match item {
            MenuItem::Delete => {
                graph.remove_shape(shape);
                log::info!("Shape {shape} deleted from context menu");
                Some(EditEvent::ShapeDeleted { shape })
            }
        }
    }

    /// Close the context menu if it is open.
    pub fn close_menu(&mut self) -> Option<EditEvent> {
        let InteractionState::ContextMenuOpen { shape, .. } = self.state else {
            return None;
        };
        self.state = InteractionState::Idle;
        Some(EditEvent::MenuClosed { shape })
    }

    /// Abandon whatever is in progress.
    pub fn reset(&mut self) {
        self.state = InteractionState::Idle;
        self.finish_gesture();
        self.pointer = None;
        self.hovered = None;
    }

    fn finish_gesture(&mut self) {
        self.trash_hover = false;
        if !matches!(self.state, InteractionState::ContextMenuOpen { .. }) {
            self.state = InteractionState::Idle;
        }
    }

    /// Transient feedback for drawing the current frame.
    pub fn view(&self, graph: &Graph) -> InteractionView {
        let connect_preview = match (&self.state, self.pointer) {
            (InteractionState::ConnectingFrom { shape, port }, Some(pointer)) => graph
                .shape(*shape)
                .map(|s| (s.output_anchor(port.as_deref()), pointer)),
            _ => None,
        };
        let context_menu = match self.state {
            InteractionState::ContextMenuOpen { shape, screen_position } => Some((shape, screen_position)),
            _ => None,
        };
        InteractionView {
            trash_hover: self.trash_hover,
            connect_preview,
            hovered: if self.is_idle() { self.hovered } else { None },
            context_menu,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{Camera, IdentityTransform};
    use crate::ids::IdAllocator;
    use crate::shapes::{PORT_FALSE, PORT_TRUE, ShapeKind};

    /// Sensor 1 at (150,120) and output 2 at (350,200).
    fn setup() -> (InteractionMachine, Graph) {
        let mut ids = IdAllocator::new();
        let mut graph = Graph::new();
        graph.add_shape(&mut ids, ShapeKind::Sensor, Point::new(150.0, 120.0));
        graph.add_shape(&mut ids, ShapeKind::Output, Point::new(350.0, 200.0));
        (InteractionMachine::new(&EditorConfig::default()), graph)
    }

    fn feed(machine: &mut InteractionMachine, graph: &mut Graph, events: &[PointerEvent]) -> Vec<EditEvent> {
        events
            .iter()
            .filter_map(|&event| machine.handle(event, graph, &IdentityTransform))
            .collect()
    }

    #[test]
    fn test_drag_keeps_grab_offset() {
        let (mut machine, mut graph) = setup();
        machine.handle(PointerEvent::down(160.0, 130.0), &mut graph, &IdentityTransform);
        assert_eq!(
            machine.state(),
            &InteractionState::DraggingShape {
                shape: 1,
                grab_offset: Vec2::new(10.0, 10.0)
            }
        );

        let event = machine.handle(PointerEvent::moved(210.0, 180.0), &mut graph, &IdentityTransform);
        assert_eq!(
            event,
            Some(EditEvent::ShapeMoved {
                shape: 1,
                position: Point::new(200.0, 170.0)
            })
        );
        assert_eq!(graph.shape(1).unwrap().position, Point::new(200.0, 170.0));

        assert_eq!(machine.handle(PointerEvent::up(210.0, 180.0), &mut graph, &IdentityTransform), None);
        assert!(machine.is_idle());
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_drag_through_camera() {
        let (mut machine, mut graph) = setup();
        let mut camera = Camera::new();
        camera.zoom = 2.0;
        // Sensor top-left (150,120) is at screen (300,240)
        machine.handle(PointerEvent::down(310.0, 250.0), &mut graph, &camera);
        machine.handle(PointerEvent::moved(330.0, 250.0), &mut graph, &camera);
        assert_eq!(graph.shape(1).unwrap().position, Point::new(160.0, 120.0));
    }

    #[test]
    fn test_drop_on_trash_deletes_with_edges() {
        let (mut machine, mut graph) = setup();
        assert!(graph.add_connection(1, 2, None));

        machine.handle(PointerEvent::down(160.0, 130.0), &mut graph, &IdentityTransform);
        machine.handle(PointerEvent::moved(50.0, 540.0), &mut graph, &IdentityTransform);
        assert!(machine.view(&graph).trash_hover);

        let event = machine.handle(PointerEvent::up(50.0, 540.0), &mut graph, &IdentityTransform);
        assert_eq!(event, Some(EditEvent::ShapeDeleted { shape: 1 }));
        assert!(!graph.contains(1));
        assert!(graph.connections().is_empty());
        assert!(machine.is_idle());
        assert!(!machine.view(&graph).trash_hover);
    }

    #[test]
    fn test_drop_on_trash_through_zoomed_camera() {
        let (mut machine, mut graph) = setup();
        let mut camera = Camera::new();
        camera.zoom = 2.0;
        camera.offset = Vec2::new(-200.0, -200.0);
        // Sensor top-left (150,120) is at screen (100,40)
        machine.handle(PointerEvent::down(110.0, 50.0), &mut graph, &camera);
        machine.handle(PointerEvent::moved(40.0, 540.0), &mut graph, &camera);
        assert_eq!(graph.shape(1).unwrap().position, Point::new(115.0, 365.0));
        // Model position is far from the trash; its screen rect is not
        assert_eq!(graph.shape(1).unwrap().bounds().intersect(machine.trash_region()).area(), 0.0);
        assert!(machine.view(&graph).trash_hover);

        let event = machine.handle(PointerEvent::up(40.0, 540.0), &mut graph, &camera);
        assert_eq!(event, Some(EditEvent::ShapeDeleted { shape: 1 }));
    }

    #[test]
    fn test_pan_during_drag_moves_off_trash() {
        let (mut machine, mut graph) = setup();
        let mut camera = Camera::new();
        machine.handle(PointerEvent::down(160.0, 130.0), &mut graph, &camera);
        machine.handle(PointerEvent::moved(50.0, 540.0), &mut graph, &camera);
        assert!(machine.view(&graph).trash_hover);

        camera.pan(Vec2::new(0.0, -300.0));
        machine.refresh_trash_hover(&graph, &camera);
        assert!(!machine.view(&graph).trash_hover);

        assert_eq!(machine.handle(PointerEvent::up(50.0, 540.0), &mut graph, &camera), None);
        assert!(graph.contains(1));
    }

    #[test]
    fn test_release_uses_current_view() {
        let (mut machine, mut graph) = setup();
        let mut camera = Camera::new();
        machine.handle(PointerEvent::down(160.0, 130.0), &mut graph, &camera);
        machine.handle(PointerEvent::moved(50.0, 540.0), &mut graph, &camera);

        // View changed without a refresh; the release still checks the trash again
        camera.pan(Vec2::new(300.0, 0.0));
        assert_eq!(machine.handle(PointerEvent::up(50.0, 540.0), &mut graph, &camera), None);
        assert!(graph.contains(1));
    }

    #[test]
    fn test_leaving_trash_clears_highlight() {
        let (mut machine, mut graph) = setup();
        feed(
            &mut machine,
            &mut graph,
            &[
                PointerEvent::down(160.0, 130.0),
                PointerEvent::moved(50.0, 540.0),
                PointerEvent::moved(400.0, 400.0),
                PointerEvent::up(400.0, 400.0),
            ],
        );
        assert!(graph.contains(1));
        assert_eq!(graph.shape(1).unwrap().position, Point::new(390.0, 390.0));
    }

    #[test]
    fn test_connect_output_to_body() {
        let (mut machine, mut graph) = setup();
        // Sensor output handle sits on its right edge at mid height
        machine.handle(PointerEvent::down(270.0, 150.0), &mut graph, &IdentityTransform);
        assert_eq!(
            machine.state(),
            &InteractionState::ConnectingFrom { shape: 1, port: None }
        );

        machine.handle(PointerEvent::moved(300.0, 160.0), &mut graph, &IdentityTransform);
        assert_eq!(
            machine.view(&graph).connect_preview,
            Some((Point::new(270.0, 150.0), Point::new(300.0, 160.0)))
        );

        let event = machine.handle(PointerEvent::up(410.0, 230.0), &mut graph, &IdentityTransform);
        assert_eq!(event, Some(EditEvent::Connected(Connection::new(1, 2, None))));
        assert_eq!(graph.connections(), &[Connection::new(1, 2, None)]);
        assert!(machine.is_idle());
    }

    #[test]
    fn test_connect_from_conditional_port() {
        let (mut machine, mut graph) = setup();
        let mut ids = IdAllocator::new();
        let cond = graph.add_shape(&mut ids, ShapeKind::Conditional, Point::new(0.0, 300.0));
        let bounds = graph.shape(cond).unwrap().bounds();

        let false_port = Point::new(bounds.x1, bounds.y0 + bounds.height() * 0.7);
        feed(
            &mut machine,
            &mut graph,
            &[
                PointerEvent::down(false_port.x, false_port.y),
                PointerEvent::up(410.0, 230.0),
            ],
        );
        assert_eq!(graph.connections()[0].port.as_deref(), Some(PORT_FALSE));

        let true_port = Point::new(bounds.x1, bounds.y0 + bounds.height() * 0.3);
        feed(
            &mut machine,
            &mut graph,
            &[
                PointerEvent::down(true_port.x, true_port.y),
                PointerEvent::up(200.0, 150.0),
            ],
        );
        assert_eq!(graph.connections()[1], Connection::new(cond, 1, Some(PORT_TRUE.to_string())));
    }

    #[test]
    fn test_self_loop_rejected() {
        let (mut machine, mut graph) = setup();
        machine.handle(PointerEvent::down(270.0, 150.0), &mut graph, &IdentityTransform);
        let event = machine.handle(PointerEvent::up(200.0, 150.0), &mut graph, &IdentityTransform);
        assert_eq!(event, Some(EditEvent::ConnectionRejected { from: 1, to: 1 }));
        assert!(graph.connections().is_empty());
        assert!(machine.is_idle());
    }

    #[test]
    fn test_release_on_empty_space_is_ignored() {
        let (mut machine, mut graph) = setup();
        let events = feed(
            &mut machine,
            &mut graph,
            &[PointerEvent::down(270.0, 150.0), PointerEvent::up(700.0, 700.0)],
        );
        assert!(events.is_empty());
        assert!(graph.connections().is_empty());
        assert!(machine.is_idle());
    }

    #[test]
    fn test_context_menu_delete() {
        let (mut machine, mut graph) = setup();
        graph.add_connection(1, 2, None);

        let opened = machine.handle(PointerEvent::right_click(400.0, 220.0), &mut graph, &IdentityTransform);
        assert_eq!(
            opened,
            Some(EditEvent::MenuOpened {
                shape: 2,
                screen_position: Point::new(400.0, 220.0)
            })
        );
        // Releasing the right button leaves the menu up
        machine.handle(
            PointerEvent::Up {
                position: Point::new(400.0, 220.0),
                button: MouseButton::Right,
            },
            &mut graph,
            &IdentityTransform,
        );
        assert_eq!(machine.view(&graph).context_menu, Some((2, Point::new(400.0, 220.0))));

        let entry = MenuItem::Delete.rect(Point::new(400.0, 220.0)).center();
        let event = machine.handle(PointerEvent::down(entry.x, entry.y), &mut graph, &IdentityTransform);
        assert_eq!(event, Some(EditEvent::ShapeDeleted { shape: 2 }));
        assert!(!graph.contains(2));
        assert!(graph.connections().is_empty());
        assert!(machine.is_idle());
    }

    #[test]
    fn test_click_elsewhere_closes_menu() {
        let (mut machine, mut graph) = setup();
        machine.handle(PointerEvent::right_click(160.0, 130.0), &mut graph, &IdentityTransform);

        // A click on another shape only dismisses the menu
        let event = machine.handle(PointerEvent::down(400.0, 220.0), &mut graph, &IdentityTransform);
        assert_eq!(event, Some(EditEvent::MenuClosed { shape: 1 }));
        assert!(machine.is_idle());
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_right_click_empty_space() {
        let (mut machine, mut graph) = setup();
        let event = machine.handle(PointerEvent::right_click(700.0, 10.0), &mut graph, &IdentityTransform);
        assert_eq!(event, None);
        assert!(machine.is_idle());
    }

    #[test]
    fn test_select_menu_item_without_menu() {
        let (mut machine, mut graph) = setup();
        assert_eq!(machine.select_menu_item(MenuItem::Delete, &mut graph), None);
        assert_eq!(graph.len(), 2);
        assert_eq!(machine.close_menu(), None);
    }

    #[test]
    fn test_hover_only_when_idle() {
        let (mut machine, mut graph) = setup();
        machine.handle(PointerEvent::moved(160.0, 130.0), &mut graph, &IdentityTransform);
        assert_eq!(machine.view(&graph).hovered, Some(1));
        machine.handle(PointerEvent::moved(700.0, 700.0), &mut graph, &IdentityTransform);
        assert_eq!(machine.view(&graph).hovered, None);
    }

    #[test]
    fn test_shape_removed_mid_drag() {
        let (mut machine, mut graph) = setup();
        machine.handle(PointerEvent::down(160.0, 130.0), &mut graph, &IdentityTransform);
        graph.remove_shape(1);
        assert_eq!(machine.handle(PointerEvent::moved(170.0, 140.0), &mut graph, &IdentityTransform), None);
        assert!(machine.is_idle());
    }

    #[test]
    fn test_reset() {
        let (mut machine, mut graph) = setup();
        machine.handle(PointerEvent::down(160.0, 130.0), &mut graph, &IdentityTransform);
        machine.handle(PointerEvent::moved(50.0, 540.0), &mut graph, &IdentityTransform);
        machine.reset();
        assert!(machine.is_idle());
        assert_eq!(machine.view(&graph), InteractionView::default());
    }
}
