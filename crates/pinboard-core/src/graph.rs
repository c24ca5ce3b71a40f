//! Shapes and connections of one canvas.

use crate::capacity::CapacityError;
use crate::ids::{IdAllocator, ShapeId};
use crate::shapes::{PortId, Shape, ShapeConfig, ShapeKind};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A directed edge between two shapes.
///
/// Edges have no identity of their own. Two edges with the same endpoints and
/// port may coexist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: ShapeId,
    pub to: ShapeId,
    /// Output port on `from`; `None` for single-output kinds.
    #[serde(default)]
    pub port: Option<PortId>,
}

impl Connection {
    pub fn new(from: ShapeId, to: ShapeId, port: Option<PortId>) -> Self {
        Self { from, to, port }
    }

    /// Whether either endpoint is `id`.
    pub fn touches(&self, id: ShapeId) -> bool {
        self.from == id || self.to == id
    }
}

/// What lies under a point on the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    /// Nothing.
    Empty,
    /// The body of a shape.
    Body(ShapeId),
    /// An output handle of a shape.
    Port { shape: ShapeId, port: Option<PortId> },
}

/// The node and edge sets of one canvas.
///
/// Every connection refers to two live shapes, and no connection is a self
/// loop. Mutations that would break either rule are refused or cascade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    /// All shapes, keyed by ID.
    shapes: HashMap<ShapeId, Shape>,
    /// Paint order of shapes (back to front).
    z_order: Vec<ShapeId>,
    /// Edges in creation order.
    connections: Vec<Connection>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape of `kind` at `position` with its default configuration.
    ///
    /// `ids` is first raised above every id already in the graph, so an
    /// allocator that has never seen this graph cannot reissue a live id.
    pub fn add_shape(&mut self, ids: &mut IdAllocator, kind: ShapeKind, position: Point) -> ShapeId {
        ids.observe(self.max_shape_id());
        let id = ids.next();
        self.insert(Shape::new(id, kind, position));
        id
    }

    /// Insert a shape whose id is not yet in the graph.
    fn insert(&mut self, shape: Shape) {
        let id = shape.id;
        debug_assert!(!self.shapes.contains_key(&id), "shape {id} already present");
        self.shapes.insert(id, shape);
        self.z_order.push(id);
    }

    /// Restore the graph rules on data that did not come through the
    /// mutation methods, such as a deserialized document.
    ///
    /// Shapes are keyed by their own id (the first of a clashing pair wins),
    /// paint order lists every shape exactly once, and connections that are
    /// self loops or reference missing shapes are dropped. Returns how many
    /// connections were dropped.
    pub fn repair(&mut self) -> usize {
        let mut entries: Vec<(ShapeId, Shape)> = self.shapes.drain().collect();
        // Correctly keyed entries first, then by key for a stable outcome.
        entries.sort_by_key(|(key, shape)| (*key != shape.id, *key));
        for (key, shape) in entries {
            if key != shape.id {
                log::warn!("Shape stored under {key} carries id {}", shape.id);
            }
            if self.shapes.contains_key(&shape.id) {
                log::warn!("Dropping duplicate shape {}", shape.id);
                continue;
            }
            self.shapes.insert(shape.id, shape);
        }

        let mut seen = std::collections::HashSet::with_capacity(self.shapes.len());
        let shapes = &self.shapes;
        self.z_order.retain(|id| shapes.contains_key(id) && seen.insert(*id));
        let mut missing: Vec<ShapeId> = self.shapes.keys().copied().filter(|id| !seen.contains(id)).collect();
        missing.sort_unstable();
        self.z_order.extend(missing);

        let before = self.connections.len();
        self.connections
            .retain(|c| c.from != c.to && shapes.contains_key(&c.from) && shapes.contains_key(&c.to));
        let dropped = before - self.connections.len();
        if dropped > 0 {
            log::warn!("Dropped {dropped} invalid connections");
        }
        dropped
    }

    /// Move a shape. Does nothing if the shape is gone.
    pub fn move_shape(&mut self, id: ShapeId, position: Point) {
        match self.shapes.get_mut(&id) {
            Some(shape) => shape.position = position,
            None => log::debug!("move_shape: shape {id} not found"),
        }
    }

    /// Remove a shape and every connection touching it.
    ///
    /// Returns the removed shape, or `None` if it was already gone.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let removed = self.shapes.remove(&id)?;
        self.z_order.retain(|&shape_id| shape_id != id);
        self.remove_connections_touching(id);
        Some(removed)
    }

    /// Connect `from` to `to`.
    ///
    /// Returns false without touching the graph for self loops and for ids
    /// that do not name live shapes.
    pub fn add_connection(&mut self, from: ShapeId, to: ShapeId, port: Option<PortId>) -> bool {
        if from == to {
            log::debug!("add_connection: refusing self loop on {from}");
            return false;
        }
        if !self.contains(from) || !self.contains(to) {
            log::debug!("add_connection: {from} -> {to} references a missing shape");
            return false;
        }
        self.connections.push(Connection::new(from, to, port));
        true
    }

    /// Remove every connection with `id` as an endpoint. Returns how many went.
    pub fn remove_connections_touching(&mut self, id: ShapeId) -> usize {
        let before = self.connections.len();
        self.connections.retain(|c| !c.touches(id));
        before - self.connections.len()
    }

    /// Get a shape by ID.
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// Get a mutable reference to a shape by ID.
    ///
    /// The id is not reachable through this reference; only position and
    /// configuration can change.
    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    /// Whether a shape with this id exists.
    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Shapes in paint order (back to front).
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Shape ids in paint order.
    pub fn shape_ids(&self) -> &[ShapeId] {
        &self.z_order
    }

    /// All connections in creation order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Check if the graph has no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Largest shape id present, `0` when empty.
    pub fn max_shape_id(&self) -> ShapeId {
        self.shapes.keys().copied().max().unwrap_or(0)
    }

    /// Bounding box of all shapes.
    pub fn bounds(&self) -> Option<Rect> {
        self.shapes
            .values()
            .map(Shape::bounds)
            .reduce(|acc, bounds| acc.union(bounds))
    }

    /// Find what lies under `point` (model coordinates).
    ///
    /// Shapes are searched front to back. Output handles win over bodies
    /// because they sit on the body's edge.
    pub fn hit_test(&self, point: Point, handle_radius: f64) -> HitTarget {
        for &id in self.z_order.iter().rev() {
            let Some(shape) = self.shapes.get(&id) else { continue };
            if let Some(port) = shape.hit_test_output(point, handle_radius) {
                return HitTarget::Port { shape: id, port };
            }
            if shape.hit_test(point, 0.0) {
                return HitTarget::Body(id);
            }
        }
        HitTarget::Empty
    }

    /// Current start and end points of a connection, for drawing.
    pub fn connection_endpoints(&self, connection: &Connection) -> Option<(Point, Point)> {
        let from = self.shapes.get(&connection.from)?;
        let to = self.shapes.get(&connection.to)?;
        Some((from.output_anchor(connection.port.as_deref()), to.input_anchor()))
    }

    /// Apply `f` to a shape's configuration. `None` if the shape is gone.
    pub fn update_config<R>(&mut self, id: ShapeId, f: impl FnOnce(&mut ShapeConfig) -> R) -> Option<R> {
        self.shapes.get_mut(&id).map(|shape| f(&mut shape.config))
    }

    /// Add a lane to a port-interface shape.
    ///
    /// `Ok(false)` means there is no port interface with that id; the
    /// configuration is only touched when the lane fits.
    pub fn try_add_lane(&mut self, id: ShapeId, candidate: i64) -> Result<bool, CapacityError> {
        match self
            .shapes
            .get_mut(&id)
            .and_then(|shape| shape.config.as_port_interface_mut())
        {
            Some(port) => port.try_add_lane(candidate).map(|()| true),
            None => {
                log::debug!("try_add_lane: shape {id} is not a port interface");
                Ok(false)
            }
        }
    }

    /// Copy this graph giving every shape a fresh id from `ids`.
    ///
    /// Returns the copy and a map from old to new ids. Paint order, positions,
    /// configurations and connections (remapped) are preserved.
    pub fn deep_copy(&self, ids: &mut IdAllocator) -> (Graph, HashMap<ShapeId, ShapeId>) {
        let mut copy = Graph::new();
        let mut mapping = HashMap::with_capacity(self.shapes.len());
        for shape in self.shapes() {
            let new_id = ids.next();
            mapping.insert(shape.id, new_id);
            copy.insert(Shape {
                id: new_id,
                ..shape.clone()
            });
        }
        copy.connections = self
            .connections
            .iter()
            .filter_map(|c| {
                Some(Connection::new(
                    *mapping.get(&c.from)?,
                    *mapping.get(&c.to)?,
                    c.port.clone(),
                ))
            })
            .collect();
        (copy, mapping)
    }

    /// Check that `other` is this graph with ids renamed through `mapping`.
    pub fn structurally_eq(&self, other: &Graph, mapping: &HashMap<ShapeId, ShapeId>) -> bool {
        if self.len() != other.len() || self.connections.len() != other.connections.len() {
            return false;
        }
        let same_order = self
            .z_order
            .iter()
            .zip(&other.z_order)
            .all(|(a, b)| mapping.get(a) == Some(b));
        let same_shapes = self.shapes().all(|shape| {
            mapping
                .get(&shape.id)
                .and_then(|id| other.shape(*id))
                .is_some_and(|o| o.kind == shape.kind && o.position == shape.position && o.config == shape.config)
        });
        let same_edges = self.connections.iter().zip(&other.connections).all(|(a, b)| {
            mapping.get(&a.from) == Some(&b.from) && mapping.get(&a.to) == Some(&b.to) && a.port == b.port
        });
        same_order && same_shapes && same_edges
    }
}
