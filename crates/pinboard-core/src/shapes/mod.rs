//! Node definitions for the diagram.

mod config;
mod handles;

pub use config::{
    CommConfig, CommKind, GpioBank, PortInterfaceConfig, ShapeConfig, TemperatureConfig,
    TemperatureUnit,
};
pub use handles::{Handle, HandleKind};

use crate::ids::ShapeId;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Name of an output handle. `None` addresses the single default output.
pub type PortId = String;

/// Output port of a conditional taken when the condition holds.
pub const PORT_TRUE: &str = "true";
/// Output port of a conditional taken when the condition fails.
pub const PORT_FALSE: &str = "false";

/// The closed set of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Sensor,
    TemperatureSensor,
    Output,
    Conditional,
    PortInterface,
}

impl ShapeKind {
    /// All kinds, in palette order.
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Sensor,
        ShapeKind::TemperatureSensor,
        ShapeKind::Output,
        ShapeKind::Conditional,
        ShapeKind::PortInterface,
    ];

    /// Footprint of a node of this kind, in model units.
    pub fn size(self) -> Size {
        match self {
            ShapeKind::Sensor | ShapeKind::Output => Size::new(120.0, 60.0),
            ShapeKind::TemperatureSensor => Size::new(140.0, 110.0),
            ShapeKind::Conditional => Size::new(140.0, 64.0),
            ShapeKind::PortInterface => Size::new(200.0, 260.0),
        }
    }

    /// Output ports and their vertical placement as a fraction of the height.
    pub fn output_ports(self) -> &'static [(Option<&'static str>, f64)] {
        match self {
            ShapeKind::Conditional => &[(Some(PORT_TRUE), 0.3), (Some(PORT_FALSE), 0.7)],
            _ => &[(None, 0.5)],
        }
    }

    /// Title shown in the node header.
    pub fn title(self) -> &'static str {
        match self {
            ShapeKind::Sensor => "Sensor",
            ShapeKind::TemperatureSensor => "Temperature Sensor",
            ShapeKind::Output => "Output",
            ShapeKind::Conditional => "If Condition",
            ShapeKind::PortInterface => "Port Interface",
        }
    }
}

/// A node in the diagram graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub(crate) id: ShapeId,
    /// Node kind (fixed for the node's lifetime).
    pub kind: ShapeKind,
    /// Top-left corner in model coordinates.
    pub position: Point,
    /// Kind-specific configuration.
    pub config: ShapeConfig,
}

impl Shape {
    /// Create a node with the default configuration for its kind.
    pub(crate) fn new(id: ShapeId, kind: ShapeKind, position: Point) -> Self {
        Self {
            id,
            kind,
            position,
            config: ShapeConfig::default_for(kind),
        }
    }

    /// Get the unique identifier.
    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Bounding box in model coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.kind.size())
    }

    /// Check if a point (in model coordinates) falls on the node body.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    /// The connection handles of this node, input first.
    pub fn handles(&self) -> Vec<Handle> {
        let bounds = self.bounds();
        let mut handles = vec![Handle::input(Point::new(bounds.x0, bounds.center().y))];
        for &(port, fraction) in self.kind.output_ports() {
            let y = bounds.y0 + bounds.height() * fraction;
            handles.push(Handle::output(
                Point::new(bounds.x1, y),
                port.map(str::to_string),
            ));
        }
        handles
    }

    /// Where incoming connections attach.
    pub fn input_anchor(&self) -> Point {
        let bounds = self.bounds();
        Point::new(bounds.x0, bounds.center().y)
    }

    /// Where outgoing connections on `port` attach.
    ///
    /// Unknown port names fall back to the first output so that every
    /// connection can still be drawn.
    pub fn output_anchor(&self, port: Option<&str>) -> Point {
        let outputs: Vec<Handle> = self
            .handles()
            .into_iter()
            .filter(|h| h.kind == HandleKind::Output)
            .collect();
        outputs
            .iter()
            .find(|h| h.port.as_deref() == port)
            .or_else(|| outputs.first())
            .map(|h| h.position)
            .unwrap_or_else(|| self.bounds().center())
    }

    /// Hit test the output handles, returning the port under `point`.
    pub fn hit_test_output(&self, point: Point, radius: f64) -> Option<Option<PortId>> {
        self.handles()
            .into_iter()
            .filter(|h| h.kind == HandleKind::Output)
            .find(|h| h.hit_test(point, radius))
            .map(|h| h.port)
    }
}
