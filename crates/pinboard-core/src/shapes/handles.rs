//! Connection handles on a node's boundary.

use super::PortId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A connection point on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Handle {
    /// Whether connections end or start here.
    pub kind: HandleKind,
    /// Position in model coordinates.
    pub position: Point,
    /// Port name for outputs that have one.
    pub port: Option<PortId>,
}

/// Direction of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Incoming connections attach here.
    Input,
    /// Outgoing connections start here.
    Output,
}

impl Handle {
    /// Create an input handle.
    pub fn input(position: Point) -> Self {
        Self {
            kind: HandleKind::Input,
            position,
            port: None,
        }
    }

    /// Create an output handle.
    pub fn output(position: Point, port: Option<PortId>) -> Self {
        Self {
            kind: HandleKind::Output,
            position,
            port,
        }
    }

    /// Check if a point (in model coordinates) hits this handle.
    pub fn hit_test(&self, point: Point, radius: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= radius * radius
    }
}
