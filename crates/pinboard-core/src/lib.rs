//! Pinboard Core Library
//!
//! Platform-agnostic data structures and logic for the Pinboard diagram
//! editor: the node graph, canvas workspace, pointer interaction and the
//! peripheral lane validator.

pub mod camera;
pub mod canvas;
pub mod capacity;
pub mod config;
pub mod graph;
pub mod ids;
pub mod input;
pub mod interaction;
pub mod shapes;
pub mod tabs;
pub mod workspace;

pub use camera::{Camera, CoordinateTransform, IdentityTransform};
pub use canvas::CanvasDocument;
pub use capacity::{CapacityError, LANE_CAPACITY, try_add_lane};
pub use config::{ConfigError, EditorConfig, StarterShape};
pub use graph::{Connection, Graph, HitTarget};
pub use ids::{CanvasId, IdAllocator, ShapeId};
pub use input::{MouseButton, PointerEvent};
pub use interaction::{EditEvent, InteractionMachine, InteractionState, InteractionView, MenuItem};
pub use shapes::{Handle, HandleKind, PortId, Shape, ShapeConfig, ShapeKind};
pub use tabs::{TabBar, TabMenu, TabMenuAction};
pub use workspace::{Workspace, WorkspaceSnapshot};
