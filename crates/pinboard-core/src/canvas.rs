//! Canvas documents: one diagram plus its code buffer.

use crate::graph::Graph;
use crate::ids::CanvasId;
use serde::{Deserialize, Serialize};

/// One diagram addressable as a tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasDocument {
    pub(crate) id: CanvasId,
    /// Tab title. Free text, not required to be unique.
    pub name: String,
    /// The diagram itself.
    pub graph: Graph,
    /// Free text associated with the diagram, independent of the graph.
    pub code: String,
}

impl CanvasDocument {
    /// Create a document with an empty graph.
    pub fn new(id: CanvasId, name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            graph: Graph::new(),
            code: code.into(),
        }
    }

    /// Create a document around an existing graph.
    pub fn with_graph(id: CanvasId, name: impl Into<String>, code: impl Into<String>, graph: Graph) -> Self {
        Self {
            graph,
            ..Self::new(id, name, code)
        }
    }

    /// Get the unique identifier.
    pub fn id(&self) -> CanvasId {
        self.id
    }

    /// Check if the diagram has no shapes.
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }
}
