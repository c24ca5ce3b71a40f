//! The ordered set of open canvases and which one is active.

use crate::canvas::CanvasDocument;
use crate::config::EditorConfig;
use crate::ids::{CanvasId, IdAllocator, ShapeId};
use crate::shapes::ShapeKind;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Suffix appended to the name of a duplicated canvas.
const COPY_SUFFIX: &str = " copy";

/// Read-only copy of the workspace contents, for consumers off the event path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    pub canvases: Vec<CanvasDocument>,
    pub active: CanvasId,
}

/// All open canvas documents in tab order.
///
/// The list is never empty and `active` always names one of its members.
/// Removing the last canvas replaces it with a fresh default one.
#[derive(Debug, Clone)]
pub struct Workspace {
    canvases: Vec<CanvasDocument>,
    active: CanvasId,
    canvas_ids: IdAllocator,
    shape_ids: IdAllocator,
    name_prefix: String,
    default_code: String,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl Workspace {
    /// Create a workspace with one default canvas holding the configured
    /// starter shapes.
    pub fn new(config: &EditorConfig) -> Self {
        let mut workspace = Self::empty(config);
        let id = workspace.push_default_canvas();
        for starter in &config.starter_shapes {
            workspace.add_shape(id, starter.kind, starter.position);
        }
        workspace
    }

    /// Adopt documents built elsewhere (for example by a loader).
    ///
    /// Both allocators are seeded above every id found, so nothing issued
    /// later can collide. Each graph is repaired first. A canvas id seen
    /// before gets a fresh id, and a graph sharing shape ids with an earlier
    /// canvas is re-identified. An empty list yields one empty default canvas.
    pub fn from_documents(mut documents: Vec<CanvasDocument>, config: &EditorConfig) -> Self {
        let mut workspace = Self::empty(config);
        for doc in &mut documents {
            doc.graph.repair();
            workspace.canvas_ids.observe(doc.id);
            workspace.shape_ids.observe(doc.graph.max_shape_id());
        }

        let mut canvas_seen = HashSet::with_capacity(documents.len());
        let mut shape_seen = HashSet::new();
        for mut doc in documents {
            if !canvas_seen.insert(doc.id) {
                let fresh = workspace.canvas_ids.next();
                log::warn!("Canvas id {} repeated, adopted as {fresh}", doc.id);
                doc.id = fresh;
                canvas_seen.insert(fresh);
            }
            if doc.graph.shape_ids().iter().any(|id| shape_seen.contains(id)) {
                log::warn!("Canvas {} shares shape ids with another canvas, re-identifying", doc.id);
                let (graph, _) = doc.graph.deep_copy(&mut workspace.shape_ids);
                doc.graph = graph;
            }
            shape_seen.extend(doc.graph.shape_ids().iter().copied());
            workspace.canvases.push(doc);
        }

        match workspace.canvases.first() {
            Some(first) => workspace.active = first.id,
            None => {
                workspace.push_default_canvas();
            }
        }
        workspace
    }

    fn empty(config: &EditorConfig) -> Self {
        Self {
            canvases: Vec::new(),
            active: 0,
            canvas_ids: IdAllocator::new(),
            shape_ids: IdAllocator::new(),
            name_prefix: config.canvas_name_prefix.clone(),
            default_code: config.default_code.clone(),
        }
    }

    fn push_default_canvas(&mut self) -> CanvasId {
        let id = self.canvas_ids.next();
        let name = format!("{} {}", self.name_prefix, id);
        self.canvases
            .push(CanvasDocument::new(id, name, self.default_code.clone()));
        self.active = id;
        id
    }

    /// Append a new empty canvas and make it active.
    pub fn add_canvas(&mut self) -> CanvasId {
        let id = self.push_default_canvas();
        log::info!("Added canvas {id}");
        id
    }

    /// Remove a canvas.
    ///
    /// If it was active, the first remaining canvas becomes active. Removing
    /// the only canvas leaves a fresh default canvas in its place. Returns
    /// false if no canvas has this id.
    pub fn remove_canvas(&mut self, id: CanvasId) -> bool {
        let Some(index) = self.index_of(id) else {
            log::debug!("remove_canvas: canvas {id} not found");
            return false;
        };
        self.canvases.remove(index);
        log::info!("Removed canvas {id}");

        match self.canvases.first() {
            None => {
                let replacement = self.push_default_canvas();
                log::info!("Last canvas removed, created canvas {replacement}");
            }
            Some(first) if self.active == id => self.active = first.id,
            Some(_) => {}
        }
        true
    }

    /// Set a canvas name verbatim.
    pub fn rename_canvas(&mut self, id: CanvasId, name: impl Into<String>) -> bool {
        match self.canvas_mut(id) {
            Some(doc) => {
                doc.name = name.into();
                true
            }
            None => {
                log::debug!("rename_canvas: canvas {id} not found");
                false
            }
        }
    }

    /// Deep-copy a canvas and insert the copy right after the original.
    ///
    /// The copy gets a fresh canvas id and fresh shape ids; its graph is
    /// otherwise identical. The active canvas does not change.
    pub fn duplicate_canvas(&mut self, id: CanvasId) -> Option<CanvasId> {
        let Some(index) = self.index_of(id) else {
            log::debug!("duplicate_canvas: canvas {id} not found");
            return None;
        };
        let original = &self.canvases[index];
        let (graph, _) = original.graph.deep_copy(&mut self.shape_ids);
        let new_id = self.canvas_ids.next();
        let copy = CanvasDocument::with_graph(
            new_id,
            format!("{}{}", original.name, COPY_SUFFIX),
            original.code.clone(),
            graph,
        );
        self.canvases.insert(index + 1, copy);
        log::info!("Duplicated canvas {id} as {new_id}");
        Some(new_id)
    }

    /// Move the canvas at `from` so it ends up at index `to`.
    ///
    /// Out-of-range indices leave the order untouched and return false. The
    /// active canvas is tracked by id, so it stays active wherever it lands.
    pub fn reorder_canvases(&mut self, from: usize, to: usize) -> bool {
        let len = self.canvases.len();
        if from >= len || to >= len {
            log::debug!("reorder_canvases: {from} -> {to} out of range for {len} canvases");
            return false;
        }
        let doc = self.canvases.remove(from);
        self.canvases.insert(to, doc);
        true
    }

    /// Make a canvas active.
    pub fn set_active(&mut self, id: CanvasId) -> bool {
        if self.index_of(id).is_some() {
            self.active = id;
            true
        } else {
            log::debug!("set_active: canvas {id} not found");
            false
        }
    }

    /// Replace a canvas's code buffer.
    pub fn set_code(&mut self, id: CanvasId, code: impl Into<String>) -> bool {
        match self.canvas_mut(id) {
            Some(doc) => {
                doc.code = code.into();
                true
            }
            None => false,
        }
    }

    /// Add a shape to a canvas, drawing its id from the workspace allocator.
    pub fn add_shape(&mut self, canvas: CanvasId, kind: ShapeKind, position: Point) -> Option<ShapeId> {
        let index = self.index_of(canvas)?;
        let doc = &mut self.canvases[index];
        Some(doc.graph.add_shape(&mut self.shape_ids, kind, position))
    }

    /// Add a shape to the active canvas.
    pub fn add_shape_to_active(&mut self, kind: ShapeKind, position: Point) -> ShapeId {
        let index = self.active_index();
        self.canvases[index]
            .graph
            .add_shape(&mut self.shape_ids, kind, position)
    }

    /// Id of the active canvas.
    pub fn active_id(&self) -> CanvasId {
        self.active
    }

    fn active_index(&self) -> usize {
        self.index_of(self.active).unwrap_or(0)
    }

    /// The active canvas.
    pub fn active(&self) -> &CanvasDocument {
        &self.canvases[self.active_index()]
    }

    /// The active canvas, mutably.
    pub fn active_mut(&mut self) -> &mut CanvasDocument {
        let index = self.active_index();
        &mut self.canvases[index]
    }

    /// Get a canvas by ID.
    pub fn canvas(&self, id: CanvasId) -> Option<&CanvasDocument> {
        self.canvases.iter().find(|doc| doc.id == id)
    }

    /// Get a mutable reference to a canvas by ID.
    pub fn canvas_mut(&mut self, id: CanvasId) -> Option<&mut CanvasDocument> {
        self.canvases.iter_mut().find(|doc| doc.id == id)
    }

    /// Tab index of a canvas.
    pub fn index_of(&self, id: CanvasId) -> Option<usize> {
        self.canvases.iter().position(|doc| doc.id == id)
    }

    /// Canvases in tab order.
    pub fn canvases(&self) -> &[CanvasDocument] {
        &self.canvases
    }

    /// Canvas ids in tab order.
    pub fn ids(&self) -> Vec<CanvasId> {
        self.canvases.iter().map(|doc| doc.id).collect()
    }

    /// Number of open canvases (always at least one).
    pub fn len(&self) -> usize {
        self.canvases.len()
    }

    /// Check if there are no canvases.
    pub fn is_empty(&self) -> bool {
        self.canvases.is_empty()
    }

    /// Owned copy of every document and the active id.
    pub fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            canvases: self.canvases.clone(),
            active: self.active,
        }
    }
}
