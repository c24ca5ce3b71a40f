//! Tab strip state: per-tab menu, rename session, drag-reorder.

use crate::ids::CanvasId;
use crate::workspace::Workspace;
use serde::{Deserialize, Serialize};

/// Entries of a tab's context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TabMenuAction {
    Rename,
    Duplicate,
    Delete,
}

impl TabMenuAction {
    pub const ALL: [TabMenuAction; 3] = [
        TabMenuAction::Rename,
        TabMenuAction::Duplicate,
        TabMenuAction::Delete,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TabMenuAction::Rename => "Rename",
            TabMenuAction::Duplicate => "Duplicate",
            TabMenuAction::Delete => "Delete",
        }
    }
}

/// Menu state of the strip. At most one tab has its menu open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TabMenu {
    #[default]
    Closed,
    Open { canvas: CanvasId },
    /// The menu shows a text field holding the new name.
    Renaming { canvas: CanvasId, draft: String },
}

/// Controller behind the tab strip. Gestures are forwarded to the
/// workspace unchanged.
#[derive(Debug, Clone, Default)]
pub struct TabBar {
    menu: TabMenu,
    /// Index of the tab being dragged.
    dragged: Option<usize>,
}

impl TabBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn menu(&self) -> &TabMenu {
        &self.menu
    }

    /// Canvas whose menu is open, if any.
    pub fn menu_canvas(&self) -> Option<CanvasId> {
        match self.menu {
            TabMenu::Closed => None,
            TabMenu::Open { canvas } | TabMenu::Renaming { canvas, .. } => Some(canvas),
        }
    }

    /// Text of the rename field, if a rename is in progress.
    pub fn draft(&self) -> Option<&str> {
        match &self.menu {
            TabMenu::Renaming { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Clicking a tab activates it.
    pub fn click(&mut self, workspace: &mut Workspace, canvas: CanvasId) -> bool {
        workspace.set_active(canvas)
    }

    /// The close button on a tab.
    pub fn close_tab(&mut self, workspace: &mut Workspace, canvas: CanvasId) -> bool {
        if self.menu_canvas() == Some(canvas) {
            self.menu = TabMenu::Closed;
        }
        workspace.remove_canvas(canvas)
    }

    /// Right-click on a tab toggles its menu and drops any rename in progress.
    pub fn context_menu(&mut self, canvas: CanvasId) {
        self.menu = if self.menu_canvas() == Some(canvas) {
            TabMenu::Closed
        } else {
            TabMenu::Open { canvas }
        };
    }

    /// A press anywhere outside the open menu.
    pub fn outside_click(&mut self) {
        self.menu = TabMenu::Closed;
    }

    /// Run a menu entry for the tab whose menu is open.
    ///
    /// Returns the new canvas id for `Duplicate`.
    pub fn choose(&mut self, workspace: &mut Workspace, action: TabMenuAction) -> Option<CanvasId> {
        let canvas = self.menu_canvas()?;
        match action {
            TabMenuAction::Rename => {
                let draft = workspace.canvas(canvas)?.name.clone();
                self.menu = TabMenu::Renaming { canvas, draft };
                None
            }
            TabMenuAction::Duplicate => {
                self.menu = TabMenu::Closed;
                workspace.duplicate_canvas(canvas)
            }
            TabMenuAction::Delete => {
                self.menu = TabMenu::Closed;
                workspace.remove_canvas(canvas);
                None
            }
        }
    }

    /// Replace the rename draft.
    pub fn edit_draft(&mut self, text: impl Into<String>) {
        if let TabMenu::Renaming { draft, .. } = &mut self.menu {
            *draft = text.into();
        }
    }

    /// Enter or Save: apply the trimmed draft unless it is blank, then close.
    pub fn submit_rename(&mut self, workspace: &mut Workspace) -> bool {
        let TabMenu::Renaming { canvas, draft } = std::mem::take(&mut self.menu) else {
            return false;
        };
        let name = draft.trim();
        if name.is_empty() {
            log::debug!("Ignoring blank name for canvas {canvas}");
            return false;
        }
        workspace.rename_canvas(canvas, name)
    }

    /// Escape or Cancel.
    pub fn cancel_rename(&mut self) {
        if matches!(self.menu, TabMenu::Renaming { .. }) {
            self.menu = TabMenu::Closed;
        }
    }

    pub fn drag_start(&mut self, index: usize) {
        self.dragged = Some(index);
    }

    /// Drop the dragged tab onto the tab at `index`.
    pub fn drop_on(&mut self, workspace: &mut Workspace, index: usize) -> bool {
        match self.dragged.take() {
            Some(from) if from != index => workspace.reorder_canvases(from, index),
            _ => false,
        }
    }

    /// Double-click on the empty part of the strip.
    pub fn double_click_strip(&mut self, workspace: &mut Workspace) -> CanvasId {
        workspace.add_canvas()
    }
}
