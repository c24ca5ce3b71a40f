//! Actions emitted by menus, panels and the tab strip.

use kurbo::Vec2;
use pinboard_core::ids::{CanvasId, ShapeId};
use pinboard_core::shapes::{CommKind, GpioBank, ShapeKind, TemperatureUnit};
use pinboard_core::tabs::TabMenuAction;
use serde::{Deserialize, Serialize};

/// Actions that can be triggered from the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UiAction {
    /// Add a node to the active canvas at the default position.
    AddShape(ShapeKind),
    /// Append a new canvas and switch to it.
    AddCanvas,
    /// Close a canvas tab.
    RemoveCanvas(CanvasId),
    /// Rename a canvas (verbatim).
    RenameCanvas(CanvasId, String),
    /// Duplicate a canvas next to the original.
    DuplicateCanvas(CanvasId),
    /// Move the tab at `from` to `to`.
    ReorderCanvases { from: usize, to: usize },
    /// Activate a canvas tab.
    SelectCanvas(CanvasId),
    /// Replace the code buffer of the active canvas.
    SetCode(String),
    /// Change the text of a labelled node.
    SetLabel { shape: ShapeId, text: String },
    /// Change a temperature sensor's display unit.
    SetTemperatureUnit { shape: ShapeId, unit: TemperatureUnit },
    /// Select the bus a temperature sensor reads from.
    SetRawInput { shape: ShapeId, input: Option<CommKind> },
    /// Add an LVDS lane to a port interface.
    AddLane { shape: ShapeId, lanes: i64 },
    /// Select (or clear) the protocol of a GPIO bank.
    SetComm {
        shape: ShapeId,
        bank: GpioBank,
        kind: Option<CommKind>,
    },
    /// Change one property of a configured GPIO bank.
    SetCommProperty {
        shape: ShapeId,
        bank: GpioBank,
        key: String,
        value: String,
    },
    /// Pan the view by a screen-space delta.
    Pan(Vec2),
    /// Zoom in.
    ZoomIn,
    /// Zoom out.
    ZoomOut,
    /// Reset zoom to 100%.
    ZoomReset,
    /// Fit the active canvas into the viewport.
    FitToContent,
    /// Right-click on a tab.
    TabContextMenu(CanvasId),
    /// Pick an entry of the open tab menu.
    TabMenu(TabMenuAction),
    /// Type into the tab rename field.
    EditTabName(String),
    /// Enter / Save in the rename field.
    SubmitTabName,
    /// Escape / Cancel in the rename field.
    CancelTabName,
    /// Start dragging the tab at this index.
    TabDragStart(usize),
    /// Drop the dragged tab on the tab at this index.
    TabDrop(usize),
    /// Double-click on the empty part of the tab strip.
    TabStripDoubleClick,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_from_json() {
        let actions: Vec<UiAction> = serde_json::from_str(
            r#"[
                { "AddShape": "port-interface" },
                { "AddLane": { "shape": 3, "lanes": 8 } },
                { "SetComm": { "shape": 3, "bank": "Gpio3v3", "kind": "SpiMain" } },
                { "ReorderCanvases": { "from": 1, "to": 0 } },
                { "TabMenu": "Duplicate" },
                "SubmitTabName"
            ]"#,
        )
        .unwrap();
        assert_eq!(actions[0], UiAction::AddShape(ShapeKind::PortInterface));
        assert_eq!(actions[1], UiAction::AddLane { shape: 3, lanes: 8 });
        assert_eq!(
            actions[2],
            UiAction::SetComm {
                shape: 3,
                bank: GpioBank::Gpio3v3,
                kind: Some(CommKind::SpiMain)
            }
        );
        assert_eq!(actions[3], UiAction::ReorderCanvases { from: 1, to: 0 });
        assert_eq!(actions[4], UiAction::TabMenu(TabMenuAction::Duplicate));
        assert_eq!(actions[5], UiAction::SubmitTabName);
    }
}
