//! Replaying recorded sessions.

use crate::app::{App, AppError};
use crate::ui::UiAction;
use pinboard_core::input::PointerEvent;
use pinboard_core::interaction::EditEvent;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One recorded input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScriptStep {
    Action(UiAction),
    Pointer(PointerEvent),
}

/// An ordered list of inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let script = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!("Loaded {} script steps from {}", script.steps.len(), path.display());
        Ok(script)
    }
}

/// Outcome of a replay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    pub steps: usize,
    /// Pointer events that changed something.
    pub edits: usize,
    /// Rejected lane additions and connections.
    pub rejected: usize,
    pub canvases: usize,
    /// Shapes on the active canvas.
    pub shapes: usize,
    /// Connections on the active canvas.
    pub connections: usize,
    /// Commands in the final frame.
    pub draw_commands: usize,
}

impl App {
    /// Feed every step of `script`, then draw one frame.
    ///
    /// Rejections are counted and the replay continues; any other error
    /// stops it.
    pub fn run_script(&mut self, script: &Script) -> Result<ScriptSummary, AppError> {
        let mut summary = ScriptSummary::default();
        for step in &script.steps {
            summary.steps += 1;
            match step {
                ScriptStep::Action(action) => match self.apply(action.clone()) {
                    Ok(()) => {}
                    Err(AppError::Capacity(_)) => summary.rejected += 1,
                    Err(err) => return Err(err),
                },
                ScriptStep::Pointer(event) => match self.pointer(*event) {
                    Some(EditEvent::ConnectionRejected { .. }) => summary.rejected += 1,
                    Some(_) => summary.edits += 1,
                    None => {}
                },
            }
        }

        summary.draw_commands = self.render()?.len();
        let active = &self.workspace().active().graph;
        summary.canvases = self.workspace().len();
        summary.shapes = active.len();
        summary.connections = active.connections().len();
        Ok(summary)
    }
}
