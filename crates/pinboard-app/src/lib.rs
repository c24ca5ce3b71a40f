//! Pinboard Application
//!
//! Headless application shell tying the workspace, pointer interaction,
//! camera and renderer together behind UI actions and pointer events.

mod app;
mod script;
mod ui;

pub use app::{App, AppConfig, AppError};
pub use script::{Script, ScriptStep, ScriptSummary};
pub use ui::UiAction;
