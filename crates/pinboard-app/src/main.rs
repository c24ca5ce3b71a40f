//! Main application entry point.
//!
//! Usage: `pinboard [script.json] [config.json]`

use pinboard_app::{App, AppConfig, AppError, Script};
use pinboard_core::config::EditorConfig;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting Pinboard");

    let mut args = std::env::args().skip(1);
    let script = args.next();
    let config = args.next();
    match run(script.as_deref(), config.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("pinboard: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(script: Option<&str>, config: Option<&str>) -> Result<(), AppError> {
    let editor = match config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let mut app = App::new(AppConfig {
        editor,
        ..AppConfig::default()
    });

    let script = match script {
        Some(path) => Script::load(path)?,
        None => Script::default(),
    };
    let summary = app.run_script(&script)?;
    log::info!(
        "Replayed {} steps: {} edits, {} rejected; {} canvas(es), active has {} shapes and {} connections",
        summary.steps,
        summary.edits,
        summary.rejected,
        summary.canvases,
        summary.shapes,
        summary.connections
    );

    println!("{}", serde_json::to_string_pretty(&app.workspace().snapshot())?);
    Ok(())
}
