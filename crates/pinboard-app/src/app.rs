//! Application state and action dispatch.

use crate::ui::UiAction;
use kurbo::{Point, Size};
use peniko::Color;
use pinboard_core::camera::Camera;
use pinboard_core::capacity::CapacityError;
use pinboard_core::config::{ConfigError, EditorConfig};
use pinboard_core::ids::{CanvasId, ShapeId};
use pinboard_core::input::PointerEvent;
use pinboard_core::interaction::{EditEvent, InteractionMachine};
use pinboard_core::shapes::{ShapeConfig, TemperatureConfig};
use pinboard_core::tabs::TabBar;
use pinboard_core::workspace::Workspace;
use pinboard_render::{DisplayListRenderer, DrawCommand, RenderContext, Renderer, RendererError};
use thiserror::Error;

/// Padding around the content for [`UiAction::FitToContent`].
const FIT_PADDING: f64 = 40.0;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error("Invalid script: {0}")]
    Script(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
    pub editor: EditorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Pinboard".to_string(),
            width: 1280,
            height: 800,
            background_color: Color::from_rgba8(250, 250, 250, 255),
            editor: EditorConfig::default(),
        }
    }
}

/// Headless editor: workspace, view and gesture state behind one entry point
/// for UI actions and one for pointer input.
pub struct App {
    config: AppConfig,
    workspace: Workspace,
    interaction: InteractionMachine,
    camera: Camera,
    tabs: TabBar,
    renderer: DisplayListRenderer,
}

impl Default for App {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let workspace = Workspace::new(&config.editor);
        let interaction = InteractionMachine::new(&config.editor);
        log::info!(
            "{} ready with {} canvas(es), {}x{}",
            config.title,
            workspace.len(),
            config.width,
            config.height
        );
        Self {
            config,
            workspace,
            interaction,
            camera: Camera::new(),
            tabs: TabBar::new(),
            renderer: DisplayListRenderer::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn tabs(&self) -> &TabBar {
        &self.tabs
    }

    pub fn interaction(&self) -> &InteractionMachine {
        &self.interaction
    }

    fn viewport(&self) -> Size {
        Size::new(f64::from(self.config.width), f64::from(self.config.height))
    }

    /// Handle a UI action.
    ///
    /// Switching canvases abandons any gesture in progress. Capacity
    /// violations are returned so the caller can show them.
    pub fn apply(&mut self, action: UiAction) -> Result<(), AppError> {
        let before = self.workspace.active_id();
        let result = self.dispatch(action);
        self.sync_active(before);
        self.interaction
            .refresh_trash_hover(&self.workspace.active().graph, &self.camera);
        result
    }

    fn dispatch(&mut self, action: UiAction) -> Result<(), AppError> {
        let active = self.workspace.active_id();
        match action {
            UiAction::AddShape(kind) => {
                let position = self.config.editor.default_shape_position;
                let id = self.workspace.add_shape_to_active(kind, position);
                log::info!("Added {kind:?} {id} to canvas {active}");
            }
            UiAction::AddCanvas => {
                self.workspace.add_canvas();
            }
            UiAction::RemoveCanvas(id) => {
                self.tabs.close_tab(&mut self.workspace, id);
            }
            UiAction::RenameCanvas(id, name) => {
                self.workspace.rename_canvas(id, name);
            }
            UiAction::DuplicateCanvas(id) => {
                if let Some(copy) = self.workspace.duplicate_canvas(id) {
                    log::info!("Duplicated canvas {id} as {copy}");
                }
            }
            UiAction::ReorderCanvases { from, to } => {
                self.workspace.reorder_canvases(from, to);
            }
            UiAction::SelectCanvas(id) => {
                self.tabs.click(&mut self.workspace, id);
            }
            UiAction::SetCode(code) => {
                self.workspace.set_code(active, code);
            }
            UiAction::SetLabel { shape, text } => {
                let graph = &mut self.workspace.active_mut().graph;
                if graph.update_config(shape, |config| config.set_label(text)) != Some(true) {
                    log::debug!("SetLabel: shape {shape} has no label");
                }
            }
            UiAction::SetTemperatureUnit { shape, unit } => {
                self.update_temperature(shape, |t| t.unit = unit);
            }
            UiAction::SetRawInput { shape, input } => {
                self.update_temperature(shape, |t| t.raw_input = input);
            }
            UiAction::AddLane { shape, lanes } => {
                match self.workspace.active_mut().graph.try_add_lane(shape, lanes) {
                    Ok(true) => log::info!("Added {lanes}-lane LVDS link to shape {shape}"),
                    Ok(false) => {}
                    Err(err) => {
                        log::warn!("{err}");
                        return Err(err.into());
                    }
                }
            }
            UiAction::SetComm { shape, bank, kind } => {
                let graph = &mut self.workspace.active_mut().graph;
                let updated = graph.update_config(shape, |config| {
                    config
                        .as_port_interface_mut()
                        .map(|port| port.set_comm(bank, kind))
                        .is_some()
                });
                if updated != Some(true) {
                    log::debug!("SetComm: shape {shape} is not a port interface");
                }
            }
            UiAction::SetCommProperty {
                shape,
                bank,
                key,
                value,
            } => {
                let graph = &mut self.workspace.active_mut().graph;
                let updated = graph.update_config(shape, |config| {
                    config
                        .as_port_interface_mut()
                        .is_some_and(|port| port.set_property(bank, &key, value))
                });
                if updated != Some(true) {
                    log::debug!("SetCommProperty: {key} not set on shape {shape}");
                }
            }
            UiAction::Pan(delta) => self.camera.pan(delta),
            UiAction::ZoomIn => {
                let center = self.viewport_center();
                self.camera.zoom_at(center, 1.25);
            }
            UiAction::ZoomOut => {
                let center = self.viewport_center();
                self.camera.zoom_at(center, 0.8);
            }
            UiAction::ZoomReset => self.camera.reset(),
            UiAction::FitToContent => {
                if let Some(bounds) = self.workspace.active().graph.bounds() {
                    let viewport = self.viewport();
                    self.camera.fit_to_bounds(bounds, viewport, FIT_PADDING);
                }
            }
            UiAction::TabContextMenu(id) => self.tabs.context_menu(id),
            UiAction::TabMenu(entry) => {
                self.tabs.choose(&mut self.workspace, entry);
            }
            UiAction::EditTabName(text) => self.tabs.edit_draft(text),
            UiAction::SubmitTabName => {
                self.tabs.submit_rename(&mut self.workspace);
            }
            UiAction::CancelTabName => self.tabs.cancel_rename(),
            UiAction::TabDragStart(index) => self.tabs.drag_start(index),
            UiAction::TabDrop(index) => {
                self.tabs.drop_on(&mut self.workspace, index);
            }
            UiAction::TabStripDoubleClick => {
                self.tabs.double_click_strip(&mut self.workspace);
            }
        }
        Ok(())
    }

    fn update_temperature(&mut self, shape: ShapeId, f: impl FnOnce(&mut TemperatureConfig)) {
        let graph = &mut self.workspace.active_mut().graph;
        let updated = graph.update_config(shape, |config| match config {
            ShapeConfig::TemperatureSensor(temperature) => {
                f(temperature);
                true
            }
            _ => false,
        });
        if updated != Some(true) {
            log::debug!("Shape {shape} is not a temperature sensor");
        }
    }

    fn viewport_center(&self) -> Point {
        let size = self.viewport();
        Point::new(size.width / 2.0, size.height / 2.0)
    }

    fn sync_active(&mut self, before: CanvasId) {
        let after = self.workspace.active_id();
        if after != before {
            self.interaction.reset();
            log::info!("Switched from canvas {before} to {after}");
        }
    }

    /// Route a pointer event to the active canvas.
    pub fn pointer(&mut self, event: PointerEvent) -> Option<EditEvent> {
        if let PointerEvent::Scroll { delta, .. } = event {
            self.camera.pan(delta);
            self.interaction
                .refresh_trash_hover(&self.workspace.active().graph, &self.camera);
            return None;
        }
        // Any press on the canvas is outside the tab menu
        if matches!(event, PointerEvent::Down { .. }) && self.tabs.menu_canvas().is_some() {
            self.tabs.outside_click();
        }

        let graph = &mut self.workspace.active_mut().graph;
        let edit = self.interaction.handle(event, graph, &self.camera)?;
        match &edit {
            EditEvent::ShapeDeleted { shape } => log::info!("Deleted shape {shape}"),
            EditEvent::Connected(connection) => {
                log::info!("Connected {} -> {}", connection.from, connection.to)
            }
            EditEvent::ConnectionRejected { from, to } => {
                log::warn!("Connection {from} -> {to} rejected")
            }
            other => log::debug!("{other:?}"),
        }
        Some(edit)
    }

    /// Build the display list for the active canvas.
    pub fn render(&mut self) -> Result<&[DrawCommand], AppError> {
        let viewport = self.viewport();
        let canvas = self.workspace.active();
        let ctx = RenderContext::new(canvas, &self.camera, viewport)
            .with_background(self.config.background_color)
            .with_trash_region(self.config.editor.trash_region)
            .with_handle_radius(self.config.editor.handle_radius)
            .with_interaction(self.interaction.view(&canvas.graph));
        self.renderer.build_scene(&ctx)?;
        Ok(self.renderer.commands())
    }
}
