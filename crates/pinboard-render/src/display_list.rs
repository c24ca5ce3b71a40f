//! Backend-neutral renderer that records flat drawing commands.
//!
//! Hosts replay the list with whatever toolkit they draw with; tests inspect
//! it directly.

use crate::renderer::{RenderContext, RenderResult, Renderer};
use kurbo::{Point, Rect};
use peniko::Color;
use pinboard_core::capacity::{LANE_CAPACITY, lane_sum};
use pinboard_core::graph::Connection;
use pinboard_core::ids::ShapeId;
use pinboard_core::interaction::MenuItem;
use pinboard_core::shapes::{
    GpioBank, HandleKind, PortId, Shape, ShapeConfig, ShapeKind, TemperatureUnit,
};

/// Fill color of a node.
pub fn kind_fill(kind: ShapeKind) -> Color {
    match kind {
        ShapeKind::Sensor => Color::from_rgba8(0, 170, 0, 255),
        ShapeKind::Output => Color::from_rgba8(0, 122, 204, 255),
        ShapeKind::Conditional => Color::from_rgba8(255, 204, 0, 255),
        ShapeKind::TemperatureSensor => Color::from_rgba8(254, 226, 226, 255),
        ShapeKind::PortInterface => Color::from_rgba8(245, 245, 247, 255),
    }
}

/// One drawing operation, in screen coordinates.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Clear(Color),
    Trash {
        rect: Rect,
        fill: Color,
        highlighted: bool,
    },
    Edge {
        from: ShapeId,
        to: ShapeId,
        port: Option<PortId>,
        start: Point,
        end: Point,
        color: Color,
    },
    Node {
        shape: ShapeId,
        rect: Rect,
        fill: Color,
        stroke: Color,
        title: &'static str,
        /// Body text, one entry per line.
        lines: Vec<String>,
        badge: Option<&'static str>,
    },
    Handle {
        shape: ShapeId,
        kind: HandleKind,
        port: Option<PortId>,
        center: Point,
        radius: f64,
    },
    /// Rubber band from a handle to the pointer while connecting.
    Preview {
        start: Point,
        end: Point,
        color: Color,
    },
    MenuEntry {
        shape: ShapeId,
        item: MenuItem,
        rect: Rect,
        label: &'static str,
    },
}

/// Records a [`DrawCommand`] list per frame.
#[derive(Debug, Default)]
pub struct DisplayListRenderer {
    commands: Vec<DrawCommand>,
}

impl DisplayListRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands of the last built frame, back to front.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take ownership of the commands (leaves the list empty).
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    fn render_edge(&mut self, ctx: &RenderContext, connection: &Connection) {
        let Some((start, end)) = ctx.canvas.graph.connection_endpoints(connection) else {
            return;
        };
        self.commands.push(DrawCommand::Edge {
            from: connection.from,
            to: connection.to,
            port: connection.port.clone(),
            start: ctx.transform.to_screen_space(start),
            end: ctx.transform.to_screen_space(end),
            color: Color::from_rgba8(85, 85, 85, 255),
        });
    }

    fn render_shape(&mut self, ctx: &RenderContext, shape: &Shape) {
        let hovered = ctx.interaction.hovered == Some(shape.id());
        self.commands.push(DrawCommand::Node {
            shape: shape.id(),
            rect: ctx.transform.rect_to_screen(shape.bounds()),
            fill: kind_fill(shape.kind),
            stroke: if hovered {
                Color::from_rgba8(59, 130, 246, 255) // Blue
            } else {
                Color::from_rgba8(51, 51, 51, 255)
            },
            title: shape.kind.title(),
            lines: body_lines(&shape.config),
            badge: badge(&shape.config),
        });

        // Handle radius scales with the view
        let unit = ctx.transform.to_screen_space(Point::new(1.0, 0.0)) - ctx.transform.to_screen_space(Point::ZERO);
        let radius = ctx.handle_radius * unit.hypot();
        for handle in shape.handles() {
            self.commands.push(DrawCommand::Handle {
                shape: shape.id(),
                kind: handle.kind,
                port: handle.port,
                center: ctx.transform.to_screen_space(handle.position),
                radius,
            });
        }
    }

    fn render_menu(&mut self, shape: ShapeId, origin: Point) {
        for item in MenuItem::ALL {
            self.commands.push(DrawCommand::MenuEntry {
                shape,
                item,
                rect: item.rect(origin),
                label: item.label(),
            });
        }
    }
}

impl Renderer for DisplayListRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        self.commands.clear();
        ctx.validate()?;

        self.commands.push(DrawCommand::Clear(self.background_color(ctx)));
        self.commands.push(DrawCommand::Trash {
            rect: ctx.trash_region,
            fill: trash_fill(ctx.interaction.trash_hover),
            highlighted: ctx.interaction.trash_hover,
        });

        // Edges sit under the nodes
        for connection in ctx.canvas.graph.connections() {
            self.render_edge(ctx, connection);
        }
        for shape in ctx.canvas.graph.shapes() {
            self.render_shape(ctx, shape);
        }

        if let Some((start, end)) = ctx.interaction.connect_preview {
            self.commands.push(DrawCommand::Preview {
                start: ctx.transform.to_screen_space(start),
                end: ctx.transform.to_screen_space(end),
                color: Color::from_rgba8(59, 130, 246, 180),
            });
        }
        if let Some((shape, origin)) = ctx.interaction.context_menu {
            self.render_menu(shape, origin);
        }

        log::trace!(
            "Built {} draw commands for canvas {}",
            self.commands.len(),
            ctx.canvas.id()
        );
        Ok(())
    }
}

/// Fill color of the trash region.
pub fn trash_fill(highlighted: bool) -> Color {
    if highlighted {
        Color::from_rgba8(239, 68, 68, 255) // Red
    } else {
        Color::from_rgba8(220, 220, 220, 255)
    }
}

fn body_lines(config: &ShapeConfig) -> Vec<String> {
    match config {
        ShapeConfig::Sensor { label } | ShapeConfig::Output { label } | ShapeConfig::Conditional { label } => {
            vec![label.clone()]
        }
        ShapeConfig::TemperatureSensor(temperature) => {
            let unit = match temperature.unit {
                TemperatureUnit::Celsius => "Unit: °C",
                TemperatureUnit::Kelvin => "Unit: K",
            };
            let input = match temperature.raw_input {
                Some(kind) => format!("Input: {}", kind.label()),
                None => "Input: none".to_string(),
            };
            vec![unit.to_string(), input]
        }
        ShapeConfig::PortInterface(port) => {
            let bank = |bank: GpioBank, name: &str| match port.bank(bank) {
                Some(comm) => format!("{name}: {}", comm.kind.label()),
                None => format!("{name}: unused"),
            };
            vec![
                bank(GpioBank::Gpio3v3, "GPIO 3.3V"),
                bank(GpioBank::Gpio1v8, "GPIO 1.8V"),
                format!("LVDS lanes: {}/{LANE_CAPACITY}", lane_sum(port.lanes())),
            ]
        }
    }
}

fn badge(config: &ShapeConfig) -> Option<&'static str> {
    match config {
        ShapeConfig::TemperatureSensor(temperature) if temperature.needs_clock() => Some("CLK"),
        _ => None,
    }
}
