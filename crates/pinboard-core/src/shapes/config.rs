//! Kind-specific node configuration.

use super::ShapeKind;
use crate::capacity::{self, CapacityError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration payload of a node. The variant always matches the node kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ShapeConfig {
    Sensor { label: String },
    TemperatureSensor(TemperatureConfig),
    Output { label: String },
    Conditional { label: String },
    PortInterface(PortInterfaceConfig),
}

impl ShapeConfig {
    /// The configuration a freshly created node of `kind` starts with.
    pub fn default_for(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Sensor => ShapeConfig::Sensor {
                label: "Temperature Sensor".to_string(),
            },
            ShapeKind::TemperatureSensor => ShapeConfig::TemperatureSensor(TemperatureConfig::default()),
            ShapeKind::Output => ShapeConfig::Output {
                label: "Display Output".to_string(),
            },
            ShapeKind::Conditional => ShapeConfig::Conditional {
                label: "if (x > 10)".to_string(),
            },
            ShapeKind::PortInterface => ShapeConfig::PortInterface(PortInterfaceConfig::default()),
        }
    }

    /// The node kind this configuration belongs to.
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeConfig::Sensor { .. } => ShapeKind::Sensor,
            ShapeConfig::TemperatureSensor(_) => ShapeKind::TemperatureSensor,
            ShapeConfig::Output { .. } => ShapeKind::Output,
            ShapeConfig::Conditional { .. } => ShapeKind::Conditional,
            ShapeConfig::PortInterface(_) => ShapeKind::PortInterface,
        }
    }

    /// Body text for labelled kinds.
    pub fn label(&self) -> Option<&str> {
        match self {
            ShapeConfig::Sensor { label }
            | ShapeConfig::Output { label }
            | ShapeConfig::Conditional { label } => Some(label),
            _ => None,
        }
    }

    /// Replace the body text. Returns false for kinds without a label.
    pub fn set_label(&mut self, text: impl Into<String>) -> bool {
        match self {
            ShapeConfig::Sensor { label }
            | ShapeConfig::Output { label }
            | ShapeConfig::Conditional { label } => {
                *label = text.into();
                true
            }
            _ => false,
        }
    }

    pub fn as_port_interface(&self) -> Option<&PortInterfaceConfig> {
        match self {
            ShapeConfig::PortInterface(config) => Some(config),
            _ => None,
        }
    }

    pub fn as_port_interface_mut(&mut self) -> Option<&mut PortInterfaceConfig> {
        match self {
            ShapeConfig::PortInterface(config) => Some(config),
            _ => None,
        }
    }
}

/// Display unit of a temperature sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Kelvin,
}

/// Temperature sensor settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TemperatureConfig {
    pub unit: TemperatureUnit,
    /// Bus the raw reading arrives on, if wired up.
    #[serde(default)]
    pub raw_input: Option<CommKind>,
}

impl TemperatureConfig {
    /// Every supported bus is clocked, so any configured input needs a clock.
    pub fn needs_clock(&self) -> bool {
        self.raw_input.is_some()
    }
}

/// Serial bus protocols a GPIO bank can be configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommKind {
    SpiMain,
    SpiSub,
    I2c,
    Uart,
    Can,
}

impl CommKind {
    pub const ALL: [CommKind; 5] = [
        CommKind::SpiMain,
        CommKind::SpiSub,
        CommKind::I2c,
        CommKind::Uart,
        CommKind::Can,
    ];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            CommKind::SpiMain => "SPI Main",
            CommKind::SpiSub => "SPI Sub",
            CommKind::I2c => "I2C",
            CommKind::Uart => "UART",
            CommKind::Can => "CAN",
        }
    }

    /// Property keys and their initial values for this protocol.
    pub fn default_properties(self) -> &'static [(&'static str, &'static str)] {
        match self {
            CommKind::SpiMain | CommKind::SpiSub => &[
                ("mode", "full duplex"),
                ("dataSpeed", ""),
                ("dataLength", ""),
                ("dataOrder", "LSB"),
                ("clockParity", ""),
                ("clockPhase", ""),
            ],
            CommKind::I2c => &[
                ("dataSpeed", "standard"),
                ("address", ""),
                ("direction", "transmit"),
            ],
            CommKind::Uart => &[
                ("baudRate", ""),
                ("startBit", ""),
                ("stopBits", ""),
                ("parityBits", ""),
                ("dataBits", ""),
                ("direction", "transmit"),
            ],
            CommKind::Can => &[("baudRate", "fault-tolerant"), ("messageId", "")],
        }
    }
}

/// A bus selection plus its free-text properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommConfig {
    pub kind: CommKind,
    pub properties: BTreeMap<String, String>,
}

impl CommConfig {
    /// Select `kind` with its default properties.
    pub fn new(kind: CommKind) -> Self {
        let properties = kind
            .default_properties()
            .iter()
            .map(|&(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Self { kind, properties }
    }

    /// Set a property. Only keys the protocol defines are accepted.
    pub fn set_property(&mut self, key: &str, value: impl Into<String>) -> bool {
        match self.properties.get_mut(key) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }
}

/// The two voltage banks of a port interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GpioBank {
    Gpio3v3,
    Gpio1v8,
}

/// Port interface settings: two GPIO banks and a pool of LVDS lanes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PortInterfaceConfig {
    #[serde(default)]
    pub gpio_3v3: Option<CommConfig>,
    #[serde(default)]
    pub gpio_1v8: Option<CommConfig>,
    #[serde(default)]
    lanes: Vec<u8>,
}

impl PortInterfaceConfig {
    /// Lane widths in insertion order.
    pub fn lanes(&self) -> &[u8] {
        &self.lanes
    }

    /// Append a lane if it fits in the remaining capacity.
    pub fn try_add_lane(&mut self, candidate: i64) -> Result<(), CapacityError> {
        self.lanes = capacity::try_add_lane(&self.lanes, candidate)?;
        Ok(())
    }

    pub fn bank(&self, bank: GpioBank) -> Option<&CommConfig> {
        match bank {
            GpioBank::Gpio3v3 => self.gpio_3v3.as_ref(),
            GpioBank::Gpio1v8 => self.gpio_1v8.as_ref(),
        }
    }

    /// Select a protocol for a bank, resetting its properties, or clear it.
    pub fn set_comm(&mut self, bank: GpioBank, kind: Option<CommKind>) {
        let slot = match bank {
            GpioBank::Gpio3v3 => &mut self.gpio_3v3,
            GpioBank::Gpio1v8 => &mut self.gpio_1v8,
        };
        *slot = kind.map(CommConfig::new);
    }

    /// Set a property on a configured bank.
    pub fn set_property(&mut self, bank: GpioBank, key: &str, value: impl Into<String>) -> bool {
        let slot = match bank {
            GpioBank::Gpio3v3 => self.gpio_3v3.as_mut(),
            GpioBank::Gpio1v8 => self.gpio_1v8.as_mut(),
        };
        slot.is_some_and(|comm| comm.set_property(key, value))
    }
}
