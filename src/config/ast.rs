//! Abstract Syntax Tree types for the parameter-file language.

use std::collections::HashMap;

/// Complete AST representation of a parsed parameter file.
#[derive(Debug, Clone, Default)]
pub struct ConfigAst {
    /// Scalar assignments (`name = value`), in file order
    pub assignments: Vec<Assignment>,
    /// Thermal network definitions (`.thermal <device> (rth=.. cth=..)`)
    pub thermal: Vec<ThermalDef>,
    /// Transient analysis directives (`.tran <tsim> [dt]`)
    pub tran: Vec<TranDef>,
    /// Junction temperature initial condition directives (`.init <mode>`)
    pub init: Vec<InitDef>,
}

impl ConfigAst {
    /// Create a new empty AST.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the file defined anything at all.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
            && self.thermal.is_empty()
            && self.tran.is_empty()
            && self.init.is_empty()
    }
}

/// A `name = value` line.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Parameter name as written (lowercased)
    pub name: String,
    /// Value with unit suffix applied
    pub value: f64,
    /// Source line number for error reporting
    pub line: usize,
}

/// Semiconductor devices that carry a thermal network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    /// The high-side switch
    Mosfet,
    /// The freewheeling diode
    Diode,
}

impl Device {
    /// Parse a device from its keyword.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mosfet" | "mos" | "switch" | "q" => Some(Self::Mosfet),
            "diode" | "d" => Some(Self::Diode),
            _ => None,
        }
    }

    /// Keyword used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mosfet => "mosfet",
            Self::Diode => "diode",
        }
    }
}

/// A `.thermal` directive.
#[derive(Debug, Clone)]
pub struct ThermalDef {
    /// Device the network belongs to
    pub device: Device,
    /// Network parameters (`rth`, `cth`)
    pub params: HashMap<String, f64>,
    /// Source line number
    pub line: usize,
}

/// A `.tran` directive.
#[derive(Debug, Clone, PartialEq)]
pub struct TranDef {
    /// Simulated duration in seconds
    pub tsim: f64,
    /// Optional integration timestep in seconds
    pub dt: Option<f64>,
    /// Source line number
    pub line: usize,
}

/// An `.init` directive.
#[derive(Debug, Clone, PartialEq)]
pub struct InitDef {
    /// Mode keyword (`zero` or `ambient`)
    pub mode: String,
    /// Source line number
    pub line: usize,
}
