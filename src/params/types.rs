//! Parameter set types.

use std::fmt;

use serde::Serialize;

/// Junction-to-case thermal network of one semiconductor device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThermalParams {
    /// Junction-to-case thermal resistance (°C/W)
    pub rth: f64,
    /// Thermal capacitance (J/°C)
    pub cth: f64,
}

/// Junction temperature at the first sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialJunctionTemp {
    /// Start from 0 °C and relax towards ambient (cold start)
    #[default]
    Zero,
    /// Start at the ambient temperature
    Ambient,
}

impl InitialJunctionTemp {
    /// Parse a mode from its keyword.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "zero" | "cold" => Some(Self::Zero),
            "ambient" | "amb" => Some(Self::Ambient),
            _ => None,
        }
    }

    /// Initial temperature for the given ambient.
    pub fn temperature(&self, ambient: f64) -> f64 {
        match self {
            Self::Zero => 0.0,
            Self::Ambient => ambient,
        }
    }
}

/// Physical and control constants for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConverterParams {
    /// Input voltage (V)
    pub vin: f64,
    /// Output voltage reference (V)
    pub vref: f64,
    /// Load resistance (Ω)
    pub rload: f64,
    /// Inductance (H)
    pub inductance: f64,
    /// Output capacitance (F)
    pub capacitance: f64,
    /// Inductor ESR (Ω)
    pub inductor_esr: f64,
    /// MOSFET on-resistance (Ω)
    pub rds_on: f64,
    /// Diode forward voltage (V)
    pub diode_vf: f64,
    /// Switch rise time (s)
    pub rise_time: f64,
    /// Switch fall time (s)
    pub fall_time: f64,
    /// Sliding-surface integral gain λ
    pub lambda: f64,
    /// Boundary-layer half-width η
    pub eta: f64,
    /// Switching frequency (Hz)
    pub fsw: f64,
    /// Ambient temperature (°C)
    pub ambient_temp: f64,
    /// MOSFET thermal network
    pub mosfet_thermal: ThermalParams,
    /// Diode thermal network
    pub diode_thermal: ThermalParams,
    /// Simulated duration (s)
    pub tsim: f64,
    /// Integration timestep (s)
    pub dt: f64,
    /// Junction temperature initial condition
    pub initial_junction_temp: InitialJunctionTemp,
    /// `dt` was given explicitly rather than derived from `fsw`
    #[serde(skip)]
    explicit_timestep: bool,
}

/// Default timestep divisor: dt = switching period / 40.
pub const STEPS_PER_PERIOD: f64 = 40.0;

/// Largest time grid a parameter set may describe.
pub const MAX_SAMPLES: usize = 10_000_000;

impl Default for ConverterParams {
    fn default() -> Self {
        let fsw = 50e3;
        Self {
            vin: 24.0,
            vref: 12.0,
            rload: 10.0,
            inductance: 150e-6,
            capacitance: 220e-6,
            inductor_esr: 0.08,
            rds_on: 0.04,
            diode_vf: 0.7,
            rise_time: 40e-9,
            fall_time: 40e-9,
            lambda: 800.0,
            eta: 0.01,
            fsw,
            ambient_temp: 25.0,
            mosfet_thermal: ThermalParams { rth: 0.5, cth: 5e-3 },
            diode_thermal: ThermalParams { rth: 2.0, cth: 2e-3 },
            tsim: 30e-3,
            dt: 1.0 / fsw / STEPS_PER_PERIOD,
            initial_junction_temp: InitialJunctionTemp::Zero,
            explicit_timestep: false,
        }
    }
}

impl ConverterParams {
    /// Set a scalar parameter by key.
    pub fn with(mut self, key: ParamKey, value: f64) -> Self {
        self.set(key, value);
        self
    }

    /// Set the simulated duration (s).
    pub fn with_duration(mut self, tsim: f64) -> Self {
        self.tsim = tsim;
        self
    }

    /// Set the integration timestep (s).
    pub fn with_timestep(mut self, dt: f64) -> Self {
        self.set(ParamKey::Dt, dt);
        self
    }

    /// Set the junction temperature initial condition.
    pub fn with_initial_junction_temp(mut self, init: InitialJunctionTemp) -> Self {
        self.initial_junction_temp = init;
        self
    }

    /// Switching period 1/fsw (s).
    pub fn switching_period(&self) -> f64 {
        1.0 / self.fsw
    }

    /// The timestep implied by the switching frequency: Ts / 40.
    pub fn default_timestep(&self) -> f64 {
        self.switching_period() / STEPS_PER_PERIOD
    }

    /// Whether `dt` was set explicitly. If not, it tracks `fsw`.
    pub fn has_explicit_timestep(&self) -> bool {
        self.explicit_timestep
    }

    /// Number of samples on the time grid, including the initial one.
    ///
    /// Saturates instead of overflowing; [`validate_params`](super::validate_params)
    /// rejects grids larger than [`MAX_SAMPLES`].
    pub fn num_samples(&self) -> usize {
        // float-to-int casts saturate, NaN maps to 0
        ((self.tsim / self.dt).round() as usize).saturating_add(1)
    }

    /// Read a scalar parameter by key.
    pub fn get(&self, key: ParamKey) -> f64 {
        match key {
            ParamKey::Vin => self.vin,
            ParamKey::Vref => self.vref,
            ParamKey::Rload => self.rload,
            ParamKey::Inductance => self.inductance,
            ParamKey::Capacitance => self.capacitance,
            ParamKey::InductorEsr => self.inductor_esr,
            ParamKey::RdsOn => self.rds_on,
            ParamKey::DiodeVf => self.diode_vf,
            ParamKey::RiseTime => self.rise_time,
            ParamKey::FallTime => self.fall_time,
            ParamKey::Lambda => self.lambda,
            ParamKey::Eta => self.eta,
            ParamKey::Fsw => self.fsw,
            ParamKey::AmbientTemp => self.ambient_temp,
            ParamKey::RthMosfet => self.mosfet_thermal.rth,
            ParamKey::CthMosfet => self.mosfet_thermal.cth,
            ParamKey::RthDiode => self.diode_thermal.rth,
            ParamKey::CthDiode => self.diode_thermal.cth,
            ParamKey::Tsim => self.tsim,
            ParamKey::Dt => self.dt,
        }
    }

    /// Write a scalar parameter by key.
    ///
    /// Setting `dt` marks the timestep as explicit. Setting `fsw` re-derives
    /// `dt = Ts / 40` unless the timestep is explicit.
    pub fn set(&mut self, key: ParamKey, value: f64) {
        let field = match key {
            ParamKey::Vin => &mut self.vin,
            ParamKey::Vref => &mut self.vref,
            ParamKey::Rload => &mut self.rload,
            ParamKey::Inductance => &mut self.inductance,
            ParamKey::Capacitance => &mut self.capacitance,
            ParamKey::InductorEsr => &mut self.inductor_esr,
            ParamKey::RdsOn => &mut self.rds_on,
            ParamKey::DiodeVf => &mut self.diode_vf,
            ParamKey::RiseTime => &mut self.rise_time,
            ParamKey::FallTime => &mut self.fall_time,
            ParamKey::Lambda => &mut self.lambda,
            ParamKey::Eta => &mut self.eta,
            ParamKey::Fsw => &mut self.fsw,
            ParamKey::AmbientTemp => &mut self.ambient_temp,
            ParamKey::RthMosfet => &mut self.mosfet_thermal.rth,
            ParamKey::CthMosfet => &mut self.mosfet_thermal.cth,
            ParamKey::RthDiode => &mut self.diode_thermal.rth,
            ParamKey::CthDiode => &mut self.diode_thermal.cth,
            ParamKey::Tsim => &mut self.tsim,
            ParamKey::Dt => &mut self.dt,
        };
        *field = value;

        match key {
            ParamKey::Dt => self.explicit_timestep = true,
            ParamKey::Fsw if !self.explicit_timestep => self.dt = self.default_timestep(),
            _ => {}
        }
    }
}

/// Names of the scalar parameters, as used in parameter files and on the
/// command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKey {
    Vin,
    Vref,
    Rload,
    Inductance,
    Capacitance,
    InductorEsr,
    RdsOn,
    DiodeVf,
    RiseTime,
    FallTime,
    Lambda,
    Eta,
    Fsw,
    AmbientTemp,
    RthMosfet,
    CthMosfet,
    RthDiode,
    CthDiode,
    Tsim,
    Dt,
}

impl ParamKey {
    /// Every key, in report order.
    pub const ALL: [ParamKey; 20] = [
        ParamKey::Vin,
        ParamKey::Vref,
        ParamKey::Rload,
        ParamKey::Inductance,
        ParamKey::Capacitance,
        ParamKey::InductorEsr,
        ParamKey::RdsOn,
        ParamKey::DiodeVf,
        ParamKey::RiseTime,
        ParamKey::FallTime,
        ParamKey::Lambda,
        ParamKey::Eta,
        ParamKey::Fsw,
        ParamKey::AmbientTemp,
        ParamKey::RthMosfet,
        ParamKey::CthMosfet,
        ParamKey::RthDiode,
        ParamKey::CthDiode,
        ParamKey::Tsim,
        ParamKey::Dt,
    ];

    /// Parse a key from its name (case-insensitive, a few aliases accepted).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "vin" => Some(Self::Vin),
            "vref" => Some(Self::Vref),
            "rload" | "r" => Some(Self::Rload),
            "l" => Some(Self::Inductance),
            "c" => Some(Self::Capacitance),
            "rl" | "esr" => Some(Self::InductorEsr),
            "rds" | "rds_on" => Some(Self::RdsOn),
            "vd" | "vf" => Some(Self::DiodeVf),
            "tr" => Some(Self::RiseTime),
            "tf" => Some(Self::FallTime),
            "lambda" => Some(Self::Lambda),
            "eta" => Some(Self::Eta),
            "fsw" => Some(Self::Fsw),
            "tamb" => Some(Self::AmbientTemp),
            "rth_mos" => Some(Self::RthMosfet),
            "cth_mos" => Some(Self::CthMosfet),
            "rth_d" => Some(Self::RthDiode),
            "cth_d" => Some(Self::CthDiode),
            "tsim" => Some(Self::Tsim),
            "dt" => Some(Self::Dt),
            _ => None,
        }
    }

    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Vin => "vin",
            Self::Vref => "vref",
            Self::Rload => "rload",
            Self::Inductance => "l",
            Self::Capacitance => "c",
            Self::InductorEsr => "rl",
            Self::RdsOn => "rds",
            Self::DiodeVf => "vd",
            Self::RiseTime => "tr",
            Self::FallTime => "tf",
            Self::Lambda => "lambda",
            Self::Eta => "eta",
            Self::Fsw => "fsw",
            Self::AmbientTemp => "tamb",
            Self::RthMosfet => "rth_mos",
            Self::CthMosfet => "cth_mos",
            Self::RthDiode => "rth_d",
            Self::CthDiode => "cth_d",
            Self::Tsim => "tsim",
            Self::Dt => "dt",
        }
    }

    /// Unit symbol for reports.
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Vin | Self::Vref | Self::DiodeVf => "V",
            Self::Rload | Self::InductorEsr | Self::RdsOn => "Ω",
            Self::Inductance => "H",
            Self::Capacitance => "F",
            Self::RiseTime | Self::FallTime | Self::Tsim | Self::Dt => "s",
            Self::Lambda | Self::Eta => "",
            Self::Fsw => "Hz",
            Self::AmbientTemp => "°C",
            Self::RthMosfet | Self::RthDiode => "°C/W",
            Self::CthMosfet | Self::CthDiode => "J/°C",
        }
    }

    /// Whether the parameter must be strictly positive (otherwise only
    /// non-negative, or unconstrained for temperatures and voltages).
    pub(crate) fn sign_constraint(&self) -> SignConstraint {
        match self {
            Self::Rload
            | Self::Inductance
            | Self::Capacitance
            | Self::InductorEsr
            | Self::RdsOn
            | Self::Eta
            | Self::Fsw
            | Self::RthMosfet
            | Self::CthMosfet
            | Self::RthDiode
            | Self::CthDiode
            | Self::Tsim
            | Self::Dt => SignConstraint::Positive,
            Self::DiodeVf | Self::RiseTime | Self::FallTime | Self::Lambda => {
                SignConstraint::NonNegative
            }
            Self::Vin | Self::Vref | Self::AmbientTemp => SignConstraint::Any,
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SignConstraint {
    Positive,
    NonNegative,
    Any,
}
