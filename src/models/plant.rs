//! Averaged electrical model of the buck power stage.
//!
//! State equations with the switch command u ∈ [0, 1] as input:
//!   diL/dt = (u·Vin − Vo − iL·RL) / L
//!   dVo/dt = (iL − Vo/Rload) / C
//!
//! discretized with explicit (forward) Euler. There is no clamping and no
//! stability check: the timestep must stay small against the switching
//! period (Ts/40 by default) and the LC time constants.

use serde::Serialize;

use crate::params::ConverterParams;

/// Electrical state of the converter at one sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ElectricalState {
    /// Inductor current (A)
    pub inductor_current: f64,
    /// Output (capacitor) voltage (V)
    pub output_voltage: f64,
}

/// Buck converter power stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuckPlant {
    pub vin: f64,
    pub inductance: f64,
    pub capacitance: f64,
    pub inductor_esr: f64,
    pub rload: f64,
}

impl BuckPlant {
    /// Create a plant from a parameter set.
    pub fn from_params(params: &ConverterParams) -> Self {
        Self {
            vin: params.vin,
            inductance: params.inductance,
            capacitance: params.capacitance,
            inductor_esr: params.inductor_esr,
            rload: params.rload,
        }
    }

    /// Time derivatives (diL/dt, dVo/dt) at the given state and command.
    pub fn derivatives(&self, state: ElectricalState, command: f64) -> (f64, f64) {
        let il = state.inductor_current;
        let vo = state.output_voltage;

        let dil = (command * self.vin - vo - il * self.inductor_esr) / self.inductance;
        let dvo = (il - vo / self.rload) / self.capacitance;
        (dil, dvo)
    }

    /// Advance the state by one timestep.
    pub fn step(&self, state: ElectricalState, command: f64, dt: f64) -> ElectricalState {
        let (dil, dvo) = self.derivatives(state, command);
        ElectricalState {
            inductor_current: state.inductor_current + dil * dt,
            output_voltage: state.output_voltage + dvo * dt,
        }
    }

    /// DC operating point for a constant command, including the ESR drop.
    pub fn equilibrium(&self, command: f64) -> ElectricalState {
        // Vo = u·Vin·Rload / (Rload + RL), iL = Vo / Rload
        let vo = command * self.vin * self.rload / (self.rload + self.inductor_esr);
        ElectricalState {
            inductor_current: vo / self.rload,
            output_voltage: vo,
        }
    }
}
