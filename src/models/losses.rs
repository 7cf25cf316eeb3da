//! Instantaneous power-loss model.
//!
//! Losses are evaluated pointwise from the switch command and the electrical
//! state of the same sample:
//!
//! - Inductor copper loss:      P = iL² · RL
//! - MOSFET conduction loss:    P = u · iL² · Rds(on)
//! - Diode conduction loss:     P = |(1 − u) · Vo / Rload| · Vd
//! - MOSFET switching loss:     P = ½ · Vin · |iL| · (tr + tf) · fsw
//!
//! The command u is the continuous pseudo-duty, so inside the boundary layer
//! the conduction losses are interpolated between the ON and OFF values. The
//! switching term is a period average applied at every sample; it does not
//! detect edges.

use serde::Serialize;

use crate::params::ConverterParams;

use super::ElectricalState;

/// Power dissipated in each loss element at one sample (W).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PowerLosses {
    pub inductor: f64,
    pub mosfet_conduction: f64,
    pub diode: f64,
    pub switching: f64,
}

impl PowerLosses {
    /// Heat generated in the MOSFET die (conduction + switching).
    pub fn mosfet_total(&self) -> f64 {
        self.mosfet_conduction + self.switching
    }

    /// Sum of all losses.
    pub fn total(&self) -> f64 {
        self.inductor + self.mosfet_conduction + self.diode + self.switching
    }
}

/// Loss model parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossModel {
    pub vin: f64,
    pub rload: f64,
    pub inductor_esr: f64,
    pub rds_on: f64,
    pub diode_vf: f64,
    /// Rise plus fall time (s)
    pub transition_time: f64,
    pub fsw: f64,
}

impl LossModel {
    /// Create a loss model from a parameter set.
    pub fn from_params(params: &ConverterParams) -> Self {
        Self {
            vin: params.vin,
            rload: params.rload,
            inductor_esr: params.inductor_esr,
            rds_on: params.rds_on,
            diode_vf: params.diode_vf,
            transition_time: params.rise_time + params.fall_time,
            fsw: params.fsw,
        }
    }

    /// Evaluate all losses for a command and the state it produced.
    pub fn evaluate(&self, command: f64, state: ElectricalState) -> PowerLosses {
        let il = state.inductor_current.abs();
        let il_sq = il * il;

        let diode_current = (1.0 - command) * state.output_voltage / self.rload;

        PowerLosses {
            inductor: il_sq * self.inductor_esr,
            mosfet_conduction: command * il_sq * self.rds_on,
            diode: diode_current.abs() * self.diode_vf,
            switching: 0.5 * self.vin.abs() * il * self.transition_time * self.fsw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn model() -> LossModel {
        LossModel::from_params(&ConverterParams::default())
    }

    #[test]
    fn test_losses_at_operating_point() {
        let state = ElectricalState {
            inductor_current: 1.2,
            output_voltage: 12.0,
        };
        let losses = model().evaluate(0.5, state);

        assert_relative_eq!(losses.inductor, 1.44 * 0.08, max_relative = 1e-12);
        assert_relative_eq!(losses.mosfet_conduction, 0.5 * 1.44 * 0.04, max_relative = 1e-12);
        assert_relative_eq!(losses.diode, 0.5 * 1.2 * 0.7, max_relative = 1e-12);
        // 0.5 * 24 V * 1.2 A * 80 ns * 50 kHz
        assert_relative_eq!(losses.switching, 0.0576, max_relative = 1e-12);
        assert_relative_eq!(losses.mosfet_total(), 0.0288 + 0.0576, max_relative = 1e-12);
        assert_relative_eq!(
            losses.total(),
            0.1152 + 0.0288 + 0.42 + 0.0576,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_conduction_split_follows_command() {
        let state = ElectricalState {
            inductor_current: 2.0,
            output_voltage: 12.0,
        };

        let on = model().evaluate(1.0, state);
        assert_eq!(on.diode, 0.0);
        assert_relative_eq!(on.mosfet_conduction, 4.0 * 0.04);

        let off = model().evaluate(0.0, state);
        assert_eq!(off.mosfet_conduction, 0.0);
        assert_relative_eq!(off.diode, 1.2 * 0.7, max_relative = 1e-12);

        // Inductor and switching losses do not depend on the command
        assert_eq!(on.inductor, off.inductor);
        assert_eq!(on.switching, off.switching);
    }

    #[test]
    fn test_zero_state_has_no_losses() {
        let losses = model().evaluate(0.7, ElectricalState::default());
        assert_eq!(losses, PowerLosses::default());
    }

    proptest! {
        #[test]
        fn prop_losses_are_non_negative(
            command in 0.0f64..=1.0,
            il in -100.0f64..100.0,
            vo in -100.0f64..100.0,
        ) {
            let state = ElectricalState { inductor_current: il, output_voltage: vo };
            let losses = model().evaluate(command, state);
            prop_assert!(losses.inductor >= 0.0);
            prop_assert!(losses.mosfet_conduction >= 0.0);
            prop_assert!(losses.diode >= 0.0);
            prop_assert!(losses.switching >= 0.0);
        }
    }
}
