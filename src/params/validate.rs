//! Parameter set validation.

use crate::error::{ConverterError, Result};

use super::types::{ConverterParams, ParamKey, SignConstraint, MAX_SAMPLES};

/// Validate a parameter set before simulation.
///
/// Checks:
/// - Every value is finite
/// - Resistances, reactances, thermal networks, `eta`, `fsw`, `tsim`, `dt` are strictly positive
/// - Switching times, diode drop and `lambda` are non-negative
/// - The timestep does not exceed the simulated duration
/// - The time grid holds at most [`MAX_SAMPLES`] samples
pub fn validate_params(params: &ConverterParams) -> Result<()> {
    for key in ParamKey::ALL {
        let value = params.get(key);

        if !value.is_finite() {
            return Err(ConverterError::invalid_parameter(
                key.name(),
                format!("must be finite, got {}", value),
            ));
        }

        match key.sign_constraint() {
            SignConstraint::Positive if value <= 0.0 => {
                return Err(ConverterError::invalid_parameter(
                    key.name(),
                    format!("must be strictly positive, got {}", value),
                ));
            }
            SignConstraint::NonNegative if value < 0.0 => {
                return Err(ConverterError::invalid_parameter(
                    key.name(),
                    format!("must be non-negative, got {}", value),
                ));
            }
            _ => {}
        }
    }

    if params.dt > params.tsim {
        return Err(ConverterError::invalid_parameter(
            ParamKey::Dt.name(),
            format!(
                "timestep {:e} s exceeds simulated duration {:e} s",
                params.dt, params.tsim
            ),
        ));
    }

    let steps = (params.tsim / params.dt).round();
    if !steps.is_finite() || steps >= MAX_SAMPLES as f64 {
        return Err(ConverterError::invalid_parameter(
            ParamKey::Dt.name(),
            format!(
                "timestep {:e} s over {:e} s needs more than {} samples",
                params.dt, params.tsim, MAX_SAMPLES
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected_param(params: &ConverterParams) -> String {
        match validate_params(params) {
            Err(ConverterError::InvalidParameter { param, .. }) => param,
            other => panic!("expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_params(&ConverterParams::default()).is_ok());
    }

    #[test]
    fn test_rejects_non_positive() {
        for key in [
            ParamKey::Rload,
            ParamKey::Inductance,
            ParamKey::Capacitance,
            ParamKey::InductorEsr,
            ParamKey::RdsOn,
            ParamKey::Eta,
            ParamKey::RthMosfet,
            ParamKey::CthDiode,
            ParamKey::Dt,
        ] {
            let params = ConverterParams::default().with(key, 0.0);
            assert_eq!(rejected_param(&params), key.name());

            let params = ConverterParams::default().with(key, -1.0);
            assert_eq!(rejected_param(&params), key.name());
        }
    }

    #[test]
    fn test_non_negative_allows_zero() {
        let params = ConverterParams::default()
            .with(ParamKey::RiseTime, 0.0)
            .with(ParamKey::FallTime, 0.0)
            .with(ParamKey::Lambda, 0.0);
        assert!(validate_params(&params).is_ok());

        let params = ConverterParams::default().with(ParamKey::DiodeVf, -0.7);
        assert_eq!(rejected_param(&params), "vd");
    }

    #[test]
    fn test_rejects_non_finite() {
        let params = ConverterParams::default().with(ParamKey::Vin, f64::NAN);
        assert_eq!(rejected_param(&params), "vin");

        let params = ConverterParams::default().with(ParamKey::AmbientTemp, f64::INFINITY);
        assert_eq!(rejected_param(&params), "tamb");
    }

    #[test]
    fn test_rejects_timestep_longer_than_run() {
        let params = ConverterParams::default().with_duration(1e-7);
        assert_eq!(rejected_param(&params), "dt");
    }

    #[test]
    fn test_rejects_oversized_grid() {
        let params = ConverterParams::default()
            .with_duration(1.0)
            .with_timestep(1e-300);
        assert_eq!(rejected_param(&params), "dt");

        let params = ConverterParams::default()
            .with_duration(f64::MAX)
            .with_timestep(1e-9);
        assert_eq!(rejected_param(&params), "dt");

        // 10 s at the default timestep is 2e7 steps
        let params = ConverterParams::default().with_duration(10.0);
        assert_eq!(rejected_param(&params), "dt");

        let params = ConverterParams::default().with_duration(1.0);
        assert!(validate_params(&params).is_ok());
        assert_eq!(params.num_samples(), 2_000_001);
    }
}
