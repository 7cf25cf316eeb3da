//! Digital sliding-mode controller with boundary-layer smoothing.
//!
//! The sliding variable combines the voltage error with its integral:
//!   s = e + λ ∫e dt
//!
//! Outside the boundary layer |s| > η the switch is hard ON or OFF. Inside
//! it the command is interpolated linearly,
//!   u = 0.5 + s / (2η)
//!
//! which replaces chattering near the sliding surface with a continuous
//! pseudo-duty.

use crate::params::ConverterParams;

/// Controller memory carried from one step to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SmcState {
    /// Forward-Euler integral of the voltage error (V·s)
    pub integral_error: f64,
}

/// Sliding-mode voltage controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmcController {
    /// Integral gain of the sliding surface
    pub lambda: f64,
    /// Boundary-layer half-width
    pub eta: f64,
}

impl SmcController {
    /// Create a new controller.
    pub fn new(lambda: f64, eta: f64) -> Self {
        Self { lambda, eta }
    }

    /// Create a controller from a parameter set.
    pub fn from_params(params: &ConverterParams) -> Self {
        Self::new(params.lambda, params.eta)
    }

    /// Sliding variable s = e + λ·∫e.
    pub fn sliding_variable(&self, error: f64, integral_error: f64) -> f64 {
        error + self.lambda * integral_error
    }

    /// Compute the switch command for one step.
    ///
    /// `measured` is the output voltage of the previous sample. Returns the
    /// command in [0, 1] together with the updated memory; the caller must
    /// pass that memory to the next call.
    pub fn compute(
        &self,
        state: SmcState,
        reference: f64,
        measured: f64,
        dt: f64,
    ) -> (f64, SmcState) {
        let error = reference - measured;
        let integral_error = state.integral_error + error * dt;
        let s = self.sliding_variable(error, integral_error);

        (
            boundary_layer_command(s, self.eta),
            SmcState { integral_error },
        )
    }
}

/// Map the sliding variable to a switch command.
///
/// Exactly 0 at `s = -eta`, exactly 1 at `s = eta`, linear with slope
/// `1 / (2 eta)` in between. `eta` must be positive.
pub fn boundary_layer_command(s: f64, eta: f64) -> f64 {
    if s > eta {
        1.0
    } else if s < -eta {
        0.0
    } else {
        // Guard rounding at the edges
        (0.5 + s / (2.0 * eta)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    const ETA: f64 = 0.01;

    #[test]
    fn test_boundary_layer_edges() {
        assert_eq!(boundary_layer_command(ETA, ETA), 1.0);
        assert_eq!(boundary_layer_command(-ETA, ETA), 0.0);
        assert_eq!(boundary_layer_command(0.0, ETA), 0.5);
        assert_eq!(boundary_layer_command(1.0, ETA), 1.0);
        assert_eq!(boundary_layer_command(-1.0, ETA), 0.0);
    }

    #[test]
    fn test_boundary_layer_sweep_is_continuous_monotone_linear() {
        let steps = 4000;
        let lo = -2.0 * ETA;
        let hi = 2.0 * ETA;
        let ds = (hi - lo) / steps as f64;

        let mut prev = boundary_layer_command(lo, ETA);
        for i in 1..=steps {
            let s = lo + i as f64 * ds;
            let u = boundary_layer_command(s, ETA);

            assert!(u >= prev, "not monotone at s = {}", s);
            // Slope is at most 1/(2 eta), so no jumps
            assert!(u - prev <= ds / (2.0 * ETA) + 1e-12, "jump at s = {}", s);

            if s.abs() < ETA {
                assert_relative_eq!(u, 0.5 + s / (2.0 * ETA), epsilon = 1e-12);
            }
            prev = u;
        }
    }

    #[test]
    fn test_sweep_through_error_with_fixed_integral() {
        let ctrl = SmcController::new(800.0, ETA);
        let integral = 1e-5;
        let offset = ctrl.lambda * integral;

        // Choose the error so that s lands exactly on the layer edges
        let upper = ctrl.sliding_variable(ETA - offset, integral);
        let lower = ctrl.sliding_variable(-ETA - offset, integral);
        assert_relative_eq!(boundary_layer_command(upper, ETA), 1.0, epsilon = 1e-9);
        assert_relative_eq!(boundary_layer_command(lower, ETA), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_compute_integrates_error() {
        let ctrl = SmcController::new(800.0, ETA);
        let dt = 5e-7;

        let (u, state) = ctrl.compute(SmcState::default(), 12.0, 0.0, dt);
        assert_eq!(u, 1.0);
        assert_relative_eq!(state.integral_error, 12.0 * dt);

        let (_, state) = ctrl.compute(state, 12.0, 13.0, dt);
        assert_relative_eq!(state.integral_error, 11.0 * dt, max_relative = 1e-12);
    }

    #[test]
    fn test_compute_inside_boundary_layer() {
        let ctrl = SmcController::new(0.0, ETA);
        // lambda = 0: s = error
        let (u, _) = ctrl.compute(SmcState::default(), 12.0, 12.005, 1e-6);
        assert_relative_eq!(u, 0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_compute_is_pure() {
        let ctrl = SmcController::new(800.0, ETA);
        let state = SmcState { integral_error: 3e-4 };
        let a = ctrl.compute(state, 12.0, 11.7, 5e-7);
        let b = ctrl.compute(state, 12.0, 11.7, 5e-7);
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_command_is_bounded(
            s in -1e6f64..1e6,
            eta in 1e-9f64..10.0,
        ) {
            let u = boundary_layer_command(s, eta);
            prop_assert!((0.0..=1.0).contains(&u));
        }

        #[test]
        fn prop_compute_is_bounded(
            reference in -100.0f64..100.0,
            measured in -100.0f64..100.0,
            integral in -1.0f64..1.0,
            lambda in 0.0f64..1e4,
            eta in 1e-6f64..1.0,
        ) {
            let ctrl = SmcController::new(lambda, eta);
            let (u, _) = ctrl.compute(SmcState { integral_error: integral }, reference, measured, 5e-7);
            prop_assert!((0.0..=1.0).contains(&u));
        }
    }
}
