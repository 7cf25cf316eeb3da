//! First-order junction temperature model.
//!
//! Each device is a single thermal RC node referenced to ambient:
//!   dTj/dt = (P − (Tj − Tamb) / Rth) / Cth
//!
//! i.e. a low-pass filter on dissipated power with DC gain Rth and time
//! constant Rth·Cth, discretized with explicit Euler.

use crate::params::ThermalParams;

/// Thermal RC node of one semiconductor device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalNode {
    /// Junction-to-case thermal resistance (°C/W)
    pub rth: f64,
    /// Thermal capacitance (J/°C)
    pub cth: f64,
}

impl ThermalNode {
    /// Create a new thermal node.
    pub fn new(rth: f64, cth: f64) -> Self {
        Self { rth, cth }
    }

    /// Time constant Rth·Cth (s).
    pub fn time_constant(&self) -> f64 {
        self.rth * self.cth
    }

    /// Junction temperature reached under constant dissipation.
    pub fn steady_state(&self, power: f64, ambient: f64) -> f64 {
        ambient + power * self.rth
    }

    /// Advance the junction temperature by one timestep.
    pub fn step(&self, tj: f64, power: f64, ambient: f64, dt: f64) -> f64 {
        let dtj = (power - (tj - ambient) / self.rth) / self.cth;
        tj + dtj * dt
    }
}

impl From<ThermalParams> for ThermalNode {
    fn from(params: ThermalParams) -> Self {
        Self::new(params.rth, params.cth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const AMBIENT: f64 = 25.0;

    #[test]
    fn test_step_at_ambient() {
        let node = ThermalNode::new(0.5, 5e-3);
        // No power: stays at ambient
        assert_eq!(node.step(AMBIENT, 0.0, AMBIENT, 5e-7), AMBIENT);
        // With power: dTj = P / Cth * dt
        assert_relative_eq!(node.step(AMBIENT, 2.0, AMBIENT, 1e-6), AMBIENT + 2.0 / 5e-3 * 1e-6);
    }

    #[test]
    fn test_converges_monotonically_to_asymptote() {
        for node in [ThermalNode::new(0.5, 5e-3), ThermalNode::new(2.0, 2e-3)] {
            let power = 10.0;
            let dt = 5e-7;
            let target = node.steady_state(power, AMBIENT);
            let rise = target - AMBIENT;

            let steps = (3.0 * node.time_constant() / dt).ceil() as usize;
            let mut tj = AMBIENT;
            for _ in 0..steps {
                let next = node.step(tj, power, AMBIENT, dt);
                assert!(next >= tj);
                assert!(next <= target);
                tj = next;
            }

            // Within 5% of the asymptote after three time constants
            assert!((target - tj) < 0.05 * rise, "tj = {}, target = {}", tj, target);
            // ...but not there yet (about e^-3 of the rise remains)
            assert!((target - tj) > 0.04 * rise);
        }
    }

    #[test]
    fn test_cold_start_relaxes_to_ambient() {
        let node = ThermalNode::new(2.0, 2e-3);
        let dt = 5e-7;
        let mut tj = 0.0;
        for _ in 0..(10.0 * node.time_constant() / dt) as usize {
            tj = node.step(tj, 0.0, AMBIENT, dt);
        }
        assert_relative_eq!(tj, AMBIENT, epsilon = 0.01);
    }

    #[test]
    fn test_from_params() {
        let node = ThermalNode::from(ThermalParams { rth: 2.0, cth: 2e-3 });
        assert_relative_eq!(node.time_constant(), 4e-3);
        assert_eq!(node.steady_state(1.5, AMBIENT), 28.0);
    }
}
