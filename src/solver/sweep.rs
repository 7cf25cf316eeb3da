//! Parallel parameter sweeps.
//!
//! Each sweep point is an independent run with its own simulator and
//! trajectory, so points are distributed over the rayon thread pool. The
//! loop inside one run stays sequential.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::analysis::{SteadyStateAnalyzer, SteadyStateMetrics};
use crate::error::Result;
use crate::params::{ConverterParams, ParamKey};

use super::simulate;

/// Result of one sweep point.
#[derive(Debug)]
pub struct SweepPoint {
    /// Value assigned to the swept parameter
    pub value: f64,
    /// Steady-state metrics of that run, or why there are none
    pub outcome: Result<SteadyStateMetrics>,
}

/// Sweep one parameter over `values`, keeping everything else from `base`.
///
/// Results come back in the order of `values`. A point whose parameter set is
/// invalid or whose run diverges carries its error without affecting the
/// other points.
pub fn sweep(
    base: &ConverterParams,
    key: ParamKey,
    values: &[f64],
    analyzer: &SteadyStateAnalyzer,
) -> Vec<SweepPoint> {
    values
        .par_iter()
        .map(|&value| {
            let outcome = run_point(base, key, value, analyzer);
            match &outcome {
                Ok(metrics) => info!(
                    param = key.name(),
                    value,
                    vout_avg = metrics.vout_avg,
                    efficiency = metrics.efficiency,
                    "sweep point done"
                ),
                Err(e) => warn!(param = key.name(), value, error = %e, "sweep point failed"),
            }
            SweepPoint { value, outcome }
        })
        .collect()
}

fn run_point(
    base: &ConverterParams,
    key: ParamKey,
    value: f64,
    analyzer: &SteadyStateAnalyzer,
) -> Result<SteadyStateMetrics> {
    let mut params = base.clone();
    params.set(key, value);

    let state = simulate(params.clone())?;
    analyzer.analyze(&params, &state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConverterError;
    use approx::assert_relative_eq;

    fn base() -> ConverterParams {
        ConverterParams::default().with_duration(5e-3)
    }

    #[test]
    fn test_sweep_preserves_order_and_matches_single_runs() {
        let analyzer = SteadyStateAnalyzer::default();
        let values = [5.0, 10.0, 20.0];
        let points = sweep(&base(), ParamKey::Rload, &values, &analyzer);

        assert_eq!(points.len(), 3);
        for (point, &value) in points.iter().zip(&values) {
            assert_eq!(point.value, value);

            let params = base().with(ParamKey::Rload, value);
            let state = simulate(params.clone()).unwrap();
            let expected = analyzer.analyze(&params, &state).unwrap();
            assert_eq!(point.outcome.as_ref().unwrap(), &expected);
        }
    }

    #[test]
    fn test_invalid_point_does_not_poison_sweep() {
        let analyzer = SteadyStateAnalyzer::default();
        let points = sweep(&base(), ParamKey::Capacitance, &[220e-6, 0.0], &analyzer);

        assert!(points[0].outcome.is_ok());
        assert!(matches!(
            points[1].outcome,
            Err(ConverterError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_fsw_sweep_rescales_default_timestep() {
        let analyzer = SteadyStateAnalyzer::default();
        let points = sweep(&base(), ParamKey::Fsw, &[100e3], &analyzer);
        let metrics = points[0].outcome.as_ref().unwrap();

        // 5 ms at Ts/40 with fsw = 100 kHz: 20001 samples, 20% window
        let expected_window = 20001 - SteadyStateAnalyzer::default().window_start(20001);
        assert_eq!(metrics.window_samples, expected_window);
        assert_relative_eq!(points[0].value, 100e3);
    }

    #[test]
    fn test_fsw_sweep_keeps_explicit_timestep() {
        let analyzer = SteadyStateAnalyzer::default();
        let base = base().with_timestep(2.5e-7);
        let points = sweep(&base, ParamKey::Fsw, &[25e3], &analyzer);
        let metrics = points[0].outcome.as_ref().unwrap();

        // 5 ms at 250 ns regardless of fsw: 20001 samples
        let expected_window = 20001 - analyzer.window_start(20001);
        assert_eq!(metrics.window_samples, expected_window);
    }
}
