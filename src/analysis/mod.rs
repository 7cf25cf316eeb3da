//! Steady-state analysis of a finished trajectory.
//!
//! The analyzer assumes the trailing part of the run (the last 20 % of the
//! samples by default) has converged, and reduces it to scalar metrics:
//! regulation, ripple, RMS current, average duty, power balance, efficiency
//! and peak junction temperatures.
//!
//! The simulation loop never checks for numerical divergence. This is where
//! it surfaces: a window with non-finite values yields
//! [`ConverterError::DivergentSimulation`] instead of meaningless numbers.

use serde::Serialize;
use tracing::warn;

use crate::error::{ConverterError, Result};
use crate::params::ConverterParams;
use crate::solver::SimulationState;

/// Default fraction of the run treated as steady state.
pub const DEFAULT_WINDOW_FRACTION: f64 = 0.2;

/// Scalar performance metrics over the steady-state window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SteadyStateMetrics {
    /// Start time of the window (s)
    pub window_start: f64,
    /// Number of samples in the window
    pub window_samples: usize,
    /// Mean output voltage (V)
    pub vout_avg: f64,
    /// Peak-to-peak output ripple (V)
    pub vout_ripple: f64,
    /// Relative regulation error (Vout_avg − Vref) / Vref
    pub regulation_error: f64,
    /// RMS inductor current (A)
    pub il_rms: f64,
    /// Mean switch command
    pub duty_avg: f64,
    /// Output power Vout_avg² / Rload (W)
    pub output_power: f64,
    /// Mean inductor copper loss (W)
    pub loss_inductor: f64,
    /// Mean MOSFET conduction loss (W)
    pub loss_mosfet: f64,
    /// Mean diode loss (W)
    pub loss_diode: f64,
    /// Mean switching loss (W)
    pub loss_switching: f64,
    /// Sum of the mean losses (W)
    pub loss_total: f64,
    /// Pout / (Pout + Ploss)
    pub efficiency: f64,
    /// Peak MOSFET junction temperature (°C)
    pub tj_mosfet_max: f64,
    /// Peak diode junction temperature (°C)
    pub tj_diode_max: f64,
}

impl SteadyStateMetrics {
    fn first_non_finite(&self) -> Option<&'static str> {
        [
            ("vout_avg", self.vout_avg),
            ("vout_ripple", self.vout_ripple),
            ("il_rms", self.il_rms),
            ("duty_avg", self.duty_avg),
            ("output_power", self.output_power),
            ("loss_total", self.loss_total),
            ("efficiency", self.efficiency),
            ("tj_mosfet_max", self.tj_mosfet_max),
            ("tj_diode_max", self.tj_diode_max),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
    }
}

/// Reduces the trailing window of a trajectory to [`SteadyStateMetrics`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteadyStateAnalyzer {
    window_fraction: f64,
}

impl Default for SteadyStateAnalyzer {
    fn default() -> Self {
        Self {
            window_fraction: DEFAULT_WINDOW_FRACTION,
        }
    }
}

impl SteadyStateAnalyzer {
    /// Create an analyzer using the last `window_fraction` of the samples.
    pub fn new(window_fraction: f64) -> Result<Self> {
        if !(window_fraction > 0.0 && window_fraction <= 1.0) {
            return Err(ConverterError::invalid_simulation_param(format!(
                "steady-state window fraction must be in (0, 1], got {}",
                window_fraction
            )));
        }
        Ok(Self { window_fraction })
    }

    /// Fraction of the run used as the window.
    pub fn window_fraction(&self) -> f64 {
        self.window_fraction
    }

    /// Index of the first sample in the window for a run of `len` samples.
    pub fn window_start(&self, len: usize) -> usize {
        let count = ((len as f64) * self.window_fraction).ceil() as usize;
        len - count.clamp(1, len.max(1))
    }

    /// Compute the metrics.
    pub fn analyze(
        &self,
        params: &ConverterParams,
        state: &SimulationState,
    ) -> Result<SteadyStateMetrics> {
        if state.is_empty() {
            return Err(ConverterError::invalid_simulation_param(
                "cannot analyze an empty trajectory",
            ));
        }

        let start = self.window_start(state.len());
        let window = start..state.len();

        let vout = &state.output_voltage()[window.clone()];
        let il = &state.inductor_current()[window.clone()];

        let vout_avg = mean(vout);
        let output_power = vout_avg * vout_avg / params.rload;

        let loss_inductor = mean(&state.loss_inductor()[window.clone()]);
        let loss_mosfet = mean(&state.loss_mosfet()[window.clone()]);
        let loss_diode = mean(&state.loss_diode()[window.clone()]);
        let loss_switching = mean(&state.loss_switching()[window.clone()]);
        let loss_total = loss_inductor + loss_mosfet + loss_diode + loss_switching;

        let metrics = SteadyStateMetrics {
            window_start: state.time()[start],
            window_samples: window.len(),
            vout_avg,
            vout_ripple: max(vout) - min(vout),
            regulation_error: (vout_avg - params.vref) / params.vref,
            il_rms: rms(il),
            duty_avg: mean(&state.switch_command()[window.clone()]),
            output_power,
            loss_inductor,
            loss_mosfet,
            loss_diode,
            loss_switching,
            loss_total,
            efficiency: output_power / (output_power + loss_total),
            tj_mosfet_max: max(&state.junction_temp_mosfet()[window.clone()]),
            tj_diode_max: max(&state.junction_temp_diode()[window]),
        };

        if let Some(metric) = metrics.first_non_finite() {
            let (index, quantity) = state
                .first_non_finite()
                .unwrap_or((start, metric));
            let time = state.time().get(index).copied().unwrap_or(f64::NAN);
            warn!(index, quantity, metric, "non-finite steady-state metric");
            return Err(ConverterError::DivergentSimulation {
                quantity: quantity.to_string(),
                index,
                time,
            });
        }

        Ok(metrics)
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn rms(values: &[f64]) -> f64 {
    (values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64).sqrt()
}

// NaN-propagating extrema, so divergence is never masked
fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, |acc, v| {
        if v.is_nan() || acc.is_nan() {
            f64::NAN
        } else {
            acc.max(v)
        }
    })
}

fn min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, |acc, v| {
        if v.is_nan() || acc.is_nan() {
            f64::NAN
        } else {
            acc.min(v)
        }
    })
}
