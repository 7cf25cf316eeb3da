//! Report output.
//!
//! Formats analysis results as a text summary or JSON, and exports
//! trajectories as CSV for external plotting. Nothing here computes; it
//! only formats what the solver and analyzer produced.

use std::io::Write;

use serde::Serialize;

use crate::analysis::SteadyStateMetrics;
use crate::error::Result;
use crate::params::{ConverterParams, ParamKey};
use crate::solver::{SimulationState, SweepPoint};

/// Write the human-readable summary.
pub fn write_summary<W: Write>(
    out: &mut W,
    params: &ConverterParams,
    metrics: &SteadyStateMetrics,
) -> Result<()> {
    writeln!(out, "Buck converter with sliding-mode control")?;
    writeln!(out, "========================================")?;
    writeln!(
        out,
        "Vin = {:.2} V, Vref = {:.2} V, Rload = {:.2} Ω, fsw = {:.1} kHz",
        params.vin,
        params.vref,
        params.rload,
        params.fsw / 1e3
    )?;
    writeln!(
        out,
        "dt = {:.3e} s, tsim = {:.1} ms, {} samples",
        params.dt,
        params.tsim * 1e3,
        params.num_samples()
    )?;
    writeln!(
        out,
        "Steady-state window: t >= {:.2} ms ({} samples)",
        metrics.window_start * 1e3,
        metrics.window_samples
    )?;
    writeln!(out)?;

    writeln!(out, "Regulation")?;
    writeln!(out, "  Vout avg       : {:>10.4} V", metrics.vout_avg)?;
    writeln!(
        out,
        "  Regulation err : {:>10.3} %",
        metrics.regulation_error * 100.0
    )?;
    writeln!(out, "  Vout ripple pp : {:>10.4} V", metrics.vout_ripple)?;
    writeln!(out, "  iL RMS         : {:>10.4} A", metrics.il_rms)?;
    writeln!(out, "  Duty avg       : {:>10.4}", metrics.duty_avg)?;
    writeln!(out)?;

    writeln!(out, "Power")?;
    writeln!(out, "  Output power   : {:>10.4} W", metrics.output_power)?;
    writeln!(out, "  Inductor loss  : {:>10.4} W", metrics.loss_inductor)?;
    writeln!(out, "  MOSFET cond.   : {:>10.4} W", metrics.loss_mosfet)?;
    writeln!(out, "  MOSFET switch. : {:>10.4} W", metrics.loss_switching)?;
    writeln!(out, "  Diode loss     : {:>10.4} W", metrics.loss_diode)?;
    writeln!(out, "  Total loss     : {:>10.4} W", metrics.loss_total)?;
    writeln!(
        out,
        "  Efficiency     : {:>10.2} %",
        metrics.efficiency * 100.0
    )?;
    writeln!(out)?;

    writeln!(out, "Thermal (ambient {:.1} °C)", params.ambient_temp)?;
    writeln!(out, "  Tj MOSFET max  : {:>10.3} °C", metrics.tj_mosfet_max)?;
    writeln!(out, "  Tj diode max   : {:>10.3} °C", metrics.tj_diode_max)?;

    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    params: &'a ConverterParams,
    metrics: &'a SteadyStateMetrics,
}

/// Write parameters and metrics as one pretty-printed JSON object.
pub fn write_json<W: Write>(
    out: &mut W,
    params: &ConverterParams,
    metrics: &SteadyStateMetrics,
) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, &JsonReport { params, metrics })?;
    writeln!(out)?;
    Ok(())
}

/// Write the trajectory as CSV, keeping every `decimate`-th sample.
///
/// The last sample is always written. A `decimate` of 0 is treated as 1.
pub fn write_csv<W: Write>(out: &mut W, state: &SimulationState, decimate: usize) -> Result<()> {
    let columns = state.columns();
    let step = decimate.max(1);

    let header: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
    writeln!(out, "{}", header.join(","))?;

    let last = state.len().saturating_sub(1);
    for k in (0..state.len()).filter(|k| k % step == 0 || *k == last) {
        let row: Vec<String> = columns
            .iter()
            .map(|(_, values)| format!("{:e}", values[k]))
            .collect();
        writeln!(out, "{}", row.join(","))?;
    }

    Ok(())
}

/// Write one line per sweep point.
pub fn write_sweep_table<W: Write>(
    out: &mut W,
    key: ParamKey,
    points: &[SweepPoint],
) -> Result<()> {
    let label = format!("{} [{}]", key.name(), key.unit());
    writeln!(
        out,
        "{:>14} {:>10} {:>10} {:>10} {:>10} {:>10}",
        label, "Vout [V]", "ripple", "eff [%]", "TjQ [°C]", "TjD [°C]"
    )?;

    for point in points {
        match &point.outcome {
            Ok(m) => {
                writeln!(
                    out,
                    "{:>14.4e} {:>10.4} {:>10.4} {:>10.2} {:>10.3} {:>10.3}",
                    point.value,
                    m.vout_avg,
                    m.vout_ripple,
                    m.efficiency * 100.0,
                    m.tj_mosfet_max,
                    m.tj_diode_max
                )?;
            }
            Err(e) => writeln!(out, "{:>14.4e} error: {}", point.value, e)?,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SteadyStateAnalyzer;
    use crate::error::ConverterError;
    use crate::solver::simulate;

    fn short_run() -> (ConverterParams, SimulationState, SteadyStateMetrics) {
        let params = ConverterParams::default().with_duration(1e-3);
        let state = simulate(params.clone()).unwrap();
        let metrics = SteadyStateAnalyzer::default()
            .analyze(&params, &state)
            .unwrap();
        (params, state, metrics)
    }

    #[test]
    fn test_summary_mentions_every_section() {
        let (params, _, metrics) = short_run();
        let mut out = Vec::new();
        write_summary(&mut out, &params, &metrics).unwrap();
        let text = String::from_utf8(out).unwrap();

        for needle in ["Regulation", "Power", "Thermal", "Efficiency", "Tj diode max"] {
            assert!(text.contains(needle), "missing {}", needle);
        }
    }

    #[test]
    fn test_json_round_trips_through_serde_json() {
        let (params, _, metrics) = short_run();
        let mut out = Vec::new();
        write_json(&mut out, &params, &metrics).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["params"]["vin"], 24.0);
        assert_eq!(value["params"]["initial_junction_temp"], "zero");
        assert_eq!(value["metrics"]["window_samples"], metrics.window_samples);
    }

    #[test]
    fn test_csv_decimation_keeps_last_sample() {
        let (_, state, _) = short_run();
        assert_eq!(state.len(), 2001);

        let mut out = Vec::new();
        write_csv(&mut out, &state, 300).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("time,inductor_current,output_voltage"));
        // indices 0, 300, ..., 1800 plus 2000
        assert_eq!(lines.len(), 1 + 7 + 1);
        assert_eq!(lines[1].split(',').count(), 10);
    }

    #[test]
    fn test_sweep_table_lists_errors() {
        let points = vec![SweepPoint {
            value: 0.0,
            outcome: Err(ConverterError::invalid_parameter(
                "rload",
                "must be strictly positive",
            )),
        }];
        let mut out = Vec::new();
        write_sweep_table(&mut out, ParamKey::Rload, &points).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("rload [Ω]"));
        assert!(text.contains("error: Invalid parameter 'rload'"));
    }
}
