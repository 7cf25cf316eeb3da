//! WASM bindings for Buck SMC.
//!
//! This module provides JavaScript-friendly bindings for running the
//! converter simulation in a browser and plotting its trajectories.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmBuckSim } from 'buck_smc';
//!
//! await init();
//!
//! const sim = new WasmBuckSim(`
//!   vin   = 24
//!   rload = 5
//!   .tran 20m
//!   .init ambient
//! `);
//!
//! console.log(sim.run_summary());
//! const t = sim.time();
//! const vout = sim.output_voltage();
//! ```

use wasm_bindgen::prelude::*;

use crate::analysis::{SteadyStateAnalyzer, SteadyStateMetrics};
use crate::config;
use crate::error::ConverterError;
use crate::params::{ConverterParams, ParamKey};
use crate::report;
use crate::solver::{simulate, SimulationState};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(e: ConverterError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-compatible buck converter simulator.
///
/// Holds a parameter set and the trajectory of the last run. Trajectory
/// getters return empty arrays until one of the `run*` methods succeeds.
#[wasm_bindgen]
pub struct WasmBuckSim {
    params: ConverterParams,
    analyzer: SteadyStateAnalyzer,
    state: Option<SimulationState>,
}

#[wasm_bindgen]
impl WasmBuckSim {
    /// Create a simulator from parameter-file text.
    ///
    /// An empty string gives the default converter.
    #[wasm_bindgen(constructor)]
    pub fn new(config_text: &str) -> Result<WasmBuckSim, JsValue> {
        let ast = config::parse(config_text).map_err(to_js)?;
        let params = ConverterParams::from_ast(ast).map_err(to_js)?;

        Ok(WasmBuckSim {
            params,
            analyzer: SteadyStateAnalyzer::default(),
            state: None,
        })
    }

    /// Override one parameter by name. Discards the previous trajectory.
    #[wasm_bindgen]
    pub fn set(&mut self, name: &str, value: f64) -> Result<(), JsValue> {
        let key = ParamKey::from_name(name)
            .ok_or_else(|| JsValue::from_str(&format!("unknown parameter '{}'", name)))?;
        self.params.set(key, value);
        self.state = None;
        Ok(())
    }

    /// Set the steady-state window fraction used by the reports.
    #[wasm_bindgen]
    pub fn set_window(&mut self, fraction: f64) -> Result<(), JsValue> {
        self.analyzer = SteadyStateAnalyzer::new(fraction).map_err(to_js)?;
        Ok(())
    }

    /// Run the simulation and return the text report.
    #[wasm_bindgen]
    pub fn run_summary(&mut self) -> Result<String, JsValue> {
        let metrics = self.run_and_analyze()?;
        let mut out = Vec::new();
        report::write_summary(&mut out, &self.params, &metrics).map_err(to_js)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Run the simulation and return the JSON report.
    #[wasm_bindgen]
    pub fn run_json(&mut self) -> Result<String, JsValue> {
        let metrics = self.run_and_analyze()?;
        let mut out = Vec::new();
        report::write_json(&mut out, &self.params, &metrics).map_err(to_js)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Number of samples a run produces.
    #[wasm_bindgen(getter)]
    pub fn num_samples(&self) -> usize {
        self.params.num_samples()
    }

    /// Sample times of the last run (s).
    #[wasm_bindgen]
    pub fn time(&self) -> Vec<f64> {
        self.column(SimulationState::time)
    }

    /// Output voltage of the last run (V).
    #[wasm_bindgen]
    pub fn output_voltage(&self) -> Vec<f64> {
        self.column(SimulationState::output_voltage)
    }

    /// Inductor current of the last run (A).
    #[wasm_bindgen]
    pub fn inductor_current(&self) -> Vec<f64> {
        self.column(SimulationState::inductor_current)
    }

    /// Switch command of the last run.
    #[wasm_bindgen]
    pub fn switch_command(&self) -> Vec<f64> {
        self.column(SimulationState::switch_command)
    }

    /// MOSFET junction temperature of the last run (°C).
    #[wasm_bindgen]
    pub fn junction_temp_mosfet(&self) -> Vec<f64> {
        self.column(SimulationState::junction_temp_mosfet)
    }

    /// Diode junction temperature of the last run (°C).
    #[wasm_bindgen]
    pub fn junction_temp_diode(&self) -> Vec<f64> {
        self.column(SimulationState::junction_temp_diode)
    }
}

impl WasmBuckSim {
    fn run_and_analyze(&mut self) -> Result<SteadyStateMetrics, JsValue> {
        let state = simulate(self.params.clone()).map_err(to_js)?;
        let metrics = self.analyzer.analyze(&self.params, &state);
        // Keep the trajectory even when it diverged so it can be inspected
        self.state = Some(state);
        metrics.map_err(to_js)
    }

    fn column(&self, select: fn(&SimulationState) -> &[f64]) -> Vec<f64> {
        self.state
            .as_ref()
            .map(|state| select(state).to_vec())
            .unwrap_or_default()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
