//! # Buck SMC
//!
//! Closed-loop simulation of a buck DC-DC converter regulated by a digital
//! sliding-mode controller, with per-component power losses and junction
//! temperatures.
//!
//! This library provides:
//! - A line-oriented parameter-file language for converter configurations
//! - A sliding-mode controller with boundary-layer smoothing
//! - Averaged electrical, loss and first-order thermal models
//! - A fixed-step explicit-Euler driver producing full trajectories
//! - Steady-state analysis, reports and parallel parameter sweeps
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Parser for the parameter-file language
//! - [`params`] - Parameter set, defaults and validation
//! - [`models`] - Controller, plant, loss and thermal models
//! - [`solver`] - Simulation driver, trajectory storage and sweeps
//! - [`analysis`] - Steady-state metrics over the trailing window
//! - [`report`] - Text, JSON and CSV output
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! buck-smc converter.par --csv trace.csv --decimate 20
//! buck-smc --set rload=5 --json
//! buck-smc --sweep rload=5,10,20,40
//! ```
//!
//! ### Library
//!
//! ```no_run
//! use buck_smc::{ConverterParams, Simulator, SteadyStateAnalyzer};
//!
//! let params = ConverterParams::default();
//! let state = Simulator::new(params.clone())?.run();
//! let metrics = SteadyStateAnalyzer::default().analyze(&params, &state)?;
//! println!("Vout = {:.3} V, efficiency = {:.1} %", metrics.vout_avg, metrics.efficiency * 100.0);
//! # Ok::<(), buck_smc::ConverterError>(())
//! ```
//!
//! ## Simulation Method
//!
//! The time grid is uniform with dt = Ts/40 by default. For each step:
//!
//! 1. The controller computes the switch command from the previous output voltage
//! 2. The plant advances inductor current and output voltage (explicit Euler)
//! 3. The loss model evaluates conduction and switching losses at the new state
//! 4. The thermal nodes advance the MOSFET and diode junction temperatures
//!
//! The loop does not detect numerical divergence; the steady-state analyzer
//! reports non-finite results as [`ConverterError::DivergentSimulation`].

pub mod analysis;
pub mod config;
pub mod error;
pub mod models;
pub mod params;
pub mod report;
pub mod solver;

// Re-export main types for convenience
pub use analysis::{SteadyStateAnalyzer, SteadyStateMetrics};
pub use error::{ConverterError, Result};
pub use params::{ConverterParams, InitialJunctionTemp, ParamKey};
pub use solver::{simulate, SimulationState, Simulator};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmBuckSim;
