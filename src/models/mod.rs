//! Sub-models of the closed loop.
//!
//! This module provides the four models advanced once per timestep:
//! - Controller: sliding-mode control law with boundary layer
//! - Plant: averaged buck power stage (inductor current, output voltage)
//! - Losses: instantaneous conduction and switching losses
//! - Thermal: first-order junction temperature networks
//!
//! Every model is a plain value built from [`ConverterParams`](crate::params::ConverterParams);
//! state is passed in and returned, never held.

mod controller;
mod losses;
mod plant;
mod thermal;

pub use controller::{boundary_layer_command, SmcController, SmcState};
pub use losses::{LossModel, PowerLosses};
pub use plant::{BuckPlant, ElectricalState};
pub use thermal::ThermalNode;
