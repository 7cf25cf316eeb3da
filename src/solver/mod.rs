//! Fixed-step closed-loop solver.
//!
//! This module provides the time-domain engine of the simulator.
//!
//! ## Time Marching
//!
//! The grid is uniform, `t_k = k·dt` for `k = 0..N-1` with
//! `N = round(tsim/dt) + 1`. Index 0 holds the initial conditions. For every
//! later index the driver evaluates, strictly in this order:
//!
//! ```text
//! u[k]        = SMC(vref, Vo[k-1], ∫e)          controller
//! iL[k],Vo[k] = Euler(iL[k-1], Vo[k-1], u[k])    plant
//! P[k]        = losses(u[k], iL[k], Vo[k])       loss model
//! Tj[k]       = Euler(Tj[k-1], P[k], Tamb)       thermal nodes
//! ```
//!
//! Each model only sees the scalars it needs from index `k-1`, and nothing
//! written at index `k` is ever revisited. There is no iteration within a
//! step and no convergence check.

mod simulator;
mod state;
mod sweep;

pub use simulator::{simulate, Simulator};
pub use state::{Sample, SimulationState};
pub use sweep::{sweep, SweepPoint};
