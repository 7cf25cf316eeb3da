//! Converter parameter set.
//!
//! This module holds the immutable physical and control constants of a run.
//! A [`ConverterParams`] is built from defaults, a parsed parameter file
//! ([`ConverterParams::from_ast`]) or key/value overrides, and must pass
//! [`validate_params`] before a simulation may start.

mod build;
mod types;
mod validate;

pub use types::*;
pub use validate::validate_params;
