//! Building a parameter set from a parsed parameter file.

use std::collections::HashMap;

use tracing::debug;

use crate::config::{ConfigAst, Device};
use crate::error::{ConverterError, Result};

use super::types::{ConverterParams, InitialJunctionTemp, ParamKey};
use super::validate::validate_params;

impl ConverterParams {
    /// Build and validate a parameter set from a parsed parameter file.
    ///
    /// Starts from [`ConverterParams::default`] and applies every assignment
    /// and directive through [`ConverterParams::set`], so when no timestep is
    /// given anywhere `dt` follows the (possibly overridden) switching
    /// frequency as `1 / fsw / 40`.
    pub fn from_ast(ast: ConfigAst) -> Result<Self> {
        let mut params = ConverterParams::default();
        // key -> line where it was first set
        let mut seen: HashMap<ParamKey, usize> = HashMap::new();

        let mut assign = |params: &mut ConverterParams, key: ParamKey, value: f64, line: usize| {
            if seen.insert(key, line).is_some() {
                return Err(ConverterError::DuplicateParameter {
                    name: key.name().to_string(),
                    line,
                });
            }
            params.set(key, value);
            Ok(())
        };

        for assignment in &ast.assignments {
            let key = ParamKey::from_name(&assignment.name).ok_or_else(|| {
                ConverterError::UnknownParameter {
                    name: assignment.name.clone(),
                    line: assignment.line,
                }
            })?;
            assign(&mut params, key, assignment.value, assignment.line)?;
        }

        for def in &ast.thermal {
            let (rth_key, cth_key) = match def.device {
                Device::Mosfet => (ParamKey::RthMosfet, ParamKey::CthMosfet),
                Device::Diode => (ParamKey::RthDiode, ParamKey::CthDiode),
            };

            // Sorted so that errors are reported deterministically
            let mut entries: Vec<_> = def.params.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            for (name, &value) in entries {
                let key = match name.as_str() {
                    "rth" => rth_key,
                    "cth" => cth_key,
                    _ => {
                        return Err(ConverterError::UnknownParameter {
                            name: format!("{}.{}", def.device.name(), name),
                            line: def.line,
                        })
                    }
                };
                assign(&mut params, key, value, def.line)?;
            }
        }

        for tran in &ast.tran {
            assign(&mut params, ParamKey::Tsim, tran.tsim, tran.line)?;
            if let Some(dt) = tran.dt {
                assign(&mut params, ParamKey::Dt, dt, tran.line)?;
            }
        }

        let mut init_line = None;
        for init in &ast.init {
            if init_line.replace(init.line).is_some() {
                return Err(ConverterError::DuplicateParameter {
                    name: ".init".to_string(),
                    line: init.line,
                });
            }
            params.initial_junction_temp =
                InitialJunctionTemp::from_str(&init.mode).ok_or_else(|| {
                    ConverterError::parse(
                        init.line,
                        format!("unknown initial condition '{}' (use zero or ambient)", init.mode),
                    )
                })?;
        }

        validate_params(&params)?;

        debug!(
            overrides = seen.len(),
            samples = params.num_samples(),
            dt = params.dt,
            "parameter set built"
        );

        Ok(params)
    }
}
