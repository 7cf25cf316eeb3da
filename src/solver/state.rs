//! Time-indexed simulation state.

use serde::Serialize;

use crate::models::{ElectricalState, PowerLosses};

/// Everything the driver produces for one sample index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Sample {
    /// Sample time (s)
    pub time: f64,
    /// Inductor current and output voltage
    pub electrical: ElectricalState,
    /// Switch command in [0, 1]
    pub switch_command: f64,
    /// MOSFET junction temperature (°C)
    pub junction_temp_mosfet: f64,
    /// Diode junction temperature (°C)
    pub junction_temp_diode: f64,
    /// Instantaneous losses
    pub losses: PowerLosses,
}

/// Full trajectory of a run.
///
/// Every sequence is allocated at its final length before the loop starts
/// and written exactly once per index, in increasing order, by the
/// [`Simulator`](super::Simulator). Consumers only get read access.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationState {
    time: Vec<f64>,
    inductor_current: Vec<f64>,
    output_voltage: Vec<f64>,
    switch_command: Vec<f64>,
    junction_temp_mosfet: Vec<f64>,
    junction_temp_diode: Vec<f64>,
    loss_inductor: Vec<f64>,
    loss_mosfet: Vec<f64>,
    loss_diode: Vec<f64>,
    loss_switching: Vec<f64>,
}

impl SimulationState {
    /// Allocate zeroed sequences for `len` samples.
    pub(crate) fn with_len(len: usize) -> Self {
        Self {
            time: vec![0.0; len],
            inductor_current: vec![0.0; len],
            output_voltage: vec![0.0; len],
            switch_command: vec![0.0; len],
            junction_temp_mosfet: vec![0.0; len],
            junction_temp_diode: vec![0.0; len],
            loss_inductor: vec![0.0; len],
            loss_mosfet: vec![0.0; len],
            loss_diode: vec![0.0; len],
            loss_switching: vec![0.0; len],
        }
    }

    /// Store a sample at index `k`.
    pub(crate) fn write(&mut self, k: usize, sample: &Sample) {
        self.time[k] = sample.time;
        self.inductor_current[k] = sample.electrical.inductor_current;
        self.output_voltage[k] = sample.electrical.output_voltage;
        self.switch_command[k] = sample.switch_command;
        self.junction_temp_mosfet[k] = sample.junction_temp_mosfet;
        self.junction_temp_diode[k] = sample.junction_temp_diode;
        self.loss_inductor[k] = sample.losses.inductor;
        self.loss_mosfet[k] = sample.losses.mosfet_conduction;
        self.loss_diode[k] = sample.losses.diode;
        self.loss_switching[k] = sample.losses.switching;
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// True when the trajectory holds no samples.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Reassemble the sample at index `k`.
    pub fn sample(&self, k: usize) -> Option<Sample> {
        if k >= self.len() {
            return None;
        }
        Some(Sample {
            time: self.time[k],
            electrical: ElectricalState {
                inductor_current: self.inductor_current[k],
                output_voltage: self.output_voltage[k],
            },
            switch_command: self.switch_command[k],
            junction_temp_mosfet: self.junction_temp_mosfet[k],
            junction_temp_diode: self.junction_temp_diode[k],
            losses: PowerLosses {
                inductor: self.loss_inductor[k],
                mosfet_conduction: self.loss_mosfet[k],
                diode: self.loss_diode[k],
                switching: self.loss_switching[k],
            },
        })
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn inductor_current(&self) -> &[f64] {
        &self.inductor_current
    }

    pub fn output_voltage(&self) -> &[f64] {
        &self.output_voltage
    }

    pub fn switch_command(&self) -> &[f64] {
        &self.switch_command
    }

    pub fn junction_temp_mosfet(&self) -> &[f64] {
        &self.junction_temp_mosfet
    }

    pub fn junction_temp_diode(&self) -> &[f64] {
        &self.junction_temp_diode
    }

    pub fn loss_inductor(&self) -> &[f64] {
        &self.loss_inductor
    }

    /// MOSFET conduction loss (switching loss is kept separately).
    pub fn loss_mosfet(&self) -> &[f64] {
        &self.loss_mosfet
    }

    pub fn loss_diode(&self) -> &[f64] {
        &self.loss_diode
    }

    pub fn loss_switching(&self) -> &[f64] {
        &self.loss_switching
    }

    /// All sequences with their names, in CSV column order.
    pub fn columns(&self) -> [(&'static str, &[f64]); 10] {
        [
            ("time", &self.time),
            ("inductor_current", &self.inductor_current),
            ("output_voltage", &self.output_voltage),
            ("switch_command", &self.switch_command),
            ("junction_temp_mosfet", &self.junction_temp_mosfet),
            ("junction_temp_diode", &self.junction_temp_diode),
            ("loss_inductor", &self.loss_inductor),
            ("loss_mosfet", &self.loss_mosfet),
            ("loss_diode", &self.loss_diode),
            ("loss_switching", &self.loss_switching),
        ]
    }

    /// First sample holding a non-finite value, with the name of the
    /// offending sequence.
    pub fn first_non_finite(&self) -> Option<(usize, &'static str)> {
        let columns = self.columns();
        (0..self.len()).find_map(|k| {
            columns
                .iter()
                .find(|(_, values)| !values[k].is_finite())
                .map(|(name, _)| (k, *name))
        })
    }
}
