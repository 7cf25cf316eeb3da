//! Closed-loop simulation driver.

use tracing::debug;

use crate::error::Result;
use crate::models::{BuckPlant, LossModel, SmcController, SmcState, ThermalNode};
use crate::params::{validate_params, ConverterParams};

use super::state::{Sample, SimulationState};

/// The closed-loop converter simulator.
///
/// Owns the sub-models, the controller memory and the pre-sized trajectory.
/// Each call to [`step`](Self::step) produces sample `k` from sample `k - 1`
/// and stores it at index `k`:
///
/// 1. Controller: command from the previous output voltage
/// 2. Plant: electrical state `k` from state `k - 1`
/// 3. Losses: from the new command and state `k`
/// 4. Thermal: junction temperatures `k` from losses `k` and temperatures `k - 1`
pub struct Simulator {
    /// The parameter set being simulated
    params: ConverterParams,
    controller: SmcController,
    plant: BuckPlant,
    losses: LossModel,
    mosfet_thermal: ThermalNode,
    diode_thermal: ThermalNode,
    /// Integral-error memory threaded between controller calls
    smc_state: SmcState,
    /// Most recently produced sample
    previous: Sample,
    /// Index of `previous`
    index: usize,
    /// Total samples on the grid, including index 0
    num_samples: usize,
    /// Samples `0..=index` are filled
    trajectory: SimulationState,
}

impl Simulator {
    /// Create a new simulator, rejecting invalid parameter sets.
    pub fn new(params: ConverterParams) -> Result<Self> {
        validate_params(&params)?;

        let num_samples = params.num_samples();
        let previous = initial_sample(&params);
        let mut trajectory = SimulationState::with_len(num_samples);
        trajectory.write(0, &previous);

        Ok(Self {
            controller: SmcController::from_params(&params),
            plant: BuckPlant::from_params(&params),
            losses: LossModel::from_params(&params),
            mosfet_thermal: params.mosfet_thermal.into(),
            diode_thermal: params.diode_thermal.into(),
            smc_state: SmcState::default(),
            previous,
            index: 0,
            num_samples,
            trajectory,
            params,
        })
    }

    /// The parameter set.
    pub fn params(&self) -> &ConverterParams {
        &self.params
    }

    /// Total number of samples a full run produces.
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Initial conditions (sample 0).
    pub fn initial_sample(&self) -> Sample {
        initial_sample(&self.params)
    }

    /// Index of the most recently produced sample.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Current controller memory.
    pub fn smc_state(&self) -> SmcState {
        self.smc_state
    }

    /// The trajectory so far. Indices past [`index`](Self::index) are still
    /// zero.
    pub fn trajectory(&self) -> &SimulationState {
        &self.trajectory
    }

    /// Produce the next sample, or `None` once the grid is exhausted.
    pub fn step(&mut self) -> Option<Sample> {
        if self.index + 1 >= self.num_samples {
            return None;
        }

        let dt = self.params.dt;
        let ambient = self.params.ambient_temp;
        let prev = self.previous;

        let (command, smc_state) = self.controller.compute(
            self.smc_state,
            self.params.vref,
            prev.electrical.output_voltage,
            dt,
        );

        let electrical = self.plant.step(prev.electrical, command, dt);

        let losses = self.losses.evaluate(command, electrical);

        let junction_temp_mosfet =
            self.mosfet_thermal
                .step(prev.junction_temp_mosfet, losses.mosfet_total(), ambient, dt);
        let junction_temp_diode =
            self.diode_thermal
                .step(prev.junction_temp_diode, losses.diode, ambient, dt);

        self.index += 1;
        self.smc_state = smc_state;
        self.previous = Sample {
            time: self.index as f64 * dt,
            electrical,
            switch_command: command,
            junction_temp_mosfet,
            junction_temp_diode,
            losses,
        };
        self.trajectory.write(self.index, &self.previous);

        Some(self.previous)
    }

    /// Run the rest of the grid and return the complete trajectory.
    ///
    /// A simulator that has already been stepped continues from where it
    /// stopped; the result is the same as a run from a fresh simulator.
    pub fn run(mut self) -> SimulationState {
        debug!(
            samples = self.num_samples,
            from = self.index,
            dt = self.params.dt,
            "starting closed-loop run"
        );

        while self.step().is_some() {}

        debug!(
            final_vout = self.previous.electrical.output_voltage,
            final_tj_mosfet = self.previous.junction_temp_mosfet,
            "closed-loop run finished"
        );

        self.trajectory
    }
}

/// Sample 0: everything at rest, junction temperatures per the configured
/// initial condition.
fn initial_sample(params: &ConverterParams) -> Sample {
    let t0 = params
        .initial_junction_temp
        .temperature(params.ambient_temp);
    Sample {
        junction_temp_mosfet: t0,
        junction_temp_diode: t0,
        ..Sample::default()
    }
}

/// Validate, run and return the trajectory in one call.
pub fn simulate(params: ConverterParams) -> Result<SimulationState> {
    Ok(Simulator::new(params)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConverterError;
    use crate::params::{InitialJunctionTemp, ParamKey};
    use approx::assert_relative_eq;

    fn short_params() -> ConverterParams {
        // 2 ms keeps unit tests fast
        ConverterParams::default().with_duration(2e-3)
    }

    #[test]
    fn test_rejects_invalid_params() {
        let params = ConverterParams::default().with(ParamKey::Capacitance, 0.0);
        assert!(matches!(
            Simulator::new(params),
            Err(ConverterError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_grid_and_initial_conditions() {
        let params = short_params();
        let n = params.num_samples();
        let state = simulate(params.clone()).unwrap();

        assert_eq!(state.len(), n);
        assert_eq!(n, 4001);
        assert_eq!(state.sample(0), Some(Sample::default()));
        assert_relative_eq!(state.time()[n - 1], params.tsim, max_relative = 1e-12);
        for w in state.time().windows(2) {
            assert_relative_eq!(w[1] - w[0], params.dt, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_first_step_uses_zero_initial_state() {
        let mut sim = Simulator::new(short_params()).unwrap();
        let sample = sim.step().unwrap();

        // Vo = 0 < Vref: switch fully on
        assert_eq!(sample.switch_command, 1.0);
        assert_relative_eq!(sample.electrical.inductor_current, 24.0 / 150e-6 * 5e-7, max_relative = 1e-12);
        assert_eq!(sample.electrical.output_voltage, 0.0);
        assert_eq!(sim.index(), 1);
        assert_relative_eq!(sim.smc_state().integral_error, 12.0 * 5e-7, max_relative = 1e-12);
    }

    #[test]
    fn test_step_stops_at_end_of_grid() {
        let params = short_params().with_duration(10.0 * 5e-7);
        let mut sim = Simulator::new(params).unwrap();
        assert_eq!(sim.num_samples(), 11);

        let mut count = 0;
        while sim.step().is_some() {
            count += 1;
        }
        assert_eq!(count, 10);
        assert!(sim.step().is_none());
    }

    #[test]
    fn test_run_matches_stepping() {
        let params = short_params();
        let state = simulate(params.clone()).unwrap();

        let mut sim = Simulator::new(params).unwrap();
        let mut k = 0;
        while let Some(sample) = sim.step() {
            k += 1;
            assert_eq!(state.sample(k), Some(sample));
        }
        assert_eq!(k + 1, state.len());
    }

    #[test]
    fn test_run_after_partial_stepping_matches_fresh_run() {
        let params = short_params().with_initial_junction_temp(InitialJunctionTemp::Ambient);
        let full = simulate(params.clone()).unwrap();

        for steps in [1, 5, 3800, 4000] {
            let mut sim = Simulator::new(params.clone()).unwrap();
            for _ in 0..steps {
                sim.step();
            }
            assert_eq!(sim.trajectory().sample(steps), full.sample(steps));

            let resumed = sim.run();
            assert_eq!(resumed, full, "resumed after {} steps", steps);
        }
    }

    #[test]
    fn test_trajectory_fills_while_stepping() {
        let mut sim = Simulator::new(short_params()).unwrap();
        assert_eq!(sim.trajectory().len(), 4001);

        let sample = sim.step().unwrap();
        assert_eq!(sim.trajectory().sample(1), Some(sample));
        assert_eq!(sim.trajectory().time()[2], 0.0);
    }

    #[test]
    fn test_oversized_grid_is_rejected_before_allocation() {
        let params = ConverterParams::default()
            .with_duration(1.0)
            .with(ParamKey::Dt, 1e-300);
        assert!(matches!(
            Simulator::new(params),
            Err(ConverterError::InvalidParameter { ref param, .. }) if param == "dt"
        ));
    }

    #[test]
    fn test_switch_command_stays_in_unit_interval() {
        let state = simulate(short_params()).unwrap();
        assert!(state
            .switch_command()
            .iter()
            .all(|u| (0.0..=1.0).contains(u)));
    }

    #[test]
    fn test_losses_are_non_negative() {
        let state = simulate(short_params()).unwrap();
        for k in 0..state.len() {
            let losses = state.sample(k).unwrap().losses;
            assert!(losses.inductor >= 0.0);
            assert!(losses.mosfet_conduction >= 0.0);
            assert!(losses.diode >= 0.0);
            assert!(losses.switching >= 0.0);
        }
    }

    #[test]
    fn test_ambient_initial_condition() {
        let params = short_params().with_initial_junction_temp(InitialJunctionTemp::Ambient);
        let state = simulate(params).unwrap();
        assert_eq!(state.junction_temp_mosfet()[0], 25.0);
        assert_eq!(state.junction_temp_diode()[0], 25.0);
        // Heating only: never below ambient
        assert!(state.junction_temp_mosfet().iter().all(|&t| t >= 25.0));
        assert!(state.junction_temp_diode().iter().all(|&t| t >= 25.0));
    }

    #[test]
    fn test_deterministic() {
        let a = simulate(short_params()).unwrap();
        let b = simulate(short_params()).unwrap();
        assert_eq!(a, b);
    }
}
