//! Buck SMC - closed-loop buck converter simulator.
//!
//! Runs one simulation (or a parameter sweep) and prints a steady-state
//! report.
//!
//! # Usage
//!
//! ```bash
//! buck-smc converter.par --csv trace.csv
//! buck-smc --set vin=36 --set rload=5 --json
//! buck-smc --sweep rload=5,10,20
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};

use buck_smc::{
    analysis::DEFAULT_WINDOW_FRACTION,
    config,
    error::Result,
    params::validate_params,
    report, solver, ConverterParams, ParamKey, Simulator, SteadyStateAnalyzer,
};

/// Buck converter with sliding-mode control: electrical, loss and thermal simulation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Parameter file; defaults are used when omitted
    #[arg(value_name = "PARAM_FILE")]
    param_file: Option<PathBuf>,

    /// Override a parameter, e.g. --set rload=5 (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
    overrides: Vec<(ParamKey, f64)>,

    /// Fraction of the run treated as steady state
    #[arg(short, long, default_value_t = DEFAULT_WINDOW_FRACTION)]
    window: f64,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Write the full trajectory as CSV
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Keep every N-th sample in the CSV
    #[arg(long, default_value_t = 1)]
    decimate: usize,

    /// Sweep one parameter over a list of values, e.g. --sweep rload=5,10,20
    #[arg(long, value_name = "KEY=V1,V2,..", value_parser = parse_sweep, conflicts_with_all = ["csv", "json"])]
    sweep: Option<(ParamKey, Vec<f64>)>,
}

fn parse_key(name: &str) -> std::result::Result<ParamKey, String> {
    ParamKey::from_name(name.trim()).ok_or_else(|| format!("unknown parameter '{}'", name))
}

fn parse_number(text: &str) -> std::result::Result<f64, String> {
    config::parse_value(text).ok_or_else(|| format!("invalid number '{}'", text))
}

fn parse_override(arg: &str) -> std::result::Result<(ParamKey, f64), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", arg))?;
    Ok((parse_key(name)?, parse_number(value)?))
}

fn parse_sweep(arg: &str) -> std::result::Result<(ParamKey, Vec<f64>), String> {
    let (name, values) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=V1,V2,..., got '{}'", arg))?;
    let values = values
        .split(',')
        .map(parse_number)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((parse_key(name)?, values))
}

fn load_params(args: &Args) -> Result<ConverterParams> {
    let mut params = match &args.param_file {
        Some(path) => ConverterParams::from_ast(config::parse_file(path)?)?,
        None => ConverterParams::default(),
    };

    for &(key, value) in &args.overrides {
        params.set(key, value);
    }

    validate_params(&params)?;
    Ok(params)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let args = Args::parse();
    let params = load_params(&args)?;
    let analyzer = SteadyStateAnalyzer::new(args.window)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some((key, values)) = &args.sweep {
        info!(param = key.name(), points = values.len(), "running sweep");
        let points = solver::sweep(&params, *key, values, &analyzer);
        report::write_sweep_table(&mut out, *key, &points)?;
        return Ok(());
    }

    info!(samples = params.num_samples(), dt = params.dt, "running simulation");
    let state = Simulator::new(params.clone())?.run();

    if let Some(path) = &args.csv {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        report::write_csv(&mut writer, &state, args.decimate)?;
        writer.flush()?;
        info!(path = %path.display(), "trajectory written");
    }

    let metrics = match analyzer.analyze(&params, &state) {
        Ok(metrics) => metrics,
        Err(e) => {
            warn!("results are unusable, try a smaller timestep");
            return Err(e);
        }
    };

    if args.json {
        report::write_json(&mut out, &params, &metrics)?;
    } else {
        report::write_summary(&mut out, &params, &metrics)?;
    }

    Ok(())
}
