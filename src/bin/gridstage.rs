use std::{
    fs::File,
    io::{BufReader, Read as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gridstage", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scenario headlessly and emit a JSON trace of the animation.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input scenario JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output trace path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn read_scenario_json(path: &Path) -> anyhow::Result<gridstage::Scenario> {
    let f = File::open(path).with_context(|| format!("open scenario '{}'", path.display()))?;
    let mut json = String::new();
    BufReader::new(f)
        .read_to_string(&mut json)
        .with_context(|| format!("read scenario '{}'", path.display()))?;
    let scenario = gridstage::Scenario::from_json(&json).with_context(|| "parse scenario JSON")?;
    Ok(scenario)
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let scenario = read_scenario_json(&args.in_path)?;
    let trace = gridstage::simulate(&scenario)?;

    match args.out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            let f =
                File::create(&out).with_context(|| format!("write trace '{}'", out.display()))?;
            serde_json::to_writer_pretty(f, &trace).with_context(|| "serialize trace")?;
            eprintln!("wrote {}", out.display());
        }
        None => {
            let json = serde_json::to_string_pretty(&trace).with_context(|| "serialize trace")?;
            println!("{json}");
        }
    }
    Ok(())
}
