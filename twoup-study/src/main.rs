mod reports;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use reports::{
    InteractiveSink, PlainSink, StudyReport, generate_console_report,
    generate_csv_report, generate_json_report, generate_markdown_report,
    generate_unlimited_csv_report,
};
use twoup_engine::{RankField, SweepConfig, best_by, run_timeboxed_sweep, run_unlimited_sweep};
use util::{parse_grid, parse_stakes};

#[derive(Debug, Parser)]
#[command(name = "twoup-study", version = "0.1.0")]
#[command(about = "Monte-Carlo study of a Martingale strategy for Two-Up - sweeps, winners, peak stats")]
struct Args {
    /// Base stakes to test (comma-separated)
    #[arg(long, default_value = "5,10,20")]
    stakes: String,

    /// Round budgets for the time-boxed sweep (comma-separated, or start-end:step)
    #[arg(long, default_value = "10-150:5")]
    rounds: String,

    /// Safety caps for the unlimited sweep (comma-separated, or start-end:step)
    #[arg(long, default_value = "150")]
    caps: String,

    /// Initial bankroll for every simulated session
    #[arg(long, default_value_t = 1_000.0)]
    bankroll: f64,

    /// Win probability per resolved round
    #[arg(long, default_value_t = 0.5)]
    win_probability: f64,

    /// Stake multiplier applied after each loss
    #[arg(long, default_value_t = 2.0)]
    loss_multiplier: f64,

    /// Monte-Carlo trials per time-boxed cell
    #[arg(long, default_value_t = 20_000)]
    sims: u32,

    /// Monte-Carlo trials per unlimited cell
    #[arg(long, default_value_t = 100_000)]
    peak_sims: u32,

    /// Seed for the time-boxed sweep
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Seed for the unlimited sweep
    #[arg(long, default_value_t = 123)]
    peak_seed: u64,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "markdown", "csv", "json"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Force the plain-text sink even on an interactive terminal
    #[arg(long)]
    plain: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let stakes = parse_stakes(&args.stakes).context("parsing --stakes")?;
    let round_grid = parse_grid(&args.rounds).context("parsing --rounds")?;
    let caps = parse_grid(&args.caps).context("parsing --caps")?;

    let start_time = Instant::now();
    let report = run_study(&args, &stakes, &round_grid, &caps)?;
    info!(
        "study complete: {} grid rows, {} unlimited rows in {:?}",
        report.grid.len(),
        report.unlimited.len(),
        start_time.elapsed()
    );

    write_report(&args, &report)
}

fn run_study(
    args: &Args,
    stakes: &[f64],
    round_grid: &[u32],
    caps: &[u32],
) -> Result<StudyReport> {
    let mut boxed_cfg = SweepConfig::new(args.bankroll, args.sims, args.seed);
    boxed_cfg.win_probability = args.win_probability;
    boxed_cfg.loss_multiplier = args.loss_multiplier;

    info!(
        "time-boxed sweep: {} stakes x {} round budgets, {} trials per cell",
        stakes.len(),
        round_grid.len(),
        args.sims
    );
    let grid =
        run_timeboxed_sweep(stakes, round_grid, &boxed_cfg).context("time-boxed sweep failed")?;

    let mut peak_cfg = SweepConfig::new(args.bankroll, args.peak_sims, args.peak_seed);
    peak_cfg.win_probability = args.win_probability;
    peak_cfg.loss_multiplier = args.loss_multiplier;

    info!(
        "unlimited sweep: {} stakes x {} caps, {} trials per cell",
        stakes.len(),
        caps.len(),
        args.peak_sims
    );
    let unlimited =
        run_unlimited_sweep(stakes, caps, &peak_cfg).context("unlimited sweep failed")?;

    Ok(StudyReport {
        best_by_mean_final: best_by(&grid, RankField::MeanFinal),
        best_by_pct_profitable: best_by(&grid, RankField::PctProfitable),
        grid,
        unlimited,
    })
}

fn write_report(args: &Args, report: &StudyReport) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "markdown" => generate_markdown_report(&mut output_target, report)?,
        "csv" => {
            generate_csv_report(&mut output_target, &report.grid)?;
            writeln!(&mut output_target)?;
            generate_unlimited_csv_report(&mut output_target, &report.unlimited)?;
        }
        "json" => generate_json_report(&mut output_target, report)?,
        _ => {
            // Plain sink for files and explicitly non-interactive runs,
            // colored sink otherwise.
            let plain = args.plain || args.output.is_some();
            let writer = output_target.writer();
            if plain {
                let mut sink = PlainSink::new(writer);
                generate_console_report(&mut sink, report)?;
            } else {
                let mut sink = InteractiveSink::new(writer);
                generate_console_report(&mut sink, report)?;
            }
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
