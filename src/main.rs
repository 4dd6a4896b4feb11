use std::io;
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use drag_analysis::constants::{
    COMPARISON_EXPORT_FILE, COMPARISON_PLOT_FILE, FIT_CURVE_EXPORT_FILE, FIT_EXPORT_FILE,
    FIT_PLOT_FILE,
};
use drag_analysis::report_system::export::{export_derived_series, export_fit, export_fit_curve};
use drag_analysis::*;

#[derive(Parser, Debug)]
#[command(name = "drag-analysis", version)]
#[command(about = "Rocket drag-model comparison and drag-coefficient fitting")]
struct Cli {
    /// TOML configuration file; command-line flags override its values
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare the drag/acceleration model against flight-simulation data
    Compare(CompareArgs),
    /// Fit a polynomial drag curve to CFD velocity/force samples
    Fit(FitArgs),
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Directory for charts and exports
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    output_dir: Option<PathBuf>,

    /// Also write the computed series/coefficients as CSV
    #[arg(long, action = ArgAction::SetTrue)]
    export: bool,

    /// Skip chart rendering
    #[arg(long, action = ArgAction::SetTrue)]
    no_plot: bool,
}

#[derive(Args, Debug)]
struct CompareArgs {
    /// Flight-data workbook directory or CSV sheet
    #[arg(value_hint = ValueHint::AnyPath)]
    input: Option<PathBuf>,

    /// Sheet name inside the workbook
    #[arg(long)]
    sheet: Option<String>,

    /// Drag coefficients C_f[0] C_f[1] C_f[2], each in [-1, 1]
    #[arg(
        long,
        num_args = 3,
        value_names = ["C0", "C1", "C2"],
        allow_negative_numbers = true
    )]
    coefficients: Option<Vec<f64>>,

    /// Window start: seconds, or a flight event such as `burnout`
    #[arg(long, allow_negative_numbers = true)]
    window_start: Option<WindowBound>,

    /// Window end: seconds, or a flight event such as `apogee`
    #[arg(long, allow_negative_numbers = true)]
    window_end: Option<WindowBound>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct FitArgs {
    /// Sample workbook directory or CSV sheet
    #[arg(value_hint = ValueHint::AnyPath)]
    input: Option<PathBuf>,

    /// Sheet name inside the workbook
    #[arg(long)]
    sheet: Option<String>,

    /// Polynomial degree
    #[arg(long)]
    degree: Option<usize>,

    #[command(flatten)]
    output: OutputArgs,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .try_init()
    {
        eprintln!("Failed to init logging. {}", e);
    }
}

fn handle_compare(args: CompareArgs, mut config: AnalysisConfig) -> Result<(), AnalysisError> {
    let comparison = &mut config.comparison;
    if let Some(input) = args.input {
        comparison.input = Some(input);
    }
    if let Some(sheet) = args.sheet {
        comparison.sheet = Some(sheet);
    }
    if let Some(values) = args.coefficients {
        comparison.coefficients = DragCoefficients::from_slice(&values)?;
    }
    if let Some(start) = args.window_start {
        comparison.window_start = start;
    }
    if let Some(end) = args.window_end {
        comparison.window_end = end;
    }
    config.validate()?;

    let result = run_comparison(&config.comparison)?;
    println!("{}", result.report());

    let output_dir = args.output.output_dir.unwrap_or(config.output_dir);
    if !args.output.no_plot {
        result.chart().render(&output_dir.join(COMPARISON_PLOT_FILE))?;
    }
    if args.output.export {
        export_derived_series(&result.series, &output_dir.join(COMPARISON_EXPORT_FILE))?;
    }
    Ok(())
}

fn handle_fit(args: FitArgs, mut config: AnalysisConfig) -> Result<(), AnalysisError> {
    let fit = &mut config.fit;
    if let Some(input) = args.input {
        fit.input = Some(input);
    }
    if let Some(sheet) = args.sheet {
        fit.sheet = Some(sheet);
    }
    if let Some(degree) = args.degree {
        fit.degree = degree;
    }

    let result = run_fit(&config.fit)?;
    println!("{}", result.report());

    let output_dir = args.output.output_dir.unwrap_or(config.output_dir);
    if !args.output.no_plot {
        result.chart().render(&output_dir.join(FIT_PLOT_FILE))?;
    }
    if args.output.export {
        export_fit(&result.fit, &output_dir.join(FIT_EXPORT_FILE))?;
        export_fit_curve(
            &result.samples,
            &result.fit,
            &output_dir.join(FIT_CURVE_EXPORT_FILE),
        )?;
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), AnalysisError> {
    let config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };

    match cli.command {
        Command::Compare(args) => handle_compare(args, config),
        Command::Fit(args) => handle_fit(args, config),
    }
}

/// Exits with status 1 after reporting any pipeline error on stderr.
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    info!("drag-analysis {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
