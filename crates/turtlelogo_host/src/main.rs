use std::{path::PathBuf, process::exit};

use clap::Parser;
use turtlelogo::{Config, ErrorPolicy, Interpreter};
use turtlelogo_host::{read_whole_file, SvgCanvas};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// The program to run.
    input: PathBuf,
    /// Where to write the drawing (defaults to the input path with an `.svg` extension).
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Report statements that fail and carry on, instead of stopping at the first one.
    #[arg(long)]
    keep_going: bool,
    #[arg(long, default_value_t = 1_000_000)]
    max_steps: u64,
    /// How deeply procedure calls and `if`/`while` bodies may nest.
    #[arg(long, default_value_t = 128)]
    max_call_depth: usize,
    #[arg(long, default_value_t = 1.0)]
    stroke_width: f64,
}

fn run(args: &Args) -> anyhow::Result<()> {
    let program = read_whole_file(&args.input)?;
    let config = Config {
        max_steps: args.max_steps,
        max_call_depth: args.max_call_depth,
        error_policy: if args.keep_going {
            ErrorPolicy::Continue
        } else {
            ErrorPolicy::Abort
        },
        ..Config::default()
    };

    let mut interp = Interpreter::new(config);
    let mut canvas = SvgCanvas::new(args.stroke_width);
    let report = interp.run(&program, &mut canvas)?;
    for diag in &report.diagnostics {
        println!("Warning: {diag}");
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("svg"));
    canvas.save(&output)?;
    log::info!(
        "wrote {} segments to {} in {} steps",
        report.segments,
        output.display(),
        report.steps
    );
    Ok(())
}

pub fn main() {
    pretty_env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        println!("Error: {e}");
        exit(1);
    }
}
