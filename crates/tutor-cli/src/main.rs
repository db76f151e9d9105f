//! Offline tools for the tutoring backend.
//!
//! Provides the `tutor` binary. `plot` renders `f(x) = ...` with the same
//! pipeline as `POST /api/plot`; `eval` prints sampled values as JSON.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use tutor_core::expr::definition_rhs;
use tutor_core::plot::{png_data_uri, render_png, sample_function};
use tutor_core::{Expr, PlotError};

/// Tutoring backend tools.
#[derive(Parser)]
#[command(name = "tutor", about = "Tutoring backend tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Render a function plot as PNG.
    #[command(allow_negative_numbers = true)]
    Plot {
        /// Function definition, e.g. "f(x) = sin(x)".
        text: String,

        #[arg(long, default_value_t = -3.0)]
        x_min: f64,

        #[arg(long, default_value_t = 3.0)]
        x_max: f64,

        /// Write the PNG here instead of printing a data URI.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Sample an expression and print `[x, y]` pairs as JSON.
    #[command(allow_negative_numbers = true)]
    Eval {
        /// Expression in x, with or without the "f(x) =" prefix.
        expr: String,

        #[arg(long, default_value_t = 0.0)]
        x_min: f64,

        #[arg(long, default_value_t = 1.0)]
        x_max: f64,

        /// Number of evenly spaced points, ends included.
        #[arg(short = 'n', long, default_value_t = 11)]
        points: usize,
    },
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Plot {
            text,
            x_min,
            x_max,
            output,
        } => run_plot(&text, x_min, x_max, output),
        Commands::Eval {
            expr,
            x_min,
            x_max,
            points,
        } => run_eval(&expr, x_min, x_max, points),
    };
    process::exit(exit_code);
}

/// Execute the plot subcommand.
///
/// Returns exit code: 0 = success, 1 = invalid input, 2 = rendering error,
/// 3 = I/O error.
fn run_plot(text: &str, x_min: f64, x_max: f64, output: Option<PathBuf>) -> i32 {
    let png = match sample_function(text, x_min, x_max).and_then(|s| render_png(&s)) {
        Ok(png) => png,
        Err(e) => {
            eprintln!("Error: {}", e);
            return plot_exit_code(&e);
        }
    };

    match output {
        Some(path) => match std::fs::write(&path, &png) {
            Ok(()) => {
                eprintln!("wrote {} bytes to {}", png.len(), path.display());
                0
            }
            Err(e) => {
                eprintln!("I/O error: failed to write '{}': {}", path.display(), e);
                3
            }
        },
        None => {
            println!("{}", png_data_uri(&png));
            0
        }
    }
}

fn plot_exit_code(err: &PlotError) -> i32 {
    if err.is_client_error() {
        1
    } else {
        2
    }
}

/// Execute the eval subcommand. Non-finite values print as `null`.
fn run_eval(src: &str, x_min: f64, x_max: f64, points: usize) -> i32 {
    if points == 0 {
        eprintln!("Error: --points must be at least 1");
        return 1;
    }
    let src = definition_rhs(src).unwrap_or(src);
    let expr = match Expr::parse(src) {
        Ok(expr) => expr,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let samples = expr.sample(x_min, x_max, points);
    let pairs: Vec<[f64; 2]> = samples
        .xs
        .iter()
        .zip(&samples.ys)
        .map(|(&x, &y)| [x, y])
        .collect();
    let json = serde_json::to_string_pretty(&pairs)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize samples: {}\"}}", e));
    println!("{}", json);
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn negative_bounds_parse() {
        let cli = Cli::try_parse_from(["tutor", "plot", "f(x)=x", "--x-min", "-5", "--x-max", "-1"])
            .unwrap();
        match cli.command {
            Commands::Plot { x_min, x_max, .. } => assert_eq!((x_min, x_max), (-5.0, -1.0)),
            _ => panic!("expected plot"),
        }
    }

    #[test]
    fn exit_codes() {
        assert_eq!(run_plot("f(x) = x", 1.0, 0.0, None), 1);
        assert_eq!(run_eval("x +", 0.0, 1.0, 3), 1);
        assert_eq!(run_eval("f(x) = 2*x", 0.0, 1.0, 3), 0);
        assert_eq!(run_eval("x", 0.0, 1.0, 0), 1);
    }
}
