#![deny(unsafe_code)]
//! CLI binary for colorfix.
//!
//! Subcommands:
//! - `lab <color>` — print the CIE Lab value of a hex color
//! - `delta-e <color1> <color2>` — print the CIEDE2000 distance
//! - `fix <fg> <bg>` — print a foreground that is perceivable on the background
//! - `defaults` — print the default search parameters

mod error;
mod report;

use clap::{Parser, Subcommand};
use colorfix_core::{find_perceivable, PerceivableParams, Rgb};
use error::CliError;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "colorfix",
    about = "Perceptual color difference and legible foreground search"
)]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a hex color to CIE Lab (D65).
    Lab {
        /// Color as "#rrggbb" or "rrggbb".
        color: String,
    },
    /// Compute the CIEDE2000 distance between two hex colors.
    DeltaE {
        color1: String,
        color2: String,
    },
    /// Adjust a foreground's lightness until it is perceivable on a background.
    Fix {
        /// Foreground color.
        fg: String,

        /// Background color.
        bg: String,

        /// Search parameters as a JSON object
        /// (min_threshold, exp_threshold, lightness_step).
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// Print the default search parameters.
    Defaults,
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Lab { color } => {
            let color = Rgb::from_hex(&color)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report::lab_json(color))?);
            } else {
                println!("{}", report::lab_text(color));
            }
        }
        Command::DeltaE { color1, color2 } => {
            let c1 = Rgb::from_hex(&color1)?;
            let c2 = Rgb::from_hex(&color2)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report::delta_e_json(c1, c2))?);
            } else {
                println!("{}", report::delta_e_text(c1, c2));
            }
        }
        Command::Fix { fg, bg, params } => {
            let fg = Rgb::from_hex(&fg)?;
            let bg = Rgb::from_hex(&bg)?;
            let params: serde_json::Value = serde_json::from_str(&params)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
            let params = PerceivableParams::from_json(&params)?;

            let result = find_perceivable(fg, bg, &params);
            tracing::info!(
                fg = %fg.to_hex(),
                bg = %bg.to_hex(),
                result = %result.color.to_hex(),
                "search finished"
            );

            if cli.json {
                let info = report::fix_json(fg, bg, &result, &params);
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{}", report::fix_text(&result));
            }
        }
        Command::Defaults => {
            let defaults = PerceivableParams::default().to_json();
            println!("{}", serde_json::to_string_pretty(&defaults)?);
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colorfix_core=warn,colorfix=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
