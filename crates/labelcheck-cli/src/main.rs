mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "labelcheck",
    version,
    about = "Compliance checker for packaged-goods label declarations"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full extraction, normalization and scoring pipeline
    Check {
        /// Label text file (.txt, OCR output) or saved product page (.html)
        input_file: PathBuf,

        /// Page URL, used to pick site-specific selectors for HTML inputs
        #[arg(long)]
        url: Option<String>,

        /// Recognizer confidence reported with OCR text input
        #[arg(long, default_value_t = 1.0)]
        ocr_confidence: f64,

        /// Source image width in pixels (OCR text input)
        #[arg(long, default_value_t = 0)]
        width: u32,

        /// Source image height in pixels (OCR text input)
        #[arg(long, default_value_t = 0)]
        height: u32,

        /// JSON file with AI field suggestions to merge before normalization
        #[arg(long, value_name = "FILE")]
        refine: Option<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Show per-field confidences alongside the violation ledger
        #[arg(long)]
        verbose: bool,
    },
    /// Extract raw field candidates without normalizing or scoring
    Extract {
        /// Label text file (.txt) or saved product page (.html)
        input_file: PathBuf,

        /// Page URL for HTML inputs
        #[arg(long)]
        url: Option<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write extracted candidates to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Inspect the field schema registry
    Fields {
        #[command(subcommand)]
        action: FieldsAction,
    },
}

#[derive(Subcommand)]
enum FieldsAction {
    /// List recognized fields
    List,
    /// Describe one field's rules
    Describe {
        /// Field name (e.g., "mrp")
        name: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            input_file,
            url,
            ocr_confidence,
            width,
            height,
            refine,
            output,
            verbose,
        } => commands::check::run(
            input_file,
            url,
            ocr_confidence,
            width,
            height,
            refine,
            &output,
            verbose,
        ),
        Commands::Extract {
            input_file,
            url,
            output,
            out,
        } => commands::extract::run(input_file, url, &output, out),
        Commands::Fields { action } => match action {
            FieldsAction::List => commands::fields::list(),
            FieldsAction::Describe { name } => commands::fields::describe(&name),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
