use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tspl_labels::config::{self, LabelSize};
use tspl_labels::types::LabelRecord;
use tspl_labels::{output, template};

/// Flags shared by commands that resolve a layout.
#[derive(clap::Args, Clone)]
struct LayoutArgs {
    /// Label stock
    #[arg(long, value_enum, default_value_t = LabelSize::Small)]
    size: LabelSize,

    /// Sparse TOML file overriding the stock defaults
    #[arg(long)]
    options: Option<PathBuf>,
}

#[derive(Parser)]
#[command(name = "tspl-labels")]
#[command(about = "Generate TSPL programs for QR inventory labels")]
#[command(long_about = "\
Generate TSPL programs for QR inventory labels

Records are read from a JSON array:

  [
    { \"qr_payload\": \"SKU-00042\", \"name\": \"Hex bolt M6\", \"id\": \"42\" },
    { \"qr_payload\": \"SKU-00043\", \"name\": \"Hex nut M6\", \"id\": \"43\" }
  ]

The program is written to stdout (or --output) ready to be sent raw to the
printer. A summary goes to stderr.

Run 'tspl-labels gen-config --size <SIZE>' for a documented options file.")]
#[command(version)]
struct Cli {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a label program from a JSON records file
    Render {
        #[command(flatten)]
        layout: LayoutArgs,

        /// JSON array of label records
        #[arg(long)]
        records: PathBuf,

        /// Write the program here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate a layout and report overlapping slots
    Check(LayoutArgs),
    /// Print the stock configuration for a size as TOML
    GenConfig {
        #[arg(long, value_enum, default_value_t = LabelSize::Small)]
        size: LabelSize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Render {
            layout,
            records,
            output: output_path,
        } => {
            let config = config::load_config(layout.size, layout.options.as_deref())?;
            let records = load_records(&records)?;
            let job = template::render_job(&records, &config)?;
            match output_path {
                Some(path) => std::fs::write(&path, &job.program)?,
                None => print!("{}", job.program),
            }
            output::print_render_output(layout.size, &config, &job);
        }
        Command::Check(layout) => {
            let config = config::load_config(layout.size, layout.options.as_deref())?;
            output::print_check_output(layout.size, &config);
        }
        Command::GenConfig { size } => {
            print!("{}", config::stock_config_toml(size)?);
        }
    }

    Ok(())
}

/// Install a stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_records(path: &Path) -> Result<Vec<LabelRecord>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let records: Vec<LabelRecord> = serde_json::from_str(&content)?;
    tracing::debug!(count = records.len(), path = %path.display(), "loaded records");
    Ok(records)
}
