/*
cargo run --bin consolidate_jsons -- <DIR>

cargo run --release --bin consolidate_jsons -- \
    evaluation/cat_photos_results \
    --log-dir logs

cargo run --bin consolidate_jsons -- evaluation/cat_photos_results --dry-run
*/

use std::{path::PathBuf, process};

use anyhow::Result;
use clap::Parser;
use log::{error, info, warn};

use consolidate_jsons::{logging, run, Options};

/// Group result JSONs by their `file_path` and write one
/// `<stem>-consolidated.json` per distinct path into the same directory.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Directory that contains the result JSON files
    #[arg(value_name = "DIR")]
    dir: PathBuf,

    /// Report what would be written without touching the directory
    #[arg(long)]
    dry_run: bool,

    /// Also write a timestamped log file into this directory
    #[arg(long = "log-dir", value_name = "PATH")]
    log_dir: Option<PathBuf>,

    /// Only print warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ----- initialise logging ----------------------------------------------
    if let Some(log_path) = logging::init(cli.log_dir.as_deref(), cli.quiet)? {
        info!("Logging to {}", log_path.display());
    }

    let options = Options {
        dir: cli.dir,
        dry_run: cli.dry_run,
        progress: !cli.quiet,
    };

    let summary = match run(&options) {
        Ok(summary) => summary,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    // empty input already warned about inside run(); still a success
    if summary.inputs_found == 0 {
        return Ok(());
    }

    let warnings = summary.warnings();
    if warnings > 0 {
        warn!(
            "Finished with {warnings} warning(s): {} of {} inputs grouped",
            summary.grouped(),
            summary.inputs_found
        );
    } else {
        info!("Finished ✅");
    }
    Ok(())
}
