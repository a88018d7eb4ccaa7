use clap::Parser;
use nexblocks::nexus::{write_nexus_file, write_nexus_string, NexusReaderBuilder};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "nexblocks")]
#[command(about = "Read a Nexus file, report warnings and write it back normalized")]
#[command(version)]
struct Cli {
    /// Input Nexus file
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fail if the file does not start with #NEXUS
    #[arg(long)]
    require_header: bool,

    /// Also log block dispatch
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Warnings are reported through the log facade
    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut builder = NexusReaderBuilder::new();
    if cli.require_header {
        builder = builder.require_header();
    }
    let (document, warnings) = match builder.build().read_file(&cli.input) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{}: {e}", cli.input.display());
            return ExitCode::FAILURE;
        }
    };
    log::info!("read {} blocks with {} warnings", document.len(), warnings.len());

    let written = match &cli.output {
        Some(path) => write_nexus_file(&document, path),
        None => write_nexus_string(&document).map(|text| print!("{text}")),
    };
    if let Err(e) = written {
        eprintln!("writing failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
