//! `mote-rt` — run a built-in actor script to quiescence, or list what's
//! available.

// Layer 1: Standard library imports
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use clap::{Parser, Subcommand};

// Layer 3: Internal module imports
use mote_rt::demos;
use mote_rt::sandbox::ScriptRegistry;
use mote_rt::system::{RuntimeDriver, SystemConfig};
use mote_rt::util::ScriptRef;

#[derive(Parser)]
#[command(name = "mote-rt")]
#[command(version, about = "A cooperative actor runtime", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a registered script as the root actor until quiescence.
    Run(RunArgs),
    /// List the scripts known to this build.
    ListScripts,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Name of a registered script (see `list-scripts`).
    script: String,

    /// Wall-clock ceiling for the whole run, in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Fixed worker-pool size. Defaults to the host's available parallelism.
    #[arg(long)]
    workers: Option<usize>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let registry = Arc::new(build_registry());

    match cli.command {
        Commands::Run(args) => run(registry, args),
        Commands::ListScripts => {
            list_scripts(&registry);
            ExitCode::SUCCESS
        }
    }
}

fn build_registry() -> ScriptRegistry {
    let registry = ScriptRegistry::new();
    demos::register_all(&registry);
    registry
}

fn run(registry: Arc<ScriptRegistry>, args: RunArgs) -> ExitCode {
    let mut builder = SystemConfig::builder();
    if let Some(workers) = args.workers {
        builder = builder.with_worker_count(workers);
    }
    if let Some(timeout) = args.timeout {
        builder = builder.with_timeout(Duration::from_secs(timeout));
    }

    let config = match builder.build() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return ExitCode::from(1);
        }
    };

    let driver = RuntimeDriver::new(config, registry);
    match driver.run(ScriptRef::new(args.script)) {
        Ok(_report) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn list_scripts(registry: &ScriptRegistry) {
    let mut refs: Vec<_> = registry.known_refs().into_iter().map(|r| r.as_str().to_string()).collect();
    refs.sort();
    for script_ref in refs {
        println!("{script_ref}");
    }
}
