//! `craft` command-line entry point (spec.md §6): `craft [-w <workspace>]
//! [-c <configuration>]... [<target-name>]...`

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use craft_log::{Kernel, Level};

#[derive(Parser, Debug)]
#[command(name = "craft", about = "A declarative build tool for C and C++ projects.")]
struct Cli {
    /// Workspace directory; defaults to the current directory.
    #[arg(short = 'w', long = "workspace")]
    workspace: Option<PathBuf>,

    /// Configuration(s) to build. May be given more than once; defaults to
    /// the craftfile's own default configurations.
    #[arg(short = 'c', long = "configuration")]
    configurations: Vec<String>,

    /// Write a binary event log to this path alongside console output.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Target names to build; defaults to whatever the craftfile marked
    /// `is_default(true)`.
    targets: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let kernel = match Kernel::start(cli.log_file.clone(), Level::Info) {
        Ok(kernel) => kernel,
        Err(error) => {
            eprintln!("failed to start logging: {error:#}");
            return ExitCode::FAILURE;
        }
    };

    let workspace = cli.workspace.clone().unwrap_or_else(|| {
        craft_platform::fs::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    });

    let request = craft::ops::entry::BuildRequest {
        craftfile_dir: craft::ops::entry::craftfile_dir_for(&workspace),
        workspace,
        configurations: cli.configurations,
        target_names: cli.targets,
    };

    let status = match craft::ops::entry::run(&request, &kernel) {
        Ok(status) => status,
        Err(error) => {
            kernel.log("craft", Level::Fatal, format!("{error:#}"));
            -1
        }
    };

    kernel.shutdown();

    if status == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
