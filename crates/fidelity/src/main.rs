use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use fidelity::{Config, Driver, Environment as _, OsEnvironment};
use fidelity_errors::Renderer;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(version, about = "Inspect full-fidelity syntax trees")]
struct Cli {
    /// JSON file with `parse` and `format` options.
    #[arg(long, global = true)]
    options: Option<Utf8PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the syntax tree of a file.
    Dump {
        path: Utf8PathBuf,
        /// Include trivia and diagnostics.
        #[arg(long)]
        trivia: bool,
    },
    /// Report diagnostics for files and directories.
    Check { paths: Vec<Utf8PathBuf> },
    /// List the distinct identifiers of a file.
    Identifiers { path: Utf8PathBuf },
    /// Show the nodes and the token at a byte offset.
    Locate { path: Utf8PathBuf, offset: u32 },
    /// Write a file back out from its syntax tree.
    Emit { path: Utf8PathBuf, output: Utf8PathBuf },
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FIDELITY_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let env = OsEnvironment::new();
    let cli = Cli::parse_from(env.arguments());
    let config = Config::load(&env, cli.options.as_deref())?;
    let mut driver = Driver::new(env, config, Renderer::styled());

    match cli.command {
        Command::Dump { path, trivia } => driver.dump(&path, trivia)?,
        Command::Check { paths } => {
            if driver.check(&paths)? > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Identifiers { path } => driver.identifiers(&path)?,
        Command::Locate { path, offset } => driver.locate(&path, offset)?,
        Command::Emit { path, output } => driver.emit(&path, &output)?,
    }
    Ok(ExitCode::SUCCESS)
}
