use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use colored::Colorize;

use poni::cli::{CommandRegistry, Io};
use poni::PoniError;

#[derive(Parser)]
#[command(name = "poni")]
#[command(version)]
#[command(about = "Authenticated encryption, key derivation and X25519 key exchange", long_about = None)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Option<External>,
}

#[derive(Subcommand)]
enum External {
    /// Any registered command; its flags are parsed by the command itself
    #[command(external_subcommand)]
    Run(Vec<String>),
}

fn main() -> ExitCode {
    let registry = match CommandRegistry::standard() {
        Ok(registry) => registry,
        Err(e) => return report(e),
    };

    let mut command = Cli::command().after_help(registry.usage());
    let matches = command.clone().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    init_tracing(cli.log_level);

    let Some(External::Run(argv)) = cli.command else {
        let _ = command.print_help();
        return ExitCode::from(2);
    };

    let Some((name, args)) = argv.split_first() else {
        let _ = command.print_help();
        return ExitCode::from(2);
    };

    let stdin = io::stdin();
    let mut stdin = stdin.lock();
    let mut stdout = io::stdout().lock();
    let mut io = Io {
        stdin: &mut stdin,
        stdout: &mut stdout,
    };

    match registry.dispatch(name, args, &mut io) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(e),
    }
}

fn init_tracing(level: tracing::Level) {
    tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn report(e: PoniError) -> ExitCode {
    eprintln!("{} {}", "Error:".red().bold(), e);
    if matches!(e, PoniError::CommandNotFound(_)) {
        eprintln!("Run 'poni --help' for the list of commands.");
    }
    ExitCode::from(e.exit_code())
}
