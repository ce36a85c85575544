mod builder;
mod changeset;
mod cli;
mod config;
mod confirm;
mod console;
mod constants;
mod generation;
mod git;
mod prompt;
mod provider;
mod session;
mod setup;
mod ui;

use crate::changeset::DiffSource;
use crate::cli::Cli;
use crate::console::Terminal;
use crate::provider::HttpGateway;
use crate::session::Session;
use crate::ui::Spinner;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    // the terminal is released when it drops, on every path out of main
    let mut console = Terminal::new();
    match run(&cli, &mut console) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(cli: &Cli, console: &mut Terminal) -> Result<ExitCode> {
    if cli.setup {
        let cwd = std::env::current_dir().context("failed to read current directory")?;
        let dir = setup::target_dir(console, &cwd);
        setup::run(console, &dir)?;
        return Ok(ExitCode::SUCCESS);
    }

    let root = git::repo_root(Path::new("."))?;
    for notice in git::sanity_check(&root)? {
        warning!("{notice}");
    }
    let provider = config::load(&root)?;

    let source = if cli.branch {
        DiffSource::Branch(provider.target_branch.clone())
    } else {
        DiffSource::Staged
    };
    let changeset = git::get_changes(&root, &source, cli.context)?;

    let gateway = HttpGateway::new(provider.clone());
    let mut session = Session::new(&root, &changeset.diff, &provider, gateway, Spinner::default())
        .with_debug_prompt(cli.debug_prompt);

    let outcome = confirm::run(console, &changeset, &mut session)?;
    tracing::debug!(?outcome, "finished");
    Ok(if outcome.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
