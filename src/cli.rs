use crate::constants::DEFAULT_CONTEXT;
use clap::Parser;

/// autocommit: write commit messages and merge request descriptions from your diff
#[derive(Parser, Debug)]
#[command(
    name = "autocommit",
    version,
    about,
    long_about = None,
    disable_version_flag = true
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// create .autocommitrc in the repository root and exit
    #[arg(long)]
    pub setup: bool,

    /// describe the current branch against the configured target branch
    /// instead of staged changes
    #[arg(long)]
    pub branch: bool,

    /// lines of context around each change in the diff
    #[arg(long, value_name = "N", default_value_t = DEFAULT_CONTEXT)]
    pub context: u32,

    /// print the prompt sent to the model
    #[arg(long)]
    pub debug_prompt: bool,

    /// log diagnostics to stderr
    #[arg(long)]
    pub verbose: bool,

    /// print version
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
