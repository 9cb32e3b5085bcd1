use clap::{
    Parser,
    Subcommand,
};
use std::path::PathBuf;

/// Conference view policy replay
#[derive(Parser, Debug, Clone)]
#[command(author, version = env!("CARGO_PKG_VERSION"), long_version = view_policy_config::version(), about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Log debug output of the policies.
    #[clap(long, short, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub config: view_policy_config::ConfigArgs,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Replays a scenario file through the store and both policies.
    Replay {
        /// YAML scenario with timed actions.
        scenario: PathBuf,

        /// Also write the summary as JSON to this file.
        #[clap(long, short)]
        output: Option<PathBuf>,
    },
    /// Prints the effective configuration.
    Config,
}
