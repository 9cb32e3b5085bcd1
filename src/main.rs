use clap::Parser;
use color_eyre::Result;
use conference_view_policy::{
    init_errors,
    init_logging,
    replay,
    Args,
    Command,
    Scenario,
};
use tracing::{
    debug,
    info,
};
use view_policy_config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_errors()?;
    init_logging(args.verbose)?;

    let config = Config::new(&args.config)?;
    config.validate()?;

    match args.command {
        Command::Replay { scenario, output } => {
            let scenario = Scenario::from_file(&scenario)?;
            let summary = replay(scenario, &config).await?;
            summary.log();
            if let Some(output) = output {
                summary.write_json(&output)?;
                info!(?output, "Wrote summary");
            }
        }
        Command::Config => {
            debug!(config_dir = ?config.config_dir(), "Effective configuration");
            print!("{}", serde_yml::to_string(&config)?);
        }
    }

    Ok(())
}
