//! Entry point wiring CLI dispatch to the linking pipeline.

use anyhow::Result;
use graphify::{cli::Cli, config::Settings, logging};
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.debug)?;
    let settings = Settings::load();

    info!(?cli, "starting command");
    cli.dispatch(settings)
}
