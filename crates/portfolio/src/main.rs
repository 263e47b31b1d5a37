use clap::Parser;
use color_eyre::Result;

use portfolio::{
    app::App,
    cli::{Cli, Cmd},
    config::Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    portfolio::errors::init()?;
    portfolio::config::ensure_data_and_config_dirs_exist()?;
    portfolio::logging::init()?;

    let outcome = run(args).await;
    portfolio::logging::flush();
    if let Ok(false) = outcome {
        std::process::exit(libc::EXIT_FAILURE);
    }
    outcome.map(|_| ())
}

/// Returns `false` when a headless send was not delivered.
async fn run(args: Cli) -> Result<bool> {
    let mut config = Config::new()?;
    if let Some(tick_rate) = args.tick_rate {
        config.ui.tick_rate = tick_rate;
    }
    if let Some(frame_rate) = args.frame_rate {
        config.ui.frame_rate = frame_rate;
    }

    match args.cmd {
        Some(Cmd::Send(send)) => portfolio::headless::send(&config, send).await,
        None => {
            let mut app = App::new(config, args.page)?;
            app.run().await?;
            Ok(true)
        }
    }
}
