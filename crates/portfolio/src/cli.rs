use clap::{Args, Parser, Subcommand};

use crate::config::check_rate;
use crate::pages::PageKind;

#[derive(Parser, Debug)]
#[command(name = "portfolio", version, about = "Academic portfolio with a contact form")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Cmd>,

    /// Page shown on start
    #[arg(long, value_enum, default_value_t = PageKind::Roles)]
    pub page: PageKind,

    /// Tick rate (ticks per second); overrides the config file
    #[arg(short, long, value_name = "FLOAT", value_parser = parse_rate)]
    pub tick_rate: Option<f64>,

    /// Frame rate (frames per second); overrides the config file
    #[arg(short, long, value_name = "FLOAT", value_parser = parse_rate)]
    pub frame_rate: Option<f64>,
}

fn parse_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s.parse().map_err(|e| format!("{e}"))?;
    check_rate(rate)
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Send one contact message without starting the TUI
    Send(SendArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SendArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub subject: String,
    #[arg(long)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_page_and_rates() {
        let cli = Cli::parse_from(["portfolio", "--page", "contact", "--tick-rate", "10"]);
        assert_eq!(cli.page, PageKind::Contact);
        assert_eq!(cli.tick_rate, Some(10.0));
        assert!(cli.cmd.is_none());
    }

    #[test]
    fn zero_or_garbage_rates_are_rejected() {
        for args in [
            ["portfolio", "--tick-rate", "0"],
            ["portfolio", "--frame-rate", "0.0"],
            ["portfolio", "--frame-rate", "fast"],
        ] {
            assert!(Cli::try_parse_from(args).is_err(), "{args:?}");
        }
        let cli = Cli::try_parse_from(["portfolio", "--frame-rate", "0.5"]).unwrap();
        assert_eq!(cli.frame_rate, Some(0.5));
    }

    #[test]
    fn parses_send_subcommand() {
        let cli = Cli::parse_from([
            "portfolio",
            "send",
            "--name",
            "Ada",
            "--email",
            "ada@x.io",
            "--subject",
            "Hi",
            "--message",
            "Hello",
        ]);
        let Some(Cmd::Send(args)) = cli.cmd else {
            panic!("expected send subcommand");
        };
        assert_eq!(args.email, "ada@x.io");
    }
}
