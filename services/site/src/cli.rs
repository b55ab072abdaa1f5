use crate::organize::{run_organize, OrganizeArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use gt_portal::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "GT-09 Paraíba portal",
    about = "Serve the GT-09 Paraíba website and prepare its hero images",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP site (default command)
    Serve(ServeArgs),
    /// Copy downloaded photos into the hero image files the templates expect
    Organize(OrganizeArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Organize(args) => run_organize(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn organize_accepts_repeated_sources_and_seed() {
        let cli = Cli::try_parse_from([
            "gt-portal-site",
            "organize",
            "--source",
            "paraiba=/tmp/paraiba",
            "--source",
            "cabedelo=/tmp/cabedelo",
            "--seed",
            "42",
            "--json",
        ])
        .expect("arguments parse");

        let Some(Command::Organize(args)) = cli.command else {
            panic!("expected organize command");
        };
        assert_eq!(args.sources.len(), 2);
        assert_eq!(args.seed, Some(42));
        assert!(args.json);
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["gt-portal-site"]).expect("no arguments parse");
        assert!(cli.command.is_none());
    }
}
