use crate::server;
use crate::terminal::{run_check, run_inspect, run_prompt};
use clap::{Args, Parser, Subcommand};
use dinewise::config::parse_threshold;
use dinewise::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "DineWise",
    about = "Guided restaurant recommendations for San Francisco, over HTTP or the terminal",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Answer the questionnaire interactively in the terminal
    Ask(RecommenderArgs),
    /// Run the bundled recommendation scenarios against the rule table
    Check(RecommenderArgs),
    /// Rule table utilities
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },
}

#[derive(Subcommand, Debug)]
enum RulesCommand {
    /// Print every loaded rule in priority order
    Inspect(RecommenderArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct RecommenderArgs {
    /// CSV rule table to load instead of the bundled one
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Answers (region included) required before rules are checked early
    #[arg(long, value_parser = parse_threshold)]
    pub(crate) threshold: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) recommender: RecommenderArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Ask(args) => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            run_prompt(&args, stdin.lock(), stdout.lock())
        }
        Command::Check(args) => run_check(&args, std::io::stdout().lock()),
        Command::Rules {
            command: RulesCommand::Inspect(args),
        } => run_inspect(&args, std::io::stdout().lock()),
    }
}
