use crate::evaluate::{run_criteria, run_evaluate, EvaluateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use credito::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "credito",
    about = "Score loan applicants and serve the credit evaluation webhook",
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
    /// Evaluate a single applicant profile or a CSV batch and print the results
    Evaluate(EvaluateArgs),
    /// Print the active scoring criteria table as JSON
    Criteria,
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
        Command::Evaluate(args) => run_evaluate(args),
        Command::Criteria => run_criteria(),
    }
}
