use crate::demo::{run_compare, run_demo, run_project, CompareArgs, DemoArgs, ProjectArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use offer_eval::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Offer Evaluation Engine",
    about = "Compare job offers and project career earnings from the command line or over HTTP",
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
    /// Compare offers from a CSV export and print the matrix and negotiation guidance
    Compare(CompareArgs),
    /// Project five and ten year earnings for offers from a CSV export
    Project(ProjectArgs),
    /// Walk through a comparison and projection using built-in sample offers
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the offer list from a CSV export
    #[arg(long, conflicts_with = "sample_data")]
    pub(crate) offers: Option<PathBuf>,
    /// Seed the offer list with the demo offers
    #[arg(long)]
    pub(crate) sample_data: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Compare(args) => run_compare(args),
        Command::Project(args) => run_project(args),
        Command::Demo(args) => run_demo(args),
    }
}
