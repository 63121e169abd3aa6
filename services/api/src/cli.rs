use crate::demo::{run_demo, run_seed, DemoArgs, SeedArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use talentflow::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "TalentFlow",
    about = "Run the TalentFlow applicant-tracking service or walk through its hiring rules",
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
    /// Seed an in-memory store and print what was written
    Seed(SeedArgs),
    /// Walk one hiring flow end to end: posting, applying, assessment, sweep and offer
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
    /// Start with an empty store even when seeding is configured
    #[arg(long)]
    pub(crate) no_seed: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Seed(args) => run_seed(args),
        Command::Demo(args) => run_demo(args),
    }
}
