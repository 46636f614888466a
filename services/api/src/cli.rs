use crate::demo::{run_cost, run_demo, run_recommend, CostArgs, DemoArgs, RecommendArgs};
use crate::server;
use care_navigator::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Care Navigator",
    about = "Recommend a senior care pathway and estimate what it costs",
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
    /// Evaluate a saved questionnaire and print the recommendation
    Recommend(RecommendArgs),
    /// Price a saved cost scenario
    Cost(CostArgs),
    /// Walk a sample two-person household through recommendation and costs
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
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Recommend(args) => run_recommend(args),
        Command::Cost(args) => run_cost(args),
        Command::Demo(args) => run_demo(args),
    }
}
