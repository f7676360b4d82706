use crate::demo::{run_curve, run_demo, run_quote, CurveArgs, DemoArgs, QuoteArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use wellcover::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Wellcover",
    about = "Score meals, activity, and sleep into a long-term health score and premium quote",
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
    /// Print the premium adjustment curve over a range of health scores
    Curve(CurveArgs),
    /// Quote the premium and coverage stored in a state directory
    Quote(QuoteArgs),
    /// Run the full scoring pipeline against in-memory collaborators
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
    /// Override the directory holding the user and policy records
    #[arg(long)]
    pub(crate) state_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Curve(args) => run_curve(args),
        Command::Quote(args) => run_quote(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
