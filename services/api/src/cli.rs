use crate::commands::{
    run_classify, run_head, run_pipeline, run_scorecard, run_sdr, ClassifyArgs, HeadArgs,
    PipelineArgs, ScorecardArgs, SdrArgs,
};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use sales_comp::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Sales Compensation Engine",
    about = "Calculate Closer, SDR and Head commissions from the command line or over HTTP",
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
    /// Closer commission tools
    Closer {
        #[command(subcommand)]
        command: CloserCommand,
    },
    /// Compute an SDR payout from period counters
    Sdr(SdrArgs),
    /// Score a lead against the qualification scorecard
    Scorecard(ScorecardArgs),
    /// Compute the Head payout (requires the leadership credential)
    Head(HeadArgs),
    /// Walk through every calculator with sample data
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum CloserCommand {
    /// Classify a single contract value
    Classify(ClassifyArgs),
    /// Accumulate deals and report the trigger status
    Pipeline(PipelineArgs),
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
        Command::Closer {
            command: CloserCommand::Classify(args),
        } => run_classify(args),
        Command::Closer {
            command: CloserCommand::Pipeline(args),
        } => run_pipeline(args),
        Command::Sdr(args) => run_sdr(args),
        Command::Scorecard(args) => run_scorecard(args),
        Command::Head(args) => run_head(args),
        Command::Demo(args) => run_demo(args),
    }
}
