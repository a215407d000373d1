use crate::commands::{
    run_classify, run_list, run_score, run_validate, ClassifyArgs, ScoreArgs, ValidateArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use quiz_engine::config::AppConfig;
use quiz_engine::error::AppError;
use quiz_engine::telemetry;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "quiz-engine",
    about = "Score Likert questionnaires and classify multi-axis quiz profiles",
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
    /// Score a Likert questionnaire from an answer file
    Score(ScoreArgs),
    /// Classify a profile quiz from an answer file
    Classify(ClassifyArgs),
    /// Check catalog definitions for range and reference problems
    Validate(ValidateArgs),
    /// List the questionnaires and quizzes in the catalog
    List,
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

pub(crate) async fn run() -> Result<ExitCode, AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match command {
        Command::Serve(args) => server::run(config, args).await.map(|()| ExitCode::SUCCESS),
        Command::Score(args) => run_score(&config, args).map(|()| ExitCode::SUCCESS),
        Command::Classify(args) => run_classify(&config, args).map(|()| ExitCode::SUCCESS),
        Command::Validate(args) => run_validate(&config, args).map(|clean| {
            if clean {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }),
        Command::List => run_list(&config).map(|()| ExitCode::SUCCESS),
    }
}
