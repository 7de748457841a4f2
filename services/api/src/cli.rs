use crate::commands::{run_survey_analyze, run_survey_report, SurveyAnalyzeArgs, SurveyReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use survey_insights::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Survey Insights",
    about = "Analyze employee survey responses and publish satisfaction reports",
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
    /// Analyze a survey response export from the command line
    Survey {
        #[command(subcommand)]
        command: SurveyCommand,
    },
}

#[derive(Subcommand, Debug)]
enum SurveyCommand {
    /// Print per-department statistics for an export
    Analyze(SurveyAnalyzeArgs),
    /// Render the paginated report document for an export
    Report(SurveyReportArgs),
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
        Command::Survey {
            command: SurveyCommand::Analyze(args),
        } => run_survey_analyze(args),
        Command::Survey {
            command: SurveyCommand::Report(args),
        } => run_survey_report(args),
    }
}
