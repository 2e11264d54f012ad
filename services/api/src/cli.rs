use crate::demo::{run_demo, DemoArgs};
use crate::reports::{
    run_applicants, run_offers, run_onboarding, run_positions, run_template_preview,
    ApplicantsArgs, OffersArgs, OnboardingArgs, PositionsArgs, TemplatePreviewArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use hiring_desk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Hiring Desk",
    about = "Serve the hiring API stand-in and inspect the district hiring pipeline",
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
    /// List applicants with their stage, certification and interview progress
    Applicants(ApplicantsArgs),
    /// Positions overview by worksite
    Positions(PositionsArgs),
    /// List offers, or the ones about to expire
    Offers(OffersArgs),
    /// Onboarding dashboard for new hires
    Onboarding(OnboardingArgs),
    /// Offer letter templates
    Template {
        #[command(subcommand)]
        command: TemplateCommand,
    },
    /// Walk one applicant from interview to onboarding against seeded data
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum TemplateCommand {
    /// Fill a template with the given field values
    Preview(TemplatePreviewArgs),
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
        Command::Applicants(args) => run_applicants(args).await,
        Command::Positions(args) => run_positions(args).await,
        Command::Offers(args) => run_offers(args).await,
        Command::Onboarding(args) => run_onboarding(args).await,
        Command::Template {
            command: TemplateCommand::Preview(args),
        } => run_template_preview(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
