use crate::prelude::*;
use clap::Parser;

mod analyze;
mod config;
mod error;
mod gateway;
mod mcp;
mod orchestrator;
mod prelude;
mod process;
mod server;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Two-stage coding agent: a guidance model plans, a generation model writes code"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "CODEAGENT_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Process a single agent request
    Process(crate::process::ProcessOptions),

    /// Run the offline heuristic analyzer over a source file
    Analyze(crate::analyze::AnalyzeOptions),

    /// Serve the agent over HTTP
    Serve(crate::server::ServeOptions),

    /// Model Context Protocol server
    MCP(crate::mcp::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Process(options) => crate::process::run(options, app.global).await,
        SubCommands::Analyze(options) => crate::analyze::run(options, app.global),
        SubCommands::Serve(options) => crate::server::run(options, app.global).await,
        SubCommands::MCP(sub_app) => crate::mcp::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
