use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use labelord_cli::commands::{
    list_labels_cmd, list_repos_cmd,
    run_cmd::{self, RunArgs},
    server_cmd::{self, ServerArgs},
    CommandContext,
};
use labelord_cli::Error;
use labelord_core::config::CONFIG_ENV_VAR;
use labelord_core::errors::EXIT_SUCCESS;
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// Environment variable holding the log filter.
const LOG_ENV_VAR: &str = "LABELORD_LOG";

/// labelord: keep GitHub labels consistent across repositories
#[derive(Parser, Debug)]
#[command(name = "labelord", version)]
#[command(about = "Keep GitHub labels consistent across repositories", long_about = None)]
struct Cli {
    /// Configuration file path.
    #[arg(
        short,
        long,
        env = CONFIG_ENV_VAR,
        default_value = "./config.toml",
        global = true
    )]
    config: PathBuf,

    /// GitHub token.
    #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List accessible repositories.
    ListRepos,

    /// List labels of a repository.
    ListLabels {
        #[arg(value_name = "REPOSITORY")]
        repository: String,
    },

    /// Run labels processing.
    Run(RunArgs),

    /// Start the webhook server.
    #[command(disable_help_flag = true)]
    RunServer(ServerArgs),
}

impl Cli {
    fn debug(&self) -> bool {
        matches!(&self.command, Commands::RunServer(args) if args.debug)
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var(LOG_ENV_VAR)
        .from_env_lossy();

    // Report lines own stdout; diagnostics go to stderr and stay silent unless
    // requested.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

async fn execute(cli: Cli) -> Result<i32, Error> {
    let ctx = CommandContext::load(&cli.config, cli.token)?;

    match cli.command {
        Commands::ListRepos => list_repos_cmd::execute(&ctx).await.map(|_| EXIT_SUCCESS),
        Commands::ListLabels { repository } => list_labels_cmd::execute(&ctx, &repository)
            .await
            .map(|_| EXIT_SUCCESS),
        Commands::Run(args) => run_cmd::execute(&ctx, &args)
            .await
            .map(|status| status.code()),
        Commands::RunServer(args) => server_cmd::execute(&ctx, &args)
            .await
            .map(|_| EXIT_SUCCESS),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug());

    let code = match execute(cli).await {
        Ok(code) => code,
        Err(e) => {
            debug!(exit_code = e.exit_code(), "Command failed: {}", e);
            eprintln!("{}", e);
            e.exit_code()
        }
    };

    std::process::exit(code);
}
