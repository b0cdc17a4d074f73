//! `labelord run-server`

use std::sync::Arc;

use clap::{ArgAction, Args};
use colored::Colorize;
use labelord_api::{ApiConfig, ApiServer, AppState, DEFAULT_HOST, DEFAULT_PORT};
use tracing::info;

use crate::commands::CommandContext;
use crate::errors::Error;

#[cfg(test)]
#[path = "server_cmd_tests.rs"]
mod tests;

/// `-h` selects the host, so help is only available as `--help`.
#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Hostname.
    #[arg(short = 'h', long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port.
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Debug logging.
    #[arg(short, long)]
    pub debug: bool,

    /// Print help.
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

/// Checks the configuration and builds the server without starting it.
///
/// # Errors
///
/// `MissingWebhookSecret`, `MissingRepositories` or `MissingToken`, checked in
/// that order.
pub fn prepare(ctx: &CommandContext, args: &ServerArgs) -> Result<ApiServer, Error> {
    ctx.config.validate_for_server(ctx.explicit_token.as_deref())?;

    let client = ctx.client()?;
    let state = AppState::from_config(&ctx.config, Arc::new(client))?;
    let api_config = ApiConfig {
        host: args.host.clone(),
        port: args.port,
    };

    Ok(ApiServer::new(api_config, state))
}

pub async fn execute(ctx: &CommandContext, args: &ServerArgs) -> Result<(), Error> {
    let server = prepare(ctx, args)?;

    println!(
        "{} http://{}:{}/",
        "Serving labelord webhook on".bold(),
        args.host,
        args.port
    );
    info!(host = args.host.as_str(), port = args.port, "Starting webhook server");

    server
        .serve()
        .await
        .map_err(|e| Error::Server(e.to_string()))
}
